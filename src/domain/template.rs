//! Placeholder substitution for prompt templates.
//!
//! Templates are plain text. Placeholders are literal tokens such as
//! `<SELECTION>`; there is no escaping and no parsing beyond token search.

use std::fmt;

use thiserror::Error;

use super::types::CommandType;

/// A token that can appear in a prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Selection,
    Request,
    Document,
    Query,
    Title,
    Author,
    Keywords,
    Transcript,
}

impl Placeholder {
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Selection => "<SELECTION>",
            Placeholder::Request => "<REQUEST>",
            Placeholder::Document => "<DOCUMENT>",
            Placeholder::Query => "<QUERY>",
            Placeholder::Title => "<TITLE>",
            Placeholder::Author => "<AUTHOR>",
            Placeholder::Keywords => "<KEYWORDS>",
            Placeholder::Transcript => "<TRANSCRIPT>",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Tokens a template for `command` must contain
pub fn required_placeholders(command: CommandType) -> &'static [Placeholder] {
    match command {
        CommandType::Selection => &[Placeholder::Selection, Placeholder::Request],
        CommandType::Document => &[Placeholder::Document, Placeholder::Request],
        CommandType::Cursor => &[Placeholder::Query],
        CommandType::Youtube => &[
            Placeholder::Title,
            Placeholder::Author,
            Placeholder::Keywords,
            Placeholder::Transcript,
            Placeholder::Request,
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} prompt template must include {}", title_case(.command), join_tokens(.missing))]
pub struct TemplateError {
    pub command: CommandType,
    pub missing: Vec<Placeholder>,
}

fn title_case(command: &CommandType) -> String {
    let name = command.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_tokens(tokens: &[Placeholder]) -> String {
    let tokens: Vec<&str> = tokens.iter().map(Placeholder::token).collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}

/// Check that `template` carries every token `command` needs
pub fn validate(command: CommandType, template: &str) -> Result<(), TemplateError> {
    let missing: Vec<Placeholder> = required_placeholders(command)
        .iter()
        .copied()
        .filter(|p| !template.contains(p.token()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TemplateError { command, missing })
    }
}

/// Replace every listed placeholder in one left-to-right pass.
///
/// Substituted values are never rescanned. Tokens without an entry in
/// `substitutions` are left in the output as-is.
pub fn fill(template: &str, substitutions: &[(Placeholder, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = substitutions
            .iter()
            .filter_map(|(p, value)| rest.find(p.token()).map(|at| (at, p.token(), *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, token, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + token.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_selection_and_request() {
        let prompt = fill(
            "<SELECTION>|<REQUEST>",
            &[
                (Placeholder::Selection, "World"),
                (Placeholder::Request, "capitalize"),
            ],
        );
        assert_eq!(prompt, "World|capitalize");
    }

    #[test]
    fn fill_replaces_repeated_tokens() {
        let prompt = fill("<QUERY> and again <QUERY>", &[(Placeholder::Query, "hi")]);
        assert_eq!(prompt, "hi and again hi");
    }

    #[test]
    fn fill_does_not_rescan_substituted_values() {
        let prompt = fill(
            "Text: <SELECTION> Request: <REQUEST>",
            &[
                (Placeholder::Selection, "literal <REQUEST> token"),
                (Placeholder::Request, "shorten"),
            ],
        );
        assert_eq!(prompt, "Text: literal <REQUEST> token Request: shorten");
    }

    #[test]
    fn unresolved_tokens_pass_through() {
        let prompt = fill("<QUERY> <TITLE>", &[(Placeholder::Query, "q")]);
        assert_eq!(prompt, "q <TITLE>");
    }

    #[test]
    fn filled_templates_contain_no_required_tokens() {
        for command in CommandType::ALL {
            let template: String = required_placeholders(command)
                .iter()
                .map(|p| format!("[{}]", p.token()))
                .collect();
            let substitutions: Vec<(Placeholder, &str)> = required_placeholders(command)
                .iter()
                .map(|p| (*p, "value"))
                .collect();

            let prompt = fill(&template, &substitutions);
            for p in required_placeholders(command) {
                assert!(!prompt.contains(p.token()), "{command}: {p} left in {prompt}");
            }
        }
    }

    #[test]
    fn validate_reports_missing_tokens() {
        assert!(validate(CommandType::Cursor, "Answer: <QUERY>").is_ok());

        let err = validate(CommandType::Cursor, "Answer:").unwrap_err();
        assert_eq!(err.command, CommandType::Cursor);
        assert_eq!(err.missing, vec![Placeholder::Query]);
        assert_eq!(err.to_string(), "Cursor prompt template must include <QUERY>");

        let err = validate(CommandType::Selection, "<REQUEST>").unwrap_err();
        assert_eq!(err.missing, vec![Placeholder::Selection]);

        let err = validate(CommandType::Youtube, "<TITLE> <REQUEST>").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Youtube prompt template must include <AUTHOR>, <KEYWORDS> and <TRANSCRIPT>"
        );
    }
}
