pub mod prompt;
pub mod recents;
pub mod template;
pub mod types;
