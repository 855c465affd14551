use std::sync::Mutex;

/// Shows short messages to the user
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

/// Prints notices to stderr so they never mix with generated output
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notice(&self, message: &str) {
        eprintln!("[sprompt] {message}");
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.notices().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notice(&self, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(message.to_string());
        }
    }
}
