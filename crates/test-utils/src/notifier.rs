use std::sync::{Arc, Mutex};

use sitepipe::reload::{ReloadMessage, ReloadNotifier};

/// Notifier that keeps every message for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<ReloadMessage>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<ReloadMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl ReloadNotifier for RecordingNotifier {
    fn notify(&self, message: &ReloadMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}
