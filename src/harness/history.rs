use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryMessage {
    pub timestamp: Duration,
    pub message: String,
}

/// Timestamped progress log of one harness run
pub struct RunHistory {
    // Timestamp of when the run started
    pub start_time: Instant,

    pub messages: Vec<HistoryMessage>,
}

impl RunHistory {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: String) {
        let history_message = HistoryMessage {
            message,
            timestamp: self.start_time.elapsed(),
        };
        log::info!(
            "Time: {:?}, {}",
            history_message.timestamp,
            history_message.message
        );
        self.messages.push(history_message);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
