use anyhow::Result;
use notify_rust::{Notification, Timeout};

use crate::models::next_event::NextEvent;
use crate::services::countdown::EventTransition;

/// Service for displaying system notifications
#[derive(Debug, Clone)]
pub struct NotificationService {
    enabled: bool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Announce that a sahur or iftar time has arrived.
    pub fn show_event_alert(&self, transition: &EventTransition) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let (summary, body) = alert_text(transition);

        Notification::new()
            .summary(&summary)
            .body(&body)
            .timeout(Timeout::Milliseconds(10000))
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        Ok(())
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

fn alert_text(transition: &EventTransition) -> (String, String) {
    let summary = format!("Time for {}", transition.reached.kind);

    let body = match &transition.upcoming {
        Some(NextEvent { kind, at, .. }) => {
            format!("Next {} at {}", kind, at.format("%a %d %b %H:%M"))
        }
        None => "No further events in the loaded schedule".to_string(),
    };

    (summary, body)
}
