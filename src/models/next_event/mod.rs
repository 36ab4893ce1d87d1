use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The two daily fasting boundaries. Ordering matters: on equal instants
/// sahur sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Sahur,
    Iftar,
}

impl EventKind {
    /// Heading shown above the countdown.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sahur => "Next Suhoor",
            Self::Iftar => "Next Iftar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sahur => "Suhoor",
            Self::Iftar => "Iftar",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The upcoming sahur or iftar, derived fresh from a schedule and an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextEvent {
    pub kind: EventKind,
    pub at: NaiveDateTime,
    pub label: String,
}

impl NextEvent {
    pub fn new(kind: EventKind, at: NaiveDateTime) -> Self {
        Self {
            kind,
            at,
            label: kind.label().to_string(),
        }
    }

    /// Time left until the event. Negative once `now` has passed it.
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        self.at - now
    }
}
