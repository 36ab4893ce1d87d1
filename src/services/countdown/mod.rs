mod clock;
mod format;
mod resolver;
mod service;

pub use clock::{Clock, ClockDriver, ClockHandle, DriverState, SystemClock};
pub use format::{format_countdown, format_countdown_millis};
pub use resolver::resolve;
pub use service::{CountdownService, CountdownView, EventTransition, TickOutcome};
