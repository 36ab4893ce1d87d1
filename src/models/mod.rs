// Module exports for models

pub mod location;
pub mod next_event;
pub mod schedule;
pub mod settings;
