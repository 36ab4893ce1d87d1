// Terminal presentation of the schedule and countdown

mod schedule_table;
mod terminal;

pub use schedule_table::write_schedule_table;
pub use terminal::{RenderSink, TerminalRenderer};
