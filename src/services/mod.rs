// Service module exports

pub mod countdown;
pub mod notification;
pub mod schedule;
pub mod settings;
