//! BDD step definitions for buildwatch service

pub mod message_steps;
pub mod monitor_steps;
