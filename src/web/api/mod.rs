pub mod command;
pub mod error;
pub mod notices;
pub mod servo;
pub mod solar;
pub mod tracking;
pub mod weather;
