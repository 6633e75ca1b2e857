pub mod app_command;
pub mod show;

pub use app_command::{AppCommand, USAGE};
