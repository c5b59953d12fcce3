mod command;
mod context;
mod error;
mod gate;
mod safety;

pub use command::ControlCommand;
pub use context::{CommandOutcome, ControlContext, WeatherOutcome};
pub use error::ControlError;
pub use safety::SafetyAction;
