mod mapper;
mod position;
mod types;

pub use mapper::{to_servo_angles, ServoAngles};
pub use position::{compute, SolarOptions};
pub use types::SolarPosition;
