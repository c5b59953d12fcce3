mod error;
mod gateway;
mod rig;
mod types;

pub use error::ServoError;
pub use gateway::{GatewayTimeouts, ServoGateway, DEFAULT_ENDPOINT};
pub use rig::{AxisState, CommandOrigin, Rig, RigSnapshot};
pub use types::{AngleSource, Axis, ServoAngle};
