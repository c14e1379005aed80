mod types;
mod terms;
mod dynamics;
mod controller;

pub use types::{VehicleCommand, VehicleState, VehicleStepDebug};
pub use dynamics::{step_vehicle, step_vehicle_dbg};
pub use controller::{apply_command, VehicleController, VelocityInjection};
