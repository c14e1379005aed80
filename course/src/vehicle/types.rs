use crate::InputSnapshot;

/// Controller state carried between frames.
///
/// Heading is a yaw angle about world +Y. Heading 0 faces world -Z and the
/// car moves along `(-sin h, 0, -cos h)`; a positive steering angle while
/// moving forward increases heading (turns left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleState {
    /// Signed speed (m/s). Negative is reverse.
    pub speed: f32,
    pub steering_angle: f32,
    pub target_steering_angle: f32,
    pub heading: f32,
}

/// What the controller wants the chassis body to do this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleCommand {
    pub yaw: f32,
    pub velocity_x: f32,
    pub velocity_z: f32,
    /// Teleport back to spawn and zero all motion.
    pub reset: bool,
}

impl VehicleCommand {
    pub(crate) fn from_state(state: &VehicleState) -> Self {
        Self {
            yaw: state.heading,
            velocity_x: -state.heading.sin() * state.speed,
            velocity_z: -state.heading.cos() * state.speed,
            reset: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleStepDebug {
    pub dt: f32,
    pub inputs: InputSnapshot,
    pub speed_after_throttle: f32,
    pub speed_after_brake: f32,
    pub steer_blend: f32,
    pub speed_factor: f32,
    pub heading_rate: f32,
    pub heading_delta: f32,
    /// Final clamp had to pull speed or steering back into range.
    pub clamped: bool,
    pub reset: bool,
}
