use bevy_math::EulerRot;
use tracing::debug;

use super::dynamics::step_vehicle_dbg;
use super::types::{VehicleCommand, VehicleState, VehicleStepDebug};
use crate::{Body, InputSnapshot, Quatf, RotationPolicy, Vec3f, VehicleTuning};

/// A strategy that turns sampled input into motion of the chassis body.
pub trait VehicleController: Send + Sync {
    /// Advance one frame. `body` is `None` until the chassis exists; the
    /// call is then a no-op and returns `None`.
    fn drive(
        &mut self,
        input: InputSnapshot,
        dt: f32,
        body: Option<&mut Body>,
    ) -> Option<VehicleCommand>;

    fn state(&self) -> VehicleState;

    /// While frozen, throttle and steering input are ignored and the car
    /// holds still. Reset still works.
    fn set_frozen(&mut self, frozen: bool);

    fn is_frozen(&self) -> bool;

    fn freeze(&mut self) {
        self.set_frozen(true);
    }

    fn unfreeze(&mut self) {
        self.set_frozen(false);
    }

    fn telemetry(&self) -> Option<VehicleStepDebug> {
        None
    }
}

/// Writes the chassis velocity and yaw directly every frame. Gravity keeps
/// acting on the vertical component, which the controller carries through.
#[derive(Debug, Clone)]
pub struct VelocityInjection {
    tuning: VehicleTuning,
    state: VehicleState,
    frozen: bool,
    last_step: VehicleStepDebug,
}

impl VelocityInjection {
    pub fn new(tuning: VehicleTuning) -> Self {
        Self {
            tuning,
            state: VehicleState::default(),
            frozen: false,
            last_step: VehicleStepDebug::default(),
        }
    }
}

impl VehicleController for VelocityInjection {
    fn drive(
        &mut self,
        input: InputSnapshot,
        dt: f32,
        body: Option<&mut Body>,
    ) -> Option<VehicleCommand> {
        let body = body?;
        if dt <= 0.0 {
            return None;
        }
        let input = if self.frozen {
            self.state.speed = 0.0;
            InputSnapshot {
                reset: input.reset,
                ..InputSnapshot::default()
            }
        } else {
            input
        };

        let mut dbg = VehicleStepDebug::default();
        let command = step_vehicle_dbg(&self.tuning, input, &mut self.state, dt, Some(&mut dbg));
        self.last_step = dbg;
        apply_command(&self.tuning, &command, body);
        if command.reset {
            debug!(spawn = ?self.tuning.spawn, "chassis reset to spawn");
        }
        Some(command)
    }

    fn state(&self) -> VehicleState {
        self.state
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn telemetry(&self) -> Option<VehicleStepDebug> {
        Some(self.last_step)
    }
}

/// Write a controller command onto the chassis body.
pub fn apply_command(tuning: &VehicleTuning, command: &VehicleCommand, body: &mut Body) {
    if command.reset {
        body.position = tuning.spawn;
        body.velocity = Vec3f::ZERO;
        body.angular_velocity = Vec3f::ZERO;
        body.rotation = Quatf::IDENTITY;
        return;
    }
    body.velocity = Vec3f::new(command.velocity_x, body.velocity.y, command.velocity_z);
    match tuning.rotation {
        RotationPolicy::Locked => {
            body.rotation = Quatf::from_rotation_y(command.yaw);
            body.angular_velocity = Vec3f::ZERO;
        }
        RotationPolicy::Free => {
            // Yaw is still absolute; pitch and roll from contacts survive.
            let (_, pitch, roll) = body.rotation.to_euler(EulerRot::YXZ);
            body.rotation = Quatf::from_euler(EulerRot::YXZ, command.yaw, pitch, roll);
            body.angular_velocity.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tunings, BodyKind, Shape, VEHICLE_TAG};

    fn chassis() -> Body {
        let tuning = tunings::arcade_cart();
        Body::new(
            VEHICLE_TAG,
            BodyKind::Dynamic,
            Shape::Cuboid {
                half_extents: tuning.chassis_half_extents,
            },
            tuning.spawn,
        )
    }

    #[test]
    fn missing_body_is_a_noop() {
        let mut ctl = VelocityInjection::new(tunings::arcade_cart());
        let input = InputSnapshot::default().with(crate::Action::Forward, true);
        assert!(ctl.drive(input, 1.0 / 60.0, None).is_none());
        assert_eq!(ctl.state(), VehicleState::default());
    }

    #[test]
    fn vertical_velocity_is_preserved() {
        let mut ctl = VelocityInjection::new(tunings::arcade_cart());
        let mut body = chassis();
        body.velocity = Vec3f::new(3.0, -2.5, 3.0);
        body.angular_velocity = Vec3f::new(0.4, 0.1, 0.0);
        let input = InputSnapshot::default().with(crate::Action::Forward, true);
        ctl.drive(input, 0.1, Some(&mut body));
        assert_eq!(body.velocity.y, -2.5);
        assert!((body.velocity.z + 6.0).abs() < 1e-5, "vz={}", body.velocity.z);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.angular_velocity, Vec3f::ZERO);
    }

    #[test]
    fn frozen_car_holds_still_until_released() {
        let mut ctl = VelocityInjection::new(tunings::arcade_cart());
        let mut body = chassis();
        let forward = InputSnapshot::default().with(crate::Action::Forward, true);
        ctl.drive(forward, 0.1, Some(&mut body));
        assert!(ctl.state().speed > 0.0);

        ctl.freeze();
        for _ in 0..10 {
            ctl.drive(forward, 0.1, Some(&mut body));
        }
        assert_eq!(ctl.state().speed, 0.0);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);

        ctl.unfreeze();
        ctl.drive(forward, 0.1, Some(&mut body));
        assert!(ctl.state().speed > 0.0);
    }

    #[test]
    fn reset_teleports_body_to_spawn() {
        let tuning = tunings::arcade_cart();
        let mut ctl = VelocityInjection::new(tuning.clone());
        let mut body = chassis();
        body.position = Vec3f::new(12.0, 0.3, -80.0);
        body.velocity = Vec3f::new(1.0, -1.0, -20.0);
        let reset = InputSnapshot::default().with(crate::Action::Reset, true);
        let cmd = ctl.drive(reset, 1.0 / 60.0, Some(&mut body)).map(|c| c.reset);
        assert_eq!(cmd, Some(true));
        assert_eq!(body.position, tuning.spawn);
        assert_eq!(body.velocity, Vec3f::ZERO);
        assert_eq!(body.rotation, Quatf::IDENTITY);
        assert_eq!(ctl.state(), VehicleState::default());
    }

    #[test]
    fn free_rotation_keeps_contact_tilt() {
        let mut body = chassis();
        body.rotation = Quatf::from_rotation_z(0.2);
        body.angular_velocity = Vec3f::new(0.0, 1.0, -0.5);
        let command = VehicleCommand {
            yaw: 0.3,
            velocity_x: 0.0,
            velocity_z: -5.0,
            reset: false,
        };

        let free = VehicleTuning {
            rotation: RotationPolicy::Free,
            ..tunings::arcade_cart()
        };
        let mut tipped = body.clone();
        apply_command(&free, &command, &mut tipped);
        let (yaw, _, roll) = tipped.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw - 0.3).abs() < 1e-5 && (roll - 0.2).abs() < 1e-5);
        assert_eq!(tipped.angular_velocity, Vec3f::new(0.0, 0.0, -0.5));

        apply_command(&tunings::arcade_cart(), &command, &mut body);
        assert_eq!(body.rotation, Quatf::from_rotation_y(0.3));
        assert_eq!(body.angular_velocity, Vec3f::ZERO);
    }
}
