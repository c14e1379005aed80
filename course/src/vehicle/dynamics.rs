use super::terms::*;
use super::types::{VehicleCommand, VehicleState, VehicleStepDebug};
use crate::{InputSnapshot, VehicleTuning};

/// Advance the arcade controller by one frame and return the body command.
/// See `step_vehicle_dbg` for telemetry.
pub fn step_vehicle(
    tuning: &VehicleTuning,
    input: InputSnapshot,
    state: &mut VehicleState,
    dt: f32,
) -> VehicleCommand {
    step_vehicle_dbg(tuning, input, state, dt, None)
}

/// Variant of `step_vehicle` that fills out an optional debug telemetry struct.
///
/// Order per frame: throttle or coast, brake, steering target and smoothing,
/// heading integration, range clamp, reset. A non-positive `dt` leaves the
/// state untouched.
pub fn step_vehicle_dbg(
    tuning: &VehicleTuning,
    input: InputSnapshot,
    state: &mut VehicleState,
    dt: f32,
    mut dbg: Option<&mut VehicleStepDebug>,
) -> VehicleCommand {
    if dt <= 0.0 {
        return VehicleCommand::from_state(state);
    }

    let after_throttle = throttle(tuning, input, state.speed, dt);
    let mut speed = after_throttle;
    if input.brake {
        speed = brake(tuning, speed, dt);
    }

    state.target_steering_angle = steering_target(tuning, input);
    let blend = steer_blend(tuning, dt);
    let smoothed = state.steering_angle + (state.target_steering_angle - state.steering_angle) * blend;

    // Smoothing overshoots when steer_speed * dt > 1; clamp before the angle
    // drives the heading. min/max rather than f32::clamp, which panics on an
    // inverted or NaN limit.
    let max_steer = tuning.max_steer_angle.abs();
    let max_reverse = tuning.max_reverse.abs();
    let clamped_steer = smoothed.max(-max_steer).min(max_steer);
    let clamped_speed = speed.max(-max_reverse).min(tuning.max_speed);
    let clamped = clamped_speed != speed || clamped_steer != smoothed;
    state.steering_angle = clamped_steer;
    state.speed = clamped_speed;

    let rate = heading_rate(tuning, state.speed, state.steering_angle);
    let heading_delta = rate * dt;
    state.heading += heading_delta;

    let mut command = VehicleCommand::from_state(state);
    if input.reset {
        *state = VehicleState::default();
        command = VehicleCommand {
            yaw: 0.0,
            velocity_x: 0.0,
            velocity_z: 0.0,
            reset: true,
        };
    }

    if let Some(d) = dbg.as_deref_mut() {
        d.dt = dt;
        d.inputs = input;
        d.speed_after_throttle = after_throttle;
        d.speed_after_brake = speed;
        d.steer_blend = blend;
        d.speed_factor = speed_factor(tuning, speed);
        d.heading_rate = rate;
        d.heading_delta = heading_delta;
        d.clamped = clamped;
        d.reset = input.reset;
    }

    command
}
