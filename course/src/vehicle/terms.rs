use crate::{InputSnapshot, SteeringSmoothing, VehicleTuning};

// ----- Longitudinal -----

/// Move `speed` toward zero by `step` without crossing it.
pub(super) fn approach_zero(speed: f32, step: f32) -> f32 {
    if speed > 0.0 {
        (speed - step).max(0.0)
    } else if speed < 0.0 {
        (speed + step).min(0.0)
    } else {
        0.0
    }
}

pub(super) fn throttle(tuning: &VehicleTuning, input: InputSnapshot, speed: f32, dt: f32) -> f32 {
    if input.forward {
        (speed + tuning.acceleration * dt).min(tuning.max_speed)
    } else if input.backward {
        (speed - tuning.acceleration * dt).max(-tuning.max_reverse)
    } else {
        approach_zero(speed, tuning.friction * dt)
    }
}

pub(super) fn brake(tuning: &VehicleTuning, speed: f32, dt: f32) -> f32 {
    approach_zero(speed, tuning.braking * dt)
}

// ----- Steering -----

pub(super) fn steering_target(tuning: &VehicleTuning, input: InputSnapshot) -> f32 {
    if input.left {
        tuning.max_steer_angle
    } else if input.right {
        -tuning.max_steer_angle
    } else {
        0.0
    }
}

/// Fraction of the remaining steering error closed this frame.
pub(super) fn steer_blend(tuning: &VehicleTuning, dt: f32) -> f32 {
    match tuning.smoothing {
        SteeringSmoothing::FrameLinear => tuning.steer_speed * dt,
        SteeringSmoothing::Exponential => 1.0 - (-tuning.steer_speed * dt).exp(),
    }
}

pub(super) fn speed_factor(tuning: &VehicleTuning, speed: f32) -> f32 {
    (speed.abs() / tuning.max_speed.max(f32::EPSILON)).min(1.0)
}

/// Signed heading rate (rad/s). Zero below the speed or steering epsilon.
/// Reversing flips the sign so the car turns like a real car backing up.
pub(super) fn heading_rate(tuning: &VehicleTuning, speed: f32, steering: f32) -> f32 {
    if speed.abs() <= tuning.speed_epsilon || steering.abs() <= tuning.steer_epsilon {
        return 0.0;
    }
    let effective = tuning.turn_rate * speed_factor(tuning, speed) * tuning.turn_response;
    let direction = if speed >= 0.0 { 1.0 } else { -1.0 };
    steering * effective * direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunings;

    #[test]
    fn approach_zero_never_crosses() {
        assert_eq!(approach_zero(0.2, 1.0), 0.0);
        assert_eq!(approach_zero(-0.2, 1.0), 0.0);
        assert_eq!(approach_zero(5.0, 1.0), 4.0);
        assert_eq!(approach_zero(-5.0, 1.0), -4.0);
    }

    #[test]
    fn forward_wins_over_backward() {
        let tuning = tunings::arcade_cart();
        let input = InputSnapshot {
            forward: true,
            backward: true,
            ..Default::default()
        };
        assert!(throttle(&tuning, input, 0.0, 0.1) > 0.0);
    }

    #[test]
    fn no_turn_below_epsilons() {
        let tuning = tunings::arcade_cart();
        assert_eq!(heading_rate(&tuning, 0.05, 0.6), 0.0);
        assert_eq!(heading_rate(&tuning, 10.0, 0.005), 0.0);
        assert!(heading_rate(&tuning, 10.0, 0.6) > 0.0);
        assert!(heading_rate(&tuning, -10.0, 0.6) < 0.0);
    }

    #[test]
    fn exponential_blend_stays_below_one() {
        let tuning = tunings::smooth_steering_cart();
        let blend = steer_blend(&tuning, 1.0);
        assert!(blend > 0.99 && blend < 1.0, "blend={blend}");
    }
}
