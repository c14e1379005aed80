use serde::{Deserialize, Serialize};

use crate::Vec3f;

/// How the steering angle chases its target each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringSmoothing {
    /// `angle += (target - angle) * steer_speed * dt`. Frame-rate dependent.
    #[default]
    FrameLinear,
    /// `angle += (target - angle) * (1 - exp(-steer_speed * dt))`.
    Exponential,
}

/// What the write-back does with chassis spin. `Locked` forces upright yaw
/// and zero angular velocity every frame. `Free` only overrides yaw, so
/// roll and pitch picked up from clipping a curb or ledge persist and decay
/// through angular damping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    #[default]
    Locked,
    Free,
}

/// Tuning for the arcade vehicle controller and its chassis body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Forward speed cap (m/s).
    pub max_speed: f32,
    /// Reverse speed cap, as a positive magnitude (m/s).
    pub max_reverse: f32,
    pub acceleration: f32,
    pub braking: f32,
    /// Coast-down rate toward zero with no throttle (m/s²).
    pub friction: f32,
    /// Steering angle limit (rad).
    pub max_steer_angle: f32,
    pub steer_speed: f32,
    pub turn_rate: f32,
    /// Extra gain on the heading rate.
    pub turn_response: f32,
    pub speed_epsilon: f32,
    pub steer_epsilon: f32,
    pub smoothing: SteeringSmoothing,
    pub rotation: RotationPolicy,
    pub spawn: Vec3f,
    pub chassis_half_extents: Vec3f,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        tunings::arcade_cart()
    }
}

pub mod tunings {
    use super::*;

    // Arcade cart used throughout the survey course
    pub fn arcade_cart() -> VehicleTuning {
        VehicleTuning {
            max_speed: 35.0,
            max_reverse: 20.0,
            acceleration: 60.0,
            braking: 100.0,
            friction: 20.0,
            max_steer_angle: 0.6,
            steer_speed: 8.0,
            turn_rate: 2.5,
            turn_response: 2.0,
            speed_epsilon: 0.1,
            steer_epsilon: 0.01,
            smoothing: SteeringSmoothing::FrameLinear,
            rotation: RotationPolicy::Locked,
            spawn: Vec3f::new(0.0, 1.0, 0.0),
            // 1.5 x 0.6 x 3 box
            chassis_half_extents: Vec3f::new(0.75, 0.3, 1.5),
            mass: 1.0,
            linear_damping: 0.3,
            angular_damping: 0.5,
        }
    }

    /// Same cart with frame-rate independent steering.
    pub fn smooth_steering_cart() -> VehicleTuning {
        VehicleTuning {
            smoothing: SteeringSmoothing::Exponential,
            ..arcade_cart()
        }
    }
}
