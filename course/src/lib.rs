//! Engine-free core of the survey drive.
//!
//! Everything that decides how the car moves and which answers get recorded
//! lives here: input sampling, the velocity-injection vehicle controller, a
//! small rigid-body world, the trigger protocol and the zone sequencer. The
//! crate intentionally avoids any ECS types so the frame loop can be driven
//! from tests without an app around it.

mod error;
pub use error::CourseError;

pub use bevy_math::{Quat as Quatf, Vec3 as Vec3f};

pub mod input;
pub use input::{Action, InputHandle, InputSampler, InputSnapshot, KeyTarget};

mod spec;
pub use spec::{
    ConfirmSpec, CourseSpec, GateOption, KnockdownSpec, PedestalOption, PropSpec, SolidSpec,
    VolumeSpec, ZoneKind, ZoneSpan, ZoneSpec,
};

pub mod builtins;

pub mod physics;
pub use physics::{Body, BodyId, BodyKind, Contact, PhysicsWorld, Shape, VEHICLE_TAG};

pub mod vehicle;
pub use vehicle::{
    step_vehicle, step_vehicle_dbg, VehicleCommand, VehicleController, VehicleState,
    VehicleStepDebug, VelocityInjection,
};

mod vehicle_specs;
pub use vehicle_specs::tunings;
pub use vehicle_specs::{RotationPolicy, SteeringSmoothing, VehicleTuning};

pub mod trigger;
pub use trigger::{
    KnockdownConfirm, TriggerFired, TriggerIndicator, TriggerSlot, TriggerTable, TriggerTuning,
};

pub mod survey;
pub use survey::{Answer, SurveyResponse};

pub mod zones;
pub use zones::{DeploymentMode, SequencerState, ZoneCompleted, ZoneEvent, ZoneSequencer, ZoneState};

mod mount;
pub use mount::{mount_course, MountedCourse};
