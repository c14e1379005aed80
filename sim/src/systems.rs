use bevy_ecs::prelude::*;
use bevy_time::Time;
use course::{
    Body, BodyId, BodyKind, Contact, InputSampler, InputSnapshot, MountedCourse, PhysicsWorld,
    Quatf, Shape, Vec3f, VehicleController, VehicleState, VehicleStepDebug, VelocityInjection,
    ZoneCompleted, ZoneEvent, ZoneSequencer, VEHICLE_TAG,
};
use tracing::{debug, info};

use crate::Config;

#[derive(Component)]
pub struct Vehicle;

/// The controller driving this vehicle.
#[derive(Component)]
pub struct Drive(pub Box<dyn VehicleController>);

/// Chassis body in the physics world; `None` until created.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct VehicleBody(pub Option<BodyId>);

#[derive(Resource)]
pub struct InputSource(pub InputSampler);

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CurrentInput(pub InputSnapshot);

#[derive(Resource, Default)]
pub struct Physics(pub PhysicsWorld);

#[derive(Resource, Default)]
pub struct FrameContacts(pub Vec<Contact>);

#[derive(Resource)]
pub struct Course(pub MountedCourse);

#[derive(Resource)]
pub struct Sequencer(pub ZoneSequencer);

/// Zone events and completions accumulated since the session started.
#[derive(Resource, Default)]
pub struct SurveyLog {
    pub events: Vec<ZoneEvent>,
    pub completions: Vec<ZoneCompleted>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub position: Vec3f,
    pub rotation: Quatf,
    pub velocity: Vec3f,
}

/// What presentation reads after the frame: pose, controller state, and
/// the last step's breakdown.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct VehicleTelemetry {
    pub pose: Option<VehiclePose>,
    pub state: VehicleState,
    pub step: Option<VehicleStepDebug>,
    pub frozen: bool,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameSet;

pub fn spawn_vehicle(mut commands: Commands, cfg: Res<Config>, mut physics: ResMut<Physics>) {
    let tuning = cfg.vehicle.clone();
    let chassis = Body::new(
        VEHICLE_TAG,
        BodyKind::Dynamic,
        Shape::Cuboid {
            half_extents: tuning.chassis_half_extents,
        },
        tuning.spawn,
    )
    .with_mass(tuning.mass)
    .with_damping(tuning.linear_damping, tuning.angular_damping);
    let id = physics.0.insert(chassis);
    info!(?id, spawn = ?tuning.spawn, "Vehicle spawned");
    commands.spawn((
        Vehicle,
        VehicleBody(Some(id)),
        Drive(Box::new(VelocityInjection::new(tuning))),
    ));
}

pub fn sample_input(source: Res<InputSource>, mut current: ResMut<CurrentInput>) {
    current.0 = source.0.sample();
}

pub fn step_physics(time: Res<Time>, mut physics: ResMut<Physics>, mut contacts: ResMut<FrameContacts>) {
    contacts.0 = physics.0.step(time.delta_secs());
}

pub fn drive_vehicle(
    time: Res<Time>,
    input: Res<CurrentInput>,
    sequencer: Res<Sequencer>,
    mut physics: ResMut<Physics>,
    mut q: Query<(&mut Drive, &VehicleBody), With<Vehicle>>,
) {
    let frozen = sequencer.0.wants_freeze();
    for (mut drive, body) in &mut q {
        if drive.0.is_frozen() != frozen {
            info!(frozen, "Vehicle freeze changed");
            drive.0.set_frozen(frozen);
        }
        let chassis = match body.0 {
            Some(id) => physics.0.body_mut(id),
            None => None,
        };
        if let Some(cmd) = drive.0.drive(input.0, time.delta_secs(), chassis) {
            if cmd.reset {
                info!("Vehicle reset to spawn");
            }
        }
    }
}

pub fn dispatch_triggers(
    time: Res<Time>,
    contacts: Res<FrameContacts>,
    mut physics: ResMut<Physics>,
    mut course: ResMut<Course>,
    mut sequencer: ResMut<Sequencer>,
    mut log: ResMut<SurveyLog>,
) {
    let fired = course
        .0
        .triggers_mut()
        .dispatch(&contacts.0, &mut physics.0, time.delta_secs());
    for hit in fired {
        if let Some(event) = sequencer.0.handle(hit) {
            debug!(?event, "Zone event");
            log.events.push(event);
        }
    }
}

pub fn tick_sequencer(time: Res<Time>, mut sequencer: ResMut<Sequencer>, mut log: ResMut<SurveyLog>) {
    let done = sequencer.0.advance(time.delta_secs());
    log.completions.extend(done);
}

pub fn sync_course(sequencer: Res<Sequencer>, mut course: ResMut<Course>, mut physics: ResMut<Physics>) {
    course.0.sync(&sequencer.0, &mut physics.0);
}

pub fn publish_telemetry(
    physics: Res<Physics>,
    q: Query<(&Drive, &VehicleBody), With<Vehicle>>,
    mut telemetry: ResMut<VehicleTelemetry>,
) {
    for (drive, body) in &q {
        let pose = body.0.and_then(|id| physics.0.body(id)).map(|b| VehiclePose {
            position: b.position,
            rotation: b.rotation,
            velocity: b.velocity,
        });
        *telemetry = VehicleTelemetry {
            pose,
            state: drive.0.state(),
            step: drive.0.telemetry(),
            frozen: drive.0.is_frozen(),
        };
    }
}
