//! Headless frame loop for the survey drive.
//!
//! Wraps the engine-free `course` crate in a `bevy_app` schedule: input is
//! sampled, physics stepped, the controller writes the chassis, triggers are
//! dispatched to zones, completion timers run, and telemetry is published,
//! in that order, once per `app.update()`.

mod args;
mod config;
mod script;
mod session;
pub mod systems;

use bevy_app::{App, Startup, Update};
use bevy_ecs::prelude::*;
use bevy_time::Time;
use course::{mount_course, CourseError, CourseSpec, InputSampler, PhysicsWorld, ZoneSequencer};

pub use args::{Args, ModeArg};
pub use config::{load_config, Config};
pub use script::{load_script, DriveScript, ScriptStep, SubmitText};
pub use session::Session;
pub use systems::{VehiclePose, VehicleTelemetry};

use systems::*;

/// Build the simulation app for `course`. Nothing runs until `update()`;
/// the first update also spawns the vehicle.
pub fn build_sim_app(cfg: Config, course: &CourseSpec, input: InputSampler) -> Result<App, CourseError> {
    let sequencer = ZoneSequencer::new(course, cfg.mode)?;
    let mut world = PhysicsWorld::new();
    let mounted = mount_course(course, &cfg.triggers, &mut world);

    let mut app = App::new();
    app.insert_resource(cfg)
        .insert_resource(InputSource(input))
        .insert_resource(Physics(world))
        .insert_resource(Course(mounted))
        .insert_resource(Sequencer(sequencer))
        .init_resource::<Time>()
        .init_resource::<CurrentInput>()
        .init_resource::<FrameContacts>()
        .init_resource::<SurveyLog>()
        .init_resource::<VehicleTelemetry>();

    app.add_systems(Startup, (spawn_vehicle, sync_course).chain());
    app.add_systems(
        Update,
        (
            sample_input,
            step_physics,
            drive_vehicle,
            dispatch_triggers,
            tick_sequencer,
            sync_course,
            publish_telemetry,
        )
            .chain()
            .in_set(FrameSet),
    );
    Ok(app)
}
