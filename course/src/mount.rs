use tracing::{debug, info};

use crate::trigger::{ContinueGate, KnockdownTrigger, LatchTrigger, TriggerKind};
use crate::{
    Body, BodyId, BodyKind, ConfirmSpec, CourseSpec, KnockdownConfirm, KnockdownSpec, PhysicsWorld,
    SolidSpec, TriggerSlot, TriggerTable, TriggerTuning, VolumeSpec, ZoneKind, ZoneSequencer,
};

/// Course bodies living in a physics world, grouped by owning zone.
#[derive(Debug)]
pub struct MountedCourse {
    triggers: TriggerTable,
    zone_bodies: Vec<Vec<BodyId>>,
    continue_gates: Vec<Option<BodyId>>,
}

/// Create every wall, zone solid, trigger volume and prop of `course` in
/// `world`. All zone bodies start enabled; call [`MountedCourse::sync`] to
/// apply the sequencer's view before the first frame.
pub fn mount_course(course: &CourseSpec, tuning: &TriggerTuning, world: &mut PhysicsWorld) -> MountedCourse {
    for wall in &course.walls {
        insert_solid(world, wall);
    }

    let mut mounted = MountedCourse {
        triggers: TriggerTable::new(),
        zone_bodies: vec![Vec::new(); course.zones.len()],
        continue_gates: vec![None; course.zones.len()],
    };

    for (zone, spec) in course.zones.iter().enumerate() {
        let mut bodies = Vec::new();
        for solid in &spec.solids {
            bodies.push(insert_solid(world, solid));
        }

        match &spec.kind {
            ZoneKind::Intro {
                play_button,
                start_gate,
                decorations,
            } => {
                let button = insert_volume(world, &format!("{}:play", spec.id), play_button);
                mounted.triggers.register(zone, TriggerSlot::PlayButton, button, latch());
                let gate = insert_volume(world, &format!("{}:start", spec.id), start_gate);
                mounted.triggers.register(zone, TriggerSlot::StartGate, gate, latch());
                bodies.extend([button, gate]);
                for (i, deco) in decorations.iter().enumerate() {
                    let tilt = KnockdownConfirm::Tilt {
                        threshold: tuning.topple_threshold,
                    };
                    let (volume, target, knock) = insert_knockdown(world, &format!("{}:deco{i}", spec.id), deco, tuning, tilt);
                    let knock = knock.with_reset(tuning.decoration_reset);
                    mounted
                        .triggers
                        .register(zone, TriggerSlot::Decoration(i), volume, TriggerKind::Knockdown(knock));
                    bodies.extend([volume, target]);
                }
            }
            ZoneKind::SingleChoice { options } => {
                for (i, option) in options.iter().enumerate() {
                    let volume = insert_volume(world, &format!("{}:{}", spec.id, option.id), &option.volume);
                    mounted.triggers.register(zone, TriggerSlot::Option(i), volume, latch());
                    bodies.push(volume);
                }
            }
            ZoneKind::MultiSelect {
                options,
                continue_gate,
                confirm,
            } => {
                let confirm = match confirm {
                    ConfirmSpec::Tilt => KnockdownConfirm::Tilt {
                        threshold: tuning.topple_threshold,
                    },
                    ConfirmSpec::Delay => KnockdownConfirm::Delay {
                        seconds: tuning.confirm_delay,
                    },
                };
                for (i, option) in options.iter().enumerate() {
                    let name = format!("{}:{}", spec.id, option.id);
                    let (volume, target, knock) = insert_knockdown(world, &name, &option.knockdown, tuning, confirm);
                    mounted
                        .triggers
                        .register(zone, TriggerSlot::Option(i), volume, TriggerKind::Knockdown(knock));
                    bodies.extend([volume, target]);
                }
                let gate = insert_volume(world, &format!("{}:continue", spec.id), continue_gate);
                mounted.triggers.register(
                    zone,
                    TriggerSlot::Continue,
                    gate,
                    TriggerKind::Continue(ContinueGate::default()),
                );
                mounted.continue_gates[zone] = Some(gate);
            }
            ZoneKind::FreeText { booth } => {
                let volume = insert_volume(world, &format!("{}:booth", spec.id), booth);
                mounted.triggers.register(zone, TriggerSlot::Booth, volume, latch());
                bodies.push(volume);
            }
        }
        debug!(zone, id = %spec.id, bodies = bodies.len(), "zone mounted");
        mounted.zone_bodies[zone] = bodies;
    }

    info!(zones = course.zones.len(), bodies = world.len(), "course mounted");
    mounted
}

impl MountedCourse {
    pub fn triggers(&self) -> &TriggerTable {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerTable {
        &mut self.triggers
    }

    pub fn zone_bodies(&self, zone: usize) -> &[BodyId] {
        self.zone_bodies.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Enable the bodies of active zones, disable the rest, and arm each
    /// continue gate only while its zone has a selection.
    pub fn sync(&mut self, sequencer: &ZoneSequencer, world: &mut PhysicsWorld) {
        for (zone, bodies) in self.zone_bodies.iter().enumerate() {
            let active = sequencer.is_active(zone);
            for &body in bodies {
                world.set_enabled(body, active);
            }
        }
        for (zone, gate) in self.continue_gates.iter().enumerate() {
            let Some(gate) = *gate else {
                continue;
            };
            let live = sequencer.continue_live(zone);
            self.triggers.set_live(zone, live);
            world.set_enabled(gate, live);
        }
    }
}

fn latch() -> TriggerKind {
    TriggerKind::Latch(LatchTrigger::default())
}

fn insert_solid(world: &mut PhysicsWorld, solid: &SolidSpec) -> BodyId {
    world.insert(Body::new(
        solid.name.clone(),
        BodyKind::Static,
        solid.volume.shape,
        solid.volume.position,
    ))
}

fn insert_volume(world: &mut PhysicsWorld, name: &str, volume: &VolumeSpec) -> BodyId {
    world.insert(Body::new(name, BodyKind::Trigger, volume.shape, volume.position))
}

fn insert_knockdown(
    world: &mut PhysicsWorld,
    name: &str,
    spec: &KnockdownSpec,
    tuning: &TriggerTuning,
    confirm: KnockdownConfirm,
) -> (BodyId, BodyId, KnockdownTrigger) {
    let volume = insert_volume(world, name, &spec.volume);
    let target = world.insert(
        Body::new(
            format!("{name}:target"),
            BodyKind::Prop,
            spec.target.volume.shape,
            spec.target.volume.position,
        )
        .with_mass(spec.target.mass)
        .with_damping(spec.target.linear_damping, spec.target.angular_damping),
    );
    let knock = KnockdownTrigger::new(target, tuning.knock_impulse, spec.target.impulse_point, confirm);
    (volume, target, knock)
}
