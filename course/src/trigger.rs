//! Trigger protocol: how contacts with the chassis become survey events.
//!
//! Every trigger volume registered in a [`TriggerTable`] belongs to a zone
//! slot and carries one of three behaviours. Latches fire once on first
//! contact. Knockdowns kick a separate target prop on first contact and
//! fire once the target is confirmed down. Continue gates are latches that
//! only fire while the zone has at least one selection.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_6;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Body, BodyId, Contact, PhysicsWorld, Vec3f, VEHICLE_TAG};

/// Role of a trigger inside its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerSlot {
    PlayButton,
    StartGate,
    /// Answer option by index into the zone's option list.
    Option(usize),
    Continue,
    Booth,
    /// Decorative knockdown with no survey meaning.
    Decoration(usize),
}

/// Once fired, stays fired.
#[derive(Debug, Clone, Default)]
pub struct LatchTrigger {
    fired: bool,
}

impl LatchTrigger {
    /// Returns true only for the first contact.
    pub fn contact(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

/// How a knockdown decides its target is down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockdownConfirm {
    /// Tilt (|roll| + |pitch|) above the threshold, in radians.
    Tilt { threshold: f32 },
    /// Fixed delay after the hit.
    Delay { seconds: f32 },
}

#[derive(Debug, Clone)]
pub struct KnockdownTrigger {
    target: BodyId,
    impulse: Vec3f,
    impulse_point: Vec3f,
    confirm: KnockdownConfirm,
    reset_after: Option<f32>,
    hit: bool,
    toppled: bool,
    since_hit: f32,
    since_toppled: f32,
}

impl KnockdownTrigger {
    pub fn new(target: BodyId, impulse: Vec3f, impulse_point: Vec3f, confirm: KnockdownConfirm) -> Self {
        Self {
            target,
            impulse,
            impulse_point,
            confirm,
            reset_after: None,
            hit: false,
            toppled: false,
            since_hit: 0.0,
            since_toppled: 0.0,
        }
    }

    /// Stand the target back up this long after it was confirmed down.
    pub fn with_reset(mut self, seconds: f32) -> Self {
        self.reset_after = Some(seconds);
        self
    }

    pub fn target(&self) -> BodyId {
        self.target
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn is_toppled(&self) -> bool {
        self.toppled
    }

    /// First contact kicks the target. Later contacts do nothing.
    pub fn contact(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.hit {
            return false;
        }
        self.hit = true;
        self.since_hit = 0.0;
        world.apply_impulse(self.target, self.impulse, self.impulse_point);
        true
    }

    /// Per-frame check. Returns true on the frame the target is confirmed
    /// down; never again unless the reset delay stands the target back up.
    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) -> bool {
        if !self.hit {
            return false;
        }
        if self.toppled {
            if let Some(reset_after) = self.reset_after {
                self.since_toppled += dt;
                if self.since_toppled >= reset_after {
                    world.restore(self.target);
                    self.hit = false;
                    self.toppled = false;
                    self.since_toppled = 0.0;
                }
            }
            return false;
        }
        self.since_hit += dt;
        let down = match self.confirm {
            KnockdownConfirm::Tilt { threshold } => {
                world.tilt(self.target).is_some_and(|tilt| tilt > threshold)
            }
            KnockdownConfirm::Delay { seconds } => self.since_hit >= seconds,
        };
        if down {
            self.toppled = true;
            self.since_toppled = 0.0;
        }
        down
    }
}

/// Latch that only fires while `live`.
#[derive(Debug, Clone, Default)]
pub struct ContinueGate {
    latch: LatchTrigger,
    live: bool,
}

impl ContinueGate {
    pub fn contact(&mut self) -> bool {
        self.live && self.latch.contact()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

#[derive(Debug, Clone)]
pub enum TriggerKind {
    Latch(LatchTrigger),
    Knockdown(KnockdownTrigger),
    Continue(ContinueGate),
}

#[derive(Debug, Clone)]
pub struct TriggerRecord {
    pub zone: usize,
    pub slot: TriggerSlot,
    pub volume: BodyId,
    pub kind: TriggerKind,
}

/// A trigger reporting its event to the zone that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerFired {
    pub zone: usize,
    pub slot: TriggerSlot,
}

/// Display-facing view of a trigger's flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerIndicator {
    pub fired: bool,
    pub hit: bool,
    pub toppled: bool,
    pub live: bool,
}

/// Knockdown and gate parameters shared by every zone of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerTuning {
    pub topple_threshold: f32,
    pub confirm_delay: f32,
    pub decoration_reset: f32,
    pub knock_impulse: Vec3f,
}

impl Default for TriggerTuning {
    fn default() -> Self {
        Self {
            topple_threshold: FRAC_PI_6,
            confirm_delay: 0.3,
            decoration_reset: 5.0,
            knock_impulse: Vec3f::new(0.0, 0.0, -5.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TriggerTable {
    records: Vec<TriggerRecord>,
    by_volume: HashMap<BodyId, usize>,
}

impl TriggerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, zone: usize, slot: TriggerSlot, volume: BodyId, kind: TriggerKind) {
        self.by_volume.insert(volume, self.records.len());
        self.records.push(TriggerRecord {
            zone,
            slot,
            volume,
            kind,
        });
    }

    pub fn set_live(&mut self, zone: usize, live: bool) {
        for record in self.records.iter_mut().filter(|r| r.zone == zone) {
            if let TriggerKind::Continue(gate) = &mut record.kind {
                gate.live = live;
            }
        }
    }

    pub fn indicator(&self, zone: usize, slot: TriggerSlot) -> Option<TriggerIndicator> {
        let record = self
            .records
            .iter()
            .find(|r| r.zone == zone && r.slot == slot)?;
        Some(match &record.kind {
            TriggerKind::Latch(latch) => TriggerIndicator {
                fired: latch.is_fired(),
                ..Default::default()
            },
            TriggerKind::Knockdown(knock) => TriggerIndicator {
                fired: knock.is_toppled(),
                hit: knock.is_hit(),
                toppled: knock.is_toppled(),
                live: false,
            },
            TriggerKind::Continue(gate) => TriggerIndicator {
                fired: gate.latch.is_fired(),
                live: gate.is_live(),
                ..Default::default()
            },
        })
    }

    /// Route this frame's contacts to their triggers, then run knockdown
    /// confirmation. Contacts from anything but the chassis, with unknown
    /// volumes or with disabled volumes are dropped. Output order follows
    /// contact order, then registration order for knockdowns.
    pub fn dispatch(&mut self, contacts: &[Contact], world: &mut PhysicsWorld, dt: f32) -> Vec<TriggerFired> {
        let mut fired = Vec::new();
        for contact in contacts {
            if !world.body(contact.body).is_some_and(|b| b.name == VEHICLE_TAG) {
                continue;
            }
            if !world.body(contact.other).is_some_and(Body::is_enabled) {
                continue;
            }
            let Some(&index) = self.by_volume.get(&contact.other) else {
                continue;
            };
            let record = &mut self.records[index];
            let hit = match &mut record.kind {
                TriggerKind::Latch(latch) => latch.contact(),
                TriggerKind::Continue(gate) => gate.contact(),
                TriggerKind::Knockdown(knock) => {
                    if knock.contact(world) {
                        debug!(zone = record.zone, slot = ?record.slot, "knockdown target hit");
                    }
                    false
                }
            };
            if hit {
                debug!(zone = record.zone, slot = ?record.slot, "trigger fired");
                fired.push(TriggerFired {
                    zone: record.zone,
                    slot: record.slot,
                });
            }
        }

        for record in &mut self.records {
            if let TriggerKind::Knockdown(knock) = &mut record.kind {
                if knock.update(world, dt) {
                    debug!(zone = record.zone, slot = ?record.slot, "knockdown confirmed");
                    fired.push(TriggerFired {
                        zone: record.zone,
                        slot: record.slot,
                    });
                }
            }
        }
        fired
    }
}
