//! Minimal rigid-body world for the course.
//!
//! Only what the drive needs: a gravity-bound chassis that slides over a flat
//! ground plane and is pushed out of static solids, trigger volumes that
//! report contacts, and props that tip over after an impulse. Contacts are
//! reported for every frame a dynamic body overlaps another enabled body;
//! `began` marks the first frame of each episode.

mod body;
mod shape;

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use tracing::trace;

pub use body::{Body, BodyKind};
pub use shape::{Aabb, Shape};

use crate::{Quatf, Vec3f};

/// Name carried by the chassis body. Contact consumers ignore anything else.
pub const VEHICLE_TAG: &str = "chassis";

pub const GRAVITY: f32 = 9.81;

// Below this tilt a prop counts as upright and gravity exerts no tipping torque.
const TIP_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A dynamic body overlapping another enabled body during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub body: BodyId,
    pub other: BodyId,
    /// First frame of this contact episode.
    pub began: bool,
}

#[derive(Debug)]
pub struct PhysicsWorld {
    bodies: Vec<Body>,
    touching: HashSet<(BodyId, BodyId)>,
    gravity: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            touching: HashSet::new(),
            gravity: GRAVITY,
        }
    }

    pub fn insert(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        trace!(?id, name = %body.name, kind = ?body.kind, "body inserted");
        self.bodies.push(body);
        id
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// Disabled bodies neither move nor produce contacts. Disabling ends any
    /// contact episode the body was part of.
    pub fn set_enabled(&mut self, id: BodyId, enabled: bool) {
        let Some(body) = self.bodies.get_mut(id.index()) else {
            return;
        };
        if body.enabled == enabled {
            return;
        }
        body.enabled = enabled;
        if !enabled {
            self.touching.retain(|&(a, b)| a != id && b != id);
        }
    }

    /// Apply an impulse at a point given in the body's local frame.
    /// Returns false for unknown ids and bodies that cannot move.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec3f, local_point: Vec3f) -> bool {
        let Some(body) = self.bodies.get_mut(id.index()) else {
            return false;
        };
        if !matches!(body.kind, BodyKind::Dynamic | BodyKind::Prop) || body.mass <= 0.0 {
            return false;
        }
        body.resting = false;
        body.velocity += impulse / body.mass;
        let arm = body.rotation * local_point;
        let inertia = body.shape.inertia(body.mass).max(Vec3f::splat(1e-6));
        body.angular_velocity += arm.cross(impulse) / inertia;
        true
    }

    pub fn tilt(&self, id: BodyId) -> Option<f32> {
        self.body(id).map(Body::tilt)
    }

    /// Return a body to its creation pose and clear its motion.
    pub fn restore(&mut self, id: BodyId) {
        if let Some(body) = self.bodies.get_mut(id.index()) {
            body.restore();
        }
    }

    /// Advance every enabled body and report contacts. A non-positive `dt`
    /// is a no-op.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        if dt <= 0.0 {
            return Vec::new();
        }
        let gravity = self.gravity;
        for body in self.bodies.iter_mut().filter(|b| b.enabled) {
            match body.kind {
                BodyKind::Dynamic => integrate_dynamic(body, gravity, dt),
                BodyKind::Prop => integrate_prop(body, gravity, dt),
                BodyKind::Static | BodyKind::Trigger => {}
            }
        }
        self.resolve_solids();
        self.collect_contacts()
    }

    fn resolve_solids(&mut self) {
        for i in 0..self.bodies.len() {
            if !self.bodies[i].enabled || self.bodies[i].kind != BodyKind::Dynamic {
                continue;
            }
            for j in 0..self.bodies.len() {
                let solid = &self.bodies[j];
                if i == j || !solid.enabled || solid.kind != BodyKind::Static {
                    continue;
                }
                let bounds = solid.aabb();
                push_out(&mut self.bodies[i], &bounds);
            }
        }
    }

    fn collect_contacts(&mut self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let mut touching = HashSet::new();
        for (i, a) in self.bodies.iter().enumerate() {
            if !a.enabled || a.kind != BodyKind::Dynamic {
                continue;
            }
            for (j, b) in self.bodies.iter().enumerate() {
                if i == j || !b.enabled || !a.overlaps(b) {
                    continue;
                }
                let key = (BodyId(i as u32), BodyId(j as u32));
                contacts.push(Contact {
                    body: key.0,
                    other: key.1,
                    began: !self.touching.contains(&key),
                });
                touching.insert(key);
            }
        }
        self.touching = touching;
        contacts
    }
}

// Cannon-style damping: v *= (1 - d)^dt
fn damping_factor(damping: f32, dt: f32) -> f32 {
    (1.0 - damping).clamp(0.0, 1.0).powf(dt)
}

fn integrate_dynamic(body: &mut Body, gravity: f32, dt: f32) {
    body.velocity.y -= gravity * dt;
    body.velocity *= damping_factor(body.linear_damping, dt);
    body.angular_velocity *= damping_factor(body.angular_damping, dt);
    body.position += body.velocity * dt;
    if body.angular_velocity != Vec3f::ZERO {
        body.rotation = (Quatf::from_scaled_axis(body.angular_velocity * dt) * body.rotation).normalize();
    }

    // Flat ground at y = 0
    let half_y = body.shape.bounding_half_extents(body.rotation).y;
    if body.position.y - half_y < 0.0 {
        body.position.y = half_y;
        if body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
    }
}

/// Props pivot about their base: once tilted, gravity keeps tipping them
/// until they lie flat, where they come to rest.
fn integrate_prop(body: &mut Body, gravity: f32, dt: f32) {
    if body.resting {
        return;
    }
    let up = body.rotation * Vec3f::Y;
    let tilt = up.y.clamp(-1.0, 1.0).acos();
    if tilt >= FRAC_PI_2 {
        body.velocity = Vec3f::ZERO;
        body.angular_velocity = Vec3f::ZERO;
        body.resting = true;
        return;
    }
    if tilt > TIP_EPSILON {
        let axis = Vec3f::Y.cross(up).normalize_or_zero();
        let lever = body.shape.half_height();
        let inertia = body.shape.inertia(body.mass);
        let about_base = 0.5 * (inertia.x + inertia.z) + body.mass * lever * lever;
        let alpha = body.mass * gravity * lever * tilt.sin() / about_base.max(1e-6);
        body.angular_velocity += axis * alpha * dt;
    }
    body.velocity *= damping_factor(body.linear_damping, dt);
    body.angular_velocity *= damping_factor(body.angular_damping, dt);
    body.position += body.velocity * dt;
    body.rotation = (Quatf::from_scaled_axis(body.angular_velocity * dt) * body.rotation).normalize();
}

/// Move a dynamic body out of a solid along the shallowest axis and cancel
/// velocity into it. Vertical push only applies when landing on top.
fn push_out(body: &mut Body, solid: &Aabb) {
    let own = body.aabb();
    let Some(depth) = own.penetration(solid) else {
        return;
    };
    let from = own.center();
    let to = solid.center();
    let horizontal = depth.x.min(depth.z);

    if from.y > to.y && depth.y < horizontal {
        body.position.y += depth.y;
        body.velocity.y = body.velocity.y.max(0.0);
    } else if depth.x < depth.z {
        let sign = if from.x < to.x { -1.0 } else { 1.0 };
        body.position.x += sign * depth.x;
        if body.velocity.x * sign < 0.0 {
            trip(body, &own, solid, Vec3f::X * sign * body.velocity.x.abs());
            body.velocity.x = 0.0;
        }
    } else {
        let sign = if from.z < to.z { -1.0 } else { 1.0 };
        body.position.z += sign * depth.z;
        if body.velocity.z * sign < 0.0 {
            trip(body, &own, solid, Vec3f::Z * sign * body.velocity.z.abs());
            body.velocity.z = 0.0;
        }
    }
}

/// Spin from the velocity a solid just cancelled. The contact sits halfway
/// up the vertical overlap, so a solid covering the whole chassis height
/// adds nothing while a curb or ledge tips the body.
fn trip(body: &mut Body, own: &Aabb, solid: &Aabb, cancelled: Vec3f) {
    if body.mass <= 0.0 {
        return;
    }
    let contact_y = 0.5 * (own.min.y.max(solid.min.y) + own.max.y.min(solid.max.y));
    let arm = Vec3f::new(0.0, contact_y - own.center().y, 0.0);
    let impulse = cancelled * body.mass;
    let inertia = body.shape.inertia(body.mass).max(Vec3f::splat(1e-6));
    body.angular_velocity += arm.cross(impulse) / inertia;
}
