use bevy_math::EulerRot;

use super::shape::{shapes_overlap, Aabb, Shape};
use crate::{Quatf, Vec3f};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Moves under gravity; gets pushed out of static solids. The chassis.
    Dynamic,
    /// Immovable collider.
    Static,
    /// Non-solid volume that only reports contacts.
    Trigger,
    /// Upright object that can be knocked over by an impulse.
    Prop,
}

#[derive(Debug, Clone)]
pub struct Body {
    /// Identity tag checked by contact consumers.
    pub name: String,
    pub kind: BodyKind,
    pub shape: Shape,
    pub position: Vec3f,
    pub rotation: Quatf,
    pub velocity: Vec3f,
    pub angular_velocity: Vec3f,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub(crate) enabled: bool,
    pub(crate) resting: bool,
    home_position: Vec3f,
    home_rotation: Quatf,
}

impl Body {
    pub fn new(name: impl Into<String>, kind: BodyKind, shape: Shape, position: Vec3f) -> Self {
        Self {
            name: name.into(),
            kind,
            shape,
            position,
            rotation: Quatf::IDENTITY,
            velocity: Vec3f::ZERO,
            angular_velocity: Vec3f::ZERO,
            mass: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            enabled: true,
            resting: false,
            home_position: position,
            home_rotation: Quatf::IDENTITY,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Prop has come to rest lying on its side.
    pub fn is_resting(&self) -> bool {
        self.resting
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.shape.bounding_half_extents(self.rotation))
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        shapes_overlap(
            self.position,
            self.rotation,
            &self.shape,
            other.position,
            other.rotation,
            &other.shape,
        )
    }

    /// Sum of absolute roll and pitch (XYZ Euler order), in radians.
    pub fn tilt(&self) -> f32 {
        let (x, _y, z) = self.rotation.to_euler(EulerRot::XYZ);
        x.abs() + z.abs()
    }

    /// Put the body back where it was created, at rest.
    pub(crate) fn restore(&mut self) {
        self.position = self.home_position;
        self.rotation = self.home_rotation;
        self.velocity = Vec3f::ZERO;
        self.angular_velocity = Vec3f::ZERO;
        self.resting = false;
    }
}
