use bevy_math::Mat3;
use serde::{Deserialize, Serialize};

use crate::{Quatf, Vec3f};

/// Collision shapes. Cylinders stay upright regardless of body rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cuboid { half_extents: Vec3f },
    Cylinder { radius: f32, half_height: f32 },
}

impl Shape {
    /// Cuboid from full edge lengths.
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Shape::Cuboid {
            half_extents: Vec3f::new(x * 0.5, y * 0.5, z * 0.5),
        }
    }

    /// Cylinder from radius and full height.
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Shape::Cylinder {
            radius,
            half_height: height * 0.5,
        }
    }

    pub fn half_height(&self) -> f32 {
        match *self {
            Shape::Cuboid { half_extents } => half_extents.y,
            Shape::Cylinder { half_height, .. } => half_height,
        }
    }

    /// Half extents of the world-axis-aligned box around the rotated shape.
    pub fn bounding_half_extents(&self, rotation: Quatf) -> Vec3f {
        match *self {
            Shape::Cuboid { half_extents } => Mat3::from_quat(rotation).abs() * half_extents,
            Shape::Cylinder {
                radius,
                half_height,
            } => Vec3f::new(radius, half_height, radius),
        }
    }

    /// Principal moments of inertia in the body frame.
    pub fn inertia(&self, mass: f32) -> Vec3f {
        match *self {
            Shape::Cuboid { half_extents } => {
                let d = half_extents * 2.0;
                let k = mass / 12.0;
                Vec3f::new(
                    k * (d.y * d.y + d.z * d.z),
                    k * (d.x * d.x + d.z * d.z),
                    k * (d.x * d.x + d.y * d.y),
                )
            }
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let h = half_height * 2.0;
                let side = mass * (3.0 * radius * radius + h * h) / 12.0;
                Vec3f::new(side, 0.5 * mass * radius * radius, side)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl Aabb {
    pub fn from_center(center: Vec3f, half: Vec3f) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3f {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; touching faces do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Per-axis overlap depth, or `None` when the boxes are apart.
    pub fn penetration(&self, other: &Aabb) -> Option<Vec3f> {
        if !self.intersects(other) {
            return None;
        }
        let depth = |amin: f32, amax: f32, bmin: f32, bmax: f32| (amax - bmin).min(bmax - amin);
        Some(Vec3f::new(
            depth(self.min.x, self.max.x, other.min.x, other.max.x),
            depth(self.min.y, self.max.y, other.min.y, other.max.y),
            depth(self.min.z, self.max.z, other.min.z, other.max.z),
        ))
    }
}

/// Overlap test between two placed shapes.
pub(crate) fn shapes_overlap(
    a_pos: Vec3f,
    a_rot: Quatf,
    a: &Shape,
    b_pos: Vec3f,
    b_rot: Quatf,
    b: &Shape,
) -> bool {
    match (*a, *b) {
        (
            Shape::Cylinder {
                radius: ra,
                half_height: ha,
            },
            Shape::Cylinder {
                radius: rb,
                half_height: hb,
            },
        ) => {
            let vertical = a_pos.y - ha < b_pos.y + hb && a_pos.y + ha > b_pos.y - hb;
            let dx = a_pos.x - b_pos.x;
            let dz = a_pos.z - b_pos.z;
            let reach = ra + rb;
            vertical && dx * dx + dz * dz < reach * reach
        }
        (
            Shape::Cylinder {
                radius,
                half_height,
            },
            _,
        ) => {
            let bounds = Aabb::from_center(b_pos, b.bounding_half_extents(b_rot));
            cylinder_hits_box(a_pos, radius, half_height, &bounds)
        }
        (
            _,
            Shape::Cylinder {
                radius,
                half_height,
            },
        ) => {
            let bounds = Aabb::from_center(a_pos, a.bounding_half_extents(a_rot));
            cylinder_hits_box(b_pos, radius, half_height, &bounds)
        }
        _ => {
            let ab = Aabb::from_center(a_pos, a.bounding_half_extents(a_rot));
            let bb = Aabb::from_center(b_pos, b.bounding_half_extents(b_rot));
            ab.intersects(&bb)
        }
    }
}

fn cylinder_hits_box(center: Vec3f, radius: f32, half_height: f32, bounds: &Aabb) -> bool {
    if center.y + half_height <= bounds.min.y || center.y - half_height >= bounds.max.y {
        return false;
    }
    let dx = center.x - center.x.clamp(bounds.min.x, bounds.max.x);
    let dz = center.z - center.z.clamp(bounds.min.z, bounds.max.z);
    dx * dx + dz * dz < radius * radius
}
