//! Axis-aligned boxes used for sprite and movement hitboxes.

use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of `size` centred on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Aabb::new(center - half, center + half)
    }

    /// Sprite bounds of `size` centred on `center`, cut down to the lower
    /// half (y-up, so the half with the smaller y). This is the movement
    /// hitbox convention: feet collide, heads overlap.
    pub fn lower_half(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Aabb::new(
            Vec2::new(center.x - half.x, center.y - half.y),
            Vec2::new(center.x + half.x, center.y),
        )
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Aabb {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Strict overlap: boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
