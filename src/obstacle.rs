//! Static level collidables (trees, bushes, rocks, walls).
//!
//! Placed by the external level loader and never moved. All kinds stop
//! bullets with their sprite box and block movement and sight with the lower
//! half of it.

use crate::capability::{Collidable, Renderable, WorldObject};
use crate::hitbox::Aabb;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Foliage,
    Rock,
    Wall,
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub position: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, position: Vec2, size: Vec2) -> Self {
        Obstacle {
            position,
            size,
            kind,
        }
    }

    pub fn foliage(position: Vec2) -> Self {
        Obstacle::new(ObstacleKind::Foliage, position, Vec2::new(32.0, 48.0))
    }

    pub fn rock(position: Vec2) -> Self {
        Obstacle::new(ObstacleKind::Rock, position, Vec2::new(28.0, 24.0))
    }

    /// Walls block along their whole footprint, not just the lower half.
    pub fn wall(min: Vec2, max: Vec2) -> Self {
        let bounds = Aabb::new(min, max);
        Obstacle::new(ObstacleKind::Wall, bounds.center(), bounds.size())
    }
}

impl WorldObject for Obstacle {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_active(&self) -> bool {
        true
    }
}

impl Collidable for Obstacle {
    fn sprite_hitbox(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }

    fn movement_hitbox(&self) -> Aabb {
        match self.kind {
            ObstacleKind::Wall => self.sprite_hitbox(),
            ObstacleKind::Foliage | ObstacleKind::Rock => {
                Aabb::lower_half(self.position, self.size)
            }
        }
    }
}

impl Renderable for Obstacle {
    fn texture_key(&self) -> String {
        match self.kind {
            ObstacleKind::Foliage => "tree".to_string(),
            ObstacleKind::Rock => "rock".to_string(),
            ObstacleKind::Wall => "wall".to_string(),
        }
    }
}
