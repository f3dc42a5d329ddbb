//! The player as seen from the combat core.
//!
//! The core never constructs or moves the player; it reads the position and
//! applies damage through `PlayerTarget`. `Player` is a plain implementation
//! used by the terminal viewer and the tests.

use crate::hitbox::Aabb;
use crate::vector::Vec2;

pub trait PlayerTarget {
    fn position(&self) -> Vec2;

    /// Health saturates at zero.
    fn take_damage(&mut self, amount: f32);
}

/// Fixed-size player hitbox centred on the player's position.
pub fn player_hitbox(position: Vec2, size: Vec2) -> Aabb {
    Aabb::from_center(position, size)
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl Player {
    pub fn new(position: Vec2, max_health: f32) -> Self {
        Player {
            position,
            health: max_health,
            max_health,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

impl PlayerTarget for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }
}
