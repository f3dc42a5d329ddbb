//! Read-only view of everything that blocks movement and sight.
//!
//! The orchestrator rebuilds the blocker list once per frame from the static
//! obstacles and every living enemy's movement hitbox, then lends it to each
//! AI update. Entities never mutate it.

use crate::enemy::EnemyId;
use crate::hitbox::Aabb;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockerOwner {
    Obstacle(usize),
    Enemy(EnemyId),
}

#[derive(Clone, Copy, Debug)]
pub struct Blocker {
    pub owner: BlockerOwner,
    pub movement: Aabb,
}

#[derive(Clone, Copy, Debug)]
pub struct BlockerView<'a> {
    blockers: &'a [Blocker],
    /// Distance between raycast samples.
    ray_step: f32,
}

impl<'a> BlockerView<'a> {
    pub fn new(blockers: &'a [Blocker], ray_step: f32) -> Self {
        BlockerView { blockers, ray_step }
    }

    /// A view with nothing in it: no blocking, full line of sight.
    pub fn empty() -> BlockerView<'static> {
        BlockerView {
            blockers: &[],
            ray_step: 8.0,
        }
    }

    /// True if `hitbox` overlaps any blocker other than `ignore`'s own box.
    pub fn is_blocked(&self, hitbox: &Aabb, ignore: Option<EnemyId>) -> bool {
        self.blockers
            .iter()
            .filter(|b| !is_ignored(b, ignore))
            .any(|b| b.movement.intersects(hitbox))
    }

    fn point_blocked(&self, p: Vec2, ignore: Option<EnemyId>) -> bool {
        self.blockers
            .iter()
            .filter(|b| !is_ignored(b, ignore))
            .any(|b| b.movement.contains_point(p))
    }

    /// Step from `from` to `to` every `ray_step` units and test each sample
    /// against the blockers. The end point itself is not sampled so a target
    /// standing against a wall is still visible.
    pub fn line_of_sight(&self, from: Vec2, to: Vec2, ignore: Option<EnemyId>) -> bool {
        if self.blockers.is_empty() {
            return true;
        }
        let delta = to - from;
        let distance = delta.length();
        if distance <= 0.0 || self.ray_step <= 0.0 {
            return true;
        }
        let dir = delta / distance;
        let mut travelled = self.ray_step;
        while travelled < distance {
            if self.point_blocked(from + dir * travelled, ignore) {
                return false;
            }
            travelled += self.ray_step;
        }
        true
    }
}

fn is_ignored(blocker: &Blocker, ignore: Option<EnemyId>) -> bool {
    matches!((blocker.owner, ignore), (BlockerOwner::Enemy(id), Some(skip)) if id == skip)
}
