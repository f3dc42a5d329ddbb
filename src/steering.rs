//! Blocked-path fallback shared by the creature enemies.
//!
//! Try the direct step first. If it is blocked, try its pure-X and pure-Y
//! parts on their own. If both are blocked too, probe the cardinals in
//! `Direction::CARDINALS` order and commit to the first open one for a while
//! before looking at the direct path again.

use crate::direction::Direction;
use crate::enemy::EnemyId;
use crate::hitbox::Aabb;
use crate::sight::BlockerView;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub delta: Vec2,
    /// True when the direct path was not taken.
    pub obstructed: bool,
}

impl Step {
    fn direct(delta: Vec2) -> Self {
        Step {
            delta,
            obstructed: false,
        }
    }

    fn detour(delta: Vec2) -> Self {
        Step {
            delta,
            obstructed: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Steering {
    committed: Option<(Direction, f32)>,
}

impl Steering {
    pub fn new() -> Self {
        Steering::default()
    }

    pub fn committed(&self) -> Option<Direction> {
        self.committed.map(|(dir, _)| dir)
    }

    /// Work out how far to move this frame.
    ///
    /// `hitbox` is the mover's current movement hitbox and `desired` the
    /// full step it would like to take. The returned delta never moves the
    /// hitbox into a blocker.
    pub fn step(
        &mut self,
        hitbox: Aabb,
        desired: Vec2,
        dt: f32,
        commit_duration: f32,
        blockers: &BlockerView<'_>,
        me: EnemyId,
    ) -> Step {
        let length = desired.length();
        let clear = |delta: Vec2| !blockers.is_blocked(&hitbox.translated(delta), Some(me));

        if let Some((dir, remaining)) = self.committed {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                let delta = dir.vector() * length;
                if length > 0.0 && clear(delta) {
                    self.committed = Some((dir, remaining));
                    return Step::detour(delta);
                }
            }
            self.committed = None;
        }

        if length <= 0.0 {
            return Step::direct(Vec2::ZERO);
        }
        if clear(desired) {
            return Step::direct(desired);
        }

        let mut delta = Vec2::ZERO;
        let along_x = Vec2::new(desired.x, 0.0);
        if along_x.x != 0.0 && clear(along_x) {
            delta += along_x;
        }
        let along_y = Vec2::new(0.0, desired.y);
        if along_y.y != 0.0 && clear(delta + along_y) {
            delta += along_y;
        }
        if delta != Vec2::ZERO {
            return Step::detour(delta);
        }

        for dir in Direction::CARDINALS {
            let probe = dir.vector() * length;
            if clear(probe) {
                self.committed = Some((dir, commit_duration));
                return Step::detour(probe);
            }
        }
        Step::detour(Vec2::ZERO)
    }
}

/// Move `position` by `delta` unless the movement box would end up inside a
/// blocker. Used for knockback, which does not steer around things.
pub fn slide(
    position: Vec2,
    delta: Vec2,
    movement_box: impl Fn(Vec2) -> Aabb,
    blockers: &BlockerView<'_>,
    me: EnemyId,
) -> Vec2 {
    if delta == Vec2::ZERO {
        return position;
    }
    let next = position + delta;
    if blockers.is_blocked(&movement_box(next), Some(me)) {
        position
    } else {
        next
    }
}
