//! Follow camera handed to the renderer with each frame.

use crate::hitbox::Aabb;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World point at the centre of the view.
    pub center: Vec2,
    /// View size in world units.
    pub viewport: Vec2,
    /// Arena the view must stay inside, if any.
    pub bounds: Option<Aabb>,
}

impl Camera {
    pub fn new(viewport: Vec2, bounds: Option<Aabb>) -> Self {
        Camera {
            center: Vec2::ZERO,
            viewport,
            bounds,
        }
    }

    /// Centre on `target`, keeping the view inside the arena. An arena
    /// smaller than the view on some axis pins that axis to the arena centre.
    pub fn follow(&mut self, target: Vec2) {
        self.center = match self.bounds {
            Some(bounds) => {
                let half = self.viewport * 0.5;
                let lo = bounds.min + half;
                let hi = bounds.max - half;
                let mid = bounds.center();
                Vec2::new(
                    clamp_axis(target.x, lo.x, hi.x, mid.x),
                    clamp_axis(target.y, lo.y, hi.y, mid.y),
                )
            }
            None => target,
        };
    }

    pub fn view_box(&self) -> Aabb {
        Aabb::from_center(self.center, self.viewport)
    }

    /// Converts a world point into view-local coordinates with the origin at
    /// the top-left and y growing downwards.
    pub fn to_view(&self, world: Vec2) -> Vec2 {
        let top_left = Vec2::new(
            self.center.x - self.viewport.x * 0.5,
            self.center.y + self.viewport.y * 0.5,
        );
        Vec2::new(world.x - top_left.x, top_left.y - world.y)
    }
}

fn clamp_axis(value: f32, lo: f32, hi: f32, mid: f32) -> f32 {
    if lo > hi {
        mid
    } else {
        value.clamp(lo, hi)
    }
}
