//! Collision queries over actor bounding rectangles
//!
//! Everything here is a pure function of actor bounds. Actor counts are in the
//! tens, so every query is a linear scan in caller order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scene::{Actor, DebugColor, DebugOverlay};

/// Axis-aligned rectangle, inclusive on every edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle of `size` centered on `center`
    ///
    /// The far edge is `center + size - size/2`; min/max are sorted so a
    /// negative size still yields a valid rectangle.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let ax = [center.x - size.x * 0.5, center.x + size.x - size.x * 0.5];
        let ay = [center.y - size.y * 0.5, center.y + size.y - size.y * 0.5];
        Self {
            min: Vec2::new(ax[0].min(ax[1]), ay[0].min(ay[1])),
            max: Vec2::new(ax[0].max(ax[1]), ay[0].max(ay[1])),
        }
    }

    /// Rectangle spanning two arbitrary corners
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.min.x <= p.x && self.max.x >= p.x && self.min.y <= p.y && self.max.y >= p.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// First actor whose bounds contain `point`, in iteration order
pub fn point_cast<'a, A, I>(actors: I, point: Vec2) -> Option<&'a A>
where
    A: Actor + 'a,
    I: IntoIterator<Item = &'a A>,
{
    actors
        .into_iter()
        .find(|actor| actor.core().bounds().contains(point))
}

/// How far apart ray-march samples are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepSpacing {
    /// Sample `i` sits at `i * step`
    #[default]
    Linear,
    /// Sample `i` sits at `i * steps * step` (spacing grows with the step count)
    Legacy,
}

/// A fixed-step line cast approximated by point samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayMarch {
    pub origin: Vec2,
    /// Unit direction, or zero for a degenerate ray
    pub direction: Vec2,
    pub step: f32,
    pub steps: u32,
    pub spacing: StepSpacing,
}

impl RayMarch {
    /// Build a ray; `direction` is normalized here
    ///
    /// A zero-length direction leaves every sample on the origin, so the
    /// march behaves like a single point cast there.
    pub fn new(origin: Vec2, direction: Vec2, step: f32, steps: u32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            step,
            steps,
            spacing: StepSpacing::default(),
        }
    }

    pub fn with_spacing(mut self, spacing: StepSpacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Distance from the origin to sample `i`
    pub fn distance_at(&self, i: u32) -> f32 {
        match self.spacing {
            StepSpacing::Linear => i as f32 * self.step,
            StepSpacing::Legacy => i as f32 * self.steps as f32 * self.step,
        }
    }

    /// The `steps + 1` sample points, origin first
    pub fn samples(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..=self.steps).map(|i| self.origin + self.direction * self.distance_at(i))
    }

    /// Furthest sample point
    pub fn end(&self) -> Vec2 {
        self.origin + self.direction * self.distance_at(self.steps)
    }

    /// First actor hit by any sample, in sample order
    ///
    /// With an overlay, the ray is drawn green on a miss and red on a hit.
    pub fn cast<'a, A>(&self, actors: &[&'a A], debug: Option<&mut DebugOverlay>) -> Option<&'a A>
    where
        A: Actor + 'a,
    {
        let hit = self
            .samples()
            .find_map(|p| point_cast(actors.iter().copied(), p));
        if let Some(overlay) = debug {
            let color = if hit.is_some() {
                DebugColor::Red
            } else {
                DebugColor::Green
            };
            overlay.draw_line(self.origin, self.end(), color);
        }
        hit
    }
}

/// Linear-spaced ray march from `origin` along `direction`
pub fn ray_march<'a, A>(
    actors: &[&'a A],
    origin: Vec2,
    direction: Vec2,
    step: f32,
    steps: u32,
) -> Option<&'a A>
where
    A: Actor + 'a,
{
    RayMarch::new(origin, direction, step, steps).cast(actors, None)
}
