//! Diagnostic draw layer
//!
//! Collects outline shapes in surface pixels over the scene transform. A host
//! renderer reads them back with [`DebugOverlay::shapes`]. Nothing here feeds
//! into the simulation.

use glam::Vec2;

use super::actor::ActorCore;
use super::transform::CoordinateTransform;
use crate::vecops;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    Red,
    Green,
    Blue,
}

impl DebugColor {
    pub fn hex(&self) -> &'static str {
        match self {
            DebugColor::Red => "#f00",
            DebugColor::Green => "#0f0",
            DebugColor::Blue => "#00f",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    /// Outline rectangle; `origin` is the pixel of the first logical corner
    Rect {
        origin: Vec2,
        extent: Vec2,
        color: DebugColor,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: DebugColor,
    },
}

#[derive(Debug, Clone)]
pub struct DebugOverlay {
    pub enabled: bool,
    /// Draw every actor's bounds and heading on redraw
    pub actor_debug: bool,
    transform: CoordinateTransform,
    surface: Vec2,
    shapes: Vec<DebugShape>,
}

impl DebugOverlay {
    pub fn new(transform: CoordinateTransform, surface: (u32, u32)) -> Self {
        Self {
            enabled: false,
            actor_debug: false,
            transform,
            surface: Vec2::new(surface.0 as f32, surface.1 as f32),
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Clear and redraw the per-actor layer
    pub fn redraw<'a, I>(&mut self, actors: I)
    where
        I: IntoIterator<Item = &'a ActorCore>,
    {
        if !self.enabled {
            return;
        }
        self.shapes.clear();
        if !self.actor_debug {
            return;
        }
        for actor in actors {
            let r = actor.bounds();
            self.draw_rect(r.min, r.max, DebugColor::Red);

            let len = (actor.size.x * actor.size.y).sqrt();
            let dir = vecops::mul(actor.direction(0.0).to_array(), len);
            let to = Vec2::from_array(vecops::add(actor.pos.to_array(), dir));
            self.draw_line(actor.pos, to, DebugColor::Green);
        }
    }

    /// Outline between two logical corners
    pub fn draw_rect(&mut self, a: Vec2, b: Vec2, color: DebugColor) {
        if !self.enabled {
            return;
        }
        let a = self.to_pixels(a);
        let b = self.to_pixels(b);
        self.shapes.push(DebugShape::Rect {
            origin: a,
            extent: Vec2::from_array(vecops::sub(b.to_array(), a.to_array())),
            color,
        });
    }

    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: DebugColor) {
        if !self.enabled {
            return;
        }
        let from = self.to_pixels(from);
        let to = self.to_pixels(to);
        self.shapes.push(DebugShape::Line { from, to, color });
    }

    fn to_pixels(&self, p: Vec2) -> Vec2 {
        let ratio = self.transform.to_presentation_ratio(p).to_array();
        Vec2::from_array(vecops::map(ratio, self.surface.to_array(), |r, s| r * s))
    }
}
