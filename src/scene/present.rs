//! Presentation sink interface
//!
//! The scene never paints anything itself. Each actor owns a node in the sink,
//! keyed by its id, and the scene pushes normalized placement and style
//! attributes into it.

use std::collections::HashMap;
use std::mem::discriminant;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::transform::CoordinateTransform;

/// Node rectangle in percent of the surface, plus rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl Placement {
    /// Place a centered rectangle through the transform
    pub fn from_center(
        transform: &CoordinateTransform,
        pos: Vec2,
        size: Vec2,
        rotation: f32,
    ) -> Self {
        let s = transform.size_to_presentation_ratio(size);
        let o = transform.to_presentation_ratio(pos);
        Self {
            left: 100.0 * (o.x - 0.5 * s.x),
            top: 100.0 * (o.y - 0.5 * s.y),
            width: 100.0 * s.x,
            height: 100.0 * s.y,
            rotation,
        }
    }
}

/// Type-specific visual attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleAttr {
    /// Image resource key
    Image(String),
    Flip { x: bool, y: bool },
    /// Horizontal background offset in surface pixels
    Scroll(f32),
    Text(String),
}

/// Receiver of per-actor presentation state
pub trait PresentationSink {
    /// Surface size in pixels
    fn surface_size(&self) -> (u32, u32);
    fn set_visible(&mut self, id: ActorId, visible: bool);
    fn set_depth(&mut self, id: ActorId, z: i32);
    fn place(&mut self, id: ActorId, placement: Placement);
    fn style(&mut self, id: ActorId, attr: StyleAttr);
    /// Drop the node for a detached actor
    fn release(&mut self, id: ActorId);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy)]
pub struct NullSink {
    pub size: (u32, u32),
}

impl NullSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }
}

impl PresentationSink for NullSink {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }
    fn set_visible(&mut self, _id: ActorId, _visible: bool) {}
    fn set_depth(&mut self, _id: ActorId, _z: i32) {}
    fn place(&mut self, _id: ActorId, _placement: Placement) {}
    fn style(&mut self, _id: ActorId, _attr: StyleAttr) {}
    fn release(&mut self, _id: ActorId) {}
}

/// Latest known state of one node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRecord {
    pub visible: bool,
    pub depth: i32,
    pub placement: Option<Placement>,
    /// One entry per attribute kind, last write wins
    pub styles: Vec<StyleAttr>,
}

impl NodeRecord {
    pub fn image(&self) -> Option<&str> {
        self.styles.iter().find_map(|s| match s {
            StyleAttr::Image(key) => Some(key.as_str()),
            _ => None,
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.styles.iter().find_map(|s| match s {
            StyleAttr::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }
}

/// Sink that keeps the latest state of every node
#[derive(Debug, Clone)]
pub struct RecordingSink {
    size: (u32, u32),
    nodes: HashMap<ActorId, NodeRecord>,
    released: Vec<ActorId>,
}

impl RecordingSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            nodes: HashMap::new(),
            released: Vec::new(),
        }
    }

    pub fn node(&self, id: ActorId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Live nodes sorted by paint order (lowest depth first)
    pub fn paint_order(&self) -> Vec<ActorId> {
        let mut ids: Vec<_> = self.nodes.iter().map(|(id, n)| (n.depth, *id)).collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn released(&self) -> &[ActorId] {
        &self.released
    }

    fn entry(&mut self, id: ActorId) -> &mut NodeRecord {
        self.nodes.entry(id).or_default()
    }
}

impl PresentationSink for RecordingSink {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_visible(&mut self, id: ActorId, visible: bool) {
        self.entry(id).visible = visible;
    }

    fn set_depth(&mut self, id: ActorId, z: i32) {
        self.entry(id).depth = z;
    }

    fn place(&mut self, id: ActorId, placement: Placement) {
        self.entry(id).placement = Some(placement);
    }

    fn style(&mut self, id: ActorId, attr: StyleAttr) {
        let node = self.entry(id);
        let kind = discriminant(&attr);
        match node.styles.iter_mut().find(|s| discriminant(*s) == kind) {
            Some(slot) => *slot = attr,
            None => node.styles.push(attr),
        }
    }

    fn release(&mut self, id: ActorId) {
        self.nodes.remove(&id);
        self.released.push(id);
    }
}

/// Handle an actor uses to push its own visuals during a presentation tick
pub struct PresentFrame<'a> {
    id: ActorId,
    transform: &'a CoordinateTransform,
    sink: &'a mut dyn PresentationSink,
}

impl<'a> PresentFrame<'a> {
    pub(crate) fn new(
        id: ActorId,
        transform: &'a CoordinateTransform,
        sink: &'a mut dyn PresentationSink,
    ) -> Self {
        Self { id, transform, sink }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn transform(&self) -> &CoordinateTransform {
        self.transform
    }

    pub fn style(&mut self, attr: StyleAttr) {
        self.sink.style(self.id, attr);
    }

    /// Convert a logical horizontal offset into surface pixels
    pub fn logical_to_pixels_x(&self, offset: f32) -> f32 {
        let (w, _) = self.sink.surface_size();
        offset / self.transform.width * w as f32
    }
}
