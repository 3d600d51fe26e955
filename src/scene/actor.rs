//! Actor record and behaviour capabilities
//!
//! An actor is a centered rectangle with rotation and depth. The shared fields
//! live in [`ActorCore`]; per-type behaviour comes from [`LogicUpdatable`] and
//! [`Presentable`], which concrete entities implement.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::present::PresentFrame;
use super::transform::CoordinateTransform;
use crate::sim::collision::Rect;
use crate::vecops::deg2rad;

static NEXT_ACTOR_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique actor identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    pub fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Process-unique scene identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(u32);

impl SceneId {
    pub fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Fields every actor carries
///
/// Cloning yields a new, unattached actor: the copy gets its own id and no
/// owning scene.
#[derive(Debug)]
pub struct ActorCore {
    id: ActorId,
    /// Center of the rectangle in logical units
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees, clockwise-positive
    pub rotation: f32,
    rotation_offset: f32,
    /// Higher paints on top
    pub z: i32,
    /// Controls presentation only
    pub visible: bool,
    /// Controls logic update only
    pub active: bool,
    scene: Option<SceneId>,
}

impl Clone for ActorCore {
    fn clone(&self) -> Self {
        Self {
            id: ActorId::next(),
            scene: None,
            ..*self
        }
    }
}

impl Default for ActorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorCore {
    pub fn new() -> Self {
        Self::with_rotation_offset(0.0)
    }

    /// Create a record whose heading is offset by a fixed number of degrees
    pub fn with_rotation_offset(rotation_offset: f32) -> Self {
        Self {
            id: ActorId::next(),
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0.0,
            rotation_offset,
            z: 0,
            visible: true,
            active: true,
            scene: None,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn rotation_offset(&self) -> f32 {
        self.rotation_offset
    }

    /// Owning scene, if attached
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub(crate) fn set_scene(&mut self, scene: Option<SceneId>) {
        self.scene = scene;
    }

    /// Axis-aligned bounding rectangle centered on `pos`
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.pos, self.size)
    }

    /// Unit heading vector; 0° points along +Y, clockwise-positive
    pub fn direction(&self, extra_degrees: f32) -> Vec2 {
        let theta = deg2rad(self.rotation + self.rotation_offset + extra_degrees);
        Vec2::new(theta.sin(), theta.cos())
    }
}

/// Per-tick view handed to an actor during the logic pass
pub struct TickContext<'a, W> {
    id: ActorId,
    delta_time: f32,
    transform: &'a CoordinateTransform,
    world: &'a W,
    detach_requests: &'a mut Vec<ActorId>,
}

impl<'a, W> TickContext<'a, W> {
    pub(crate) fn new(
        id: ActorId,
        delta_time: f32,
        transform: &'a CoordinateTransform,
        world: &'a W,
        detach_requests: &'a mut Vec<ActorId>,
    ) -> Self {
        Self {
            id,
            delta_time,
            transform,
            world,
            detach_requests,
        }
    }

    /// Seconds since the previous logic tick (same value for every actor)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn world(&self) -> &W {
        self.world
    }

    pub fn transform(&self) -> &CoordinateTransform {
        self.transform
    }

    /// Remove the current actor once the pass completes
    pub fn detach_self(&mut self) {
        self.detach_requests.push(self.id);
    }

    /// Remove another actor once the pass completes
    pub fn detach(&mut self, id: ActorId) {
        self.detach_requests.push(id);
    }
}

/// Behaviour run once per logic tick while the actor is active
pub trait LogicUpdatable {
    /// Shared read-only state the actor consults during its update
    type World;

    fn logic_update(&mut self, _ctx: &mut TickContext<'_, Self::World>) {}
}

/// Type-specific visuals pushed after the generic placement
pub trait Presentable {
    fn present_update(&self, _frame: &mut PresentFrame<'_>) {}
}

/// Anything a [`Scene`](super::Scene) can own
pub trait Actor: LogicUpdatable + Presentable {
    fn core(&self) -> &ActorCore;
    fn core_mut(&mut self) -> &mut ActorCore;

    fn id(&self) -> ActorId {
        self.core().id()
    }

    fn direction(&self, extra_degrees: f32) -> Vec2 {
        self.core().direction(extra_degrees)
    }
}
