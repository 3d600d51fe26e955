//! Actor/scene core
//!
//! - `actor`: the shared actor record and behaviour traits
//! - `stage`: the scene that owns actors and runs update passes
//! - `transform`: logical-to-presentation coordinate mapping
//! - `present`: the presentation sink interface
//! - `debug`: optional diagnostic overlay

pub mod actor;
pub mod debug;
pub mod present;
pub mod stage;
pub mod transform;

pub use actor::{Actor, ActorCore, ActorId, LogicUpdatable, Presentable, SceneId, TickContext};
pub use debug::{DebugColor, DebugOverlay, DebugShape};
pub use present::{
    NodeRecord, NullSink, Placement, PresentFrame, PresentationSink, RecordingSink, StyleAttr,
};
pub use stage::{Scene, attach};
pub use transform::CoordinateTransform;
