//! Game simulation
//!
//! Collision queries and the loop scheduler are independent of the game; the
//! rest builds the game on top of the scene core:
//! - Time is always passed in, never read from a clock here
//! - Seeded RNG only
//! - Stable iteration order (scene registration order)

pub mod collision;
pub mod entities;
pub mod game;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{RayMarch, Rect, StepSpacing, point_cast, ray_march};
pub use entities::{Background, Bird, Entity, GameOverBanner, Ground, Pipe, ScoreBoard};
pub use game::{Game, Session};
pub use schedule::{DualLoop, LoopHandler, RunState};
pub use state::{GameEvent, GameState};
