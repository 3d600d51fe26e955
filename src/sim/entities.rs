//! Game entities
//!
//! Each entity is a plain struct carrying an [`ActorCore`]. [`Entity`] wraps
//! them so a single scene can own every kind.

use glam::Vec2;

use super::state::GameState;
use crate::consts::*;
use crate::error::ResourceError;
use crate::resources::{self, ImageCatalog};
use crate::scene::{
    Actor, ActorCore, CoordinateTransform, LogicUpdatable, PresentFrame, Presentable, StyleAttr,
    TickContext,
};

/// Sprite dimensions in logical units
fn sprite_size(
    catalog: &ImageCatalog,
    key: &str,
    pix_scale: f32,
) -> Result<Vec2, ResourceError> {
    let info = catalog.image(key)?;
    Ok(Vec2::new(info.width as f32, info.height as f32) * pix_scale)
}

/// One animation frame: image key and its logical size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub image: &'static str,
    pub size: Vec2,
}

impl Frame {
    pub fn load(
        catalog: &ImageCatalog,
        image: &'static str,
        pix_scale: f32,
    ) -> Result<Self, ResourceError> {
        Ok(Self {
            image,
            size: sprite_size(catalog, image, pix_scale)?,
        })
    }
}

// === Bird ===

#[derive(Debug, Clone)]
pub struct Bird {
    core: ActorCore,
    pub vx: f32,
    pub vy: f32,
    frames: [Frame; 3],
    frame: usize,
    anim_time: f32,
}

impl Bird {
    pub fn new(catalog: &ImageCatalog, pix_scale: f32) -> Result<Self, ResourceError> {
        let frames = [
            Frame::load(catalog, resources::BIRD_UPFLAP, pix_scale)?,
            Frame::load(catalog, resources::BIRD_MIDFLAP, pix_scale)?,
            Frame::load(catalog, resources::BIRD_DOWNFLAP, pix_scale)?,
        ];
        let mut core = ActorCore::with_rotation_offset(90.0);
        core.z = 3;
        // Mid-flap until the first animation step
        core.size = frames[1].size;
        Ok(Self {
            core,
            vx: 0.0,
            vy: 0.0,
            frames,
            frame: 1,
            anim_time: 0.0,
        })
    }

    pub fn fly_up(&mut self, velocity: f32) {
        self.vy = velocity;
    }

    pub fn image(&self) -> &'static str {
        self.frames[self.frame].image
    }

    fn animate(&mut self, dt: f32) {
        self.anim_time += dt;
        if self.anim_time >= BIRD_ANIM_FRAME_SECS {
            self.anim_time = 0.0;
            self.frame = (self.frame + 1) % self.frames.len();
            self.core.size = self.frames[self.frame].size;
        }
    }
}

impl LogicUpdatable for Bird {
    type World = GameState;

    fn logic_update(&mut self, ctx: &mut TickContext<'_, GameState>) {
        let dt = ctx.delta_time();
        let world = ctx.world();
        if world.over {
            self.core.pos.x -= world.pipe_speed * dt;
        }
        if world.playing {
            self.vy -= world.settings.gravity * dt;
            self.core.pos += Vec2::new(self.vx, self.vy) * dt;
            self.core.rotation = (-self.vy * 10.0).clamp(-BIRD_MAX_TILT, BIRD_MAX_TILT);
            self.core.pos.y = self.core.pos.y.max(world.ground_y);
        }
        if !world.over {
            self.animate(dt);
        }
    }
}

impl Presentable for Bird {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        frame.style(StyleAttr::Image(self.image().to_string()));
    }
}

// === Pipe ===

#[derive(Debug, Clone)]
pub struct Pipe {
    core: ActorCore,
    flipped: bool,
}

impl Pipe {
    /// A pipe of `size`; `flipped` pipes hang from the top
    pub fn new(size: Vec2, flipped: bool) -> Self {
        let mut core = ActorCore::new();
        core.size = size;
        Self { core, flipped }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Edge of the pipe that faces the gap
    pub fn gap_edge(&self) -> f32 {
        let half = self.core.size.y * 0.5;
        if self.flipped {
            self.core.pos.y - half
        } else {
            self.core.pos.y + half
        }
    }
}

impl LogicUpdatable for Pipe {
    type World = GameState;

    fn logic_update(&mut self, ctx: &mut TickContext<'_, GameState>) {
        self.core.pos.x -= ctx.world().pipe_speed * ctx.delta_time();
        if self.core.pos.x <= -ctx.transform().width * PIPE_DESPAWN_X_FACTOR {
            log::debug!("Pipe {} left the scene", self.core.id().raw());
            ctx.detach_self();
        }
    }
}

impl Presentable for Pipe {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        frame.style(StyleAttr::Image(resources::PIPE.to_string()));
        frame.style(StyleAttr::Flip {
            x: false,
            y: self.flipped,
        });
    }
}

// === Ground ===

/// Scrolling strip along the bottom edge
#[derive(Debug, Clone)]
pub struct Ground {
    core: ActorCore,
    offset: f32,
}

impl Ground {
    pub fn new(transform: &CoordinateTransform, height: f32) -> Self {
        let mut core = ActorCore::new();
        core.z = 2;
        core.size = Vec2::new(transform.width, height);
        core.pos = Vec2::new(0.0, (height - transform.height) * 0.5);
        Self { core, offset: 0.0 }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}

impl LogicUpdatable for Ground {
    type World = GameState;

    fn logic_update(&mut self, ctx: &mut TickContext<'_, GameState>) {
        if ctx.world().playing {
            self.offset += ctx.world().pipe_speed * ctx.delta_time();
        }
    }
}

impl Presentable for Ground {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        let scroll = -frame.logical_to_pixels_x(self.offset);
        frame.style(StyleAttr::Image(resources::BASE.to_string()));
        frame.style(StyleAttr::Scroll(scroll));
    }
}

// === Background ===

#[derive(Debug, Clone)]
pub struct Background {
    core: ActorCore,
    offset: f32,
}

impl Background {
    pub fn new(transform: &CoordinateTransform) -> Self {
        let mut core = ActorCore::new();
        core.size = Vec2::new(transform.width, transform.height);
        Self { core, offset: 0.0 }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}

impl LogicUpdatable for Background {
    type World = GameState;

    fn logic_update(&mut self, ctx: &mut TickContext<'_, GameState>) {
        if ctx.world().playing {
            self.offset += ctx.world().bg_speed * ctx.delta_time();
        }
    }
}

impl Presentable for Background {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        let scroll = -frame.logical_to_pixels_x(self.offset);
        frame.style(StyleAttr::Image(resources::BACKGROUND.to_string()));
        frame.style(StyleAttr::Scroll(scroll));
    }
}

// === Score board ===

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    core: ActorCore,
    shown: Option<u32>,
}

impl ScoreBoard {
    pub fn new(transform: &CoordinateTransform) -> Self {
        let mut core = ActorCore::new();
        core.z = 5;
        core.size = Vec2::new(0.6, 0.36);
        core.pos = Vec2::new(0.0, transform.height * 0.5 - 0.2 - core.size.y * 0.5);
        Self { core, shown: None }
    }

    pub fn shown(&self) -> Option<u32> {
        self.shown
    }
}

impl LogicUpdatable for ScoreBoard {
    type World = GameState;

    fn logic_update(&mut self, ctx: &mut TickContext<'_, GameState>) {
        let score = ctx.world().score;
        if self.shown != Some(score) {
            log::trace!("Score board now shows {score}");
            self.shown = Some(score);
        }
    }
}

impl Presentable for ScoreBoard {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        if let Some(score) = self.shown {
            frame.style(StyleAttr::Text(score.to_string()));
        }
    }
}

// === Game over banner ===

/// Full-scene overlay, hidden until the run ends
#[derive(Debug, Clone)]
pub struct GameOverBanner {
    core: ActorCore,
}

impl GameOverBanner {
    pub fn new(transform: &CoordinateTransform) -> Self {
        let mut core = ActorCore::new();
        core.z = 6;
        core.size = Vec2::new(transform.width, transform.height);
        core.visible = false;
        Self { core }
    }
}

impl LogicUpdatable for GameOverBanner {
    type World = GameState;
}

impl Presentable for GameOverBanner {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        frame.style(StyleAttr::Image(resources::GAME_OVER.to_string()));
    }
}

// === Entity ===

#[derive(Debug, Clone)]
pub enum Entity {
    Bird(Bird),
    Pipe(Pipe),
    Ground(Ground),
    Background(Background),
    ScoreBoard(ScoreBoard),
    GameOverBanner(GameOverBanner),
}

macro_rules! each_entity {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Entity::Bird($inner) => $body,
            Entity::Pipe($inner) => $body,
            Entity::Ground($inner) => $body,
            Entity::Background($inner) => $body,
            Entity::ScoreBoard($inner) => $body,
            Entity::GameOverBanner($inner) => $body,
        }
    };
}

impl Entity {
    pub fn as_bird(&self) -> Option<&Bird> {
        match self {
            Entity::Bird(bird) => Some(bird),
            _ => None,
        }
    }

    pub fn as_bird_mut(&mut self) -> Option<&mut Bird> {
        match self {
            Entity::Bird(bird) => Some(bird),
            _ => None,
        }
    }

    pub fn as_pipe(&self) -> Option<&Pipe> {
        match self {
            Entity::Pipe(pipe) => Some(pipe),
            _ => None,
        }
    }
}

impl LogicUpdatable for Entity {
    type World = GameState;

    fn logic_update(&mut self, ctx: &mut TickContext<'_, GameState>) {
        each_entity!(self, e => e.logic_update(ctx))
    }
}

impl Presentable for Entity {
    fn present_update(&self, frame: &mut PresentFrame<'_>) {
        each_entity!(self, e => e.present_update(frame))
    }
}

impl Actor for Entity {
    fn core(&self) -> &ActorCore {
        each_entity!(self, e => e.core())
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        each_entity!(self, e => e.core_mut())
    }
}

macro_rules! impl_actor {
    ($($ty:ty),*) => {
        $(
            impl Actor for $ty {
                fn core(&self) -> &ActorCore {
                    &self.core
                }
                fn core_mut(&mut self) -> &mut ActorCore {
                    &mut self.core
                }
            }
        )*
    };
}

impl_actor!(Bird, Pipe, Ground, Background, ScoreBoard, GameOverBanner);
