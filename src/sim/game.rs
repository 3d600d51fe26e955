//! The game: one scene, its state and the pending host events
//!
//! Input arrives through [`Game::activate`]. Time arrives through
//! [`Game::frame`] and [`Game::sweep`], normally driven by a [`Session`].

use glam::Vec2;

use super::entities::{Background, Bird, Entity, GameOverBanner, Ground, Pipe, ScoreBoard};
use super::schedule::{DualLoop, RunState};
use super::state::{GameEvent, GameState};
use crate::consts::PIPE_SPAWN_X_FACTOR;
use crate::error::ResourceError;
use crate::resources::{self, ImageCatalog, SoundCue};
use crate::scene::{Actor, ActorId, PresentationSink, Scene};
use crate::settings::Settings;

pub struct Game<S: PresentationSink> {
    pub(super) scene: Scene<Entity, S>,
    pub(super) state: GameState,
    pub(super) bird: ActorId,
    pub(super) banner: ActorId,
    pipe_size: Vec2,
    pub(super) events: Vec<GameEvent>,
}

impl<S: PresentationSink> Game<S> {
    /// Build the scene; fails if a sprite the game needs is not in `catalog`
    pub fn new(settings: Settings, catalog: &ImageCatalog, sink: S) -> Result<Self, ResourceError> {
        let mut scene = Scene::new(settings.scene_width, sink);
        scene.debug_mut().enabled = settings.debug_overlay;
        scene.debug_mut().actor_debug = settings.debug_actors;

        let pipe = catalog.image(resources::PIPE)?;
        let pipe_size = Vec2::new(pipe.width as f32, pipe.height as f32) * settings.pix_scale;

        let mut bird = Bird::new(catalog, settings.pix_scale)?;
        // Frozen until the first flap
        bird.core_mut().active = false;

        let transform = *scene.transform();
        scene.register(Entity::Background(Background::new(&transform)));
        scene.register(Entity::Ground(Ground::new(
            &transform,
            settings.ground_height,
        )));
        scene.register(Entity::ScoreBoard(ScoreBoard::new(&transform)));
        let bird = scene.register(Entity::Bird(bird));
        let banner = scene.register(Entity::GameOverBanner(GameOverBanner::new(&transform)));

        let state = GameState::new(settings, transform.height);
        log::info!(
            "Game ready: scene {:.2} x {:.2}, ground at {:.2}",
            transform.width,
            transform.height,
            state.ground_y
        );
        Ok(Self {
            scene,
            state,
            bird,
            banner,
            pipe_size,
            events: Vec::new(),
        })
    }

    pub fn scene(&self) -> &Scene<Entity, S> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<Entity, S> {
        &mut self.scene
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn bird(&self) -> Option<&Bird> {
        self.scene.actor(self.bird).and_then(Entity::as_bird)
    }

    pub fn bird_id(&self) -> ActorId {
        self.bird
    }

    pub fn is_over(&self) -> bool {
        self.state.over
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Player input: start the run if possible, then flap
    pub fn activate(&mut self) {
        if self.state.can_start() {
            self.start();
        }
        if self.state.over {
            return;
        }
        let velocity = self.state.settings.flap_velocity;
        if let Some(bird) = self.scene.actor_mut(self.bird).and_then(Entity::as_bird_mut) {
            bird.fly_up(velocity);
        }
        self.events.push(GameEvent::Sound(SoundCue::Flap));
    }

    fn start(&mut self) {
        self.state.playing = true;
        self.state.controllable = true;
        self.state.spawn_timer = 0.0;
        if let Some(bird) = self.scene.actor_mut(self.bird) {
            bird.core_mut().active = true;
        }
        self.spawn_pipes();
        self.events.push(GameEvent::Started);
        log::info!("Game started");
    }

    /// Spawn an upper and lower pipe pair at the right edge
    pub fn spawn_pipes(&mut self) {
        let offset = self.state.gap_offset();
        let half_gap = 0.5 * self.state.settings.pipe_v_distance;
        let half_h = 0.5 * self.pipe_size.y;
        let x = self.scene.width() * PIPE_SPAWN_X_FACTOR;

        let mut upper = Pipe::new(self.pipe_size, true);
        upper.core_mut().pos = Vec2::new(x, half_h + half_gap + offset);
        let mut lower = Pipe::new(self.pipe_size, false);
        lower.core_mut().pos = Vec2::new(x, -(half_h + half_gap) + offset);

        let upper = self.scene.register(Entity::Pipe(upper));
        let lower = self.scene.register(Entity::Pipe(lower));
        self.state.pipes.extend([upper, lower]);
        log::debug!("Spawned pipe pair with gap centre {offset:.2}");
    }

    /// End the run; later calls do nothing
    pub fn game_over(&mut self) {
        if self.state.over {
            return;
        }
        self.state.over = true;
        self.state.controllable = false;
        self.state.playing = true;
        if let Some(banner) = self.scene.actor_mut(self.banner) {
            banner.core_mut().visible = true;
        }
        self.events.push(GameEvent::GameOver {
            score: self.state.score,
        });
        log::info!("Game over, score {}", self.state.score);
    }

    pub fn add_score(&mut self) {
        self.state.score += 1;
        self.events.push(GameEvent::Sound(SoundCue::Score));
        self.events.push(GameEvent::Scored(self.state.score));
        log::debug!("Score {}", self.state.score);
    }
}

/// A game driven by the dual loop
pub struct Session<S: PresentationSink> {
    pub game: Game<S>,
    loops: DualLoop,
}

impl<S: PresentationSink> Session<S> {
    pub fn new(game: Game<S>) -> Self {
        let settings = &game.state.settings;
        let loops = DualLoop::new(settings.sweep_hz, settings.resume_settle_secs);
        Self { game, loops }
    }

    /// One display refresh at `now` seconds
    pub fn pump(&mut self, now: f64) {
        self.loops.pump(now, &mut self.game);
    }

    pub fn set_host_hidden(&mut self, hidden: bool, now: f64) {
        self.loops.set_host_hidden(hidden, now);
    }

    pub fn activate(&mut self) {
        self.game.activate();
    }

    pub fn run_state(&self) -> RunState {
        self.loops.state()
    }

    pub fn loops(&self) -> &DualLoop {
        &self.loops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingSink;

    fn game() -> Game<RecordingSink> {
        Game::new(
            Settings::default(),
            &ImageCatalog::with_defaults(),
            RecordingSink::new(288, 512),
        )
        .unwrap()
    }

    #[test]
    fn test_new_builds_scene() {
        let g = game();
        assert_eq!(g.scene().len(), 5);
        assert!((g.scene().height() - 5.12).abs() < 1e-5);
        let bird = g.bird().unwrap();
        assert!(!bird.core().active);
        assert!(g.state().pipes.is_empty());
        assert!(g.events().is_empty());
    }

    #[test]
    fn test_new_fails_without_pipe_sprite() {
        let catalog = ImageCatalog::with_defaults();
        let mut missing = ImageCatalog::new();
        for key in [
            resources::BIRD_UPFLAP,
            resources::BIRD_MIDFLAP,
            resources::BIRD_DOWNFLAP,
        ] {
            missing.insert(key, catalog.image(key).unwrap());
        }
        let err = Game::new(Settings::default(), &missing, RecordingSink::new(288, 512))
            .err()
            .unwrap();
        assert!(matches!(err, ResourceError::NotLoaded { ref key } if key == resources::PIPE));
    }

    #[test]
    fn test_activate_starts_and_flaps() {
        let mut g = game();
        g.activate();
        assert!(g.state().playing);
        assert!(g.state().controllable);
        assert_eq!(g.state().pipes.len(), 2);
        let bird = g.bird().unwrap();
        assert!(bird.core().active);
        assert_eq!(bird.vy, 4.0);
        assert_eq!(
            g.drain_events(),
            vec![GameEvent::Started, GameEvent::Sound(SoundCue::Flap)]
        );

        // Later taps only flap
        g.activate();
        assert_eq!(g.state().pipes.len(), 2);
        assert_eq!(g.drain_events(), vec![GameEvent::Sound(SoundCue::Flap)]);
    }

    #[test]
    fn test_pipe_pair_gap() {
        let mut g = game();
        g.activate();
        let pipes: Vec<_> = g
            .state()
            .pipes
            .iter()
            .filter_map(|id| g.scene().actor(*id).and_then(Entity::as_pipe))
            .collect();
        let (upper, lower) = (pipes[0], pipes[1]);
        assert!(upper.is_flipped());
        assert!(!lower.is_flipped());
        assert!((upper.gap_edge() - lower.gap_edge() - 1.5).abs() < 1e-4);
        assert!((upper.core().pos.x - 0.6 * 2.88).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut g = game();
        g.activate();
        g.drain_events();
        g.game_over();
        g.game_over();
        assert_eq!(g.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
        assert!(!g.state().controllable);
        assert!(g.scene().actor(g.banner).unwrap().core().visible);

        // No flap once over
        g.activate();
        assert!(g.events().is_empty());
    }

    #[test]
    fn test_session_starts_running() {
        let game = Game::new(
            Settings::default(),
            &ImageCatalog::with_defaults(),
            crate::scene::NullSink::new(288, 512),
        )
        .unwrap();
        let s = Session::new(game);
        assert_eq!(s.run_state(), RunState::Running);
        assert!((s.loops().sweep_interval() - 0.1).abs() < 1e-12);
    }
}
