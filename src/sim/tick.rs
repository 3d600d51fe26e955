//! Per-frame advance and the fixed-interval gameplay sweep
//!
//! The frame moves everything; the sweep only judges. Collision and scoring
//! read actor bounds after the most recent frame.

use glam::Vec2;

use super::collision::{RayMarch, Rect};
use super::entities::Entity;
use super::game::Game;
use super::schedule::LoopHandler;
use super::state::GameEvent;
use crate::consts::*;
use crate::resources::SoundCue;
use crate::scene::{Actor, ActorCore, ActorId, DebugColor, PresentationSink};
use crate::vecops;

impl<S: PresentationSink> Game<S> {
    /// One presentation frame at `now` seconds
    pub fn frame(&mut self, now: f64) {
        if self.state.over {
            self.state.decay_speeds(self.scene.delta_time());
        }

        self.scene.logic_tick_at(now, &self.state);

        let scene = &self.scene;
        self.state.pipes.retain(|id| scene.contains(*id));

        self.advance_spawner();
        self.scene.present_tick();
    }

    fn advance_spawner(&mut self) {
        if !self.state.playing || self.state.over {
            return;
        }
        self.state.spawn_timer += self.scene.delta_time();
        if let Some(interval) = self.state.spawn_interval() {
            if self.state.spawn_timer >= interval {
                self.state.spawn_timer -= interval;
                self.spawn_pipes();
            }
        }
    }

    /// Fixed-interval judgement: end the run on contact, score passed pipes
    pub fn sweep(&mut self) {
        if self.collides_with_ground() || self.collides_with_pipe().is_some() || self.collides_with_sky()
        {
            if !self.state.over {
                self.events.push(GameEvent::Sound(SoundCue::Hit));
            }
            self.game_over();
        }
        if !self.state.over && self.passed_pipe() {
            self.add_score();
        }
    }

    fn bird_core(&self) -> Option<&ActorCore> {
        self.scene.actor(self.bird).map(Actor::core)
    }

    /// Ground line in logical units
    pub fn ground_y(&self) -> f32 {
        self.state.ground_y
    }

    /// Bird's lower edge at or below the ground line
    pub fn collides_with_ground(&self) -> bool {
        self.bird_core()
            .is_some_and(|b| b.pos.y - b.size.y * 0.5 < self.state.ground_y)
    }

    /// Bird's centre above the top edge
    pub fn collides_with_sky(&self) -> bool {
        self.bird_core()
            .is_some_and(|b| b.pos.y > self.scene.height() * 0.5)
    }

    /// Bird between the top edge and the ground line
    pub fn in_game_area(&self) -> bool {
        self.bird_core().is_some_and(|b| {
            b.pos.y <= self.scene.height() * 0.5 && b.pos.y - b.size.y * 0.5 >= self.state.ground_y
        })
    }

    /// First pipe touching the bird's shrunken collision box
    ///
    /// Only two opposite corners of the box are tested.
    pub fn collides_with_pipe(&mut self) -> Option<ActorId> {
        let bird = self.bird;
        let (actors, debug) = self.scene.actors_and_debug();
        let core = actors.iter().find(|a| a.id() == bird)?.core();

        let size = vecops::mul(core.size.to_array(), COLLISION_BOX_SCALE);
        let half = vecops::mul(size, 0.5);
        let pos = core.pos.to_array();
        let lt = Vec2::from_array(vecops::sub(pos, half));
        let rd = Vec2::from_array(vecops::sub(vecops::add(pos, size), half));
        debug.draw_rect(lt, rd, DebugColor::Blue);

        for pipe in actors.iter().filter(|a| a.as_pipe().is_some()) {
            let bounds: Rect = pipe.core().bounds();
            debug.draw_rect(bounds.min, bounds.max, DebugColor::Red);
            if bounds.contains(lt) || bounds.contains(rd) {
                return Some(pipe.id());
            }
        }
        None
    }

    /// Whether the bird is over a lower pipe it has not scored yet
    pub fn passed_pipe(&mut self) -> bool {
        let bird = self.bird;
        let spacing = self.state.settings.ray_spacing;
        let (actors, debug) = self.scene.actors_and_debug();
        let Some(origin) = actors.iter().find(|a| a.id() == bird).map(|a| a.core().pos) else {
            return false;
        };

        let lower: Vec<&Entity> = actors
            .iter()
            .filter(|a| a.as_pipe().is_some_and(|p| !p.is_flipped()))
            .collect();
        let ray = RayMarch::new(origin, Vec2::NEG_Y, SCORE_RAY_STEP, SCORE_RAY_STEPS)
            .with_spacing(spacing);
        let hit = ray.cast(&lower, Some(debug)).map(Actor::id);

        match hit {
            Some(pipe) => self.state.claim_score(pipe),
            None => false,
        }
    }

    /// Centre of the nearest gap still ahead of the bird
    pub fn next_gap(&self) -> Option<Vec2> {
        let bird = self.bird_core()?;
        let left = bird.pos.x - bird.size.x * 0.5;
        let half_gap = 0.5 * self.state.settings.pipe_v_distance;
        self.scene
            .actors()
            .iter()
            .filter_map(Entity::as_pipe)
            .filter(|p| !p.is_flipped() && p.core().bounds().max.x >= left)
            .min_by(|a, b| a.core().pos.x.total_cmp(&b.core().pos.x))
            .map(|p| Vec2::new(p.core().pos.x, p.gap_edge() + half_gap))
    }

    /// Idle autopilot: flap whenever the bird sinks below the next gap
    pub fn autopilot_wants_flap(&self) -> bool {
        let Some(bird) = self.bird() else {
            return false;
        };
        if self.state.over || bird.vy > 0.0 {
            return false;
        }
        let target = self
            .next_gap()
            .map_or(self.state.ground_y + 1.0, |gap| gap.y - 0.2);
        bird.core().pos.y < target
    }
}

impl<S: PresentationSink> LoopHandler for Game<S> {
    fn on_paused_frame(&mut self) {
        self.scene.reset_clock();
    }

    fn on_frame(&mut self, now: f64) {
        self.frame(now);
    }

    fn on_sweep(&mut self, _now: f64) {
        self.sweep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ImageCatalog;
    use crate::scene::RecordingSink;
    use crate::settings::Settings;
    use crate::sim::game::Session;

    const DT: f64 = FRAME_DT;

    fn game() -> Game<RecordingSink> {
        Game::new(
            Settings::default(),
            &ImageCatalog::with_defaults(),
            RecordingSink::new(288, 512),
        )
        .unwrap()
    }

    fn move_actor(g: &mut Game<RecordingSink>, id: ActorId, pos: Vec2) {
        g.scene_mut().actor_mut(id).unwrap().core_mut().pos = pos;
    }

    fn lower_pipe(g: &Game<RecordingSink>) -> ActorId {
        g.state()
            .pipes
            .iter()
            .copied()
            .find(|id| {
                g.scene()
                    .actor(*id)
                    .and_then(Entity::as_pipe)
                    .is_some_and(|p| !p.is_flipped())
            })
            .unwrap()
    }

    #[test]
    fn test_flight_rises_then_falls() {
        let mut g = game();
        g.activate();

        let mut ys = Vec::new();
        let mut vys = Vec::new();
        for i in 0..60 {
            g.frame(i as f64 * DT);
            let bird = g.bird().unwrap();
            ys.push(bird.core().pos.y);
            vys.push(bird.vy);
        }

        // First frame has no elapsed time
        assert_eq!(ys[0], 0.0);
        for w in vys[1..].windows(2) {
            assert!((w[0] - w[1] - 9.8 * DT as f32).abs() < 1e-4);
        }
        let apex = ys
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(apex > 1 && apex < 59);
        assert!(ys[1..=apex].windows(2).all(|w| w[1] >= w[0]));
        assert!(ys[apex..].windows(2).all(|w| w[1] <= w[0]));
        // v^2 / 2g
        assert!((ys[apex] - 16.0 / 19.6).abs() < 0.05);
    }

    #[test]
    fn test_pipes_spawn_on_interval() {
        let mut g = game();
        g.activate();
        assert_eq!(g.state().pipes.len(), 2);
        // 1.5 s between pairs at unit speed
        for i in 0..=80 {
            g.frame(i as f64 * DT);
        }
        assert_eq!(g.state().pipes.len(), 2);
        for i in 81..=100 {
            g.frame(i as f64 * DT);
        }
        assert_eq!(g.state().pipes.len(), 4);
    }

    #[test]
    fn test_no_spawn_before_start() {
        let mut g = game();
        for i in 0..300 {
            g.frame(i as f64 * DT);
        }
        assert!(g.state().pipes.is_empty());
        assert_eq!(g.bird().unwrap().core().pos, Vec2::ZERO);
    }

    #[test]
    fn test_ground_contact_ends_game_once() {
        let mut g = game();
        g.activate();
        for i in 0..240 {
            g.frame(i as f64 * DT);
        }
        assert!(g.collides_with_ground());
        g.drain_events();

        g.sweep();
        g.sweep();
        assert!(g.is_over());
        assert_eq!(
            g.drain_events(),
            vec![
                GameEvent::Sound(SoundCue::Hit),
                GameEvent::GameOver { score: 0 }
            ]
        );
    }

    #[test]
    fn test_sky_contact() {
        let mut g = game();
        g.activate();
        let bird = g.bird_id();
        assert!(g.in_game_area());
        move_actor(&mut g, bird, Vec2::new(0.0, 2.6));
        assert!(g.collides_with_sky());
        assert!(!g.in_game_area());
        g.sweep();
        assert!(g.is_over());
    }

    #[test]
    fn test_pipe_contact_uses_shrunken_box() {
        let mut g = game();
        g.activate();
        let bird = g.bird_id();
        let pipe = lower_pipe(&g);

        // Bird box is 0.34 x 0.24; shrunk to 0.272 x 0.192
        // Lower pipe top edge just above the shrunken bottom edge
        move_actor(&mut g, pipe, Vec2::new(0.0, -1.6 - 0.05));
        assert_eq!(g.collides_with_pipe(), Some(pipe));

        // Top edge between the shrunken and the full bottom edge
        move_actor(&mut g, pipe, Vec2::new(0.0, -1.6 - 0.11));
        assert_eq!(g.collides_with_pipe(), None);
        assert!(
            g.scene()
                .actor(bird)
                .unwrap()
                .core()
                .bounds()
                .min
                .y
                < -0.11
        );
    }

    #[test]
    fn test_passing_over_lower_pipe_scores_once() {
        let mut g = game();
        g.activate();
        g.drain_events();
        let pipe = lower_pipe(&g);
        // Top edge 1.0 below the bird, reached by the third sample
        move_actor(&mut g, pipe, Vec2::new(0.0, -1.0 - 1.6));

        g.sweep();
        assert_eq!(g.score(), 1);
        g.sweep();
        assert_eq!(g.score(), 1);
        assert_eq!(
            g.drain_events(),
            vec![GameEvent::Sound(SoundCue::Score), GameEvent::Scored(1)]
        );
        assert!(!g.is_over());
    }

    #[test]
    fn test_no_score_after_game_over() {
        let mut g = game();
        g.activate();
        let pipe = lower_pipe(&g);
        move_actor(&mut g, pipe, Vec2::new(0.0, -1.0 - 1.6));
        g.game_over();
        g.sweep();
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_speeds_decay_after_game_over() {
        let mut g = game();
        g.activate();
        g.frame(0.0);
        g.game_over();
        for i in 1..=61 {
            g.frame(i as f64 * DT);
        }
        let speed = g.state().pipe_speed;
        assert!(speed > 0.0 && speed < 1.0);
        // No new pipes once over
        assert_eq!(g.state().pipes.len(), 2);
    }

    #[test]
    fn test_next_gap_targets_nearest_pipe() {
        let mut g = game();
        assert!(g.next_gap().is_none());
        g.activate();
        let pipe = lower_pipe(&g);
        let gap = g.next_gap().unwrap();
        let lower = g.scene().actor(pipe).and_then(Entity::as_pipe).unwrap();
        assert!((gap.y - (lower.gap_edge() + 0.75)).abs() < 1e-5);
    }

    #[test]
    fn test_debug_overlay_records_sweep_shapes() {
        let settings = Settings {
            debug_overlay: true,
            ..Settings::default()
        };
        let mut g = Game::new(
            settings,
            &ImageCatalog::with_defaults(),
            RecordingSink::new(288, 512),
        )
        .unwrap();
        g.activate();
        g.frame(0.0);
        g.sweep();
        let blue = g
            .scene()
            .debug()
            .shapes()
            .iter()
            .filter(|s| matches!(s, crate::scene::DebugShape::Rect { color: DebugColor::Blue, .. }))
            .count();
        assert_eq!(blue, 1);
    }

    #[test]
    fn test_session_sweeps_while_running() {
        let mut s = Session::new(game());
        s.activate();
        for i in 0..600 {
            s.pump(i as f64 * DT);
            if s.game.is_over() {
                break;
            }
        }
        assert!(s.game.is_over());
        assert!(s.loops().sweeps() > 0);
    }

    #[test]
    fn test_session_pause_freezes_bird() {
        let mut s = Session::new(game());
        s.activate();
        s.pump(0.0);
        s.pump(DT);
        let y = s.game.bird().unwrap().core().pos.y;

        s.set_host_hidden(true, DT);
        for i in 2..120 {
            s.pump(i as f64 * DT);
        }
        assert_eq!(s.game.bird().unwrap().core().pos.y, y);

        // First frame after resuming has no elapsed time
        s.set_host_hidden(false, 2.0);
        s.pump(2.5);
        assert_eq!(s.game.bird().unwrap().core().pos.y, y);
        assert!(!s.game.is_over());
    }
}
