//! Mutable game state shared by actors and the gameplay sweep
//!
//! Actors read it during the logic pass; only [`Game`](super::Game) writes it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::resources::SoundCue;
use crate::scene::ActorId;
use crate::settings::Settings;

/// Events for the host (audio backend, UI) to drain after each pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Sound(SoundCue),
    Scored(u32),
    GameOver { score: u32 },
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Set once the first flap starts the run; stays set after game over
    pub playing: bool,
    /// Whether input still steers the bird
    pub controllable: bool,
    pub over: bool,
    pub score: u32,
    pub pipe_speed: f32,
    pub bg_speed: f32,
    /// Lowest logical y the bird's center may reach
    pub ground_y: f32,
    /// Live pipes in spawn order
    pub pipes: Vec<ActorId>,
    /// Pipe that most recently awarded a point
    pub last_scored: Option<ActorId>,
    /// Seconds since the last pipe pair spawned
    pub spawn_timer: f32,
    rng: Pcg32,
}

impl GameState {
    pub fn new(settings: Settings, scene_height: f32) -> Self {
        Self {
            playing: false,
            controllable: false,
            over: false,
            score: 0,
            pipe_speed: settings.pipe_speed,
            bg_speed: settings.bg_speed,
            ground_y: settings.ground_y(scene_height),
            pipes: Vec::new(),
            last_scored: None,
            spawn_timer: 0.0,
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
        }
    }

    pub fn can_start(&self) -> bool {
        !self.playing && !self.over
    }

    /// Ease both scroll speeds toward rest, never below zero
    pub fn decay_speeds(&mut self, dt: f32) {
        let k = self.settings.decay_rate;
        self.pipe_speed = (self.pipe_speed - k * self.pipe_speed * dt).max(0.0);
        self.bg_speed = (self.bg_speed - k * self.bg_speed * dt).max(0.0);
    }

    /// Seconds between pipe pairs at the current speed
    pub fn spawn_interval(&self) -> Option<f32> {
        (self.pipe_speed > 0.0).then(|| self.settings.pipe_h_distance / self.pipe_speed)
    }

    /// Random vertical offset for the next gap
    pub fn gap_offset(&mut self) -> f32 {
        (self.rng.random::<f32>() - 0.5) * self.settings.pipe_rand_y_range
            + self.settings.ground_height
    }

    /// True the first time a given pipe is passed
    pub fn claim_score(&mut self, pipe: ActorId) -> bool {
        if self.last_scored == Some(pipe) {
            return false;
        }
        self.last_scored = Some(pipe);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Settings::default(), 5.12)
    }

    #[test]
    fn test_decay_over_one_second() {
        let mut s = state();
        assert_eq!(s.pipe_speed, 1.0);
        let dt = 1.0 / 60.0;
        let mut prev = s.pipe_speed;
        for _ in 0..60 {
            s.decay_speeds(dt);
            assert!(s.pipe_speed < prev);
            assert!(s.pipe_speed > 0.0);
            prev = s.pipe_speed;
        }
        // (1 - 0.8/60)^60 ≈ e^-0.8
        assert!((s.pipe_speed - 0.448).abs() < 0.01);
        assert!(s.bg_speed > 0.0 && s.bg_speed < 0.5);
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let mut s = state();
        s.decay_speeds(2.0);
        assert_eq!(s.pipe_speed, 0.0);
        assert_eq!(s.bg_speed, 0.0);
        assert!(s.spawn_interval().is_none());
    }

    #[test]
    fn test_spawn_interval() {
        let s = state();
        assert_eq!(s.spawn_interval(), Some(1.5));
    }

    #[test]
    fn test_gap_offset_range_and_determinism() {
        let mut a = state();
        let mut b = state();
        for _ in 0..100 {
            let x = a.gap_offset();
            assert_eq!(x, b.gap_offset());
            assert!((0.25..=1.75).contains(&x));
        }
    }

    #[test]
    fn test_claim_score_once_per_pipe() {
        let mut s = state();
        let (p1, p2) = (ActorId::next(), ActorId::next());
        assert!(s.claim_score(p1));
        assert!(!s.claim_score(p1));
        assert!(s.claim_score(p2));
        assert!(s.claim_score(p1));
    }

    #[test]
    fn test_can_start() {
        let mut s = state();
        assert!(s.can_start());
        s.playing = true;
        assert!(!s.can_start());
        s.playing = false;
        s.over = true;
        assert!(!s.can_start());
    }
}
