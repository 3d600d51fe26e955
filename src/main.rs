//! Headless runner
//!
//! Plays one round on a simulated 60 Hz display with the autopilot at the
//! controls. Usage: `skyflap [settings.json]`

use skyflap::consts::*;
use skyflap::resources::{ImageCatalog, SoundBank};
use skyflap::scene::{ActorId, DebugShape, Placement, PresentationSink, StyleAttr};
use skyflap::sim::{Game, GameEvent, Session};
use skyflap::Settings;

/// Longest simulated run in seconds
const MAX_RUN_SECS: f64 = 120.0;
/// Simulated tab switch: hidden at `HIDE_AT` for `HIDE_FOR` seconds
const HIDE_AT: f64 = 5.0;
const HIDE_FOR: f64 = 1.0;

/// Sink that traces node updates instead of painting them
struct LogSink {
    size: (u32, u32),
}

impl PresentationSink for LogSink {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_visible(&mut self, _id: ActorId, _visible: bool) {}

    fn set_depth(&mut self, _id: ActorId, _z: i32) {}

    fn place(&mut self, id: ActorId, p: Placement) {
        log::trace!(
            "node {}: {:.1}%,{:.1}% {:.1}x{:.1} rot {:.0}",
            id.raw(),
            p.left,
            p.top,
            p.width,
            p.height,
            p.rotation
        );
    }

    fn style(&mut self, id: ActorId, attr: StyleAttr) {
        log::trace!("node {}: {attr:?}", id.raw());
    }

    fn release(&mut self, id: ActorId) {
        log::trace!("node {} released", id.raw());
    }
}

/// Trace the overlay the way a renderer would consume it
fn trace_overlay(shapes: &[DebugShape]) {
    for shape in shapes {
        match shape {
            DebugShape::Rect {
                origin,
                extent,
                color,
            } => log::trace!(
                "overlay rect {} at ({:.0}, {:.0}) size ({:.0}, {:.0})",
                color.hex(),
                origin.x,
                origin.y,
                extent.x,
                extent.y
            ),
            DebugShape::Line { from, to, color } => log::trace!(
                "overlay line {} ({:.0}, {:.0}) -> ({:.0}, {:.0})",
                color.hex(),
                from.x,
                from.y,
                to.x,
                to.y
            ),
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Skyflap (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let catalog = ImageCatalog::with_defaults();
    let game = match Game::new(settings, &catalog, LogSink { size: (288, 512) }) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to build game: {e}");
            std::process::exit(1);
        }
    };

    let mut session = Session::new(game);
    let mut sounds = SoundBank::default();
    let mut hidden = false;

    session.activate();
    let mut frame = 0u64;
    loop {
        let now = frame as f64 * FRAME_DT;
        if now > MAX_RUN_SECS {
            log::warn!("Stopping after {MAX_RUN_SECS}s");
            break;
        }

        let hide = (HIDE_AT..HIDE_AT + HIDE_FOR).contains(&now);
        if hide != hidden {
            hidden = hide;
            session.set_host_hidden(hidden, now);
        }

        if !session.loops().is_paused() && session.game.autopilot_wants_flap() {
            session.activate();
        }
        session.pump(now);
        let overlay = session.game.scene().debug();
        if overlay.enabled {
            trace_overlay(overlay.shapes());
        }

        for event in session.game.drain_events() {
            match event {
                GameEvent::Sound(cue) => {
                    let voice = sounds.play(cue);
                    log::debug!("Play {} on voice {}", cue.asset(), voice.index);
                }
                GameEvent::Scored(score) => log::info!("Score: {score}"),
                GameEvent::Started | GameEvent::GameOver { .. } => {}
            }
        }

        if session.game.is_over() {
            break;
        }
        frame += 1;
    }

    sounds.stop_all();
    log::info!(
        "Final score {} after {} frames and {} sweeps",
        session.game.score(),
        session.loops().frames(),
        session.loops().sweeps()
    );
}
