//! The scene: actor registry, clock and coordinate authority

use std::time::Instant;

use glam::Vec2;

use super::actor::{Actor, ActorId, SceneId, TickContext};
use super::debug::DebugOverlay;
use super::present::{Placement, PresentFrame, PresentationSink};
use super::transform::CoordinateTransform;
use crate::error::SceneError;

/// Attach an actor to a scene, failing if there is no scene to own it
pub fn attach<A, S>(scene: Option<&mut Scene<A, S>>, actor: A) -> Result<ActorId, SceneError>
where
    A: Actor,
    S: PresentationSink,
{
    let scene = scene.ok_or(SceneError::MissingScene {
        actor: std::any::type_name::<A>(),
    })?;
    Ok(scene.register(actor))
}

/// Owns an ordered set of actors and drives their update passes
///
/// Registration order is iteration order; paint order is decided by each
/// actor's `z` alone.
pub struct Scene<A: Actor, S: PresentationSink> {
    id: SceneId,
    transform: CoordinateTransform,
    actors: Vec<A>,
    delta_time: f32,
    prev: Option<f64>,
    epoch: Instant,
    sink: S,
    debug: DebugOverlay,
}

impl<A: Actor, S: PresentationSink> Scene<A, S> {
    /// Create a scene `width` units wide; height follows the sink's aspect ratio
    pub fn new(width: f32, sink: S) -> Self {
        let surface = sink.surface_size();
        let transform = CoordinateTransform::for_surface(width, surface);
        log::debug!(
            "Scene created: {:.2} x {:.2} units on {}x{} surface",
            transform.width,
            transform.height,
            surface.0,
            surface.1
        );
        Self {
            id: SceneId::next(),
            transform,
            actors: Vec::new(),
            delta_time: 0.0,
            prev: None,
            epoch: Instant::now(),
            sink,
            debug: DebugOverlay::new(transform, surface),
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn width(&self) -> f32 {
        self.transform.width
    }

    pub fn height(&self) -> f32 {
        self.transform.height
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Seconds between the last two logic ticks
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn actors(&self) -> &[A] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.position(id).is_some()
    }

    pub fn actor(&self, id: ActorId) -> Option<&A> {
        self.actors.iter().find(|a| a.id() == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut A> {
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn debug(&self) -> &DebugOverlay {
        &self.debug
    }

    pub fn debug_mut(&mut self) -> &mut DebugOverlay {
        &mut self.debug
    }

    /// Borrow the actor list and the overlay at the same time
    pub fn actors_and_debug(&mut self) -> (&[A], &mut DebugOverlay) {
        (&self.actors, &mut self.debug)
    }

    /// Add an actor and point its back-reference here
    ///
    /// Registering an id that is already present replaces the stored value in
    /// place without changing its position in the sequence.
    pub fn register(&mut self, mut actor: A) -> ActorId {
        let id = actor.id();
        actor.core_mut().set_scene(Some(self.id));
        match self.position(id) {
            Some(i) => self.actors[i] = actor,
            None => {
                log::debug!("Actor {} registered", id.raw());
                self.actors.push(actor);
            }
        }
        id
    }

    /// Remove an actor by identity and clear its back-reference
    ///
    /// The presentation node is kept so the actor can move to another scene.
    pub fn unregister(&mut self, id: ActorId) -> Option<A> {
        let i = self.position(id)?;
        let mut actor = self.actors.remove(i);
        actor.core_mut().set_scene(None);
        Some(actor)
    }

    /// Remove an actor and release its presentation node
    pub fn detach(&mut self, id: ActorId) -> Option<A> {
        let actor = self.unregister(id)?;
        self.sink.release(id);
        log::debug!("Actor {} detached", id.raw());
        Some(actor)
    }

    /// Run one logic pass against the wall clock
    pub fn logic_tick(&mut self, world: &A::World) {
        let now = self.epoch.elapsed().as_secs_f64();
        self.logic_tick_at(now, world);
    }

    /// Run one logic pass with an explicit timestamp in seconds
    ///
    /// The first tick after creation or [`reset_clock`](Self::reset_clock)
    /// has a zero delta. Detach requests made during the pass are applied
    /// once every actor has been visited.
    pub fn logic_tick_at(&mut self, now: f64, world: &A::World) {
        let prev = *self.prev.get_or_insert(now);
        self.delta_time = (now - prev).max(0.0) as f32;

        let mut detach_requests = Vec::new();
        for actor in self.actors.iter_mut() {
            let id = actor.id();
            if actor.core().active {
                let mut ctx = TickContext::new(
                    id,
                    self.delta_time,
                    &self.transform,
                    world,
                    &mut detach_requests,
                );
                actor.logic_update(&mut ctx);
            }
            self.sink.set_depth(id, actor.core().z);
        }

        for id in detach_requests {
            self.detach(id);
        }

        self.debug.redraw(self.actors.iter().map(|a| a.core()));
        self.prev = Some(now);
        log::trace!("Logic tick: dt={:.4}s, {} actors", self.delta_time, self.actors.len());
    }

    /// Forget the previous timestamp so the next tick has a zero delta
    pub fn reset_clock(&mut self) {
        self.prev = None;
    }

    /// Push visibility and placement of every actor to the sink
    pub fn present_tick(&mut self) {
        for actor in &self.actors {
            let core = actor.core();
            let id = core.id();
            self.sink.set_visible(id, core.visible);
            if !core.visible {
                continue;
            }
            let placement =
                Placement::from_center(&self.transform, core.pos, core.size, core.rotation);
            self.sink.place(id, placement);
            let mut frame = PresentFrame::new(id, &self.transform, &mut self.sink);
            actor.present_update(&mut frame);
        }
    }

    pub fn to_presentation_ratio(&self, pos: Vec2) -> Vec2 {
        self.transform.to_presentation_ratio(pos)
    }

    pub fn size_to_presentation_ratio(&self, size: Vec2) -> Vec2 {
        self.transform.size_to_presentation_ratio(size)
    }

    fn position(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|a| a.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ActorCore, LogicUpdatable, Presentable, RecordingSink, StyleAttr};

    /// Records visits into a shared log and can remove itself on demand
    struct Marker {
        core: ActorCore,
        tag: usize,
        leave_on_tick: bool,
    }

    impl Marker {
        fn new(tag: usize) -> Self {
            Self {
                core: ActorCore::new(),
                tag,
                leave_on_tick: false,
            }
        }
    }

    #[derive(Default)]
    struct Log {
        visits: std::cell::RefCell<Vec<usize>>,
        deltas: std::cell::RefCell<Vec<f32>>,
    }

    impl LogicUpdatable for Marker {
        type World = Log;

        fn logic_update(&mut self, ctx: &mut TickContext<'_, Log>) {
            ctx.world().visits.borrow_mut().push(self.tag);
            ctx.world().deltas.borrow_mut().push(ctx.delta_time());
            if self.leave_on_tick {
                ctx.detach_self();
            }
        }
    }

    impl Presentable for Marker {
        fn present_update(&self, frame: &mut PresentFrame<'_>) {
            frame.style(StyleAttr::Text(self.tag.to_string()));
        }
    }

    impl Actor for Marker {
        fn core(&self) -> &ActorCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut ActorCore {
            &mut self.core
        }
    }

    fn scene() -> Scene<Marker, RecordingSink> {
        Scene::new(2.0, RecordingSink::new(200, 400))
    }

    #[test]
    fn test_height_derived_from_surface() {
        let s = scene();
        assert_eq!(s.width(), 2.0);
        assert!((s.height() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_attach_requires_scene() {
        let err = attach::<Marker, RecordingSink>(None, Marker::new(0)).unwrap_err();
        assert!(matches!(err, SceneError::MissingScene { .. }));

        let mut s = scene();
        let id = attach(Some(&mut s), Marker::new(0)).unwrap();
        assert_eq!(s.actor(id).unwrap().core().scene(), Some(s.id()));
    }

    #[test]
    fn test_reregister_after_unregister() {
        let mut s = scene();
        let a = s.register(Marker::new(1));
        s.register(Marker::new(2));
        let mut again = s.unregister(a).unwrap();
        assert!(again.core().scene().is_none());
        s.register(Marker::new(3));

        again.tag = 10;
        assert_eq!(s.register(again), a);

        let tags: Vec<_> = s.actors().iter().map(|p| p.tag).collect();
        assert_eq!(tags, vec![2, 3, 10]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.actor(a).unwrap().core().scene(), Some(s.id()));
    }

    #[test]
    fn test_cloned_actor_is_distinct() {
        let mut first = scene();
        let mut second = scene();
        let a = first.register(Marker::new(1));
        let copy = Marker {
            core: first.actor(a).unwrap().core.clone(),
            tag: 2,
            leave_on_tick: false,
        };
        let b = second.register(copy);
        assert_ne!(a, b);
        assert!(!second.contains(a));
        assert_eq!(first.actor(a).unwrap().core().scene(), Some(first.id()));
    }

    #[test]
    fn test_detach_releases_node() {
        let mut s = scene();
        let a = s.register(Marker::new(1));
        s.present_tick();
        assert!(s.sink().node(a).is_some());

        let removed = s.detach(a).unwrap();
        assert!(removed.core().scene().is_none());
        assert!(s.sink().node(a).is_none());
        assert_eq!(s.sink().released(), &[a]);
        assert!(s.detach(a).is_none());
    }

    #[test]
    fn test_self_detach_mid_tick_visits_everyone_once() {
        let mut s = scene();
        for tag in 1..=5 {
            let mut p = Marker::new(tag);
            p.leave_on_tick = tag == 3;
            s.register(p);
        }
        let log = Log::default();
        s.logic_tick_at(0.0, &log);
        assert_eq!(*log.visits.borrow(), vec![1, 2, 3, 4, 5]);

        let tags: Vec<_> = s.actors().iter().map(|p| p.tag).collect();
        assert_eq!(tags, vec![1, 2, 4, 5]);

        log.visits.borrow_mut().clear();
        s.logic_tick_at(0.1, &log);
        assert_eq!(*log.visits.borrow(), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut s = scene();
        s.register(Marker::new(1));
        let log = Log::default();
        s.logic_tick_at(100.0, &log);
        assert_eq!(s.delta_time(), 0.0);
        s.logic_tick_at(100.25, &log);
        assert!((s.delta_time() - 0.25).abs() < 1e-6);
        assert_eq!(*log.deltas.borrow(), vec![0.0, 0.25]);
    }

    #[test]
    fn test_reset_clock_avoids_spike() {
        let mut s = scene();
        let log = Log::default();
        s.logic_tick_at(1.0, &log);
        s.logic_tick_at(1.016, &log);
        s.reset_clock();
        s.logic_tick_at(60.0, &log);
        assert_eq!(s.delta_time(), 0.0);
    }

    #[test]
    fn test_wall_clock_tick() {
        let mut s = scene();
        s.register(Marker::new(1));
        let log = Log::default();
        s.logic_tick(&log);
        assert_eq!(s.delta_time(), 0.0);
        s.logic_tick(&log);
        assert!(s.delta_time() >= 0.0);
        assert!(s.delta_time() < 1.0);
        assert_eq!(log.visits.borrow().len(), 2);
    }

    #[test]
    fn test_zero_height_surface_places_finite() {
        let mut s = Scene::new(2.0, RecordingSink::new(200, 0));
        assert_eq!(s.height(), 2.0);
        let mut m = Marker::new(1);
        m.core.size = Vec2::new(0.5, 0.5);
        let id = s.register(m);
        s.present_tick();
        let p = s.sink().node(id).unwrap().placement.unwrap();
        assert!(p.left.is_finite() && p.top.is_finite());
        assert!(p.width.is_finite() && p.height.is_finite());
    }

    #[test]
    fn test_inactive_actor_skipped_but_depth_synced() {
        let mut s = scene();
        let mut p = Marker::new(7);
        p.core.active = false;
        p.core.z = 4;
        let id = s.register(p);
        let log = Log::default();
        s.logic_tick_at(0.0, &log);
        assert!(log.visits.borrow().is_empty());
        assert_eq!(s.sink().node(id).unwrap().depth, 4);
    }

    #[test]
    fn test_present_tick_places_visible_only() {
        let mut s = scene();
        let mut shown = Marker::new(1);
        shown.core.size = Vec2::new(1.0, 2.0);
        let shown = s.register(shown);
        let mut hidden = Marker::new(2);
        hidden.core.visible = false;
        let hidden = s.register(hidden);

        s.present_tick();

        let node = s.sink().node(shown).unwrap();
        assert!(node.visible);
        let p = node.placement.unwrap();
        assert!((p.left - 25.0).abs() < 1e-4);
        assert!((p.top - 25.0).abs() < 1e-4);
        assert_eq!(node.text(), Some("1"));

        let node = s.sink().node(hidden).unwrap();
        assert!(!node.visible);
        assert!(node.placement.is_none());
        assert!(node.text().is_none());
    }

    #[test]
    fn test_actor_moves_between_scenes() {
        let mut first = scene();
        let mut second = scene();
        let id = first.register(Marker::new(1));
        let actor = first.unregister(id).unwrap();
        second.register(actor);
        assert!(!first.contains(id));
        assert_eq!(second.actor(id).unwrap().core().scene(), Some(second.id()));
    }
}
