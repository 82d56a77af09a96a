//! Frame driver: update, cull and draw.

use super::{Clock, DrawItem, RenderInfo, Renderer};
use crate::logging::{init_logging, LoggingConfig};
use crate::scene::{PlaneCuller, SceneError, SceneGraph, VisibleSet};
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier from wall time to application time.
    pub time_scale: f64,
    /// Test world bounds against the culler planes. When off every leaf
    /// not marked [`CullingMode::Always`](crate::scene::CullingMode::Always)
    /// is drawn.
    pub culling: bool,
    /// Logger setup.
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            culling: true,
            logging: LoggingConfig::default(),
        }
    }
}

/// Owns a scene and steps it frame by frame.
///
/// Each frame updates every root of the scene to the application time,
/// collects the visible leaves and hands each one to a [`Renderer`].
#[derive(Debug)]
pub struct Engine {
    /// The scene being driven.
    pub scene: SceneGraph,
    /// Application time source.
    pub clock: Clock,
    /// Planes used when culling is on.
    pub culler: PlaneCuller,
    config: EngineConfig,
    visible: VisibleSet,
    info: RenderInfo,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with a custom configuration. Installs the logger
    /// on first use.
    pub fn with_config(config: EngineConfig) -> Self {
        init_logging(&config.logging);

        let mut clock = Clock::new();
        clock.set_time_scale(config.time_scale);

        log::debug!("Engine created (culling: {}, time scale: {})", config.culling, config.time_scale);
        Self {
            scene: SceneGraph::new(),
            clock,
            culler: PlaneCuller::new(),
            config,
            visible: VisibleSet::new(),
            info: RenderInfo::default(),
        }
    }

    /// Get the configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Turn culling on or off.
    pub fn set_culling(&mut self, culling: bool) {
        self.config.culling = culling;
    }

    /// Change the time scale.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.clock.set_time_scale(scale);
        self.config.time_scale = self.clock.time_scale();
    }

    /// Statistics of the last frame.
    #[inline]
    pub fn info(&self) -> &RenderInfo {
        &self.info
    }

    /// Leaves collected by the last frame or [`Engine::cull`].
    #[inline]
    pub fn visible_set(&self) -> &VisibleSet {
        &self.visible
    }

    /// Update every root of the scene to `application_time`. Returns true
    /// if any controller changed its object.
    pub fn update(&mut self, application_time: f64) -> Result<bool, SceneError> {
        let roots: Vec<_> = self.scene.roots().collect();
        let mut changed = false;
        for root in roots {
            changed |= self.scene.update(root, application_time, true)?;
        }
        Ok(changed)
    }

    /// Recollect the visible leaves of every root.
    pub fn cull(&mut self) -> &VisibleSet {
        if self.config.culling {
            self.culler.reset();
            for root in self.scene.roots() {
                self.scene.get_visible_set(root, &mut self.culler);
            }
            self.visible.clone_from(self.culler.visible_set());
        } else {
            self.visible.clear();
            for root in self.scene.roots() {
                self.scene.get_visible_set(root, &mut self.visible);
            }
        }
        &self.visible
    }

    /// Run one frame at the clock's next application time.
    pub fn render_frame<R>(&mut self, renderer: &mut R) -> Result<&RenderInfo, SceneError>
    where
        R: Renderer + ?Sized,
    {
        let time = self.clock.tick();
        self.render_frame_at(time, renderer)
    }

    /// Run one frame at an explicit application time.
    pub fn render_frame_at<R>(&mut self, application_time: f64, renderer: &mut R) -> Result<&RenderInfo, SceneError>
    where
        R: Renderer + ?Sized,
    {
        self.info.reset();
        self.info.frame += 1;
        self.info.application_time = application_time;

        self.update(application_time)?;
        self.cull();

        renderer.begin_frame(self.info.frame);
        for id in self.visible.iter() {
            let Some(spatial) = self.scene.get(id) else {
                continue;
            };
            let world = spatial.world();
            renderer.draw(&DrawItem {
                node: id,
                world: world.to_matrix(),
                inverse_world: world.inverse(),
            });
            self.info.draw_calls += 1;
        }
        self.info.visible = self.visible.len() as u32;
        renderer.end_frame(&self.info);

        log::trace!(
            "Frame {} at t = {application_time}: {} visible, {} draw calls",
            self.info.frame,
            self.info.visible,
            self.info.draw_calls
        );
        Ok(&self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeId;
    use crate::math::{Bound, Matrix4, Plane, Point3, Vector3};
    use crate::scene::{Controller, Spatial};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<u64>,
        items: Vec<DrawItem>,
        finished: Vec<RenderInfo>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self, frame: u64) {
            self.frames.push(frame);
        }

        fn draw(&mut self, item: &DrawItem) {
            self.items.push(*item);
        }

        fn end_frame(&mut self, info: &RenderInfo) {
            self.finished.push(info.clone());
        }
    }

    struct Orbit;

    impl Controller<Spatial> for Orbit {
        fn update(&mut self, application_time: f64, object: &mut Spatial) -> bool {
            object
                .local_mut()
                .set_translate(Vector3::new(application_time as f32, 0.0, 0.0));
            true
        }
    }

    fn scene(engine: &mut Engine) -> (NodeId, NodeId, NodeId) {
        let bound = Bound::new(Point3::ORIGIN, 1.0);
        let root = engine.scene.create_node("root");
        let left = engine.scene.create_leaf("left", bound);
        let right = engine.scene.create_leaf("right", bound);
        engine.scene.attach_child(root, left).unwrap();
        engine.scene.attach_child(root, right).unwrap();
        engine
            .scene
            .get_mut(left)
            .unwrap()
            .local_mut()
            .set_translate(Vector3::new(-5.0, 0.0, 0.0));
        engine
            .scene
            .get_mut(right)
            .unwrap()
            .local_mut()
            .set_translate(Vector3::new(5.0, 0.0, 0.0));
        (root, left, right)
    }

    #[test]
    fn test_frame_draws_visible_leaves() {
        let mut engine = Engine::new();
        let (_, left, right) = scene(&mut engine);
        engine.culler.push_plane(Plane::new(Vector3::UNIT_X, 0.0));

        let mut recorder = Recorder::default();
        let info = engine.render_frame_at(0.0, &mut recorder).unwrap().clone();

        assert_eq!(info.frame, 1);
        assert_eq!(info.visible, 1);
        assert_eq!(info.draw_calls, 1);
        assert_eq!(recorder.frames, vec![1]);
        assert_eq!(recorder.finished, vec![info]);

        let item = recorder.items[0];
        assert_eq!(item.node, right);
        assert!(item.world.approx_eq(&Matrix4::from_translation(&Vector3::new(5.0, 0.0, 0.0)), 1e-6));
        assert!(item.world.multiply(&item.inverse_world).approx_eq(&Matrix4::IDENTITY, 1e-6));
        assert!(!engine.visible_set().contains(left));
    }

    #[test]
    fn test_culling_off_draws_everything() {
        let mut engine = Engine::with_config(EngineConfig {
            culling: false,
            ..EngineConfig::default()
        });
        scene(&mut engine);
        engine.culler.push_plane(Plane::new(Vector3::UNIT_X, 0.0));

        let mut recorder = Recorder::default();
        engine.render_frame_at(0.0, &mut recorder).unwrap();
        assert_eq!(recorder.items.len(), 2);
    }

    #[test]
    fn test_controllers_follow_application_time() {
        let mut engine = Engine::new();
        let (root, _, right) = scene(&mut engine);
        engine.scene.get_mut(root).unwrap().attach_controller(Box::new(Orbit)).unwrap();

        assert_eq!(engine.update(3.0), Ok(true));

        let mut recorder = Recorder::default();
        engine.render_frame_at(3.0, &mut recorder).unwrap();
        let center = engine.scene.get(right).unwrap().world_bound().center;
        assert!(center.approx_eq(&Point3::new(8.0, 0.0, 0.0), 1e-6));
        assert_eq!(engine.info().application_time, 3.0);

        engine.render_frame_at(4.0, &mut recorder).unwrap();
        assert_eq!(engine.info().frame, 2);
        assert_eq!(recorder.frames, vec![1, 2]);
    }

    #[test]
    fn test_clock_driven_frame() {
        let mut engine = Engine::new();
        scene(&mut engine);
        engine.set_time_scale(0.0);

        let mut recorder = Recorder::default();
        engine.render_frame(&mut recorder).unwrap();
        engine.render_frame(&mut recorder).unwrap();
        assert_eq!(engine.info().application_time, 0.0);
        assert_eq!(recorder.items.len(), 4);
    }

    #[test]
    fn test_config_from_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"time_scale": 0.5}"#).unwrap();
        assert_eq!(config.time_scale, 0.5);
        assert!(config.culling);

        let engine = Engine::with_config(config);
        assert_eq!(engine.clock.time_scale(), 0.5);
        assert_eq!(engine.config().time_scale, 0.5);
    }
}
