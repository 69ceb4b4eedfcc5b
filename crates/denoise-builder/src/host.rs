//! Host-facing seams: render settings, the source provider, and the graph handle.
//!
//! `Scene` is an in-memory host used by the demos and tests. A real host implements the
//! three traits over its own state.

use std::collections::BTreeSet;

use denoise_core::passes::{DENOISING_ALBEDO, DENOISING_NORMAL, NOISY_IMAGE};
use denoise_core::{EngineError, PassKey, PASS_TABLE};
use denoise_graph::Graph;

/// Every toggle the builder may flip before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderSetting {
    /// Node-based compositing on the scene.
    UseNodes,
    /// Keep the denoising auxiliary passes (noisy image, normal, albedo) on the view layer.
    StoreDenoisingPasses,
    /// Run the compositor when rendering.
    UseCompositing,
    /// Output one per-pass contribution on the view layer.
    Pass(PassKey),
}

/// Typed settings update.
pub trait RenderSettings {
    fn enable(&mut self, setting: RenderSetting) -> Result<(), EngineError>;
}

/// The primary source node's outputs, as the host currently exposes them.
pub trait SourceProvider {
    fn source_outputs(&self) -> Vec<&'static str>;
}

/// Mutable handle on the compositing graph.
pub trait Compositor {
    fn graph(&self) -> &Graph;
    fn graph_mut(&mut self) -> &mut Graph;
}

#[derive(Debug, Clone, Default)]
pub struct ViewLayer {
    pub store_denoising_passes: bool,
    pub passes: BTreeSet<PassKey>,
}

/// In-memory host. Source outputs follow the enabled settings, minus anything the engine
/// was told it cannot provide.
#[derive(Debug, Clone)]
pub struct Scene {
    graph: Graph,
    use_nodes: bool,
    use_compositing: bool,
    view_layer: Option<ViewLayer>,
    unavailable: BTreeSet<&'static str>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            use_nodes: false,
            use_compositing: false,
            view_layer: Some(ViewLayer::default()),
            unavailable: BTreeSet::new(),
        }
    }

    /// A scene with no active view layer.
    pub fn without_view_layer(mut self) -> Self {
        self.view_layer = None;
        self
    }

    /// Pretend the render engine never produces these source sockets.
    pub fn without_outputs(mut self, names: &[&'static str]) -> Self {
        self.unavailable.extend(names.iter().copied());
        self
    }

    pub fn is_enabled(&self, setting: RenderSetting) -> bool {
        match setting {
            RenderSetting::UseNodes => self.use_nodes,
            RenderSetting::UseCompositing => self.use_compositing,
            RenderSetting::StoreDenoisingPasses => self
                .view_layer
                .as_ref()
                .is_some_and(|v| v.store_denoising_passes),
            RenderSetting::Pass(key) => self
                .view_layer
                .as_ref()
                .is_some_and(|v| v.passes.contains(&key)),
        }
    }

    fn view_layer_mut(&mut self) -> Result<&mut ViewLayer, EngineError> {
        self.view_layer
            .as_mut()
            .ok_or_else(|| EngineError::UnsupportedHostState("no active view layer".to_string()))
    }
}

impl RenderSettings for Scene {
    fn enable(&mut self, setting: RenderSetting) -> Result<(), EngineError> {
        match setting {
            RenderSetting::UseNodes => self.use_nodes = true,
            RenderSetting::UseCompositing => self.use_compositing = true,
            RenderSetting::StoreDenoisingPasses => {
                self.view_layer_mut()?.store_denoising_passes = true
            }
            RenderSetting::Pass(key) => {
                self.view_layer_mut()?.passes.insert(key);
            }
        }
        Ok(())
    }
}

impl SourceProvider for Scene {
    fn source_outputs(&self) -> Vec<&'static str> {
        let mut out = vec!["Image", "Alpha"];
        if let Some(layer) = &self.view_layer {
            if layer.store_denoising_passes {
                out.extend([NOISY_IMAGE, DENOISING_NORMAL, DENOISING_ALBEDO]);
            }
            out.extend(
                PASS_TABLE
                    .iter()
                    .filter(|(key, _)| layer.passes.contains(key))
                    .map(|(_, name)| *name),
            );
        }
        out.retain(|name| !self.unavailable.contains(name));
        out
    }
}

impl Compositor for Scene {
    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denoise_core::{LightType, PassType};

    #[test]
    fn outputs_follow_settings() {
        let mut scene = Scene::new();
        assert_eq!(scene.source_outputs(), vec!["Image", "Alpha"]);

        scene.enable(RenderSetting::StoreDenoisingPasses).unwrap();
        let key = PassKey::new(PassType::Glossy, LightType::Indirect);
        scene.enable(RenderSetting::Pass(key)).unwrap();
        assert_eq!(
            scene.source_outputs(),
            vec!["Image", "Alpha", NOISY_IMAGE, DENOISING_NORMAL, DENOISING_ALBEDO, "GlossInd"]
        );
    }

    #[test]
    fn unavailable_outputs_are_hidden() {
        let mut scene = Scene::new().without_outputs(&["DenoisingAlbedo"]);
        scene.enable(RenderSetting::StoreDenoisingPasses).unwrap();
        assert!(!scene.source_outputs().contains(&"DenoisingAlbedo"));
        assert!(scene.source_outputs().contains(&"DenoisingNormal"));
    }

    #[test]
    fn view_layer_toggles_need_a_view_layer() {
        let mut scene = Scene::new().without_view_layer();
        scene.enable(RenderSetting::UseNodes).expect("scene-level toggle");
        let err = scene
            .enable(RenderSetting::StoreDenoisingPasses)
            .expect_err("no view layer");
        assert!(matches!(err, EngineError::UnsupportedHostState(_)));
        assert!(scene.is_enabled(RenderSetting::UseNodes));
        assert!(!scene.is_enabled(RenderSetting::StoreDenoisingPasses));
    }
}
