#![forbid(unsafe_code)]

//! Procedural construction of the denoise compositing graph.
//!
//! Two entry points rebuild the host's graph from scratch:
//! - [`run_basic_denoise`]: one denoise node between source and sink.
//! - [`run_advanced_denoise`]: nine per-pass denoise nodes folded back together with
//!   add/multiply combiners.
//!
//! A rebuild either completes or leaves the previous graph exactly as it was.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod builder;
pub mod combiner;
pub mod factory;
pub mod host;
pub mod layout;
pub mod sink;

use denoise_core::passes::{DENOISING_ALBEDO, DENOISING_NORMAL, NOISY_IMAGE};
use denoise_core::{LayoutConfig, LightType, PassKey, PassType};
use log::{info, warn};

pub use builder::GraphBuilder;
pub use combiner::{mixer_op_for, MixerOp};
pub use denoise_core::{DenoiseConfig, EngineError};
pub use host::{Compositor, RenderSetting, RenderSettings, Scene, SourceProvider};

/// Which graph to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenoiseMode {
    Basic,
    Advanced,
}

impl DenoiseMode {
    /// Settings the host must have enabled before this mode can build.
    pub fn settings(self) -> &'static [RenderSetting] {
        match self {
            DenoiseMode::Basic => &BASIC_SETTINGS,
            DenoiseMode::Advanced => &ADVANCED_SETTINGS,
        }
    }
}

pub const BASIC_SETTINGS: [RenderSetting; 3] = [
    RenderSetting::UseNodes,
    RenderSetting::StoreDenoisingPasses,
    RenderSetting::UseCompositing,
];

const fn pass(p: PassType, light: LightType) -> RenderSetting {
    RenderSetting::Pass(PassKey::new(p, light))
}

pub const ADVANCED_SETTINGS: [RenderSetting; 12] = [
    RenderSetting::UseNodes,
    RenderSetting::StoreDenoisingPasses,
    RenderSetting::UseCompositing,
    pass(PassType::Diffuse, LightType::Direct),
    pass(PassType::Diffuse, LightType::Indirect),
    pass(PassType::Diffuse, LightType::Color),
    pass(PassType::Glossy, LightType::Direct),
    pass(PassType::Glossy, LightType::Indirect),
    pass(PassType::Glossy, LightType::Color),
    pass(PassType::Transmission, LightType::Direct),
    pass(PassType::Transmission, LightType::Indirect),
    pass(PassType::Transmission, LightType::Color),
];

/// Source → Denoise → Sink.
pub fn run_basic_denoise<H>(host: &mut H, config: &DenoiseConfig) -> Result<(), EngineError>
where
    H: RenderSettings + SourceProvider + Compositor,
{
    run_denoise(host, DenoiseMode::Basic, config)
}

/// Nine denoise chains recombined per pass, then summed across passes.
pub fn run_advanced_denoise<H>(host: &mut H, config: &DenoiseConfig) -> Result<(), EngineError>
where
    H: RenderSettings + SourceProvider + Compositor,
{
    run_denoise(host, DenoiseMode::Advanced, config)
}

/// Rebuild the host's graph for `mode`. On error the previous graph is restored.
pub fn run_denoise<H>(
    host: &mut H,
    mode: DenoiseMode,
    config: &DenoiseConfig,
) -> Result<(), EngineError>
where
    H: RenderSettings + SourceProvider + Compositor,
{
    config.validate()?;
    for setting in mode.settings() {
        host.enable(*setting)?;
    }

    let outputs = host.source_outputs();
    let graph = host.graph_mut();
    let snapshot = graph.clone();
    graph.reset();

    let built = GraphBuilder::start(graph, &outputs, &config.layout).and_then(|mut b| {
        match mode {
            DenoiseMode::Basic => build_basic(&mut b, &config.layout),
            DenoiseMode::Advanced => build_advanced(&mut b),
        }
    });

    match built.and_then(|()| graph.compile()) {
        Ok(plan) => {
            info!(
                "{mode:?} denoise graph rebuilt: {} nodes, {} links",
                plan.nodes.len(),
                plan.edges.len()
            );
            Ok(())
        }
        Err(e) => {
            warn!("{mode:?} denoise rebuild failed, previous graph restored: {e}");
            *graph = snapshot;
            Err(e)
        }
    }
}

fn build_basic(b: &mut GraphBuilder<'_>, layout: &LayoutConfig) -> Result<(), EngineError> {
    let offset = (
        layout.basic_denoise.0 - layout.source.0,
        layout.basic_denoise.1 - layout.source.1,
    );
    let denoised = b.denoise(NOISY_IMAGE, DENOISING_NORMAL, DENOISING_ALBEDO, offset)?;
    b.finish(denoised)
}

fn build_advanced(b: &mut GraphBuilder<'_>) -> Result<(), EngineError> {
    let result = b.combine_all()?;
    b.place_sink_after(result)?;
    b.finish(result)
}
