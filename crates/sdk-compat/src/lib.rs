//! Compile-only compatibility crate.
//!
//! This crate exists to ensure the public SDK surface remains usable by third-party
//! hosts. It is not shipped or run; it must only build.

use denoise_builder::{
    run_advanced_denoise, run_basic_denoise, Compositor, DenoiseConfig, EngineError,
    RenderSetting, RenderSettings, SourceProvider,
};
use denoise_core::{PassKey, PASS_TABLE};
use denoise_graph::{Graph, NodeKind};

/// A host defined outside the SDK must be able to implement every seam.
#[derive(Debug, Default)]
struct ForeignHost {
    graph: Graph,
    enabled: Vec<RenderSetting>,
}

impl RenderSettings for ForeignHost {
    fn enable(&mut self, setting: RenderSetting) -> Result<(), EngineError> {
        self.enabled.push(setting);
        Ok(())
    }
}

impl SourceProvider for ForeignHost {
    fn source_outputs(&self) -> Vec<&'static str> {
        PASS_TABLE.iter().map(|(_, name)| *name).collect()
    }
}

impl Compositor for ForeignHost {
    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}

#[allow(dead_code)]
pub fn _compile_witness() {
    // Graph builds and compiles using only public APIs.
    let mut g = Graph::new();
    let src = g.add_source_node(&["NoisyImage"]);
    let out = g.add_node(NodeKind::Composite);
    let _ = g.connect_named(src, "NoisyImage", out, "Image");
    let _ = g.compile();

    // Entry points stay generic over foreign hosts.
    let mut host = ForeignHost::default();
    let cfg = DenoiseConfig::default();
    let _ = run_basic_denoise(&mut host, &cfg);
    let _ = run_advanced_denoise(&mut host, &cfg);

    let _keys: Vec<PassKey> = PassKey::all().collect();
}
