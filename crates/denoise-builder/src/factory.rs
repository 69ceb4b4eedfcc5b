use denoise_core::passes::{DENOISING_ALBEDO, DENOISING_NORMAL};
use denoise_core::{EngineError, PassKey};
use denoise_graph::{NodeId, NodeKind};
use log::debug;

use crate::builder::GraphBuilder;
use crate::layout;

impl GraphBuilder<'_> {
    /// Create a collapsed denoise node fed by three named source sockets, placed at
    /// `offset` from the source.
    ///
    /// All three sockets are resolved before anything is added, so a `MissingSocket`
    /// failure leaves no orphan node behind.
    pub fn denoise(
        &mut self,
        image: &str,
        normal: &str,
        albedo: &str,
        offset: (f32, f32),
    ) -> Result<NodeId, EngineError> {
        let source = self.source();
        let image_out = self.graph.output_named(source, image)?;
        let normal_out = self.graph.output_named(source, normal)?;
        let albedo_out = self.graph.output_named(source, albedo)?;

        let at = self.place_after(&[source], offset)?;
        let node = self.graph.add_node(NodeKind::Denoise);
        self.graph.set_location(node, at)?;
        self.graph.set_hidden(node, true)?;

        let wiring = [
            (image_out, "Image"),
            (normal_out, "Normal"),
            (albedo_out, "Albedo"),
        ];
        for (from, input) in wiring {
            let to = self.graph.input_named(node, input)?;
            self.graph.connect(from, to)?;
        }

        debug!("denoise node {} <- {image} at ({}, {})", node.0, at.x, at.y);
        Ok(node)
    }

    /// Denoise one (pass, light) contribution in its own layout row.
    pub fn denoise_pass(&mut self, key: PassKey) -> Result<NodeId, EngineError> {
        let offset = layout::denoise_offset(self.layout, key);
        self.denoise(key.socket_name(), DENOISING_NORMAL, DENOISING_ALBEDO, offset)
    }
}
