//! Folding denoised contributions back into one image.
//!
//! Per pass: `multiply(add(Direct, Indirect), Color)`. Light adds up, the color pass
//! modulates it. Across passes the three results are summed.

use denoise_core::{EngineError, LightType, PassKey, PassType};
use denoise_graph::{NodeId, NodeKind};
use log::debug;

use crate::builder::GraphBuilder;

/// 2-input blend applied by a combiner node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixerOp {
    /// Additive blend.
    Add,
    /// Multiplicative blend.
    Multiply,
}

impl MixerOp {
    pub fn node_kind(self) -> NodeKind {
        match self {
            MixerOp::Add => NodeKind::Add,
            MixerOp::Multiply => NodeKind::Multiply,
        }
    }
}

/// Maps a graph `NodeKind` back to its blend, if it is a combiner.
pub fn mixer_op_for(kind: NodeKind) -> Option<MixerOp> {
    match kind {
        NodeKind::Add => Some(MixerOp::Add),
        NodeKind::Multiply => Some(MixerOp::Multiply),
        _ => None,
    }
}

impl GraphBuilder<'_> {
    /// Create a combiner over `a` and `b`: output[0] of `a` feeds input A, `b` feeds B.
    pub fn mix(&mut self, op: MixerOp, a: NodeId, b: NodeId) -> Result<NodeId, EngineError> {
        let at = self.place_after(&[a, b], self.layout.combine_step)?;
        let a_out = self.graph.output(a, 0)?;
        let b_out = self.graph.output(b, 0)?;

        let node = self.graph.add_node(op.node_kind());
        self.graph.set_location(node, at)?;
        let a_in = self.graph.input(node, 0)?;
        let b_in = self.graph.input(node, 1)?;
        self.graph.connect(a_out, a_in)?;
        self.graph.connect(b_out, b_in)?;

        debug!("{op:?} node {} <- ({}, {})", node.0, a.0, b.0);
        Ok(node)
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, EngineError> {
        self.mix(MixerOp::Add, a, b)
    }

    pub fn multiply(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, EngineError> {
        self.mix(MixerOp::Multiply, a, b)
    }

    /// Denoise the three light components of `pass` and recombine them.
    pub fn combine_pass_type(&mut self, pass: PassType) -> Result<NodeId, EngineError> {
        let [direct, indirect, color] =
            LightType::ALL.map(|light| PassKey::new(pass, light));
        let direct = self.denoise_pass(direct)?;
        let indirect = self.denoise_pass(indirect)?;
        let color = self.denoise_pass(color)?;

        let light = self.add(direct, indirect)?;
        self.multiply(light, color)
    }

    /// Combine every pass type: `(Diffuse + Glossy) + Transmission`.
    pub fn combine_all(&mut self) -> Result<NodeId, EngineError> {
        let diffuse = self.combine_pass_type(PassType::Diffuse)?;
        let glossy = self.combine_pass_type(PassType::Glossy)?;
        let transmission = self.combine_pass_type(PassType::Transmission)?;

        let diffuse_glossy = self.add(diffuse, glossy)?;
        self.add(diffuse_glossy, transmission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denoise_core::passes::{DENOISING_ALBEDO, DENOISING_NORMAL, NOISY_IMAGE};
    use denoise_core::{LayoutConfig, PASS_TABLE};
    use denoise_graph::{Graph, Location};

    fn full_outputs() -> Vec<&'static str> {
        let mut out = vec![NOISY_IMAGE, DENOISING_NORMAL, DENOISING_ALBEDO];
        out.extend(PASS_TABLE.iter().map(|(_, name)| *name));
        out
    }

    #[test]
    fn mix_places_right_of_inputs_and_wires_in_order() {
        let layout = LayoutConfig::default();
        let mut g = Graph::new();
        let outputs = full_outputs();
        let mut b = GraphBuilder::start(&mut g, &outputs, &layout).unwrap();
        let x = b.denoise_pass(PassKey::new(PassType::Diffuse, LightType::Direct)).unwrap();
        let y = b.denoise_pass(PassKey::new(PassType::Diffuse, LightType::Indirect)).unwrap();
        let sum = b.add(x, y).unwrap();

        let node = g.node(sum).unwrap();
        assert_eq!(node.kind, NodeKind::Add);
        assert_eq!(node.location, Location::new(600.0, -25.0));
        assert_eq!(g.input_sources(sum), vec![Some(x), Some(y)]);
    }

    #[test]
    fn pass_type_is_multiply_of_add() {
        let layout = LayoutConfig::default();
        let mut g = Graph::new();
        let outputs = full_outputs();
        let mut b = GraphBuilder::start(&mut g, &outputs, &layout).unwrap();
        let result = b.combine_pass_type(PassType::Transmission).unwrap();

        let node = g.node(result).unwrap();
        assert_eq!(mixer_op_for(node.kind), Some(MixerOp::Multiply));
        let inputs = g.input_sources(result);
        let light = inputs[0].unwrap();
        let color = inputs[1].unwrap();
        assert_eq!(g.node(light).unwrap().kind, NodeKind::Add);
        assert_eq!(g.node(color).unwrap().kind, NodeKind::Denoise);
        // Color denoise sits in the Transmission/Color row.
        assert_eq!(g.node(color).unwrap().location.y, -700.0);
    }

    #[test]
    fn mixer_ops_round_trip_through_kinds() {
        for op in [MixerOp::Add, MixerOp::Multiply] {
            assert_eq!(mixer_op_for(op.node_kind()), Some(op));
        }
        assert_eq!(mixer_op_for(NodeKind::Denoise), None);
    }
}
