use denoise_core::{EngineError, LayoutConfig};
use denoise_graph::{Graph, Location, NodeId, NodeKind};
use log::debug;

use crate::layout;

/// Carries the graph under construction and the two fixed endpoints (source and sink),
/// so the factory and combiner steps take no hidden context.
#[derive(Debug)]
pub struct GraphBuilder<'g> {
    pub(crate) graph: &'g mut Graph,
    pub(crate) layout: &'g LayoutConfig,
    source: NodeId,
    sink: NodeId,
}

impl<'g> GraphBuilder<'g> {
    /// Add the primary source (exposing `source_outputs`) and the sink to `graph`.
    pub fn start(
        graph: &'g mut Graph,
        source_outputs: &[&'static str],
        layout: &'g LayoutConfig,
    ) -> Result<Self, EngineError> {
        let source = graph.add_source_node(source_outputs);
        graph.set_location(source, layout.source.into())?;
        let sink = graph.add_node(NodeKind::Composite);
        graph.set_location(sink, layout.basic_sink.into())?;
        debug!(
            "source node {} with {} outputs, sink node {}",
            source.0,
            source_outputs.len(),
            sink.0
        );
        Ok(Self {
            graph,
            layout,
            source,
            sink,
        })
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub(crate) fn location(&self, node: NodeId) -> Result<Location, EngineError> {
        self.graph
            .node(node)
            .map(|n| n.location)
            .ok_or_else(|| EngineError::graph(format!("node {} not found", node.0)))
    }

    /// Location right of the mean of `inputs`, stepped by `step`.
    pub(crate) fn place_after(
        &self,
        inputs: &[NodeId],
        step: (f32, f32),
    ) -> Result<Location, EngineError> {
        let points = inputs
            .iter()
            .map(|id| self.location(*id))
            .collect::<Result<Vec<_>, _>>()?;
        layout::place_after(&points, step)
            .ok_or_else(|| EngineError::graph("layout: no reference nodes"))
    }

    /// Move the sink one combiner step right of `result`.
    pub fn place_sink_after(&mut self, result: NodeId) -> Result<(), EngineError> {
        let at = self.place_after(&[result], self.layout.combine_step)?;
        self.graph.set_location(self.sink, at)
    }

    /// Wire `result` into the sink.
    pub fn finish(&mut self, result: NodeId) -> Result<(), EngineError> {
        crate::sink::connect_sink(self.graph, self.sink, result)
    }
}
