use denoise_core::EngineError;
use denoise_graph::{Graph, NodeId};
use log::debug;

/// Wire `result`'s primary output into the sink's `Image` input.
///
/// Calling this again rebinds the same input; the previous link is replaced.
pub fn connect_sink(graph: &mut Graph, sink: NodeId, result: NodeId) -> Result<(), EngineError> {
    let from = graph.output(result, 0)?;
    let to = graph.input_named(sink, "Image")?;
    graph.connect(from, to)?;
    debug!("sink {} <- node {}", sink.0, result.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use denoise_graph::NodeKind;

    #[test]
    fn reconnecting_rebinds() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Blur);
        let b = g.add_node(NodeKind::Blur);
        let sink = g.add_node(NodeKind::Composite);

        connect_sink(&mut g, sink, a).unwrap();
        connect_sink(&mut g, sink, a).unwrap();
        assert_eq!(g.edges().len(), 1);

        connect_sink(&mut g, sink, b).unwrap();
        assert_eq!(g.edges().len(), 1);
        assert_eq!(g.input_sources(sink), vec![Some(b)]);
    }

    #[test]
    fn sink_without_image_input_is_missing_socket() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Blur);
        let not_a_sink = g.add_source_node(&["Image"]);
        let err = connect_sink(&mut g, not_a_sink, a).unwrap_err();
        assert!(err.is_missing_socket());
    }
}
