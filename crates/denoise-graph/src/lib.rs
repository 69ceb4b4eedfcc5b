#![forbid(unsafe_code)]

//! Compositing graph vocabulary and patching model.
//!
//! This crate is **contract-only**: it holds nodes, sockets and links in memory and never
//! touches pixels. The mental model is Sources → Processors/Mixers → Outputs.
//!
//! `compile()` validates the patch and returns a lightweight `Plan` in dependency order,
//! leaving execution to whichever host consumes it.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

use denoise_core::EngineError;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDir {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub node: NodeId,
    pub port: PortId,
    pub dir: PortDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: Endpoint, // Out
    pub to: Endpoint,   // In
}

/// High-level class of a node in the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Source,
    Processor,
    Mixer,
    Output,
}

/// Data carried by a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    Color,
    Vector,
    Float,
}

impl SocketType {
    /// Type of a source output, derived from its conventional name.
    pub fn for_source_output(name: &str) -> Self {
        match name {
            "Alpha" => SocketType::Float,
            "DenoisingNormal" | "Normal" => SocketType::Vector,
            _ => SocketType::Color,
        }
    }
}

/// Node kinds the compositor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Sources
    /// Render-pass source. Its outputs depend on the host's enabled passes.
    RenderLayers,

    // Processors
    /// Black-box denoise filter: Image + Normal + Albedo → Image.
    Denoise,
    /// Generic filter; not produced by the builder, used for hand-patched graphs.
    Blur,

    // Mixers
    Add,
    Multiply,

    // Outputs
    /// The graph's final output terminal.
    Composite,
    /// Preview output; not produced by the builder, used for hand-patched graphs.
    Viewer,
}

impl NodeKind {
    pub fn class(&self) -> NodeClass {
        use NodeKind::*;
        match self {
            RenderLayers => NodeClass::Source,
            Denoise | Blur => NodeClass::Processor,
            Add | Multiply => NodeClass::Mixer,
            Composite | Viewer => NodeClass::Output,
        }
    }

    pub fn name(&self) -> &'static str {
        use NodeKind::*;
        match self {
            RenderLayers => "RenderLayers",
            Denoise => "Denoise",
            Blur => "Blur",
            Add => "Add",
            Multiply => "Multiply",
            Composite => "Composite",
            Viewer => "Viewer",
        }
    }
}

/// Node position in the editor plane. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl Location {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Location {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Port {
    pub id: PortId,
    pub name: &'static str,
    pub dir: PortDir,
    pub ty: SocketType,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub ports: Vec<Port>,
    pub location: Location,
    /// Collapsed in the editor.
    pub hidden: bool,
}

impl Node {
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.dir == PortDir::In)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.dir == PortDir::Out)
    }

    fn endpoint(&self, port: &Port) -> Endpoint {
        Endpoint {
            node: self.id,
            port: port.id,
            dir: port.dir,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Graph {
    next_node: u32,
    next_port: u32,
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Drop every node and link and restart id allocation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let ports = match kind {
            NodeKind::RenderLayers => vec![
                self.new_port("Image", PortDir::Out, SocketType::Color),
                self.new_port("Alpha", PortDir::Out, SocketType::Float),
            ],
            NodeKind::Denoise => vec![
                self.new_port("Image", PortDir::In, SocketType::Color),
                self.new_port("Normal", PortDir::In, SocketType::Vector),
                self.new_port("Albedo", PortDir::In, SocketType::Color),
                self.new_port("Image", PortDir::Out, SocketType::Color),
            ],
            _ => match kind.class() {
                NodeClass::Source => vec![self.new_port("Image", PortDir::Out, SocketType::Color)],
                NodeClass::Processor => vec![
                    self.new_port("Image", PortDir::In, SocketType::Color),
                    self.new_port("Image", PortDir::Out, SocketType::Color),
                ],
                NodeClass::Mixer => vec![
                    self.new_port("A", PortDir::In, SocketType::Color),
                    self.new_port("B", PortDir::In, SocketType::Color),
                    self.new_port("Image", PortDir::Out, SocketType::Color),
                ],
                NodeClass::Output => vec![self.new_port("Image", PortDir::In, SocketType::Color)],
            },
        };
        self.insert(kind, ports)
    }

    /// Add a render-pass source exposing exactly `outputs`, in the given order.
    pub fn add_source_node(&mut self, outputs: &[&'static str]) -> NodeId {
        let ports = outputs
            .iter()
            .map(|&name| self.new_port(name, PortDir::Out, SocketType::for_source_output(name)))
            .collect();
        self.insert(NodeKind::RenderLayers, ports)
    }

    fn insert(&mut self, kind: NodeKind, ports: Vec<Port>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let node = Node {
            id,
            kind,
            ports,
            location: Location::default(),
            hidden: false,
        };
        self.nodes.insert(id, node);
        id
    }

    fn new_port(&mut self, name: &'static str, dir: PortDir, ty: SocketType) -> Port {
        let id = PortId(self.next_port);
        self.next_port += 1;
        Port { id, name, dir, ty }
    }

    /// Remove a node together with every link touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.edges.retain(|e| e.from.node != id && e.to.node != id);
        Some(node)
    }

    pub fn set_location(&mut self, id: NodeId, location: Location) -> Result<(), EngineError> {
        self.node_mut(id)?.location = location;
        Ok(())
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<(), EngineError> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, EngineError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| EngineError::graph(format!("node {} not found", id.0)))
    }

    fn node_ref(&self, id: NodeId) -> Result<&Node, EngineError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| EngineError::graph(format!("node {} not found", id.0)))
    }

    /// Named output socket; `MissingSocket` if the node does not expose it.
    pub fn output_named(&self, node: NodeId, name: &str) -> Result<Endpoint, EngineError> {
        self.endpoint_named(node, name, PortDir::Out)
    }

    /// Named input socket; `MissingSocket` if the node does not expose it.
    pub fn input_named(&self, node: NodeId, name: &str) -> Result<Endpoint, EngineError> {
        self.endpoint_named(node, name, PortDir::In)
    }

    fn endpoint_named(&self, node: NodeId, name: &str, dir: PortDir) -> Result<Endpoint, EngineError> {
        let n = self.node_ref(node)?;
        n.ports
            .iter()
            .find(|p| p.dir == dir && p.name == name)
            .map(|p| n.endpoint(p))
            .ok_or_else(|| EngineError::missing_socket(n.kind.name(), name))
    }

    /// The `index`-th output socket of `node`.
    pub fn output(&self, node: NodeId, index: usize) -> Result<Endpoint, EngineError> {
        let n = self.node_ref(node)?;
        n.outputs()
            .nth(index)
            .map(|p| n.endpoint(p))
            .ok_or_else(|| EngineError::missing_socket(n.kind.name(), format!("output[{index}]")))
    }

    /// The `index`-th input socket of `node`.
    pub fn input(&self, node: NodeId, index: usize) -> Result<Endpoint, EngineError> {
        let n = self.node_ref(node)?;
        n.inputs()
            .nth(index)
            .map(|p| n.endpoint(p))
            .ok_or_else(|| EngineError::missing_socket(n.kind.name(), format!("input[{index}]")))
    }

    /// The link feeding `to`, if any.
    pub fn link_into(&self, to: Endpoint) -> Option<&Edge> {
        self.edges.iter().find(|e| e.to == to)
    }

    /// Upstream node of each input socket of `node`, in socket order.
    pub fn input_sources(&self, node: NodeId) -> Vec<Option<NodeId>> {
        let Some(n) = self.nodes.get(&node) else {
            return Vec::new();
        };
        n.inputs()
            .map(|p| self.link_into(n.endpoint(p)).map(|e| e.from.node))
            .collect()
    }

    /// Connect `from` (Out) → `to` (In).
    ///
    /// An input accepts a single link: connecting an already driven input replaces the old
    /// link. Links that would close a cycle are rejected.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<(), EngineError> {
        if from.dir != PortDir::Out {
            return Err(EngineError::graph("connect: from endpoint must be Out"));
        }
        if to.dir != PortDir::In {
            return Err(EngineError::graph("connect: to endpoint must be In"));
        }
        if !self.nodes.contains_key(&from.node) || !self.nodes.contains_key(&to.node) {
            return Err(EngineError::graph("connect: node not found"));
        }

        // Ports must belong to the specified nodes, match the declared direction and carry
        // the same data type.
        {
            let from_port = self
                .nodes
                .get(&from.node)
                .and_then(|n| n.ports.iter().find(|p| p.id == from.port && p.dir == from.dir))
                .ok_or_else(|| EngineError::graph("connect: from port not found on node"))?;
            let to_port = self
                .nodes
                .get(&to.node)
                .and_then(|n| n.ports.iter().find(|p| p.id == to.port && p.dir == to.dir))
                .ok_or_else(|| EngineError::graph("connect: to port not found on node"))?;
            if from_port.ty != to_port.ty {
                return Err(EngineError::graph(format!(
                    "connect: '{}' ({:?}) cannot feed '{}' ({:?})",
                    from_port.name, from_port.ty, to_port.name, to_port.ty
                )));
            }
        }

        if self.reaches(to.node, from.node) {
            return Err(EngineError::graph("connect: link would create a cycle"));
        }

        // Last write wins.
        self.edges.retain(|e| e.to != to);
        self.edges.push(Edge { from, to });
        Ok(())
    }

    /// Convenience: connect by socket names.
    pub fn connect_named(
        &mut self,
        from_node: NodeId,
        from_port: &str,
        to_node: NodeId,
        to_port: &str,
    ) -> Result<(), EngineError> {
        let from = self.output_named(from_node, from_port)?;
        let to = self.input_named(to_node, to_port)?;
        self.connect(from, to)
    }

    /// True if `target` is reachable from `start` following links downstream.
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen = HashSet::new();
        while let Some(n) = stack.pop() {
            if n == target {
                return true;
            }
            if !seen.insert(n) {
                continue;
            }
            stack.extend(self.edges.iter().filter(|e| e.from.node == n).map(|e| e.to.node));
        }
        false
    }

    /// Compile the graph into a plan: validation plus dependency ordering.
    pub fn compile(&self) -> Result<Plan, EngineError> {
        let sinks: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| n.kind == NodeKind::Composite)
            .collect();
        if sinks.len() != 1 {
            return Err(EngineError::graph(format!(
                "compile: expected exactly 1 Composite node, found {}",
                sinks.len()
            )));
        }

        // Every output node must be driven.
        for n in self.nodes.values() {
            if n.kind.class() == NodeClass::Output {
                for p in n.inputs() {
                    if self.link_into(n.endpoint(p)).is_none() {
                        return Err(EngineError::graph(format!(
                            "compile: {} input '{}' not connected",
                            n.kind.name(),
                            p.name
                        )));
                    }
                }
            }
        }

        // Kahn's algorithm; ties broken by NodeId so the order is stable.
        let mut indegree: BTreeMap<NodeId, usize> = self.nodes.keys().map(|id| (*id, 0)).collect();
        for e in &self.edges {
            *indegree.entry(e.to.node).or_insert(0) += 1;
        }
        let mut ready: BTreeSet<NodeId> = indegree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = ready.pop_first() {
            order.push(id);
            for e in self.edges.iter().filter(|e| e.from.node == id) {
                if let Some(d) = indegree.get_mut(&e.to.node) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(e.to.node);
                    }
                }
            }
        }
        if order.len() != self.nodes.len() {
            return Err(EngineError::graph("compile: graph contains a cycle"));
        }

        Ok(Plan {
            nodes: order,
            edges: self.edges.clone(),
            sink: sinks[0].id,
        })
    }
}

/// A minimal compiled representation of the graph.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Nodes in dependency order.
    pub nodes: Vec<NodeId>,
    pub edges: Vec<Edge>,
    pub sink: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Graph, NodeId, NodeId, NodeId) {
        let mut g = Graph::new();
        let src = g.add_node(NodeKind::RenderLayers);
        let blur = g.add_node(NodeKind::Blur);
        let out = g.add_node(NodeKind::Composite);
        g.connect_named(src, "Image", blur, "Image").unwrap();
        g.connect_named(blur, "Image", out, "Image").unwrap();
        (g, src, blur, out)
    }

    #[test]
    fn build_simple_chain() {
        let (g, src, blur, out) = chain();
        let plan = g.compile().unwrap();
        assert_eq!(plan.nodes, vec![src, blur, out]);
        assert_eq!(plan.edges.len(), 2);
        assert_eq!(plan.sink, out);
    }

    #[test]
    fn rebinding_an_input_replaces_the_link() {
        let (mut g, src, blur, out) = chain();
        g.connect_named(src, "Image", out, "Image").unwrap();
        assert_eq!(g.edges().len(), 2);
        assert_eq!(g.input_sources(out), vec![Some(src)]);
        assert_eq!(g.input_sources(blur), vec![Some(src)]);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut g = Graph::new();
        let a = g.add_node(NodeKind::Blur);
        let b = g.add_node(NodeKind::Blur);
        g.connect_named(a, "Image", b, "Image").unwrap();
        let err = g.connect_named(b, "Image", a, "Image").unwrap_err();
        assert!(err.to_string().contains("cycle"), "got: {err}");

        let err = g.connect_named(a, "Image", a, "Image").unwrap_err();
        assert!(err.to_string().contains("cycle"), "got: {err}");
    }

    #[test]
    fn direction_is_checked() {
        let (mut g, src, blur, _) = chain();
        let from = g.input(blur, 0).unwrap();
        let to = g.output(src, 0).unwrap();
        assert!(g.connect(from, to).is_err());
    }

    #[test]
    fn missing_named_socket_is_reported() {
        let mut g = Graph::new();
        let src = g.add_source_node(&["NoisyImage"]);
        let err = g.output_named(src, "TransCol").unwrap_err();
        assert!(err.is_missing_socket());
        assert_eq!(g.node(src).unwrap().outputs().count(), 1);
    }

    #[test]
    fn remove_node_drops_its_links() {
        let (mut g, _, blur, out) = chain();
        assert!(g.remove_node(blur).is_some());
        assert!(g.edges().is_empty());
        assert!(g.remove_node(blur).is_none());
        let err = g.compile().unwrap_err();
        assert!(err.to_string().contains("not connected"), "got: {err}");
        assert!(g.node(out).is_some());
    }

    #[test]
    fn reset_empties_and_restarts_ids() {
        let (mut g, src, _, _) = chain();
        g.reset();
        assert_eq!(g.node_count(), 0);
        assert!(g.edges().is_empty());
        assert_eq!(g.add_node(NodeKind::Viewer), src);
    }

    #[test]
    fn compile_requires_single_composite() {
        let (mut g, src, _, _) = chain();
        let second = g.add_node(NodeKind::Composite);
        g.connect_named(src, "Image", second, "Image").unwrap();
        assert!(g.compile().is_err());
    }

    #[test]
    fn mismatched_socket_types_are_rejected() {
        let mut g = Graph::new();
        let src = g.add_source_node(&["NoisyImage", "DenoisingNormal"]);
        let d = g.add_node(NodeKind::Denoise);

        let err = g.connect_named(src, "DenoisingNormal", d, "Image").unwrap_err();
        assert!(err.to_string().contains("cannot feed"), "got: {err}");
        assert!(g.edges().is_empty());

        g.connect_named(src, "DenoisingNormal", d, "Normal").unwrap();
        g.connect_named(src, "NoisyImage", d, "Image").unwrap();
        assert_eq!(g.edges().len(), 2);
    }

    #[test]
    fn source_output_types_follow_names() {
        let mut g = Graph::new();
        let src = g.add_source_node(&["NoisyImage", "DenoisingNormal", "Alpha"]);
        let types: Vec<SocketType> = g.node(src).unwrap().outputs().map(|p| p.ty).collect();
        assert_eq!(
            types,
            vec![SocketType::Color, SocketType::Vector, SocketType::Float]
        );
    }
}
