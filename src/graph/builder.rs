use crate::{
    foundation::core::NodeId,
    foundation::error::PortaResult,
    graph::Graph,
    ops::{AUX_SLOT, INPUT_SLOT},
};

/// Chained bindings for one consumer node, returned by [`Graph::node`].
///
/// ```
/// use porta::{Graph, ops::source::ColorSource, ops::composer::PorterDuffOp};
///
/// let mut graph = Graph::new();
/// let bg = graph.add(ColorSource::new([1.0, 0.0, 0.0, 1.0])?);
/// let fg = graph.add(ColorSource::new([0.0, 0.0, 1.0, 0.5])?);
/// let over = graph.add(PorterDuffOp::over());
/// graph.node(over).input(bg)?.aux(fg)?.name("out")?;
/// assert_eq!(graph.find("out"), Some(over));
/// # Ok::<(), porta::PortaError>(())
/// ```
#[derive(Debug)]
pub struct NodeBuilder<'g> {
    graph: &'g mut Graph,
    id: NodeId,
}

impl<'g> NodeBuilder<'g> {
    pub(crate) fn new(graph: &'g mut Graph, id: NodeId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn input(self, producer: NodeId) -> PortaResult<Self> {
        self.slot(INPUT_SLOT, producer)
    }

    pub fn aux(self, producer: NodeId) -> PortaResult<Self> {
        self.slot(AUX_SLOT, producer)
    }

    pub fn slot(self, slot: &str, producer: NodeId) -> PortaResult<Self> {
        self.graph.connect_named(self.id, slot, producer)?;
        Ok(self)
    }

    pub fn name(self, name: impl Into<String>) -> PortaResult<Self> {
        self.graph.set_name(self.id, name)?;
        Ok(self)
    }
}
