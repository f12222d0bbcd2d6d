//! Node storage and the edges between them.
//!
//! A [`Graph`] owns its nodes in a generational slot table, so a [`NodeId`] of a removed node
//! never aliases a node added later. Edges live on the consumer side: each node records which
//! producer feeds each of its slots. Cycles are allowed to be built and are rejected by
//! [`Graph::validate`] and at render time.

use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::core::{Extent, NodeId, Rect},
    foundation::error::{PortaError, PortaResult},
    ops::{INPUT_SLOT, Operation, registry::OperationRegistry},
};

pub mod builder;
pub mod node;

pub use builder::NodeBuilder;
pub use node::Node;

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    revision: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented by every structural change. Compiled render plans remember it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn add<O: Operation + 'static>(&mut self, op: O) -> NodeId {
        self.add_shared(Arc::new(op))
    }

    pub fn add_shared(&mut self, op: Arc<dyn Operation>) -> NodeId {
        let node = Node::new(op);
        self.len += 1;
        self.revision += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Instantiate `op` from `registry` with JSON `params` and add it.
    pub fn create(
        &mut self,
        registry: &OperationRegistry,
        op: &str,
        params: &serde_json::Value,
    ) -> PortaResult<NodeId> {
        let op = registry.create(op, params)?;
        Ok(self.add_shared(op))
    }

    /// Remove `id`. Edges other nodes still hold towards it fail the next render with
    /// `UnknownNode`.
    pub fn remove_node(&mut self, id: NodeId) -> PortaResult<Node> {
        self.get(id)?;
        let slot = &mut self.slots[id.index as usize];
        let node = slot.node.take().ok_or(PortaError::UnknownNode(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        self.revision += 1;
        Ok(node)
    }

    /// Rebuild the operation of `id` from `params` through `registry`, keeping the node's id,
    /// name and edges. Plans compiled before the change become stale.
    pub fn set_params(
        &mut self,
        registry: &OperationRegistry,
        id: NodeId,
        params: &serde_json::Value,
    ) -> PortaResult<()> {
        let name = self.get(id)?.op().name().to_string();
        let op = registry.create(&name, params)?;
        self.replace_op(id, op)?;
        Ok(())
    }

    /// Swap the operation of `id`. Bindings on slots the new operation does not declare are
    /// dropped. Returns the previous operation.
    pub fn replace_op(
        &mut self,
        id: NodeId,
        op: Arc<dyn Operation>,
    ) -> PortaResult<Arc<dyn Operation>> {
        let old = self.get_mut(id)?.replace_op(op);
        self.revision += 1;
        tracing::trace!(node = %id, from = old.name(), "operation replaced");
        Ok(old)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: NodeId) -> PortaResult<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
            .ok_or(PortaError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> PortaResult<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
            .ok_or(PortaError::UnknownNode(id))
    }

    /// Live nodes in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.node.as_ref().map(|n| {
                (
                    NodeId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    n,
                )
            })
        })
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(|(id, _)| id)
    }

    /// Give `id` a human-readable name. Names are unique within a graph.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> PortaResult<()> {
        let name = name.into();
        if let Some(other) = self.find(&name)
            && other != id
        {
            return Err(PortaError::validation(format!(
                "node name `{name}` is already used by {other}"
            )));
        }
        self.get_mut(id)?.set_name(Some(name));
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, n)| n.name() == Some(name))
            .map(|(id, _)| id)
    }

    /// Bind `producer` to the default `input` slot of `consumer`.
    pub fn connect_default(&mut self, consumer: NodeId, producer: NodeId) -> PortaResult<()> {
        self.connect_named(consumer, INPUT_SLOT, producer)
    }

    /// Bind `producer` to `slot` of `consumer`, replacing any earlier binding.
    pub fn connect_named(
        &mut self,
        consumer: NodeId,
        slot: &str,
        producer: NodeId,
    ) -> PortaResult<()> {
        self.get(producer)?;
        let slot = self.declared_slot(consumer, slot)?;
        let replaced = self.get_mut(consumer)?.bind(slot, producer);
        self.revision += 1;
        tracing::trace!(%consumer, slot, %producer, ?replaced, "connected");
        Ok(())
    }

    /// Clear `slot` of `consumer`. Returns the producer that was bound there.
    pub fn disconnect(&mut self, consumer: NodeId, slot: &str) -> PortaResult<Option<NodeId>> {
        let slot = self.declared_slot(consumer, slot)?;
        let old = self.get_mut(consumer)?.unbind(slot);
        if old.is_some() {
            self.revision += 1;
        }
        Ok(old)
    }

    pub fn producer(&self, consumer: NodeId, slot: &str) -> PortaResult<Option<NodeId>> {
        let slot = self.declared_slot(consumer, slot)?;
        Ok(self.get(consumer)?.producer(slot))
    }

    /// Every `(consumer, slot)` fed by `producer`.
    pub fn consumers(&self, producer: NodeId) -> Vec<(NodeId, &'static str)> {
        self.nodes()
            .flat_map(|(id, n)| {
                n.inputs()
                    .filter(move |(_, p)| *p == producer)
                    .map(move |(slot, _)| (id, slot))
            })
            .collect()
    }

    /// Chain default connections: `chain[i]` feeds `chain[i + 1]`.
    pub fn link_many(&mut self, chain: &[NodeId]) -> PortaResult<()> {
        for pair in chain.windows(2) {
            self.connect_default(pair[1], pair[0])?;
        }
        Ok(())
    }

    /// Fluent binding helper for `id`.
    pub fn node(&mut self, id: NodeId) -> NodeBuilder<'_> {
        NodeBuilder::new(self, id)
    }

    fn declared_slot(&self, consumer: NodeId, slot: &str) -> PortaResult<&'static str> {
        let node = self.get(consumer)?;
        node.declared_slot(slot)
            .ok_or_else(|| PortaError::UnknownSlot {
                node: consumer,
                op: node.op().name().to_string(),
                slot: slot.to_string(),
            })
    }

    /// Reject edges to removed nodes (`UnknownNode`) and cycles (`CyclicGraph`).
    pub fn validate(&self) -> PortaResult<()> {
        for (_, node) in self.nodes() {
            for (_, producer) in node.inputs() {
                self.get(producer)?;
            }
        }

        // 0 = unvisited, 1 = on the stack, 2 = done
        let mut state = vec![0u8; self.slots.len()];
        for id in self.node_ids() {
            if state[id.index as usize] == 0 {
                self.visit(id, &mut state)?;
            }
        }
        Ok(())
    }

    fn visit(&self, id: NodeId, state: &mut [u8]) -> PortaResult<()> {
        state[id.index as usize] = 1;
        for (slot, producer) in self.get(id)?.inputs() {
            match state[producer.index as usize] {
                0 => self.visit(producer, state)?,
                1 => {
                    return Err(PortaError::CyclicGraph {
                        consumer: id,
                        slot,
                        producer,
                    });
                }
                _ => {}
            }
        }
        state[id.index as usize] = 2;
        Ok(())
    }

    /// Region of meaningful output of `id` at scale 1, derived through its inputs.
    pub fn defined_region(&self, id: NodeId) -> PortaResult<Extent> {
        let mut path = Vec::new();
        let mut done = HashMap::new();
        self.region_of(id, &mut path, &mut done)
    }

    /// [`Self::defined_region`] as a rect; `None` when the node is unbounded.
    pub fn bounding_box(&self, id: NodeId) -> PortaResult<Option<Rect>> {
        Ok(self.defined_region(id)?.rect())
    }

    fn region_of(
        &self,
        id: NodeId,
        path: &mut Vec<NodeId>,
        done: &mut HashMap<NodeId, Extent>,
    ) -> PortaResult<Extent> {
        if let Some(extent) = done.get(&id) {
            return Ok(*extent);
        }
        let node = self.get(id)?;
        path.push(id);
        let mut input = None;
        let mut aux: Option<Extent> = None;
        for (slot, producer) in node.inputs() {
            if path.contains(&producer) {
                return Err(PortaError::CyclicGraph {
                    consumer: id,
                    slot,
                    producer,
                });
            }
            let extent = self.region_of(producer, path, done)?;
            if slot == INPUT_SLOT {
                input = Some(extent);
            } else {
                aux = Some(aux.map_or(extent, |a| a.union(extent)));
            }
        }
        path.pop();
        let extent = node.op().defined_region(input, aux);
        done.insert(id, extent);
        Ok(extent)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/graph.rs"]
mod tests;
