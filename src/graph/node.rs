use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    foundation::core::NodeId,
    ops::{INPUT_SLOT, Operation},
};

/// One processing unit of a [`Graph`](crate::Graph): an operation plus its input bindings.
#[derive(Clone, Debug)]
pub struct Node {
    op: Arc<dyn Operation>,
    name: Option<String>,
    inputs: SmallVec<[(&'static str, NodeId); 2]>,
}

impl Node {
    pub(crate) fn new(op: Arc<dyn Operation>) -> Self {
        Self {
            op,
            name: None,
            inputs: SmallVec::new(),
        }
    }

    pub fn op(&self) -> &Arc<dyn Operation> {
        &self.op
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Declared slots: `input` unless the operation is a source, then its aux slots.
    pub fn slots(&self) -> impl Iterator<Item = &'static str> + '_ {
        let input = self.op.kind().has_input().then_some(INPUT_SLOT);
        input.into_iter().chain(self.op.aux_slots().iter().copied())
    }

    /// The declared spelling of `slot`, if the operation has it.
    pub fn declared_slot(&self, slot: &str) -> Option<&'static str> {
        self.slots().find(|s| *s == slot)
    }

    /// Bound slots and their producers.
    pub fn inputs(&self) -> impl Iterator<Item = (&'static str, NodeId)> + '_ {
        self.inputs.iter().copied()
    }

    pub fn producer(&self, slot: &str) -> Option<NodeId> {
        self.inputs
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, id)| *id)
    }

    /// Returns the producer previously bound to `slot`.
    pub(crate) fn bind(&mut self, slot: &'static str, producer: NodeId) -> Option<NodeId> {
        if let Some(entry) = self.inputs.iter_mut().find(|(s, _)| *s == slot) {
            return Some(std::mem::replace(&mut entry.1, producer));
        }
        self.inputs.push((slot, producer));
        None
    }

    /// Swap the operation, keeping only the bindings whose slot the new operation declares.
    pub(crate) fn replace_op(&mut self, op: Arc<dyn Operation>) -> Arc<dyn Operation> {
        let old = std::mem::replace(&mut self.op, op);
        let inputs = std::mem::take(&mut self.inputs);
        for (slot, producer) in inputs {
            if let Some(slot) = self.declared_slot(slot) {
                self.inputs.push((slot, producer));
            }
        }
        old
    }

    pub(crate) fn unbind(&mut self, slot: &str) -> Option<NodeId> {
        let at = self.inputs.iter().position(|(s, _)| *s == slot)?;
        Some(self.inputs.remove(at).1)
    }
}
