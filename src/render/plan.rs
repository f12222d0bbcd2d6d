use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{
    foundation::core::{NodeId, Rect},
    foundation::error::{PortaError, PortaResult},
    graph::Graph,
    ops::INPUT_SLOT,
};

/// Index into [`RenderPlan::steps`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepId(pub u32);

/// Evaluate `node` over `rect`, reading earlier steps.
#[derive(Clone, Debug)]
pub struct PlanStep {
    pub node: NodeId,
    pub rect: Rect,
    pub input: Option<StepId>,
    pub aux: SmallVec<[(&'static str, StepId); 1]>,
}

impl PlanStep {
    /// Steps this one reads.
    pub fn dependencies(&self) -> impl Iterator<Item = StepId> + '_ {
        self.input
            .into_iter()
            .chain(self.aux.iter().map(|(_, s)| *s))
    }
}

/// Demand tree of one render request, flattened dependencies-first.
///
/// The last step always produces the requested node.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub target: NodeId,
    pub roi: Rect,
    pub scale: f64,
    /// [`Graph::revision`] at compile time.
    pub revision: u64,
    pub steps: Vec<PlanStep>,
}

impl RenderPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// How many steps evaluate `node`.
    pub fn evaluations_of(&self, node: NodeId) -> usize {
        self.steps.iter().filter(|s| s.node == node).count()
    }
}

/// Walk backwards from `target`, asking every operation which rect it needs from each bound
/// slot. With `memoize`, identical `(node, rect)` demands share one step.
pub fn compile_plan(
    graph: &Graph,
    target: NodeId,
    roi: Rect,
    scale: f64,
    memoize: bool,
) -> PortaResult<RenderPlan> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PortaError::InvalidScale(scale));
    }
    if roi.width < 0 || roi.height < 0 {
        return Err(PortaError::InvalidDimension {
            width: i64::from(roi.width),
            height: i64::from(roi.height),
        });
    }
    graph.get(target)?;

    let mut planner = Planner {
        graph,
        scale,
        memoize,
        steps: Vec::new(),
        memo: HashMap::new(),
        path: Vec::new(),
    };
    planner.resolve(target, roi)?;
    tracing::debug!(
        %target,
        %roi,
        steps = planner.steps.len(),
        memo_entries = planner.memo.len(),
        "compiled render plan"
    );
    Ok(RenderPlan {
        target,
        roi,
        scale,
        revision: graph.revision(),
        steps: planner.steps,
    })
}

struct Planner<'g> {
    graph: &'g Graph,
    scale: f64,
    memoize: bool,
    steps: Vec<PlanStep>,
    memo: HashMap<(NodeId, Rect), StepId>,
    path: Vec<NodeId>,
}

impl Planner<'_> {
    fn resolve(&mut self, id: NodeId, rect: Rect) -> PortaResult<StepId> {
        if self.memoize
            && let Some(step) = self.memo.get(&(id, rect))
        {
            tracing::trace!(node = %id, %rect, "memo hit");
            return Ok(*step);
        }

        let graph = self.graph;
        let node = graph.get(id)?;
        let op = node.op();
        self.path.push(id);

        let input = if op.kind().has_input() {
            let Some(producer) = node.producer(INPUT_SLOT) else {
                return Err(PortaError::MissingInput {
                    node: id,
                    slot: INPUT_SLOT,
                    rect,
                });
            };
            let want = op.input_request(INPUT_SLOT, rect, self.scale);
            Some(self.resolve_edge(id, INPUT_SLOT, producer, want)?)
        } else {
            None
        };

        let mut aux = SmallVec::new();
        for &slot in op.aux_slots() {
            match node.producer(slot) {
                Some(producer) => {
                    let want = op.input_request(slot, rect, self.scale);
                    aux.push((slot, self.resolve_edge(id, slot, producer, want)?));
                }
                None => tracing::trace!(node = %id, slot, "aux unbound"),
            }
        }

        self.path.pop();
        let step = StepId(self.steps.len() as u32);
        self.steps.push(PlanStep {
            node: id,
            rect,
            input,
            aux,
        });
        if self.memoize {
            self.memo.insert((id, rect), step);
        }
        Ok(step)
    }

    fn resolve_edge(
        &mut self,
        consumer: NodeId,
        slot: &'static str,
        producer: NodeId,
        rect: Rect,
    ) -> PortaResult<StepId> {
        if self.path.contains(&producer) {
            return Err(PortaError::CyclicGraph {
                consumer,
                slot,
                producer,
            });
        }
        self.resolve(producer, rect)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
