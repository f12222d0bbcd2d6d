use crate::{
    buffer::{format::PixelFormat, pixel::PixelBuffer},
    foundation::core::{NodeId, Rect},
    foundation::error::{PortaError, PortaResult},
    graph::Graph,
    ops::{EvalCtx, ResolvedInputs},
    render::plan::{RenderPlan, compile_plan},
};

/// Knobs for [`RenderEngine`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Share one evaluation between identical `(node, rect)` demands within a request.
    pub memoize: bool,
    /// Allow operations to split per-pixel work across rayon workers.
    pub parallel: bool,
    /// Run on a dedicated pool of this many threads instead of the global one.
    pub threads: Option<usize>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            memoize: true,
            parallel: true,
            threads: None,
        }
    }
}

/// Demand-driven evaluator: [`compile`](Self::compile) a request into a [`RenderPlan`], then
/// [`execute`](Self::execute) it.
#[derive(Debug, Default)]
pub struct RenderEngine {
    opts: RenderOpts,
    pool: Option<rayon::ThreadPool>,
}

impl RenderEngine {
    pub fn new(opts: RenderOpts) -> PortaResult<Self> {
        let pool = match opts.threads {
            Some(_) if opts.parallel => Some(build_thread_pool(opts.threads)?),
            _ => None,
        };
        Ok(Self { opts, pool })
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    #[tracing::instrument(skip(self, graph))]
    pub fn compile(
        &self,
        graph: &Graph,
        node: NodeId,
        roi: Rect,
        scale: f64,
    ) -> PortaResult<RenderPlan> {
        compile_plan(graph, node, roi, scale, self.opts.memoize)
    }

    /// Run `plan` against `graph`. Fails with `ConcurrentModification` if the graph changed
    /// since the plan was compiled.
    #[tracing::instrument(skip_all, fields(target = %plan.target, steps = plan.steps.len()))]
    pub fn execute(&self, graph: &Graph, plan: &RenderPlan) -> PortaResult<PixelBuffer> {
        if plan.revision != graph.revision() {
            return Err(PortaError::ConcurrentModification {
                planned: plan.revision,
                current: graph.revision(),
            });
        }
        match &self.pool {
            Some(pool) => pool.install(|| self.run_steps(graph, plan)),
            None => self.run_steps(graph, plan),
        }
    }

    fn run_steps(&self, graph: &Graph, plan: &RenderPlan) -> PortaResult<PixelBuffer> {
        // Buffers are dropped once their last reader has run.
        let mut readers = vec![0usize; plan.steps.len()];
        for step in &plan.steps {
            for dep in step.dependencies() {
                readers[dep.0 as usize] += 1;
            }
        }

        let mut results: Vec<Option<PixelBuffer>> = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let op = graph.get(step.node)?.op();
            let ctx = EvalCtx {
                rect: step.rect,
                scale: plan.scale,
                parallel: self.opts.parallel,
            };
            let out = {
                let inputs = ResolvedInputs {
                    input: step.input.map(|s| fetch(&results, s.0)).transpose()?,
                    aux: step
                        .aux
                        .iter()
                        .map(|(slot, s)| fetch(&results, s.0).map(|buf| (*slot, buf)))
                        .collect::<PortaResult<_>>()?,
                };
                op.evaluate(&inputs, &ctx)?
            };
            if i64::from(out.width()) != i64::from(step.rect.width)
                || i64::from(out.height()) != i64::from(step.rect.height)
            {
                return Err(PortaError::format_mismatch(format!(
                    "`{}` on {} produced {}x{} for {}",
                    op.name(),
                    step.node,
                    out.width(),
                    out.height(),
                    step.rect
                )));
            }
            tracing::trace!(node = %step.node, op = op.name(), rect = %step.rect, "evaluated");

            for dep in step.dependencies() {
                let n = &mut readers[dep.0 as usize];
                *n -= 1;
                if *n == 0 {
                    results[dep.0 as usize] = None;
                }
            }
            results.push(Some(out));
        }

        results
            .pop()
            .flatten()
            .ok_or_else(|| PortaError::validation("render plan has no steps"))
    }

    /// Compile and execute in one go.
    pub fn render_buffer(
        &self,
        graph: &Graph,
        node: NodeId,
        roi: Rect,
        scale: f64,
    ) -> PortaResult<PixelBuffer> {
        let plan = self.compile(graph, node, roi, scale)?;
        self.execute(graph, &plan)
    }

    /// Render `roi` of `node` encoded as `format` (e.g. `"Y u8"`), row-major.
    pub fn render(
        &self,
        graph: &Graph,
        node: NodeId,
        roi: Rect,
        scale: f64,
        format: &str,
    ) -> PortaResult<Vec<u8>> {
        let format: PixelFormat = format.parse()?;
        let buf = self.render_buffer(graph, node, roi, scale)?;
        Ok(buf.to_byte_stream(format))
    }
}

fn fetch(results: &[Option<PixelBuffer>], step: u32) -> PortaResult<&PixelBuffer> {
    results
        .get(step as usize)
        .and_then(Option::as_ref)
        .ok_or_else(|| PortaError::validation(format!("render step {step} read before it ran")))
}

/// One-shot render with default [`RenderOpts`].
pub fn render(
    graph: &Graph,
    node: NodeId,
    roi: Rect,
    scale: f64,
    format: &str,
) -> PortaResult<Vec<u8>> {
    RenderEngine::default().render(graph, node, roi, scale, format)
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> PortaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PortaError::validation(
            "render option 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PortaError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
