//! Lazy region rendering.
//!
//! A request names a node, an output rect and a scale. [`plan::compile_plan`] walks the graph
//! backwards and records which rect every upstream node must produce; [`RenderEngine`] then
//! evaluates those steps in order and returns the requested node's pixels. Nothing outside the
//! demanded rects is ever computed.

pub mod ascii;
pub mod engine;
pub mod plan;

pub use ascii::ascii_ramp;
pub use engine::{RenderEngine, RenderOpts, render};
pub use plan::{PlanStep, RenderPlan, StepId};
