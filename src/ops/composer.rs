use crate::{
    buffer::pixel::PixelBuffer,
    compose::{kernel::compose_with, porter_duff::PorterDuff},
    foundation::error::PortaResult,
    ops::params::{NoParams, parse_params},
    ops::{AUX_SLOT, EvalCtx, Operation, OperationKind, ResolvedInputs},
};

/// Porter-Duff compositor node: `aux` is the source, the default input the destination.
///
/// An unbound `aux` passes the input through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PorterDuffOp {
    op: PorterDuff,
    name: &'static str,
}

impl PorterDuffOp {
    pub fn new(op: PorterDuff) -> Self {
        Self {
            op,
            name: op.name(),
        }
    }

    /// `src_over` registered under its short name.
    pub fn over() -> Self {
        Self {
            op: PorterDuff::SrcOver,
            name: "over",
        }
    }

    /// Accepts only an empty or `null` parameter object.
    pub fn with_params(self, raw: &serde_json::Value) -> PortaResult<Self> {
        parse_params::<NoParams>(self.name, &[], raw)?;
        Ok(self)
    }

    pub fn op(&self) -> PorterDuff {
        self.op
    }
}

impl Operation for PorterDuffOp {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Composer
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let input = inputs.require_input(self.name)?;
        compose_with(input, inputs.aux(AUX_SLOT), self.op, ctx.parallel)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/composer.rs"]
mod tests;
