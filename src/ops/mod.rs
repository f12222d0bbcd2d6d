//! Operation contract and the built-in operation set.
//!
//! Every node wraps one [`Operation`]. The render engine resolves the operation's declared input
//! slots, then calls [`Operation::evaluate`] with the resolved buffers for exactly the rect it
//! was asked for.

use std::fmt;

use smallvec::SmallVec;

use crate::{
    buffer::pixel::PixelBuffer,
    foundation::core::{Extent, Rect},
    foundation::error::{PortaError, PortaResult},
};

pub mod composer;
pub mod filter;
pub(crate) mod params;
pub mod registry;
pub mod source;

/// Name of the default pipeline input slot.
pub const INPUT_SLOT: &str = "input";
/// Name of the auxiliary slot declared by compositors.
pub const AUX_SLOT: &str = "aux";

/// Shape of an operation's inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// No inputs; pixels come from parameters alone.
    Source,
    /// Default input only.
    Filter,
    /// Default input plus an optional `aux` input.
    Composer,
}

impl OperationKind {
    pub fn has_input(self) -> bool {
        !matches!(self, OperationKind::Source)
    }

    pub fn aux_slots(self) -> &'static [&'static str] {
        match self {
            OperationKind::Composer => &[AUX_SLOT],
            OperationKind::Source | OperationKind::Filter => &[],
        }
    }
}

/// Value type of a declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Float,
    Int,
    Text,
    /// `[r, g, b, a]`, straight alpha.
    Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub doc: &'static str,
}

impl ParamSpec {
    pub const fn new(name: &'static str, ty: ParamType, doc: &'static str) -> Self {
        Self { name, ty, doc }
    }
}

/// Where and how densely a node is being evaluated.
#[derive(Clone, Copy, Debug)]
pub struct EvalCtx {
    /// Requested output rect, in output (scaled) pixel coordinates.
    pub rect: Rect,
    /// Output pixels per scene unit.
    pub scale: f64,
    /// Whether per-pixel work may be split across threads.
    pub parallel: bool,
}

impl EvalCtx {
    /// Scene-space coordinate of the centre of output pixel `(px, py)` of [`Self::rect`].
    pub fn scene_point(&self, px: u32, py: u32) -> (f64, f64) {
        (
            (f64::from(self.rect.x) + f64::from(px) + 0.5) / self.scale,
            (f64::from(self.rect.y) + f64::from(py) + 0.5) / self.scale,
        )
    }
}

/// Upstream buffers handed to [`Operation::evaluate`], each covering the rect the operation asked
/// for through [`Operation::input_request`].
#[derive(Debug, Default)]
pub struct ResolvedInputs<'a> {
    pub input: Option<&'a PixelBuffer>,
    pub aux: SmallVec<[(&'static str, &'a PixelBuffer); 1]>,
}

impl<'a> ResolvedInputs<'a> {
    pub fn aux(&self, slot: &str) -> Option<&'a PixelBuffer> {
        self.aux
            .iter()
            .find(|(name, _)| *name == slot)
            .map(|(_, buf)| *buf)
    }

    /// The default input, or a validation error naming `op` when it was not supplied.
    pub fn require_input(&self, op: &str) -> PortaResult<&'a PixelBuffer> {
        self.input.ok_or_else(|| {
            PortaError::validation(format!("`{op}` evaluated without its `{INPUT_SLOT}` buffer"))
        })
    }
}

/// A processing unit a node can wrap.
///
/// Implementations must be pure: the same inputs, rect and scale always produce the same pixels,
/// and the returned buffer has exactly the dimensions of `ctx.rect`.
pub trait Operation: fmt::Debug + Send + Sync {
    /// Operation identifier, e.g. `"threshold"` or `"src_over"`.
    fn name(&self) -> &str;

    fn kind(&self) -> OperationKind;

    /// Declared auxiliary slots. Defaults to what [`Self::kind`] implies.
    fn aux_slots(&self) -> &'static [&'static str] {
        self.kind().aux_slots()
    }

    /// Current parameter values as a JSON object.
    fn params(&self) -> serde_json::Value {
        serde_json::Value::Object(serde_json::Map::new())
    }

    /// Rect this operation needs from the producer bound to `slot` in order to produce `roi`.
    fn input_request(&self, _slot: &str, roi: Rect, _scale: f64) -> Rect {
        roi
    }

    /// Region with meaningful output, given the extents of the bound inputs (at scale 1).
    fn defined_region(&self, input: Option<Extent>, aux: Option<Extent>) -> Extent {
        match self.kind() {
            OperationKind::Source => Extent::Unbounded,
            OperationKind::Filter => input.unwrap_or(Extent::Bounded(Rect::default())),
            OperationKind::Composer => match (input, aux) {
                (Some(i), Some(a)) => i.union(a),
                (Some(e), None) | (None, Some(e)) => e,
                (None, None) => Extent::Bounded(Rect::default()),
            },
        }
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, ctx: &EvalCtx) -> PortaResult<PixelBuffer>;
}

#[cfg(test)]
#[path = "../../tests/unit/ops/operation.rs"]
mod tests;
