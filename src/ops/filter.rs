use crate::{
    buffer::pixel::PixelBuffer,
    foundation::core::{Extent, Rect},
    foundation::error::PortaResult,
    foundation::math::{luminance, unpremultiply},
    ops::params::{NoParams, check_range, parse_params},
    ops::{EvalCtx, Operation, OperationKind, ParamSpec, ParamType, ResolvedInputs},
};

/// Rewrite every premultiplied pixel of `input` with `f`.
fn map_pixels(input: &PixelBuffer, f: impl Fn([f32; 4]) -> [f32; 4]) -> PixelBuffer {
    let mut out = input.clone();
    for px in out.samples_mut().chunks_exact_mut(4) {
        let next = f([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&next);
    }
    out
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdParams {
    pub value: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self { value: 0.5 }
    }
}

/// Binarize luminance: pixels whose straight luma reaches `value` become white, the rest black.
/// Alpha is kept.
#[derive(Clone, Debug)]
pub struct Threshold {
    params: ThresholdParams,
}

impl Threshold {
    pub const NAME: &'static str = "threshold";
    pub const PARAMS: &'static [ParamSpec] = &[ParamSpec::new(
        "value",
        ParamType::Float,
        "Luminance cut-off in [0, 1]",
    )];

    pub fn new(value: f64) -> PortaResult<Self> {
        Self::with_params(ThresholdParams { value })
    }

    pub fn with_params(params: ThresholdParams) -> PortaResult<Self> {
        check_range(Self::NAME, "value", params.value, 0.0, 1.0)?;
        Ok(Self { params })
    }

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        Self::with_params(parse_params(Self::NAME, Self::PARAMS, raw)?)
    }
}

impl Operation for Threshold {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Filter
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, _ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let input = inputs.require_input(Self::NAME)?;
        let cut = self.params.value as f32;
        Ok(map_pixels(input, |px| {
            let a = px[3];
            let y = if luminance(unpremultiply(px)) >= cut {
                a
            } else {
                0.0
            };
            [y, y, y, a]
        }))
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateParams {
    pub x: f64,
    pub y: f64,
}

/// Shift the input by `(x, y)` scene units, snapped to whole output pixels.
///
/// Output pixel `p` is input pixel `p - offset`, so the work happens entirely in
/// [`Operation::input_request`]: the engine fetches the shifted rect and this node hands it on.
#[derive(Clone, Debug)]
pub struct Translate {
    params: TranslateParams,
}

impl Translate {
    pub const NAME: &'static str = "translate";
    pub const PARAMS: &'static [ParamSpec] = &[
        ParamSpec::new("x", ParamType::Float, "Horizontal offset"),
        ParamSpec::new("y", ParamType::Float, "Vertical offset"),
    ];

    pub fn new(x: f64, y: f64) -> PortaResult<Self> {
        Self::with_params(TranslateParams { x, y })
    }

    pub fn with_params(params: TranslateParams) -> PortaResult<Self> {
        check_range(Self::NAME, "x", params.x, -1e6, 1e6)?;
        check_range(Self::NAME, "y", params.y, -1e6, 1e6)?;
        Ok(Self { params })
    }

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        Self::with_params(parse_params(Self::NAME, Self::PARAMS, raw)?)
    }

    /// Offset in output pixels at `scale`.
    pub fn offset(&self, scale: f64) -> (i32, i32) {
        (
            (self.params.x * scale).round() as i32,
            (self.params.y * scale).round() as i32,
        )
    }
}

impl Operation for Translate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Filter
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }

    fn input_request(&self, _slot: &str, roi: Rect, scale: f64) -> Rect {
        let (dx, dy) = self.offset(scale);
        roi.translate(dx.saturating_neg(), dy.saturating_neg())
    }

    fn defined_region(&self, input: Option<Extent>, _aux: Option<Extent>) -> Extent {
        let (dx, dy) = self.offset(1.0);
        match input {
            Some(Extent::Bounded(r)) => Extent::Bounded(r.translate(dx, dy)),
            Some(Extent::Unbounded) => Extent::Unbounded,
            None => Extent::Bounded(Rect::default()),
        }
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, _ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        Ok(inputs.require_input(Self::NAME)?.clone())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpacityParams {
    pub value: f64,
}

impl Default for OpacityParams {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

/// Scale every premultiplied channel by `value`.
#[derive(Clone, Debug)]
pub struct Opacity {
    params: OpacityParams,
}

impl Opacity {
    pub const NAME: &'static str = "opacity";
    pub const PARAMS: &'static [ParamSpec] = &[ParamSpec::new(
        "value",
        ParamType::Float,
        "Opacity multiplier in [0, 1]",
    )];

    pub fn new(value: f64) -> PortaResult<Self> {
        Self::with_params(OpacityParams { value })
    }

    pub fn with_params(params: OpacityParams) -> PortaResult<Self> {
        check_range(Self::NAME, "value", params.value, 0.0, 1.0)?;
        Ok(Self { params })
    }

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        Self::with_params(parse_params(Self::NAME, Self::PARAMS, raw)?)
    }
}

impl Operation for Opacity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Filter
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, _ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let input = inputs.require_input(Self::NAME)?;
        let k = self.params.value as f32;
        Ok(map_pixels(input, |px| px.map(|c| c * k)))
    }
}

/// Invert straight color, keeping alpha. In premultiplied terms `c' = a - c`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Invert;

impl Invert {
    pub const NAME: &'static str = "invert";

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        parse_params::<NoParams>(Self::NAME, &[], raw)?;
        Ok(Self)
    }
}

impl Operation for Invert {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Filter
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, _ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let input = inputs.require_input(Self::NAME)?;
        Ok(map_pixels(input, |[r, g, b, a]| [a - r, a - g, a - b, a]))
    }
}

/// Passes its input through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nop;

impl Nop {
    pub const NAME: &'static str = "nop";

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        parse_params::<NoParams>(Self::NAME, &[], raw)?;
        Ok(Self)
    }
}

impl Operation for Nop {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Filter
    }

    fn evaluate(&self, inputs: &ResolvedInputs<'_>, _ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        Ok(inputs.require_input(Self::NAME)?.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/filter.rs"]
mod tests;
