use rayon::prelude::*;

use crate::{
    buffer::pixel::{PixelBuffer, Rgba},
    foundation::core::{Extent, Rect},
    foundation::error::{PortaError, PortaResult},
    foundation::math::premultiply,
    ops::params::{check_range, parse_params},
    ops::{EvalCtx, Operation, OperationKind, ParamSpec, ParamType, ResolvedInputs},
};

fn checked_color(op: &str, name: &str, color: [f32; 4]) -> PortaResult<Rgba> {
    if color.iter().any(|c| !c.is_finite()) {
        return Err(PortaError::invalid_parameter(
            op,
            name,
            format!("{color:?} has non-finite components"),
        ));
    }
    Ok(premultiply(color))
}

fn rect_size(rect: Rect) -> (u32, u32) {
    (rect.width.max(0) as u32, rect.height.max(0) as u32)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorParams {
    /// Straight-alpha RGBA.
    pub color: [f32; 4],
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Flat fill, unbounded.
#[derive(Clone, Debug)]
pub struct ColorSource {
    params: ColorParams,
    premul: Rgba,
}

impl ColorSource {
    pub const NAME: &'static str = "color";
    pub const PARAMS: &'static [ParamSpec] = &[ParamSpec::new(
        "color",
        ParamType::Color,
        "Fill color as straight [r, g, b, a]",
    )];

    pub fn new(color: [f32; 4]) -> PortaResult<Self> {
        Self::with_params(ColorParams { color })
    }

    pub fn with_params(params: ColorParams) -> PortaResult<Self> {
        let premul = checked_color(Self::NAME, "color", params.color)?;
        Ok(Self { params, premul })
    }

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        Self::with_params(parse_params(Self::NAME, Self::PARAMS, raw)?)
    }
}

impl Operation for ColorSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Source
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }

    fn evaluate(&self, _inputs: &ResolvedInputs<'_>, ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let (w, h) = rect_size(ctx.rect);
        PixelBuffer::filled(w, h, self.premul)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerboardParams {
    /// Tile width in scene units.
    pub x: u32,
    /// Tile height in scene units.
    pub y: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub color1: [f32; 4],
    pub color2: [f32; 4],
}

impl Default for CheckerboardParams {
    fn default() -> Self {
        Self {
            x: 16,
            y: 16,
            x_offset: 0,
            y_offset: 0,
            color1: [0.0, 0.0, 0.0, 1.0],
            color2: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Alternating two-color tiles, unbounded. Tile `(0, 0)` uses `color1`.
#[derive(Clone, Debug)]
pub struct Checkerboard {
    params: CheckerboardParams,
    premul: [Rgba; 2],
}

impl Checkerboard {
    pub const NAME: &'static str = "checkerboard";
    pub const PARAMS: &'static [ParamSpec] = &[
        ParamSpec::new("x", ParamType::Int, "Tile width"),
        ParamSpec::new("y", ParamType::Int, "Tile height"),
        ParamSpec::new("x_offset", ParamType::Int, "Horizontal pattern offset"),
        ParamSpec::new("y_offset", ParamType::Int, "Vertical pattern offset"),
        ParamSpec::new("color1", ParamType::Color, "First tile color"),
        ParamSpec::new("color2", ParamType::Color, "Second tile color"),
    ];

    pub fn with_params(params: CheckerboardParams) -> PortaResult<Self> {
        if params.x == 0 {
            return Err(PortaError::invalid_parameter(Self::NAME, "x", "must be >= 1"));
        }
        if params.y == 0 {
            return Err(PortaError::invalid_parameter(Self::NAME, "y", "must be >= 1"));
        }
        let premul = [
            checked_color(Self::NAME, "color1", params.color1)?,
            checked_color(Self::NAME, "color2", params.color2)?,
        ];
        Ok(Self { params, premul })
    }

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        Self::with_params(parse_params(Self::NAME, Self::PARAMS, raw)?)
    }

    fn color_at(&self, sx: f64, sy: f64) -> Rgba {
        let p = &self.params;
        let tx = ((sx - f64::from(p.x_offset)) / f64::from(p.x)).floor() as i64;
        let ty = ((sy - f64::from(p.y_offset)) / f64::from(p.y)).floor() as i64;
        // Saturated tile indices at extreme scales must not overflow.
        self.premul[((tx.rem_euclid(2) + ty.rem_euclid(2)) % 2) as usize]
    }
}

impl Operation for Checkerboard {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Source
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }

    fn evaluate(&self, _inputs: &ResolvedInputs<'_>, ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let (w, h) = rect_size(ctx.rect);
        PixelBuffer::from_fn(w, h, |px, py| {
            let (sx, sy) = ctx.scene_point(px, py);
            self.color_at(sx, sy)
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FractalParams {
    pub width: u32,
    pub height: u32,
    pub iterations: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub zoom: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            iterations: 50,
            x_center: -0.5,
            y_center: 0.0,
            zoom: 1.0,
        }
    }
}

/// Greyscale Mandelbrot escape-time render over `[0, width) x [0, height)`.
///
/// Points inside the set are black, escaping points get `iterations_to_escape / iterations`.
/// Outside the bounded area the output is transparent.
#[derive(Clone, Debug)]
pub struct Fractal {
    params: FractalParams,
}

impl Fractal {
    pub const NAME: &'static str = "fractal";
    pub const PARAMS: &'static [ParamSpec] = &[
        ParamSpec::new("width", ParamType::Int, "Width of the rendered area"),
        ParamSpec::new("height", ParamType::Int, "Height of the rendered area"),
        ParamSpec::new("iterations", ParamType::Int, "Escape-time iteration cap"),
        ParamSpec::new("x_center", ParamType::Float, "Real part at the area centre"),
        ParamSpec::new("y_center", ParamType::Float, "Imaginary part at the area centre"),
        ParamSpec::new("zoom", ParamType::Float, "Magnification, 1.0 spans 3 units"),
    ];

    pub fn with_params(params: FractalParams) -> PortaResult<Self> {
        check_range(Self::NAME, "iterations", f64::from(params.iterations), 1.0, 100_000.0)?;
        check_range(Self::NAME, "x_center", params.x_center, -1e6, 1e6)?;
        check_range(Self::NAME, "y_center", params.y_center, -1e6, 1e6)?;
        check_range(Self::NAME, "zoom", params.zoom, f64::MIN_POSITIVE, 1e12)?;
        if i32::try_from(params.width).is_err() || i32::try_from(params.height).is_err() {
            return Err(PortaError::invalid_parameter(
                Self::NAME,
                "width",
                "area exceeds i32 pixel coordinates",
            ));
        }
        Ok(Self { params })
    }

    pub fn from_params(raw: &serde_json::Value) -> PortaResult<Self> {
        Self::with_params(parse_params(Self::NAME, Self::PARAMS, raw)?)
    }

    fn sample(&self, sx: f64, sy: f64) -> Rgba {
        let p = &self.params;
        let (w, h) = (f64::from(p.width), f64::from(p.height));
        if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
            return [0.0; 4];
        }
        let unit = 3.0 / (p.zoom * w.min(h));
        let c_re = p.x_center + (sx - w / 2.0) * unit;
        let c_im = p.y_center + (sy - h / 2.0) * unit;
        let (mut z_re, mut z_im) = (0.0_f64, 0.0_f64);
        let mut n = 0;
        while n < p.iterations && z_re * z_re + z_im * z_im <= 4.0 {
            let next_re = z_re * z_re - z_im * z_im + c_re;
            z_im = 2.0 * z_re * z_im + c_im;
            z_re = next_re;
            n += 1;
        }
        let v = if n >= p.iterations {
            0.0
        } else {
            (f64::from(n) / f64::from(p.iterations)) as f32
        };
        [v, v, v, 1.0]
    }
}

impl Operation for Fractal {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> OperationKind {
        OperationKind::Source
    }

    fn params(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }

    fn defined_region(&self, _input: Option<Extent>, _aux: Option<Extent>) -> Extent {
        Extent::Bounded(Rect {
            x: 0,
            y: 0,
            width: self.params.width as i32,
            height: self.params.height as i32,
        })
    }

    fn evaluate(&self, _inputs: &ResolvedInputs<'_>, ctx: &EvalCtx) -> PortaResult<PixelBuffer> {
        let mut out = PixelBuffer::for_rect(ctx.rect)?;
        if out.is_empty() {
            return Ok(out);
        }
        let row_len = out.width() as usize * 4;
        let fill_row = |(py, row): (usize, &mut [f32])| {
            for (px, dst) in row.chunks_exact_mut(4).enumerate() {
                let (sx, sy) = ctx.scene_point(px as u32, py as u32);
                dst.copy_from_slice(&self.sample(sx, sy));
            }
        };
        if ctx.parallel {
            out.samples_mut()
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(fill_row);
        } else {
            out.samples_mut()
                .chunks_mut(row_len)
                .enumerate()
                .for_each(fill_row);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/source.rs"]
mod tests;
