use std::{fmt, str::FromStr};

use crate::{buffer::pixel::Rgba, foundation::error::PortaError};

/// The twelve Porter-Duff compositing operators.
///
/// `A` is the auxiliary ("source") pixel, `B` the default input ("destination") pixel. Every
/// operator has the form `D = A·Fa + B·Fb`, applied identically to color and alpha, with the
/// factors listed in [`FORMULAS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PorterDuff {
    Clear,
    Src,
    Dst,
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
}

/// Blend factor applied to one side of a Porter-Duff sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Factor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

impl Factor {
    /// `v · factor`. `Zero` and `One` short-circuit so they never multiply.
    #[inline]
    fn weigh(self, v: f32, a_src: f32, a_dst: f32) -> f32 {
        match self {
            Factor::Zero => 0.0,
            Factor::One => v,
            Factor::SrcAlpha => v * a_src,
            Factor::OneMinusSrcAlpha => v * (1.0 - a_src),
            Factor::DstAlpha => v * a_dst,
            Factor::OneMinusDstAlpha => v * (1.0 - a_dst),
        }
    }
}

/// One row of the operator table.
#[derive(Clone, Copy, Debug)]
pub struct Formula {
    pub op: PorterDuff,
    pub name: &'static str,
    pub src: Factor,
    pub dst: Factor,
}

const fn row(op: PorterDuff, name: &'static str, src: Factor, dst: Factor) -> Formula {
    Formula { op, name, src, dst }
}

/// Indexed by `PorterDuff as usize`.
pub const FORMULAS: [Formula; 12] = {
    use Factor::*;
    use PorterDuff::*;
    [
        row(Clear, "clear", Zero, Zero),
        row(Src, "src", One, Zero),
        row(Dst, "dst", Zero, One),
        row(SrcOver, "src_over", One, OneMinusSrcAlpha),
        row(DstOver, "dst_over", OneMinusDstAlpha, One),
        row(SrcIn, "src_in", DstAlpha, Zero),
        row(DstIn, "dst_in", Zero, SrcAlpha),
        row(SrcOut, "src_out", OneMinusDstAlpha, Zero),
        row(DstOut, "dst_out", Zero, OneMinusSrcAlpha),
        row(SrcAtop, "src_atop", DstAlpha, OneMinusSrcAlpha),
        row(DstAtop, "dst_atop", OneMinusDstAlpha, SrcAlpha),
        row(Xor, "xor", OneMinusDstAlpha, OneMinusSrcAlpha),
    ]
};

impl PorterDuff {
    pub const ALL: [PorterDuff; 12] = [
        PorterDuff::Clear,
        PorterDuff::Src,
        PorterDuff::Dst,
        PorterDuff::SrcOver,
        PorterDuff::DstOver,
        PorterDuff::SrcIn,
        PorterDuff::DstIn,
        PorterDuff::SrcOut,
        PorterDuff::DstOut,
        PorterDuff::SrcAtop,
        PorterDuff::DstAtop,
        PorterDuff::Xor,
    ];

    pub fn formula(self) -> &'static Formula {
        &FORMULAS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.formula().name
    }

    /// Composite one `aux` (source) pixel with one `input` (destination) pixel. Never clamps.
    #[inline]
    pub fn apply(self, src: Rgba, dst: Rgba) -> Rgba {
        let f = self.formula();
        let (a_src, a_dst) = (src[3], dst[3]);
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = f.src.weigh(src[i], a_src, a_dst) + f.dst.weigh(dst[i], a_src, a_dst);
        }
        out
    }
}

impl fmt::Display for PorterDuff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PorterDuff {
    type Err = PortaError;

    /// Accepts the table names, their hyphenated spelling, and `over` for `src_over`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('-', "_");
        if key == "over" {
            return Ok(PorterDuff::SrcOver);
        }
        FORMULAS
            .iter()
            .find(|f| f.name == key)
            .map(|f| f.op)
            .ok_or_else(|| PortaError::UnknownOperator(s.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/porter_duff.rs"]
mod tests;
