use rayon::prelude::*;

use crate::{
    buffer::{format::PixelFormat, pixel::PixelBuffer},
    compose::porter_duff::PorterDuff,
    foundation::error::{PortaError, PortaResult},
};

/// Below this many pixels, splitting rows across threads costs more than it saves.
const PARALLEL_MIN_PIXELS: usize = 64 * 64;

/// Composite `aux` (source) onto `input` (destination) with `op`.
///
/// With `aux` absent the result is a copy of `input`. Output has the shape of `input`.
pub fn compose(
    input: &PixelBuffer,
    aux: Option<&PixelBuffer>,
    op: PorterDuff,
) -> PortaResult<PixelBuffer> {
    compose_with(input, aux, op, true)
}

/// [`compose`] with the operator looked up by name (`"src_over"`, `"xor"`, ...).
pub fn compose_named(
    input: &PixelBuffer,
    aux: Option<&PixelBuffer>,
    name: &str,
) -> PortaResult<PixelBuffer> {
    let op = name.parse::<PorterDuff>()?;
    compose(input, aux, op)
}

/// [`compose`] with explicit control over row parallelism. Results are identical either way.
pub fn compose_with(
    input: &PixelBuffer,
    aux: Option<&PixelBuffer>,
    op: PorterDuff,
    parallel: bool,
) -> PortaResult<PixelBuffer> {
    expect_working_format("input", input)?;
    let Some(aux) = aux else {
        tracing::trace!(%op, "aux absent, passing input through");
        return Ok(input.clone());
    };
    expect_working_format("aux", aux)?;
    if !input.same_shape(aux) {
        return Err(PortaError::format_mismatch(format!(
            "{op}: input is {}x{}, aux is {}x{}",
            input.width(),
            input.height(),
            aux.width(),
            aux.height()
        )));
    }

    let mut out = input.clone();
    if out.is_empty() {
        return Ok(out);
    }

    let row_len = input.width() as usize * 4;
    let px_count = input.width() as usize * input.height() as usize;
    let blend_row = |(dst_row, src_row): (&mut [f32], &[f32])| {
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let px = op.apply([s[0], s[1], s[2], s[3]], [d[0], d[1], d[2], d[3]]);
            d.copy_from_slice(&px);
        }
    };

    if parallel && px_count >= PARALLEL_MIN_PIXELS {
        out.samples_mut()
            .par_chunks_mut(row_len)
            .zip(aux.samples().par_chunks(row_len))
            .for_each(blend_row);
    } else {
        out.samples_mut()
            .chunks_mut(row_len)
            .zip(aux.samples().chunks(row_len))
            .for_each(blend_row);
    }
    Ok(out)
}

fn expect_working_format(role: &str, buf: &PixelBuffer) -> PortaResult<()> {
    if buf.format() != PixelFormat::RaGaBaAFloat {
        return Err(PortaError::format_mismatch(format!(
            "{role} must be `{}`, got `{}`",
            PixelFormat::RaGaBaAFloat,
            buf.format()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/kernel.rs"]
mod tests;
