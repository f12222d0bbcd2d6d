use crate::{
    buffer::format::PixelFormat,
    foundation::core::Rect,
    foundation::error::{PortaError, PortaResult},
    foundation::math::{luminance, premultiply, quantize_unit_u8, unpremultiply},
};

/// One premultiplied RGBA pixel (`r,g,b` already multiplied by `a`).
pub type Rgba = [f32; 4];

/// Rectangular block of float samples, row-major, `width * height * channels` long.
///
/// Buffers are only ever created with a float [`PixelFormat`]; 8-bit tags exist for
/// [`to_byte_stream`](Self::to_byte_stream) output only.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Zero-initialized buffer. Negative or overflowing dimensions fail with `InvalidDimension`.
    pub fn allocate(width: i64, height: i64, format: PixelFormat) -> PortaResult<Self> {
        let invalid = || PortaError::InvalidDimension { width, height };
        if width < 0 || height < 0 || width > i64::from(i32::MAX) || height > i64::from(i32::MAX)
        {
            return Err(invalid());
        }
        if !format.is_float() {
            return Err(PortaError::format_mismatch(format!(
                "pixel buffers hold float samples, got `{format}`"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(format.channels()))
            .ok_or_else(invalid)?;
        Ok(Self {
            width: width as u32,
            height: height as u32,
            format,
            data: vec![0.0; len],
        })
    }

    /// Zeroed premultiplied RGBA buffer sized like `rect`.
    pub fn for_rect(rect: Rect) -> PortaResult<Self> {
        Self::allocate(
            i64::from(rect.width),
            i64::from(rect.height),
            PixelFormat::RaGaBaAFloat,
        )
    }

    pub fn filled(width: u32, height: u32, px: Rgba) -> PortaResult<Self> {
        let mut out = Self::allocate(i64::from(width), i64::from(height), PixelFormat::RaGaBaAFloat)?;
        for chunk in out.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        Ok(out)
    }

    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Rgba,
    ) -> PortaResult<Self> {
        let mut out = Self::allocate(i64::from(width), i64::from(height), PixelFormat::RaGaBaAFloat)?;
        let w = width as usize;
        for (i, chunk) in out.data.chunks_exact_mut(4).enumerate() {
            let px = f((i % w) as u32, (i / w) as u32);
            chunk.copy_from_slice(&px);
        }
        Ok(out)
    }

    pub fn from_samples(
        width: u32,
        height: u32,
        format: PixelFormat,
        samples: Vec<f32>,
    ) -> PortaResult<Self> {
        let mut out = Self::allocate(i64::from(width), i64::from(height), format)?;
        if samples.len() != out.data.len() {
            return Err(PortaError::format_mismatch(format!(
                "expected {} samples for {width}x{height} `{format}`, got {}",
                out.data.len(),
                samples.len()
            )));
        }
        out.data = samples;
        Ok(out)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.format == other.format
    }

    pub fn pixels(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(self.channels())
    }

    fn offset(&self, x: i64, y: i64) -> PortaResult<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return Err(PortaError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(((y as usize) * (self.width as usize) + (x as usize)) * self.channels())
    }

    pub fn read_pixel(&self, x: i64, y: i64) -> PortaResult<&[f32]> {
        let at = self.offset(x, y)?;
        Ok(&self.data[at..at + self.channels()])
    }

    pub fn write_pixel(&mut self, x: i64, y: i64, value: &[f32]) -> PortaResult<()> {
        let at = self.offset(x, y)?;
        let channels = self.channels();
        if value.len() != channels {
            return Err(PortaError::format_mismatch(format!(
                "`{}` pixels have {channels} channels, got {}",
                self.format,
                value.len()
            )));
        }
        self.data[at..at + channels].copy_from_slice(value);
        Ok(())
    }

    /// Pixel at `(x, y)` as premultiplied RGBA regardless of the buffer's own format.
    pub fn rgba(&self, x: i64, y: i64) -> PortaResult<Rgba> {
        let at = self.offset(x, y)?;
        Ok(self.premultiplied_at(at))
    }

    fn premultiplied_at(&self, at: usize) -> Rgba {
        let d = &self.data;
        match self.format {
            PixelFormat::YFloat => [d[at], d[at], d[at], 1.0],
            PixelFormat::RgbaFloat => premultiply([d[at], d[at + 1], d[at + 2], d[at + 3]]),
            _ => [d[at], d[at + 1], d[at + 2], d[at + 3]],
        }
    }

    /// Copy of the sub-rectangle `rect` (buffer-local coordinates).
    pub fn crop(&self, rect: Rect) -> PortaResult<Self> {
        let bounds = Rect::sized(self.width, self.height)?;
        if !bounds.contains_rect(rect) {
            return Err(PortaError::OutOfRange {
                x: rect.right() - 1,
                y: rect.bottom() - 1,
                width: self.width,
                height: self.height,
            });
        }
        let mut out = Self::allocate(i64::from(rect.width), i64::from(rect.height), self.format)?;
        if out.is_empty() {
            return Ok(out);
        }
        let channels = self.channels();
        let src_stride = self.width as usize * channels;
        let row_len = rect.width as usize * channels;
        for (row, dst) in out.data.chunks_exact_mut(row_len).enumerate() {
            let start = (rect.y as usize + row) * src_stride + rect.x as usize * channels;
            dst.copy_from_slice(&self.data[start..start + row_len]);
        }
        Ok(out)
    }

    /// Encode every pixel as `format`, row-major, top-to-bottom, left-to-right.
    ///
    /// 8-bit encodings clamp to `[0, 1]` before scaling; float encodings are emitted as-is
    /// (little-endian `f32`).
    pub fn to_byte_stream(&self, format: PixelFormat) -> Vec<u8> {
        let px_count = self.width as usize * self.height as usize;
        let mut out = Vec::with_capacity(px_count * format.bytes_per_pixel());
        let channels = self.channels();
        for i in 0..px_count {
            let premul = self.premultiplied_at(i * channels);
            match format {
                PixelFormat::RaGaBaAFloat => push_f32s(&mut out, &premul),
                PixelFormat::RgbaFloat => push_f32s(&mut out, &unpremultiply(premul)),
                PixelFormat::YFloat => push_f32s(&mut out, &[luminance(unpremultiply(premul))]),
                PixelFormat::RaGaBaAU8 => out.extend(premul.map(quantize_unit_u8)),
                PixelFormat::RgbaU8 => out.extend(unpremultiply(premul).map(quantize_unit_u8)),
                PixelFormat::YU8 => out.push(quantize_unit_u8(luminance(unpremultiply(premul)))),
                PixelFormat::YaU8 => {
                    out.push(quantize_unit_u8(luminance(unpremultiply(premul))));
                    out.push(quantize_unit_u8(premul[3]));
                }
            }
        }
        out
    }
}

fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
