use std::{fmt, str::FromStr};

use crate::foundation::error::PortaError;

/// Pixel format tag, parsed from names such as `"RaGaBaA float"` or `"Y u8"`.
///
/// `Ra`/`Ga`/`Ba` denote color channels premultiplied by alpha. Rendering always happens in
/// [`PixelFormat::RaGaBaAFloat`]; the other tags describe buffers or byte streams produced from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    RaGaBaAFloat,
    RgbaFloat,
    YFloat,
    RaGaBaAU8,
    RgbaU8,
    YU8,
    YaU8,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 7] = [
        PixelFormat::RaGaBaAFloat,
        PixelFormat::RgbaFloat,
        PixelFormat::YFloat,
        PixelFormat::RaGaBaAU8,
        PixelFormat::RgbaU8,
        PixelFormat::YU8,
        PixelFormat::YaU8,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            PixelFormat::RaGaBaAFloat => "RaGaBaA float",
            PixelFormat::RgbaFloat => "RGBA float",
            PixelFormat::YFloat => "Y float",
            PixelFormat::RaGaBaAU8 => "RaGaBaA u8",
            PixelFormat::RgbaU8 => "RGBA u8",
            PixelFormat::YU8 => "Y u8",
            PixelFormat::YaU8 => "YA u8",
        }
    }

    pub fn channels(self) -> usize {
        match self {
            PixelFormat::RaGaBaAFloat
            | PixelFormat::RgbaFloat
            | PixelFormat::RaGaBaAU8
            | PixelFormat::RgbaU8 => 4,
            PixelFormat::YaU8 => 2,
            PixelFormat::YFloat | PixelFormat::YU8 => 1,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        if self.is_float() { 4 } else { 1 }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.channels() * self.bytes_per_sample()
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            PixelFormat::RaGaBaAFloat | PixelFormat::RgbaFloat | PixelFormat::YFloat
        )
    }

    pub fn is_premultiplied(self) -> bool {
        matches!(self, PixelFormat::RaGaBaAFloat | PixelFormat::RaGaBaAU8)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PixelFormat {
    type Err = PortaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        PixelFormat::ALL
            .into_iter()
            .find(|f| f.tag() == normalized)
            .ok_or_else(|| PortaError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/format.rs"]
mod tests;
