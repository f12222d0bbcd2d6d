/// Dark to light.
pub const GREYSCALE_RAMP: [&str; 5] = ["█", "▓", "▒", "░", " "];

/// Turn a `Y u8` byte stream into rows of block characters, `width` pixels per row.
///
/// A trailing partial row is still printed. `reverse` flips the ramp for light-on-dark output.
pub fn ascii_ramp(luma: &[u8], width: usize, reverse: bool) -> String {
    if width == 0 {
        return String::new();
    }
    let levels = GREYSCALE_RAMP.len();
    let mut out = String::with_capacity(luma.len() * 3 + luma.len() / width + 1);
    for row in luma.chunks(width) {
        for &y in row {
            let mut level = usize::from(y) * levels / 256;
            if reverse {
                level = levels - 1 - level;
            }
            out.push_str(GREYSCALE_RAMP[level]);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/ascii.rs"]
mod tests;
