pub mod format;
pub mod pixel;
