//! Rasterization of ASCII frames back into bitmaps.

pub mod font;
pub mod raster;
