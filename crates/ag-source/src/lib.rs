//! Visual sources for asciigif: still images, animated GIFs and the luminance sampler.

pub mod image;
pub mod resize;
