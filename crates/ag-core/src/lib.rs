//! Shared types for asciigif: glyph ramp, frames, configuration, errors and
//! the traits the conversion pipeline is built on.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod recipe;
pub mod traits;
