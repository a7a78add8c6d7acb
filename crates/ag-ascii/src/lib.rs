//! Glyph mapping: intensity grid → ASCII text block.

pub mod mapper;
