//! asciigif application layer: frame conversion, the chunked animation
//! pipeline and the command-line interface.

pub mod cli;
pub mod convert;
pub mod pipeline;
