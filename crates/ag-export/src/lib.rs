//! Artifact persistence: text files, chunk animations, the recombination
//! script and the out-of-process compose step.

pub mod compose;
pub mod gif;
pub mod script;
pub mod text;
