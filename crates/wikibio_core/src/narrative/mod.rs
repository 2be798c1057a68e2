//! Biography narrative building blocks.
//!
//! Collection and rendering are split so the assembler can compute only the
//! sections a template asks for.

pub mod citations;
pub mod collector;
pub mod error;
pub mod markup;
pub mod options;
pub mod relations;
pub mod render;
