//! Note conversion: running the external converter, rewriting `id:` links,
//! and writing the output tree.

pub mod converter;
pub mod links;
pub mod pipeline;

pub use converter::{ConversionError, ConvertOptions, Converter, PandocConverter, WrapMode};
pub use links::{LinkTarget, Rewritten, rewrite_links};
pub use pipeline::{
    ConversionPipeline, ConvertReport, ConvertStats, ConvertedNote, NoteError, NoteFailure,
};
