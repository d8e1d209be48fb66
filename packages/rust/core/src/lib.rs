//! Core pipeline orchestration for ldcontext.
//!
//! This crate ties together discovery, prefix collection, property
//! extraction and context assembly into one build (see [`pipeline`]).

pub mod assembler;
pub mod pipeline;

pub use assembler::{ContextDocument, KEY_ALIASES, assemble};
pub use pipeline::{
    BuildConfig, BuildOutput, BuildSummary, ContextBuilder, ProgressReporter, SilentProgress,
    build_context,
};
