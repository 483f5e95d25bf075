//! Restricted template language for billing documents.
//!
//! Four constructs: text, `{{name}}` interpolation, `{{#if}}` conditionals
//! and `{{#each}}` iteration. Rendering is a total function: unknown names
//! interpolate as empty strings and malformed blocks are stripped, never
//! surfaced as errors, so a document always renders.

pub mod ast;
pub mod context;
pub mod eval;
pub mod parser;
pub mod value;

pub use context::RenderContext;
pub use eval::render;
pub use value::Value;
