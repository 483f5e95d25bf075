//! Bridges billing documents to the template engine.
//!
//! Builds the flat `RenderContext` for a quote or invoice and ships the
//! default HTML templates used when no custom template is stored.

pub mod context;
pub mod organization;
pub mod templates;

pub use context::{invoice_context, quote_context};
pub use organization::Organization;
pub use templates::{DEFAULT_INVOICE_TEMPLATE, DEFAULT_QUOTE_TEMPLATE};
