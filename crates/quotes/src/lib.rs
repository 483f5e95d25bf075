//! Quotes domain module (event-sourced).
//!
//! This crate contains business rules for quotes, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod quote;

pub use quote::{
    AcceptQuote, ConvertQuote, CreateQuote, Quote, QuoteAccepted, QuoteCommand, QuoteCreated,
    QuoteEvent, QuoteId, QuoteInvoiced, QuoteItemsUpdated, QuoteRejected, QuoteSent, QuoteStatus,
    RejectQuote, SendQuote, UpdateQuoteItems,
};
