//! Domain events shared by the document aggregates.

pub mod event;

pub use event::Event;
