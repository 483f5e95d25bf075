//! Line items and the totals calculator.
//!
//! This crate turns an ordered list of line items (ordinary items, section
//! headers, auto-generated timesheet entries) into subtotal/tax/total
//! figures, implemented purely as deterministic domain logic (no IO).

pub mod line_item;
pub mod timesheet;
pub mod totals;

pub use line_item::{LineItem, LineItemKind};
pub use timesheet::{BillableDay, expand_with_timesheet_entries};
pub use totals::{DocumentTotals, compute_totals};
