use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use billcraft_core::Money;

use crate::line_item::{LineItem, LineItemKind};

/// Billable hours for one work day, as supplied by the time-entry
/// collaborator for a project/date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillableDay {
    pub date: NaiveDate,
    pub hours: Decimal,
}

/// Append timesheet rows for unbilled hours to an item list.
///
/// Appends one `Header` row labelled as the time section, followed by one
/// `TimesheetEntry` per work day (`quantity = hours`, `unit_rate =
/// hourly_rate`, tax 0).
///
/// Idempotent: if `base` already contains any timesheet entry the list is
/// returned unchanged, so a retried conversion never bills hours twice.
pub fn expand_with_timesheet_entries(
    base: &[LineItem],
    billable: &[BillableDay],
    hourly_rate: Money,
) -> Vec<LineItem> {
    if base.iter().any(|i| i.kind == LineItemKind::TimesheetEntry) {
        return base.to_vec();
    }
    if billable.is_empty() {
        return base.to_vec();
    }

    let mut days = billable.to_vec();
    days.sort_by_key(|d| d.date);

    let mut items = base.to_vec();
    items.push(LineItem::header("Timesheet"));
    for day in days {
        items.push(LineItem {
            kind: LineItemKind::TimesheetEntry,
            name: format!("Hours worked on {}", day.date.format("%Y-%m-%d")),
            description: None,
            quantity: day.hours,
            unit_rate: hourly_rate,
            tax_rate_percent: Decimal::ZERO,
            work_date: Some(day.date),
        });
    }
    items
}
