use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use billcraft_core::{DomainError, DomainResult, Money, ValueObject};

/// Kind of a quote/invoice row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// Ordinary billable row.
    Item,
    /// Non-billable separator row used to group items visually.
    Header,
    /// Auto-generated row representing billable hours from time tracking.
    TimesheetEntry,
}

/// One row of a quote/invoice.
///
/// Invariant: a `Header` row never contributes to totals; for any other row
/// the derived amount is `quantity × unit_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineItemKind,
    pub name: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_rate: Money,
    pub tax_rate_percent: Decimal,
    /// Work date of a timesheet entry (one entry per work day).
    pub work_date: Option<NaiveDate>,
}

impl LineItem {
    pub fn item(name: impl Into<String>, quantity: Decimal, unit_rate: Money, tax_rate_percent: Decimal) -> Self {
        Self {
            kind: LineItemKind::Item,
            name: name.into(),
            description: None,
            quantity,
            unit_rate,
            tax_rate_percent,
            work_date: None,
        }
    }

    /// A separator row; numeric fields are forced to zero.
    pub fn header(name: impl Into<String>) -> Self {
        Self {
            kind: LineItemKind::Header,
            name: name.into(),
            description: None,
            quantity: Decimal::ZERO,
            unit_rate: Money::ZERO,
            tax_rate_percent: Decimal::ZERO,
            work_date: None,
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == LineItemKind::Header
    }

    /// Row amount at full precision (`quantity × unit_rate`), zero for headers.
    pub fn raw_amount(&self) -> DomainResult<Money> {
        if self.is_header() {
            return Ok(Money::ZERO);
        }
        self.unit_rate.mul_decimal(self.quantity)
    }

    /// The derived `amount` field: row amount rounded to currency precision.
    pub fn amount(&self) -> DomainResult<Money> {
        Ok(self.raw_amount()?.rounded())
    }

    /// Boundary validation. Calculation itself assumes validated rows.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("line item name must not be empty"));
        }
        if self.is_header() {
            if !self.quantity.is_zero() || !self.unit_rate.is_zero() || !self.tax_rate_percent.is_zero() {
                return Err(DomainError::validation(
                    "header rows must have zero quantity, rate and tax",
                ));
            }
            return Ok(());
        }
        if self.quantity.is_sign_negative() {
            return Err(DomainError::validation("quantity must not be negative"));
        }
        if self.unit_rate.is_negative() {
            return Err(DomainError::validation("unit rate must not be negative"));
        }
        if self.tax_rate_percent.is_sign_negative() {
            return Err(DomainError::validation("tax rate must not be negative"));
        }
        Ok(())
    }
}

impl ValueObject for LineItem {}

/// Validate an entire item list at the document boundary.
///
/// Documents are never created or updated with an empty item list; the
/// calculator itself treats an empty list as all-zero totals.
pub fn validate_items(items: &[LineItem]) -> DomainResult<()> {
    if items.is_empty() {
        return Err(DomainError::validation("document must have at least one line item"));
    }
    for item in items {
        item.validate()?;
    }
    Ok(())
}
