use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use billcraft_core::{DomainError, DomainResult, Entity, Money};

/// Payment status lifecycle: `Draft → Paid`, `Paid → Draft`, or deletion.
///
/// Only `Paid` payments count toward an invoice's paid amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Draft,
    Paid,
}

/// A payment received against an invoice.
///
/// TDS is tax withheld by the payer before remittance; it is tracked for
/// compliance and never included in invoice totals. `tds_amount` is required
/// and positive exactly when `tax_deducted` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount_received: Money,
    pub status: PaymentStatus,
    pub tax_deducted: bool,
    pub tds_amount: Option<Money>,
    pub received_on: DateTime<Utc>,
}

impl Payment {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.amount_received <= Money::ZERO {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        match (self.tax_deducted, self.tds_amount) {
            (true, None) => Err(DomainError::validation(
                "TDS amount is required when tax is deducted",
            )),
            (true, Some(tds)) if tds <= Money::ZERO => Err(DomainError::validation(
                "TDS amount must be positive",
            )),
            (false, Some(_)) => Err(DomainError::validation(
                "TDS amount given without tax deduction",
            )),
            _ => Ok(()),
        }
    }
}

impl Entity for Payment {
    type Id = Uuid;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sum of received amounts over `Paid` payments.
///
/// This is the single source of truth for an invoice's paid amount: it is
/// always re-derived from the full ledger, never patched incrementally.
pub fn paid_total(payments: &[Payment]) -> Money {
    payments
        .iter()
        .filter(|p| p.is_paid())
        .fold(Money::ZERO, |acc, p| {
            Money::new(acc.amount() + p.amount_received.amount())
        })
}
