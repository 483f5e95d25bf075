use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use billcraft_billing::{DocumentTotals, LineItem, compute_totals, line_item::validate_items};
use billcraft_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Money};
use billcraft_events::Event;
use billcraft_quotes::QuoteId;

use crate::payment::{Payment, PaymentStatus, paid_total};

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub AggregateId);

impl InvoiceId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice status lifecycle.
///
/// `Draft → Sent`; a sent invoice past its due date reads as `Overdue`
/// (`status_as_of`); full payment moves it to `Paid`, and reducing or
/// removing payments moves it back to `Sent`/`Overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

/// Aggregate root: Invoice.
///
/// Owns the payment ledger: `paid_amount` is never set by a caller, it is
/// recomputed from the full payment set on every payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    id: InvoiceId,
    status: InvoiceStatus,
    items: Vec<LineItem>,
    totals: DocumentTotals,
    due_date: Option<DateTime<Utc>>,
    paid_amount: Money,
    payments: Vec<Payment>,
    /// Back-link to the quote this invoice was converted from.
    quote_id: Option<QuoteId>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl Invoice {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: InvoiceId) -> Self {
        Self {
            id,
            status: InvoiceStatus::Draft,
            items: Vec::new(),
            totals: DocumentTotals::zero(),
            due_date: None,
            paid_amount: Money::ZERO,
            payments: Vec::new(),
            quote_id: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Effective status at `now`: a sent invoice past its due date is
    /// overdue, unconditionally. Full payment wins over the due date.
    pub fn status_as_of(&self, now: DateTime<Utc>) -> InvoiceStatus {
        match (self.status, self.due_date) {
            (InvoiceStatus::Sent, Some(due)) if due < now => InvoiceStatus::Overdue,
            (status, _) => status,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> DocumentTotals {
        self.totals
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    pub fn balance_due(&self) -> Money {
        self.totals
            .total
            .checked_sub(self.paid_amount)
            .unwrap_or(Money::ZERO)
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn quote_id(&self) -> Option<QuoteId> {
        self.quote_id
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Items may only change while the invoice is a draft.
    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, InvoiceStatus::Draft)
    }

    /// Payments are accepted only against sent or overdue invoices.
    pub fn accepts_payment_at(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status_as_of(now),
            InvoiceStatus::Sent | InvoiceStatus::Overdue
        )
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub invoice_id: InvoiceId,
    pub items: Vec<LineItem>,
    pub due_date: DateTime<Utc>,
    pub quote_id: Option<QuoteId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateInvoiceItems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInvoiceItems {
    pub invoice_id: InvoiceId,
    pub items: Vec<LineItem>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SendInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendInvoice {
    pub invoice_id: InvoiceId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteInvoice {
    pub invoice_id: InvoiceId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordPayment (apply a received payment to the invoice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub invoice_id: InvoiceId,
    pub payment_id: Uuid,
    pub amount_received: Money,
    /// Persist the payment as `Paid` immediately instead of `Draft`.
    pub mark_paid: bool,
    pub tax_deducted: bool,
    pub tds_amount: Option<Money>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetPaymentStatus (`Draft → Paid` or `Paid → Draft`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPaymentStatus {
    pub invoice_id: InvoiceId,
    pub payment_id: Uuid,
    pub status: PaymentStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemovePayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePayment {
    pub invoice_id: InvoiceId,
    pub payment_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceCommand {
    CreateInvoice(CreateInvoice),
    UpdateInvoiceItems(UpdateInvoiceItems),
    SendInvoice(SendInvoice),
    DeleteInvoice(DeleteInvoice),
    RecordPayment(RecordPayment),
    SetPaymentStatus(SetPaymentStatus),
    RemovePayment(RemovePayment),
}

/// Event: InvoiceCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCreated {
    pub invoice_id: InvoiceId,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
    pub due_date: DateTime<Utc>,
    pub quote_id: Option<QuoteId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceItemsUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemsUpdated {
    pub invoice_id: InvoiceId,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceSent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSent {
    pub invoice_id: InvoiceId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoiceDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDeleted {
    pub invoice_id: InvoiceId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub invoice_id: InvoiceId,
    pub payment: Payment,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusChanged {
    pub invoice_id: InvoiceId,
    pub payment_id: Uuid,
    pub status: PaymentStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRemoved {
    pub invoice_id: InvoiceId,
    pub payment_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceEvent {
    InvoiceCreated(InvoiceCreated),
    InvoiceItemsUpdated(InvoiceItemsUpdated),
    InvoiceSent(InvoiceSent),
    InvoiceDeleted(InvoiceDeleted),
    PaymentRecorded(PaymentRecorded),
    PaymentStatusChanged(PaymentStatusChanged),
    PaymentRemoved(PaymentRemoved),
}

impl Event for InvoiceEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InvoiceEvent::InvoiceCreated(_) => "invoicing.invoice.created",
            InvoiceEvent::InvoiceItemsUpdated(_) => "invoicing.invoice.items_updated",
            InvoiceEvent::InvoiceSent(_) => "invoicing.invoice.sent",
            InvoiceEvent::InvoiceDeleted(_) => "invoicing.invoice.deleted",
            InvoiceEvent::PaymentRecorded(_) => "invoicing.payment.recorded",
            InvoiceEvent::PaymentStatusChanged(_) => "invoicing.payment.status_changed",
            InvoiceEvent::PaymentRemoved(_) => "invoicing.payment.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InvoiceEvent::InvoiceCreated(e) => e.occurred_at,
            InvoiceEvent::InvoiceItemsUpdated(e) => e.occurred_at,
            InvoiceEvent::InvoiceSent(e) => e.occurred_at,
            InvoiceEvent::InvoiceDeleted(e) => e.occurred_at,
            InvoiceEvent::PaymentRecorded(e) => e.occurred_at,
            InvoiceEvent::PaymentStatusChanged(e) => e.occurred_at,
            InvoiceEvent::PaymentRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Invoice {
    type Command = InvoiceCommand;
    type Event = InvoiceEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InvoiceEvent::InvoiceCreated(e) => {
                self.id = e.invoice_id;
                self.status = InvoiceStatus::Draft;
                self.items = e.items.clone();
                self.totals = e.totals;
                self.due_date = Some(e.due_date);
                self.paid_amount = Money::ZERO;
                self.payments.clear();
                self.quote_id = e.quote_id;
                self.created = true;
            }
            InvoiceEvent::InvoiceItemsUpdated(e) => {
                self.items = e.items.clone();
                self.totals = e.totals;
            }
            InvoiceEvent::InvoiceSent(_) => {
                self.status = InvoiceStatus::Sent;
            }
            InvoiceEvent::InvoiceDeleted(_) => {
                self.deleted = true;
            }
            InvoiceEvent::PaymentRecorded(e) => {
                self.payments.push(e.payment.clone());
                self.recompute_ledger(e.occurred_at);
            }
            InvoiceEvent::PaymentStatusChanged(e) => {
                if let Some(p) = self.payments.iter_mut().find(|p| p.id == e.payment_id) {
                    p.status = e.status;
                }
                self.recompute_ledger(e.occurred_at);
            }
            InvoiceEvent::PaymentRemoved(e) => {
                self.payments.retain(|p| p.id != e.payment_id);
                self.recompute_ledger(e.occurred_at);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvoiceCommand::CreateInvoice(cmd) => self.handle_create(cmd),
            InvoiceCommand::UpdateInvoiceItems(cmd) => self.handle_update_items(cmd),
            InvoiceCommand::SendInvoice(cmd) => self.handle_send(cmd),
            InvoiceCommand::DeleteInvoice(cmd) => self.handle_delete(cmd),
            InvoiceCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
            InvoiceCommand::SetPaymentStatus(cmd) => self.handle_set_payment_status(cmd),
            InvoiceCommand::RemovePayment(cmd) => self.handle_remove_payment(cmd),
        }
    }
}

impl Invoice {
    /// Re-derive `paid_amount` and status from the full payment ledger.
    ///
    /// Never patches incrementally: partial updates drift, the full sum
    /// cannot.
    fn recompute_ledger(&mut self, now: DateTime<Utc>) {
        self.paid_amount = paid_total(&self.payments);
        debug!(
            invoice_id = %self.id,
            paid = %self.paid_amount,
            total = %self.totals.total,
            "recomputed payment ledger"
        );

        if self.status == InvoiceStatus::Draft {
            return;
        }
        self.status = if self.paid_amount >= self.totals.total {
            InvoiceStatus::Paid
        } else if self.due_date.is_some_and(|due| due < now) {
            InvoiceStatus::Overdue
        } else {
            InvoiceStatus::Sent
        };
    }

    fn ensure_exists(&self) -> Result<(), DomainError> {
        if !self.created || self.deleted {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn ensure_invoice_id(&self, invoice_id: InvoiceId) -> Result<(), DomainError> {
        if self.id != invoice_id {
            return Err(DomainError::invariant("invoice_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateInvoice) -> Result<Vec<InvoiceEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("invoice already exists"));
        }
        validate_items(&cmd.items)?;
        let totals = compute_totals(&cmd.items)?;

        Ok(vec![InvoiceEvent::InvoiceCreated(InvoiceCreated {
            invoice_id: cmd.invoice_id,
            items: cmd.items.clone(),
            totals,
            due_date: cmd.due_date,
            quote_id: cmd.quote_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_items(
        &self,
        cmd: &UpdateInvoiceItems,
    ) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_invoice_id(cmd.invoice_id)?;

        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot modify invoice once it has been sent",
            ));
        }
        validate_items(&cmd.items)?;
        let totals = compute_totals(&cmd.items)?;

        Ok(vec![InvoiceEvent::InvoiceItemsUpdated(InvoiceItemsUpdated {
            invoice_id: cmd.invoice_id,
            items: cmd.items.clone(),
            totals,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_send(&self, cmd: &SendInvoice) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_invoice_id(cmd.invoice_id)?;

        if self.status != InvoiceStatus::Draft {
            return Err(DomainError::invariant("only draft invoices can be sent"));
        }

        Ok(vec![InvoiceEvent::InvoiceSent(InvoiceSent {
            invoice_id: cmd.invoice_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteInvoice) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_invoice_id(cmd.invoice_id)?;

        if self.status != InvoiceStatus::Draft {
            return Err(DomainError::invariant("only draft invoices can be deleted"));
        }

        Ok(vec![InvoiceEvent::InvoiceDeleted(InvoiceDeleted {
            invoice_id: cmd.invoice_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_payment(
        &self,
        cmd: &RecordPayment,
    ) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_invoice_id(cmd.invoice_id)?;

        if !self.accepts_payment_at(cmd.occurred_at) {
            return Err(DomainError::invariant(
                "payments can only be applied to sent or overdue invoices",
            ));
        }
        if self.payments.iter().any(|p| p.id == cmd.payment_id) {
            return Err(DomainError::conflict("payment already recorded"));
        }

        let payment = Payment {
            id: cmd.payment_id,
            amount_received: cmd.amount_received,
            status: if cmd.mark_paid {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Draft
            },
            tax_deducted: cmd.tax_deducted,
            tds_amount: cmd.tds_amount,
            received_on: cmd.occurred_at,
        };
        payment.validate()?;

        if cmd.amount_received > self.balance_due() {
            return Err(DomainError::validation("payment exceeds balance due"));
        }

        Ok(vec![InvoiceEvent::PaymentRecorded(PaymentRecorded {
            invoice_id: cmd.invoice_id,
            payment,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_payment_status(
        &self,
        cmd: &SetPaymentStatus,
    ) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_invoice_id(cmd.invoice_id)?;

        let payment = self
            .payments
            .iter()
            .find(|p| p.id == cmd.payment_id)
            .ok_or_else(DomainError::not_found)?;

        if payment.status == cmd.status {
            return Err(DomainError::conflict("payment already has that status"));
        }

        // A stale draft payment may no longer fit: marking it paid must not
        // push the paid amount past the total.
        if cmd.status == PaymentStatus::Paid && payment.amount_received > self.balance_due() {
            return Err(DomainError::validation("payment exceeds balance due"));
        }

        Ok(vec![InvoiceEvent::PaymentStatusChanged(PaymentStatusChanged {
            invoice_id: cmd.invoice_id,
            payment_id: cmd.payment_id,
            status: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_payment(
        &self,
        cmd: &RemovePayment,
    ) -> Result<Vec<InvoiceEvent>, DomainError> {
        self.ensure_exists()?;
        self.ensure_invoice_id(cmd.invoice_id)?;

        if !self.payments.iter().any(|p| p.id == cmd.payment_id) {
            return Err(DomainError::not_found());
        }

        Ok(vec![InvoiceEvent::PaymentRemoved(PaymentRemoved {
            invoice_id: cmd.invoice_id,
            payment_id: cmd.payment_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_invoice_id() -> InvoiceId {
        InvoiceId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn single_item() -> LineItem {
        LineItem::item(
            "Design work",
            "2".parse().unwrap(),
            Money::from_major(100),
            "10".parse().unwrap(),
        )
    }

    fn created_invoice(invoice_id: InvoiceId, due_date: DateTime<Utc>) -> Invoice {
        let mut invoice = Invoice::empty(invoice_id);
        let cmd = CreateInvoice {
            invoice_id,
            items: vec![single_item()],
            due_date,
            quote_id: None,
            occurred_at: test_time(),
        };
        let events = invoice.handle(&InvoiceCommand::CreateInvoice(cmd)).unwrap();
        invoice.apply(&events[0]);
        invoice
    }

    fn sent_invoice(invoice_id: InvoiceId, due_date: DateTime<Utc>) -> Invoice {
        let mut invoice = created_invoice(invoice_id, due_date);
        let events = invoice
            .handle(&InvoiceCommand::SendInvoice(SendInvoice {
                invoice_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        invoice.apply(&events[0]);
        invoice
    }

    fn record(
        invoice: &mut Invoice,
        amount: i64,
        mark_paid: bool,
        at: DateTime<Utc>,
    ) -> Uuid {
        let payment_id = Uuid::now_v7();
        let events = invoice
            .handle(&InvoiceCommand::RecordPayment(RecordPayment {
                invoice_id: invoice.id_typed(),
                payment_id,
                amount_received: Money::from_major(amount),
                mark_paid,
                tax_deducted: false,
                tds_amount: None,
                occurred_at: at,
            }))
            .unwrap();
        invoice.apply(&events[0]);
        payment_id
    }

    #[test]
    fn create_computes_totals_and_starts_draft() {
        let invoice = created_invoice(test_invoice_id(), test_time() + Duration::days(30));
        assert_eq!(invoice.status(), InvoiceStatus::Draft);
        assert_eq!(invoice.totals().total, Money::from_major(220));
        assert_eq!(invoice.paid_amount(), Money::ZERO);
    }

    #[test]
    fn cannot_record_payment_on_draft_invoice() {
        let invoice = created_invoice(test_invoice_id(), test_time() + Duration::days(30));
        let err = invoice
            .handle(&InvoiceCommand::RecordPayment(RecordPayment {
                invoice_id: invoice.id_typed(),
                payment_id: Uuid::now_v7(),
                amount_received: Money::from_major(100),
                mark_paid: true,
                tax_deducted: false,
                tds_amount: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn full_payment_marks_invoice_paid() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

        record(&mut invoice, 220, true, test_time());
        assert_eq!(invoice.paid_amount(), Money::from_major(220));
        assert_eq!(invoice.status(), InvoiceStatus::Paid);
    }

    #[test]
    fn overpayment_is_rejected_with_no_state_change() {
        let invoice_id = test_invoice_id();
        let invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));
        let before = invoice.clone();

        let err = invoice
            .handle(&InvoiceCommand::RecordPayment(RecordPayment {
                invoice_id,
                payment_id: Uuid::now_v7(),
                amount_received: Money::from_major(300),
                mark_paid: true,
                tax_deducted: false,
                tds_amount: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(invoice, before);
    }

    #[test]
    fn partial_payment_on_past_due_invoice_reads_overdue() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() - Duration::days(1));

        record(&mut invoice, 100, true, test_time());
        assert_eq!(invoice.paid_amount(), Money::from_major(100));
        assert_eq!(invoice.status(), InvoiceStatus::Overdue);
    }

    #[test]
    fn sent_invoice_past_due_reads_overdue_without_any_write() {
        let invoice = sent_invoice(test_invoice_id(), test_time() - Duration::days(1));
        assert_eq!(invoice.status(), InvoiceStatus::Sent);
        assert_eq!(invoice.status_as_of(test_time()), InvoiceStatus::Overdue);
    }

    #[test]
    fn full_payment_wins_over_due_date() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() - Duration::days(1));

        record(&mut invoice, 220, true, test_time());
        assert_eq!(invoice.status(), InvoiceStatus::Paid);
        assert_eq!(invoice.status_as_of(test_time()), InvoiceStatus::Paid);
    }

    #[test]
    fn draft_payments_do_not_count_until_marked_paid() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

        let payment_id = record(&mut invoice, 220, false, test_time());
        assert_eq!(invoice.paid_amount(), Money::ZERO);
        assert_eq!(invoice.status(), InvoiceStatus::Sent);

        let events = invoice
            .handle(&InvoiceCommand::SetPaymentStatus(SetPaymentStatus {
                invoice_id,
                payment_id,
                status: PaymentStatus::Paid,
                occurred_at: test_time(),
            }))
            .unwrap();
        invoice.apply(&events[0]);
        assert_eq!(invoice.paid_amount(), Money::from_major(220));
        assert_eq!(invoice.status(), InvoiceStatus::Paid);
    }

    #[test]
    fn marking_a_stale_draft_payment_paid_cannot_overpay() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

        // Draft payment for the full amount, then a paid partial payment.
        let draft_id = record(&mut invoice, 220, false, test_time());
        record(&mut invoice, 100, true, test_time());

        let err = invoice
            .handle(&InvoiceCommand::SetPaymentStatus(SetPaymentStatus {
                invoice_id,
                payment_id: draft_id,
                status: PaymentStatus::Paid,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(invoice.paid_amount(), Money::from_major(100));
    }

    #[test]
    fn removing_a_payment_reopens_the_invoice() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

        let payment_id = record(&mut invoice, 220, true, test_time());
        assert_eq!(invoice.status(), InvoiceStatus::Paid);

        let events = invoice
            .handle(&InvoiceCommand::RemovePayment(RemovePayment {
                invoice_id,
                payment_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        invoice.apply(&events[0]);
        assert_eq!(invoice.paid_amount(), Money::ZERO);
        assert_eq!(invoice.status(), InvoiceStatus::Sent);
        assert!(invoice.payments().is_empty());
    }

    #[test]
    fn reverting_a_payment_on_a_past_due_invoice_reads_overdue() {
        let invoice_id = test_invoice_id();
        let mut invoice = sent_invoice(invoice_id, test_time() - Duration::days(1));

        let payment_id = record(&mut invoice, 220, true, test_time());
        assert_eq!(invoice.status(), InvoiceStatus::Paid);

        let events = invoice
            .handle(&InvoiceCommand::SetPaymentStatus(SetPaymentStatus {
                invoice_id,
                payment_id,
                status: PaymentStatus::Draft,
                occurred_at: test_time(),
            }))
            .unwrap();
        invoice.apply(&events[0]);
        assert_eq!(invoice.status(), InvoiceStatus::Overdue);
    }

    #[test]
    fn payment_with_tds_requires_amount() {
        let invoice_id = test_invoice_id();
        let invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

        let err = invoice
            .handle(&InvoiceCommand::RecordPayment(RecordPayment {
                invoice_id,
                payment_id: Uuid::now_v7(),
                amount_received: Money::from_major(100),
                mark_paid: true,
                tax_deducted: true,
                tds_amount: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn cannot_modify_or_delete_sent_invoice() {
        let invoice_id = test_invoice_id();
        let invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

        let err = invoice
            .handle(&InvoiceCommand::UpdateInvoiceItems(UpdateInvoiceItems {
                invoice_id,
                items: vec![single_item()],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let err = invoice
            .handle(&InvoiceCommand::DeleteInvoice(DeleteInvoice {
                invoice_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn draft_invoice_can_be_deleted() {
        let invoice_id = test_invoice_id();
        let mut invoice = created_invoice(invoice_id, test_time() + Duration::days(30));

        let events = invoice
            .handle(&InvoiceCommand::DeleteInvoice(DeleteInvoice {
                invoice_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        invoice.apply(&events[0]);
        assert!(invoice.is_deleted());

        let err = invoice
            .handle(&InvoiceCommand::SendInvoice(SendInvoice {
                invoice_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum LedgerOp {
            Record { amount: i64, mark_paid: bool },
            Toggle { index: usize, to_paid: bool },
            Remove { index: usize },
        }

        fn arb_op() -> impl Strategy<Value = LedgerOp> {
            prop_oneof![
                (1i64..=220, any::<bool>())
                    .prop_map(|(amount, mark_paid)| LedgerOp::Record { amount, mark_paid }),
                (0usize..8, any::<bool>())
                    .prop_map(|(index, to_paid)| LedgerOp::Toggle { index, to_paid }),
                (0usize..8).prop_map(|index| LedgerOp::Remove { index }),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: after any op sequence, paid_amount equals the sum
            /// over Paid payments and never leaves [0, total].
            #[test]
            fn ledger_always_sums_paid_payments(ops in proptest::collection::vec(arb_op(), 0..24)) {
                let invoice_id = test_invoice_id();
                let mut invoice = sent_invoice(invoice_id, test_time() + Duration::days(30));

                for op in ops {
                    let command = match op {
                        LedgerOp::Record { amount, mark_paid } => {
                            InvoiceCommand::RecordPayment(RecordPayment {
                                invoice_id,
                                payment_id: Uuid::now_v7(),
                                amount_received: Money::from_major(amount),
                                mark_paid,
                                tax_deducted: false,
                                tds_amount: None,
                                occurred_at: test_time(),
                            })
                        }
                        LedgerOp::Toggle { index, to_paid } => {
                            let Some(payment) = invoice.payments().get(index) else {
                                continue;
                            };
                            InvoiceCommand::SetPaymentStatus(SetPaymentStatus {
                                invoice_id,
                                payment_id: payment.id,
                                status: if to_paid {
                                    PaymentStatus::Paid
                                } else {
                                    PaymentStatus::Draft
                                },
                                occurred_at: test_time(),
                            })
                        }
                        LedgerOp::Remove { index } => {
                            let Some(payment) = invoice.payments().get(index) else {
                                continue;
                            };
                            InvoiceCommand::RemovePayment(RemovePayment {
                                invoice_id,
                                payment_id: payment.id,
                                occurred_at: test_time(),
                            })
                        }
                    };

                    // Rejected commands must leave no trace; accepted ones apply.
                    let before = invoice.clone();
                    match invoice.handle(&command) {
                        Ok(events) => {
                            for event in &events {
                                invoice.apply(event);
                            }
                        }
                        Err(_) => prop_assert_eq!(&invoice, &before),
                    }

                    let expected = invoice
                        .payments()
                        .iter()
                        .filter(|p| p.is_paid())
                        .fold(Money::ZERO, |acc, p| {
                            Money::new(acc.amount() + p.amount_received.amount())
                        });
                    prop_assert_eq!(invoice.paid_amount(), expected);
                    prop_assert!(invoice.paid_amount() >= Money::ZERO);
                    prop_assert!(invoice.paid_amount() <= invoice.totals().total);

                    if invoice.paid_amount() >= invoice.totals().total {
                        prop_assert_eq!(invoice.status(), InvoiceStatus::Paid);
                    }
                }
            }
        }
    }
}
