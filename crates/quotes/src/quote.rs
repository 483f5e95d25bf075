use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billcraft_billing::{DocumentTotals, LineItem, compute_totals, line_item::validate_items};
use billcraft_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use billcraft_events::Event;

/// Quote identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub AggregateId);

impl QuoteId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Quote status lifecycle.
///
/// `Draft → Sent → {Accepted, Rejected}` and `Sent → Invoiced`. The
/// transition set is closed; `Invoiced` is terminal and one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Invoiced,
}

/// Aggregate root: Quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    id: QuoteId,
    status: QuoteStatus,
    items: Vec<LineItem>,
    totals: DocumentTotals,
    /// Identifier of the invoice produced by conversion, set exactly once.
    invoice_id: Option<AggregateId>,
    version: u64,
    created: bool,
}

impl Quote {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: QuoteId) -> Self {
        Self {
            id,
            status: QuoteStatus::Draft,
            items: Vec::new(),
            totals: DocumentTotals::zero(),
            invoice_id: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> QuoteId {
        self.id
    }

    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> DocumentTotals {
        self.totals
    }

    pub fn invoice_id(&self) -> Option<AggregateId> {
        self.invoice_id
    }

    /// Items/terms may only change while the quote is a draft.
    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, QuoteStatus::Draft)
    }

    pub fn is_convertible(&self) -> bool {
        matches!(self.status, QuoteStatus::Sent)
    }
}

impl AggregateRoot for Quote {
    type Id = QuoteId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateQuote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQuote {
    pub quote_id: QuoteId,
    pub items: Vec<LineItem>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuoteItems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuoteItems {
    pub quote_id: QuoteId,
    pub items: Vec<LineItem>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SendQuote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendQuote {
    pub quote_id: QuoteId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AcceptQuote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptQuote {
    pub quote_id: QuoteId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RejectQuote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectQuote {
    pub quote_id: QuoteId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConvertQuote (produce an invoice from a sent quote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertQuote {
    pub quote_id: QuoteId,
    pub invoice_id: AggregateId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteCommand {
    CreateQuote(CreateQuote),
    UpdateQuoteItems(UpdateQuoteItems),
    SendQuote(SendQuote),
    AcceptQuote(AcceptQuote),
    RejectQuote(RejectQuote),
    ConvertQuote(ConvertQuote),
}

/// Event: QuoteCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCreated {
    pub quote_id: QuoteId,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuoteItemsUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteItemsUpdated {
    pub quote_id: QuoteId,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuoteSent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSent {
    pub quote_id: QuoteId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuoteAccepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteAccepted {
    pub quote_id: QuoteId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuoteRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRejected {
    pub quote_id: QuoteId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuoteInvoiced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInvoiced {
    pub quote_id: QuoteId,
    pub invoice_id: AggregateId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteEvent {
    QuoteCreated(QuoteCreated),
    QuoteItemsUpdated(QuoteItemsUpdated),
    QuoteSent(QuoteSent),
    QuoteAccepted(QuoteAccepted),
    QuoteRejected(QuoteRejected),
    QuoteInvoiced(QuoteInvoiced),
}

impl Event for QuoteEvent {
    fn event_type(&self) -> &'static str {
        match self {
            QuoteEvent::QuoteCreated(_) => "quotes.quote.created",
            QuoteEvent::QuoteItemsUpdated(_) => "quotes.quote.items_updated",
            QuoteEvent::QuoteSent(_) => "quotes.quote.sent",
            QuoteEvent::QuoteAccepted(_) => "quotes.quote.accepted",
            QuoteEvent::QuoteRejected(_) => "quotes.quote.rejected",
            QuoteEvent::QuoteInvoiced(_) => "quotes.quote.invoiced",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            QuoteEvent::QuoteCreated(e) => e.occurred_at,
            QuoteEvent::QuoteItemsUpdated(e) => e.occurred_at,
            QuoteEvent::QuoteSent(e) => e.occurred_at,
            QuoteEvent::QuoteAccepted(e) => e.occurred_at,
            QuoteEvent::QuoteRejected(e) => e.occurred_at,
            QuoteEvent::QuoteInvoiced(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Quote {
    type Command = QuoteCommand;
    type Event = QuoteEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            QuoteEvent::QuoteCreated(e) => {
                self.id = e.quote_id;
                self.status = QuoteStatus::Draft;
                self.items = e.items.clone();
                self.totals = e.totals;
                self.invoice_id = None;
                self.created = true;
            }
            QuoteEvent::QuoteItemsUpdated(e) => {
                self.items = e.items.clone();
                self.totals = e.totals;
            }
            QuoteEvent::QuoteSent(_) => {
                self.status = QuoteStatus::Sent;
            }
            QuoteEvent::QuoteAccepted(_) => {
                self.status = QuoteStatus::Accepted;
            }
            QuoteEvent::QuoteRejected(_) => {
                self.status = QuoteStatus::Rejected;
            }
            QuoteEvent::QuoteInvoiced(e) => {
                self.status = QuoteStatus::Invoiced;
                self.invoice_id = Some(e.invoice_id);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            QuoteCommand::CreateQuote(cmd) => self.handle_create(cmd),
            QuoteCommand::UpdateQuoteItems(cmd) => self.handle_update_items(cmd),
            QuoteCommand::SendQuote(cmd) => self.handle_send(cmd),
            QuoteCommand::AcceptQuote(cmd) => self.handle_accept(cmd),
            QuoteCommand::RejectQuote(cmd) => self.handle_reject(cmd),
            QuoteCommand::ConvertQuote(cmd) => self.handle_convert(cmd),
        }
    }
}

impl Quote {
    fn ensure_quote_id(&self, quote_id: QuoteId) -> Result<(), DomainError> {
        if self.id != quote_id {
            return Err(DomainError::invariant("quote_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateQuote) -> Result<Vec<QuoteEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("quote already exists"));
        }
        validate_items(&cmd.items)?;
        let totals = compute_totals(&cmd.items)?;

        Ok(vec![QuoteEvent::QuoteCreated(QuoteCreated {
            quote_id: cmd.quote_id,
            items: cmd.items.clone(),
            totals,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_items(
        &self,
        cmd: &UpdateQuoteItems,
    ) -> Result<Vec<QuoteEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_quote_id(cmd.quote_id)?;

        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot modify quote once it has been sent",
            ));
        }
        validate_items(&cmd.items)?;
        let totals = compute_totals(&cmd.items)?;

        Ok(vec![QuoteEvent::QuoteItemsUpdated(QuoteItemsUpdated {
            quote_id: cmd.quote_id,
            items: cmd.items.clone(),
            totals,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_send(&self, cmd: &SendQuote) -> Result<Vec<QuoteEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_quote_id(cmd.quote_id)?;

        if self.status != QuoteStatus::Draft {
            return Err(DomainError::invariant("only draft quotes can be sent"));
        }

        Ok(vec![QuoteEvent::QuoteSent(QuoteSent {
            quote_id: cmd.quote_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_accept(&self, cmd: &AcceptQuote) -> Result<Vec<QuoteEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_quote_id(cmd.quote_id)?;

        if self.status != QuoteStatus::Sent {
            return Err(DomainError::invariant("only sent quotes can be accepted"));
        }

        Ok(vec![QuoteEvent::QuoteAccepted(QuoteAccepted {
            quote_id: cmd.quote_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &RejectQuote) -> Result<Vec<QuoteEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_quote_id(cmd.quote_id)?;

        if self.status != QuoteStatus::Sent {
            return Err(DomainError::invariant("only sent quotes can be rejected"));
        }

        Ok(vec![QuoteEvent::QuoteRejected(QuoteRejected {
            quote_id: cmd.quote_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_convert(&self, cmd: &ConvertQuote) -> Result<Vec<QuoteEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_quote_id(cmd.quote_id)?;

        if !self.is_convertible() {
            return Err(DomainError::invariant(
                "only sent quotes can be converted to an invoice",
            ));
        }

        Ok(vec![QuoteEvent::QuoteInvoiced(QuoteInvoiced {
            quote_id: cmd.quote_id,
            invoice_id: cmd.invoice_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
