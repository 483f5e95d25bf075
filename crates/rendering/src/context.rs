//! RenderContext construction from documents.
//!
//! Names bound here are the contract with stored templates; renaming one is
//! a breaking change for every custom template in the wild.

use chrono::{DateTime, Utc};

use billcraft_billing::{DocumentTotals, LineItem, LineItemKind};
use billcraft_core::Money;
use billcraft_invoicing::{Invoice, InvoiceStatus};
use billcraft_quotes::{Quote, QuoteStatus};
use billcraft_templating::{RenderContext, Value};

use crate::organization::Organization;

fn quote_status_label(status: QuoteStatus) -> &'static str {
    match status {
        QuoteStatus::Draft => "draft",
        QuoteStatus::Sent => "sent",
        QuoteStatus::Accepted => "accepted",
        QuoteStatus::Rejected => "rejected",
        QuoteStatus::Invoiced => "invoiced",
    }
}

fn invoice_status_label(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Draft => "draft",
        InvoiceStatus::Sent => "sent",
        InvoiceStatus::Paid => "paid",
        InvoiceStatus::Overdue => "overdue",
    }
}

fn kind_label(kind: LineItemKind) -> &'static str {
    match kind {
        LineItemKind::Item => "ITEM",
        LineItemKind::Header => "HEADER",
        LineItemKind::TimesheetEntry => "TIMESHEET",
    }
}

fn item_value(item: &LineItem) -> Value {
    let mut fields = std::collections::BTreeMap::new();
    fields.insert("type".to_owned(), Value::from(kind_label(item.kind)));
    fields.insert("name".to_owned(), Value::from(item.name.clone()));
    fields.insert(
        "description".to_owned(),
        Value::from(item.description.clone().unwrap_or_default()),
    );
    fields.insert("quantity".to_owned(), Value::Number(item.quantity));
    fields.insert("rate".to_owned(), Value::from(item.unit_rate.to_string()));
    fields.insert(
        "amount".to_owned(),
        Value::from(item.amount().unwrap_or(Money::ZERO).to_string()),
    );
    fields.insert("tax_rate".to_owned(), Value::Number(item.tax_rate_percent));
    Value::Map(fields)
}

fn set_organization(ctx: &mut RenderContext, organization: &Organization) {
    ctx.set_str("organization_name", organization.name.clone())
        .set_str("organization_address", organization.address.clone())
        .set_str("organization_email", organization.email.clone())
        .set_str("organization_phone", organization.phone.clone())
        .set_str("currency_symbol", organization.currency_symbol.clone())
        .set_str("tax_label", organization.tax_label.clone());
}

fn set_totals(ctx: &mut RenderContext, totals: DocumentTotals) {
    ctx.set_str("subtotal", totals.subtotal.to_string())
        .set_str("tax_amount", totals.tax_amount.to_string())
        .set_str("total", totals.total.to_string());
}

/// Flat context for rendering a quote.
pub fn quote_context(quote: &Quote, organization: &Organization) -> RenderContext {
    let mut ctx = RenderContext::new();
    set_organization(&mut ctx, organization);
    ctx.set_str("document_number", quote.id_typed().to_string())
        .set_str("status", quote_status_label(quote.status()))
        .set_list("items", quote.items().iter().map(item_value).collect());
    set_totals(&mut ctx, quote.totals());
    ctx
}

/// Flat context for rendering an invoice; `now` fixes the effective status
/// and keeps rendering deterministic for a given instant.
pub fn invoice_context(
    invoice: &Invoice,
    organization: &Organization,
    now: DateTime<Utc>,
) -> RenderContext {
    let mut ctx = RenderContext::new();
    set_organization(&mut ctx, organization);
    ctx.set_str("document_number", invoice.id_typed().to_string())
        .set_str("status", invoice_status_label(invoice.status_as_of(now)))
        .set_list("items", invoice.items().iter().map(item_value).collect())
        .set_str("paid_amount", invoice.paid_amount().to_string())
        .set_str("balance_due", invoice.balance_due().to_string());
    if let Some(due) = invoice.due_date() {
        ctx.set_str("due_date", due.date_naive().format("%Y-%m-%d").to_string());
    }
    set_totals(&mut ctx, invoice.totals());
    ctx
}
