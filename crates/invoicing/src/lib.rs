//! Invoicing domain module (event-sourced).
//!
//! This crate contains business rules for invoices and their payment ledger,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod invoice;
pub mod payment;

pub use invoice::{
    CreateInvoice, DeleteInvoice, Invoice, InvoiceCommand, InvoiceCreated, InvoiceDeleted,
    InvoiceEvent, InvoiceId, InvoiceItemsUpdated, InvoiceSent, InvoiceStatus, PaymentRecorded,
    PaymentRemoved, PaymentStatusChanged, RecordPayment, RemovePayment, SendInvoice,
    SetPaymentStatus, UpdateInvoiceItems,
};
pub use payment::{Payment, PaymentStatus};
