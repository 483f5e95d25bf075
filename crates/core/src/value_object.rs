//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two `Money`
/// values holding the same amount are the same money, whereas two invoices
/// with the same line items are still distinct documents. To "modify" a
/// value object, construct a new one.
///
/// The bounds keep value objects cheap to copy, comparable by their
/// attributes, and debuggable in logs and tests.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
