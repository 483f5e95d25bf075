//! Typed block tree produced by the parser.

/// Condition of an `{{#if}}` block: a bare name, or the built-in
/// `(eq name "literal")` predicate. `None` at the `If` node means the
/// condition failed to parse and evaluates false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cond {
    Name(String),
    Eq(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Var(String),
    If {
        cond: Option<Cond>,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Each {
        name: String,
        body: Vec<Node>,
    },
}
