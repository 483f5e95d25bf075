//! Evaluator: walks the node tree against a stack of scopes.
//!
//! Name lookup runs innermost scope first, so each-iteration fields shadow
//! outer document fields. Output is plain text; interpolated values are not
//! HTML-escaped (callers pre-sanitize).

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ast::{Cond, Node};
use crate::context::RenderContext;
use crate::parser;
use crate::value::Value;

type Scope = BTreeMap<String, Value>;

/// Render a template source against a context. Total: never errors, never
/// panics; unknown names interpolate as empty strings.
pub fn render(source: &str, ctx: &RenderContext) -> String {
    let nodes = parser::parse(source);
    let mut scopes = vec![ctx.values().clone()];
    let mut out = String::new();
    eval_nodes(&nodes, &mut scopes, &mut out);
    out
}

fn lookup<'a>(scopes: &'a [Scope], name: &str) -> Option<&'a Value> {
    scopes.iter().rev().find_map(|scope| scope.get(name))
}

fn eval_nodes(nodes: &[Node], scopes: &mut Vec<Scope>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => {
                if let Some(value) = lookup(scopes, name) {
                    out.push_str(&value.as_display_string());
                }
            }
            Node::If { cond, then, otherwise } => {
                let branch = if eval_cond(cond.as_ref(), scopes) {
                    then
                } else {
                    otherwise
                };
                eval_nodes(branch, scopes, out);
            }
            Node::Each { name, body } => {
                let Some(Value::List(items)) = lookup(scopes, name).cloned() else {
                    // Not a sequence (or unknown): the block renders nothing.
                    continue;
                };

                let mut index = 0u32;
                for item in items {
                    let mut scope = match item {
                        Value::Map(fields) => fields,
                        other => Scope::from([("this".to_owned(), other)]),
                    };
                    // Header rows never consume a row number.
                    let is_header =
                        matches!(scope.get("type"), Some(Value::Str(t)) if t == "HEADER");
                    if !is_header {
                        index += 1;
                        scope.insert("index".to_owned(), Value::Number(Decimal::from(index)));
                    }

                    scopes.push(scope);
                    eval_nodes(body, scopes, out);
                    scopes.pop();
                }
            }
        }
    }
}

fn eval_cond(cond: Option<&Cond>, scopes: &[Scope]) -> bool {
    match cond {
        None => false,
        Some(Cond::Name(name)) => lookup(scopes, name).is_some_and(Value::is_truthy),
        Some(Cond::Eq(name, literal)) => {
            let actual = lookup(scopes, name)
                .map(Value::as_display_string)
                .unwrap_or_default();
            actual == *literal
        }
    }
}
