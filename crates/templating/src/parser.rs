//! Tokenizer and recursive-descent parser for the template language.
//!
//! Malformed input is handled by policy, not by error: stray `{{else}}`
//! and closers are stripped, an unterminated block keeps its content as
//! plain nodes, and an unparseable condition becomes `None` (false).

use tracing::debug;

use crate::ast::{Cond, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Var(String),
    IfOpen(Option<Cond>),
    Else,
    IfClose,
    EachOpen(String),
    EachClose,
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        let Some(end) = rest[start + 2..].find("}}") else {
            // No closing braces ahead: the remainder is literal text.
            break;
        };
        if start > 0 {
            tokens.push(Token::Text(rest[..start].to_owned()));
        }
        let tag = rest[start + 2..start + 2 + end].trim();
        tokens.push(classify_tag(tag));
        rest = &rest[start + 2 + end + 2..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_owned()));
    }
    tokens
}

fn classify_tag(tag: &str) -> Token {
    if tag == "#if" || tag.starts_with("#if ") {
        return Token::IfOpen(parse_cond(tag[3..].trim()));
    }
    if tag == "#each" || tag.starts_with("#each ") {
        return Token::EachOpen(tag[5..].trim().to_owned());
    }
    match tag {
        "else" => Token::Else,
        "/if" => Token::IfClose,
        "/each" => Token::EachClose,
        _ => Token::Var(tag.to_owned()),
    }
}

/// Parse an `{{#if}}` condition: a bare name or `(eq name "literal")`.
fn parse_cond(raw: &str) -> Option<Cond> {
    if raw.is_empty() {
        return None;
    }
    if let Some(inner) = raw.strip_prefix('(') {
        let inner = inner.strip_suffix(')')?.trim();
        let rest = inner.strip_prefix("eq")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let (name, literal) = rest.trim_start().split_once(char::is_whitespace)?;
        let literal = literal.trim().strip_prefix('"')?.strip_suffix('"')?;
        if name.is_empty() {
            return None;
        }
        return Some(Cond::Eq(name.to_owned(), literal.to_owned()));
    }
    if raw.contains(char::is_whitespace) {
        return None;
    }
    Some(Cond::Name(raw.to_owned()))
}

/// Open blocks the parser is currently inside, innermost last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    IfThen,
    IfElse,
    Each,
}

/// How a nested parse ended.
enum Closed {
    /// `{{else}}` matching the innermost then-arm.
    Else,
    /// `{{/if}}` matching the innermost conditional.
    EndIf,
    /// `{{/each}}` matching the innermost iteration.
    EndEach,
    /// A closer belonging to an outer block; the token is left unconsumed
    /// and the current block counts as unterminated.
    Outer,
    Eof,
}

/// Parse a template source into a node tree. Never fails.
pub fn parse(source: &str) -> Vec<Node> {
    let tokens = tokenize(source);
    let mut pos = 0;
    let (nodes, _) = parse_nodes(&tokens, &mut pos, &mut Vec::new());
    nodes
}

fn parse_nodes(tokens: &[Token], pos: &mut usize, frames: &mut Vec<Frame>) -> (Vec<Node>, Closed) {
    let mut nodes = Vec::new();

    while *pos < tokens.len() {
        match &tokens[*pos] {
            Token::Text(s) => {
                nodes.push(Node::Text(s.clone()));
                *pos += 1;
            }
            Token::Var(name) => {
                nodes.push(Node::Var(name.clone()));
                *pos += 1;
            }
            Token::Else => {
                if frames.last() == Some(&Frame::IfThen) {
                    *pos += 1;
                    return (nodes, Closed::Else);
                }
                if frames.contains(&Frame::IfThen) {
                    return (nodes, Closed::Outer);
                }
                debug!("stray else tag stripped");
                *pos += 1;
            }
            Token::IfClose => {
                if matches!(frames.last(), Some(Frame::IfThen | Frame::IfElse)) {
                    *pos += 1;
                    return (nodes, Closed::EndIf);
                }
                if frames.iter().any(|f| matches!(f, Frame::IfThen | Frame::IfElse)) {
                    return (nodes, Closed::Outer);
                }
                debug!("stray conditional closer stripped");
                *pos += 1;
            }
            Token::EachClose => {
                if frames.last() == Some(&Frame::Each) {
                    *pos += 1;
                    return (nodes, Closed::EndEach);
                }
                if frames.contains(&Frame::Each) {
                    return (nodes, Closed::Outer);
                }
                debug!("stray iteration closer stripped");
                *pos += 1;
            }
            Token::IfOpen(cond) => {
                let cond = cond.clone();
                *pos += 1;

                frames.push(Frame::IfThen);
                let (then, closed) = parse_nodes(tokens, pos, frames);
                frames.pop();

                match closed {
                    Closed::Else => {
                        frames.push(Frame::IfElse);
                        let (otherwise, closed) = parse_nodes(tokens, pos, frames);
                        frames.pop();

                        if matches!(closed, Closed::EndIf) {
                            nodes.push(Node::If { cond, then, otherwise });
                        } else {
                            debug!("unterminated conditional block, content kept as plain nodes");
                            nodes.extend(then);
                            nodes.extend(otherwise);
                        }
                    }
                    Closed::EndIf => {
                        nodes.push(Node::If {
                            cond,
                            then,
                            otherwise: Vec::new(),
                        });
                    }
                    _ => {
                        debug!("unterminated conditional block, content kept as plain nodes");
                        nodes.extend(then);
                    }
                }
            }
            Token::EachOpen(name) => {
                let name = name.clone();
                *pos += 1;

                frames.push(Frame::Each);
                let (body, closed) = parse_nodes(tokens, pos, frames);
                frames.pop();

                if matches!(closed, Closed::EndEach) {
                    nodes.push(Node::Each { name, body });
                } else {
                    debug!("unterminated iteration block, content kept as plain nodes");
                    nodes.extend(body);
                }
            }
        }
    }

    (nodes, Closed::Eof)
}
