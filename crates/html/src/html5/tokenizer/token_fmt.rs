//! Deterministic token formatting for golden tests and diagnostics.
//!
//! A stable, allocation-only formatting surface for token snapshots. It
//! intentionally preserves tokenizer attribute encounter order.

use crate::html5::shared::{Attribute, TokenRef, TokenSink};

/// Formatter for deterministic test strings.
pub struct TokenFmt;

impl TokenFmt {
    pub fn format(token: TokenRef<'_>) -> String {
        match token {
            TokenRef::Doctype(doctype) => {
                let name = doctype
                    .name
                    .as_deref()
                    .map_or_else(|| "null".to_string(), |s| s.to_string());
                let public_id = doctype
                    .public_id
                    .as_deref()
                    .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_text(s)));
                let system_id = doctype
                    .system_id
                    .as_deref()
                    .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_text(s)));
                format!(
                    "DOCTYPE name={name} public_id={public_id} system_id={system_id} force_quirks={}",
                    doctype.force_quirks
                )
            }
            TokenRef::StartTag(tag) => {
                let mut out = String::new();
                out.push_str("START name=");
                out.push_str(&tag.name);
                out.push_str(" attrs=[");
                for (i, attr) in tag.attributes.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&format_attr(attr));
                }
                out.push_str("] self_closing=");
                out.push_str(if tag.self_closing { "true" } else { "false" });
                out
            }
            TokenRef::EndTag(tag) => format!("END name={}", tag.name),
            TokenRef::Comment(comment) => {
                format!("COMMENT text=\"{}\"", escape_text(&comment.data))
            }
            TokenRef::Cdata(cdata) => format!("CDATA text=\"{}\"", escape_text(&cdata.data)),
            TokenRef::Character(text) => format!("CHAR text=\"{}\"", escape_text(&text.data)),
            TokenRef::EndOfFile(_) => "EOF".to_string(),
        }
    }
}

fn format_attr(attr: &Attribute) -> String {
    match &attr.value {
        None => attr.name.clone(),
        Some(value) => format!("{}=\"{}\"", attr.name, escape_text(value)),
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Sink that records the deterministic rendering of each token.
#[derive(Debug, Default)]
pub struct FmtSink {
    tokens: Vec<String>,
}

impl FmtSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl TokenSink for FmtSink {
    fn process_token(&mut self, token: TokenRef<'_>) {
        self.tokens.push(TokenFmt::format(token));
    }
}
