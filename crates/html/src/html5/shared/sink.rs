//! Token consumer boundary.

use super::token::TokenRef;

/// Accepts finished tokens.
///
/// The sink receives each token at most once, in source order. The borrow
/// ends with the call; in retention mode the tokenizer keeps ownership and
/// the token must be treated as read-only.
pub trait TokenSink {
    fn process_token(&mut self, token: TokenRef<'_>);
}

/// Sink that drops every token. Useful for error-only scans and benches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TokenSink for NullSink {
    fn process_token(&mut self, _token: TokenRef<'_>) {}
}
