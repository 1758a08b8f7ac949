//! HTML5 tokenizer public API.
//!
//! The tokenizer is an explicit state machine over a bounded character
//! sequence: one character is consumed per step and dispatched to the
//! handler for the current state. Handlers may transition, emit tokens and
//! errors, or reconsume (rewind the cursor exactly one position so the same
//! character is re-evaluated under a new state).
//!
//! Invariants:
//! - `tokenize()` runs to completion; recoverable errors are recorded and
//!   never abort the scan.
//! - Tokens reach the sink at most once each, in source order.
//! - Every token is allocated from the injected `TokenPools` and released
//!   back after the sink call, unless retention mode keeps it.
//! - CR, LF, and CRLF each advance the line counter exactly once.

use crate::html5::shared::{
    Attribute, ParseError, ParseErrorCode, TokenHandle, TokenPools, TokenRef, TokenSink,
};
use states::TokenizerState;

mod charref;
mod emit;
mod markup;
mod states;
mod tag;
mod token_fmt;

pub use token_fmt::{FmtSink, TokenFmt};

/// Configuration for the tokenizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenizerConfig {
    /// Retain emitted tokens for post-run inspection instead of releasing
    /// them back to their pools (diagnostic/testing mode).
    pub keep_tokens: bool,
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
}

/// HTML5 tokenizer bound to one input and one pool set.
pub struct Tokenizer<'i> {
    input: &'i str,
    cursor: usize,
    // Line/column bookkeeping. `counted_upto` is a watermark so reconsumed
    // characters are not double-counted.
    counted_upto: usize,
    line: usize,
    column: usize,
    last_counted_was_cr: bool,
    current_pos: usize,
    current_line: usize,
    current_column: usize,
    state: TokenizerState,
    return_states: Vec<TokenizerState>,
    // Scratch for the token under construction. `data_buf` holds the
    // principal text (tag name, comment, DOCTYPE name, CDATA); the two
    // auxiliary slots hold attribute name/value or DOCTYPE public/system
    // identifiers, with set-flags distinguishing absent from empty.
    data_buf: String,
    aux_buf: String,
    aux_set: bool,
    value_buf: String,
    value_set: bool,
    attributes: Vec<Attribute>,
    attr_in_progress: bool,
    current_tag_is_end: bool,
    self_closing: bool,
    doctype_name_set: bool,
    force_quirks: bool,
    // Character-reference scratch.
    charref_buf: String,
    charref_code: u32,
    charref_candidate: Option<&'static crate::entities::CharacterReference>,
    errors: Vec<ParseError>,
    pools: TokenPools,
    pending: Vec<TokenHandle>,
    config: TokenizerConfig,
    stats: TokenizerStats,
    done: bool,
}

impl<'i> Tokenizer<'i> {
    pub fn new(input: &'i str, pools: TokenPools, config: TokenizerConfig) -> Self {
        Self {
            input,
            cursor: 0,
            counted_upto: 0,
            line: 1,
            column: 0,
            last_counted_was_cr: false,
            current_pos: 0,
            current_line: 1,
            current_column: 0,
            state: TokenizerState::Data,
            return_states: Vec::new(),
            data_buf: String::new(),
            aux_buf: String::new(),
            aux_set: false,
            value_buf: String::new(),
            value_set: false,
            attributes: Vec::new(),
            attr_in_progress: false,
            current_tag_is_end: false,
            self_closing: false,
            doctype_name_set: false,
            force_quirks: false,
            charref_buf: String::new(),
            charref_code: 0,
            charref_candidate: None,
            errors: Vec::new(),
            pools,
            pending: Vec::new(),
            config,
            stats: TokenizerStats::default(),
            done: false,
        }
    }

    /// Run the state machine over the whole input.
    ///
    /// Returns `false` only for empty input (nothing is produced, not even
    /// an end-of-file token); otherwise always completes and returns `true`.
    pub fn tokenize(&mut self, sink: &mut dyn TokenSink) -> bool {
        assert!(
            !self.done,
            "Tokenizer::tokenize called twice on the same instance"
        );
        self.done = true;
        if self.input.is_empty() {
            return false;
        }
        while let Some(ch) = self.next_char() {
            self.stats.steps = self.stats.steps.saturating_add(1);
            self.step(ch, sink);
        }
        self.dispatch_eof(sink);
        true
    }

    /// Errors recorded so far, in source order.
    pub fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Copy of the instrumentation counters.
    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    /// Tokens retained under `keep_tokens`, in emission order.
    pub fn kept_tokens(&self) -> impl Iterator<Item = TokenRef<'_>> {
        self.pending
            .iter()
            .filter_map(|handle| self.pools.view(*handle))
    }

    /// Hand the pool set back for reuse or teardown.
    pub fn into_pools(self) -> TokenPools {
        self.pools
    }

    fn step(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match self.state {
            TokenizerState::Data => self.state_data(ch),
            TokenizerState::TagOpen => self.state_tag_open(ch),
            TokenizerState::EndTagOpen => self.state_end_tag_open(ch),
            TokenizerState::TagName => self.state_tag_name(ch, sink),
            TokenizerState::BeforeAttributeName => self.state_before_attribute_name(ch),
            TokenizerState::AttributeName => self.state_attribute_name(ch),
            TokenizerState::AfterAttributeName => self.state_after_attribute_name(ch, sink),
            TokenizerState::BeforeAttributeValue => self.state_before_attribute_value(ch, sink),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.state_attribute_value_quoted(ch, '"')
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.state_attribute_value_quoted(ch, '\'')
            }
            TokenizerState::AttributeValueUnquoted => {
                self.state_attribute_value_unquoted(ch, sink)
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.state_after_attribute_value_quoted(ch, sink)
            }
            TokenizerState::SelfClosingStartTag => self.state_self_closing_start_tag(ch, sink),
            TokenizerState::BogusComment => self.state_bogus_comment(ch, sink),
            TokenizerState::MarkupDeclarationOpen => self.state_markup_declaration_open(ch),
            TokenizerState::CommentStart => self.state_comment_start(ch, sink),
            TokenizerState::CommentStartDash => self.state_comment_start_dash(ch, sink),
            TokenizerState::Comment => self.state_comment(ch),
            TokenizerState::CommentLessThanSign => self.state_comment_less_than_sign(ch),
            TokenizerState::CommentLessThanSignBang => self.state_comment_less_than_sign_bang(ch),
            TokenizerState::CommentLessThanSignBangDash => {
                self.state_comment_less_than_sign_bang_dash(ch)
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.state_comment_less_than_sign_bang_dash_dash(ch)
            }
            TokenizerState::CommentEndDash => self.state_comment_end_dash(ch),
            TokenizerState::CommentEnd => self.state_comment_end(ch, sink),
            TokenizerState::CommentEndBang => self.state_comment_end_bang(ch, sink),
            TokenizerState::Doctype => self.state_doctype(ch),
            TokenizerState::BeforeDoctypeName => self.state_before_doctype_name(ch, sink),
            TokenizerState::DoctypeName => self.state_doctype_name(ch, sink),
            TokenizerState::AfterDoctypeName => self.state_after_doctype_name(ch, sink),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.state_after_doctype_public_keyword(ch, sink)
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.state_before_doctype_public_identifier(ch, sink)
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.state_doctype_public_identifier_quoted(ch, '"', sink)
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.state_doctype_public_identifier_quoted(ch, '\'', sink)
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.state_after_doctype_public_identifier(ch, sink)
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.state_between_doctype_public_and_system_identifiers(ch, sink)
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.state_after_doctype_system_keyword(ch, sink)
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.state_before_doctype_system_identifier(ch, sink)
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.state_doctype_system_identifier_quoted(ch, '"', sink)
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.state_doctype_system_identifier_quoted(ch, '\'', sink)
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.state_after_doctype_system_identifier(ch, sink)
            }
            TokenizerState::BogusDoctype => self.state_bogus_doctype(ch, sink),
            TokenizerState::CdataSection => self.state_cdata_section(ch),
            TokenizerState::CdataSectionBracket => self.state_cdata_section_bracket(ch),
            TokenizerState::CdataSectionEnd => self.state_cdata_section_end(ch, sink),
            TokenizerState::CharacterReference => self.state_character_reference(ch),
            TokenizerState::NamedCharacterReference => self.state_named_character_reference(ch),
            TokenizerState::AmbiguousAmpersand => self.state_ambiguous_ampersand(ch),
            TokenizerState::NumericCharacterReference => {
                self.state_numeric_character_reference(ch)
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.state_hexadecimal_character_reference_start(ch)
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.state_decimal_character_reference_start(ch)
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.state_hexadecimal_character_reference(ch)
            }
            TokenizerState::DecimalCharacterReference => {
                self.state_decimal_character_reference(ch)
            }
            TokenizerState::NumericCharacterReferenceEnd => {
                self.state_numeric_character_reference_end(ch)
            }
        }
    }

    // --- scanning helpers ---

    /// Consume and return the next character, maintaining position, line and
    /// column counters. Reconsumed characters keep their original coordinates
    /// (the watermark skips re-counting).
    fn next_char(&mut self) -> Option<char> {
        let ch = self.input[self.cursor..].chars().next()?;
        self.current_pos = self.cursor;
        if self.cursor >= self.counted_upto {
            self.current_line = self.line;
            self.current_column = self.column;
            self.count_char(ch);
            self.counted_upto = self.cursor + ch.len_utf8();
        }
        self.cursor += ch.len_utf8();
        Some(ch)
    }

    fn count_char(&mut self, ch: char) {
        match ch {
            '\r' => {
                self.line += 1;
                self.column = 0;
                self.last_counted_was_cr = true;
            }
            '\n' => {
                // The LF of a CRLF pair is part of the line break the CR
                // already counted.
                if !self.last_counted_was_cr {
                    self.line += 1;
                    self.column = 0;
                }
                self.last_counted_was_cr = false;
            }
            _ => {
                self.column += 1;
                self.last_counted_was_cr = false;
            }
        }
    }

    /// Rewind the cursor one position so `ch` is re-evaluated under `state`.
    pub(super) fn reconsume_in(&mut self, ch: char, state: TokenizerState) {
        debug_assert!(
            self.cursor >= ch.len_utf8(),
            "reconsume must rewind into consumed input"
        );
        self.cursor -= ch.len_utf8();
        self.transition_to(state);
    }

    pub(super) fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html5.tokenizer",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.cursor
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    pub(super) fn peek_char(&self) -> Option<char> {
        self.input[self.cursor..].chars().next()
    }

    /// Case-insensitive ASCII lookahead at the cursor, without consuming.
    pub(super) fn peek_seq_ci(&self, seq: &str) -> bool {
        self.input
            .as_bytes()
            .get(self.cursor..self.cursor + seq.len())
            .is_some_and(|bytes| bytes.eq_ignore_ascii_case(seq.as_bytes()))
    }

    /// Case-sensitive lookahead at the cursor, without consuming.
    pub(super) fn peek_seq(&self, seq: &str) -> bool {
        self.input[self.cursor..].starts_with(seq)
    }

    /// Consume `n` ASCII characters already confirmed by a lookahead.
    pub(super) fn advance_ascii(&mut self, n: usize) {
        for _ in 0..n {
            let consumed = self.next_char();
            debug_assert!(consumed.is_some(), "lookahead promised {n} characters");
        }
    }

    /// Bulk-consume a plain-text run in the data state: everything up to the
    /// next `<`, `&`, or NUL is one append, with per-character line/column
    /// accounting preserved.
    pub(super) fn consume_plain_text_run(&mut self) {
        let input = self.input;
        let rest = &input.as_bytes()[self.cursor..];
        let len = memchr::memchr3(b'<', b'&', b'\0', rest).unwrap_or(rest.len());
        if len == 0 {
            return;
        }
        let run = &input[self.cursor..self.cursor + len];
        self.emit_text(run);
        let end = self.cursor + len;
        while self.cursor < end {
            let _ = self.next_char();
        }
    }

    pub(super) fn error(&mut self, code: ParseErrorCode) {
        self.errors.push(ParseError {
            code,
            position: self.current_pos,
            line: self.current_line,
            column: self.current_column,
        });
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html5.tokenizer",
            "parse error {code:?} @{} ({}:{})",
            self.current_pos,
            self.current_line,
            self.current_column
        );
    }

    pub(super) fn pop_return_state(&mut self) -> TokenizerState {
        // Character-reference states are only entered with a pushed return
        // state; fall back to Data instead of panicking on a desync.
        self.return_states.pop().unwrap_or(TokenizerState::Data)
    }

    pub(super) fn charref_in_attribute(&self) -> bool {
        matches!(
            self.return_states.last(),
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    // --- end-of-input dispatch ---

    fn dispatch_eof(&mut self, sink: &mut dyn TokenSink) {
        use TokenizerState::*;
        // A character reference interrupted by end-of-input resolves first,
        // then the surrounding context handles its own end-of-input rules.
        match self.state {
            CharacterReference
            | NamedCharacterReference
            | AmbiguousAmpersand
            | NumericCharacterReference
            | HexadecimalCharacterReferenceStart
            | DecimalCharacterReferenceStart
            | HexadecimalCharacterReference
            | DecimalCharacterReference
            | NumericCharacterReferenceEnd => self.finish_charref_at_eof(),
            _ => {}
        }
        match self.state {
            Data => {}
            TagOpen => {
                self.error(ParseErrorCode::EofBeforeTagName);
                self.emit_text("<");
            }
            EndTagOpen => {
                self.error(ParseErrorCode::EofBeforeTagName);
                self.emit_text("</");
            }
            TagName | BeforeAttributeName | AttributeName | AfterAttributeName
            | BeforeAttributeValue | AttributeValueDoubleQuoted | AttributeValueSingleQuoted
            | AttributeValueUnquoted | AfterAttributeValueQuoted | SelfClosingStartTag => {
                // The partial tag token is dropped.
                self.error(ParseErrorCode::EofInTag);
            }
            MarkupDeclarationOpen => {
                self.error(ParseErrorCode::IncorrectlyOpenedComment);
                self.data_buf.clear();
                self.emit_comment(sink);
            }
            CommentStart | CommentStartDash | Comment | CommentLessThanSign
            | CommentLessThanSignBang | CommentLessThanSignBangDash
            | CommentLessThanSignBangDashDash | CommentEndDash | CommentEnd | CommentEndBang => {
                self.error(ParseErrorCode::EofInComment);
                self.emit_comment(sink);
            }
            BogusComment => self.emit_comment(sink),
            Doctype | BeforeDoctypeName | DoctypeName | AfterDoctypeName
            | AfterDoctypePublicKeyword | BeforeDoctypePublicIdentifier
            | DoctypePublicIdentifierDoubleQuoted | DoctypePublicIdentifierSingleQuoted
            | AfterDoctypePublicIdentifier | BetweenDoctypePublicAndSystemIdentifiers
            | AfterDoctypeSystemKeyword | BeforeDoctypeSystemIdentifier
            | DoctypeSystemIdentifierDoubleQuoted | DoctypeSystemIdentifierSingleQuoted
            | AfterDoctypeSystemIdentifier => {
                self.error(ParseErrorCode::EofInDoctype);
                self.force_quirks = true;
                self.emit_doctype(sink);
            }
            BogusDoctype => self.emit_doctype(sink),
            CdataSection => {
                self.error(ParseErrorCode::EofInCdata);
                self.emit_cdata(sink);
            }
            CdataSectionBracket => {
                self.data_buf.push(']');
                self.error(ParseErrorCode::EofInCdata);
                self.emit_cdata(sink);
            }
            CdataSectionEnd => {
                self.data_buf.push_str("]]");
                self.error(ParseErrorCode::EofInCdata);
                self.emit_cdata(sink);
            }
            CharacterReference | NamedCharacterReference | AmbiguousAmpersand
            | NumericCharacterReference | HexadecimalCharacterReferenceStart
            | DecimalCharacterReferenceStart | HexadecimalCharacterReference
            | DecimalCharacterReference | NumericCharacterReferenceEnd => {
                debug_assert!(false, "character-reference states resolve before this match");
            }
        }
        self.emit_eof(sink);
    }
}

/// HTML whitespace, with CR included: the input is not normalized before
/// tokenization (line counting handles CR/LF/CRLF), so a raw CR acts as
/// whitespace in every state that separates on whitespace.
pub(super) fn is_html_whitespace(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Tokenize `input` with default pools and configuration.
///
/// Convenience wrapper over [`Tokenizer`]; returns whether anything was
/// produced and the recorded parse errors.
pub fn tokenize(input: &str, sink: &mut dyn TokenSink) -> (bool, Vec<ParseError>) {
    let mut tokenizer = Tokenizer::new(input, TokenPools::new(), TokenizerConfig::default());
    let produced = tokenizer.tokenize(sink);
    (produced, std::mem::take(&mut tokenizer.errors))
}

#[cfg(test)]
mod tests;
