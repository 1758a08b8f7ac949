//! Character-reference state handlers.
//!
//! Named references accumulate greedily: every appended character re-probes
//! the reference table, and a match without a trailing `;` is remembered as
//! a candidate because legacy names are often prefixes of longer names
//! (`&not` vs `&notin;`). Resolution outcomes:
//!
//! - exact match: decode (into the attribute value when the return state is
//!   an attribute-value state, otherwise as a character token);
//! - prefix candidate, accumulation stopped by a non-semicolon: decode the
//!   candidate and push the unconsumed tail back as literal text;
//! - no match: literal text; outside attribute values this goes through the
//!   ambiguous-ampersand state, which records one parse error.

use super::Tokenizer;
use super::states::TokenizerState;
use crate::entities::ReferenceTable;
use crate::html5::shared::ParseErrorCode;

/// Windows-1252 remappings for numeric references in 0x80..=0x9F. The five
/// identity entries are codepoints Windows-1252 leaves in place.
const WINDOWS_1252_REMAP: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
    '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}',
    '\u{017D}', '\u{008F}', '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
    '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
    '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn is_noncharacter(code: u32) -> bool {
    (0xFDD0..=0xFDEF).contains(&code) || (code & 0xFFFF) >= 0xFFFE
}

impl Tokenizer<'_> {
    /// Seen `&` in a state that resolves character references.
    pub(super) fn begin_character_reference(&mut self, return_state: TokenizerState) {
        self.return_states.push(return_state);
        self.charref_buf.clear();
        self.charref_buf.push('&');
        self.charref_candidate = None;
        self.charref_code = 0;
        self.transition_to(TokenizerState::CharacterReference);
    }

    pub(super) fn state_character_reference(&mut self, ch: char) {
        match ch {
            c if c.is_ascii_alphanumeric() => {
                self.reconsume_in(c, TokenizerState::NamedCharacterReference);
            }
            '#' => {
                self.charref_buf.push('#');
                self.transition_to(TokenizerState::NumericCharacterReference);
            }
            _ => {
                self.flush_charref_literal();
                let ret = self.pop_return_state();
                self.reconsume_in(ch, ret);
            }
        }
    }

    pub(super) fn state_named_character_reference(&mut self, ch: char) {
        if ch.is_ascii_alphanumeric() {
            self.charref_buf.push(ch);
            let table = ReferenceTable::get();
            if self.charref_buf.len() - 1 >= table.min_name_len()
                && let Some(entry) = table.find(&self.charref_buf[1..])
            {
                self.charref_candidate = Some(entry);
            }
            return;
        }
        if ch == ';' {
            self.charref_buf.push(';');
            let matched = ReferenceTable::get().find(&self.charref_buf[1..]);
            if let Some(entry) = matched {
                self.charref_candidate = None;
                self.charref_buf.clear();
                self.flush_decoded(entry.expansion);
                let ret = self.pop_return_state();
                self.transition_to(ret);
            } else {
                // Unknown semicolon-terminated reference: the text stays
                // literal and the `;` is reprocessed downstream.
                self.charref_buf.pop();
                self.charref_candidate = None;
                self.flush_charref_literal();
                if self.charref_in_attribute() {
                    let ret = self.pop_return_state();
                    self.reconsume_in(';', ret);
                } else {
                    self.reconsume_in(';', TokenizerState::AmbiguousAmpersand);
                }
            }
            return;
        }
        self.named_reference_stop(Some(ch));
    }

    /// Accumulation stopped on a non-alphanumeric, non-`;` character (or on
    /// end of input when `stop` is `None`).
    pub(super) fn named_reference_stop(&mut self, stop: Option<char>) {
        let matched = ReferenceTable::get().find(&self.charref_buf[1..]);
        let candidate = self.charref_candidate.take();
        let in_attribute = self.charref_in_attribute();
        if let Some(entry) = matched {
            if in_attribute && stop == Some('=') {
                // Historical carve-out: `&param=x` in an attribute stays
                // literal.
                self.flush_charref_literal();
            } else {
                self.error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.charref_buf.clear();
                self.flush_decoded(entry.expansion);
            }
        } else if let Some(candidate) = candidate {
            if in_attribute {
                // The tail after the candidate starts with an alphanumeric,
                // so the whole run stays literal in attribute values.
                self.flush_charref_literal();
            } else {
                self.error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                let tail = self.charref_buf[1 + candidate.name.len()..].to_string();
                self.charref_buf.clear();
                self.flush_decoded(candidate.expansion);
                self.flush_decoded(&tail);
            }
        } else if in_attribute {
            self.flush_charref_literal();
        } else {
            self.flush_charref_literal();
            if let Some(ch) = stop {
                self.reconsume_in(ch, TokenizerState::AmbiguousAmpersand);
            } else {
                let ret = self.pop_return_state();
                self.transition_to(ret);
            }
            return;
        }
        let ret = self.pop_return_state();
        match stop {
            Some(ch) => self.reconsume_in(ch, ret),
            None => self.transition_to(ret),
        }
    }

    pub(super) fn state_ambiguous_ampersand(&mut self, ch: char) {
        match ch {
            c if c.is_ascii_alphanumeric() => {
                if self.charref_in_attribute() {
                    self.value_buf.push(c);
                } else {
                    self.emit_char(c);
                }
            }
            ';' => {
                self.error(ParseErrorCode::AmbiguousAmpersand);
                let ret = self.pop_return_state();
                self.reconsume_in(';', ret);
            }
            _ => {
                let ret = self.pop_return_state();
                self.reconsume_in(ch, ret);
            }
        }
    }

    // --- numeric references ---

    pub(super) fn state_numeric_character_reference(&mut self, ch: char) {
        self.charref_code = 0;
        match ch {
            'x' | 'X' => {
                self.charref_buf.push(ch);
                self.transition_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(ch, TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    pub(super) fn state_hexadecimal_character_reference_start(&mut self, ch: char) {
        if ch.is_ascii_hexdigit() {
            self.reconsume_in(ch, TokenizerState::HexadecimalCharacterReference);
        } else {
            self.error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
            self.flush_charref_literal();
            let ret = self.pop_return_state();
            self.reconsume_in(ch, ret);
        }
    }

    pub(super) fn state_decimal_character_reference_start(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.reconsume_in(ch, TokenizerState::DecimalCharacterReference);
        } else {
            self.error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
            self.flush_charref_literal();
            let ret = self.pop_return_state();
            self.reconsume_in(ch, ret);
        }
    }

    pub(super) fn state_hexadecimal_character_reference(&mut self, ch: char) {
        match ch {
            c if c.is_ascii_hexdigit() => {
                let digit = c.to_digit(16).unwrap_or(0);
                self.charref_code = self.charref_code.saturating_mul(16).saturating_add(digit);
            }
            ';' => self.transition_to(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(ch, TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    pub(super) fn state_decimal_character_reference(&mut self, ch: char) {
        match ch {
            c if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                self.charref_code = self.charref_code.saturating_mul(10).saturating_add(digit);
            }
            ';' => self.transition_to(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(ch, TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// The end state consumes nothing: it resolves the accumulated value and
    /// hands the current character straight back to the return state.
    pub(super) fn state_numeric_character_reference_end(&mut self, ch: char) {
        self.finish_numeric_reference();
        let state = self.state;
        self.reconsume_in(ch, state);
    }

    /// Validity ladder for the accumulated numeric value, in order: zero,
    /// out-of-range, surrogate, noncharacter (suppressed), C1 control or CR
    /// (with legacy Windows-1252 remapping).
    pub(super) fn finish_numeric_reference(&mut self) {
        let code = self.charref_code;
        let decoded = if code == 0 {
            self.error(ParseErrorCode::NullCharacterReference);
            Some('\u{FFFD}')
        } else if code > 0x10FFFF {
            self.error(ParseErrorCode::CharacterReferenceOutsideUnicodeRange);
            Some('\u{FFFD}')
        } else if (0xD800..=0xDFFF).contains(&code) {
            self.error(ParseErrorCode::SurrogateCharacterReference);
            Some('\u{FFFD}')
        } else if is_noncharacter(code) {
            // Suppressed: the error is recorded but no character is emitted.
            self.error(ParseErrorCode::NoncharacterCharacterReference);
            None
        } else if code == 0x0D || (0x80..=0x9F).contains(&code) {
            self.error(ParseErrorCode::ControlCharacterReference);
            if (0x80..=0x9F).contains(&code) {
                Some(WINDOWS_1252_REMAP[(code - 0x80) as usize])
            } else {
                Some('\r')
            }
        } else {
            Some(char::from_u32(code).unwrap_or('\u{FFFD}'))
        };
        if let Some(ch) = decoded {
            self.flush_decoded_char(ch);
        }
        self.charref_buf.clear();
        self.charref_code = 0;
        let ret = self.pop_return_state();
        self.transition_to(ret);
    }

    // --- end-of-input resolution ---

    pub(super) fn finish_charref_at_eof(&mut self) {
        match self.state {
            TokenizerState::CharacterReference => {
                self.flush_charref_literal();
                let ret = self.pop_return_state();
                self.transition_to(ret);
            }
            TokenizerState::NamedCharacterReference => self.named_reference_stop(None),
            TokenizerState::AmbiguousAmpersand => {
                let ret = self.pop_return_state();
                self.transition_to(ret);
            }
            TokenizerState::NumericCharacterReference
            | TokenizerState::HexadecimalCharacterReferenceStart
            | TokenizerState::DecimalCharacterReferenceStart => {
                self.error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_charref_literal();
                let ret = self.pop_return_state();
                self.transition_to(ret);
            }
            TokenizerState::HexadecimalCharacterReference
            | TokenizerState::DecimalCharacterReference => {
                self.error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.finish_numeric_reference();
            }
            TokenizerState::NumericCharacterReferenceEnd => self.finish_numeric_reference(),
            state => debug_assert!(false, "not a character-reference state: {state:?}"),
        }
    }
}
