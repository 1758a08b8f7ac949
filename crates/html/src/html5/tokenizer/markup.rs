//! Markup declaration, comment, DOCTYPE, and CDATA state handlers.

use super::states::TokenizerState;
use super::{Tokenizer, is_html_whitespace};
use crate::html5::shared::{ParseErrorCode, TokenSink};

impl Tokenizer<'_> {
    /// Entered after `<!`. The declaration kind needs multi-character
    /// lookahead; the input is fully buffered, so the keywords are matched
    /// directly and consumed through the counting path.
    pub(super) fn state_markup_declaration_open(&mut self, ch: char) {
        match ch {
            '-' if self.peek_char() == Some('-') => {
                self.advance_ascii(1);
                self.data_buf.clear();
                self.transition_to(TokenizerState::CommentStart);
            }
            'd' | 'D' if self.peek_seq_ci("OCTYPE") => {
                self.advance_ascii(6);
                self.begin_doctype();
                self.transition_to(TokenizerState::Doctype);
            }
            '[' if self.peek_seq("CDATA[") => {
                self.advance_ascii(6);
                self.data_buf.clear();
                self.transition_to(TokenizerState::CdataSection);
            }
            _ => {
                self.error(ParseErrorCode::IncorrectlyOpenedComment);
                self.data_buf.clear();
                self.reconsume_in(ch, TokenizerState::BogusComment);
            }
        }
    }

    pub(super) fn state_bogus_comment(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '>' => {
                self.emit_comment(sink);
                self.transition_to(TokenizerState::Data);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.data_buf.push('\u{FFFD}');
            }
            c => self.data_buf.push(c),
        }
    }

    // --- comments ---

    pub(super) fn state_comment_start(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '-' => self.transition_to(TokenizerState::CommentStartDash),
            '>' => {
                self.error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.emit_comment(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => self.reconsume_in(ch, TokenizerState::Comment),
        }
    }

    pub(super) fn state_comment_start_dash(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '-' => self.transition_to(TokenizerState::CommentEnd),
            '>' => {
                self.error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.emit_comment(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.data_buf.push('-');
                self.reconsume_in(ch, TokenizerState::Comment);
            }
        }
    }

    pub(super) fn state_comment(&mut self, ch: char) {
        match ch {
            '<' => {
                self.data_buf.push('<');
                self.transition_to(TokenizerState::CommentLessThanSign);
            }
            '-' => self.transition_to(TokenizerState::CommentEndDash),
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.data_buf.push('\u{FFFD}');
            }
            c => self.data_buf.push(c),
        }
    }

    pub(super) fn state_comment_less_than_sign(&mut self, ch: char) {
        match ch {
            '!' => {
                self.data_buf.push('!');
                self.transition_to(TokenizerState::CommentLessThanSignBang);
            }
            '<' => self.data_buf.push('<'),
            _ => self.reconsume_in(ch, TokenizerState::Comment),
        }
    }

    pub(super) fn state_comment_less_than_sign_bang(&mut self, ch: char) {
        match ch {
            '-' => self.transition_to(TokenizerState::CommentLessThanSignBangDash),
            _ => self.reconsume_in(ch, TokenizerState::Comment),
        }
    }

    pub(super) fn state_comment_less_than_sign_bang_dash(&mut self, ch: char) {
        match ch {
            '-' => self.transition_to(TokenizerState::CommentLessThanSignBangDashDash),
            _ => self.reconsume_in(ch, TokenizerState::CommentEndDash),
        }
    }

    pub(super) fn state_comment_less_than_sign_bang_dash_dash(&mut self, ch: char) {
        match ch {
            '>' => self.reconsume_in(ch, TokenizerState::CommentEnd),
            _ => {
                // `<!--` inside a comment looks like a nested comment opener.
                self.error(ParseErrorCode::NestedComment);
                self.reconsume_in(ch, TokenizerState::CommentEnd);
            }
        }
    }

    pub(super) fn state_comment_end_dash(&mut self, ch: char) {
        match ch {
            '-' => self.transition_to(TokenizerState::CommentEnd),
            _ => {
                self.data_buf.push('-');
                self.reconsume_in(ch, TokenizerState::Comment);
            }
        }
    }

    pub(super) fn state_comment_end(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '>' => {
                self.emit_comment(sink);
                self.transition_to(TokenizerState::Data);
            }
            '!' => self.transition_to(TokenizerState::CommentEndBang),
            '-' => self.data_buf.push('-'),
            _ => {
                self.data_buf.push_str("--");
                self.reconsume_in(ch, TokenizerState::Comment);
            }
        }
    }

    pub(super) fn state_comment_end_bang(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '-' => {
                self.data_buf.push_str("--!");
                self.transition_to(TokenizerState::CommentEndDash);
            }
            '>' => {
                self.error(ParseErrorCode::IncorrectlyClosedComment);
                self.emit_comment(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.data_buf.push_str("--!");
                self.reconsume_in(ch, TokenizerState::Comment);
            }
        }
    }

    // --- DOCTYPE ---

    pub(super) fn begin_doctype(&mut self) {
        self.data_buf.clear();
        self.doctype_name_set = false;
        self.aux_buf.clear();
        self.aux_set = false;
        self.value_buf.clear();
        self.value_set = false;
        self.force_quirks = false;
    }

    pub(super) fn state_doctype(&mut self, ch: char) {
        match ch {
            c if is_html_whitespace(c) => self.transition_to(TokenizerState::BeforeDoctypeName),
            '>' => self.reconsume_in(ch, TokenizerState::BeforeDoctypeName),
            _ => {
                self.error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(ch, TokenizerState::BeforeDoctypeName);
            }
        }
    }

    pub(super) fn state_before_doctype_name(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => {}
            '>' => {
                self.error(ParseErrorCode::MissingDoctypeName);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.doctype_name_set = true;
                self.data_buf.push('\u{FFFD}');
                self.transition_to(TokenizerState::DoctypeName);
            }
            c => {
                self.doctype_name_set = true;
                self.data_buf.push(c.to_ascii_lowercase());
                self.transition_to(TokenizerState::DoctypeName);
            }
        }
    }

    pub(super) fn state_doctype_name(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => self.transition_to(TokenizerState::AfterDoctypeName),
            '>' => {
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.data_buf.push('\u{FFFD}');
            }
            c => self.data_buf.push(c.to_ascii_lowercase()),
        }
    }

    pub(super) fn state_after_doctype_name(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => {}
            '>' => {
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            'p' | 'P' if self.peek_seq_ci("UBLIC") => {
                self.advance_ascii(5);
                self.transition_to(TokenizerState::AfterDoctypePublicKeyword);
            }
            's' | 'S' if self.peek_seq_ci("YSTEM") => {
                self.advance_ascii(5);
                self.transition_to(TokenizerState::AfterDoctypeSystemKeyword);
            }
            _ => {
                self.error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_after_doctype_public_keyword(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {
                self.transition_to(TokenizerState::BeforeDoctypePublicIdentifier);
            }
            '"' => {
                self.error(ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword);
                self.aux_set = true;
                self.transition_to(TokenizerState::DoctypePublicIdentifierDoubleQuoted);
            }
            '\'' => {
                self.error(ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword);
                self.aux_set = true;
                self.transition_to(TokenizerState::DoctypePublicIdentifierSingleQuoted);
            }
            '>' => {
                self.error(ParseErrorCode::MissingDoctypePublicIdentifier);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_before_doctype_public_identifier(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {}
            '"' => {
                self.aux_set = true;
                self.transition_to(TokenizerState::DoctypePublicIdentifierDoubleQuoted);
            }
            '\'' => {
                self.aux_set = true;
                self.transition_to(TokenizerState::DoctypePublicIdentifierSingleQuoted);
            }
            '>' => {
                self.error(ParseErrorCode::MissingDoctypePublicIdentifier);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_doctype_public_identifier_quoted(
        &mut self,
        ch: char,
        quote: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if c == quote => {
                self.transition_to(TokenizerState::AfterDoctypePublicIdentifier);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.aux_buf.push('\u{FFFD}');
            }
            '>' => {
                self.error(ParseErrorCode::AbruptDoctypePublicIdentifier);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            c => self.aux_buf.push(c),
        }
    }

    pub(super) fn state_after_doctype_public_identifier(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {
                self.transition_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            '>' => {
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            '"' => {
                self.error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            _ => {
                self.error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_between_doctype_public_and_system_identifiers(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {}
            '>' => {
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            '"' => {
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            _ => {
                self.error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_after_doctype_system_keyword(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {
                self.transition_to(TokenizerState::BeforeDoctypeSystemIdentifier);
            }
            '"' => {
                self.error(ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.error(ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            '>' => {
                self.error(ParseErrorCode::MissingDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_before_doctype_system_identifier(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {}
            '"' => {
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.value_set = true;
                self.transition_to(TokenizerState::DoctypeSystemIdentifierSingleQuoted);
            }
            '>' => {
                self.error(ParseErrorCode::MissingDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_doctype_system_identifier_quoted(
        &mut self,
        ch: char,
        quote: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if c == quote => {
                self.transition_to(TokenizerState::AfterDoctypeSystemIdentifier);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.value_buf.push('\u{FFFD}');
            }
            '>' => {
                self.error(ParseErrorCode::AbruptDoctypeSystemIdentifier);
                self.force_quirks = true;
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            c => self.value_buf.push(c),
        }
    }

    pub(super) fn state_after_doctype_system_identifier(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => {}
            '>' => {
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                // Trailing junk does not force quirks once both identifiers
                // parsed.
                self.error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(ch, TokenizerState::BogusDoctype);
            }
        }
    }

    pub(super) fn state_bogus_doctype(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '>' => {
                self.emit_doctype(sink);
                self.transition_to(TokenizerState::Data);
            }
            '\0' => self.error(ParseErrorCode::UnexpectedNullCharacter),
            _ => {}
        }
    }

    // --- CDATA sections ---

    pub(super) fn state_cdata_section(&mut self, ch: char) {
        match ch {
            ']' => self.transition_to(TokenizerState::CdataSectionBracket),
            c => self.data_buf.push(c),
        }
    }

    pub(super) fn state_cdata_section_bracket(&mut self, ch: char) {
        match ch {
            ']' => self.transition_to(TokenizerState::CdataSectionEnd),
            _ => {
                self.data_buf.push(']');
                self.reconsume_in(ch, TokenizerState::CdataSection);
            }
        }
    }

    pub(super) fn state_cdata_section_end(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            ']' => self.data_buf.push(']'),
            '>' => {
                self.emit_cdata(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.data_buf.push_str("]]");
                self.reconsume_in(ch, TokenizerState::CdataSection);
            }
        }
    }
}
