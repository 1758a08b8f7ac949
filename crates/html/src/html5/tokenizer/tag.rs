//! Data, tag, and attribute state handlers.

use super::states::TokenizerState;
use super::{Tokenizer, is_html_whitespace};
use crate::html5::shared::{Attribute, ParseErrorCode, TokenSink};

impl Tokenizer<'_> {
    pub(super) fn state_data(&mut self, ch: char) {
        match ch {
            '&' => self.begin_character_reference(TokenizerState::Data),
            '<' => self.transition_to(TokenizerState::TagOpen),
            '\0' => {
                // In data, a NUL passes through as-is; replacement happens in
                // name/value/comment contexts only.
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            _ => {
                self.emit_char(ch);
                self.consume_plain_text_run();
            }
        }
    }

    pub(super) fn state_tag_open(&mut self, ch: char) {
        match ch {
            '!' => self.transition_to(TokenizerState::MarkupDeclarationOpen),
            '/' => self.transition_to(TokenizerState::EndTagOpen),
            '?' => {
                self.error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.data_buf.clear();
                self.reconsume_in(ch, TokenizerState::BogusComment);
            }
            c if c.is_ascii_alphabetic() => {
                self.begin_tag(false);
                self.reconsume_in(c, TokenizerState::TagName);
            }
            _ => {
                self.error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.emit_char('<');
                self.reconsume_in(ch, TokenizerState::Data);
            }
        }
    }

    pub(super) fn state_end_tag_open(&mut self, ch: char) {
        match ch {
            c if c.is_ascii_alphabetic() => {
                self.begin_tag(true);
                self.reconsume_in(c, TokenizerState::TagName);
            }
            '>' => {
                self.error(ParseErrorCode::MissingEndTagName);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.data_buf.clear();
                self.reconsume_in(ch, TokenizerState::BogusComment);
            }
        }
    }

    pub(super) fn state_tag_name(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => self.transition_to(TokenizerState::BeforeAttributeName),
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '>' => {
                self.emit_tag(sink);
                self.transition_to(TokenizerState::Data);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.data_buf.push('\u{FFFD}');
            }
            c if c.is_ascii_uppercase() => self.data_buf.push(c.to_ascii_lowercase()),
            c => self.data_buf.push(c),
        }
    }

    pub(super) fn state_before_attribute_name(&mut self, ch: char) {
        match ch {
            c if is_html_whitespace(c) => {}
            '/' | '>' => self.reconsume_in(ch, TokenizerState::AfterAttributeName),
            '=' => {
                self.error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attribute();
                self.aux_buf.push('=');
                self.transition_to(TokenizerState::AttributeName);
            }
            _ => {
                self.start_new_attribute();
                self.reconsume_in(ch, TokenizerState::AttributeName);
            }
        }
    }

    pub(super) fn state_attribute_name(&mut self, ch: char) {
        match ch {
            c if is_html_whitespace(c) || c == '/' || c == '>' => {
                self.reconsume_in(c, TokenizerState::AfterAttributeName);
            }
            '=' => {
                // The `=` promises a value, so `<a b=>` commits `Some("")`
                // while `<a b>` commits `None`.
                self.value_set = true;
                self.transition_to(TokenizerState::BeforeAttributeValue);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.aux_buf.push('\u{FFFD}');
            }
            c if c.is_ascii_uppercase() => self.aux_buf.push(c.to_ascii_lowercase()),
            '"' | '\'' | '<' => {
                self.error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.aux_buf.push(ch);
            }
            c => self.aux_buf.push(c),
        }
    }

    pub(super) fn state_after_attribute_name(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => {}
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '=' => {
                self.value_set = true;
                self.transition_to(TokenizerState::BeforeAttributeValue);
            }
            '>' => {
                self.emit_tag(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.start_new_attribute();
                self.reconsume_in(ch, TokenizerState::AttributeName);
            }
        }
    }

    pub(super) fn state_before_attribute_value(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => {}
            '"' => self.transition_to(TokenizerState::AttributeValueDoubleQuoted),
            '\'' => self.transition_to(TokenizerState::AttributeValueSingleQuoted),
            '>' => {
                self.error(ParseErrorCode::MissingAttributeValue);
                self.emit_tag(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => self.reconsume_in(ch, TokenizerState::AttributeValueUnquoted),
        }
    }

    pub(super) fn state_attribute_value_quoted(&mut self, ch: char, quote: char) {
        match ch {
            c if c == quote => self.transition_to(TokenizerState::AfterAttributeValueQuoted),
            '&' => {
                let here = if quote == '"' {
                    TokenizerState::AttributeValueDoubleQuoted
                } else {
                    TokenizerState::AttributeValueSingleQuoted
                };
                self.begin_character_reference(here);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.value_buf.push('\u{FFFD}');
            }
            c => self.value_buf.push(c),
        }
    }

    pub(super) fn state_attribute_value_unquoted(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            c if is_html_whitespace(c) => self.transition_to(TokenizerState::BeforeAttributeName),
            '&' => self.begin_character_reference(TokenizerState::AttributeValueUnquoted),
            '>' => {
                self.emit_tag(sink);
                self.transition_to(TokenizerState::Data);
            }
            '\0' => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.value_buf.push('\u{FFFD}');
            }
            '"' | '\'' | '<' | '=' | '`' => {
                self.error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue);
                self.value_buf.push(ch);
            }
            c => self.value_buf.push(c),
        }
    }

    pub(super) fn state_after_attribute_value_quoted(
        &mut self,
        ch: char,
        sink: &mut dyn TokenSink,
    ) {
        match ch {
            c if is_html_whitespace(c) => self.transition_to(TokenizerState::BeforeAttributeName),
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '>' => {
                self.emit_tag(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(ch, TokenizerState::BeforeAttributeName);
            }
        }
    }

    pub(super) fn state_self_closing_start_tag(&mut self, ch: char, sink: &mut dyn TokenSink) {
        match ch {
            '>' => {
                self.self_closing = true;
                self.emit_tag(sink);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.error(ParseErrorCode::UnexpectedSolidusInTag);
                self.reconsume_in(ch, TokenizerState::BeforeAttributeName);
            }
        }
    }

    // --- tag scratch management ---

    pub(super) fn begin_tag(&mut self, is_end: bool) {
        self.data_buf.clear();
        self.attributes.clear();
        self.attr_in_progress = false;
        self.aux_buf.clear();
        self.aux_set = false;
        self.value_buf.clear();
        self.value_set = false;
        self.self_closing = false;
        self.current_tag_is_end = is_end;
    }

    pub(super) fn start_new_attribute(&mut self) {
        self.commit_pending_attribute();
        self.attr_in_progress = true;
    }

    /// Commit the attribute under construction, if any. A name already in
    /// the map keeps its first value; the new pair is discarded with an
    /// error.
    pub(super) fn commit_pending_attribute(&mut self) {
        if !self.attr_in_progress {
            return;
        }
        self.attr_in_progress = false;
        let name = std::mem::take(&mut self.aux_buf);
        let value = if self.value_set {
            Some(std::mem::take(&mut self.value_buf))
        } else {
            None
        };
        self.value_buf.clear();
        self.value_set = false;
        if self.attributes.iter().any(|attr| attr.name == name) {
            self.error(ParseErrorCode::DuplicateAttribute);
            return;
        }
        self.attributes.push(Attribute { name, value });
    }
}
