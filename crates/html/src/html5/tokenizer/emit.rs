//! Token emission protocol.
//!
//! Character tokens buffer so adjacent text runs merge into one token; every
//! other kind flushes the buffer and goes straight to the sink. Outside
//! retention mode a delivered token is released back to its pool the moment
//! the sink call returns.

use super::Tokenizer;
use crate::html5::shared::{
    CdataToken, CharacterToken, CommentToken, DoctypeToken, EndTagToken, EofToken, ParseErrorCode,
    TagToken, TokenHandle, TokenSink,
};

impl Tokenizer<'_> {
    /// Append text to the pending character token, starting one if needed.
    /// Buffered text reaches the sink when the next non-character token (or
    /// end of input) flushes it.
    pub(super) fn emit_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(TokenHandle::Character(handle)) = self.pending.last().copied()
            && let Some(token) = self.pools.characters.get_mut(handle)
            && !token.consumed
        {
            token.data.push_str(text);
            return;
        }
        let handle = self.pools.characters.allocate(CharacterToken {
            data: text.to_string(),
            consumed: false,
        });
        self.pending.push(TokenHandle::Character(handle));
    }

    pub(super) fn emit_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.emit_text(ch.encode_utf8(&mut buf));
    }

    /// Route decoded character-reference text: into the attribute value when
    /// the reference sits inside one, otherwise into the character stream.
    pub(super) fn flush_decoded(&mut self, text: &str) {
        if self.charref_in_attribute() {
            self.value_buf.push_str(text);
        } else {
            self.emit_text(text);
        }
    }

    pub(super) fn flush_decoded_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.flush_decoded(ch.encode_utf8(&mut buf));
    }

    /// Flush the reference accumulator as literal text (the `&`-prefixed
    /// spelling, undecoded).
    pub(super) fn flush_charref_literal(&mut self) {
        let literal = std::mem::take(&mut self.charref_buf);
        self.flush_decoded(&literal);
    }

    pub(super) fn emit_tag(&mut self, sink: &mut dyn TokenSink) {
        self.commit_pending_attribute();
        if self.current_tag_is_end {
            if !self.attributes.is_empty() {
                self.error(ParseErrorCode::EndTagWithAttributes);
            }
            if self.self_closing {
                self.error(ParseErrorCode::EndTagWithTrailingSolidus);
            }
            let token = EndTagToken {
                name: std::mem::take(&mut self.data_buf),
                consumed: false,
            };
            let handle = self.pools.end_tags.allocate(token);
            self.emit_token(TokenHandle::EndTag(handle), sink);
        } else {
            let token = TagToken {
                name: std::mem::take(&mut self.data_buf),
                attributes: std::mem::take(&mut self.attributes),
                self_closing: self.self_closing,
                consumed: false,
            };
            let handle = self.pools.tags.allocate(token);
            self.emit_token(TokenHandle::StartTag(handle), sink);
        }
    }

    pub(super) fn emit_comment(&mut self, sink: &mut dyn TokenSink) {
        let token = CommentToken {
            data: std::mem::take(&mut self.data_buf),
            consumed: false,
        };
        let handle = self.pools.comments.allocate(token);
        self.emit_token(TokenHandle::Comment(handle), sink);
    }

    pub(super) fn emit_doctype(&mut self, sink: &mut dyn TokenSink) {
        let token = DoctypeToken {
            name: self
                .doctype_name_set
                .then(|| std::mem::take(&mut self.data_buf)),
            public_id: self.aux_set.then(|| std::mem::take(&mut self.aux_buf)),
            system_id: self.value_set.then(|| std::mem::take(&mut self.value_buf)),
            force_quirks: self.force_quirks,
            consumed: false,
        };
        let handle = self.pools.doctypes.allocate(token);
        self.emit_token(TokenHandle::Doctype(handle), sink);
    }

    pub(super) fn emit_cdata(&mut self, sink: &mut dyn TokenSink) {
        let token = CdataToken {
            data: std::mem::take(&mut self.data_buf),
            consumed: false,
        };
        let handle = self.pools.cdatas.allocate(token);
        self.emit_token(TokenHandle::Cdata(handle), sink);
    }

    pub(super) fn emit_eof(&mut self, sink: &mut dyn TokenSink) {
        let handle = self.pools.eofs.allocate(EofToken { consumed: false });
        self.emit_token(TokenHandle::EndOfFile(handle), sink);
    }

    /// Flush buffered tokens, then hand `handle` to the sink and release it
    /// (or retain it in keep mode).
    pub(super) fn emit_token(&mut self, handle: TokenHandle, sink: &mut dyn TokenSink) {
        self.clear_scratch();
        self.flush_pending(sink);
        self.deliver(handle, sink);
        if self.config.keep_tokens {
            self.pending.push(handle);
        } else {
            let released = self.pools.release(handle);
            debug_assert!(released.is_ok(), "emitted token handle must be live");
        }
    }

    pub(super) fn flush_pending(&mut self, sink: &mut dyn TokenSink) {
        if self.config.keep_tokens {
            for i in 0..self.pending.len() {
                let handle = self.pending[i];
                if !self.pools.is_consumed(handle) {
                    self.deliver(handle, sink);
                }
            }
        } else {
            let pending = std::mem::take(&mut self.pending);
            for handle in pending {
                self.deliver(handle, sink);
                let released = self.pools.release(handle);
                debug_assert!(released.is_ok(), "pending token handle must be live");
            }
        }
    }

    /// Hand one token to the sink, once, and mark it consumed.
    fn deliver(&mut self, handle: TokenHandle, sink: &mut dyn TokenSink) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit token: {handle:?}");
        match self.pools.view(handle) {
            Some(token) => sink.process_token(token),
            None => debug_assert!(false, "delivered token handle must be live"),
        }
        self.pools.mark_consumed(handle);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    /// Reset every scratch buffer and flag for the next token.
    fn clear_scratch(&mut self) {
        self.data_buf.clear();
        self.aux_buf.clear();
        self.aux_set = false;
        self.value_buf.clear();
        self.value_set = false;
        self.attributes.clear();
        self.attr_in_progress = false;
        self.self_closing = false;
        self.current_tag_is_end = false;
        self.doctype_name_set = false;
        self.force_quirks = false;
        self.charref_buf.clear();
        self.charref_candidate = None;
        self.charref_code = 0;
    }
}
