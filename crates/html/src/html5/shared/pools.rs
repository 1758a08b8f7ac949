//! Typed token pools.
//!
//! One fixed-chunk pool per token kind, sized for that kind's expected
//! volume: tag and character tokens dominate real documents, DOCTYPE and EOF
//! tokens appear a handful of times. The pool set is constructed explicitly
//! by the caller and handed to the tokenizer, so a tokenizer cannot exist
//! without its pools; teardown is scoped ownership.

use super::token::{
    CdataToken, CharacterToken, CommentToken, DoctypeToken, EndTagToken, EofToken, TagToken,
    TokenRef,
};
use pool::{Handle, Pool, PoolConfig, PoolConfigError, PoolError};

/// Per-kind block sizes in bytes. Every value must be a positive multiple of
/// the host page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPoolsConfig {
    pub tag_block_bytes: usize,
    pub end_tag_block_bytes: usize,
    pub character_block_bytes: usize,
    pub comment_block_bytes: usize,
    pub doctype_block_bytes: usize,
    pub cdata_block_bytes: usize,
    pub eof_block_bytes: usize,
}

impl Default for TokenPoolsConfig {
    fn default() -> Self {
        Self {
            tag_block_bytes: 512 * 1024,
            end_tag_block_bytes: 128 * 1024,
            character_block_bytes: 256 * 1024,
            comment_block_bytes: 64 * 1024,
            doctype_block_bytes: 4096,
            cdata_block_bytes: 16 * 1024,
            eof_block_bytes: 4096,
        }
    }
}

/// The injected pool set backing all token allocation.
pub struct TokenPools {
    pub(crate) tags: Pool<TagToken>,
    pub(crate) end_tags: Pool<EndTagToken>,
    pub(crate) characters: Pool<CharacterToken>,
    pub(crate) comments: Pool<CommentToken>,
    pub(crate) doctypes: Pool<DoctypeToken>,
    pub(crate) cdatas: Pool<CdataToken>,
    pub(crate) eofs: Pool<EofToken>,
}

impl TokenPools {
    pub fn with_config(config: TokenPoolsConfig) -> Result<Self, PoolConfigError> {
        Ok(Self {
            tags: Pool::with_config(PoolConfig::with_block_bytes(config.tag_block_bytes))?,
            end_tags: Pool::with_config(PoolConfig::with_block_bytes(config.end_tag_block_bytes))?,
            characters: Pool::with_config(PoolConfig::with_block_bytes(
                config.character_block_bytes,
            ))?,
            comments: Pool::with_config(PoolConfig::with_block_bytes(config.comment_block_bytes))?,
            doctypes: Pool::with_config(PoolConfig::with_block_bytes(config.doctype_block_bytes))?,
            cdatas: Pool::with_config(PoolConfig::with_block_bytes(config.cdata_block_bytes))?,
            eofs: Pool::with_config(PoolConfig::with_block_bytes(config.eof_block_bytes))?,
        })
    }

    pub fn new() -> Self {
        Self::with_config(TokenPoolsConfig::default())
            .expect("default token pool configuration is valid")
    }

    /// Count of tokens currently allocated across all pools.
    pub fn live_tokens(&self) -> usize {
        self.tags.used_chunks()
            + self.end_tags.used_chunks()
            + self.characters.used_chunks()
            + self.comments.used_chunks()
            + self.doctypes.used_chunks()
            + self.cdatas.used_chunks()
            + self.eofs.used_chunks()
    }

    pub(crate) fn view(&self, handle: TokenHandle) -> Option<TokenRef<'_>> {
        match handle {
            TokenHandle::Doctype(h) => self.doctypes.get(h).map(TokenRef::Doctype),
            TokenHandle::StartTag(h) => self.tags.get(h).map(TokenRef::StartTag),
            TokenHandle::EndTag(h) => self.end_tags.get(h).map(TokenRef::EndTag),
            TokenHandle::Comment(h) => self.comments.get(h).map(TokenRef::Comment),
            TokenHandle::Cdata(h) => self.cdatas.get(h).map(TokenRef::Cdata),
            TokenHandle::Character(h) => self.characters.get(h).map(TokenRef::Character),
            TokenHandle::EndOfFile(h) => self.eofs.get(h).map(TokenRef::EndOfFile),
        }
    }

    pub(crate) fn mark_consumed(&mut self, handle: TokenHandle) {
        match handle {
            TokenHandle::Doctype(h) => {
                if let Some(token) = self.doctypes.get_mut(h) {
                    token.consumed = true;
                }
            }
            TokenHandle::StartTag(h) => {
                if let Some(token) = self.tags.get_mut(h) {
                    token.consumed = true;
                }
            }
            TokenHandle::EndTag(h) => {
                if let Some(token) = self.end_tags.get_mut(h) {
                    token.consumed = true;
                }
            }
            TokenHandle::Comment(h) => {
                if let Some(token) = self.comments.get_mut(h) {
                    token.consumed = true;
                }
            }
            TokenHandle::Cdata(h) => {
                if let Some(token) = self.cdatas.get_mut(h) {
                    token.consumed = true;
                }
            }
            TokenHandle::Character(h) => {
                if let Some(token) = self.characters.get_mut(h) {
                    token.consumed = true;
                }
            }
            TokenHandle::EndOfFile(h) => {
                if let Some(token) = self.eofs.get_mut(h) {
                    token.consumed = true;
                }
            }
        }
    }

    pub(crate) fn is_consumed(&self, handle: TokenHandle) -> bool {
        self.view(handle).is_some_and(|token| token.is_consumed())
    }

    pub(crate) fn release(&mut self, handle: TokenHandle) -> Result<(), PoolError> {
        match handle {
            TokenHandle::Doctype(h) => self.doctypes.release(h).map(drop),
            TokenHandle::StartTag(h) => self.tags.release(h).map(drop),
            TokenHandle::EndTag(h) => self.end_tags.release(h).map(drop),
            TokenHandle::Comment(h) => self.comments.release(h).map(drop),
            TokenHandle::Cdata(h) => self.cdatas.release(h).map(drop),
            TokenHandle::Character(h) => self.characters.release(h).map(drop),
            TokenHandle::EndOfFile(h) => self.eofs.release(h).map(drop),
        }
    }
}

impl Default for TokenPools {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one pooled token of any kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenHandle {
    Doctype(Handle<DoctypeToken>),
    StartTag(Handle<TagToken>),
    EndTag(Handle<EndTagToken>),
    Comment(Handle<CommentToken>),
    Cdata(Handle<CdataToken>),
    Character(Handle<CharacterToken>),
    EndOfFile(Handle<EofToken>),
}
