//! High-throughput HTML5 tokenizer backed by fixed-chunk token pools.
//!
//! The tokenizer reproduces the HTML5 tokenization state machine, its
//! error-recovery rules, and character-reference decoding, and hands every
//! finished token to a consumer-supplied [`TokenSink`]. All token storage
//! comes from typed [`TokenPools`] built on the `pool` crate's fixed-chunk
//! allocator; named character references resolve through a CRC-64-keyed
//! static table.

mod crc64;
pub mod entities;
pub mod html5;

pub use entities::{CharacterReference, find_reference};
pub use html5::{
    Attribute, CdataToken, CharacterToken, CommentToken, DoctypeToken, EndTagToken, EofToken,
    FmtSink, NullSink, ParseError, ParseErrorCode, TagToken, TokenFmt, TokenPools,
    TokenPoolsConfig, TokenRef, TokenSink, Tokenizer, TokenizerConfig, TokenizerStats, tokenize,
};
