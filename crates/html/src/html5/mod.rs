//! HTML5 tokenization path.

pub(crate) mod shared;
pub mod tokenizer;

// Public re-exports: consumers should import from `html::html5::*` rather
// than `shared::*`.
pub use shared::{
    Attribute, CdataToken, CharacterToken, CommentToken, DoctypeToken, EndTagToken, EofToken,
    NullSink, ParseError, ParseErrorCode, TagToken, TokenPools, TokenPoolsConfig, TokenRef,
    TokenSink,
};
pub use tokenizer::{
    FmtSink, TokenFmt, Tokenizer, TokenizerConfig, TokenizerStats, tokenize,
};
