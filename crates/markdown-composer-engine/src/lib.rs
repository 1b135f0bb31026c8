//! Line-oriented text composition for markdown renderers.
//!
//! A [`LineComposer`] collects rendered output as discrete lines, each with a
//! prefix (indentation, quote markers) and text, so a renderer can look back
//! at and rewrite what it produced. [`MarkdownWriter`] adds the block-quote
//! blank-line policy on top.

pub mod composer;
pub mod error;
pub mod line;
pub mod options;
pub mod pending;
pub mod prefix;
pub mod writer;

pub use composer::{ComposerConfig, EolListener, LineComposer, ListenerId};
pub use error::{ComposerError, ComposerResult};
pub use line::{Line, LineInfo};
pub use options::{ComposerOptions, OptionStack, TAB_WIDTH};
pub use pending::Pending;
pub use prefix::PrefixState;
pub use writer::{BLOCK_QUOTE_MARKER, BlockQuoteChildPrefix, MarkdownWriter};
