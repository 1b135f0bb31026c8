use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::composer::{ComposerConfig, LineComposer};
use crate::error::ComposerResult;
use crate::options::ComposerOptions;

pub const BLOCK_QUOTE_MARKER: char = '>';

/// How a writer derives the prefix of blank lines that close a block quote.
///
/// Blank lines inside a quote carry the quote marker; a blank line that ends
/// one should not, otherwise the next paragraph would be pulled into the
/// quote by a lazy-continuation reader.
#[derive(Default)]
pub enum BlockQuoteChildPrefix {
    Identity,
    /// Drop the innermost `>`, keep everything else.
    #[default]
    StripLastMarker,
    Custom(Box<dyn Fn(&str) -> String>),
}

impl BlockQuoteChildPrefix {
    pub fn child_prefix(&self, prefix: &str) -> String {
        match self {
            Self::Identity => prefix.to_owned(),
            Self::StripLastMarker => match prefix.rfind(BLOCK_QUOTE_MARKER) {
                Some(pos) => {
                    let mut child = prefix.to_owned();
                    child.remove(pos);
                    child
                }
                None => prefix.to_owned(),
            },
            Self::Custom(derive) => derive(prefix),
        }
    }
}

impl fmt::Debug for BlockQuoteChildPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::StripLastMarker => f.write_str("StripLastMarker"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A [`LineComposer`] for markdown output.
///
/// Pre-formatted lines always get the full prefix, so fenced code inside a
/// quote or list item stays inside it. Everything else is forwarded to the
/// composer.
#[derive(Debug)]
pub struct MarkdownWriter {
    composer: LineComposer,
    child_prefix: BlockQuoteChildPrefix,
}

impl MarkdownWriter {
    pub fn new(child_prefix: BlockQuoteChildPrefix) -> Self {
        Self::with_config(ComposerConfig::default(), child_prefix)
    }

    pub fn with_config(config: ComposerConfig, child_prefix: BlockQuoteChildPrefix) -> Self {
        let mut composer = LineComposer::with_config(config);
        composer.change_options(ComposerOptions::PREFIX_PRE_FORMATTED, ComposerOptions::empty());
        Self {
            composer,
            child_prefix,
        }
    }

    /// Prefix for blank lines emitted under `prefix`.
    pub fn last_block_quote_child_prefix(&self, prefix: &str) -> String {
        self.child_prefix.child_prefix(prefix)
    }

    /// Terminates the open line and emits `count` blank lines under the
    /// block-quote child prefix. The prefix is restored afterwards.
    pub fn tail_blank_line(&mut self, count: usize) -> &mut Self {
        self.composer.line();
        let prefix = self.composer.prefix().to_owned();
        let child = self.last_block_quote_child_prefix(&prefix);
        if child == prefix {
            self.composer.blank_lines(count);
        } else {
            log::trace!("blank line prefix {prefix:?} -> {child:?}");
            self.composer
                .set_prefix(&child, false)
                .blank_lines(count)
                .set_prefix(&prefix, false);
        }
        self
    }

    pub fn tail_blank_line_once(&mut self) -> &mut Self {
        self.tail_blank_line(1)
    }

    /// See [`LineComposer::finish`].
    pub fn finish(self) -> ComposerResult<()> {
        self.composer.finish()
    }

    pub fn into_inner(self) -> LineComposer {
        self.composer
    }
}

impl Default for MarkdownWriter {
    fn default() -> Self {
        Self::new(BlockQuoteChildPrefix::default())
    }
}

impl Deref for MarkdownWriter {
    type Target = LineComposer;

    fn deref(&self) -> &LineComposer {
        &self.composer
    }
}

impl DerefMut for MarkdownWriter {
    fn deref_mut(&mut self) -> &mut LineComposer {
        &mut self.composer
    }
}

impl fmt::Display for MarkdownWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.composer, f)
    }
}
