//! The line composer: an append-only-looking text buffer that keeps its
//! output as discrete lines so that renderers can go back, inspect and fix up
//! what they already wrote.
//!
//! Text flows in through [`LineComposer::append`] and friends. Whitespace is
//! deferred in a [`Pending`] state until real content proves it is needed,
//! lines pick up the current prefix when they are committed, and blank-line
//! limits are applied when the buffer is rendered (see `render`).

mod buffer;
mod render;

use std::borrow::Cow;
use std::fmt;
use std::io;

use crate::line::Line;
use crate::options::{ComposerOptions, OptionStack, TAB_WIDTH};
use crate::pending::Pending;
use crate::prefix::PrefixState;

/// Callback run once after the next EOL that terminates a content line.
pub type EolListener = Box<dyn FnOnce(&mut LineComposer)>;

/// Handle returned by [`LineComposer::add_indent_on_first_eol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Construction settings for a [`LineComposer`].
pub struct ComposerConfig {
    pub options: ComposerOptions,
    /// Interior blank-line limit used by `Display` and [`LineComposer::flush`].
    pub max_blank_lines: usize,
    /// Trailing blank-line limit used by `Display` and [`LineComposer::flush`].
    pub max_trailing_blank_lines: usize,
    pub indent_prefix: String,
    /// Where [`LineComposer::flush`] writes. Without one the buffer is pulled
    /// with `to_string` / `to_sequence`.
    pub sink: Option<Box<dyn io::Write>>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            options: ComposerOptions::default(),
            max_blank_lines: 1,
            max_trailing_blank_lines: 0,
            indent_prefix: "    ".to_string(),
            sink: None,
        }
    }
}

impl fmt::Debug for ComposerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerConfig")
            .field("options", &self.options)
            .field("max_blank_lines", &self.max_blank_lines)
            .field("max_trailing_blank_lines", &self.max_trailing_blank_lines)
            .field("indent_prefix", &self.indent_prefix)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Stateful line buffer with prefix and option stacks.
///
/// Lines are committed eagerly, so every read observes a consistent buffer.
/// The only deferred state is whitespace on the open line.
///
/// # Preconditions
///
/// `pop_prefix` / `pop_options` / `close_pre_formatted` must be balanced by
/// earlier pushes and opens. Unbalanced pops are not treated as errors: the
/// composer logs a warning and leaves its state as it was.
pub struct LineComposer {
    lines: Vec<Line>,
    open: String,
    pending: Pending,
    prefixes: PrefixState,
    options: OptionStack,
    /// One entry per open pre-formatted region: its `keep_indent` flag.
    pre_formatted: Vec<bool>,
    line_on_first_text: bool,
    eol_listeners: Vec<(ListenerId, EolListener)>,
    next_listener: u64,
    max_blank_lines: usize,
    max_trailing_blank_lines: usize,
    sink: Option<Box<dyn io::Write>>,
    /// Committed lines already written to `sink`.
    flushed: usize,
}

impl Default for LineComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LineComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineComposer")
            .field("lines", &self.lines)
            .field("open", &self.open)
            .field("pending", &self.pending)
            .field("prefixes", &self.prefixes)
            .field("options", &self.options)
            .field("pre_formatted", &self.pre_formatted)
            .field("eol_listeners", &self.eol_listeners.len())
            .field("flushed", &self.flushed)
            .finish_non_exhaustive()
    }
}

impl LineComposer {
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    pub fn with_options(options: ComposerOptions) -> Self {
        Self::with_config(ComposerConfig {
            options,
            ..ComposerConfig::default()
        })
    }

    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            lines: Vec::new(),
            open: String::new(),
            pending: Pending::default(),
            prefixes: PrefixState::new(config.indent_prefix),
            options: OptionStack::new(config.options),
            pre_formatted: Vec::new(),
            line_on_first_text: false,
            eol_listeners: Vec::new(),
            next_listener: 0,
            max_blank_lines: config.max_blank_lines,
            max_trailing_blank_lines: config.max_trailing_blank_lines,
            sink: config.sink,
            flushed: 0,
        }
    }

    // Appending

    pub fn append(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.push_char(c);
        }
        self
    }

    pub fn append_char(&mut self, c: char) -> &mut Self {
        self.push_char(c);
        self
    }

    pub fn append_repeated(&mut self, c: char, count: usize) -> &mut Self {
        for _ in 0..count {
            self.push_char(c);
        }
        self
    }

    fn is_verbatim(&self) -> bool {
        self.is_pre_formatted() || self.options.contains(ComposerOptions::PASS_THROUGH)
    }

    fn push_char(&mut self, c: char) {
        let opts = self.options.current();
        match c {
            '\r' => {}
            '\n' => self.eol_char(),
            _ if self.is_verbatim() => self.push_text(c),
            ' ' => self.push_space(1),
            '\t' if opts.contains(ComposerOptions::CONVERT_TABS) => {
                let width = TAB_WIDTH - self.column() % TAB_WIDTH;
                self.push_space(width);
            }
            '\t' if opts.contains(ComposerOptions::COLLAPSE_WHITESPACE) => self.push_space(1),
            '\t' => {
                if self.pending.is_line_start()
                    && opts.contains(ComposerOptions::TRIM_LEADING_WHITESPACE)
                {
                    return;
                }
                self.push_text(c);
            }
            _ => self.push_text(c),
        }
    }

    fn push_space(&mut self, count: usize) {
        let opts = self.options.current();
        let collapse = opts.contains(ComposerOptions::COLLAPSE_WHITESPACE);
        if !self.pending.is_line_start() {
            self.pending = self.pending.defer_spaces(count, collapse);
            return;
        }
        if opts.contains(ComposerOptions::TRIM_LEADING_WHITESPACE) {
            return;
        }
        // Kept leading whitespace is content in its own right.
        let count = if collapse { 1 } else { count };
        self.open.extend(std::iter::repeat_n(' ', count));
        self.pending = Pending::Content;
    }

    fn push_text(&mut self, c: char) {
        if self.line_on_first_text && !c.is_whitespace() {
            self.line_on_first_text = false;
            self.line();
        }
        let collapse = self.options.contains(ComposerOptions::COLLAPSE_WHITESPACE);
        let spaces = if collapse && self.open.ends_with(' ') {
            0
        } else {
            self.pending.spaces()
        };
        self.open.extend(std::iter::repeat_n(' ', spaces));
        self.open.push(c);
        self.pending = Pending::Content;
    }

    fn eol_char(&mut self) {
        self.discard_blank_open_line();
        if self.is_verbatim() || !self.pending.is_line_start() {
            self.terminate_line(None);
        } else {
            self.push_blank_line();
        }
    }

    // Line termination

    /// Terminates the open line if it has content. The next line starts with
    /// the current prefix.
    pub fn line(&mut self) -> &mut Self {
        self.discard_blank_open_line();
        if !self.pending.is_line_start() {
            self.terminate_line(None);
        }
        self
    }

    pub fn line_if(&mut self, predicate: bool) -> &mut Self {
        if predicate {
            self.line();
        }
        self
    }

    /// Terminates the open line keeping `count` trailing spaces, as needed
    /// for a markdown hard break. No-op on an empty line.
    pub fn line_with_trailing_spaces(&mut self, count: usize) -> &mut Self {
        self.discard_blank_open_line();
        if !self.pending.is_line_start() {
            self.terminate_line(Some(count));
        }
        self
    }

    /// While armed, the next non-whitespace text first terminates the open
    /// line. Fires once.
    pub fn line_on_first_text(&mut self, armed: bool) -> &mut Self {
        self.line_on_first_text = armed;
        self
    }

    /// Terminates the open line and makes sure a single blank line follows.
    pub fn blank_line(&mut self) -> &mut Self {
        self.blank_lines(1)
    }

    pub fn blank_line_if(&mut self, predicate: bool) -> &mut Self {
        if predicate {
            self.blank_line();
        }
        self
    }

    /// Terminates the open line and makes sure at least `count` blank lines
    /// follow. Blank lines already at the tail count toward the target.
    pub fn blank_lines(&mut self, count: usize) -> &mut Self {
        self.line();
        let existing = self.trailing_blank_lines();
        for _ in existing..count {
            self.push_blank_line();
        }
        self
    }

    /// Kept leading whitespace makes the open line look like content. If
    /// nothing else followed it, drop it and return to the line start, so
    /// the line ends up blank rather than content.
    fn discard_blank_open_line(&mut self) {
        if self.pending.is_line_start() || self.is_verbatim() || !self.open.trim().is_empty() {
            return;
        }
        log::trace!("dropping whitespace-only open line");
        self.open.clear();
        self.pending = Pending::AtLineStart { eols: 0 };
        self.resync_pending();
    }

    fn trailing_blank_lines(&self) -> usize {
        if !self.pending.is_line_start() {
            return 0;
        }
        self.lines.iter().rev().take_while(|l| l.is_blank()).count()
    }

    fn push_blank_line(&mut self) {
        let leading = self.trailing_blank_lines() == self.lines.len();
        if leading
            && !self.is_verbatim()
            && !self.options.contains(ComposerOptions::ALLOW_LEADING_EOL)
        {
            log::trace!("suppressing leading blank line");
            return;
        }
        self.terminate_line(None);
    }

    fn open_line_prefix(&self) -> Cow<'_, str> {
        match self.pre_formatted.last() {
            None => Cow::Borrowed(self.prefixes.before_eol_prefix()),
            Some(_) if self.options.contains(ComposerOptions::PREFIX_PRE_FORMATTED) => {
                Cow::Borrowed(self.prefixes.before_eol_prefix())
            }
            Some(true) => Cow::Owned(self.prefixes.indent_component()),
            Some(false) => Cow::Borrowed(""),
        }
    }

    fn terminate_line(&mut self, keep_trailing: Option<usize>) {
        let verbatim = self.is_verbatim();
        let mut text = std::mem::take(&mut self.open);
        let pending_spaces = self.pending.spaces();

        let trailing_spaces = match keep_trailing {
            Some(count) => {
                text.truncate(text.trim_end().len());
                count
            }
            None if verbatim
                || !self
                    .options
                    .contains(ComposerOptions::TRIM_TRAILING_WHITESPACE) =>
            {
                text.extend(std::iter::repeat_n(' ', pending_spaces));
                0
            }
            None => {
                text.truncate(text.trim_end().len());
                0
            }
        };

        let line = Line {
            prefix: self.open_line_prefix().into_owned(),
            text,
            trailing_spaces,
            preformatted: self.is_pre_formatted(),
        };
        log::trace!("commit line {}: {:?}", self.lines.len(), line.full_text());

        let had_content = !self.pending.is_line_start();
        self.lines.push(line);
        self.prefixes.at_eol();
        self.pending = if had_content {
            Pending::AtLineStart { eols: 1 }
        } else {
            self.pending.after_eol()
        };

        if had_content {
            self.fire_eol_listeners();
        }
    }

    fn fire_eol_listeners(&mut self) {
        if self.eol_listeners.is_empty() {
            return;
        }
        let listeners = std::mem::take(&mut self.eol_listeners);
        log::debug!("running {} first-EOL listener(s)", listeners.len());
        for (_, listener) in listeners {
            listener(self);
        }
    }

    /// Recomputes the EOL count after the tail of the buffer was edited.
    pub(crate) fn resync_pending(&mut self) {
        if !self.pending.is_line_start() {
            return;
        }
        let blank = self.lines.iter().rev().take_while(|l| l.is_blank()).count();
        let eols = if blank == self.lines.len() {
            blank
        } else {
            blank + 1
        };
        self.pending = Pending::AtLineStart { eols };
    }

    // Prefixes

    /// Effective prefix for new lines.
    pub fn prefix(&self) -> &str {
        self.prefixes.prefix()
    }

    /// Prefix the open line will be committed with.
    pub fn before_eol_prefix(&self) -> &str {
        self.prefixes.before_eol_prefix()
    }

    /// Replaces the prefix. With `after_eol` the open line keeps its prefix
    /// and the change applies from the next line; at the start of a line
    /// the open line is that next line, so the change applies at once.
    pub fn set_prefix(&mut self, prefix: &str, after_eol: bool) -> &mut Self {
        let after_eol = after_eol && !self.pending.is_line_start();
        self.prefixes.set(prefix, after_eol);
        self
    }

    pub fn add_prefix(&mut self, prefix: &str, after_eol: bool) -> &mut Self {
        let after_eol = after_eol && !self.pending.is_line_start();
        self.prefixes.add(prefix, after_eol);
        self
    }

    pub fn push_prefix(&mut self) -> &mut Self {
        self.prefixes.push();
        log::debug!("push prefix {:?} (depth {})", self.prefix(), self.prefixes.depth());
        self
    }

    /// Restores the prefix saved by the matching [`push_prefix`](Self::push_prefix).
    pub fn pop_prefix(&mut self, after_eol: bool) -> &mut Self {
        let after_eol = after_eol && !self.pending.is_line_start();
        if self.prefixes.pop(after_eol) {
            log::debug!("pop prefix {:?} (depth {})", self.prefix(), self.prefixes.depth());
        } else {
            log::warn!("pop_prefix without matching push_prefix");
        }
        self
    }

    pub fn after_eol_prefix_delta(&self) -> isize {
        self.prefixes.after_eol_delta()
    }

    pub fn indent_prefix(&self) -> &str {
        self.prefixes.indent_prefix()
    }

    pub fn set_indent_prefix(&mut self, indent: &str) -> &mut Self {
        self.prefixes.set_indent_prefix(indent);
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.line();
        let indent = self.prefixes.indent_prefix().to_owned();
        self.prefixes.add(&indent, false);
        self
    }

    pub fn un_indent(&mut self) -> &mut Self {
        self.line();
        self.remove_indent(false);
        self
    }

    /// Removes one indent unit without terminating the open line. If the
    /// line has content, the removal takes effect after its EOL.
    pub fn un_indent_no_eol(&mut self) -> &mut Self {
        let after_eol = !self.pending.is_line_start();
        self.remove_indent(after_eol);
        self
    }

    fn remove_indent(&mut self, after_eol: bool) {
        match self.prefixes.without_indent() {
            Some(prefix) => self.prefixes.set(&prefix, after_eol),
            None => log::warn!(
                "un-indent: prefix {:?} does not end with indent {:?}",
                self.prefix(),
                self.indent_prefix()
            ),
        }
    }

    /// Registers a one-shot callback run right after the next EOL that
    /// terminates a content line. Typically used to indent continuation lines
    /// only once content actually wraps.
    pub fn add_indent_on_first_eol(
        &mut self,
        listener: impl FnOnce(&mut LineComposer) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.eol_listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a listener that has not fired yet. Returns whether it was
    /// still pending.
    pub fn remove_indent_on_first_eol(&mut self, id: ListenerId) -> bool {
        let before = self.eol_listeners.len();
        self.eol_listeners.retain(|(listener_id, _)| *listener_id != id);
        self.eol_listeners.len() != before
    }

    // Options

    pub fn options(&self) -> ComposerOptions {
        self.options.current()
    }

    pub fn set_options(&mut self, options: ComposerOptions) -> &mut Self {
        self.options.set(options);
        self
    }

    pub fn change_options(
        &mut self,
        add: ComposerOptions,
        remove: ComposerOptions,
    ) -> &mut Self {
        self.options.change(add, remove);
        self
    }

    pub fn push_options(&mut self) -> &mut Self {
        self.options.push();
        self
    }

    pub fn pop_options(&mut self) -> &mut Self {
        if !self.options.pop() {
            log::warn!("pop_options without matching push_options");
        }
        self
    }

    // Pre-formatted regions

    /// Enters verbatim mode. Text is stored byte for byte and every `\n`
    /// terminates a line. Verbatim lines get the full prefix when
    /// [`ComposerOptions::PREFIX_PRE_FORMATTED`] is set, otherwise only the
    /// indentation part if `keep_indent`, otherwise none.
    pub fn open_pre_formatted(&mut self, keep_indent: bool) -> &mut Self {
        self.pre_formatted.push(keep_indent);
        log::debug!("open pre-formatted (nesting {})", self.pre_formatted.len());
        self
    }

    pub fn close_pre_formatted(&mut self) -> &mut Self {
        if self.pre_formatted.pop().is_some() {
            log::debug!("close pre-formatted (nesting {})", self.pre_formatted.len());
        } else {
            log::warn!("close_pre_formatted without matching open_pre_formatted");
        }
        self
    }

    pub fn is_pre_formatted(&self) -> bool {
        !self.pre_formatted.is_empty()
    }

    // Pending state

    pub fn pending_space(&self) -> usize {
        self.pending.spaces()
    }

    pub fn is_pending_space(&self) -> bool {
        self.pending_space() > 0
    }

    /// Line breaks at the tail of the output since the last content.
    pub fn pending_eol(&self) -> usize {
        self.pending.eols()
    }

    /// Character column on the open line, deferred spaces included.
    pub fn column(&self) -> usize {
        self.open.chars().count() + self.pending.spaces()
    }
}

#[cfg(test)]
mod tests;
