use bitflags::bitflags;

bitflags! {
    /// Formatting flags consulted by the composer on every append and EOL.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComposerOptions: u16 {
        /// Expand tabs to spaces up to the next multiple of [`TAB_WIDTH`].
        const CONVERT_TABS = 1 << 0;
        /// Collapse runs of spaces and tabs to a single space.
        const COLLAPSE_WHITESPACE = 1 << 1;
        /// Drop whitespace at the end of a line when the line is terminated.
        const TRIM_TRAILING_WHITESPACE = 1 << 2;
        /// Drop whitespace at the start of a line.
        const TRIM_LEADING_WHITESPACE = 1 << 3;
        /// Store text without any whitespace processing. Prefixes still apply.
        const PASS_THROUGH = 1 << 4;
        /// Keep blank lines requested before any content.
        const ALLOW_LEADING_EOL = 1 << 5;
        /// Give pre-formatted lines the full current prefix.
        const PREFIX_PRE_FORMATTED = 1 << 6;

        const FORMAT_ALL = Self::CONVERT_TABS.bits()
            | Self::COLLAPSE_WHITESPACE.bits()
            | Self::TRIM_TRAILING_WHITESPACE.bits()
            | Self::TRIM_LEADING_WHITESPACE.bits();
    }
}

/// Tab stop used by [`ComposerOptions::CONVERT_TABS`].
pub const TAB_WIDTH: usize = 4;

impl Default for ComposerOptions {
    fn default() -> Self {
        Self::FORMAT_ALL
    }
}

/// The active option set plus saved snapshots for scoped changes.
#[derive(Debug, Clone, Default)]
pub struct OptionStack {
    current: ComposerOptions,
    saved: Vec<ComposerOptions>,
}

impl OptionStack {
    pub fn new(initial: ComposerOptions) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> ComposerOptions {
        self.current
    }

    pub fn contains(&self, flags: ComposerOptions) -> bool {
        self.current.contains(flags)
    }

    pub fn set(&mut self, flags: ComposerOptions) {
        self.current = flags;
    }

    /// Applies `add` after removing `remove`, so a flag in both ends up set.
    pub fn change(&mut self, add: ComposerOptions, remove: ComposerOptions) {
        self.current = (self.current - remove) | add;
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the most recent snapshot. Returns false on underflow, leaving
    /// the current set untouched.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(flags) => {
                self.current = flags;
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
