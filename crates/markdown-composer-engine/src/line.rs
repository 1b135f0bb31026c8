/// A committed output line.
///
/// The prefix is kept apart from the text so that prefixes can be rewritten
/// after the fact, or left out when rendering raw content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub prefix: String,
    pub text: String,
    /// Spaces kept after `text`, e.g. for a hard line break.
    pub trailing_spaces: usize,
    /// Committed while pre-formatted mode was open. Never counts as blank.
    pub preformatted: bool,
}

impl Line {
    pub fn new(prefix: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            text: text.into(),
            trailing_spaces: 0,
            preformatted: false,
        }
    }

    pub fn blank(prefix: impl Into<String>) -> Self {
        Self::new(prefix, String::new())
    }

    pub fn is_blank(&self) -> bool {
        !self.preformatted && self.text.trim().is_empty()
    }

    /// Byte length excluding the EOL.
    pub fn len(&self) -> usize {
        self.prefix.len() + self.text.len() + self.trailing_spaces
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn write_to(&self, out: &mut String, with_prefix: bool) {
        if with_prefix {
            out.push_str(&self.prefix);
        }
        out.push_str(&self.text);
        out.extend(std::iter::repeat_n(' ', self.trailing_spaces));
    }

    /// Prefix, text and trailing spaces as one string.
    pub fn full_text(&self) -> String {
        let mut out = String::with_capacity(self.len());
        self.write_to(&mut out, true);
        out
    }
}

/// Read-only view of a line together with its index in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    pub index: usize,
    pub prefix: String,
    pub text: String,
    pub trailing_spaces: usize,
    pub is_blank: bool,
    pub preformatted: bool,
}

impl LineInfo {
    pub fn new(index: usize, line: &Line) -> Self {
        Self {
            index,
            prefix: line.prefix.clone(),
            text: line.text.clone(),
            trailing_spaces: line.trailing_spaces,
            is_blank: line.is_blank(),
            preformatted: line.preformatted,
        }
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix.len()
    }

    pub fn text_len(&self) -> usize {
        self.text.len() + self.trailing_spaces
    }

    pub fn len(&self) -> usize {
        self.prefix_len() + self.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
