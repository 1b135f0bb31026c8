/// Whitespace requested on the open line but not yet committed.
///
/// Deferred spaces are materialized by the next non-whitespace append and
/// dropped (or kept as hard-break spaces) when the line is terminated, so
/// trailing whitespace never reaches the buffer by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// The open line is empty. `eols` counts the line breaks at the tail of
    /// the buffer since the last content (0 at the start of the document).
    AtLineStart { eols: usize },
    /// The open line has text and nothing is deferred.
    Content,
    /// The open line has text followed by this many deferred spaces.
    Spaces(usize),
}

impl Default for Pending {
    fn default() -> Self {
        Pending::AtLineStart { eols: 0 }
    }
}

impl Pending {
    pub fn is_line_start(self) -> bool {
        matches!(self, Pending::AtLineStart { .. })
    }

    pub fn spaces(self) -> usize {
        match self {
            Pending::Spaces(n) => n,
            _ => 0,
        }
    }

    pub fn eols(self) -> usize {
        match self {
            Pending::AtLineStart { eols } => eols,
            _ => 0,
        }
    }

    /// Defers `count` more spaces after existing content. With `collapse`,
    /// any run is held at a single space.
    pub fn defer_spaces(self, count: usize, collapse: bool) -> Self {
        let total = if collapse {
            1
        } else {
            self.spaces() + count
        };
        match self {
            Pending::AtLineStart { .. } => self,
            Pending::Content | Pending::Spaces(_) => Pending::Spaces(total),
        }
    }

    /// State after one more EOL has been committed.
    pub fn after_eol(self) -> Self {
        Pending::AtLineStart {
            eols: self.eols() + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_accumulate_without_collapse() {
        let p = Pending::Content.defer_spaces(2, false).defer_spaces(3, false);
        assert_eq!(p, Pending::Spaces(5));
    }

    #[test]
    fn collapse_holds_single_space() {
        let p = Pending::Content.defer_spaces(4, true).defer_spaces(2, true);
        assert_eq!(p.spaces(), 1);
    }

    #[test]
    fn line_start_does_not_defer() {
        let p = Pending::AtLineStart { eols: 2 }.defer_spaces(3, false);
        assert_eq!(p, Pending::AtLineStart { eols: 2 });
    }

    #[test]
    fn eol_counts_from_content() {
        assert_eq!(Pending::Spaces(2).after_eol(), Pending::AtLineStart { eols: 1 });
        assert_eq!(Pending::AtLineStart { eols: 1 }.after_eol().eols(), 2);
    }
}
