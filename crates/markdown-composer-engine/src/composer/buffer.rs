use std::ops::{Bound, Range, RangeBounds};

use super::LineComposer;
use crate::error::{ComposerError, ComposerResult};
use crate::line::{Line, LineInfo};

impl LineComposer {
    /// Number of committed lines. The open line is not counted.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn check_index(&self, index: usize) -> ComposerResult<()> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(ComposerError::IndexOutOfRange {
                index,
                line_count: self.lines.len(),
            })
        }
    }

    /// Resolves a line window against the buffer. Both bounds must lie in
    /// `0..=line_count` and be ordered.
    pub(crate) fn resolve_range(&self, range: impl RangeBounds<usize>) -> ComposerResult<Range<usize>> {
        let line_count = self.lines.len();
        let past = |index: usize| {
            index
                .checked_add(1)
                .ok_or(ComposerError::IndexOutOfRange { index, line_count })
        };
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => past(s)?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => past(e)?,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => line_count,
        };
        if end > line_count {
            return Err(ComposerError::IndexOutOfRange {
                index: end,
                line_count,
            });
        }
        if start > end {
            return Err(ComposerError::IndexOutOfRange {
                index: start,
                line_count,
            });
        }
        Ok(start..end)
    }

    /// Full text of a committed line: prefix, text and trailing spaces.
    pub fn get_line(&self, index: usize) -> ComposerResult<String> {
        self.check_index(index)?;
        Ok(self.lines[index].full_text())
    }

    pub fn get_line_info(&self, index: usize) -> ComposerResult<LineInfo> {
        self.check_index(index)?;
        Ok(LineInfo::new(index, &self.lines[index]))
    }

    /// Rewrites a committed line. Trailing spaces are cleared; the
    /// pre-formatted mark is kept.
    pub fn set_line(&mut self, index: usize, prefix: &str, text: &str) -> ComposerResult<()> {
        self.check_index(index)?;
        let line = &mut self.lines[index];
        prefix.clone_into(&mut line.prefix);
        text.clone_into(&mut line.text);
        line.trailing_spaces = 0;
        self.resync_pending();
        Ok(())
    }

    /// Moves the prefix/text boundary of a committed line to byte offset
    /// `prefix_len` of its prefix + text.
    pub fn set_prefix_length(&mut self, index: usize, prefix_len: usize) -> ComposerResult<()> {
        self.check_index(index)?;
        let line = &mut self.lines[index];
        let mut full = format!("{}{}", line.prefix, line.text);
        if !full.is_char_boundary(prefix_len) {
            return Err(ComposerError::PrefixOutOfRange {
                line: index,
                prefix_len,
                line_len: full.len(),
            });
        }
        line.text = full.split_off(prefix_len);
        line.prefix = full;
        self.resync_pending();
        Ok(())
    }

    /// Deletes a window of lines; later lines shift down.
    pub fn remove_lines(&mut self, range: impl RangeBounds<usize>) -> ComposerResult<&mut Self> {
        let range = self.resolve_range(range)?;
        log::debug!("removing lines {range:?}");
        let flushed = self.flushed;
        self.flushed -= range.end.min(flushed) - range.start.min(flushed);
        self.lines.drain(range);
        self.resync_pending();
        Ok(self)
    }

    /// Lazily maps each line of the window through `processor`, skipping
    /// blank lines at the end of the window beyond `max_trailing_blank_lines`.
    /// Call again to restart the traversal.
    pub fn for_all_lines<'a, T, F>(
        &'a self,
        max_trailing_blank_lines: usize,
        range: impl RangeBounds<usize>,
        mut processor: F,
    ) -> ComposerResult<impl Iterator<Item = T> + 'a>
    where
        F: FnMut(LineInfo) -> T + 'a,
    {
        let range = self.resolve_range(range)?;
        let trailing = self.lines[range.clone()]
            .iter()
            .rev()
            .take_while(|l| l.is_blank())
            .count();
        let end = range.end - trailing.saturating_sub(max_trailing_blank_lines);
        Ok((range.start..end).map(move |i| processor(LineInfo::new(i, &self.lines[i]))))
    }

    /// Appends the committed lines of `other` in `range` as new lines of this
    /// composer, each behind this composer's current prefix.
    pub fn append_lines(
        &mut self,
        other: &LineComposer,
        range: impl RangeBounds<usize>,
    ) -> ComposerResult<&mut Self> {
        let range = other.resolve_range(range)?;
        self.line();
        let outer = self.prefixes.before_eol_prefix().to_owned();
        for line in &other.lines[range] {
            let mut copied = line.clone();
            copied.prefix.insert_str(0, &outer);
            self.lines.push(copied);
        }
        self.resync_pending();
        Ok(self)
    }

    /// Bytes of committed output, prefixes and EOLs included.
    pub fn offset(&self) -> usize {
        self.lines.iter().map(|l| l.len() + 1).sum()
    }

    /// [`offset`](Self::offset) plus the open line and its deferred spaces.
    pub fn offset_with_pending(&self) -> usize {
        if self.pending.is_line_start() {
            return self.offset();
        }
        self.offset() + self.open_line_prefix().len() + self.open.len() + self.pending.spaces()
    }
}
