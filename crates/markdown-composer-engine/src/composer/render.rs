use std::fmt;
use std::io;
use std::ops::{Range, RangeBounds};

use xi_rope::Rope;

use super::LineComposer;
use crate::error::ComposerResult;

impl LineComposer {
    /// Indices in `window` that survive blank-line trimming. Interior runs
    /// keep their first `max_blank_lines`; the final run keeps
    /// `max_trailing_blank_lines`, unless content follows the window.
    fn surviving_lines(
        &self,
        window: Range<usize>,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
        content_follows: bool,
    ) -> Vec<usize> {
        let mut kept = Vec::with_capacity(window.len());
        let mut run = Vec::new();
        for index in window {
            if self.lines[index].is_blank() {
                run.push(index);
                continue;
            }
            kept.extend(run.drain(..).take(max_blank_lines));
            kept.push(index);
        }
        let limit = if content_follows {
            max_blank_lines
        } else {
            max_trailing_blank_lines
        };
        kept.extend(run.into_iter().take(limit));
        kept
    }

    /// The open line is rendered after the window when the window reaches
    /// the end of the buffer and the line has content.
    fn renders_open_line(&self, window: &Range<usize>) -> bool {
        window.end == self.lines.len() && !self.pending.is_line_start()
    }

    fn render_lines(
        &self,
        out: &mut String,
        with_prefixes: bool,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
        window: Range<usize>,
        content_follows: bool,
    ) {
        for index in self.surviving_lines(
            window,
            max_blank_lines,
            max_trailing_blank_lines,
            content_follows,
        ) {
            self.lines[index].write_to(out, with_prefixes);
            out.push('\n');
        }
    }

    fn render_window(
        &self,
        with_prefixes: bool,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
        window: Range<usize>,
    ) -> String {
        let open_line = self.renders_open_line(&window);
        let mut out = String::new();
        self.render_lines(
            &mut out,
            with_prefixes,
            max_blank_lines,
            max_trailing_blank_lines,
            window,
            open_line,
        );
        if open_line {
            if with_prefixes {
                out.push_str(&self.open_line_prefix());
            }
            out.push_str(&self.open);
        }
        out
    }

    /// Renders the window to `sink`. The buffer is not modified; sink errors
    /// are returned as they are.
    pub fn append_to<W: io::Write>(
        &self,
        sink: &mut W,
        with_prefixes: bool,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
        range: impl RangeBounds<usize>,
    ) -> ComposerResult<()> {
        let window = self.resolve_range(range)?;
        let text =
            self.render_window(with_prefixes, max_blank_lines, max_trailing_blank_lines, window);
        sink.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn to_sequence(
        &self,
        with_prefixes: bool,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
    ) -> Rope {
        Rope::from(self.to_string_with(with_prefixes, max_blank_lines, max_trailing_blank_lines))
    }

    pub fn to_string_with(
        &self,
        with_prefixes: bool,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
    ) -> String {
        self.render_window(
            with_prefixes,
            max_blank_lines,
            max_trailing_blank_lines,
            0..self.lines.len(),
        )
    }

    /// Applies the rendering blank-line limits to the buffer itself.
    pub fn remove_extra_blank_lines(
        &mut self,
        max_blank_lines: usize,
        max_trailing_blank_lines: usize,
        range: impl RangeBounds<usize>,
    ) -> ComposerResult<&mut Self> {
        let window = self.resolve_range(range)?;
        let open_line = self.renders_open_line(&window);
        let kept = self.surviving_lines(
            window.clone(),
            max_blank_lines,
            max_trailing_blank_lines,
            open_line,
        );
        let before = self.lines.len();
        let flushed = self.flushed;
        let mut removed_flushed = 0;
        let mut index = 0;
        self.lines.retain(|_| {
            let keep = !window.contains(&index) || kept.binary_search(&index).is_ok();
            if !keep && index < flushed {
                removed_flushed += 1;
            }
            index += 1;
            keep
        });
        self.flushed -= removed_flushed;
        log::debug!("removed {} extra blank line(s)", before - self.lines.len());
        self.resync_pending();
        Ok(self)
    }

    /// Writes committed lines not yet written to the construction sink, using
    /// the configured blank-line limits. A blank run at the tail and the open
    /// line are held back until later content shows whether the run is
    /// interior or trailing; [`finish`](Self::finish) writes them. Lines are
    /// written once, so edits to lines already flushed do not reach the sink.
    /// Without a sink this does nothing.
    pub fn flush(&mut self) -> ComposerResult<()> {
        if self.sink.is_none() {
            return Ok(());
        }
        let end = self
            .lines
            .iter()
            .rposition(|l| !l.is_blank())
            .map_or(0, |i| i + 1)
            .max(self.flushed);
        if end == self.flushed {
            return Ok(());
        }
        let mut text = String::new();
        self.render_lines(
            &mut text,
            true,
            self.max_blank_lines,
            self.max_trailing_blank_lines,
            self.flushed..end,
            true,
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(text.as_bytes())?;
            sink.flush()?;
        }
        log::debug!("flushed lines {}..{end}", self.flushed);
        self.flushed = end;
        Ok(())
    }

    /// Writes everything not flushed yet, trailing blank lines capped and the
    /// open line included, and releases the sink.
    pub fn finish(mut self) -> ComposerResult<()> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };
        let text = self.render_window(
            true,
            self.max_blank_lines,
            self.max_trailing_blank_lines,
            self.flushed..self.lines.len(),
        );
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

impl fmt::Display for LineComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(
            true,
            self.max_blank_lines,
            self.max_trailing_blank_lines,
        ))
    }
}
