//! Line-by-line markdown normalization: quote markers and leading indentation
//! become composer prefixes, fenced code is passed through verbatim, and
//! whitespace and blank lines are cleaned up by the composer.

use std::io;

use markdown_composer_config::{FormatSettings, Settings};
use markdown_composer_engine::{
    BLOCK_QUOTE_MARKER, BlockQuoteChildPrefix, ComposerConfig, ComposerOptions, MarkdownWriter,
    TAB_WIDTH,
};

const FENCES: [&str; 2] = ["```", "~~~"];

pub fn options_for(format: &FormatSettings) -> ComposerOptions {
    let mut options = ComposerOptions::empty();
    options.set(ComposerOptions::CONVERT_TABS, format.convert_tabs);
    options.set(ComposerOptions::COLLAPSE_WHITESPACE, format.collapse_whitespace);
    options.set(
        ComposerOptions::TRIM_TRAILING_WHITESPACE,
        format.trim_trailing_whitespace,
    );
    options.set(
        ComposerOptions::TRIM_LEADING_WHITESPACE,
        format.trim_leading_whitespace,
    );
    options.set(ComposerOptions::ALLOW_LEADING_EOL, format.allow_leading_eol);
    options
}

pub fn composer_config(settings: &Settings, sink: Option<Box<dyn io::Write>>) -> ComposerConfig {
    ComposerConfig {
        options: options_for(&settings.format),
        max_blank_lines: settings.max_blank_lines,
        max_trailing_blank_lines: settings.max_trailing_blank_lines,
        indent_prefix: settings.indent_prefix.clone(),
        sink,
    }
}

/// Counts leading quote markers, stopping after `max_depth`. Returns the
/// depth and the byte offset where the line content starts.
fn strip_quote_markers(line: &str, max_depth: usize) -> (usize, usize) {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut depth = 0;
    while depth < max_depth {
        let mut j = i;
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }
        if j >= bytes.len() || bytes[j] != BLOCK_QUOTE_MARKER as u8 {
            break;
        }
        depth += 1;
        i = j + 1;
        if i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
    }
    (depth, i)
}

fn quote_prefix(depth: usize) -> String {
    "> ".repeat(depth)
}

/// Display width of the leading whitespace, with tabs advancing to the next
/// tab stop.
fn leading_width(text: &str) -> usize {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH - width % TAB_WIDTH,
            _ => break,
        }
    }
    width
}

fn fence_marker(text: &str) -> Option<&'static str> {
    let text = text.trim_start();
    FENCES.into_iter().find(|fence| text.starts_with(fence))
}

fn is_hard_break(line: &str) -> bool {
    line.len() - line.trim_end_matches(' ').len() >= 2
}

/// Blank lines that close a quote level drop the innermost marker and any
/// trailing space.
fn closing_blank_prefix() -> BlockQuoteChildPrefix {
    BlockQuoteChildPrefix::Custom(Box::new(|prefix: &str| {
        BlockQuoteChildPrefix::StripLastMarker
            .child_prefix(prefix)
            .trim_end()
            .to_owned()
    }))
}

struct Fence {
    marker: &'static str,
    depth: usize,
    indent: usize,
}

/// Removes up to `width` leading spaces.
fn strip_indent(text: &str, width: usize) -> &str {
    let spaces = text.bytes().take(width).take_while(|&b| b == b' ').count();
    &text[spaces..]
}

/// Feeds `source` through a [`MarkdownWriter`] configured from `settings`.
pub fn compose(
    source: &str,
    settings: &Settings,
    sink: Option<Box<dyn io::Write>>,
) -> MarkdownWriter {
    let config = composer_config(settings, sink);
    let mut writer = MarkdownWriter::with_config(config, closing_blank_prefix());
    let mut depth = 0;
    let mut fence: Option<Fence> = None;

    for raw in source.lines() {
        if let Some(open) = &fence {
            let (_, offset) = strip_quote_markers(raw, open.depth);
            let body = strip_indent(&raw[offset..], open.indent);
            let closes = fence_marker(body) == Some(open.marker);
            writer.append(body).append_char('\n');
            if closes {
                writer.close_pre_formatted();
                fence = None;
            }
            continue;
        }

        let (line_depth, offset) = strip_quote_markers(raw, usize::MAX);
        let body = &raw[offset..];

        if body.trim().is_empty() {
            if line_depth < depth {
                writer.set_prefix(&quote_prefix(line_depth + 1), false);
                writer.tail_blank_line_once();
            } else {
                writer.set_prefix(quote_prefix(line_depth).trim_end(), false);
                writer.blank_line();
            }
            depth = line_depth;
            continue;
        }

        depth = line_depth;
        let width = leading_width(body);
        let text = body.trim_start();
        writer.set_prefix(&format!("{}{}", quote_prefix(depth), " ".repeat(width)), false);

        if let Some(marker) = fence_marker(text) {
            log::debug!("code fence {marker} at quote depth {depth}");
            writer.open_pre_formatted(true);
            writer.append(text).append_char('\n');
            fence = Some(Fence {
                marker,
                depth,
                indent: width,
            });
            continue;
        }

        writer.append(text);
        if is_hard_break(raw) {
            writer.line_with_trailing_spaces(2);
        } else {
            writer.line();
        }
    }

    if fence.is_some() {
        log::warn!("unterminated code fence at end of input");
        writer.close_pre_formatted();
    }
    writer
}
