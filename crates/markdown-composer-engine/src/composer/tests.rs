use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn render_all(c: &LineComposer) -> String {
    c.to_string_with(true, usize::MAX, usize::MAX)
}

// Whitespace handling

#[test]
fn collapses_and_trims_by_default() {
    let mut c = LineComposer::new();
    c.append("   leading  and\t\ttabs   ").line();
    assert_eq!(c.get_line(0).unwrap(), "leading and tabs");
}

#[test]
fn pending_spaces_materialize_on_text() {
    let mut c = LineComposer::with_options(ComposerOptions::TRIM_TRAILING_WHITESPACE);
    c.append("a");
    c.append("   ");
    assert!(c.is_pending_space());
    assert_eq!(c.pending_space(), 3);
    c.append("b");
    assert_eq!(c.pending_space(), 0);
    c.append("  ").line();
    assert_eq!(c.get_line(0).unwrap(), "a   b");
}

#[test]
fn trailing_spaces_kept_without_trim() {
    let mut c = LineComposer::with_options(ComposerOptions::empty());
    c.append("a  ").line();
    assert_eq!(c.get_line(0).unwrap(), "a  ");
}

#[test]
fn leading_whitespace_kept_without_trim() {
    let mut c = LineComposer::with_options(ComposerOptions::COLLAPSE_WHITESPACE);
    c.append("    x").line();
    assert_eq!(c.get_line(0).unwrap(), " x");
}

#[test]
fn whitespace_only_lines_are_blank_not_content() {
    let mut c = LineComposer::with_options(
        ComposerOptions::COLLAPSE_WHITESPACE | ComposerOptions::TRIM_TRAILING_WHITESPACE,
    );
    c.append("   \n   \nx").line();
    assert_eq!(c.line_count(), 1);
    assert_eq!(render_all(&c), "x\n");

    c.append("  \n");
    assert_eq!(c.line_count(), 2);
    assert!(c.get_line_info(1).unwrap().is_blank);
    assert_eq!(c.pending_eol(), 2);
}

#[test]
fn line_on_whitespace_only_open_line_is_noop() {
    let mut c = LineComposer::with_options(ComposerOptions::COLLAPSE_WHITESPACE);
    c.append("a").line().append("  ").line();
    assert_eq!(c.line_count(), 1);
    assert_eq!(c.pending_eol(), 1);
    c.append("  ").line_with_trailing_spaces(2);
    assert_eq!(c.line_count(), 1);
}

#[test]
fn whitespace_only_line_does_not_fire_listeners() {
    let fired = Rc::new(Cell::new(0));
    let mut c = LineComposer::with_options(ComposerOptions::empty());
    c.append("item").line();
    let counter = Rc::clone(&fired);
    c.add_indent_on_first_eol(move |_| counter.set(counter.get() + 1));
    c.append("   \n");
    assert_eq!(fired.get(), 0);
    c.append("text\n");
    assert_eq!(fired.get(), 1);
}

#[test]
fn tabs_expand_to_tab_stops() {
    let mut c = LineComposer::with_options(
        ComposerOptions::CONVERT_TABS | ComposerOptions::TRIM_TRAILING_WHITESPACE,
    );
    c.append("ab\tc").line();
    assert_eq!(c.get_line(0).unwrap(), "ab  c");
}

#[test]
fn literal_tab_without_conversion() {
    let mut c = LineComposer::with_options(ComposerOptions::empty());
    c.append("a\tb").line();
    assert_eq!(c.get_line(0).unwrap(), "a\tb");
}

#[test]
fn pass_through_stores_text_verbatim() {
    let mut c = LineComposer::with_options(ComposerOptions::PASS_THROUGH);
    c.set_prefix("> ", false);
    c.append("  a   b  \n\n");
    assert_eq!(c.line_count(), 2);
    assert_eq!(c.get_line(0).unwrap(), ">   a   b  ");
    assert_eq!(c.get_line(1).unwrap(), "> ");
}

#[test]
fn carriage_returns_are_dropped() {
    let mut c = LineComposer::new();
    c.append("a\r\nb\r\n");
    assert_eq!(render_all(&c), "a\nb\n");
}

// Line termination

#[test]
fn line_is_noop_on_empty_line() {
    let mut c = LineComposer::new();
    c.line().line();
    assert_eq!(c.line_count(), 0);
    c.append("x").line().line();
    assert_eq!(c.line_count(), 1);
    assert_eq!(c.pending_eol(), 1);
}

#[test]
fn line_if_honours_predicate() {
    let mut c = LineComposer::new();
    c.append("x").line_if(false);
    assert_eq!(c.line_count(), 0);
    c.line_if(true);
    assert_eq!(c.line_count(), 1);
}

#[test]
fn hard_break_keeps_trailing_spaces() {
    let mut c = LineComposer::new();
    c.append("hard   ").line_with_trailing_spaces(2);
    c.append("next").line();
    let info = c.get_line_info(0).unwrap();
    assert_eq!(info.text, "hard");
    assert_eq!(info.trailing_spaces, 2);
    assert_eq!(render_all(&c), "hard  \nnext\n");
}

#[test]
fn newlines_in_text_commit_lines() {
    let mut c = LineComposer::new();
    c.append("one\ntwo\n\n\nthree");
    assert_eq!(c.line_count(), 4);
    assert_eq!(c.to_string_with(true, 1, 0), "one\ntwo\n\nthree");
}

#[test]
fn line_on_first_text_defers_break() {
    let mut c = LineComposer::new();
    c.append("Term:").line_on_first_text(true);
    c.append("  ");
    assert_eq!(c.line_count(), 0);
    c.append("definition").line();
    assert_eq!(render_all(&c), "Term:\ndefinition\n");
}

#[test]
fn line_on_first_text_can_be_disarmed() {
    let mut c = LineComposer::new();
    c.append("a").line_on_first_text(true).line_on_first_text(false);
    c.append("b").line();
    assert_eq!(render_all(&c), "ab\n");
}

// Blank lines

#[test]
fn blank_lines_do_not_accumulate() {
    let mut c = LineComposer::new();
    c.append("a").blank_line().blank_line().blank_lines(2).blank_line();
    assert_eq!(c.line_count(), 3);
    assert_eq!(c.pending_eol(), 3);
}

#[test]
fn blank_line_if_honours_predicate() {
    let mut c = LineComposer::new();
    c.append("a").line().blank_line_if(false);
    assert_eq!(c.line_count(), 1);
    c.blank_line_if(true);
    assert_eq!(c.line_count(), 2);
}

#[test]
fn leading_blank_lines_suppressed() {
    let mut c = LineComposer::new();
    c.blank_lines(3).append("\n\n");
    assert_eq!(c.line_count(), 0);
    assert_eq!(c.pending_eol(), 0);
}

#[test]
fn leading_blank_lines_allowed_by_option() {
    let mut c = LineComposer::with_options(
        ComposerOptions::FORMAT_ALL | ComposerOptions::ALLOW_LEADING_EOL,
    );
    c.blank_lines(2).append("x").line();
    assert_eq!(render_all(&c), "\n\nx\n");
}

#[test]
fn blank_line_uses_current_prefix() {
    let mut c = LineComposer::new();
    c.set_prefix("> ", false);
    c.append("a").blank_line();
    assert_eq!(c.get_line_info(1).unwrap().prefix, "> ");
}

// Prefixes

#[test]
fn prefix_applies_at_commit() {
    let mut c = LineComposer::new();
    c.append("x");
    c.set_prefix("> ", false);
    c.line();
    assert_eq!(c.get_line(0).unwrap(), "> x");
}

#[test]
fn after_eol_prefix_waits_for_next_line() {
    let mut c = LineComposer::new();
    c.set_prefix("- ", false);
    c.append("item");
    c.set_prefix("  ", true);
    assert_eq!(c.prefix(), "  ");
    assert_eq!(c.before_eol_prefix(), "- ");
    assert_eq!(c.after_eol_prefix_delta(), 0);
    c.line().append("continued").line();
    assert_eq!(render_all(&c), "- item\n  continued\n");
}

#[test]
fn after_eol_delta_reports_length_change() {
    let mut c = LineComposer::new();
    c.append("x");
    c.add_prefix(">> ", true);
    assert_eq!(c.after_eol_prefix_delta(), 3);
    c.line();
    assert_eq!(c.after_eol_prefix_delta(), 0);
}

#[test]
fn after_eol_at_line_start_applies_immediately() {
    let mut c = LineComposer::new();
    c.add_prefix("> ", true);
    c.append("x").line();
    assert_eq!(c.get_line(0).unwrap(), "> x");
}

#[test]
fn push_pop_prefix_restores() {
    let mut c = LineComposer::new();
    c.set_prefix("> ", false);
    c.push_prefix();
    c.add_prefix("- ", false).append("nested").line();
    c.set_prefix("!!", false);
    c.pop_prefix(false);
    assert_eq!(c.prefix(), "> ");
    c.append("outer").line();
    assert_eq!(render_all(&c), "> - nested\n> outer\n");
}

#[test]
fn pop_prefix_after_eol_keeps_open_line() {
    let mut c = LineComposer::new();
    c.push_prefix();
    c.add_prefix("- ", false).append("item");
    c.pop_prefix(true);
    c.line().append("after").line();
    assert_eq!(render_all(&c), "- item\nafter\n");
}

#[test]
fn pop_prefix_underflow_is_ignored() {
    let mut c = LineComposer::new();
    c.set_prefix("> ", false);
    c.pop_prefix(false);
    assert_eq!(c.prefix(), "> ");
}

// Indentation

#[test]
fn indent_and_un_indent() {
    let mut c = LineComposer::new();
    c.set_indent_prefix("  ");
    c.append("a").indent().append("b").un_indent().append("c").line();
    assert_eq!(render_all(&c), "a\n  b\nc\n");
    assert_eq!(c.indent_prefix(), "  ");
}

#[test]
fn un_indent_no_eol_mid_line() {
    let mut c = LineComposer::new();
    c.set_indent_prefix("  ");
    c.indent().append("inner");
    c.un_indent_no_eol();
    assert_eq!(c.prefix(), "");
    assert_eq!(c.before_eol_prefix(), "  ");
    c.line().append("outer").line();
    assert_eq!(render_all(&c), "  inner\nouter\n");
}

#[test]
fn un_indent_without_indent_keeps_prefix() {
    let mut c = LineComposer::new();
    c.set_prefix("> ", false);
    c.un_indent();
    assert_eq!(c.prefix(), "> ");
}

#[test]
fn indent_on_first_eol_fires_once() {
    let mut c = LineComposer::new();
    c.set_indent_prefix("  ");
    c.append("- item");
    c.add_indent_on_first_eol(|c| {
        c.indent();
    });
    assert_eq!(c.prefix(), "");
    c.line();
    assert_eq!(c.prefix(), "  ");
    c.append("wrapped").line().append("more").line();
    assert_eq!(render_all(&c), "- item\n  wrapped\n  more\n");
}

#[test]
fn removed_listener_never_fires() {
    let fired = Rc::new(Cell::new(false));
    let mut c = LineComposer::new();
    let flag = fired.clone();
    let id = c.add_indent_on_first_eol(move |_| flag.set(true));
    assert!(c.remove_indent_on_first_eol(id));
    assert!(!c.remove_indent_on_first_eol(id));
    c.append("x").line();
    assert!(!fired.get());
}

#[test]
fn listener_survives_un_indent_no_eol() {
    let fired = Rc::new(Cell::new(0));
    let mut c = LineComposer::new();
    c.set_indent_prefix("  ");
    c.indent().append("a");
    let count = fired.clone();
    c.add_indent_on_first_eol(move |_| count.set(count.get() + 1));
    c.un_indent_no_eol();
    c.line().append("b").line();
    assert_eq!(fired.get(), 1);
}

// Options

#[test]
fn push_pop_options_scopes_changes() {
    let mut c = LineComposer::new();
    c.push_options();
    c.change_options(ComposerOptions::PASS_THROUGH, ComposerOptions::COLLAPSE_WHITESPACE);
    c.append("a   b").line();
    c.pop_options();
    assert_eq!(c.options(), ComposerOptions::FORMAT_ALL);
    c.append("c   d").line();
    assert_eq!(render_all(&c), "a   b\nc d\n");
}

#[test]
fn set_options_replaces_everything() {
    let mut c = LineComposer::new();
    c.set_options(ComposerOptions::ALLOW_LEADING_EOL);
    assert_eq!(c.options(), ComposerOptions::ALLOW_LEADING_EOL);
}

// Pre-formatted regions

#[test]
fn pre_formatted_text_is_literal() {
    let mut c = LineComposer::new();
    c.append("```").line();
    c.open_pre_formatted(false);
    assert!(c.is_pre_formatted());
    c.append("  fn main() {\t\n\n\n  }   \n");
    c.close_pre_formatted();
    assert!(!c.is_pre_formatted());
    c.append("```").line();
    assert_eq!(
        c.to_string_with(true, 0, 0),
        "```\n  fn main() {\t\n\n\n  }   \n```\n"
    );
}

#[test]
fn pre_formatted_drops_prefix_by_default() {
    let mut c = LineComposer::new();
    c.set_prefix("  > ", false);
    c.open_pre_formatted(false).append("code\n").close_pre_formatted();
    c.open_pre_formatted(true).append("kept\n").close_pre_formatted();
    assert_eq!(c.get_line(0).unwrap(), "code");
    assert_eq!(c.get_line(1).unwrap(), "  kept");
}

#[test]
fn keep_indent_honours_indent_inside_quote() {
    let mut c = LineComposer::new();
    c.set_prefix("> ", false);
    c.indent();
    assert_eq!(c.prefix(), ">     ");
    c.open_pre_formatted(true).append("code\n").close_pre_formatted();
    assert_eq!(c.get_line(0).unwrap(), "    code");
}

#[test]
fn pre_formatted_with_full_prefix_option() {
    let mut c = LineComposer::with_options(
        ComposerOptions::FORMAT_ALL | ComposerOptions::PREFIX_PRE_FORMATTED,
    );
    c.set_prefix("> ", false);
    c.open_pre_formatted(false).append("x  \n\n").close_pre_formatted();
    assert_eq!(c.get_line(0).unwrap(), "> x  ");
    assert_eq!(c.get_line(1).unwrap(), "> ");
    assert!(c.get_line_info(1).unwrap().preformatted);
}

#[test]
fn pre_formatted_nesting() {
    let mut c = LineComposer::new();
    c.open_pre_formatted(false).open_pre_formatted(false);
    c.close_pre_formatted();
    assert!(c.is_pre_formatted());
    c.close_pre_formatted().close_pre_formatted();
    assert!(!c.is_pre_formatted());
}

// Queries

#[test]
fn column_counts_chars() {
    let mut c = LineComposer::new();
    c.append("héllo ");
    assert_eq!(c.column(), 6);
}

#[test]
fn append_repeated_and_char() {
    let mut c = LineComposer::new();
    c.append_repeated('-', 3).append_char('x').line();
    assert_eq!(c.get_line(0).unwrap(), "---x");
}

#[test]
fn display_uses_configured_limits() {
    let mut c = LineComposer::with_config(ComposerConfig {
        max_blank_lines: 2,
        max_trailing_blank_lines: 1,
        ..ComposerConfig::default()
    });
    c.append("a").blank_lines(4).append("b").blank_lines(4);
    assert_eq!(c.to_string(), "a\n\n\nb\n\n");
}
