// Shared by the bench targets in this directory; each target only uses part
// of it, so the dead code lint fires per target.
#[allow(dead_code)]
pub fn generate_paragraphs(count: usize) -> String {
    let base = "Paragraph with   uneven\tspacing and a trailing run   \n\n\n";
    base.repeat(count)
}

#[allow(dead_code)]
pub fn generate_nested_quotes(sections: usize, depth: usize) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    for section in 0..sections {
        for level in 0..=depth {
            lines.push((level, format!("Section {section} at quote level {level}")));
            lines.push((level, String::new()));
        }
    }
    lines
}
