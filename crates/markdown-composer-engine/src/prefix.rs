/// Leading text applied to each line: the effective prefix, the prefix the
/// open line will be committed with, saved prefixes, and the indent unit.
///
/// `current` applies to new lines. `before_eol` applies to the open line and
/// catches up with `current` at the next EOL, which is how "after EOL" prefix
/// changes are deferred.
#[derive(Debug, Clone, Default)]
pub struct PrefixState {
    current: String,
    before_eol: String,
    saved: Vec<String>,
    indent: String,
}

impl PrefixState {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            ..Self::default()
        }
    }

    pub fn prefix(&self) -> &str {
        &self.current
    }

    pub fn before_eol_prefix(&self) -> &str {
        &self.before_eol
    }

    pub fn set(&mut self, prefix: &str, after_eol: bool) {
        prefix.clone_into(&mut self.current);
        if !after_eol {
            self.before_eol.clone_from(&self.current);
        }
    }

    pub fn add(&mut self, text: &str, after_eol: bool) {
        let mut prefix = self.current.clone();
        prefix.push_str(text);
        self.set(&prefix, after_eol);
    }

    pub fn push(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Restores the last pushed prefix. Returns false on underflow.
    pub fn pop(&mut self, after_eol: bool) -> bool {
        match self.saved.pop() {
            Some(prefix) => {
                self.set(&prefix, after_eol);
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Called once a line has been committed.
    pub fn at_eol(&mut self) {
        self.before_eol.clone_from(&self.current);
    }

    /// Length difference the next EOL will apply to the prefix.
    pub fn after_eol_delta(&self) -> isize {
        self.current.len() as isize - self.before_eol.len() as isize
    }

    pub fn indent_prefix(&self) -> &str {
        &self.indent
    }

    pub fn set_indent_prefix(&mut self, indent: &str) {
        indent.clone_into(&mut self.indent);
    }

    /// The current prefix with one trailing indent unit removed, if it ends
    /// with one.
    pub fn without_indent(&self) -> Option<String> {
        if self.indent.is_empty() {
            return None;
        }
        self.current
            .strip_suffix(self.indent.as_str())
            .map(str::to_owned)
    }

    /// The indentation part of the open line's prefix: its whitespace with
    /// every marker (`>`, `-`, ...) and the one space that follows a marker
    /// removed. `"> "` + indent gives back the indent.
    pub fn indent_component(&self) -> String {
        let mut indent = String::with_capacity(self.before_eol.len());
        let mut after_marker = false;
        for c in self.before_eol.chars() {
            if !c.is_whitespace() {
                after_marker = true;
            } else if after_marker && c == ' ' {
                after_marker = false;
            } else {
                after_marker = false;
                indent.push(c);
            }
        }
        indent
    }
}
