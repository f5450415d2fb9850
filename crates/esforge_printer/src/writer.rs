//! Output buffer with line/column tracking.

use esforge_core::text::{TextPos, TextRange};
use serde::{Deserialize, Serialize};

/// A generated position and the source offset it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Zero-based output line.
    pub generated_line: u32,
    /// Zero-based output column in UTF-16 code units.
    pub generated_column: u32,
    /// Byte offset in the original source.
    pub original: TextPos,
    /// Original identifier name, for identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub(crate) struct TextWriter {
    output: String,
    new_line: &'static str,
    indent_unit: String,
    indent_level: usize,
    minify: bool,
    line: u32,
    column: u32,
    at_line_start: bool,
    last_char: Option<char>,
    after_regex: bool,
    pending: Option<(TextPos, Option<String>)>,
    mappings: Vec<Mapping>,
}

impl TextWriter {
    pub(crate) fn new(minify: bool, indent: u8, new_line: &'static str) -> Self {
        Self {
            output: String::with_capacity(4096),
            new_line,
            indent_unit: " ".repeat(indent as usize),
            indent_level: 0,
            minify,
            line: 0,
            column: 0,
            at_line_start: true,
            last_char: None,
            after_regex: false,
            pending: None,
            mappings: Vec::new(),
        }
    }

    pub(crate) fn is_minified(&self) -> bool {
        self.minify
    }

    pub(crate) fn finish(self) -> (String, Vec<Mapping>) {
        (self.output, self.mappings)
    }

    pub(crate) fn is_at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Record a mapping at the start of the next token. The outermost node
    /// starting there wins; a name from an inner identifier is kept.
    pub(crate) fn mark(&mut self, range: TextRange, name: Option<&str>) {
        if range.is_dummy() {
            return;
        }
        match &mut self.pending {
            None => self.pending = Some((range.pos, name.map(str::to_string))),
            Some((pos, pending_name)) if *pos == range.pos && pending_name.is_none() => {
                *pending_name = name.map(str::to_string);
            }
            Some(_) => {}
        }
    }

    /// Write a token, separating it from the previous one when the two
    /// would otherwise merge.
    pub(crate) fn write(&mut self, text: &str) {
        let Some(first) = text.chars().next() else {
            return;
        };
        self.flush_indent();
        if let Some(last) = self.last_char {
            if needs_space(last, first) || (self.after_regex && is_word_char(first)) {
                self.push(" ");
            }
        }
        self.flush_mapping();
        self.push(text);
        self.after_regex = false;
    }

    /// Write text verbatim, without separating spaces.
    pub(crate) fn write_raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_indent();
        self.flush_mapping();
        self.push(text);
        self.after_regex = false;
    }

    pub(crate) fn write_regex(&mut self, text: &str) {
        self.write(text);
        self.after_regex = true;
    }

    /// Optional space; omitted when minifying.
    pub(crate) fn space(&mut self) {
        if !self.minify && !self.at_line_start {
            self.push(" ");
        }
    }

    /// Space written in both modes.
    pub(crate) fn hard_space(&mut self) {
        self.flush_indent();
        self.push(" ");
    }

    pub(crate) fn newline(&mut self) {
        if !self.minify && !self.at_line_start {
            self.push_line_break();
        }
    }

    /// Line break written in both modes (after line comments).
    pub(crate) fn hard_newline(&mut self) {
        self.push_line_break();
    }

    pub(crate) fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn push_line_break(&mut self) {
        let new_line = self.new_line;
        self.output.push_str(new_line);
        self.line += 1;
        self.column = 0;
        self.at_line_start = true;
        self.last_char = None;
        self.after_regex = false;
    }

    fn flush_indent(&mut self) {
        if self.at_line_start {
            self.at_line_start = false;
            if !self.minify && self.indent_level > 0 {
                let indent = self.indent_unit.repeat(self.indent_level);
                self.push(&indent);
            }
        }
    }

    fn flush_mapping(&mut self) {
        if let Some((original, name)) = self.pending.take() {
            self.mappings.push(Mapping {
                generated_line: self.line,
                generated_column: self.column,
                original,
                name,
            });
        }
    }

    fn push(&mut self, text: &str) {
        self.output.push_str(text);
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += ch.len_utf16() as u32;
            }
        }
        self.last_char = text.chars().last();
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\\' || !c.is_ascii()
}

/// Whether two adjacent characters would lex differently without a space.
fn needs_space(last: char, next: char) -> bool {
    (is_word_char(last) && (is_word_char(next) || next == '#'))
        || (last == '+' && next == '+')
        || (last == '-' && next == '-')
        || (last == '/' && (next == '/' || next == '*'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_separated() {
        let mut w = TextWriter::new(true, 2, "\n");
        w.write("return");
        w.write("x");
        w.write(";");
        assert_eq!(w.finish().0, "return x;");
    }

    #[test]
    fn test_operators_do_not_merge() {
        let mut w = TextWriter::new(true, 2, "\n");
        w.write("a");
        w.write("-");
        w.write("-");
        w.write("b");
        assert_eq!(w.finish().0, "a- -b");
    }

    #[test]
    fn test_columns_count_utf16() {
        let mut w = TextWriter::new(false, 2, "\n");
        w.write("\"😀\"");
        w.mark(TextRange::new(7, 8), None);
        w.write(";");
        let (_, mappings) = w.finish();
        assert_eq!(mappings[0].generated_column, 4);
    }

    #[test]
    fn test_indent_applies_at_line_start() {
        let mut w = TextWriter::new(false, 2, "\n");
        w.write("{");
        w.indent();
        w.newline();
        w.write("a;");
        w.dedent();
        w.newline();
        w.write("}");
        assert_eq!(w.finish().0, "{\n  a;\n}");
    }
}
