/// Tab-aware view over the line currently being processed
pub const TAB_STOP: usize = 4;

/// Advance `column` to the next tab stop
pub fn add_tab(column: usize) -> usize {
    (column / TAB_STOP + 1) * TAB_STOP
}

/// Sentinel returned when the cursor is past the end of the line
pub const END_OF_LINE: char = '\0';

#[derive(Debug, Clone, Default)]
pub struct LineCursor {
    text: String,
    /// Byte offset of the current character
    start: usize,
    /// Byte offset one past the last character that belongs to the line
    end: usize,
    /// Column of `start`, with tabs expanded
    column: usize,
    // Position right before the most recent run of leading whitespace
    column_before_indent: usize,
    start_before_indent: usize,
}

impl LineCursor {
    pub fn new() -> Self {
        LineCursor::default()
    }

    /// Point the cursor at the beginning of a new line
    pub fn reset(&mut self, line: &str) {
        self.text.clear();
        self.text.push_str(line);
        self.start = 0;
        self.end = self.text.len();
        self.column = 0;
        self.column_before_indent = 0;
        self.start_before_indent = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn column_before_indent(&self) -> usize {
        self.column_before_indent
    }

    pub fn start_before_indent(&self) -> usize {
        self.start_before_indent
    }

    /// Columns of whitespace consumed by the last indent run
    pub fn indent(&self) -> usize {
        self.column - self.column_before_indent
    }

    pub fn is_code_indent(&self) -> bool {
        self.indent() >= 4
    }

    /// The unconsumed part of the line
    pub fn remaining(&self) -> &str {
        &self.text[self.start..self.end]
    }

    /// Unconsumed text, with a partially consumed leading tab turned into
    /// the spaces that are left of it
    pub fn remaining_text(&self) -> String {
        let rest = self.remaining();
        if self.column % TAB_STOP != 0 && rest.starts_with('\t') {
            let width = add_tab(self.column) - self.column;
            let mut expanded = " ".repeat(width);
            expanded.push_str(&rest[1..]);
            expanded
        } else {
            rest.to_string()
        }
    }

    /// Shorten the line, e.g. to drop a closing heading sequence
    pub fn set_end(&mut self, end: usize) {
        self.end = end.clamp(self.start, self.text.len());
    }

    pub fn current_char(&self) -> char {
        self.remaining().chars().next().unwrap_or(END_OF_LINE)
    }

    /// Character `offset` positions after the current one (0 is the current one)
    pub fn peek_char(&self, offset: usize) -> char {
        self.remaining().chars().nth(offset).unwrap_or(END_OF_LINE)
    }

    pub fn is_end_of_line(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_blank_line(&self) -> bool {
        self.current_char() == END_OF_LINE
    }

    /// Consume the current character and return the new current one
    pub fn advance(&mut self) -> char {
        let c = self.current_char();
        if c == END_OF_LINE {
            return c;
        }
        if c == '\t' {
            self.column = add_tab(self.column);
        } else {
            self.column += 1;
        }
        self.start += c.len_utf8();
        self.current_char()
    }

    /// Move forward by a single column. A tab is only consumed once its
    /// last column has been passed.
    pub fn next_column(&mut self) {
        match self.current_char() {
            END_OF_LINE => {}
            '\t' => {
                let stop = add_tab(self.column);
                self.column += 1;
                if self.column == stop {
                    self.start += 1;
                }
            }
            c => {
                self.column += 1;
                self.start += c.len_utf8();
            }
        }
    }

    /// Consume a run of spaces and tabs. The before-indent markers only move
    /// when something was consumed.
    pub fn parse_indent(&mut self) {
        let start_before = self.start;
        let column_before = self.column;
        loop {
            match self.current_char() {
                ' ' => self.column += 1,
                '\t' => self.column = add_tab(self.column),
                _ => break,
            }
            self.start += 1;
        }
        if self.column != column_before {
            self.start_before_indent = start_before;
            self.column_before_indent = column_before;
        }
    }

    /// Forget the last indent run: indentation is measured from here on
    pub fn restart_indent(&mut self) {
        self.start_before_indent = self.start;
        self.column_before_indent = self.column;
    }

    /// Rewind (or move) the cursor to `target`. When a tab straddles the
    /// target the cursor stays on the tab and the column is clamped, so the
    /// rest of the tab can still be consumed as indentation.
    pub fn reset_to_column(&mut self, target: usize) {
        if target >= self.column_before_indent {
            self.start = self.start_before_indent;
            self.column = self.column_before_indent;
        } else {
            self.start = 0;
            self.column = 0;
            self.start_before_indent = 0;
            self.column_before_indent = 0;
        }

        while self.start < self.end && self.column < target {
            let c = self.current_char();
            match c {
                '\t' => self.column = add_tab(self.column),
                ' ' => self.column += 1,
                _ => {
                    self.column += 1;
                    self.column_before_indent = self.column;
                    self.start_before_indent = self.start + c.len_utf8();
                }
            }
            self.start += c.len_utf8();
        }

        if self.column > target {
            // only a tab can overshoot
            self.column = target;
            self.start -= 1;
        }
    }

    pub fn reset_to_code_indent(&mut self, offset: usize) {
        self.reset_to_column(self.column_before_indent + 4 + offset);
    }

    /// Go to `target`, rewinding when it lies behind the cursor
    pub fn go_to_column(&mut self, target: usize) {
        if target < self.column {
            self.reset_to_column(target);
            return;
        }
        while self.start < self.end && self.column < target {
            self.advance();
        }
        if self.column > target {
            self.column = target;
            self.start -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cursor(line: &str) -> LineCursor {
        let mut cursor = LineCursor::new();
        cursor.reset(line);
        cursor
    }

    #[rstest]
    #[case("abc", 0)]
    #[case("  abc", 2)]
    #[case("\tabc", 4)]
    #[case("  \tabc", 4)]
    #[case("   \tabc", 4)]
    #[case("    \tabc", 8)]
    #[case(" \t \tabc", 8)]
    fn indent_expands_tabs(#[case] line: &str, #[case] expected: usize) {
        let mut cursor = cursor(line);
        cursor.parse_indent();
        assert_eq!(cursor.column(), expected);
        assert_eq!(cursor.current_char(), 'a');
    }

    #[test]
    fn empty_indent_keeps_previous_markers() {
        let mut cursor = cursor("  > x");
        cursor.parse_indent();
        assert_eq!(cursor.column_before_indent(), 0);
        cursor.parse_indent();
        assert_eq!(cursor.column_before_indent(), 0);
        assert_eq!(cursor.indent(), 2);
    }

    #[test]
    fn partial_reset_then_advance_matches_full_indent() {
        let mut direct = cursor("    code");
        direct.parse_indent();

        let mut partial = cursor("    code");
        partial.parse_indent();
        partial.reset_to_column(2);
        assert_eq!(partial.column(), 2);
        assert_eq!(partial.start(), 2);
        partial.advance();
        partial.advance();

        assert_eq!(partial.column(), direct.column());
        assert_eq!(partial.start(), direct.start());
    }

    #[rstest]
    #[case("    x", 0)]
    #[case("    x", 1)]
    #[case("    x", 3)]
    #[case("\tx", 0)]
    #[case("\tx", 2)]
    #[case("  \t x", 3)]
    #[case("  \t x", 5)]
    fn reset_then_reindent_is_idempotent(#[case] line: &str, #[case] target: usize) {
        let mut cursor = cursor(line);
        cursor.parse_indent();
        let (column, start) = (cursor.column(), cursor.start());

        cursor.reset_to_column(target);
        assert_eq!(cursor.column(), target);
        cursor.parse_indent();

        assert_eq!(cursor.column(), column);
        assert_eq!(cursor.start(), start);
    }

    #[test]
    fn reset_behind_window_rescans_line() {
        let mut cursor = cursor("> \tfoo");
        cursor.advance();
        cursor.restart_indent();
        cursor.parse_indent();
        assert_eq!(cursor.column(), 4);

        cursor.reset_to_column(0);
        assert_eq!(cursor.start(), 0);
        assert_eq!(cursor.current_char(), '>');
    }

    #[test]
    fn reset_to_code_indent_keeps_extra_tab() {
        let mut cursor = cursor("\t\tfoo");
        cursor.parse_indent();
        assert_eq!(cursor.column(), 8);
        cursor.reset_to_code_indent(0);
        assert_eq!(cursor.column(), 4);
        assert_eq!(cursor.remaining_text(), "\tfoo");
    }

    #[test]
    fn split_tab_becomes_spaces() {
        let mut cursor = cursor("\tfoo");
        cursor.parse_indent();
        cursor.reset_to_column(2);
        assert_eq!(cursor.current_char(), '\t');
        assert_eq!(cursor.remaining_text(), "  foo");
    }

    #[test]
    fn next_column_walks_through_tab() {
        let mut cursor = cursor(">\tfoo");
        cursor.advance();
        cursor.next_column();
        assert_eq!(cursor.column(), 2);
        assert_eq!(cursor.current_char(), '\t');
        cursor.next_column();
        cursor.next_column();
        assert_eq!(cursor.column(), 4);
        assert_eq!(cursor.current_char(), 'f');
    }

    #[test]
    fn peek_and_end_of_line() {
        let mut cursor = cursor("ab");
        assert_eq!(cursor.peek_char(1), 'b');
        assert_eq!(cursor.peek_char(2), END_OF_LINE);
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_end_of_line());
        assert!(cursor.is_blank_line());
        assert_eq!(cursor.advance(), END_OF_LINE);
        assert_eq!(cursor.column(), 2);
    }

    #[test]
    fn go_to_column_moves_both_ways() {
        let mut cursor = cursor("  \tx");
        cursor.go_to_column(3);
        assert_eq!(cursor.column(), 3);
        assert_eq!(cursor.current_char(), '\t');
        cursor.go_to_column(1);
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.start(), 1);
    }

    #[test]
    fn set_end_trims_remaining() {
        let mut cursor = cursor("# title ##");
        cursor.advance();
        cursor.parse_indent();
        cursor.set_end(7);
        assert_eq!(cursor.remaining(), "title");
    }
}
