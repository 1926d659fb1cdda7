//! Text model behind the marker rename input
//!
//! Single line, length-limited, with a caret and an optional selection.
//! Positions are char indices so multi-byte names behave.

/// Default maximum marker name length in chars
pub const DEFAULT_NAME_MAX_LEN: usize = 30;

#[derive(Debug, Clone)]
pub struct Renamer {
    text: String,
    /// Caret position
    caret: usize,
    /// Other end of the selection; equal to `caret` when nothing is selected
    anchor: usize,
    max_len: usize,
}

impl Renamer {
    pub fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            caret: 0,
            anchor: 0,
            max_len,
        }
    }

    /// Replace the content and put the caret at the end
    pub fn load(&mut self, text: &str) {
        self.text = self.sanitize(text, self.max_len);
        self.caret = self.char_len();
        self.anchor = self.caret;
    }

    pub fn clear(&mut self) {
        self.load("");
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Ordered `(start, end)` of the selection
    pub fn selection(&self) -> (usize, usize) {
        (self.caret.min(self.anchor), self.caret.max(self.anchor))
    }

    pub fn has_selection(&self) -> bool {
        self.caret != self.anchor
    }

    pub fn select(&mut self, anchor: usize, caret: usize) {
        let len = self.char_len();
        self.anchor = anchor.min(len);
        self.caret = caret.min(len);
    }

    pub fn set_caret(&mut self, pos: usize) {
        self.select(pos, pos);
    }

    /// Drop the selection, leaving the caret at its start
    pub fn collapse_selection(&mut self) {
        if self.has_selection() {
            let (start, _) = self.selection();
            self.set_caret(start);
        }
    }

    /// Type text at the caret, replacing any selection
    pub fn insert(&mut self, input: &str) {
        let (start, end) = self.selection();
        let room = self.max_len.saturating_sub(self.char_len() - (end - start));
        let input = self.sanitize(input, room);
        let inserted = input.chars().count();

        let head: String = self.text.chars().take(start).collect();
        let tail: String = self.text.chars().skip(end).collect();
        self.text = format!("{head}{input}{tail}");
        self.set_caret(start + inserted);
    }

    /// Delete the selection, or the char before the caret
    pub fn backspace(&mut self) {
        let (start, end) = self.selection();
        let (from, to) = if start != end {
            (start, end)
        } else if start > 0 {
            (start - 1, start)
        } else {
            return;
        };
        self.text = self
            .text
            .chars()
            .enumerate()
            .filter(|(i, _)| *i < from || *i >= to)
            .map(|(_, c)| c)
            .collect();
        self.set_caret(from);
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn sanitize(&self, input: &str, limit: usize) -> String {
        input
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .take(limit)
            .collect()
    }
}

impl Default for Renamer {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_MAX_LEN)
    }
}
