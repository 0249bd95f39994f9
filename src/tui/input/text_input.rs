//! Text input field handling.

use unicode_width::UnicodeWidthStr;

/// State for a single-line text input field.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    /// The current text content.
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    /// Maximum number of characters accepted, if any.
    max_chars: Option<usize>,
}

impl TextInput {
    /// Creates a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input that accepts at most `max_chars` characters.
    pub fn with_limit(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            ..Self::default()
        }
    }

    /// Creates an input pre-filled with `text`, cursor at the end.
    pub fn with_text(mut self, text: &str) -> Self {
        self.set(text);
        self
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset of the character at `index`.
    fn byte_offset(&self, index: usize) -> usize {
        self.content
            .char_indices()
            .nth(index)
            .map_or(self.content.len(), |(offset, _)| offset)
    }

    /// Inserts a character at the cursor position.
    ///
    /// Returns `false` when the field is full.
    pub fn insert(&mut self, c: char) -> bool {
        if self.max_chars.is_some_and(|max| self.char_count() >= max) {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        self.content.insert(offset, c);
        self.cursor += 1;
        true
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
        }
    }

    /// Deletes the character at the cursor position (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let offset = self.byte_offset(self.cursor);
            self.content.remove(offset);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Replaces the content, truncating to the limit, cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.content = match self.max_chars {
            Some(max) => text.chars().take(max).collect(),
            None => text.to_string(),
        };
        self.cursor = self.char_count();
    }

    /// Returns the current content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Returns whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Terminal columns occupied by the text before the cursor.
    pub fn cursor_column(&self) -> u16 {
        let offset = self.byte_offset(self.cursor);
        u16::try_from(self.content[..offset].width()).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::new();
        for c in "MSF".chars() {
            input.insert(c);
        }
        input.move_left();
        input.insert('x');
        assert_eq!(input.as_str(), "MSxF");
        input.backspace();
        input.delete();
        assert_eq!(input.as_str(), "MS");
        input.move_home();
        input.delete();
        assert_eq!(input.as_str(), "S");
    }

    #[test]
    fn respects_limit() {
        let mut input = TextInput::with_limit(3);
        assert!(input.insert('a'));
        assert!(input.insert('b'));
        assert!(input.insert('c'));
        assert!(!input.insert('d'));
        assert_eq!(input.as_str(), "abc");

        input.set("abcdef");
        assert_eq!(input.as_str(), "abc");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = TextInput::new().with_text("é€");
        input.move_left();
        input.insert('a');
        assert_eq!(input.as_str(), "éa€");
        input.move_end();
        input.backspace();
        assert_eq!(input.as_str(), "éa");
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn cursor_column_counts_wide_characters() {
        let input = TextInput::new().with_text("日本");
        assert_eq!(input.cursor_column(), 4);
    }
}
