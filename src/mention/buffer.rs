// discuss-kit - Mention-aware input and threaded discussions
// Copyright (C) 2025  The discuss-kit authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::insert::char_to_byte_index;

/// Plain text buffer with a char-indexed cursor. Lines are separated by `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor clamped into it.
    pub fn with_text(text: impl Into<String>, cursor: usize) -> Self {
        let mut buffer = Self::new();
        buffer.replace(text.into(), cursor);
        buffer
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Swap in new content wholesale (external edits, committed mentions).
    ///
    /// `cursor` is a char offset into `text` as given; it is remapped when
    /// line endings are normalized.
    pub fn replace(&mut self, text: String, cursor: usize) {
        if text.contains('\r') {
            let prefix = &text[..char_to_byte_index(&text, cursor)];
            let cursor = normalize_newlines(prefix).chars().count();
            self.text = normalize_newlines(&text);
            self.cursor = cursor.min(self.char_len());
        } else {
            self.text = text;
            self.cursor = cursor.min(self.char_len());
        }
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_len());
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        let normalized = normalize_newlines(s);
        self.text.insert_str(byte_idx, &normalized);
        self.cursor += normalized.chars().count();
    }

    pub fn delete_char_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        self.text.remove(byte_idx);
    }

    pub fn delete_char_after(&mut self) {
        if self.cursor < self.char_len() {
            let byte_idx = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move to the start of the current line.
    pub fn move_home(&mut self) {
        let before = &self.text[..char_to_byte_index(&self.text, self.cursor)];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        self.cursor = self.text[..line_start].chars().count();
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self) {
        let byte_idx = char_to_byte_index(&self.text, self.cursor);
        let line_end = self.text[byte_idx..].find('\n').map_or(self.text.len(), |i| byte_idx + i);
        self.cursor = self.text[..line_end].chars().count();
    }
}

/// CRLF and bare CR become `\n`, so offsets match what the tokenizer sees.
fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}
