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

/// Result of committing a suggestion into a text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    /// Char offset right after the separator space.
    pub cursor: usize,
}

/// Replace the `[start, end)` char span with `@username ` and place the cursor
/// after the space.
///
/// The span may be stale (the buffer changed since it was computed), so both
/// ends are clamped into the current text first: `end` to the text length and
/// `start` to `end`.
pub fn insert_mention(text: &str, username: &str, start: usize, end: usize) -> Insertion {
    let char_len = text.chars().count();
    let end = end.min(char_len);
    let start = start.min(end);

    let start_byte = char_to_byte_index(text, start);
    let end_byte = char_to_byte_index(text, end);

    let mut out = String::with_capacity(text.len() + username.len() + 2);
    out.push_str(&text[..start_byte]);
    out.push('@');
    out.push_str(username);
    out.push(' ');
    out.push_str(&text[end_byte..]);

    Insertion { text: out, cursor: start + 1 + username.chars().count() + 1 }
}

/// Convert a character index to a byte index within a string.
pub(crate) fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
