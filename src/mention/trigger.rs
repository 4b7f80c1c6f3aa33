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

/// An unterminated `@` span ending at the cursor.
///
/// Offsets are char indices into the text. `start` is the position of the
/// `@` itself and `end` is the cursor, so the query is `text[start + 1..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub start: usize,
    pub end: usize,
    pub query: String,
}

/// Detect an in-progress `@` mention at `cursor`.
///
/// Scans backwards from the cursor to the nearest `@`. Whitespace (including
/// newlines) met before any `@` closes the span, so there is no trigger. The
/// nearest `@` always wins, which means a second `@` can never sit inside the
/// query. A cursor past the end of the text is clamped to the end.
pub fn detect_trigger(text: &str, cursor: usize) -> Option<Trigger> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut i = cursor;
    while i > 0 {
        i -= 1;
        let ch = *chars.get(i)?;
        if ch == '@' {
            let query: String = chars[i + 1..cursor].iter().collect();
            return Some(Trigger { start: i, end: cursor, query });
        }
        if ch.is_whitespace() {
            return None;
        }
    }
    None
}
