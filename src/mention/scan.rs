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

/// A committed `@username` token inside free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSpan {
    /// Char offset of the `@`.
    pub start: usize,
    /// Char offset one past the last username char.
    pub end: usize,
    pub username: String,
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Find every committed mention in `text`.
///
/// A mention is an `@` at the start of the text or after whitespace, followed
/// by at least one username char. A trailing `.` is treated as punctuation
/// ("thanks @bob." mentions `bob`).
pub fn find_mentions(text: &str) -> Vec<MentionSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '@' && (i == 0 || chars[i - 1].is_whitespace()) {
            let start = i;
            i += 1;
            let name_start = i;
            while i < chars.len() && is_username_char(chars[i]) {
                i += 1;
            }
            let mut end = i;
            while end > name_start && chars[end - 1] == '.' {
                end -= 1;
            }
            if end > name_start {
                let username: String = chars[name_start..end].iter().collect();
                spans.push(MentionSpan { start, end, username });
            }
        } else {
            i += 1;
        }
    }

    spans
}

/// Usernames mentioned in `text`, deduplicated in first-seen order.
pub fn mentioned_usernames(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    find_mentions(text)
        .into_iter()
        .filter_map(|span| seen.insert(span.username.clone()).then_some(span.username))
        .collect()
}
