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

use super::buffer::TextBuffer;
use super::caret::{CaretPosition, CaretResolver};
use super::insert::insert_mention;
use super::state::{MentionEffect, MentionEvent, MentionKey, MentionState, Username};
use super::trigger::detect_trigger;

/// A text buffer paired with the mention state derived from it.
///
/// Every edit or cursor move re-runs the tokenizer. Commits rewrite the buffer
/// and reset the mention state inside one method call, so callers never see
/// one updated without the other.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    buffer: TextBuffer,
    mention: MentionState,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    #[must_use]
    pub fn mention(&self) -> &MentionState {
        &self.mention
    }

    pub fn insert_char(&mut self, c: char) -> MentionEffect {
        self.buffer.insert_char(c);
        self.rescan()
    }

    pub fn insert_str(&mut self, s: &str) -> MentionEffect {
        self.buffer.insert_str(s);
        self.rescan()
    }

    pub fn delete_char_before(&mut self) -> MentionEffect {
        self.buffer.delete_char_before();
        self.rescan()
    }

    pub fn delete_char_after(&mut self) -> MentionEffect {
        self.buffer.delete_char_after();
        self.rescan()
    }

    pub fn move_left(&mut self) -> MentionEffect {
        self.buffer.move_left();
        self.rescan()
    }

    pub fn move_right(&mut self) -> MentionEffect {
        self.buffer.move_right();
        self.rescan()
    }

    pub fn move_home(&mut self) -> MentionEffect {
        self.buffer.move_home();
        self.rescan()
    }

    pub fn move_end(&mut self) -> MentionEffect {
        self.buffer.move_end();
        self.rescan()
    }

    pub fn set_cursor(&mut self, cursor: usize) -> MentionEffect {
        self.buffer.set_cursor(cursor);
        self.rescan()
    }

    /// Replace the whole buffer, e.g. when the host loads a draft.
    pub fn set_text(&mut self, text: impl Into<String>, cursor: usize) -> MentionEffect {
        self.buffer.replace(text.into(), cursor);
        self.rescan()
    }

    pub fn clear(&mut self) -> MentionEffect {
        self.buffer.clear();
        self.rescan()
    }

    /// Route a navigation key. `Ignored` means the host should treat the key
    /// as ordinary input.
    pub fn key(&mut self, key: MentionKey) -> MentionEffect {
        let effect = self.mention.apply(MentionEvent::Key(key));
        self.finish(effect)
    }

    /// Pointer selection of a suggestion.
    pub fn pick(&mut self, index: usize) -> MentionEffect {
        let effect = self.mention.apply(MentionEvent::Pick(index));
        self.finish(effect)
    }

    pub fn blur(&mut self) -> MentionEffect {
        self.mention.apply(MentionEvent::Blur)
    }

    /// Feed a finished fetch back in. Stale generations come back `Discarded`.
    pub fn resolve(&mut self, generation: u64, suggestions: Vec<Username>) -> MentionEffect {
        self.mention.apply(MentionEvent::Resolved { generation, suggestions })
    }

    /// Overlay anchor: the position of the trigger `@` while a mention is active.
    pub fn caret_anchor(&self, resolver: &impl CaretResolver) -> Option<CaretPosition> {
        let (start, _) = self.mention.trigger_span()?;
        Some(resolver.resolve(self.buffer.text(), start))
    }

    fn rescan(&mut self) -> MentionEffect {
        let trigger = detect_trigger(self.buffer.text(), self.buffer.cursor());
        self.mention.apply(MentionEvent::Scanned(trigger))
    }

    fn finish(&mut self, effect: MentionEffect) -> MentionEffect {
        if let MentionEffect::Commit(commit) = &effect {
            let inserted =
                insert_mention(self.buffer.text(), &commit.username, commit.start, commit.end);
            tracing::debug!(username = %commit.username, cursor = inserted.cursor, "mention committed");
            self.buffer.replace(inserted.text, inserted.cursor);
        }
        effect
    }
}
