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

use super::trigger::Trigger;

/// Opaque identifier returned by the suggestion provider.
pub type Username = String;

/// Keys the suggestion list claims while a mention is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// Everything that can move the mention state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionEvent {
    /// Tokenizer output after a text or cursor change.
    Scanned(Option<Trigger>),
    /// A suggestion fetch finished. `generation` is the tag it was issued with.
    Resolved { generation: u64, suggestions: Vec<Username> },
    Key(MentionKey),
    /// Pointer selection of the suggestion at this index.
    Pick(usize),
    /// Focus left the editing context.
    Blur,
}

/// A fetch the host must run (debounced) for the current generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: String,
}

/// A committed suggestion and the span it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub username: Username,
    pub start: usize,
    pub end: usize,
}

/// What the host has to do after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionEffect {
    /// Event consumed, nothing further to do.
    None,
    /// Key not claimed by the mention list; the host handles it normally.
    Ignored,
    /// A resolution arrived for a superseded generation and was dropped.
    Discarded,
    Fetch(FetchRequest),
    Commit(Commit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionPhase {
    Inactive,
    Loading,
    Loaded,
}

/// Mention UI state owned by a single editing context.
///
/// Invariants: `trigger_start <= trigger_end`, and `selected_index` is a
/// valid index into `suggestions` when it is non-empty, else `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionState {
    is_active: bool,
    trigger_start: usize,
    trigger_end: usize,
    query: String,
    suggestions: Vec<Username>,
    selected_index: usize,
    loading: bool,
    generation: u64,
}

impl MentionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_active && self.loading
    }

    #[must_use]
    pub fn phase(&self) -> MentionPhase {
        match (self.is_active, self.loading) {
            (false, _) => MentionPhase::Inactive,
            (true, true) => MentionPhase::Loading,
            (true, false) => MentionPhase::Loaded,
        }
    }

    /// The `[start, end)` span of the active trigger.
    #[must_use]
    pub fn trigger_span(&self) -> Option<(usize, usize)> {
        self.is_active.then_some((self.trigger_start, self.trigger_end))
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Username] {
        &self.suggestions
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Username> {
        if self.is_active { self.suggestions.get(self.selected_index) } else { None }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one event. Every transition goes through here.
    pub fn apply(&mut self, event: MentionEvent) -> MentionEffect {
        match event {
            MentionEvent::Scanned(Some(trigger)) => self.on_trigger(trigger),
            MentionEvent::Scanned(None) | MentionEvent::Blur => {
                self.deactivate();
                MentionEffect::None
            }
            MentionEvent::Resolved { generation, suggestions } => {
                self.on_resolved(generation, suggestions)
            }
            MentionEvent::Key(key) => self.on_key(key),
            MentionEvent::Pick(index) => self.on_pick(index),
        }
    }

    fn on_trigger(&mut self, trigger: Trigger) -> MentionEffect {
        if self.is_active && self.trigger_start == trigger.start && self.query == trigger.query {
            self.trigger_end = trigger.end;
            return MentionEffect::None;
        }

        if !self.is_active || self.trigger_start != trigger.start {
            // A different `@` token: the old list does not apply to it.
            self.suggestions.clear();
            self.selected_index = 0;
        }

        self.generation = self.generation.wrapping_add(1);
        self.is_active = true;
        self.loading = true;
        self.trigger_start = trigger.start;
        self.trigger_end = trigger.end;
        self.query = trigger.query;

        tracing::debug!(generation = self.generation, query = %self.query, "mention fetch requested");
        MentionEffect::Fetch(FetchRequest { generation: self.generation, query: self.query.clone() })
    }

    fn on_resolved(&mut self, generation: u64, suggestions: Vec<Username>) -> MentionEffect {
        if !self.is_active || generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                active = self.is_active,
                "dropping stale suggestions"
            );
            return MentionEffect::Discarded;
        }
        self.loading = false;
        self.suggestions = suggestions;
        self.selected_index = 0;
        MentionEffect::None
    }

    fn on_key(&mut self, key: MentionKey) -> MentionEffect {
        if !self.is_active {
            return MentionEffect::Ignored;
        }
        match key {
            MentionKey::ArrowDown => {
                let last = self.suggestions.len().saturating_sub(1);
                self.selected_index = (self.selected_index + 1).min(last);
                MentionEffect::None
            }
            MentionKey::ArrowUp => {
                self.selected_index = self.selected_index.saturating_sub(1);
                MentionEffect::None
            }
            // The list shown while loading belongs to an older query.
            MentionKey::Enter if self.loading || self.suggestions.is_empty() => {
                MentionEffect::Ignored
            }
            MentionKey::Enter => self.commit(),
            MentionKey::Escape => {
                self.deactivate();
                MentionEffect::None
            }
        }
    }

    fn on_pick(&mut self, index: usize) -> MentionEffect {
        if !self.is_active || self.loading || index >= self.suggestions.len() {
            return MentionEffect::None;
        }
        self.selected_index = index;
        self.commit()
    }

    /// Take the selected suggestion and reset to inactive in the same step.
    fn commit(&mut self) -> MentionEffect {
        let Some(username) = self.suggestions.get(self.selected_index).cloned() else {
            return MentionEffect::Ignored;
        };
        let commit = Commit { username, start: self.trigger_start, end: self.trigger_end };
        self.deactivate();
        MentionEffect::Commit(commit)
    }

    /// Back to inactive. The generation is kept so late resolutions stay stale.
    fn deactivate(&mut self) {
        self.is_active = false;
        self.loading = false;
        self.trigger_start = 0;
        self.trigger_end = 0;
        self.query.clear();
        self.suggestions.clear();
        self.selected_index = 0;
    }
}
