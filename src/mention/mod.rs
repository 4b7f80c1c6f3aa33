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

mod buffer;
mod caret;
mod composer;
mod insert;
mod provider;
mod scan;
mod session;
mod state;
mod trigger;

pub use buffer::TextBuffer;
pub use caret::{CaretPosition, CaretResolver, MonospaceCaret};
pub use composer::Composer;
pub use insert::{Insertion, insert_mention};
pub use provider::{HttpDirectory, StaticDirectory, SuggestionProvider};
pub use scan::{MentionSpan, find_mentions, mentioned_usernames};
pub use session::{
    DEFAULT_DEBOUNCE, DEFAULT_MAX_SUGGESTIONS, MentionSession, Resolution, SessionOptions,
};
pub use state::{
    Commit, FetchRequest, MentionEffect, MentionEvent, MentionKey, MentionPhase, MentionState,
    Username,
};
pub use trigger::{Trigger, detect_trigger};
