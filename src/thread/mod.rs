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

mod builder;
mod record;
mod render;
mod visibility;

pub use builder::{Forest, ThreadMode, ThreadNode};
pub use record::{CommentRecord, RecordError, RecordStatus, decode_records};
pub use render::{RenderedBody, RenderedLine, render_forest};
pub use visibility::{
    ThreadSummary, Visibility, VisibilityMap, rendered_count, rendered_count_flat,
    rendered_count_for,
};
