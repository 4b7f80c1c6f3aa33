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

use super::builder::{Forest, ThreadMode};
use super::visibility::{Visibility, VisibilityMap};
use std::fmt;

const PLACEHOLDER: &str = "[deleted]";
const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody<'a> {
    Content { author_id: i64, content: &'a str },
    Deleted,
}

/// One visible entry of a rendered thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine<'a> {
    pub id: i64,
    /// Indent level: tree depth in insertion-order mode, 0/1 in chronological.
    pub level: usize,
    pub body: RenderedBody<'a>,
}

impl fmt::Display for RenderedLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.level {
            f.write_str(INDENT)?;
        }
        match &self.body {
            RenderedBody::Content { author_id, content } => {
                write!(f, "#{} <user {author_id}> {content}", self.id)
            }
            RenderedBody::Deleted => write!(f, "#{} {PLACEHOLDER}", self.id),
        }
    }
}

/// Flatten the visible part of the forest into display lines.
///
/// Hidden nodes are skipped. In chronological mode each root is followed by
/// all of its visible replies, time-ordered, one level deep.
pub fn render_forest<'a>(
    forest: &'a Forest,
    visibility: &VisibilityMap,
    mode: ThreadMode,
) -> Vec<RenderedLine<'a>> {
    let mut lines = Vec::new();
    for &root in forest.roots() {
        if !visibility.get(root).is_rendered() {
            continue;
        }
        lines.push(line(forest, visibility, root, 0));
        for idx in forest.replies(root, mode) {
            if !visibility.get(idx).is_rendered() {
                continue;
            }
            let level = match mode {
                ThreadMode::InsertionOrder => forest.nodes()[idx].depth,
                ThreadMode::Chronological => 1,
            };
            lines.push(line(forest, visibility, idx, level));
        }
    }
    lines
}

fn line<'a>(
    forest: &'a Forest,
    visibility: &VisibilityMap,
    idx: usize,
    level: usize,
) -> RenderedLine<'a> {
    let record = &forest.nodes()[idx].record;
    let body = match visibility.get(idx) {
        Visibility::Shown => {
            RenderedBody::Content { author_id: record.author_id, content: &record.content }
        }
        Visibility::Placeholder | Visibility::Hidden => RenderedBody::Deleted,
    };
    RenderedLine { id: record.id, level, body }
}
