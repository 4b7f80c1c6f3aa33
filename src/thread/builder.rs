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

//! Flat comment list to parent/child forest.
//!
//! Nodes live in an arena (`Vec<ThreadNode>`) and point at each other by
//! index. The forest is rebuilt from scratch on every change; nothing patches
//! it in place.

use super::record::CommentRecord;
use std::collections::HashMap;

/// Output shape for a root's replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ThreadMode {
    /// Replies nested under their parents, siblings in input order.
    #[default]
    InsertionOrder,
    /// Every reply under a root, any depth, as one list sorted by `createdAt`.
    Chronological,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadNode {
    pub record: CommentRecord,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// 0 for roots.
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<ThreadNode>,
    roots: Vec<usize>,
    index: HashMap<i64, usize>,
}

/// Map each id to the position of its last occurrence in `records`.
pub(crate) fn latest_by_id(records: &[CommentRecord]) -> HashMap<i64, usize> {
    let mut latest = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        if let Some(prev) = latest.insert(record.id, pos) {
            tracing::warn!(id = record.id, first = prev, last = pos, "duplicate comment id; keeping last");
        }
    }
    latest
}

impl Forest {
    /// Build the forest in two passes: index every record by id, then attach
    /// each one to its parent in input order.
    ///
    /// Records whose parent is missing (or is themselves) become roots. Parent
    /// cycles are broken by promoting the earliest unreachable record of each
    /// cycle to a root.
    pub fn build(records: &[CommentRecord]) -> Self {
        let latest = latest_by_id(records);

        let mut nodes = Vec::with_capacity(latest.len());
        let mut index = HashMap::with_capacity(latest.len());
        for (pos, record) in records.iter().enumerate() {
            if latest.get(&record.id) != Some(&pos) {
                continue;
            }
            index.insert(record.id, nodes.len());
            nodes.push(ThreadNode { record: record.clone(), parent: None, children: Vec::new(), depth: 0 });
        }

        let mut roots = Vec::new();
        for idx in 0..nodes.len() {
            let parent = match nodes[idx].record.parent_id {
                None => None,
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&p) if p != idx => Some(p),
                    Some(_) => {
                        tracing::warn!(id = parent_id, "comment is its own parent; treating as root");
                        None
                    }
                    None => {
                        tracing::warn!(
                            id = nodes[idx].record.id,
                            parent_id,
                            "comment parent not found; treating as root"
                        );
                        None
                    }
                },
            };
            match parent {
                Some(p) => {
                    nodes[idx].parent = Some(p);
                    nodes[p].children.push(idx);
                }
                None => roots.push(idx),
            }
        }

        let mut forest = Self { nodes, roots, index };
        forest.adopt_unreachable();
        forest.assign_depths();
        forest
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn nodes(&self) -> &[ThreadNode] {
        &self.nodes
    }

    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    pub fn node(&self, idx: usize) -> Option<&ThreadNode> {
        self.nodes.get(idx)
    }

    /// Arena index of the record with this id.
    #[must_use]
    pub fn position(&self, id: i64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&ThreadNode> {
        self.position(id).and_then(|idx| self.nodes.get(idx))
    }

    #[must_use]
    pub fn children(&self, idx: usize) -> &[usize] {
        self.nodes.get(idx).map_or(&[], |n| n.children.as_slice())
    }

    /// Every node in depth-first pre-order, roots in input order.
    #[must_use]
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.children(idx).iter().rev().copied());
        }
        order
    }

    /// Records in pre-order; rebuilding from this list gives the same edges.
    #[must_use]
    pub fn flatten(&self) -> Vec<CommentRecord> {
        self.preorder().into_iter().map(|idx| self.nodes[idx].record.clone()).collect()
    }

    /// All descendants of `idx` at any depth, pre-order, excluding `idx`.
    #[must_use]
    pub fn descendants(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children(idx).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Replies under `root` in the requested shape. Both modes return the
    /// same members; only the order differs.
    #[must_use]
    pub fn replies(&self, root: usize, mode: ThreadMode) -> Vec<usize> {
        let mut replies = self.descendants(root);
        if mode == ThreadMode::Chronological {
            // Stable, so equal timestamps keep thread order.
            replies.sort_by_key(|&idx| self.nodes[idx].record.created_at);
        }
        replies
    }

    fn adopt_unreachable(&mut self) {
        let mut reached = vec![false; self.nodes.len()];
        let roots = self.roots.clone();
        for root in roots {
            self.mark_reached(root, &mut reached);
        }

        for idx in 0..self.nodes.len() {
            if reached[idx] {
                continue;
            }
            tracing::warn!(id = self.nodes[idx].record.id, "comment parent chain forms a cycle; treating as root");
            if let Some(parent) = self.nodes[idx].parent.take() {
                self.nodes[parent].children.retain(|&child| child != idx);
            }
            self.roots.push(idx);
            self.mark_reached(idx, &mut reached);
        }
        self.roots.sort_unstable();
    }

    fn mark_reached(&self, from: usize, reached: &mut [bool]) {
        let mut stack = vec![from];
        while let Some(idx) = stack.pop() {
            if reached[idx] {
                continue;
            }
            reached[idx] = true;
            stack.extend(self.children(idx).iter().copied());
        }
    }

    fn assign_depths(&mut self) {
        let mut stack: Vec<(usize, usize)> = self.roots.iter().map(|&r| (r, 0)).collect();
        while let Some((idx, depth)) = stack.pop() {
            self.nodes[idx].depth = depth;
            for &child in &self.nodes[idx].children {
                stack.push((child, depth + 1));
            }
        }
    }
}
