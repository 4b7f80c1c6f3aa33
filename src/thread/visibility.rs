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

use super::builder::{Forest, latest_by_id};
use super::record::CommentRecord;
use std::collections::{HashMap, HashSet};

/// How a node appears in the rendered thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Live record, rendered with its content.
    Shown,
    /// Soft-deleted record kept as an opaque placeholder because something
    /// below it is still live.
    Placeholder,
    /// Soft-deleted record with nothing live below it.
    Hidden,
}

impl Visibility {
    #[must_use]
    pub fn is_rendered(self) -> bool {
        self != Self::Hidden
    }
}

/// Per-node visibility, indexed like [`Forest::nodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityMap {
    states: Vec<Visibility>,
}

impl VisibilityMap {
    /// Resolve every node bottom-up: a soft-deleted node renders as a
    /// placeholder iff some transitive descendant is live.
    pub fn resolve(forest: &Forest) -> Self {
        let nodes = forest.nodes();
        let mut live_below = vec![false; nodes.len()];

        // Reverse pre-order visits children before their parents.
        for idx in forest.preorder().into_iter().rev() {
            live_below[idx] = forest
                .children(idx)
                .iter()
                .any(|&child| !nodes[child].record.is_soft_deleted() || live_below[child]);
        }

        let states = nodes
            .iter()
            .zip(&live_below)
            .map(|(node, &live)| match (node.record.is_soft_deleted(), live) {
                (false, _) => Visibility::Shown,
                (true, true) => Visibility::Placeholder,
                (true, false) => Visibility::Hidden,
            })
            .collect();
        Self { states }
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Visibility {
        self.states.get(idx).copied().unwrap_or(Visibility::Hidden)
    }

    #[must_use]
    pub fn states(&self) -> &[Visibility] {
        &self.states
    }
}

/// Rendered-count breakdown for a whole forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadSummary {
    /// Roots that render at all.
    pub roots: usize,
    /// Live nodes; this is the number shown as the comment count.
    pub rendered: usize,
    pub placeholders: usize,
    pub hidden: usize,
}

impl ThreadSummary {
    pub fn of(forest: &Forest, visibility: &VisibilityMap) -> Self {
        let mut summary = Self::default();
        for state in visibility.states() {
            match state {
                Visibility::Shown => summary.rendered += 1,
                Visibility::Placeholder => summary.placeholders += 1,
                Visibility::Hidden => summary.hidden += 1,
            }
        }
        summary.roots = forest.roots().iter().filter(|&&r| visibility.get(r).is_rendered()).count();
        summary
    }
}

/// Live nodes in `root`'s subtree, the root included when it is live.
/// Placeholders never count.
pub fn rendered_count_for(forest: &Forest, root: usize) -> usize {
    let Some(node) = forest.node(root) else {
        return 0;
    };
    let own = usize::from(!node.record.is_soft_deleted());
    own + forest
        .descendants(root)
        .into_iter()
        .filter(|&idx| !forest.nodes()[idx].record.is_soft_deleted())
        .count()
}

/// Total rendered count across all roots.
pub fn rendered_count(forest: &Forest) -> usize {
    forest.roots().iter().map(|&root| rendered_count_for(forest, root)).sum()
}

/// Rendered count straight from the flat list, without building a forest.
///
/// Each live record is credited to the root its `parentId` chain ends at.
/// Roots are records with no parent, a missing parent, or themselves as
/// parent. Duplicate ids resolve to the last occurrence, and a record whose
/// chain runs into a cycle is promoted to a root in input order, both as in
/// [`Forest::build`], so this always equals [`rendered_count`].
pub fn rendered_count_flat(records: &[CommentRecord]) -> usize {
    let latest = latest_by_id(records);
    let by_id: HashMap<i64, &CommentRecord> =
        latest.iter().map(|(&id, &pos)| (id, &records[pos])).collect();

    let mut promoted = HashSet::new();
    let mut per_root: HashMap<i64, usize> = HashMap::new();
    for (pos, record) in records.iter().enumerate() {
        if latest.get(&record.id) != Some(&pos) {
            continue;
        }
        let root = root_of(record, &by_id, &promoted).unwrap_or_else(|| {
            promoted.insert(record.id);
            record.id
        });
        if !record.is_soft_deleted() {
            *per_root.entry(root).or_default() += 1;
        }
    }
    per_root.values().sum()
}

/// Walk `parentId` upward from `record` to its root. `None` when the chain
/// loops without reaching a root or a promoted record.
fn root_of(
    record: &CommentRecord,
    by_id: &HashMap<i64, &CommentRecord>,
    promoted: &HashSet<i64>,
) -> Option<i64> {
    let mut seen = HashSet::new();
    let mut current = record;
    loop {
        if promoted.contains(&current.id) {
            return Some(current.id);
        }
        let Some(parent_id) = current.parent_id.filter(|&p| p != current.id) else {
            return Some(current.id);
        };
        let Some(&parent) = by_id.get(&parent_id) else {
            return Some(current.id);
        };
        if !seen.insert(current.id) {
            return None;
        }
        current = parent;
    }
}
