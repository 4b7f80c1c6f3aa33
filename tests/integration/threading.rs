// =====
// TESTS: 6
// =====
//
// Threading integration tests.
// Decodes backend payloads, builds forests and checks what renders.

use discuss_kit::thread::{
    Forest, ThreadMode, ThreadSummary, Visibility, VisibilityMap, render_forest, rendered_count,
    rendered_count_flat,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

use crate::helpers::records;

const SOFT_DELETED_CHAIN: &str = r#"[
    {"id": 1, "parentId": null, "createdAt": "2024-05-01T09:00:00Z", "content": "root"},
    {"id": 2, "parentId": 1, "createdAt": "2024-05-01T09:05:00Z", "content": "reply"},
    {"id": 3, "parentId": 2, "createdAt": "2024-05-01T09:10:00Z", "content": "gone",
     "deletedAt": "2024-05-02T00:00:00Z"},
    {"id": 4, "parentId": 3, "createdAt": "2024-05-01T09:15:00Z", "content": "still here"}
]"#;

#[test]
fn soft_deleted_chain_renders_placeholder_and_counts_three() {
    let records = records(SOFT_DELETED_CHAIN);
    let forest = Forest::build(&records);
    let visibility = VisibilityMap::resolve(&forest);

    let rendered: BTreeSet<i64> = forest
        .nodes()
        .iter()
        .enumerate()
        .filter(|(idx, _)| visibility.get(*idx).is_rendered())
        .map(|(_, node)| node.record.id)
        .collect();
    assert_eq!(rendered, BTreeSet::from([1, 2, 3, 4]));
    assert_eq!(visibility.get(forest.position(3).unwrap()), Visibility::Placeholder);
    assert_eq!(rendered_count(&forest), 3);
    assert_eq!(rendered_count_flat(&records), 3);
}

#[test]
fn placeholder_never_exposes_content() {
    let records = records(SOFT_DELETED_CHAIN);
    let forest = Forest::build(&records);
    let visibility = VisibilityMap::resolve(&forest);
    let text: Vec<String> = render_forest(&forest, &visibility, ThreadMode::InsertionOrder)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert!(text.iter().all(|line| !line.contains("gone")));
    assert!(text.iter().any(|line| line.contains("#3 [deleted]")));
}

#[test]
fn orphan_reply_surfaces_as_top_level() {
    let records = records(
        r#"[
        {"id": 1, "createdAt": "2024-05-01T09:00:00Z"},
        {"id": 8, "parentId": 1234, "createdAt": "2024-05-01T09:01:00Z"},
        {"id": 9, "parentId": 8, "createdAt": "2024-05-01T09:02:00Z"}
    ]"#,
    );
    let forest = Forest::build(&records);
    let top: Vec<i64> = forest.roots().iter().map(|&r| forest.nodes()[r].record.id).collect();
    assert_eq!(top, [1, 8]);
    assert_eq!(rendered_count(&forest), 3);
    assert_eq!(rendered_count_flat(&records), 3);
}

#[test]
fn chronological_mode_orders_every_depth_by_time() {
    let records = records(
        r#"[
        {"id": 1, "createdAt": "2024-05-01T09:00:00Z"},
        {"id": 2, "parentId": 1, "createdAt": "2024-05-01T12:00:00Z"},
        {"id": 3, "parentId": 2, "createdAt": "2024-05-01T10:00:00Z"},
        {"id": 4, "parentId": 1, "createdAt": "2024-05-01T11:00:00Z"}
    ]"#,
    );
    let forest = Forest::build(&records);
    let visibility = VisibilityMap::resolve(&forest);
    let ids: Vec<i64> = render_forest(&forest, &visibility, ThreadMode::Chronological)
        .iter()
        .map(|line| line.id)
        .collect();
    assert_eq!(ids, [1, 3, 4, 2]);
}

#[test]
fn rebuild_from_flattened_forest_is_stable() {
    let records = records(SOFT_DELETED_CHAIN);
    let forest = Forest::build(&records);
    let again = Forest::build(&forest.flatten());
    let edges = |f: &Forest| -> BTreeSet<(i64, Option<i64>)> {
        f.nodes().iter().map(|n| (n.record.id, n.record.parent_id)).collect()
    };
    assert_eq!(edges(&forest), edges(&again));
    assert_eq!(VisibilityMap::resolve(&forest), VisibilityMap::resolve(&again));
}

#[test]
fn summary_breaks_down_deleted_nodes() {
    let records = records(
        r#"[
        {"id": 1, "createdAt": "2024-05-01T09:00:00Z", "status": "DELETED"},
        {"id": 2, "parentId": 1, "createdAt": "2024-05-01T09:01:00Z"},
        {"id": 3, "parentId": 1, "createdAt": "2024-05-01T09:02:00Z", "status": "DELETED"},
        {"id": 4, "createdAt": "2024-05-01T09:03:00Z", "status": "DELETED"}
    ]"#,
    );
    let forest = Forest::build(&records);
    let summary = ThreadSummary::of(&forest, &VisibilityMap::resolve(&forest));
    assert_eq!(summary, ThreadSummary { roots: 1, rendered: 1, placeholders: 1, hidden: 2 });
}
