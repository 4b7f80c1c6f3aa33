// =====
// TESTS: 8
// =====
//
// Mention flow integration tests.
// Drives the composer and session through typing, fetching and committing.

use async_trait::async_trait;
use discuss_kit::mention::{
    Composer, MentionEffect, MentionKey, MentionPhase, StaticDirectory, SuggestionProvider,
    Username, detect_trigger, find_mentions,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::helpers::{directory, test_session};

/// Answers each query after its own delay.
struct Delayed {
    delays: HashMap<&'static str, Duration>,
    inner: StaticDirectory,
}

#[async_trait(?Send)]
impl SuggestionProvider for Delayed {
    async fn search_users(&self, prefix: &str) -> anyhow::Result<Vec<Username>> {
        let delay = self.delays.get(prefix).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.inner.search_users(prefix).await
    }
}

fn fetch_of(effect: &MentionEffect) -> (u64, String) {
    match effect {
        MentionEffect::Fetch(request) => (request.generation, request.query.clone()),
        other => panic!("expected a fetch, got {other:?}"),
    }
}

#[tokio::test]
async fn out_of_order_resolution_keeps_latest_query() {
    let provider = StaticDirectory::new(["albert", "alice", "alicia"]);
    let mut composer = Composer::new();

    composer.insert_str("cc @a");
    let (gen_al, query_al) = fetch_of(&composer.insert_char('l'));
    let (gen_ali, query_ali) = fetch_of(&composer.insert_char('i'));

    let ali = provider.search_users(&query_ali).await.unwrap();
    assert_eq!(composer.resolve(gen_ali, ali.clone()), MentionEffect::None);

    let al = provider.search_users(&query_al).await.unwrap();
    assert_eq!(composer.resolve(gen_al, al), MentionEffect::Discarded);
    assert_eq!(composer.mention().suggestions(), ali.as_slice());
}

#[tokio::test]
async fn slow_older_query_cannot_overwrite_newer_one() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let provider = Rc::new(Delayed {
                delays: HashMap::from([("al", Duration::from_millis(40))]),
                inner: StaticDirectory::new(["albert", "alice"]),
            });
            let mut session = test_session(provider);

            session.edit(|c| c.insert_str("@al"));
            tokio::task::yield_now().await;
            session.edit(|c| c.insert_char('i'));

            session.settle().await;
            assert_eq!(session.composer().mention().suggestions(), ["alice"]);

            tokio::time::sleep(Duration::from_millis(60)).await;
            assert_eq!(session.drain_resolutions(), 0);
            assert_eq!(session.composer().mention().suggestions(), ["alice"]);
        })
        .await;
}

#[tokio::test]
async fn type_navigate_and_commit() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let mut session = test_session(directory(&["dana", "dani", "danielle", "dom"]));
            session.edit(|c| c.insert_str("Looping in @dan"));
            assert_eq!(session.composer().mention().phase(), MentionPhase::Loading);

            session.settle().await;
            assert_eq!(session.composer().mention().suggestions(), ["dana", "dani", "danielle"]);

            for _ in 0..5 {
                session.key(MentionKey::ArrowDown);
            }
            assert_eq!(session.composer().mention().selected_index(), 2);

            let effect = session.key(MentionKey::Enter);
            assert!(matches!(effect, MentionEffect::Commit(_)));
            assert_eq!(session.composer().text(), "Looping in @danielle ");
            assert_eq!(session.composer().cursor(), 21);
            assert_eq!(session.composer().mention().phase(), MentionPhase::Inactive);

            let committed = find_mentions(session.composer().text());
            assert_eq!(committed.len(), 1);
            assert_eq!(committed[0].username, "danielle");
        })
        .await;
}

#[tokio::test]
async fn typing_continues_after_commit() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let mut session = test_session(directory(&["eve"]));
            session.edit(|c| c.insert_str("@e"));
            session.settle().await;
            session.key(MentionKey::Enter);
            let effect = session.edit(|c| c.insert_str("hello"));
            assert_eq!(effect, MentionEffect::None);
            assert_eq!(session.composer().text(), "@eve hello");
        })
        .await;
}

#[tokio::test]
async fn escape_then_retyping_reopens_suggestions() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let mut session = test_session(directory(&["finn", "fiona"]));
            session.edit(|c| c.insert_str("@fi"));
            session.settle().await;

            session.key(MentionKey::Escape);
            assert!(!session.composer().mention().is_active());
            assert_eq!(session.composer().text(), "@fi");

            session.edit(|c| c.insert_char('o'));
            session.settle().await;
            assert_eq!(session.composer().mention().suggestions(), ["fiona"]);
        })
        .await;
}

#[tokio::test]
async fn enter_with_no_matches_is_left_to_the_host() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let mut session = test_session(directory(&["gus"]));
            session.edit(|c| c.insert_str("@zz"));
            session.settle().await;
            assert_eq!(session.key(MentionKey::Enter), MentionEffect::Ignored);
            assert_eq!(session.composer().text(), "@zz");
        })
        .await;
}

#[test]
fn commit_leaves_only_the_mention_changed() {
    let text = "before @ma after";
    let trigger = detect_trigger(text, 10).unwrap();
    let mut composer = Composer::new();
    composer.set_text(text, 10);
    let generation = composer.mention().generation();
    composer.resolve(generation, vec!["maria".into()]);
    composer.key(MentionKey::Enter);

    let out = composer.text();
    assert_eq!(&out[..trigger.start], &text[..trigger.start]);
    assert_eq!(&out[trigger.start..trigger.start + 7], "@maria ");
    assert_eq!(&out[trigger.start + 7..], &text[trigger.end..]);
}

#[test]
fn pointer_pick_commits_without_navigation() {
    let mut composer = Composer::new();
    composer.set_text("@ha", 3);
    let generation = composer.mention().generation();
    composer.resolve(generation, vec!["hal".into(), "hana".into()]);
    composer.pick(1);
    assert_eq!(composer.text(), "@hana ");
    assert_eq!(composer.cursor(), 6);
}
