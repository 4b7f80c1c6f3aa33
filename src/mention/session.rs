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

//! Debounced, cancellable suggestion fetching around a [`Composer`].
//!
//! Fetches run as local tasks (`spawn_local`), so the session must be driven
//! from inside a `tokio::task::LocalSet`. Each new fetch cancels the one
//! before it; whatever still slips through is filtered by generation when the
//! resolution is applied.

use super::composer::Composer;
use super::provider::SuggestionProvider;
use super::state::{FetchRequest, MentionEffect, MentionKey, Username};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);
pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Quiet period after the last keystroke before the provider is called.
    pub debounce: Duration,
    /// Suggestions kept from each provider answer.
    pub max_suggestions: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { debounce: DEFAULT_DEBOUNCE, max_suggestions: DEFAULT_MAX_SUGGESTIONS }
    }
}

/// A finished fetch, tagged with the generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub generation: u64,
    pub suggestions: Vec<Username>,
}

pub struct MentionSession {
    composer: Composer,
    provider: Rc<dyn SuggestionProvider>,
    options: SessionOptions,
    pending: Option<CancellationToken>,
    resolution_tx: mpsc::UnboundedSender<Resolution>,
    resolution_rx: mpsc::UnboundedReceiver<Resolution>,
}

impl MentionSession {
    pub fn new(provider: Rc<dyn SuggestionProvider>, options: SessionOptions) -> Self {
        let (resolution_tx, resolution_rx) = mpsc::unbounded_channel();
        Self {
            composer: Composer::new(),
            provider,
            options,
            pending: None,
            resolution_tx,
            resolution_rx,
        }
    }

    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Run one edit against the composer and act on its effect.
    ///
    /// ```ignore
    /// session.edit(|c| c.insert_str("@al"));
    /// ```
    pub fn edit(&mut self, f: impl FnOnce(&mut Composer) -> MentionEffect) -> MentionEffect {
        let effect = f(&mut self.composer);
        self.dispatch(effect)
    }

    pub fn key(&mut self, key: MentionKey) -> MentionEffect {
        self.edit(|c| c.key(key))
    }

    pub fn pick(&mut self, index: usize) -> MentionEffect {
        self.edit(|c| c.pick(index))
    }

    /// Apply a resolution through the state machine.
    pub fn apply_resolution(&mut self, resolution: Resolution) -> MentionEffect {
        let Resolution { generation, suggestions } = resolution;
        self.composer.resolve(generation, suggestions)
    }

    /// Wait for the next resolution without applying it.
    pub async fn next_resolution(&mut self) -> Option<Resolution> {
        self.resolution_rx.recv().await
    }

    /// Wait until the current generation has been applied.
    ///
    /// Returns `None` right away when nothing is loading. Stale resolutions
    /// received on the way are dropped.
    pub async fn settle(&mut self) -> Option<MentionEffect> {
        while self.composer.mention().is_loading() {
            let resolution = self.resolution_rx.recv().await?;
            let effect = self.apply_resolution(resolution);
            if effect != MentionEffect::Discarded {
                return Some(effect);
            }
        }
        None
    }

    /// Apply every resolution already queued. Returns how many were applied
    /// (stale ones are not counted).
    pub fn drain_resolutions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(resolution) = self.resolution_rx.try_recv() {
            if self.apply_resolution(resolution) != MentionEffect::Discarded {
                applied += 1;
            }
        }
        applied
    }

    fn dispatch(&mut self, effect: MentionEffect) -> MentionEffect {
        if let MentionEffect::Fetch(request) = &effect {
            self.schedule(request.clone());
        } else if !self.composer.mention().is_active() {
            self.cancel_pending();
        }
        effect
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    fn schedule(&mut self, request: FetchRequest) {
        self.cancel_pending();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let provider = Rc::clone(&self.provider);
        let tx = self.resolution_tx.clone();
        let SessionOptions { debounce, max_suggestions } = self.options;

        tokio::task::spawn_local(async move {
            let FetchRequest { generation, query } = request;
            let lookup = async {
                tokio::time::sleep(debounce).await;
                match provider.search_users(&query).await {
                    Ok(mut users) => {
                        users.truncate(max_suggestions);
                        users
                    }
                    Err(err) => {
                        tracing::warn!(generation, query = %query, "user search failed: {err:#}");
                        Vec::new()
                    }
                }
            };

            let suggestions = tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(generation, "suggestion fetch superseded");
                    return;
                }
                users = lookup => users,
            };

            let _ = tx.send(Resolution { generation, suggestions });
        });
    }
}

impl Drop for MentionSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::provider::StaticDirectory;
    use crate::mention::state::MentionPhase;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct Failing;

    #[derive(Default)]
    struct Counting {
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl SuggestionProvider for Counting {
        async fn search_users(&self, _prefix: &str) -> anyhow::Result<Vec<Username>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Vec::new())
        }
    }

    #[async_trait(?Send)]
    impl SuggestionProvider for Failing {
        async fn search_users(&self, _prefix: &str) -> anyhow::Result<Vec<Username>> {
            Err(anyhow::anyhow!("directory offline"))
        }
    }

    fn fast() -> SessionOptions {
        SessionOptions { debounce: Duration::ZERO, max_suggestions: 2 }
    }

    #[tokio::test]
    async fn settle_applies_current_generation() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let provider = Rc::new(StaticDirectory::new(["alice", "alan", "albert"]));
                let mut session = MentionSession::new(provider, fast());
                session.edit(|c| c.insert_str("@al"));

                let effect = session.settle().await;
                assert_eq!(effect, Some(MentionEffect::None));
                assert_eq!(session.composer().mention().phase(), MentionPhase::Loaded);
                assert_eq!(session.composer().mention().suggestions(), ["alice", "alan"]);
            })
            .await;
    }

    #[tokio::test]
    async fn provider_error_resolves_to_empty_list() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let mut session = MentionSession::new(Rc::new(Failing), fast());
                session.edit(|c| c.insert_str("hey @x"));
                session.settle().await;
                let mention = session.composer().mention();
                assert!(mention.is_active());
                assert!(!mention.is_loading());
                assert!(mention.suggestions().is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn superseded_fetch_never_resolves() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let provider = Rc::new(StaticDirectory::new(["alice", "alan"]));
                let options = SessionOptions { debounce: Duration::from_millis(20), ..fast() };
                let mut session = MentionSession::new(provider, options);
                session.edit(|c| c.insert_str("@al"));
                session.edit(|c| c.insert_char('i'));

                let resolution = session.next_resolution().await.unwrap();
                assert_eq!(resolution.generation, session.composer().mention().generation());
                assert_eq!(resolution.suggestions, ["alice"]);
            })
            .await;
    }

    #[tokio::test]
    async fn dropping_session_cancels_pending_fetch() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let provider = Rc::new(Counting::default());
                let options = SessionOptions { debounce: Duration::from_millis(20), ..fast() };
                let shared: Rc<dyn SuggestionProvider> = Rc::<Counting>::clone(&provider);
                let mut session = MentionSession::new(shared, options);
                session.edit(|c| c.insert_str("@a"));
                drop(session);

                tokio::time::sleep(Duration::from_millis(60)).await;
                assert_eq!(provider.calls.get(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn settle_without_active_mention_returns_none() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let provider = Rc::new(StaticDirectory::default());
                let mut session = MentionSession::new(provider, fast());
                session.edit(|c| c.insert_str("no mention here"));
                assert_eq!(session.settle().await, None);
            })
            .await;
    }

    #[tokio::test]
    async fn commit_through_session_updates_text() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let provider = Rc::new(StaticDirectory::new(["bob", "bobby"]));
                let mut session = MentionSession::new(provider, fast());
                session.edit(|c| c.insert_str("thanks @bo"));
                session.settle().await;
                session.key(MentionKey::ArrowDown);
                let effect = session.key(MentionKey::Enter);
                assert!(matches!(effect, MentionEffect::Commit(_)));
                assert_eq!(session.composer().text(), "thanks @bobby ");
                assert_eq!(session.drain_resolutions(), 0);
            })
            .await;
    }
}
