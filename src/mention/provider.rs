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

use super::state::Username;
use anyhow::Context as _;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Source of username suggestions for a mention query.
///
/// Errors are allowed here; the session turns them into an empty list so they
/// never reach the editing UI.
#[async_trait(?Send)]
pub trait SuggestionProvider {
    async fn search_users(&self, prefix: &str) -> anyhow::Result<Vec<Username>>;
}

/// In-memory user directory.
///
/// Matching is case-insensitive. Names starting with the query come first,
/// then names containing it elsewhere, each group in directory order.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<Username>,
}

impl StaticDirectory {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Username>,
    {
        Self { users: users.into_iter().map(Into::into).collect() }
    }

    /// Load a JSON array of usernames.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read user list {}", path.display()))?;
        let users: Vec<Username> = serde_json::from_str(&content)
            .with_context(|| format!("user list {} is not a JSON array of strings", path.display()))?;
        Ok(Self { users })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn matches(&self, prefix: &str) -> Vec<Username> {
        if prefix.is_empty() {
            return self.users.clone();
        }
        let needle = prefix.to_lowercase();
        let (mut leading, inner): (Vec<&Username>, Vec<&Username>) = self
            .users
            .iter()
            .filter(|u| u.to_lowercase().contains(&needle))
            .partition(|u| u.to_lowercase().starts_with(&needle));
        leading.extend(inner);
        leading.into_iter().cloned().collect()
    }
}

#[async_trait(?Send)]
impl SuggestionProvider for StaticDirectory {
    async fn search_users(&self, prefix: &str) -> anyhow::Result<Vec<Username>> {
        Ok(self.matches(prefix))
    }
}

/// Remote user directory queried as `GET <endpoint>?q=<prefix>`, answering
/// with a JSON array of usernames.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    timeout: Duration,
}

impl HttpDirectory {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = reqwest::Url::parse(endpoint)
            .with_context(|| format!("invalid directory url `{endpoint}`"))?;
        Ok(Self { client: reqwest::Client::new(), endpoint, timeout })
    }

    fn search_url(&self, prefix: &str) -> anyhow::Result<reqwest::Url> {
        Ok(reqwest::Url::parse_with_params(self.endpoint.as_str(), &[("q", prefix)])?)
    }
}

#[async_trait(?Send)]
impl SuggestionProvider for HttpDirectory {
    async fn search_users(&self, prefix: &str) -> anyhow::Result<Vec<Username>> {
        let url = self.search_url(prefix)?;
        let users = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Username>>()
            .await?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directory() -> StaticDirectory {
        StaticDirectory::new(["Malia", "alan", "Alice", "bob", "sal"])
    }

    #[tokio::test]
    async fn prefix_matches_rank_before_substring_matches() {
        let found = directory().search_users("al").await.unwrap();
        assert_eq!(found, ["alan", "Alice", "Malia", "sal"]);
    }

    #[tokio::test]
    async fn empty_prefix_returns_everyone() {
        let found = directory().search_users("").await.unwrap();
        assert_eq!(found.len(), 5);
    }

    #[tokio::test]
    async fn no_match_is_empty() {
        assert!(directory().search_users("zed").await.unwrap().is_empty());
    }

    #[test]
    fn loads_user_list_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"["amy", "ben"]"#).unwrap();
        assert_eq!(StaticDirectory::from_json_file(&path).unwrap().len(), 2);
    }

    #[test]
    fn rejects_malformed_user_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"{"users": []}"#).unwrap();
        assert!(StaticDirectory::from_json_file(&path).is_err());
    }

    #[test]
    fn http_directory_encodes_query() {
        let directory =
            HttpDirectory::new("https://example.test/api/users/search", Duration::from_secs(1))
                .unwrap();
        let url = directory.search_url("a b&c").unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/users/search?q=a+b%26c");
    }

    #[test]
    fn http_directory_rejects_bad_url() {
        assert!(HttpDirectory::new("not a url", Duration::from_secs(1)).is_err());
    }
}
