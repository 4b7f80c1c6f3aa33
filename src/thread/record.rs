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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation status carried by comment/answer records. Only `DELETED`
/// affects threading; anything else is kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Deleted,
    #[serde(other)]
    Other,
}

/// One comment, answer or question as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<RecordStatus>,
}

impl CommentRecord {
    /// Soft-deleted records keep their place in the tree but lose their content.
    #[must_use]
    pub fn is_soft_deleted(&self) -> bool {
        self.deleted_at.is_some() || self.status == Some(RecordStatus::Deleted)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("comment payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("comment payload must be a JSON array of records")]
    NotAnArray,
    #[error("record #{index} (id {id}) is malformed: {source}")]
    InvalidRecord {
        index: usize,
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a JSON array of records.
///
/// Entries without an integer `id` are skipped with a warning so they cannot
/// end up in the tree. Any other malformed entry fails the whole payload.
pub fn decode_records(json: &str) -> Result<Vec<CommentRecord>, RecordError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(RecordError::NotAnArray);
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Some(id) = entry.get("id").and_then(serde_json::Value::as_i64) else {
            tracing::warn!(index, "skipping comment record without an integer id");
            continue;
        };
        let record = serde_json::from_value::<CommentRecord>(entry)
            .map_err(|source| RecordError::InvalidRecord { index, id, source })?;
        records.push(record);
    }
    Ok(records)
}
