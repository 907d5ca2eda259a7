use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

use super::EntityId;

/// Which watch list a show sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    WatchLater,
    ContinueWatching,
}

impl WatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchState::WatchLater => "watch_later",
            WatchState::ContinueWatching => "continue_watching",
        }
    }
}

impl Display for WatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watch_later" | "watch-later" => Ok(WatchState::WatchLater),
            "continue_watching" | "continue-watching" => Ok(WatchState::ContinueWatching),
            other => Err(AppError::Validation(format!(
                "unknown watch state '{}', expected watch_later or continue_watching",
                other
            ))),
        }
    }
}

/// A show on one of a user's watch lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub id: EntityId,
    pub user_name: String,
    pub state: WatchState,
    pub show_id: EntityId,
    pub created_at: DateTime<Utc>,
}

/// Storage row for the `watches` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WatchRow {
    pub id: EntityId,
    pub user_name: String,
    pub state: String,
    pub show_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WatchRow> for WatchEntry {
    type Error = AppError;

    fn try_from(row: WatchRow) -> Result<Self, Self::Error> {
        Ok(WatchEntry {
            id: row.id,
            user_name: row.user_name,
            state: row.state.parse()?,
            show_id: row.show_id,
            created_at: row.created_at,
        })
    }
}
