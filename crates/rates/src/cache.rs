//! On-disk snapshot of the rate board.
//!
//! The snapshot is written after every successful refresh and read back on
//! startup, so the service can quote from the last known rates when the
//! provider is unreachable.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sarrafa_core::currency::{Currency, CurrencyTable};
use sarrafa_shared::CurrencyCode;

use crate::board::RateBoard;
use crate::error::RatesError;

/// Serialized form of a [`RateBoard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Base currency of the board.
    pub base: CurrencyCode,
    /// Listed currencies with their last rates.
    pub currencies: Vec<Currency>,
    /// Last successful refresh.
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

impl From<&RateBoard> for BoardSnapshot {
    fn from(board: &RateBoard) -> Self {
        Self {
            base: board.table.base().clone(),
            currencies: board.table.currencies().to_vec(),
            last_update: board.last_update,
        }
    }
}

impl TryFrom<BoardSnapshot> for RateBoard {
    type Error = RatesError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            table: CurrencyTable::new(snapshot.base, snapshot.currencies)?,
            last_update: snapshot.last_update,
        })
    }
}

/// JSON file holding the latest [`BoardSnapshot`].
#[derive(Debug, Clone)]
pub struct RateCache {
    path: PathBuf,
}

impl RateCache {
    /// Cache stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, or `None` if nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<RateBoard>, RatesError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: BoardSnapshot = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), currencies = snapshot.currencies.len(), "Rate cache loaded");
        RateBoard::try_from(snapshot).map(Some)
    }

    /// Writes the snapshot, replacing any previous one.
    pub async fn save(&self, board: &RateBoard) -> Result<(), RatesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&BoardSnapshot::from(board))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), "Rate cache saved");
        Ok(())
    }
}
