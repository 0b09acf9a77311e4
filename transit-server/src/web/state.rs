//! Application state for the web layer.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::Connection;
use crate::feed::{Timetable, TimetableError};
use crate::planner::{JourneyPlanner, PlannerConfig};
use crate::transfers::{TransferMap, TransferOutOfRange, TransferRow};

/// Error loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Timetable(#[from] TimetableError),

    #[error(transparent)]
    Transfer(#[from] TransferOutOfRange),
}

/// On-disk dataset shape: stop count, connection rows, transfer rows.
#[derive(Debug, Deserialize)]
struct DatasetFile {
    n_stops: usize,
    connections: Vec<Connection>,
    #[serde(default)]
    transfers: Vec<TransferRow>,
}

/// The immutable schedule data all queries run against.
pub struct Dataset {
    pub timetable: Timetable,
    pub transfers: TransferMap,
}

impl Dataset {
    /// Bundle an already-built timetable and transfer map.
    pub fn new(timetable: Timetable, transfers: TransferMap) -> Self {
        Self {
            timetable,
            transfers,
        }
    }

    /// Load and validate a dataset from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate a dataset from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let file: DatasetFile = serde_json::from_str(raw)?;
        let timetable = Timetable::new(file.n_stops, file.connections)?;
        let transfers = TransferMap::from_rows(file.n_stops, &file.transfers)?;
        Ok(Self {
            timetable,
            transfers,
        })
    }
}

/// Shared application state.
///
/// The dataset is immutable, so handlers share it through `Arc`s and each
/// request builds its own short-lived planner over it.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(dataset: Dataset, config: PlannerConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
        }
    }

    /// A planner over this state's dataset.
    pub fn planner(&self) -> JourneyPlanner<'_> {
        JourneyPlanner::new(&self.dataset.timetable, &self.dataset.transfers, &self.config)
    }
}
