use std::path::{Path, PathBuf};

use super::model::DatasetKind;

/// Message shown while any upload slot is still empty.
pub const WAITING_MESSAGE: &str = "Please upload all required datasets to begin.";

// ---------------------------------------------------------------------------
// Upload slots
// ---------------------------------------------------------------------------

/// The four upload slots of a session. Each holds the path of the chosen
/// file, or `None` until one is picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uploads {
    pub emissions: Option<PathBuf>,
    pub fertilizers: Option<PathBuf>,
    pub crops: Option<PathBuf>,
    pub food_supply: Option<PathBuf>,
}

/// All four slots filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyUploads<'a> {
    pub emissions: &'a Path,
    pub fertilizers: &'a Path,
    pub crops: &'a Path,
    pub food_supply: &'a Path,
}

/// Outcome of the ingestion gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness<T> {
    Ready(T),
    /// Nothing is computed; `missing` lists the empty slots.
    Waiting { missing: Vec<DatasetKind> },
}

impl<T> Readiness<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

fn non_empty(path: &Path) -> Option<&Path> {
    (!path.as_os_str().is_empty()).then_some(path)
}

impl Uploads {
    fn slot_mut(&mut self, kind: DatasetKind) -> &mut Option<PathBuf> {
        match kind {
            DatasetKind::Emissions => &mut self.emissions,
            DatasetKind::Fertilizers => &mut self.fertilizers,
            DatasetKind::Crops => &mut self.crops,
            DatasetKind::FoodSupply => &mut self.food_supply,
        }
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&Path> {
        match kind {
            DatasetKind::Emissions => self.emissions.as_deref(),
            DatasetKind::Fertilizers => self.fertilizers.as_deref(),
            DatasetKind::Crops => self.crops.as_deref(),
            DatasetKind::FoodSupply => self.food_supply.as_deref(),
        }
    }

    /// Fill a slot, returning the path it replaced.
    pub fn set(&mut self, kind: DatasetKind, path: PathBuf) -> Option<PathBuf> {
        self.slot_mut(kind).replace(path)
    }

    /// All-or-nothing check: `Ready` iff every slot holds a non-empty path.
    pub fn check(&self) -> Readiness<ReadyUploads<'_>> {
        match (
            self.emissions.as_deref().and_then(non_empty),
            self.fertilizers.as_deref().and_then(non_empty),
            self.crops.as_deref().and_then(non_empty),
            self.food_supply.as_deref().and_then(non_empty),
        ) {
            (Some(emissions), Some(fertilizers), Some(crops), Some(food_supply)) => {
                Readiness::Ready(ReadyUploads {
                    emissions,
                    fertilizers,
                    crops,
                    food_supply,
                })
            }
            _ => Readiness::Waiting {
                missing: DatasetKind::ALL
                    .into_iter()
                    .filter(|k| self.get(*k).and_then(non_empty).is_none())
                    .collect(),
            },
        }
    }
}
