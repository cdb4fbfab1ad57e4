use super::grid::GridSpec;
use crate::consts;
use enum_map::{enum_map, Enum, EnumMap};
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::Position;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// The two tiers of fruit
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum FoodKind {
    /// Frequent, low-value fruit
    Common,

    /// Infrequent, high-value fruit
    Rare,
}

/// A fruit on the grid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Food {
    pub(crate) position: Position,
    pub(crate) kind: FoodKind,
}

impl Food {
    pub(crate) fn new(position: Position, kind: FoodKind) -> Food {
        Food { position, kind }
    }
}

/// Reward & spawn weight for a single [`FoodKind`]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct FoodSpec {
    /// Points awarded for eating the fruit
    pub(crate) reward: u32,

    /// Likelihood of a new fruit being of this kind, relative to the weights
    /// of the other kinds
    pub(crate) weight: u32,
}

/// Rewards & spawn weights for every kind of fruit.  The weights always sum
/// to a positive number.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "RawFoodTable")]
pub(crate) struct FoodTable {
    specs: EnumMap<FoodKind, FoodSpec>,
    total_weight: u32,
}

impl FoodTable {
    pub(crate) fn new(specs: EnumMap<FoodKind, FoodSpec>) -> Result<FoodTable, FoodTableError> {
        let total_weight = specs
            .values()
            .try_fold(0u32, |acc, spec| acc.checked_add(spec.weight))
            .ok_or(FoodTableError::Overflow)?;
        if total_weight == 0 {
            return Err(FoodTableError::ZeroWeight);
        }
        Ok(FoodTable {
            specs,
            total_weight,
        })
    }

    pub(crate) fn reward(&self, kind: FoodKind) -> u32 {
        self.specs[kind].reward
    }

    /// Pick a kind of fruit at random according to the configured weights
    ///
    /// # Panics
    ///
    /// Panics if `total_weight` is not the sum of the weights, which
    /// [`FoodTable::new()`] guarantees it is.
    pub(crate) fn choose<R: Rng>(&self, rng: &mut R) -> FoodKind {
        let mut roll = rng.random_range(0..self.total_weight);
        for (kind, spec) in &self.specs {
            if roll < spec.weight {
                return kind;
            }
            roll -= spec.weight;
        }
        unreachable!("FoodTable::choose() rolled past the total weight of the table");
    }
}

impl Default for FoodTable {
    fn default() -> FoodTable {
        FoodTable {
            specs: enum_map! {
                FoodKind::Common => FoodSpec {
                    reward: consts::COMMON_FOOD_REWARD,
                    weight: consts::COMMON_FOOD_WEIGHT,
                },
                FoodKind::Rare => FoodSpec {
                    reward: consts::RARE_FOOD_REWARD,
                    weight: consts::RARE_FOOD_WEIGHT,
                },
            },
            total_weight: consts::COMMON_FOOD_WEIGHT + consts::RARE_FOOD_WEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct RawFoodTable {
    common: Option<FoodSpec>,
    rare: Option<FoodSpec>,
}

impl TryFrom<RawFoodTable> for FoodTable {
    type Error = FoodTableError;

    fn try_from(value: RawFoodTable) -> Result<FoodTable, FoodTableError> {
        let defaults = FoodTable::default().specs;
        FoodTable::new(enum_map! {
            FoodKind::Common => value.common.unwrap_or(defaults[FoodKind::Common]),
            FoodKind::Rare => value.rare.unwrap_or(defaults[FoodKind::Rare]),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum FoodTableError {
    #[error("at least one kind of fruit must have a positive weight")]
    ZeroWeight,
    #[error("fruit weights are too large")]
    Overflow,
}

/// Returned by [`FoodSpawner::spawn()`] when every cell of the grid is taken
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("no free cells left on the grid")]
pub(crate) struct GridFull;

/// Places new fruits on free cells of the grid
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FoodSpawner<R> {
    rng: R,
    table: FoodTable,
}

impl<R: Rng> FoodSpawner<R> {
    pub(crate) fn new(rng: R, table: FoodTable) -> FoodSpawner<R> {
        FoodSpawner { rng, table }
    }

    /// Create a fruit on a cell of `grid` chosen uniformly from those not in
    /// `occupied`.  The fruit's kind is drawn from the spawner's
    /// [`FoodTable`].
    pub(crate) fn spawn(
        &mut self,
        grid: GridSpec,
        occupied: &HashSet<Position>,
    ) -> Result<Food, GridFull> {
        let position = grid
            .positions()
            .filter(|p| !occupied.contains(p))
            .choose(&mut self.rng)
            .ok_or(GridFull)?;
        let kind = self.table.choose(&mut self.rng);
        Ok(Food::new(position, kind))
    }

    pub(crate) fn table(&self) -> &FoodTable {
        &self.table
    }
}
