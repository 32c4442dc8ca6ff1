//! One-dimensional bin packing.
//!
//! A [`PackingStrategy`] takes the pieces of a single group, already sorted
//! longest-first, and returns the bars it filled. Strategies never fail: a
//! piece they cannot place is handed back in [`Packing::unplaced`].

pub mod best_fit;
pub mod first_fit;

pub use self::best_fit::BestFitDecreasing;
pub use self::first_fit::FirstFitDecreasing;

use crate::model::{Bar, Piece};
use crate::units::Length;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Packing {
    pub bars: Vec<Bar>,
    pub unplaced: Vec<Piece>,
}

impl Packing {
    /// Starts a fresh bar with `piece` as its first cut (no kerf charged).
    pub fn open_bar(&mut self, stock: Length, kerf: Length, piece: &Piece) {
        let mut bar = Bar::new(stock, kerf);
        if bar.try_place(piece) {
            self.bars.push(bar);
        } else {
            self.unplaced.push(*piece);
        }
    }
}

pub trait PackingStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn pack(&self, stock: Length, kerf: Length, pieces: &[Piece]) -> Packing;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    FirstFit,
    BestFit,
}

impl StrategyKind {
    pub fn strategy(self) -> Box<dyn PackingStrategy> {
        match self {
            Self::FirstFit => Box::new(FirstFitDecreasing),
            Self::BestFit => Box::new(BestFitDecreasing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_strategy_names_round_trip() {
        for kind in StrategyKind::iter() {
            let parsed = StrategyKind::from_str(&kind.to_string()).unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(kind.strategy().kind(), kind);
        }
        assert_eq!(StrategyKind::FirstFit.to_string(), "first-fit");
        assert!(StrategyKind::from_str("worst-fit").is_err());
    }
}
