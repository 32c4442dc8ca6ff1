use super::{Packing, PackingStrategy, StrategyKind};
use crate::model::Piece;
use crate::units::Length;

/// Each piece goes on the bar it leaves the least room on. Ties go to the
/// older bar.
pub struct BestFitDecreasing;

impl PackingStrategy for BestFitDecreasing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BestFit
    }

    fn pack(&self, stock: Length, kerf: Length, pieces: &[Piece]) -> Packing {
        let mut packing = Packing::default();
        for piece in pieces {
            let best = packing
                .bars
                .iter()
                .enumerate()
                .filter_map(|(idx, bar)| bar.leftover_after(piece.length).map(|left| (left, idx)))
                .min();

            match best {
                Some((_, idx)) => {
                    packing.bars[idx].try_place(piece);
                }
                None => packing.open_bar(stock, kerf, piece),
            }
        }
        packing
    }
}
