use super::{Packing, PackingStrategy, StrategyKind};
use crate::model::Piece;
use crate::units::Length;

/// Each piece goes on the first bar, in creation order, with room for it.
pub struct FirstFitDecreasing;

impl PackingStrategy for FirstFitDecreasing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FirstFit
    }

    fn pack(&self, stock: Length, kerf: Length, pieces: &[Piece]) -> Packing {
        let mut packing = Packing::default();
        for piece in pieces {
            let placed = packing.bars.iter_mut().any(|bar| bar.try_place(piece));
            if !placed {
                packing.open_bar(stock, kerf, piece);
            }
        }
        packing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InstanceId;

    fn pieces(lens: &[i64]) -> Vec<Piece> {
        lens.iter()
            .enumerate()
            .map(|(i, &l)| Piece {
                instance: InstanceId {
                    request: i,
                    ordinal: 0,
                },
                length: Length::from_whole(l),
                source_row: i + 2,
                segment: None,
            })
            .collect()
    }

    fn lengths(packing: &Packing) -> Vec<Vec<i64>> {
        packing
            .bars
            .iter()
            .map(|b| {
                b.placements()
                    .iter()
                    .map(|p| p.length.micros() / Length::SCALE)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_takes_first_bar_that_fits() {
        // 7 would fit tighter on bar 2 but first-fit takes bar 1.
        let p = pieces(&[12, 14, 7]);
        let packing = FirstFitDecreasing.pack(Length::from_whole(20), Length::ZERO, &p);
        assert_eq!(lengths(&packing), vec![vec![12, 7], vec![14]]);
        assert!(packing.unplaced.is_empty());
    }

    #[test]
    fn test_kerf_exact_fit() {
        let p = pieces(&[12, 12, 12, 12]);
        let packing = FirstFitDecreasing.pack(Length::from_whole(25), Length::from_whole(1), &p);
        assert_eq!(lengths(&packing), vec![vec![12, 12], vec![12, 12]]);
        assert!(packing.bars.iter().all(|b| b.used() == Length::from_whole(25)));
    }

    #[test]
    fn test_piece_longer_than_stock_is_unplaced() {
        let p = pieces(&[30, 10]);
        let packing = FirstFitDecreasing.pack(Length::from_whole(25), Length::ZERO, &p);
        assert_eq!(packing.unplaced.len(), 1);
        assert_eq!(packing.bars.len(), 1);
    }
}
