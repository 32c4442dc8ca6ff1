use crate::model::{Bar, CutInstance, InstanceId, Piece};
use crate::packing::Packing;
use crate::units::Length;
use std::collections::HashSet;

/// Splits instances into (placeable, oversize) by comparing each length
/// against the group's stock length.
pub fn partition_oversize(
    stock: Length,
    instances: &[CutInstance],
) -> (Vec<CutInstance>, Vec<CutInstance>) {
    instances.iter().partition(|inst| inst.length <= stock)
}

/// Result of splitting one oversize instance into stock-sized segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPieces {
    /// Bars filled end to end by a single segment.
    pub full_bars: Vec<Bar>,
    /// What is left after the full segments, if anything.
    pub remainder: Option<Piece>,
}

/// Cuts an oversize instance into as many full-stock segments as it needs,
/// plus a remainder that goes through the normal packer. Full segments sit
/// alone on their bar, so no kerf applies to them.
pub fn split_oversize(stock: Length, kerf: Length, inst: &CutInstance) -> SplitPieces {
    let mut full_bars = Vec::new();
    let mut remaining = inst.length;
    let mut segment = 0u32;

    while remaining > stock {
        let mut bar = Bar::new(stock, kerf);
        bar.try_place(&Piece {
            instance: inst.id,
            length: stock,
            source_row: inst.source_row,
            segment: Some(segment),
        });
        full_bars.push(bar);
        remaining = remaining - stock;
        segment += 1;
    }

    let remainder = remaining.is_positive().then_some(Piece {
        instance: inst.id,
        length: remaining,
        source_row: inst.source_row,
        segment: Some(segment),
    });

    SplitPieces {
        full_bars,
        remainder,
    }
}

/// Every piece that does not appear in any bar of `packing`.
pub fn find_unplaceable(pieces: &[Piece], packing: &Packing) -> Vec<Piece> {
    let placed: HashSet<(InstanceId, Option<u32>)> = packing
        .bars
        .iter()
        .flat_map(|bar| bar.placements())
        .map(|p| (p.instance, p.segment))
        .collect();

    pieces
        .iter()
        .filter(|p| !placed.contains(&(p.instance, p.segment)))
        .copied()
        .collect()
}
