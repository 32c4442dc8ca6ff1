use crate::model::{CutInstance, CutRequest, Group, GroupKey, InstanceId};
use crate::units::Length;
use std::collections::BTreeMap;

/// Splits the cut list into (material, stock length) groups.
///
/// Quantities are expanded into individual instances. Each group is sorted
/// longest-first; the sort is stable, so equal lengths keep input order.
/// Groups come back ordered by key.
pub fn group_cuts(cuts: &[CutRequest]) -> Vec<Group> {
    let mut buckets: BTreeMap<GroupKey, Vec<CutInstance>> = BTreeMap::new();

    for (idx, cut) in cuts.iter().enumerate() {
        let bucket = buckets.entry(cut.key()).or_default();
        bucket.extend((0..cut.quantity).map(|ordinal| CutInstance {
            id: InstanceId {
                request: idx,
                ordinal,
            },
            length: cut.length,
            source_row: cut.source_row,
        }));
    }

    buckets
        .into_iter()
        .map(|(key, mut instances)| {
            instances.sort_by(|a, b| b.length.cmp(&a.length));
            Group { key, instances }
        })
        .collect()
}

/// Largest stock length offered per material.
pub fn largest_stock_by_material(cuts: &[CutRequest]) -> BTreeMap<String, Length> {
    let mut out: BTreeMap<String, Length> = BTreeMap::new();
    for cut in cuts {
        let entry = out.entry(cut.material.clone()).or_insert(Length::ZERO);
        if cut.max_stock_length > *entry {
            *entry = cut.max_stock_length;
        }
    }
    out
}

pub fn total_instances(cuts: &[CutRequest]) -> usize {
    cuts.iter().map(|c| c.quantity as usize).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(len: i64, mat: &str, stock: i64, qty: u32, row: usize) -> CutRequest {
        CutRequest::new(
            Length::from_whole(len),
            mat,
            Length::from_whole(stock),
            qty,
            row,
        )
        .unwrap()
    }

    #[test]
    fn test_groups_by_material_and_stock() {
        let cuts = vec![
            req(10, "Pine", 96, 1, 2),
            req(20, "Oak", 96, 1, 3),
            req(30, "Pine", 120, 1, 4),
            req(40, "Pine", 96, 2, 5),
        ];
        let groups = group_cuts(&cuts);
        let keys: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, vec!["96 Oak", "96 Pine", "120 Pine"]);

        let pine96 = &groups[1];
        assert_eq!(pine96.instances.len(), 3);
        assert_eq!(pine96.instances[0].length, Length::from_whole(40));
        assert_eq!(pine96.instances[1].id.ordinal, 1);
        assert_eq!(pine96.instances[2].length, Length::from_whole(10));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let cuts = vec![
            req(10, "Pine", 96, 1, 2),
            req(12, "Pine", 96, 1, 3),
            req(10, "Pine", 96, 1, 4),
        ];
        let groups = group_cuts(&cuts);
        let rows: Vec<usize> = groups[0].instances.iter().map(|i| i.source_row).collect();
        assert_eq!(rows, vec![3, 2, 4]);
    }

    #[test]
    fn test_largest_stock() {
        let cuts = vec![req(10, "Pine", 96, 1, 2), req(10, "Pine", 144, 1, 3)];
        let largest = largest_stock_by_material(&cuts);
        assert_eq!(largest["Pine"], Length::from_whole(144));
        assert_eq!(total_instances(&cuts), 2);
    }
}
