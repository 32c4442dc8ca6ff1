use crate::model::CutRequest;
use crate::units::Length;
use fastrand::Rng;

pub const DEFAULT_SEED: u64 = 404;

const MATERIALS: [&str; 6] = [
    "Steel Rod",
    "Aluminum Pipe",
    "Brass Tube",
    "PVC",
    "Copper Pipe",
    "Stainless Bar",
];
const STOCK_LENGTHS: [i64; 4] = [96, 120, 144, 168];

/// Share of rows drawn longer than their stock, to exercise issue handling.
const OVERSIZE_RATE: f64 = 0.15;

fn uniform(rng: &mut Rng, lo: f64, hi: f64) -> f64 {
    lo + rng.f64() * (hi - lo)
}

/// Two decimal places, exactly.
fn hundredths(value: f64) -> Length {
    Length::from_micros((value * 100.0).round() as i64 * (Length::SCALE / 100))
}

/// A reproducible demo cut list of `rows` single-quantity rows.
pub fn generate_cut_list(rows: usize, seed: u64) -> Vec<CutRequest> {
    let mut rng = Rng::with_seed(seed);
    (0..rows)
        .map(|i| {
            let material = MATERIALS[rng.usize(..MATERIALS.len())];
            let stock = STOCK_LENGTHS[rng.usize(..STOCK_LENGTHS.len())];
            let (lo, hi) = if rng.f64() < OVERSIZE_RATE {
                (stock as f64 + 1.0, stock as f64 + 40.0)
            } else {
                (6.0, stock as f64 - 4.0)
            };
            CutRequest {
                length: hundredths(uniform(&mut rng, lo, hi)),
                material: material.to_string(),
                max_stock_length: Length::from_whole(stock),
                quantity: 1,
                source_row: i + 2,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rows() {
        assert_eq!(generate_cut_list(20, 7), generate_cut_list(20, 7));
    }

    #[test]
    fn test_rows_are_valid_requests() {
        for cut in generate_cut_list(200, DEFAULT_SEED) {
            assert!(cut.length >= Length::from_whole(6));
            assert!(cut.length <= cut.max_stock_length + Length::from_whole(40));
            assert_eq!(cut.length.micros() % 10_000, 0);
        }
    }
}
