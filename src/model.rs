use crate::error::{CfResult, CutForgeError};
use crate::units::Length;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum_macros::{Display, EnumString};

/// One row of the cut list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRequest {
    pub length: Length,
    pub material: String,
    pub max_stock_length: Length,
    pub quantity: u32,
    /// Row in the source sheet, for traceability.
    pub source_row: usize,
}

impl CutRequest {
    pub fn new(
        length: Length,
        material: impl Into<String>,
        max_stock_length: Length,
        quantity: u32,
        source_row: usize,
    ) -> CfResult<Self> {
        if !length.is_positive() {
            return Err(CutForgeError::Validation(format!(
                "Row {}: cut length must be greater than zero",
                source_row
            )));
        }
        if !max_stock_length.is_positive() {
            return Err(CutForgeError::Validation(format!(
                "Row {}: max length must be greater than zero",
                source_row
            )));
        }
        if quantity == 0 {
            return Err(CutForgeError::Validation(format!(
                "Row {}: quantity must be at least 1",
                source_row
            )));
        }
        Ok(Self {
            length,
            material: material.into(),
            max_stock_length,
            quantity,
            source_row,
        })
    }

    pub fn key(&self) -> GroupKey {
        GroupKey {
            material: self.material.clone(),
            stock_length: self.max_stock_length,
        }
    }
}

/// Identifies one physical piece: request index plus ordinal within its
/// quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    pub request: usize,
    pub ordinal: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutInstance {
    pub id: InstanceId,
    pub length: Length,
    pub source_row: usize,
}

/// What the packer sees. Usually a whole instance; with oversize splitting
/// enabled it may be one segment of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub instance: InstanceId,
    pub length: Length,
    pub source_row: usize,
    pub segment: Option<u32>,
}

impl From<&CutInstance> for Piece {
    fn from(inst: &CutInstance) -> Self {
        Self {
            instance: inst.id,
            length: inst.length,
            source_row: inst.source_row,
            segment: None,
        }
    }
}

/// Ordered by material, then stock length.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub material: String,
    pub stock_length: Length,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stock_length, self.material)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: GroupKey,
    pub instances: Vec<CutInstance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub instance: InstanceId,
    /// Ordinal within the bar.
    pub position: usize,
    pub length: Length,
    pub source_row: usize,
    pub segment: Option<u32>,
}

/// One stick of stock. `used` never exceeds `stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    stock: Length,
    kerf: Length,
    used: Length,
    placements: Vec<Placement>,
}

impl Bar {
    pub fn new(stock: Length, kerf: Length) -> Self {
        Self {
            stock,
            kerf,
            used: Length::ZERO,
            placements: Vec::new(),
        }
    }

    /// Length consumed by adding `length`, including the kerf boundary if
    /// the bar already holds a cut.
    #[inline]
    pub fn required(&self, length: Length) -> Length {
        if self.placements.is_empty() {
            length
        } else {
            self.kerf + length
        }
    }

    /// Leftover after placing `length`, or `None` if it does not fit.
    #[inline]
    pub fn leftover_after(&self, length: Length) -> Option<Length> {
        let after = self.used + self.required(length);
        (after <= self.stock).then(|| self.stock - after)
    }

    #[inline]
    pub fn fits(&self, length: Length) -> bool {
        self.leftover_after(length).is_some()
    }

    pub fn try_place(&mut self, piece: &Piece) -> bool {
        if !self.fits(piece.length) {
            return false;
        }
        self.used += self.required(piece.length);
        self.placements.push(Placement {
            instance: piece.instance,
            position: self.placements.len(),
            length: piece.length,
            source_row: piece.source_row,
            segment: piece.segment,
        });
        true
    }

    /// The same bar re-cut without the given instances, or `None` if
    /// nothing would be left on it.
    pub fn without(&self, dropped: &BTreeSet<InstanceId>) -> Option<Bar> {
        let mut bar = Bar::new(self.stock, self.kerf);
        for p in self.placements.iter().filter(|p| !dropped.contains(&p.instance)) {
            bar.try_place(&Piece {
                instance: p.instance,
                length: p.length,
                source_row: p.source_row,
                segment: p.segment,
            });
        }
        (!bar.is_empty()).then_some(bar)
    }

    pub fn stock(&self) -> Length {
        self.stock
    }

    pub fn used(&self) -> Length {
        self.used
    }

    pub fn leftover(&self) -> Length {
        self.stock - self.used
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn cut_length(&self) -> Length {
        self.placements.iter().map(|p| p.length).sum()
    }

    pub fn kerf_used(&self) -> Length {
        self.kerf.times(self.placements.len().saturating_sub(1))
    }

    /// used / stock.
    pub fn utilization(&self) -> f64 {
        self.used.ratio(self.stock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueReason {
    Oversize,
    Unplaceable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub instance: InstanceId,
    pub source_row: usize,
    pub reason: IssueReason,
    pub material: String,
    pub stock_length: Length,
    pub requested: Length,
    /// Largest stock length available for this material anywhere in the
    /// input.
    pub largest_stock: Length,
}

impl Issue {
    pub fn problem(&self) -> &'static str {
        match self.reason {
            IssueReason::Oversize => {
                "Cut length exceeds stock; cannot be produced as a single piece."
            }
            IssueReason::Unplaceable => "Packing heuristic could not place this cut.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(len: i64) -> Piece {
        Piece {
            instance: InstanceId {
                request: 0,
                ordinal: 0,
            },
            length: Length::from_whole(len),
            source_row: 2,
            segment: None,
        }
    }

    #[test]
    fn test_kerf_only_between_cuts() {
        let mut bar = Bar::new(Length::from_whole(25), Length::from_whole(1));
        assert!(bar.try_place(&piece(12)));
        assert_eq!(bar.used(), Length::from_whole(12));
        assert!(bar.try_place(&piece(12)));
        assert_eq!(bar.used(), Length::from_whole(25));
        assert_eq!(bar.kerf_used(), Length::from_whole(1));
        assert_eq!(bar.leftover(), Length::ZERO);
        assert!(!bar.try_place(&piece(1)));
        assert_eq!(bar.placements()[1].position, 1);
    }

    #[test]
    fn test_rejects_overflow() {
        let mut bar = Bar::new(Length::from_whole(10), Length::ZERO);
        assert!(!bar.try_place(&piece(11)));
        assert!(bar.is_empty());
    }

    #[test]
    fn test_without_recuts_remaining_pieces() {
        let mut bar = Bar::new(Length::from_whole(25), Length::from_whole(1));
        let mut other = piece(5);
        other.instance.request = 1;
        assert!(bar.try_place(&piece(12)));
        assert!(bar.try_place(&other));

        let dropped: BTreeSet<InstanceId> = [piece(0).instance].into_iter().collect();
        let rest = bar.without(&dropped).unwrap();
        assert_eq!(rest.used(), Length::from_whole(5));
        assert_eq!(rest.placements()[0].position, 0);

        let everything: BTreeSet<InstanceId> = [piece(0).instance, other.instance].into_iter().collect();
        assert!(bar.without(&everything).is_none());
    }

    #[test]
    fn test_request_validation() {
        let ok = CutRequest::new(Length::from_whole(5), "Pine", Length::from_whole(96), 1, 2);
        assert!(ok.is_ok());
        assert!(CutRequest::new(Length::ZERO, "Pine", Length::from_whole(96), 1, 2).is_err());
        assert!(CutRequest::new(Length::from_whole(5), "Pine", Length::ZERO, 1, 2).is_err());
        assert!(CutRequest::new(Length::from_whole(5), "Pine", Length::from_whole(9), 0, 2).is_err());
    }

    #[test]
    fn test_group_key_label() {
        let key = GroupKey {
            material: "Steel Rod".into(),
            stock_length: Length::from_micros(96_500_000),
        };
        assert_eq!(key.to_string(), "96.5 Steel Rod");
    }
}
