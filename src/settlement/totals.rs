//! Aggregation of eligible expenses into per-member contribution totals.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::responsibility::ResponsibilitySplit;

/// Per-member actual and fair-share contribution totals, in smallest
/// currency units.
///
/// Only currently active members carry entries; accruals that would land on a
/// departed member are dropped, which is what writes their historical share
/// off the active ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionTotals {
    pub actual: BTreeMap<Uuid, i64>,
    pub expected: BTreeMap<Uuid, i64>,
}

impl ContributionTotals {
    /// Zeroed totals for every member that will be reported.
    pub fn for_members(members: impl IntoIterator<Item = Uuid>) -> Self {
        let mut totals = Self::default();
        for member in members {
            totals.actual.insert(member, 0);
            totals.expected.insert(member, 0);
        }
        totals
    }

    /// Folds one ordinary shared expense into the totals.
    ///
    /// The amount is split into `|historical|` integer shares. The payer's
    /// actual contribution takes exactly the shares of still-present members
    /// (the `amount * k / h` rescaling, with exact remainders), and each
    /// historical member accrues their own share as expected contribution.
    pub fn apply_expense(&mut self, payer: Uuid, amount: i64, split: &ResponsibilitySplit) {
        let shares = split_amount(amount, split.historical.len());
        let mut current_portion = 0i64;
        for (member, share) in split.historical.iter().zip(shares) {
            if let Some(entry) = self.expected.get_mut(member) {
                *entry += share;
            }
            if split.current.contains(member) {
                current_portion += share;
            }
        }
        if let Some(entry) = self.actual.get_mut(&payer) {
            *entry += current_portion;
        }
    }

    /// Folds one transfer leg: a pure attribution shift, no fair-share accrual.
    pub fn apply_transfer(&mut self, payer: Uuid, amount: i64) {
        if let Some(entry) = self.actual.get_mut(&payer) {
            *entry += amount;
        }
    }

    /// `actual - expected` per member. Positive means the member overpaid.
    pub fn net(&self) -> BTreeMap<Uuid, i64> {
        self.actual
            .iter()
            .map(|(member, actual)| {
                let expected = self.expected.get(member).copied().unwrap_or(0);
                (*member, actual - expected)
            })
            .collect()
    }
}

/// Splits `amount` into `parts` integer shares differing by at most one unit.
///
/// The leading shares absorb the remainder, so the shares always sum back to
/// `amount` exactly. `parts == 0` yields no shares.
pub fn split_amount(amount: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let parts_i = parts as i64;
    let base = amount / parts_i;
    let remainder = amount % parts_i;
    (0..parts_i)
        .map(|idx| if idx < remainder { base + 1 } else { base })
        .collect()
}
