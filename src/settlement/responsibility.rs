//! Per-expense responsibility resolution.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::household::{Category, Member, VacationWindow};

use super::windows::{active_at, not_on_leave_at};

/// The two member sets an expense is split across.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsibilitySplit {
    /// Responsible members still on the current roster.
    pub current: BTreeSet<Uuid>,
    /// Responsible members at the time of payment, departed ones included.
    pub historical: BTreeSet<Uuid>,
}

impl ResponsibilitySplit {
    /// Shorthand for both cardinalities, `(k, h)`.
    pub fn sizes(&self) -> (usize, usize) {
        (self.current.len(), self.historical.len())
    }
}

/// Members of `roster` that owe a share of an expense in `category` paid by
/// `payer` on `date`.
///
/// Non-shared categories resolve to the payer alone. The payer is always
/// responsible for their own expense, present on the roster or not.
pub fn responsible_set(
    roster: &[Member],
    vacations: &BTreeMap<Uuid, Vec<VacationWindow>>,
    payer: Uuid,
    category: &Category,
    date: NaiveDate,
) -> BTreeSet<Uuid> {
    if !category.is_shared {
        return BTreeSet::from([payer]);
    }
    let mut candidates = active_at(roster, date);
    if !category.is_shared_on_leave {
        candidates = not_on_leave_at(&candidates, vacations, date);
    }
    candidates.insert(payer);
    candidates
}

/// Resolves the current and historical responsible sets for one expense.
///
/// `current_roster` must be a subset of `historical_roster`, which makes the
/// historical set a superset of the current one.
pub fn split_for(
    current_roster: &[Member],
    historical_roster: &[Member],
    vacations: &BTreeMap<Uuid, Vec<VacationWindow>>,
    payer: Uuid,
    category: &Category,
    date: NaiveDate,
) -> ResponsibilitySplit {
    ResponsibilitySplit {
        current: responsible_set(current_roster, vacations, payer, category, date),
        historical: responsible_set(historical_roster, vacations, payer, category, date),
    }
}
