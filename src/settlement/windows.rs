//! Pure membership and leave window resolvers.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::household::{Member, VacationWindow};

/// Members whose membership window contained `date`.
pub fn active_at(members: &[Member], date: NaiveDate) -> BTreeSet<Uuid> {
    members
        .iter()
        .filter(|member| member.was_present_on(date))
        .map(|member| member.id)
        .collect()
}

/// Drops every candidate that was on leave on `date`.
///
/// A member with no recorded windows is never removed.
pub fn not_on_leave_at(
    candidates: &BTreeSet<Uuid>,
    vacations: &BTreeMap<Uuid, Vec<VacationWindow>>,
    date: NaiveDate,
) -> BTreeSet<Uuid> {
    candidates
        .iter()
        .filter(|id| {
            vacations
                .get(id)
                .map_or(true, |windows| !windows.iter().any(|w| w.covers(date)))
        })
        .copied()
        .collect()
}
