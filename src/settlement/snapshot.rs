//! Point-in-time settlement input assembled from the aggregate.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::household::{Category, Expense, Household, Member, VacationWindow};

/// Everything one balance computation reads, materialized up front.
///
/// Collected once per computation; the settlement passes never go back to
/// the aggregate mid-algorithm.
#[derive(Debug, Clone)]
pub struct SettlementSnapshot {
    /// Members currently on the roster.
    pub current_roster: Vec<Member>,
    /// Every membership record ever, departed ones included.
    pub historical_roster: Vec<Member>,
    pub vacations: BTreeMap<Uuid, Vec<VacationWindow>>,
    pub categories: BTreeMap<Uuid, Category>,
    /// Expenses with a recorded payment whose payer is still active.
    pub expenses: Vec<Expense>,
}

impl SettlementSnapshot {
    pub fn collect(household: &Household) -> Self {
        Self {
            current_roster: household.active_members().into_iter().cloned().collect(),
            historical_roster: household.members.clone(),
            vacations: household.vacations_by_member(),
            categories: household
                .categories
                .iter()
                .map(|category| (category.id, category.clone()))
                .collect(),
            expenses: household
                .eligible_expenses()
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Ids of the members balances will be reported for.
    pub fn active_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.current_roster.iter().map(|member| member.id)
    }
}
