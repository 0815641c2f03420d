//! Balance composition and category reporting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{HouseholdError, Result};
use crate::household::Household;
use crate::settlement::{
    netting::{settle, TransferInstruction},
    responsibility::split_for,
    snapshot::SettlementSnapshot,
    totals::ContributionTotals,
};

/// Outcome of one balance computation over a household snapshot.
#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub totals: ContributionTotals,
    /// `actual - expected` per active member; positive means overpaid.
    pub net: BTreeMap<Uuid, i64>,
    /// Repayment instructions keyed by debtor.
    pub transfers: BTreeMap<Uuid, Vec<TransferInstruction>>,
}

/// Composes windowing, responsibility, aggregation, and netting.
pub struct BalanceService;

impl BalanceService {
    /// Computes who owes whom across all eligible expenses.
    pub fn compute_balance(household: &Household) -> BalanceReport {
        let snapshot = SettlementSnapshot::collect(household);
        Self::compute_from_snapshot(&snapshot)
    }

    /// Same computation over an already collected snapshot.
    pub fn compute_from_snapshot(snapshot: &SettlementSnapshot) -> BalanceReport {
        let mut totals = ContributionTotals::for_members(snapshot.active_ids());

        for expense in &snapshot.expenses {
            let Some(payer) = expense.paid_by else { continue };
            let Some(category) = snapshot.categories.get(&expense.category_id) else {
                continue;
            };
            if category.is_transfer {
                totals.apply_transfer(payer, expense.amount);
                continue;
            }
            let date = expense.paid_on.unwrap_or(expense.created_on);
            let split = split_for(
                &snapshot.current_roster,
                &snapshot.historical_roster,
                &snapshot.vacations,
                payer,
                category,
                date,
            );
            totals.apply_expense(payer, expense.amount, &split);
        }

        let net = totals.net();
        let transfers = settle(&net);
        tracing::debug!(
            members = net.len(),
            expenses = snapshot.expenses.len(),
            "balance computed"
        );
        BalanceReport {
            totals,
            net,
            transfers,
        }
    }

    /// Per-category spend inside a reporting window.
    ///
    /// Transfer legs and hidden categories stay out of the report.
    pub fn category_totals(household: &Household, window: DateWindow) -> Vec<CategoryTotal> {
        let snapshot = SettlementSnapshot::collect(household);
        let mut report: BTreeMap<Uuid, CategoryTotal> = BTreeMap::new();

        for expense in &snapshot.expenses {
            let Some(category) = snapshot.categories.get(&expense.category_id) else {
                continue;
            };
            if category.is_transfer || category.hidden {
                continue;
            }
            let date = expense.paid_on.unwrap_or(expense.created_on);
            if !window.contains(date) {
                continue;
            }
            report
                .entry(category.id)
                .or_insert_with(|| CategoryTotal {
                    category_id: category.id,
                    name: category.name.clone(),
                    total: 0,
                })
                .total += expense.amount;
        }

        let mut totals: Vec<CategoryTotal> = report.into_values().collect();
        totals.sort_by(|a, b| a.name.cmp(&b.name));
        totals
    }
}

/// Half-open reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(HouseholdError::Validation(
                "window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Spend attributed to one category inside a reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub total: i64,
}
