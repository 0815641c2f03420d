//! Expense records and their confirmation rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cost entry owned by the household.
///
/// Amounts are integers in the smallest currency unit. Ordinary expenses are
/// strictly positive; negative amounts only appear on paired transfer legs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: i64,
    pub category_id: Uuid,
    /// Member that created the record; the payer candidate.
    pub created_by: Uuid,
    /// Member that recorded the actual payment, once someone has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<Uuid>,
    pub created_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    pub state: ExpenseState,
    #[serde(default)]
    pub confirmations: Vec<Confirmation>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: i64,
        category_id: Uuid,
        created_by: Uuid,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            category_id,
            created_by,
            paid_by: None,
            created_on,
            paid_on: None,
            state: ExpenseState::Pending,
            confirmations: Vec::new(),
        }
    }

    /// Stamps the confirmed payer and payment date.
    pub fn mark_paid(&mut self, payer: Uuid, paid_on: NaiveDate) {
        self.paid_by = Some(payer);
        self.paid_on = Some(paid_on);
    }

    pub fn confirmation(&self, member_id: Uuid) -> Option<&Confirmation> {
        self.confirmations.iter().find(|c| c.member_id == member_id)
    }

    pub fn confirmation_mut(&mut self, member_id: Uuid) -> Option<&mut Confirmation> {
        self.confirmations
            .iter_mut()
            .find(|c| c.member_id == member_id)
    }

    /// Whether every confirmation row has been witnessed.
    ///
    /// An expense with no rows is not considered confirmed; rows only exist
    /// once the expense has left `Pending`.
    pub fn fully_confirmed(&self) -> bool {
        !self.confirmations.is_empty() && self.confirmations.iter().all(|c| c.confirmed)
    }

    /// Installs a fresh confirmation round for the given responsible members,
    /// optionally pre-confirming one of them.
    pub fn reset_confirmations(
        &mut self,
        responsible: impl IntoIterator<Item = Uuid>,
        pre_confirmed: Option<Uuid>,
    ) {
        self.confirmations = responsible
            .into_iter()
            .map(|member_id| Confirmation {
                member_id,
                confirmed: pre_confirmed == Some(member_id),
            })
            .collect();
    }
}

/// Lifecycle of an expense from creation to fully witnessed settlement.
///
/// None of the states is terminal: an edit by the confirmed payer sends a
/// settled expense back to `AwaitingConfirmation`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseState {
    Pending,
    AwaitingConfirmation,
    Settled,
}

/// One member's witness row for a paid expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Confirmation {
    pub member_id: Uuid,
    pub confirmed: bool,
}
