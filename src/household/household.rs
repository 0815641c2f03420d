use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{HouseholdError, Result};

use super::{
    category::Category,
    expense::{Expense, ExpenseState},
    member::{Member, VacationWindow},
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Aggregate root the settlement engine operates against.
///
/// Owns the member roster, vacation windows, categories, and expenses of one
/// household. Callers that need concurrent mutation wrap the aggregate in a
/// `Mutex`; exclusive access is the serialization point for the confirmation
/// transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub vacations: Vec<VacationWindow>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Household::schema_version_default")]
    pub schema_version: u8,
}

impl Household {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members: Vec::new(),
            vacations: Vec::new(),
            categories: Vec::new(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_member(&mut self, member: Member) -> Uuid {
        let id = member.id;
        self.members.push(member);
        self.touch();
        id
    }

    /// Closes a membership: the leave date is set and the active flag cleared.
    pub fn close_member(&mut self, id: Uuid, left_on: NaiveDate) -> Result<()> {
        let member = self
            .member_mut(id)
            .ok_or_else(|| HouseholdError::NotFound(format!("member {id}")))?;
        member.close(left_on);
        self.touch();
        Ok(())
    }

    /// Registers a vacation window, rejecting overlaps with the member's
    /// existing windows.
    pub fn add_vacation(&mut self, window: VacationWindow) -> Result<()> {
        if self.member(window.member_id).is_none() {
            return Err(HouseholdError::NotFound(format!(
                "member {}",
                window.member_id
            )));
        }
        let clash = self
            .vacations
            .iter()
            .filter(|existing| existing.member_id == window.member_id)
            .any(|existing| existing.overlaps(&window));
        if clash {
            return Err(HouseholdError::Validation(
                "vacation window overlaps an existing one".into(),
            ));
        }
        self.vacations.push(window);
        self.touch();
        Ok(())
    }

    /// Adds a category, enforcing (name, scope) uniqueness.
    pub fn add_category(&mut self, category: Category) -> Result<Uuid> {
        let duplicate = self
            .categories
            .iter()
            .any(|existing| existing.name == category.name && existing.scope == category.scope);
        if duplicate {
            return Err(HouseholdError::Validation(format!(
                "category '{}' already exists",
                category.name
            )));
        }
        let id = category.id;
        self.categories.push(category);
        self.touch();
        Ok(id)
    }

    /// Returns the synthetic transfer category, creating it on first use.
    pub fn transfer_category(&mut self) -> Uuid {
        if let Some(category) = self.categories.iter().find(|c| c.is_transfer) {
            return category.id;
        }
        let category = Category::transfer();
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        let removed = self.expenses.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn member(&self, id: Uuid) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn member_mut(&mut self, id: Uuid) -> Option<&mut Member> {
        self.members.iter_mut().find(|member| member.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    /// Members currently on the roster.
    pub fn active_members(&self) -> Vec<&Member> {
        self.members.iter().filter(|m| m.is_active).collect()
    }

    pub fn is_active_member(&self, id: Uuid) -> bool {
        self.member(id).is_some_and(|m| m.is_active)
    }

    /// Vacation windows indexed per member.
    pub fn vacations_by_member(&self) -> BTreeMap<Uuid, Vec<VacationWindow>> {
        let mut index: BTreeMap<Uuid, Vec<VacationWindow>> = BTreeMap::new();
        for window in &self.vacations {
            index.entry(window.member_id).or_default().push(window.clone());
        }
        index
    }

    /// Expenses that feed the balance computation: payment recorded, payer
    /// still on the roster. A departed member's solo spending stays out.
    pub fn eligible_expenses(&self) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|expense| {
                matches!(
                    expense.state,
                    ExpenseState::AwaitingConfirmation | ExpenseState::Settled
                )
            })
            .filter(|expense| {
                expense
                    .paid_by
                    .is_some_and(|payer| self.is_active_member(payer))
            })
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
