//! The expense confirmation lifecycle: record, witness, edit, delete.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{HouseholdError, Result};
use crate::household::{Expense, ExpenseState, Household, Member};
use crate::settlement::responsibility::responsible_set;

/// Validated operations that move an expense through its lifecycle.
///
/// Every operation checks completely before mutating, so a returned error
/// leaves the aggregate untouched. Exclusive (`&mut`) access to the
/// aggregate serializes concurrent confirmations; wrap the household in a
/// `Mutex` when calls race.
pub struct ExpenseService;

impl ExpenseService {
    /// Creates a pending expense and returns its identifier.
    pub fn create(
        household: &mut Household,
        description: impl Into<String>,
        amount: i64,
        category_id: Uuid,
        created_by: Uuid,
        created_on: NaiveDate,
    ) -> Result<Uuid> {
        if amount <= 0 {
            return Err(HouseholdError::Validation(
                "expense amount must be positive".into(),
            ));
        }
        if household.category(category_id).is_none() {
            return Err(HouseholdError::NotFound(format!("category {category_id}")));
        }
        Self::require_active_member(household, created_by)?;

        let expense = Expense::new(description, amount, category_id, created_by, created_on);
        let id = household.add_expense(expense);
        tracing::debug!(expense = %id, "expense created");
        Ok(id)
    }

    /// Records the actual payment of a pending expense.
    ///
    /// Computes the responsible set at `paid_on` against the current roster;
    /// a singleton set settles immediately, anything larger opens a
    /// confirmation round with one unconfirmed row per responsible member.
    pub fn record_payment(
        household: &mut Household,
        expense_id: Uuid,
        payer: Uuid,
        paid_on: NaiveDate,
        today: NaiveDate,
    ) -> Result<()> {
        Self::require_active_member(household, payer)?;
        if paid_on > today {
            return Err(HouseholdError::Validation(
                "payment date cannot be in the future".into(),
            ));
        }
        let expense = household
            .expense(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        if expense.state != ExpenseState::Pending {
            return Err(HouseholdError::State(
                "payment can only be recorded on a pending expense".into(),
            ));
        }

        let responsible = Self::current_responsible_set(household, expense_id, payer, paid_on)?;
        let settled = responsible.len() == 1;
        let expense = household
            .expense_mut(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        expense.mark_paid(payer, paid_on);
        if settled {
            // The singleton is necessarily the payer; no witness needed.
            expense.reset_confirmations(responsible, Some(payer));
            expense.state = ExpenseState::Settled;
        } else {
            expense.reset_confirmations(responsible, None);
            expense.state = ExpenseState::AwaitingConfirmation;
        }
        household.touch();
        tracing::debug!(expense = %expense_id, payer = %payer, settled, "payment recorded");
        Ok(())
    }

    /// Witnesses an awaiting expense on behalf of one responsible member.
    pub fn confirm(household: &mut Household, expense_id: Uuid, member_id: Uuid) -> Result<()> {
        let expense = household
            .expense(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        if expense.state != ExpenseState::AwaitingConfirmation {
            return Err(HouseholdError::State(
                "expense is not awaiting confirmation".into(),
            ));
        }
        match expense.confirmation(member_id) {
            None => {
                return Err(HouseholdError::Permission(
                    "member is not responsible for this expense".into(),
                ))
            }
            Some(row) if row.confirmed => {
                return Err(HouseholdError::State(
                    "member already confirmed this expense".into(),
                ))
            }
            Some(_) => {}
        }

        let expense = household
            .expense_mut(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        if let Some(row) = expense.confirmation_mut(member_id) {
            row.confirmed = true;
        }
        if expense.fully_confirmed() {
            expense.state = ExpenseState::Settled;
            tracing::info!(expense = %expense_id, "expense fully confirmed");
        }
        household.touch();
        Ok(())
    }

    /// Edits an expense's amount, and its date while it is still pending.
    ///
    /// Once payment is recorded only the confirmed payer may edit, and the
    /// edit resets the expense to a fresh confirmation round in which only
    /// the editor's own row starts confirmed.
    pub fn edit(
        household: &mut Household,
        expense_id: Uuid,
        editor: Uuid,
        new_amount: i64,
        new_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<()> {
        Self::require_active_member(household, editor)?;
        if new_amount <= 0 {
            return Err(HouseholdError::Validation(
                "expense amount must be positive".into(),
            ));
        }
        if new_date.map_or(false, |date| date > today) {
            return Err(HouseholdError::Validation(
                "expense date cannot be in the future".into(),
            ));
        }
        let expense = household
            .expense(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        if Self::is_transfer_leg(household, expense) {
            return Err(HouseholdError::Permission(
                "transfer legs are managed by settlement and cannot be edited".into(),
            ));
        }

        match expense.state {
            ExpenseState::Pending => {
                let expense = household
                    .expense_mut(expense_id)
                    .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
                expense.amount = new_amount;
                if let Some(date) = new_date {
                    expense.created_on = date;
                }
                household.touch();
                tracing::debug!(expense = %expense_id, "pending expense edited");
                Ok(())
            }
            ExpenseState::AwaitingConfirmation | ExpenseState::Settled => {
                if expense.paid_by != Some(editor) {
                    return Err(HouseholdError::Permission(
                        "only the confirmed payer may edit a paid expense".into(),
                    ));
                }
                if new_date.is_some() {
                    return Err(HouseholdError::State(
                        "the date can only change while the expense is pending".into(),
                    ));
                }
                let paid_on = expense.paid_on.ok_or_else(|| {
                    HouseholdError::State("paid expense is missing its payment date".into())
                })?;

                let responsible =
                    Self::current_responsible_set(household, expense_id, editor, paid_on)?;
                let settled = responsible.len() == 1;
                let expense = household
                    .expense_mut(expense_id)
                    .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
                expense.amount = new_amount;
                expense.reset_confirmations(responsible, Some(editor));
                expense.state = if settled {
                    ExpenseState::Settled
                } else {
                    ExpenseState::AwaitingConfirmation
                };
                household.touch();
                tracing::debug!(expense = %expense_id, editor = %editor, "paid expense edited, confirmations reset");
                Ok(())
            }
        }
    }

    /// Deletes an expense: freely while pending, afterwards only by the
    /// confirmed payer.
    pub fn delete(
        household: &mut Household,
        expense_id: Uuid,
        requester: Uuid,
    ) -> Result<Expense> {
        if household.member(requester).is_none() {
            return Err(HouseholdError::NotFound(format!("member {requester}")));
        }
        let expense = household
            .expense(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        let allowed =
            expense.state == ExpenseState::Pending || expense.paid_by == Some(requester);
        if !allowed {
            return Err(HouseholdError::Permission(
                "only the confirmed payer may delete a paid expense".into(),
            ));
        }
        let removed = household
            .remove_expense(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        tracing::debug!(expense = %expense_id, requester = %requester, "expense deleted");
        Ok(removed)
    }

    /// Responsible set at `date` for a fresh confirmation round: the current
    /// roster stands in for both the current and historical roster, since the
    /// round starts now.
    fn current_responsible_set(
        household: &Household,
        expense_id: Uuid,
        payer: Uuid,
        date: NaiveDate,
    ) -> Result<BTreeSet<Uuid>> {
        let expense = household
            .expense(expense_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("expense {expense_id}")))?;
        let category = household
            .category(expense.category_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("category {}", expense.category_id)))?;
        let roster: Vec<Member> = household.active_members().into_iter().cloned().collect();
        let vacations = household.vacations_by_member();
        Ok(responsible_set(&roster, &vacations, payer, category, date))
    }

    fn is_transfer_leg(household: &Household, expense: &Expense) -> bool {
        household
            .category(expense.category_id)
            .map_or(false, |category| category.is_transfer)
    }

    fn require_active_member(household: &Household, member_id: Uuid) -> Result<()> {
        let member = household
            .member(member_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("member {member_id}")))?;
        if !member.is_active {
            return Err(HouseholdError::Permission(
                "departed members cannot act on household expenses".into(),
            ));
        }
        Ok(())
    }
}
