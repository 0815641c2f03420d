//! Direct settlement transfers materialized as paired expenses.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{HouseholdError, Result};
use crate::household::{Expense, ExpenseState, Household};

/// Turns a peer-to-peer repayment into two paired ledger entries.
pub struct TransferService;

impl TransferService {
    /// Records that `from` handed `amount` directly to `to`.
    ///
    /// Creates two legs in the synthetic transfer category: `+amount` paid by
    /// `from` and `-amount` attributed to `to`, so the attribution shift
    /// cancels out in aggregate. Both legs open a confirmation round between
    /// the two parties with the initiator's row already confirmed, and settle
    /// through the ordinary confirmation path.
    pub fn transfer(
        household: &mut Household,
        from: Uuid,
        to: Uuid,
        amount: i64,
        date: NaiveDate,
    ) -> Result<(Uuid, Uuid)> {
        if amount <= 0 {
            return Err(HouseholdError::Validation(
                "transfer amount must be positive".into(),
            ));
        }
        if from == to {
            return Err(HouseholdError::Permission(
                "cannot transfer to yourself".into(),
            ));
        }
        let from_name = Self::require_active(household, from)?;
        let to_name = Self::require_active(household, to)?;

        let category_id = household.transfer_category();

        let mut outgoing = Expense::new(
            format!("Transfer to {to_name}"),
            amount,
            category_id,
            from,
            date,
        );
        outgoing.mark_paid(from, date);
        outgoing.reset_confirmations([from, to], Some(from));
        outgoing.state = ExpenseState::AwaitingConfirmation;

        let mut incoming = Expense::new(
            format!("Transfer from {from_name}"),
            -amount,
            category_id,
            to,
            date,
        );
        incoming.mark_paid(to, date);
        incoming.reset_confirmations([from, to], Some(from));
        incoming.state = ExpenseState::AwaitingConfirmation;

        let outgoing_id = household.add_expense(outgoing);
        let incoming_id = household.add_expense(incoming);
        tracing::info!(
            from = %from,
            to = %to,
            amount,
            "transfer recorded as paired legs"
        );
        Ok((outgoing_id, incoming_id))
    }

    fn require_active(household: &Household, member_id: Uuid) -> Result<String> {
        let member = household
            .member(member_id)
            .ok_or_else(|| HouseholdError::NotFound(format!("member {member_id}")))?;
        if !member.is_active {
            return Err(HouseholdError::Permission(
                "transfers are only possible between active members".into(),
            ));
        }
        Ok(member.name.clone())
    }
}
