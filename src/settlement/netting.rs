//! Greedy debt netting into peer-to-peer transfer instructions.

use std::collections::BTreeMap;

use uuid::Uuid;

/// A single repayment instruction produced by netting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstruction {
    pub to: Uuid,
    pub amount: i64,
}

/// Converts per-member net balances into per-debtor repayment lists.
///
/// Debtors and creditors are both consumed in ascending member id; each
/// debtor pays `min(remaining debt, remaining credit)` to the current
/// creditor until its debt reaches zero. Members that already balance and
/// creditors never appear as keys.
///
/// The per-debtor sum always equals the debtor's absolute net; which creditor
/// receives which slice is deterministic but otherwise arbitrary.
pub fn settle(net: &BTreeMap<Uuid, i64>) -> BTreeMap<Uuid, Vec<TransferInstruction>> {
    let mut creditors: Vec<(Uuid, i64)> = net
        .iter()
        .filter(|(_, balance)| **balance > 0)
        .map(|(id, balance)| (*id, *balance))
        .collect();

    let mut instructions = BTreeMap::new();
    let mut credit_idx = 0usize;

    for (debtor, balance) in net {
        if *balance >= 0 {
            continue;
        }
        let mut owed = -balance;
        let mut repayments = Vec::new();
        while owed > 0 {
            let Some((creditor, remaining)) = creditors.get_mut(credit_idx) else {
                break;
            };
            let portion = owed.min(*remaining);
            repayments.push(TransferInstruction {
                to: *creditor,
                amount: portion,
            });
            owed -= portion;
            *remaining -= portion;
            if *remaining == 0 {
                credit_idx += 1;
            }
        }
        instructions.insert(*debtor, repayments);
    }

    instructions
}
