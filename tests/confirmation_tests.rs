mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use common::{date, shared_flat};
use household_core::errors::HouseholdError;
use household_core::household::ExpenseState;
use household_core::services::ExpenseService;

#[test]
fn record_then_confirm_all_drives_the_expense_to_settled() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");

    let stored = fixture.household.expense(expense).expect("expense exists");
    assert_eq!(stored.state, ExpenseState::AwaitingConfirmation);
    assert_eq!(stored.confirmations.len(), 3);
    assert_eq!(stored.paid_by, Some(fixture.ana));

    ExpenseService::confirm(&mut fixture.household, expense, fixture.ana).expect("ana confirms");
    ExpenseService::confirm(&mut fixture.household, expense, fixture.bruno)
        .expect("bruno confirms");
    assert_eq!(
        fixture.household.expense(expense).expect("exists").state,
        ExpenseState::AwaitingConfirmation,
        "one missing confirmation keeps the expense open"
    );

    ExpenseService::confirm(&mut fixture.household, expense, fixture.carla)
        .expect("carla confirms");
    assert_eq!(
        fixture.household.expense(expense).expect("exists").state,
        ExpenseState::Settled
    );
}

#[test]
fn re_confirmation_is_rejected_and_changes_nothing() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");
    ExpenseService::confirm(&mut fixture.household, expense, fixture.bruno)
        .expect("first confirmation");

    let err = ExpenseService::confirm(&mut fixture.household, expense, fixture.bruno)
        .expect_err("second confirmation must fail");
    assert!(matches!(err, HouseholdError::State(_)));

    let stored = fixture.household.expense(expense).expect("exists");
    assert_eq!(stored.state, ExpenseState::AwaitingConfirmation);
    assert_eq!(
        stored
            .confirmations
            .iter()
            .filter(|row| row.confirmed)
            .count(),
        1
    );
}

#[test]
fn strangers_cannot_confirm() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");

    let err = ExpenseService::confirm(&mut fixture.household, expense, uuid::Uuid::new_v4())
        .expect_err("non-responsible member must fail");
    assert!(matches!(err, HouseholdError::Permission(_)));
}

#[test]
fn pending_expenses_cannot_be_confirmed() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");

    let err = ExpenseService::confirm(&mut fixture.household, expense, fixture.ana)
        .expect_err("pending expense must fail");
    assert!(matches!(err, HouseholdError::State(_)));
}

#[test]
fn only_the_payer_may_edit_a_paid_expense() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");

    let err = ExpenseService::edit(
        &mut fixture.household,
        expense,
        fixture.bruno,
        1500,
        None,
        today,
    )
    .expect_err("non-payer edit must fail");
    assert!(matches!(err, HouseholdError::Permission(_)));
    assert_eq!(
        fixture.household.expense(expense).expect("exists").amount,
        1200
    );
}

#[test]
fn payer_edit_resets_the_confirmation_round() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");
    for member in [fixture.ana, fixture.bruno, fixture.carla] {
        ExpenseService::confirm(&mut fixture.household, expense, member).expect("confirm");
    }
    assert_eq!(
        fixture.household.expense(expense).expect("exists").state,
        ExpenseState::Settled
    );

    ExpenseService::edit(
        &mut fixture.household,
        expense,
        fixture.ana,
        1800,
        None,
        today,
    )
    .expect("payer edit succeeds");

    let stored = fixture.household.expense(expense).expect("exists");
    assert_eq!(stored.amount, 1800);
    assert_eq!(stored.state, ExpenseState::AwaitingConfirmation);
    assert!(
        stored.confirmation(fixture.ana).expect("ana row").confirmed,
        "the editor keeps their own confirmation"
    );
    assert!(!stored.confirmation(fixture.bruno).expect("bruno row").confirmed);

    ExpenseService::confirm(&mut fixture.household, expense, fixture.bruno)
        .expect("bruno re-confirms");
    ExpenseService::confirm(&mut fixture.household, expense, fixture.carla)
        .expect("carla re-confirms");
    assert_eq!(
        fixture.household.expense(expense).expect("exists").state,
        ExpenseState::Settled
    );
}

#[test]
fn date_changes_are_pending_only() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");

    ExpenseService::edit(
        &mut fixture.household,
        expense,
        fixture.bruno,
        1200,
        Some(date(2024, 4, 28)),
        today,
    )
    .expect("anyone may edit a pending expense");
    assert_eq!(
        fixture.household.expense(expense).expect("exists").created_on,
        date(2024, 4, 28)
    );

    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");
    let err = ExpenseService::edit(
        &mut fixture.household,
        expense,
        fixture.ana,
        1200,
        Some(date(2024, 4, 1)),
        today,
    )
    .expect_err("date change after payment must fail");
    assert!(matches!(err, HouseholdError::State(_)));
}

#[test]
fn delete_is_free_while_pending_and_payer_only_afterwards() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let pending = ExpenseService::create(
        &mut fixture.household,
        "Pending",
        500,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create pending expense");
    ExpenseService::delete(&mut fixture.household, pending, fixture.carla)
        .expect("anyone may delete a pending expense");

    let paid = ExpenseService::create(
        &mut fixture.household,
        "Paid",
        500,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create paid expense");
    ExpenseService::record_payment(&mut fixture.household, paid, fixture.ana, today, today)
        .expect("record payment");

    let err = ExpenseService::delete(&mut fixture.household, paid, fixture.bruno)
        .expect_err("non-payer delete must fail");
    assert!(matches!(err, HouseholdError::Permission(_)));

    ExpenseService::delete(&mut fixture.household, paid, fixture.ana)
        .expect("payer may delete at any state");
    assert!(fixture.household.expense(paid).is_none());
}

#[test]
fn concurrent_confirmations_settle_exactly_once() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");

    let members = [fixture.ana, fixture.bruno, fixture.carla];
    let shared = Arc::new(Mutex::new(fixture.household));

    thread::scope(|scope| {
        let handles: Vec<_> = members
            .into_iter()
            .map(|member| {
                let shared = Arc::clone(&shared);
                scope.spawn(move || {
                    let mut household = shared.lock().expect("lock household");
                    ExpenseService::confirm(&mut household, expense, member)
                        .expect("each member confirms once");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread joins");
        }
    });

    let household = shared.lock().expect("lock household");
    assert_eq!(
        household.expense(expense).expect("exists").state,
        ExpenseState::Settled
    );
}

#[test]
fn concurrent_double_submit_counts_once() {
    let mut fixture = shared_flat();
    let today = date(2024, 5, 1);

    let expense = ExpenseService::create(
        &mut fixture.household,
        "Groceries",
        1200,
        fixture.groceries,
        fixture.ana,
        today,
    )
    .expect("create expense");
    ExpenseService::record_payment(&mut fixture.household, expense, fixture.ana, today, today)
        .expect("record payment");

    let bruno = fixture.bruno;
    let shared = Arc::new(Mutex::new(fixture.household));

    let outcomes: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let shared = Arc::clone(&shared);
                scope.spawn(move || {
                    let mut household = shared.lock().expect("lock household");
                    ExpenseService::confirm(&mut household, expense, bruno).is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread joins"))
            .collect()
    });

    assert_eq!(
        outcomes.iter().filter(|ok| **ok).count(),
        1,
        "exactly one submit wins"
    );

    let household = shared.lock().expect("lock household");
    let stored = household.expense(expense).expect("exists");
    assert_eq!(
        stored
            .confirmations
            .iter()
            .filter(|row| row.confirmed)
            .count(),
        1
    );
    assert_eq!(stored.state, ExpenseState::AwaitingConfirmation);
}
