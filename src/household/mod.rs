//! Household domain model: members, leave windows, categories, expenses.

pub mod category;
pub mod expense;
#[allow(clippy::module_inception)]
pub mod household;
pub mod member;

pub use category::{Category, CategoryScope, TRANSFER_CATEGORY_NAME};
pub use expense::{Confirmation, Expense, ExpenseState};
pub use household::Household;
pub use member::{Member, VacationWindow};
