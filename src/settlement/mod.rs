//! Pure settlement computations: windows, responsibility, totals, netting.
//!
//! Nothing in this module performs I/O or mutates the aggregate; every
//! function consumes collections the caller already materialized.

pub mod netting;
pub mod responsibility;
pub mod snapshot;
pub mod totals;
pub mod windows;

pub use netting::{settle, TransferInstruction};
pub use responsibility::{responsible_set, split_for, ResponsibilitySplit};
pub use snapshot::SettlementSnapshot;
pub use totals::{split_amount, ContributionTotals};
pub use windows::{active_at, not_on_leave_at};
