//! Membership records and vacation windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person's time-bounded membership in the household.
///
/// Settlement identity is the membership record: someone who leaves and later
/// rejoins appears as two distinct members with disjoint windows, and only one
/// of them can be active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub joined_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_on: Option<NaiveDate>,
    pub is_active: bool,
}

impl Member {
    pub fn new(name: impl Into<String>, joined_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            joined_on,
            left_on: None,
            is_active: true,
        }
    }

    /// Whether the membership window covered `date`.
    ///
    /// The window is half-open: the join day counts, the leave day does not.
    pub fn was_present_on(&self, date: NaiveDate) -> bool {
        date >= self.joined_on && self.left_on.map_or(true, |left| date < left)
    }

    /// Closes the membership as of `left_on`.
    pub fn close(&mut self, left_on: NaiveDate) {
        self.left_on = Some(left_on);
        self.is_active = false;
    }
}

/// A leave window during which a member may be exempt from shared costs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacationWindow {
    pub member_id: Uuid,
    pub starts_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
}

impl VacationWindow {
    /// Creates an open-ended window starting on `starts_on`.
    pub fn new(member_id: Uuid, starts_on: NaiveDate) -> Self {
        Self {
            member_id,
            starts_on,
            ends_on: None,
        }
    }

    pub fn with_end(mut self, ends_on: NaiveDate) -> Self {
        self.ends_on = Some(ends_on);
        self
    }

    /// Whether the window covers `date`; open-ended windows never stop matching.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.starts_on && self.ends_on.map_or(true, |end| date < end)
    }

    /// Whether two windows overlap on at least one day.
    pub fn overlaps(&self, other: &VacationWindow) -> bool {
        let starts_inside_other = other.ends_on.map_or(true, |end| self.starts_on < end);
        let other_starts_inside = self.ends_on.map_or(true, |end| other.starts_on < end);
        starts_inside_other && other_starts_inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn membership_window_is_half_open() {
        let mut member = Member::new("Ana", date(2024, 1, 10));
        assert!(!member.was_present_on(date(2024, 1, 9)));
        assert!(member.was_present_on(date(2024, 1, 10)));

        member.close(date(2024, 6, 1));
        assert!(member.was_present_on(date(2024, 5, 31)));
        assert!(!member.was_present_on(date(2024, 6, 1)));
        assert!(!member.is_active);
    }

    #[test]
    fn open_ended_vacation_covers_everything_after_start() {
        let window = VacationWindow::new(Uuid::new_v4(), date(2024, 3, 1));
        assert!(!window.covers(date(2024, 2, 29)));
        assert!(window.covers(date(2024, 3, 1)));
        assert!(window.covers(date(2030, 1, 1)));
    }

    #[test]
    fn bounded_vacation_excludes_end_day() {
        let member = Uuid::new_v4();
        let window = VacationWindow::new(member, date(2024, 3, 1)).with_end(date(2024, 3, 15));
        assert!(window.covers(date(2024, 3, 14)));
        assert!(!window.covers(date(2024, 3, 15)));
    }

    #[test]
    fn overlap_detection_handles_open_ends() {
        let member = Uuid::new_v4();
        let closed = VacationWindow::new(member, date(2024, 3, 1)).with_end(date(2024, 3, 15));
        let adjacent = VacationWindow::new(member, date(2024, 3, 15)).with_end(date(2024, 4, 1));
        let open = VacationWindow::new(member, date(2024, 3, 10));

        assert!(!closed.overlaps(&adjacent), "touching windows do not overlap");
        assert!(closed.overlaps(&open));
        assert!(open.overlaps(&adjacent));
    }
}
