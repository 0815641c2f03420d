use chrono::NaiveDate;
use uuid::Uuid;

use household_core::household::{Category, CategoryScope, Household, Member};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Three-member flat with a shared groceries category, everyone joined on
/// 2024-01-01.
pub struct FlatFixture {
    pub household: Household,
    pub ana: Uuid,
    pub bruno: Uuid,
    pub carla: Uuid,
    pub groceries: Uuid,
}

pub fn shared_flat() -> FlatFixture {
    let mut household = Household::new("Shared flat");
    let joined = date(2024, 1, 1);
    let ana = household.add_member(Member::new("Ana", joined));
    let bruno = household.add_member(Member::new("Bruno", joined));
    let carla = household.add_member(Member::new("Carla", joined));
    let groceries = household
        .add_category(Category::new("Groceries", CategoryScope::Household))
        .expect("groceries category");
    FlatFixture {
        household,
        ana,
        bruno,
        carla,
        groceries,
    }
}
