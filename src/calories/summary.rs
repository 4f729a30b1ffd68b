//! Daily calorie summary: aggregation of food and custom entries into one
//! total plus a merged item list. Pure over already-fetched rows so the
//! arithmetic has exactly one home; consumers read `remaining` here rather
//! than recomputing it.

use serde::Serialize;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::goal::{self, CaloriesError};
use super::repo::{CustomCalorieEntry, FoodEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Food,
    Custom,
}

/// One row of the merged item list, tagged by entry kind.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
    pub calories: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    /// Present for food entries only; custom entries always count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_included_in_calories: Option<bool>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalorieBreakdown {
    pub food_entries: i32,
    pub custom_entries: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalorieSummary {
    pub goal: i32,
    pub total: i32,
    /// `max(0, goal - total)`; never negative.
    pub remaining: i32,
    pub breakdown: CalorieBreakdown,
    pub items: Vec<SummaryItem>,
}

/// Aggregates one day's rows against a resolved goal.
///
/// Food entries count only while `is_included_in_calories` is set; custom
/// entries always count. Items are sorted newest-first by logged timestamp,
/// ties keeping the fetch order of their inputs (stable sort).
pub fn summarize(
    goal: i32,
    food: Vec<FoodEntry>,
    custom: Vec<CustomCalorieEntry>,
) -> CalorieSummary {
    let food_total: i32 = food
        .iter()
        .filter(|e| e.is_included_in_calories)
        .map(|e| e.calories)
        .sum();
    let custom_total: i32 = custom.iter().map(|e| e.calories).sum();
    let total = food_total + custom_total;

    let mut items: Vec<SummaryItem> = food
        .into_iter()
        .map(|e| SummaryItem {
            id: e.id,
            kind: EntryKind::Food,
            description: e.description,
            calories: e.calories,
            meal_type: e.meal_type,
            is_included_in_calories: Some(e.is_included_in_calories),
            logged_at: e.logged_at,
        })
        .chain(custom.into_iter().map(|e| SummaryItem {
            id: e.id,
            kind: EntryKind::Custom,
            description: e.description,
            calories: e.calories,
            meal_type: e.meal_type,
            is_included_in_calories: None,
            logged_at: e.logged_at,
        }))
        .collect();
    items.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));

    CalorieSummary {
        goal,
        total,
        remaining: (goal - total).max(0),
        breakdown: CalorieBreakdown {
            food_entries: food_total,
            custom_entries: custom_total,
        },
        items,
    }
}

/// Resolves the goal and aggregates the client's entries for one calendar
/// day. Plain reads, no locking; two calls with no intervening writes return
/// identical summaries.
pub async fn get_summary_by_date(
    db: &PgPool,
    client_id: Uuid,
    date: Date,
) -> Result<CalorieSummary, CaloriesError> {
    let goal = goal::get_calorie_goal(db, client_id).await?;
    let food = FoodEntry::list_for_day(db, client_id, date).await?;
    let custom = CustomCalorieEntry::list_for_day(db, client_id, date).await?;
    Ok(summarize(goal, food, custom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn food(calories: i32, included: bool, logged_at: OffsetDateTime) -> FoodEntry {
        FoodEntry {
            id: Uuid::new_v4(),
            client_id: Uuid::nil(),
            description: "food".into(),
            calories,
            meal_type: Some("lunch".into()),
            is_included_in_calories: included,
            logged_at,
        }
    }

    fn custom(calories: i32, logged_at: OffsetDateTime) -> CustomCalorieEntry {
        CustomCalorieEntry {
            id: Uuid::new_v4(),
            client_id: Uuid::nil(),
            description: "custom".into(),
            calories,
            meal_type: None,
            logged_at,
        }
    }

    #[test]
    fn excluded_food_entries_do_not_count() {
        let at = datetime!(2024-03-15 12:00 UTC);
        let summary = summarize(
            2000,
            vec![food(300, true, at), food(500, false, at)],
            vec![custom(200, at)],
        );
        assert_eq!(summary.total, 500);
        assert_eq!(summary.breakdown.food_entries, 300);
        assert_eq!(summary.breakdown.custom_entries, 200);
        assert_eq!(summary.remaining, 1500);
        // excluded entries still appear in the item list
        assert_eq!(summary.items.len(), 3);
    }

    #[test]
    fn remaining_never_goes_negative() {
        let at = datetime!(2024-03-15 12:00 UTC);
        let summary = summarize(2000, vec![food(2500, true, at)], vec![]);
        assert_eq!(summary.total, 2500);
        assert_eq!(summary.remaining, 0);
    }

    #[test]
    fn empty_day_leaves_full_goal_remaining() {
        let summary = summarize(1800, vec![], vec![]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.remaining, 1800);
        assert!(summary.items.is_empty());
    }

    #[test]
    fn items_sorted_newest_first_across_kinds() {
        let summary = summarize(
            2000,
            vec![
                food(100, true, datetime!(2024-03-15 08:00 UTC)),
                food(200, true, datetime!(2024-03-15 20:00 UTC)),
            ],
            vec![custom(300, datetime!(2024-03-15 12:00 UTC))],
        );
        let calories: Vec<i32> = summary.items.iter().map(|i| i.calories).collect();
        assert_eq!(calories, vec![200, 300, 100]);
    }

    #[test]
    fn equal_timestamps_keep_fetch_order() {
        let at = datetime!(2024-03-15 12:00 UTC);
        let first = food(100, true, at);
        let second = food(200, true, at);
        let ids = (first.id, second.id);
        let summary = summarize(2000, vec![first, second], vec![custom(300, at)]);
        // stable sort: food rows before custom, in their original order
        assert_eq!(summary.items[0].id, ids.0);
        assert_eq!(summary.items[1].id, ids.1);
        assert_eq!(summary.items[2].kind, EntryKind::Custom);
    }

    #[test]
    fn summarize_is_pure_and_repeatable() {
        let at = datetime!(2024-03-15 12:00 UTC);
        let make = || summarize(2000, vec![food(300, true, at)], vec![custom(200, at)]);
        let (a, b) = (make(), make());
        assert_eq!(a.total, b.total);
        assert_eq!(a.remaining, b.remaining);
        assert_eq!(a.breakdown, b.breakdown);
    }

    #[test]
    fn item_serialization_tags_kind_and_hides_flag_for_custom() {
        let at = datetime!(2024-03-15 12:00 UTC);
        let summary = summarize(2000, vec![food(300, true, at)], vec![custom(200, at)]);
        let json = serde_json::to_value(&summary.items).expect("serialize items");
        assert_eq!(json[0]["type"], "food");
        assert_eq!(json[0]["is_included_in_calories"], true);
        assert_eq!(json[1]["type"], "custom");
        assert!(json[1].get("is_included_in_calories").is_none());
    }
}
