use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Recipe categories offered by the UI. `"All"` is a filter value only and is
/// never stored on a recipe.
pub const CATEGORIES: &[&str] = &[
    "All",
    "Breakfast",
    "Lunch",
    "Dinner",
    "Dessert",
    "Appetizer",
    "Snack",
    "Beverage",
    "Other",
];

/// Category filter value meaning "no filter".
pub const CATEGORY_ALL: &str = "All";

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Servings assumed when a recipe omits them (or stores a non-positive value).
pub const DEFAULT_SERVINGS: i32 = 4;

/// A single recipe ingredient line. `amount` is free text ("1/2", "2", "a pinch").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }
}

/// Ownership scope of household-shared data (meal plans, shopping lists).
///
/// A user who has not joined a household still gets a private scope so every
/// feature works before a household exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Household(DbId),
    Personal(DbId),
}

impl Scope {
    pub fn for_user(user_id: DbId, household_id: Option<DbId>) -> Self {
        match household_id {
            Some(id) => Scope::Household(id),
            None => Scope::Personal(user_id),
        }
    }

    pub fn household_id(&self) -> Option<DbId> {
        match self {
            Scope::Household(id) => Some(*id),
            Scope::Personal(_) => None,
        }
    }

    /// Whether a row with the given owner columns belongs to this scope.
    pub fn contains(&self, row_household_id: Option<DbId>, row_user_id: Option<DbId>) -> bool {
        match self {
            Scope::Household(id) => row_household_id == Some(*id),
            Scope::Personal(user_id) => {
                row_household_id.is_none() && row_user_id == Some(*user_id)
            }
        }
    }
}

/// Calendar slot of a meal plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }

    /// Hour of day (local, 24h) at which the meal is conventionally eaten.
    pub fn start_hour(&self) -> u32 {
        match self {
            MealType::Breakfast => 8,
            MealType::Lunch => 12,
            MealType::Snack => 15,
            MealType::Dinner => 18,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Invalid meal_type '{s}'. Must be one of: Breakfast, Lunch, Dinner, Snack")
            })
    }
}

impl TryFrom<String> for MealType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MealType> for String {
    fn from(value: MealType) -> Self {
        value.as_str().to_string()
    }
}

/// "Would you cook this again?" rating recorded after cooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Feedback {
    Yes,
    No,
    Meh,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Yes => "yes",
            Feedback::No => "no",
            Feedback::Meh => "meh",
        }
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Feedback::Yes),
            "no" => Ok(Feedback::No),
            "meh" => Ok(Feedback::Meh),
            _ => Err("Feedback must be 'yes', 'no', or 'meh'".to_string()),
        }
    }
}

impl TryFrom<String> for Feedback {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Feedback> for String {
    fn from(value: Feedback) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_parses_case_insensitively() {
        assert_eq!("dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert_eq!(" Breakfast ".parse::<MealType>().unwrap(), MealType::Breakfast);
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn meal_type_serializes_capitalized() {
        let json = serde_json::to_string(&MealType::Snack).unwrap();
        assert_eq!(json, "\"Snack\"");
        let parsed: MealType = serde_json::from_str("\"lunch\"").unwrap();
        assert_eq!(parsed, MealType::Lunch);
    }

    #[test]
    fn feedback_rejects_unknown_values() {
        assert_eq!("YES".parse::<Feedback>().unwrap(), Feedback::Yes);
        assert!(serde_json::from_str::<Feedback>("\"maybe\"").is_err());
    }

    #[test]
    fn scope_membership() {
        let household = Scope::for_user(1, Some(10));
        assert!(household.contains(Some(10), Some(99)));
        assert!(household.contains(Some(10), None));
        assert!(!household.contains(None, Some(1)));

        let personal = Scope::for_user(1, None);
        assert!(personal.contains(None, Some(1)));
        assert!(!personal.contains(Some(10), Some(1)));
        assert!(!personal.contains(None, Some(2)));
        assert!(!personal.contains(None, None));
    }
}
