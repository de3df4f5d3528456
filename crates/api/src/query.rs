//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;

/// Inclusive date range (`?start_date=&end_date=`), both required.
///
/// Used by the meal plan list and the calendar export.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

