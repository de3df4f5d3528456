//! iCalendar (RFC 5545) export of meal plans.
//!
//! Events use floating local times so a meal planned for 18:00 shows at
//! 18:00 in whatever time zone the subscribing calendar is in.

use chrono::NaiveDate;

use crate::types::{DbId, MealType, Timestamp};

/// Product identifier written into every calendar.
pub const PRODID: &str = "-//Kitchenry//Meal Plan//EN";

/// Suggested download filename for the exported calendar.
pub const ICS_FILENAME: &str = "kitchenry-meals.ics";

/// Duration of every meal event, in hours.
const MEAL_DURATION_HOURS: u32 = 1;

/// Longest content line in octets, excluding the CRLF (RFC 5545 section 3.1).
pub const MAX_LINE_OCTETS: usize = 75;

/// One meal plan entry to be rendered as a `VEVENT`.
#[derive(Debug, Clone)]
pub struct CalendarEntry {
    pub id: DbId,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_title: String,
    pub notes: String,
}

/// Escape a TEXT value per RFC 5545 section 3.3.11.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Fold a content line into chunks of at most [`MAX_LINE_OCTETS`] octets.
/// Continuation lines start with a single space, which counts towards their
/// length. Splits never fall inside a UTF-8 sequence.
pub fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(c);
        used += c.len_utf8();
    }
    out
}

/// Render a full `VCALENDAR` document. Lines are folded and CRLF-terminated.
pub fn render_meal_calendar(entries: &[CalendarEntry], generated_at: Timestamp) -> String {
    let stamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".into(),
    ];

    for entry in entries {
        let day = entry.date.format("%Y%m%d");
        let start = entry.meal_type.start_hour();
        let end = start + MEAL_DURATION_HOURS;

        let mut description = format!(
            "Recipe: {}\nMeal: {}",
            entry.recipe_title, entry.meal_type
        );
        if !entry.notes.trim().is_empty() {
            description.push_str("\nNotes: ");
            description.push_str(entry.notes.trim());
        }

        lines.push("BEGIN:VEVENT".into());
        lines.push(format!("UID:meal-plan-{}@kitchenry", entry.id));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("DTSTART:{day}T{start:02}0000"));
        lines.push(format!("DTEND:{day}T{end:02}0000"));
        lines.push(format!(
            "SUMMARY:{}",
            escape_text(&format!("{}: {}", entry.meal_type, entry.recipe_title))
        ));
        lines.push(format!("DESCRIPTION:{}", escape_text(&description)));
        lines.push("END:VEVENT".into());
    }

    lines.push("END:VCALENDAR".into());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    out
}
