pub mod error;
pub mod fridge;
pub mod ical;
pub mod import;
pub mod llm;
pub mod recipe;
pub mod recipe_card;
pub mod scaling;
pub mod search;
pub mod sharing;
pub mod suggestions;
pub mod types;
