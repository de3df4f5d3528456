//! Serving-size scaling of ingredient amounts.
//!
//! Amounts are free text. Plain numbers (`"2"`, `"1.5"`), fractions (`"1/2"`)
//! and mixed numbers (`"1 1/2"`) are scaled; anything else (`"a pinch"`,
//! `"to taste"`) is passed through untouched.

use serde::{Deserialize, Serialize};

use crate::types::{Ingredient, DEFAULT_SERVINGS};

/// Smallest servings value accepted by the scaled view.
pub const MIN_SCALED_SERVINGS: i32 = 1;

/// Largest servings value accepted by the scaled view.
pub const MAX_SCALED_SERVINGS: i32 = 100;

/// Result of scaling a recipe's ingredient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaledIngredients {
    pub original_servings: i32,
    pub scaled_servings: i32,
    /// Ratio rounded to two decimals for display.
    pub scale_factor: f64,
    pub ingredients: Vec<Ingredient>,
}

/// Parse a free-text amount into a number.
pub fn parse_amount(amount: &str) -> Option<f64> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let first = parts.next()?;
    match (parts.next(), parts.next()) {
        (None, _) => parse_simple(first),
        // Mixed number: "1 1/2".
        (Some(second), None) if second.contains('/') && !first.contains('/') => {
            let whole: f64 = first.parse().ok()?;
            let frac = parse_fraction(second)?;
            Some(whole + frac)
        }
        _ => None,
    }
}

fn parse_simple(token: &str) -> Option<f64> {
    if token.contains('/') {
        parse_fraction(token)
    } else {
        token.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

fn parse_fraction(token: &str) -> Option<f64> {
    let (num, denom) = token.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let denom: f64 = denom.trim().parse().ok()?;
    if denom == 0.0 {
        return None;
    }
    Some(num / denom)
}

/// Format a scaled amount: integers without decimals, otherwise at most two
/// decimals with trailing zeros removed.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Scale an ingredient list from `original_servings` to `target_servings`.
///
/// A non-positive `original_servings` is treated as the default of four.
pub fn scale_ingredients(
    ingredients: &[Ingredient],
    original_servings: i32,
    target_servings: i32,
) -> ScaledIngredients {
    let original = if original_servings <= 0 {
        DEFAULT_SERVINGS
    } else {
        original_servings
    };
    let factor = f64::from(target_servings) / f64::from(original);

    let scaled = ingredients
        .iter()
        .map(|ing| match parse_amount(&ing.amount) {
            Some(value) => Ingredient {
                name: ing.name.clone(),
                amount: format_amount(value * factor),
                unit: ing.unit.clone(),
            },
            None => ing.clone(),
        })
        .collect();

    ScaledIngredients {
        original_servings: original,
        scaled_servings: target_servings,
        scale_factor: (factor * 100.0).round() / 100.0,
        ingredients: scaled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_amount_shapes() {
        assert_eq!(parse_amount("2"), Some(2.0));
        assert_eq!(parse_amount(" 1.5 "), Some(1.5));
        assert_eq!(parse_amount("1/2"), Some(0.5));
        assert_eq!(parse_amount("1 1/2"), Some(1.5));
        assert_eq!(parse_amount("a pinch"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1/0"), None);
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_amount(4.0), "4");
        assert_eq!(format_amount(0.5), "0.5");
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
        assert_eq!(format_amount(2.25), "2.25");
    }

    #[test]
    fn doubling_servings_doubles_numeric_amounts() {
        let ingredients = vec![
            Ingredient::new("pasta", "200", "g"),
            Ingredient::new("butter", "1/2", "cup"),
            Ingredient::new("milk", "1.5", "cups"),
            Ingredient::new("salt", "a pinch", ""),
        ];

        let scaled = scale_ingredients(&ingredients, 4, 8);

        assert_eq!(scaled.original_servings, 4);
        assert_eq!(scaled.scaled_servings, 8);
        assert_eq!(scaled.scale_factor, 2.0);
        let amounts: Vec<&str> = scaled.ingredients.iter().map(|i| i.amount.as_str()).collect();
        assert_eq!(amounts, vec!["400", "1", "3", "a pinch"]);
        assert_eq!(scaled.ingredients[1].unit, "cup");
    }

    #[test]
    fn non_positive_original_servings_fall_back_to_default() {
        let ingredients = vec![Ingredient::new("egg", "2", "")];
        let scaled = scale_ingredients(&ingredients, 0, 2);
        assert_eq!(scaled.original_servings, DEFAULT_SERVINGS);
        assert_eq!(scaled.ingredients[0].amount, "1");
        assert_eq!(scaled.scale_factor, 0.5);
    }
}
