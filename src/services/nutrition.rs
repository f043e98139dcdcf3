// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local nutrition estimates.
//!
//! Used whenever the completion API is not configured, fails, or returns
//! something unusable. Deterministic: the same food and portion always give
//! the same numbers.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Calories and macros for one food item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionEstimate {
    pub calories: f64,
    /// Grams
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionEstimate {
    const fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Scale by a portion multiplier and round: calories to whole numbers,
    /// macros to one decimal.
    fn scaled(&self, multiplier: f64) -> Self {
        Self {
            calories: (self.calories * multiplier).round(),
            protein: round_one_decimal(self.protein * multiplier),
            carbs: round_one_decimal(self.carbs * multiplier),
            fat: round_one_decimal(self.fat * multiplier),
        }
    }
}

/// Used when no keyword matches.
pub const GENERIC_ESTIMATE: NutritionEstimate = NutritionEstimate::new(100.0, 5.0, 15.0, 2.0);

/// Keyword table, scanned in order; the first key contained in the food name
/// wins. Compound keys must come before any shorter key they contain.
const FOOD_TABLE: &[(&str, NutritionEstimate)] = &[
    // Compound dishes
    ("dal rice", NutritionEstimate::new(246.0, 8.5, 45.0, 3.5)),
    ("fried rice", NutritionEstimate::new(238.0, 5.5, 33.0, 9.0)),
    ("brown rice", NutritionEstimate::new(123.0, 2.7, 25.6, 1.0)),
    ("chicken curry", NutritionEstimate::new(240.0, 20.0, 8.0, 14.0)),
    ("chicken breast", NutritionEstimate::new(165.0, 31.0, 0.0, 3.6)),
    ("paneer tikka", NutritionEstimate::new(280.0, 18.0, 8.0, 20.0)),
    ("peanut butter", NutritionEstimate::new(188.0, 8.0, 6.0, 16.0)),
    ("protein shake", NutritionEstimate::new(160.0, 25.0, 8.0, 3.0)),
    ("greek yogurt", NutritionEstimate::new(100.0, 17.0, 6.0, 0.7)),
    ("sweet potato", NutritionEstimate::new(112.0, 2.0, 26.0, 0.1)),
    // Staples
    ("rice", NutritionEstimate::new(130.0, 2.7, 28.0, 0.3)),
    ("dal", NutritionEstimate::new(116.0, 9.0, 20.0, 0.4)),
    ("roti", NutritionEstimate::new(120.0, 3.1, 18.0, 3.7)),
    ("chapati", NutritionEstimate::new(120.0, 3.1, 18.0, 3.7)),
    ("bread", NutritionEstimate::new(79.0, 2.7, 15.0, 1.0)),
    ("oats", NutritionEstimate::new(150.0, 5.0, 27.0, 3.0)),
    ("pasta", NutritionEstimate::new(131.0, 5.0, 25.0, 1.1)),
    ("potato", NutritionEstimate::new(77.0, 2.0, 17.0, 0.1)),
    // Protein
    ("chicken", NutritionEstimate::new(239.0, 27.0, 0.0, 14.0)),
    ("salmon", NutritionEstimate::new(208.0, 20.0, 0.0, 13.0)),
    ("fish", NutritionEstimate::new(206.0, 22.0, 0.0, 12.0)),
    ("egg", NutritionEstimate::new(78.0, 6.0, 0.6, 5.0)),
    ("paneer", NutritionEstimate::new(265.0, 18.0, 1.2, 20.0)),
    ("tofu", NutritionEstimate::new(76.0, 8.0, 1.9, 4.8)),
    ("beef", NutritionEstimate::new(250.0, 26.0, 0.0, 15.0)),
    // Dairy
    ("yogurt", NutritionEstimate::new(59.0, 10.0, 3.6, 0.4)),
    ("milk", NutritionEstimate::new(103.0, 8.0, 12.0, 2.4)),
    ("cheese", NutritionEstimate::new(113.0, 7.0, 0.4, 9.0)),
    // Fruit & veg
    ("banana", NutritionEstimate::new(105.0, 1.3, 27.0, 0.4)),
    ("apple", NutritionEstimate::new(95.0, 0.5, 25.0, 0.3)),
    ("orange", NutritionEstimate::new(62.0, 1.2, 15.0, 0.2)),
    ("salad", NutritionEstimate::new(50.0, 2.0, 8.0, 1.0)),
    ("broccoli", NutritionEstimate::new(55.0, 3.7, 11.0, 0.6)),
    // Fast food
    ("pizza", NutritionEstimate::new(285.0, 12.0, 36.0, 10.0)),
    ("burger", NutritionEstimate::new(354.0, 17.0, 29.0, 20.0)),
    ("sandwich", NutritionEstimate::new(250.0, 11.0, 30.0, 9.0)),
    ("fries", NutritionEstimate::new(312.0, 3.4, 41.0, 15.0)),
    // Snacks
    ("almonds", NutritionEstimate::new(164.0, 6.0, 6.0, 14.0)),
    ("nuts", NutritionEstimate::new(170.0, 5.0, 6.0, 15.0)),
    ("chocolate", NutritionEstimate::new(155.0, 2.2, 17.0, 9.0)),
];

/// Portion heuristics, scanned in order; the first rule with any matching
/// fragment wins. "1/2" must precede the bare "2" rule.
const PORTION_RULES: &[(&[&str], f64)] = &[
    (&["1/2", "half", "small"], 0.5),
    (&["large", "cup", "bowl"], 1.5),
    (&["2", "double"], 2.0),
];

/// Baseline estimate for a food name.
pub fn lookup(food_name: &str) -> NutritionEstimate {
    let name = food_name.to_lowercase();
    FOOD_TABLE
        .iter()
        .find(|(key, _)| name.contains(key))
        .map(|(_, estimate)| *estimate)
        .unwrap_or(GENERIC_ESTIMATE)
}

/// Multiplier implied by a free-text portion size.
pub fn portion_multiplier(portion_size: &str) -> f64 {
    let portion = portion_size.to_lowercase();
    PORTION_RULES
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| portion.contains(f)))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Estimate nutrition for `food_name` eaten in `portion_size`.
pub fn estimate(food_name: &str, portion_size: &str) -> NutritionEstimate {
    lookup(food_name).scaled(portion_multiplier(portion_size))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_key_wins_over_substring() {
        let result = estimate("dal rice", "1 cup");
        assert_eq!(result.calories, 369.0);
        assert_ne!(lookup("dal rice").calories, lookup("rice").calories);
    }

    #[test]
    fn test_plain_rice() {
        assert_eq!(estimate("Steamed Rice", "1 serving").calories, 130.0);
    }

    #[test]
    fn test_unknown_food_uses_generic_default() {
        let result = estimate("mystery stew", "");
        assert_eq!(result, GENERIC_ESTIMATE);
    }

    #[test]
    fn test_portion_rules() {
        assert_eq!(portion_multiplier("1/2 plate"), 0.5);
        assert_eq!(portion_multiplier("Large"), 1.5);
        assert_eq!(portion_multiplier("2 slices"), 2.0);
        assert_eq!(portion_multiplier("double"), 2.0);
        assert_eq!(portion_multiplier("1 piece"), 1.0);
    }

    #[test]
    fn test_macros_round_to_one_decimal() {
        let result = estimate("egg", "half");
        assert_eq!(result.calories, 39.0);
        assert_eq!(result.protein, 3.0);
        assert_eq!(result.carbs, 0.3);
        assert_eq!(result.fat, 2.5);
    }

    #[test]
    fn test_compound_keys_precede_their_substrings() {
        for (i, (key, _)) in FOOD_TABLE.iter().enumerate() {
            for (shorter, _) in &FOOD_TABLE[..i] {
                assert!(
                    !key.contains(shorter) || key == shorter,
                    "{key:?} is shadowed by earlier key {shorter:?}"
                );
            }
        }
    }
}
