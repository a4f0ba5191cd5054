//! Field-scope heuristics.
//!
//! Decides, from the reference record alone, which optional fields are subject to comparison
//! for a given label. Out-of-scope fields are never allowed to fail: the evaluator forces them
//! to `1` and the merger treats them as accurate.


use serde::Serialize;

use crate::constants::{BEER_KEYWORDS, WINE_ABV_EXEMPTION_BELOW};
use crate::label::{ExpectedLabel, FieldKey, ProductType};
use crate::similarity::{normalize, parse_leading_number};

/// Which optional fields are in scope for one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScope {
    pub alcohol_content: bool,
    pub country_of_origin: bool,
    pub additives: bool,
}

impl FieldScope {
    pub fn for_expected(expected: &ExpectedLabel) -> Self {
        Self {
            alcohol_content: should_check_alcohol_content(expected),
            country_of_origin: should_check_country_of_origin(expected),
            additives: should_check_additives(expected),
        }
    }

    pub fn is_in_scope(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::AlcoholContent => self.alcohol_content,
            FieldKey::CountryOfOrigin => self.country_of_origin,
            FieldKey::AdditivesDisclosed => self.additives,
            _ => true,
        }
    }

    /// Fields whose score is pinned to `1` for this label.
    pub fn forced_pass(&self) -> impl Iterator<Item = FieldKey> + '_ {
        FieldKey::ALL.into_iter().filter(|k| !self.is_in_scope(*k))
    }
}

/// Leading numeric ABV in `text`, or `None` when nothing parses.
pub fn parse_abv(text: &str) -> Option<f64> {
    parse_leading_number(text)
}

pub fn is_beer(expected: &ExpectedLabel) -> bool {
    if expected.product_type == Some(ProductType::Beer) {
        return true;
    }
    let class = normalize(&expected.class_type);
    let words: Vec<&str> = class.split(' ').collect();
    BEER_KEYWORDS.iter().any(|keyword| {
        if keyword.contains(' ') {
            class.contains(keyword)
        } else {
            words.contains(keyword)
        }
    })
}

pub fn is_wine(expected: &ExpectedLabel) -> bool {
    expected.product_type == Some(ProductType::Wine)
        || normalize(&expected.class_type)
            .split(' ')
            .any(|w| w == "wine")
}

/// Alcohol content is checked unless the product is a malt beverage or a low-ABV wine.
pub fn should_check_alcohol_content(expected: &ExpectedLabel) -> bool {
    if is_beer(expected) {
        return false;
    }

    let Some(text) = expected.text(FieldKey::AlcoholContent) else {
        return false;
    };

    if is_wine(expected)
        && parse_abv(text).is_some_and(|abv| abv < WINE_ABV_EXEMPTION_BELOW)
    {
        return false;
    }

    true
}

pub fn should_check_country_of_origin(expected: &ExpectedLabel) -> bool {
    expected.is_imported && expected.text(FieldKey::CountryOfOrigin).is_some()
}

pub fn should_check_additives(expected: &ExpectedLabel) -> bool {
    expected.additives_detected.any()
}
