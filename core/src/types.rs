//! Domain values for TheMealDB.
//!
//! # Design
//! The remote API uses Hungarian-style keys (`idMeal`, `strMealThumb`) and
//! spreads ingredients over numbered keys. Each type below carries a static
//! table from those wire names to its own fields and implements `Decode`
//! against it. The serde derives use the internal field names; they exist so
//! values can be compared and re-encoded, not to read the wire format.
//!
//! TheMealDB sends `""` and `null` interchangeably for absent text, so
//! optional text fields are normalised to `None` when blank.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{CodingPath, Decode, DecodeTarget, DynamicKeys, KeyedContainer};
use crate::error::DecodeError;
use crate::resolver::KeyPattern;

/// A meal category from `categories.php`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
}

mod category_keys {
    pub const ID: &str = "idCategory";
    pub const NAME: &str = "strCategory";
    pub const THUMBNAIL: &str = "strCategoryThumb";
    pub const DESCRIPTION: &str = "strCategoryDescription";
}

impl Decode for Category {
    fn target() -> DecodeTarget {
        DecodeTarget::Keyed
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        let c = KeyedContainer::new(value, path)?;
        Ok(Category {
            id: c.required(category_keys::ID)?,
            name: c.required(category_keys::NAME)?,
            thumbnail: text(&c, category_keys::THUMBNAIL)?,
            description: text(&c, category_keys::DESCRIPTION)?,
        })
    }
}

/// The short meal record returned by `filter.php`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealSummary {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
}

impl Decode for MealSummary {
    fn target() -> DecodeTarget {
        DecodeTarget::Keyed
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        let c = KeyedContainer::new(value, path)?;
        Ok(MealSummary {
            id: c.required(meal_keys::ID)?,
            name: c.required(meal_keys::NAME)?,
            thumbnail: text(&c, meal_keys::THUMBNAIL)?,
        })
    }
}

/// One ingredient line of a meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

/// A full meal record from `lookup.php`, `search.php` or `random.php`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

mod meal_keys {
    pub const ID: &str = "idMeal";
    pub const NAME: &str = "strMeal";
    pub const CATEGORY: &str = "strCategory";
    pub const AREA: &str = "strArea";
    pub const INSTRUCTIONS: &str = "strInstructions";
    pub const THUMBNAIL: &str = "strMealThumb";
    pub const TAGS: &str = "strTags";
    pub const YOUTUBE: &str = "strYoutube";
    pub const SOURCE: &str = "strSource";
    pub const INGREDIENT_PREFIX: &str = "strIngredient";
    pub const MEASURE_PREFIX: &str = "strMeasure";
}

impl Decode for Meal {
    fn target() -> DecodeTarget {
        DecodeTarget::DynamicKeyed(ingredient_keys().pattern().clone())
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        let c = KeyedContainer::new(value, path)?;
        Ok(Meal {
            id: c.required(meal_keys::ID)?,
            name: c.required(meal_keys::NAME)?,
            category: text(&c, meal_keys::CATEGORY)?,
            area: text(&c, meal_keys::AREA)?,
            instructions: text(&c, meal_keys::INSTRUCTIONS)?,
            thumbnail: text(&c, meal_keys::THUMBNAIL)?,
            tags: text(&c, meal_keys::TAGS)?
                .map(|tags| split_tags(&tags))
                .unwrap_or_default(),
            youtube: text(&c, meal_keys::YOUTUBE)?,
            source: text(&c, meal_keys::SOURCE)?,
            ingredients: ingredients(&c)?,
        })
    }
}

/// The `strIngredientN` family. Unused slots come as `""` or `null`.
fn ingredient_keys() -> DynamicKeys {
    DynamicKeys::new(KeyPattern::prefix(meal_keys::INGREDIENT_PREFIX)).discard_blank()
}

/// Ingredient lines in suffix order; measures pair with ingredients by
/// suffix.
fn ingredients(c: &KeyedContainer<'_>) -> Result<Vec<Ingredient>, DecodeError> {
    ingredient_keys()
        .decode::<String>(c)?
        .into_iter()
        .map(|entry| -> Result<Ingredient, DecodeError> {
            let measure = match entry.suffix {
                Some(n) => text(c, &format!("{}{n}", meal_keys::MEASURE_PREFIX))?,
                None => None,
            };
            Ok(Ingredient {
                name: entry.value.trim().to_string(),
                measure,
            })
        })
        .collect()
}

/// Optional text field, trimmed, with blank treated as absent.
fn text(c: &KeyedContainer<'_>, key: &str) -> Result<Option<String>, DecodeError> {
    Ok(c
        .optional::<String>(key)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
