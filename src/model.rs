use serde::{Deserialize, Serialize};

/// One ingredient line split into its parts.
///
/// `amount` stays a string so ranges ("2-3"), fractions ("1 1/2") and
/// textual ranges ("1 to 2") survive unchanged for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Canonical singular unit name, e.g. "tablespoon".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub ingredient: String,
    /// Content of a trailing parenthetical, without the parentheses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<String>,
}

impl Nutrition {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
            && self.carbohydrates.is_none()
    }
}

/// A recipe pulled out of a web page.
///
/// Ingredient and instruction entries are raw lines; run ingredient lines
/// through [`crate::parse_ingredient_line`] to split amounts and units.
/// Times are whole minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(rename = "yield", skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

impl ExtractedRecipe {
    /// Validity gate: a non-empty title plus at least one ingredient or
    /// instruction.
    pub fn is_valid(&self) -> bool {
        let has_title = self
            .title
            .as_deref()
            .is_some_and(|title| !title.trim().is_empty());
        let has_lines = |lines: &Option<Vec<String>>| lines.as_ref().is_some_and(|l| !l.is_empty());

        has_title && (has_lines(&self.ingredients) || has_lines(&self.instructions))
    }
}
