//! Recipe extraction from web pages and free-text ingredient parsing.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recipe = recipe_import::extract_recipe_from_url("https://example.com/pancakes").await?;
//! for line in recipe.ingredients.unwrap_or_default() {
//!     let parsed = recipe_import::parse_ingredient_line(&line);
//!     println!("{:?} {:?} {}", parsed.amount, parsed.unit, parsed.ingredient);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod ingredients;
pub mod model;
pub mod pipelines;

pub use builder::RecipeUrlExtractorBuilder;
pub use self::config::{load_config, ExtractorConfig};
pub use error::{ExtractError, SetupError};
pub use extractors::ExtractionMethod;
pub use fetchers::{FetchedPage, Fetcher, RequestFetcher};
pub use ingredients::{format_ingredient, parse_ingredient_line, parse_ingredient_lines};
pub use model::{ExtractedRecipe, Nutrition, ParsedIngredient};
pub use pipelines::RecipeUrlExtractor;

/// Fetches `url` with default settings and extracts its recipe.
///
/// # Errors
/// `InvalidUrl` before any request when `url` is not absolute http(s),
/// `FetchFailed` on a non-2xx answer or no answer at all, `NoRecipeFound`
/// when neither strategy yields a valid recipe.
pub async fn extract_recipe_from_url(url: &str) -> Result<ExtractedRecipe, ExtractError> {
    pipelines::validate_url(url)?;
    let extractor = RecipeUrlExtractor::builder().build().map_err(|e| {
        log::warn!("Could not set up HTTP client: {e}");
        ExtractError::FetchFailed {
            status: None,
            status_text: e.to_string(),
        }
    })?;
    extractor.extract_from_url(url).await
}

/// Runs the extraction cascade over HTML that was fetched elsewhere.
/// `url` becomes `source_url` and the base for relative image links.
pub fn extract_recipe_from_html(html: &str, url: &str) -> Result<ExtractedRecipe, ExtractError> {
    pipelines::extract_from_html(html, url).map(|(recipe, _)| recipe)
}
