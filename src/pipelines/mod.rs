mod url;

pub use self::url::{extract_from_html, validate_url, RecipeUrlExtractor};
