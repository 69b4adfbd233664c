use crate::model::ExtractedRecipe;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

mod html_class;
mod json_ld;

pub use html_class::HtmlClassExtractor;
pub use json_ld::JsonLdExtractor;

pub struct ParsingContext {
    /// Address the page was fetched from; becomes `source_url`
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// Which strategy produced a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// schema.org `Recipe` JSON-LD embedded in the page
    StructuredData,
    /// Selector and free-text heuristics over the page markup
    HtmlHeuristic,
}

/// One step of the extraction cascade. `None` means "found nothing"; a
/// strategy never fails loudly.
pub trait Extractor {
    fn method(&self) -> ExtractionMethod;
    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe>;
}

/// Text content of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First run of digits in `text`, e.g. 4 in "serves 4-6". `None` when there
/// is none or it does not fit a `u32`.
pub(crate) fn first_integer(text: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}
