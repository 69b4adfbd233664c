use crate::error::ExtractError;
use crate::extractors::{
    ExtractionMethod, Extractor, HtmlClassExtractor, JsonLdExtractor, ParsingContext,
};
use crate::fetchers::Fetcher;
use crate::model::ExtractedRecipe;
use log::{debug, warn};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Fetches pages and runs the extraction cascade over them.
///
/// Cloning is cheap; clones share the same fetcher.
#[derive(Clone)]
pub struct RecipeUrlExtractor {
    fetcher: Arc<dyn Fetcher>,
}

/// Checks that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url, ExtractError> {
    match Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        Ok(parsed) => {
            debug!("Rejecting URL with scheme {}", parsed.scheme());
            Err(ExtractError::InvalidUrl(url.to_string()))
        }
        Err(e) => {
            debug!("Rejecting URL {url}: {e}");
            Err(ExtractError::InvalidUrl(url.to_string()))
        }
    }
}

/// Runs the cascade over an already fetched page: structured data first,
/// then the markup heuristics. A result that fails the validity gate is
/// discarded and the next strategy gets its turn.
pub fn extract_from_html(
    html: &str,
    url: &str,
) -> Result<(ExtractedRecipe, ExtractionMethod), ExtractError> {
    let context = ParsingContext::new(url, html);

    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor), Box::new(HtmlClassExtractor)];

    for extractor in extractors {
        let method = extractor.method();
        match extractor.extract(&context) {
            Some(recipe) if recipe.is_valid() => {
                debug!("{method:?} produced a valid recipe for {url}");
                return Ok((recipe, method));
            }
            Some(_) => debug!("{method:?} result rejected by validity gate"),
            None => debug!("{method:?} found nothing"),
        }
    }

    Err(ExtractError::NoRecipeFound)
}

impl RecipeUrlExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn extract_from_url(&self, url: &str) -> Result<ExtractedRecipe, ExtractError> {
        self.extract_with_method(url)
            .await
            .map(|(recipe, _)| recipe)
    }

    /// Like [`extract_from_url`](Self::extract_from_url), also reporting which
    /// strategy produced the recipe.
    pub async fn extract_with_method(
        &self,
        url: &str,
    ) -> Result<(ExtractedRecipe, ExtractionMethod), ExtractError> {
        let parsed = validate_url(url)?;

        let page = self.fetcher.fetch(parsed.as_str()).await.map_err(|e| {
            warn!("Fetching {url} failed: {e}");
            ExtractError::FetchFailed {
                status: None,
                status_text: e.to_string(),
            }
        })?;

        if !page.is_success() {
            warn!("Fetching {url} returned {} {}", page.status, page.status_text);
            return Err(ExtractError::FetchFailed {
                status: Some(page.status),
                status_text: page.status_text,
            });
        }

        extract_from_html(&page.body, url)
    }

    /// Extracts every URL concurrently. Results come back in input order and
    /// one failure does not affect the others.
    pub async fn extract_many<I, S>(&self, urls: I) -> Vec<Result<ExtractedRecipe, ExtractError>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tasks = JoinSet::new();
        let mut count = 0;
        for (index, url) in urls.into_iter().enumerate() {
            let extractor = self.clone();
            let url: String = url.into();
            tasks.spawn(async move { (index, extractor.extract_from_url(&url).await) });
            count += 1;
        }

        let mut results: Vec<Option<Result<ExtractedRecipe, ExtractError>>> =
            (0..count).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!("Extraction task failed: {e}"),
            }
        }

        results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|| {
                    Err(ExtractError::FetchFailed {
                        status: None,
                        status_text: "extraction task did not complete".to_string(),
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/recipe").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        assert!(matches!(
            validate_url("not a url"),
            Err(ExtractError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("/relative/path"),
            Err(ExtractError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("ftp://example.com/file"),
            Err(ExtractError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_structured_result_failing_gate_falls_through() {
        let html = r#"
        <html><head>
          <script type="application/ld+json">{"@type": "Recipe", "name": "Only A Name"}</script>
        </head><body>
          <h1 class="recipe-title">Markup Pancakes</h1>
          <ul class="recipe-ingredients"><li>1 cup flour</li></ul>
        </body></html>
        "#;

        let (recipe, method) = extract_from_html(html, "https://example.com/p").unwrap();
        assert_eq!(method, ExtractionMethod::HtmlHeuristic);
        assert_eq!(recipe.title.as_deref(), Some("Markup Pancakes"));
    }

    #[test]
    fn test_nothing_valid() {
        let html = "<html><head><title>About Us</title></head><body><p>We love food.</p></body></html>";
        assert!(matches!(
            extract_from_html(html, "https://example.com/about"),
            Err(ExtractError::NoRecipeFound)
        ));
    }
}
