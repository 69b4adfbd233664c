use std::sync::Arc;
use std::time::Duration;

use crate::config::ExtractorConfig;
use crate::error::SetupError;
use crate::fetchers::{Fetcher, RequestFetcher};
use crate::pipelines::RecipeUrlExtractor;

/// Builder for a configured [`RecipeUrlExtractor`]
#[derive(Default)]
pub struct RecipeUrlExtractorBuilder {
    config: ExtractorConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl RecipeUrlExtractor {
    pub fn builder() -> RecipeUrlExtractorBuilder {
        RecipeUrlExtractorBuilder::default()
    }
}

impl RecipeUrlExtractorBuilder {
    /// Start from loaded settings instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// use recipe_import::{load_config, RecipeUrlExtractor};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let extractor = RecipeUrlExtractor::builder()
    ///     .config(load_config()?)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeUrlExtractor;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeUrlExtractor::builder().timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config.timeout = duration.as_secs();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Fetch pages through `fetcher` instead of the built-in HTTP client.
    /// Timeout and user agent settings are then ignored.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// # Errors
    /// Returns `SetupError::Http` if the HTTP client cannot be created.
    pub fn build(self) -> Result<RecipeUrlExtractor, SetupError> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(RequestFetcher::new(
                self.config.timeout_duration(),
                &self.config.user_agent,
            )?),
        };
        Ok(RecipeUrlExtractor::new(fetcher))
    }
}
