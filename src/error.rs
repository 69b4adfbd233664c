use thiserror::Error;

/// Errors an extraction call can surface to its caller.
///
/// Everything that goes wrong inside a single strategy (bad JSON-LD, a
/// selector with no matches, an unreadable duration) is absorbed and
/// treated as "this strategy found nothing".
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The remote server answered with a non-success status, or no
    /// response arrived at all (`status` is `None` then)
    #[error("Failed to fetch URL: {}", describe_status(.status, .status_text))]
    FetchFailed {
        status: Option<u16>,
        status_text: String,
    },

    /// The page was fetched but no strategy produced a valid recipe
    #[error("No valid recipe found on this page")]
    NoRecipeFound,
}

fn describe_status(status: &Option<u16>, status_text: &str) -> String {
    match status {
        Some(code) => format!("{code} {status_text}"),
        None => status_text.to_string(),
    }
}

/// Errors raised while putting an extractor together.
#[derive(Error, Debug)]
pub enum SetupError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
