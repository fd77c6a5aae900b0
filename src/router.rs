//! Route table mapping location paths to pages

use regex::Regex;
use std::sync::LazyLock;

static EXAMPLE_ROUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/for(?:/([^/]+))?(?:/.*)?$").unwrap());

static ANALYSIS_ROUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/analysis(?:/.*)?$").unwrap());

/// A page of the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Greeting page, `/for/:name?`
    Example { name: String },
    /// Analysis wizard, `/analysis`
    Analysis { name: String },
    /// Default route
    Landing,
}

impl Route {
    /// Resolve a path; a leading `#` is accepted and ignored
    pub fn parse(path: &str) -> Route {
        let path = path.trim().trim_start_matches('#');

        if let Some(captures) = EXAMPLE_ROUTE.captures(path) {
            let name = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "Stranger".to_string());
            return Route::Example { name };
        }

        if ANALYSIS_ROUTE.is_match(path) {
            return Route::Analysis {
                name: "Analysis Page".to_string(),
            };
        }

        Route::Landing
    }

    pub fn path(&self) -> String {
        match self {
            Route::Example { name } => format!("/for/{}", name),
            Route::Analysis { .. } => "/analysis".to_string(),
            Route::Landing => "/".to_string(),
        }
    }
}
