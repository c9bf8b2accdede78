//! Client configuration.

/// Environment variable read by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// `base_url` is prefixed to relative request urls. A trailing slash is
    /// stripped. An empty base leaves relative urls as they are.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&std::env::var(BASE_URL_ENV).unwrap_or_default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `url` against the base. Absolute urls are returned unchanged.
    pub fn resolve(&self, url: &str) -> String {
        if self.base_url.is_empty() || has_scheme(url) {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }
}

/// `scheme://` at the very start, scheme being `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url(), "http://localhost:3000");
        assert_eq!(config.resolve("/items"), "http://localhost:3000/items");
        assert_eq!(config.resolve("items"), "http://localhost:3000/items");
    }

    #[test]
    fn absolute_urls_bypass_base() {
        let config = ClientConfig::new("http://localhost:3000");
        assert_eq!(config.resolve("https://other.test/x"), "https://other.test/x");
    }

    #[test]
    fn scheme_inside_query_is_still_relative() {
        let config = ClientConfig::new("http://api.test");
        assert_eq!(
            config.resolve("/login?next=http://app.test/home"),
            "http://api.test/login?next=http://app.test/home"
        );
        assert_eq!(config.resolve("a+b://x"), "a+b://x");
        assert_eq!(config.resolve("1http://x"), "http://api.test/1http://x");
    }

    #[test]
    fn empty_base_keeps_relative_urls() {
        let config = ClientConfig::default();
        assert_eq!(config.resolve("/items?a=1"), "/items?a=1");
    }
}
