//! Path pattern matching.

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// A literal string segment, compared byte for byte.
    Literal(String),
    /// A parameter segment (e.g., `:id`).
    Param(String),
}

/// A compiled path pattern for matching URLs.
///
/// Patterns are split on `/` exactly like request paths, so the segment
/// count is fixed: `/blog/:id` never matches `/blog` or `/blog/1/edit`, and
/// `/blog/` is a different pattern from `/blog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// The original pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
    /// Parameter names in order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Parses a path pattern string.
    ///
    /// Pattern syntax:
    /// - `/blog` - Literal path
    /// - `/blog/item/:id` - Path with parameter
    ///
    /// Parameter names must be non-empty and unique within the pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use portico_router::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/show/:category/:title/:id").unwrap();
    /// let params = pattern.match_path("/show/news/hello-world/42").unwrap();
    /// assert_eq!(params.get("category"), Some("news"));
    /// assert_eq!(params.get("id"), Some("42"));
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut param_names: Vec<String> = Vec::new();

        for part in pattern.split('/') {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(RouterError::InvalidPattern(format!(
                        "{pattern}: empty parameter name"
                    )));
                }
                if param_names.iter().any(|n| n == name) {
                    return Err(RouterError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                param_names.push(name.to_string());
                segments.push(PathSegment::Param(name.to_string()));
            } else {
                segments.push(PathSegment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            param_names,
        })
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns extracted parameters if the path matches. Parameter segments
    /// accept any value, including the empty string.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                PathSegment::Param(name) => params.insert(name.as_str(), part),
                PathSegment::Literal(literal) if literal == part => {}
                PathSegment::Literal(_) => return None,
            }
        }

        Some(params)
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parameter names.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> PathPattern {
        PathPattern::parse(s).unwrap()
    }

    #[test]
    fn test_literal_path() {
        let pattern = pattern("/blog");
        assert!(pattern.match_path("/blog").is_some());
        assert!(pattern.match_path("/posts").is_none());
        assert!(pattern.match_path("/Blog").is_none());
    }

    #[test]
    fn test_no_trailing_slash_normalization() {
        assert!(pattern("/blog").match_path("/blog/").is_none());
        assert!(pattern("/blog/").match_path("/blog").is_none());
    }

    #[test]
    fn test_single_param() {
        let params = pattern("/blog/item/:id").match_path("/blog/item/123").unwrap();
        assert_eq!(params.get("id"), Some("123"));
    }

    #[test]
    fn test_multiple_params_keep_pattern_order() {
        let params = pattern("/show/:category/:title/:id")
            .match_path("/show/news/hello-world/42")
            .unwrap();
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("category", "news"), ("title", "hello-world"), ("id", "42")]
        );
    }

    #[test]
    fn test_segment_count_mismatch() {
        let pattern = pattern("/blog/cat/:category");
        assert!(pattern.match_path("/blog/cat").is_none());
        assert!(pattern.match_path("/blog/cat/tech/extra").is_none());
    }

    #[test]
    fn test_param_binds_empty_segment() {
        let params = pattern("/blog/item/:id").match_path("/blog/item/").unwrap();
        assert_eq!(params.get("id"), Some(""));
    }

    #[test]
    fn test_empty_path() {
        assert!(pattern("").match_path("").is_some());
        assert!(pattern("/").match_path("").is_none());
        assert!(pattern("").match_path("/").is_none());
    }

    #[test]
    fn test_root_path() {
        let root = pattern("/");
        assert!(root.match_path("/").is_some());
        assert!(root.match_path("/blog").is_none());
    }

    #[test]
    fn test_param_names() {
        let pattern = pattern("/show/:category/:title/:id");
        assert_eq!(pattern.param_names(), ["category", "title", "id"]);
        assert_eq!(pattern.pattern(), "/show/:category/:title/:id");
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let err = PathPattern::parse("/a/:id/b/:id").unwrap_err();
        assert_eq!(
            err,
            RouterError::DuplicateParam {
                pattern: "/a/:id/b/:id".to_string(),
                name: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_param_name_rejected() {
        assert!(matches!(
            PathPattern::parse("/blog/:"),
            Err(RouterError::InvalidPattern(_))
        ));
    }
}
