//! Placeholder token parsing

use std::sync::LazyLock;

/// Matches one `{$...}` token
static TOKEN_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\{\$([^{}]*)\}").expect("Failed to compile placeholder token pattern")
});

/// Valid placeholder names
static NAME_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("Failed to compile placeholder name pattern")
});

/// Valid filter names
static FILTER_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-z][a-z0-9-]*$").expect("Failed to compile filter name pattern")
});

/// One `|name:argument` filter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Filter name (`of-type`, `separated-by`, ...)
    pub name: String,
    /// Argument after the first `:`, if any
    pub argument: Option<String>,
}

/// A parsed `{$NAME|filter:arg|...}` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Placeholder name (`STAGED_FILES`, `ARG`, ...)
    pub name: String,
    /// Filters in written order
    pub filters: Vec<Filter>,
}

impl Placeholder {
    /// Parse the inside of a token (without `{$` and `}`)
    ///
    /// # Errors
    ///
    /// Returns a description of the problem for malformed names or filters
    pub fn parse(body: &str) -> Result<Self, String> {
        let mut parts = body.split('|');
        let name = parts.next().unwrap_or_default().trim();
        if !NAME_PATTERN.is_match(name) {
            return Err(format!("invalid placeholder name '{name}'"));
        }

        let mut filters = Vec::new();
        for part in parts {
            let (filter, argument) = match part.split_once(':') {
                Some((filter, argument)) => (filter.trim(), Some(argument.to_string())),
                None => (part.trim(), None),
            };
            if !FILTER_PATTERN.is_match(filter) {
                return Err(format!("invalid filter '{part}'"));
            }
            filters.push(Filter {
                name: filter.to_string(),
                argument,
            });
        }

        Ok(Self {
            name: name.to_string(),
            filters,
        })
    }

    /// Argument of the last occurrence of a filter
    ///
    /// A filter written without argument yields `Some("")`.
    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .rev()
            .find(|f| f.name == name)
            .map(|f| f.argument.as_deref().unwrap_or_default())
    }
}

/// Part of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Literal text
    Text(&'t str),
    /// A token: raw text including braces, and its parse result
    Token {
        /// Token text including `{$` and `}`
        raw: &'t str,
        /// Parsed placeholder, or why it did not parse
        placeholder: Result<Placeholder, String>,
    },
}

/// Split a template into literal text and tokens
#[must_use]
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for captures in TOKEN_PATTERN.captures_iter(template) {
        let (Some(whole), Some(body)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&template[last..whole.start()]));
        }
        segments.push(Segment::Token {
            raw: whole.as_str(),
            placeholder: Placeholder::parse(body.as_str()),
        });
        last = whole.end();
    }
    if last < template.len() {
        segments.push(Segment::Text(&template[last..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_with_filters() {
        let placeholder = Placeholder::parse("STAGED_FILES|of-type:php|separated-by:,").unwrap();
        assert_eq!(placeholder.name, "STAGED_FILES");
        assert_eq!(placeholder.filter("of-type"), Some("php"));
        assert_eq!(placeholder.filter("separated-by"), Some(","));
        assert_eq!(placeholder.filter("in-dir"), None);
    }

    #[test]
    fn test_argument_keeps_later_colons() {
        let placeholder = Placeholder::parse("ENV|value-of:URL|default:http://localhost").unwrap();
        assert_eq!(placeholder.filter("default"), Some("http://localhost"));
    }

    #[test]
    fn test_filter_without_argument() {
        let placeholder = Placeholder::parse("BRANCH_FILES|compare-to").unwrap();
        assert_eq!(placeholder.filter("compare-to"), Some(""));
    }

    #[test]
    fn test_invalid_names() {
        assert!(Placeholder::parse("staged_files").is_err());
        assert!(Placeholder::parse("").is_err());
        assert!(Placeholder::parse("ARG|Value-Of:x").is_err());
    }

    #[test]
    fn test_segments() {
        let parts = segments("lint {$STAGED_FILES} --fix {$bad} {not a token}");
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], Segment::Text("lint "));
        assert!(matches!(
            &parts[1],
            Segment::Token { raw: "{$STAGED_FILES}", placeholder: Ok(p) } if p.name == "STAGED_FILES"
        ));
        assert_eq!(parts[2], Segment::Text(" --fix "));
        assert!(matches!(&parts[3], Segment::Token { placeholder: Err(_), .. }));
        assert_eq!(parts[4], Segment::Text(" {not a token}"));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("cargo test"), vec![Segment::Text("cargo test")]);
        assert!(segments("").is_empty());
    }
}
