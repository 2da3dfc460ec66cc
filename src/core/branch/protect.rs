use crate::log_warning;
use globset::{Glob, GlobMatcher};

/// One compiled protection pattern.
#[derive(Debug, Clone)]
enum Rule {
    /// Exact name, or prefix followed by `-` or `/`.
    Prefix(String),
    /// Pattern containing `*` or `?`, matched against the full name.
    Glob { pattern: String, matcher: GlobMatcher },
}

impl Rule {
    fn pattern(&self) -> &str {
        match self {
            Rule::Prefix(p) => p,
            Rule::Glob { pattern, .. } => pattern,
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Rule::Prefix(p) => {
                name == p
                    || name
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with('-') || rest.starts_with('/'))
            }
            Rule::Glob { matcher, .. } => matcher.is_match(name),
        }
    }
}

/// Decides whether a branch is exempt from deletion.
///
/// Matching is case-sensitive and byte-exact. Exact names are checked across
/// all patterns first, then each pattern in order as a glob or a prefix.
#[derive(Debug, Clone, Default)]
pub struct ProtectionMatcher {
    rules: Vec<Rule>,
}

impl ProtectionMatcher {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| {
                if !p.contains(|c| c == '*' || c == '?') {
                    return Rule::Prefix(p);
                }
                match Glob::new(&p) {
                    Ok(glob) => Rule::Glob {
                        matcher: glob.compile_matcher(),
                        pattern: p,
                    },
                    Err(e) => {
                        log_warning!("invalid protection pattern '{p}' ({e}); matching it literally");
                        Rule::Prefix(p)
                    }
                }
            })
            .collect();

        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::pattern).collect()
    }

    /// The first pattern protecting `name`, if any.
    pub fn matching_pattern(&self, name: &str) -> Option<&str> {
        if let Some(rule) = self.rules.iter().find(|r| r.pattern() == name) {
            return Some(rule.pattern());
        }
        self.rules
            .iter()
            .find(|r| r.matches(name))
            .map(Rule::pattern)
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.matching_pattern(name).is_some()
    }
}

/// Whether `name` is protected by any of `patterns`.
pub fn is_protected<S: AsRef<str>>(name: &str, patterns: &[S]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    ProtectionMatcher::new(patterns).is_protected(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patterns_protect_nothing() {
        let none: [&str; 0] = [];
        assert!(!is_protected("main", &none));
        assert!(ProtectionMatcher::new(none).is_empty());
    }

    #[test]
    fn test_wildcard_only_protects_everything() {
        for name in ["main", "feature/a", "x", "release/1.0/hotfix"] {
            assert!(is_protected(name, &["*"]), "{name}");
        }
    }

    #[test]
    fn test_exact_match() {
        assert!(is_protected("main", &["main"]));
        assert!(!is_protected("mainline", &["main"]));
    }

    #[test]
    fn test_prefix_with_separator() {
        let patterns = ["release"];
        assert!(is_protected("release", &patterns));
        assert!(is_protected("release-1.0", &patterns));
        assert!(is_protected("release/2.0", &patterns));
        assert!(!is_protected("releases", &patterns));
        assert!(!is_protected("pre-release", &patterns));
    }

    #[test]
    fn test_glob_patterns() {
        let patterns = ["release/*", "hotfix-?"];
        assert!(is_protected("release/1.0", &patterns));
        assert!(is_protected("hotfix-1", &patterns));
        assert!(!is_protected("hotfix-12", &patterns));
        assert!(!is_protected("release", &patterns));
        assert!(!is_protected("feature/release", &patterns));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_protected("Main", &["main"]));
        assert!(!is_protected("RELEASE/1", &["release/*"]));
    }

    #[test]
    fn test_matching_pattern_reports_first_rule() {
        let matcher = ProtectionMatcher::new(["develop", "release/*", "release"]);
        assert_eq!(matcher.matching_pattern("release/1.0"), Some("release/*"));
        assert_eq!(matcher.matching_pattern("release"), Some("release"));
        assert_eq!(matcher.matching_pattern("feature"), None);
    }

    #[test]
    fn test_empty_patterns_are_ignored() {
        let matcher = ProtectionMatcher::new(["", "main"]);
        assert_eq!(matcher.patterns(), vec!["main"]);
        assert!(!matcher.is_protected(""));
    }

    #[test]
    fn test_patterns_are_not_normalized() {
        assert!(!is_protected("main", &["main "]));
        assert!(!is_protected("main", &[" main"]));
        assert!(is_protected("main ", &["main "]));
    }

    #[test]
    fn test_matching_is_pure() {
        let patterns = vec!["main".to_string(), "release/*".to_string()];
        for name in ["main", "release/x", "feature"] {
            assert_eq!(is_protected(name, &patterns), is_protected(name, &patterns));
        }
    }
}
