//! Pattern spec parsing.
//!
//! A pattern spec is either a JSON object mapping output labels to single
//! patterns (named mode) or a flat list of patterns separated by commas and
//! line breaks (unnamed mode). The shape is decided once, here; callers match
//! on [`PatternSet`] instead of re-inspecting the input.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::core::pattern::{MatchMode, MatchPattern, PatternError};

/// Normalized pattern spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSet {
    /// Flat list; reported under a single default label.
    Unnamed(Vec<MatchPattern>),
    /// One pattern per output label, in declaration order.
    Named(IndexMap<String, MatchPattern>),
}

impl PatternSet {
    pub fn len(&self) -> usize {
        match self {
            Self::Unnamed(patterns) => patterns.len(),
            Self::Named(patterns) => patterns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Pattern(PatternError),
    #[error("label '{label}': {source}")]
    LabeledPattern {
        label: String,
        #[source]
        source: PatternError,
    },
    #[error("label '{label}': pattern must be a string, got {found}")]
    NonStringPattern { label: String, found: String },
    #[error("label {label:?} cannot be used as an output name: {reason}")]
    InvalidLabel { label: String, reason: &'static str },
}

/// Parse a raw pattern spec.
///
/// Empty tokens (trailing commas, blank lines) are dropped. The first token
/// that fails to compile aborts the parse.
pub fn parse_pattern_spec(raw: &str, mode: MatchMode) -> Result<PatternSet, ParseError> {
    match serde_json::from_str::<IndexMap<String, Value>>(raw) {
        Ok(object) => parse_named(object, mode),
        Err(_) => parse_unnamed(raw, mode),
    }
}

fn parse_named(object: IndexMap<String, Value>, mode: MatchMode) -> Result<PatternSet, ParseError> {
    let mut named = IndexMap::with_capacity(object.len());
    for (label, value) in object {
        validate_label(&label)?;
        let token = match value {
            Value::String(token) => token,
            other => {
                return Err(ParseError::NonStringPattern {
                    label,
                    found: json_kind(&other).to_string(),
                });
            }
        };
        let pattern = MatchPattern::compile(&token, mode)
            .map_err(|source| ParseError::LabeledPattern {
                label: label.clone(),
                source,
            })?;
        named.insert(label, pattern);
    }
    Ok(PatternSet::Named(named))
}

fn parse_unnamed(raw: &str, mode: MatchMode) -> Result<PatternSet, ParseError> {
    let patterns = split_tokens(raw)
        .map(|token| MatchPattern::compile(token, mode).map_err(ParseError::Pattern))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PatternSet::Unnamed(patterns))
}

/// Split a flat-list spec on CR/LF and commas, trimming each token.
pub fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(['\r', '\n'])
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn validate_label(label: &str) -> Result<(), ParseError> {
    let reason = if label.trim().is_empty() {
        "label is empty"
    } else if label.contains(['\r', '\n']) {
        "label contains a line break"
    } else if label.contains('=') {
        "label contains '='"
    } else {
        return Ok(());
    };
    Err(ParseError::InvalidLabel {
        label: label.to_string(),
        reason,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(set: &PatternSet) -> Vec<String> {
        match set {
            PatternSet::Unnamed(patterns) => {
                patterns.iter().map(|p| p.source().to_string()).collect()
            }
            PatternSet::Named(patterns) => patterns
                .iter()
                .map(|(label, p)| format!("{label}:{}", p.source()))
                .collect(),
        }
    }

    #[test]
    fn comma_separated_list_is_unnamed() {
        let set = parse_pattern_spec("folder-1/sub-folder-1/file.txt, folder-2/*", MatchMode::Regex)
            .expect("parse");
        assert!(matches!(set, PatternSet::Unnamed(_)));
        assert_eq!(
            sources(&set),
            vec!["folder-1/sub-folder-1/file.txt", "folder-2/*"]
        );
    }

    #[test]
    fn line_breaks_and_commas_both_separate() {
        let set = parse_pattern_spec("a/\r\nb/, c/\n  d/\re/", MatchMode::Regex).expect("parse");
        assert_eq!(sources(&set), vec!["a/", "b/", "c/", "d/", "e/"]);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let set = parse_pattern_spec("src/,\n\n , docs/,", MatchMode::Regex).expect("parse");
        assert_eq!(sources(&set), vec!["src/", "docs/"]);
    }

    #[test]
    fn blank_spec_yields_empty_unnamed_set() {
        let set = parse_pattern_spec(" , \n", MatchMode::Regex).expect("parse");
        assert_eq!(set, PatternSet::Unnamed(Vec::new()));
        assert!(set.is_empty());
    }

    #[test]
    fn json_object_is_named_in_declaration_order() {
        let raw = r#"{"src":"^src/","docs":"^docs/","ci":"^\\.github/"}"#;
        let set = parse_pattern_spec(raw, MatchMode::Regex).expect("parse");
        assert!(matches!(set, PatternSet::Named(_)));
        assert_eq!(sources(&set), vec!["src:^src/", "docs:^docs/", "ci:^\\.github/"]);
    }

    #[test]
    fn empty_json_object_is_named_and_empty() {
        let set = parse_pattern_spec("{}", MatchMode::Regex).expect("parse");
        assert_eq!(set, PatternSet::Named(IndexMap::new()));
    }

    #[test]
    fn non_object_json_falls_back_to_list() {
        let set = parse_pattern_spec(r#"["a","b"]"#, MatchMode::Literal).expect("parse");
        assert_eq!(sources(&set), vec![r#"["a""#, r#""b"]"#]);
    }

    #[test]
    fn non_string_value_is_rejected() {
        let err = parse_pattern_spec(r#"{"docs": 1}"#, MatchMode::Regex).expect_err("number");
        assert_eq!(
            err,
            ParseError::NonStringPattern {
                label: "docs".to_string(),
                found: "a number".to_string()
            }
        );
    }

    #[test]
    fn invalid_token_aborts_list_parse() {
        let err = parse_pattern_spec("src/, (broken", MatchMode::Regex).expect_err("invalid");
        match err {
            ParseError::Pattern(inner) => assert_eq!(inner.token, "(broken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_named_token_reports_label() {
        let err = parse_pattern_spec(r#"{"src":"^src/","bad":"[z-a]"}"#, MatchMode::Regex)
            .expect_err("invalid");
        assert!(err.to_string().starts_with("label 'bad': invalid pattern '[z-a]'"));
    }

    #[test]
    fn labels_that_break_outputs_are_rejected() {
        for raw in [r#"{"":"x"}"#, r#"{"a=b":"x"}"#, r#"{"a\nb":"x"}"#] {
            let err = parse_pattern_spec(raw, MatchMode::Regex).expect_err(raw);
            assert!(matches!(err, ParseError::InvalidLabel { .. }), "{raw}: {err:?}");
        }
    }

    #[test]
    fn literal_mode_applies_to_named_patterns() {
        let set =
            parse_pattern_spec(r#"{"lock":"Cargo.lock"}"#, MatchMode::Literal).expect("parse");
        let PatternSet::Named(named) = set else {
            panic!("expected named set");
        };
        let lock = named.get("lock").expect("lock label");
        assert!(lock.is_match("Cargo.lock"));
        assert!(!lock.is_match("CargoXlock"));
    }
}
