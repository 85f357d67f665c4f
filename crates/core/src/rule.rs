use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: RuleKind,
}

fn enabled_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleKind {
    Replace {
        #[serde(default)]
        search: String,
        #[serde(default)]
        replace: String,
        #[serde(default, rename = "useRegex")]
        use_regex: bool,
    },
    Affixes {
        #[serde(default)]
        prefix: String,
        #[serde(default)]
        suffix: String,
    },
    Case {
        #[serde(rename = "caseType")]
        mode: CaseMode,
    },
    Sequence {
        #[serde(default = "seq_start_default", rename = "seqStart")]
        start: i64,
        #[serde(default, rename = "seqPad")]
        pad: usize,
        #[serde(default, rename = "seqSeparator")]
        separator: String,
    },
}

fn seq_start_default() -> i64 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Upper,
    Lower,
    Title,
    Sentence,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("正規表現が不正です ({id}): {source}")]
    InvalidRegex {
        id: String,
        #[source]
        source: regex::Error,
    },
}

pub fn validate_rules(rules: &[Rule]) -> Result<(), RuleError> {
    for rule in rules.iter().filter(|r| r.enabled) {
        if let RuleKind::Replace {
            search,
            use_regex: true,
            ..
        } = &rule.kind
        {
            if let Err(source) = Regex::new(search) {
                return Err(RuleError::InvalidRegex {
                    id: rule.id.clone(),
                    source,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_deserializes_from_flat_json() {
        let raw = r#"{"id":"r1","type":"replace","enabled":true,"search":"IMG","replace":"photo","useRegex":false}"#;
        let rule: Rule = serde_json::from_str(raw).expect("must parse");
        assert_eq!(rule.id, "r1");
        assert!(rule.enabled);
        assert!(matches!(
            rule.kind,
            RuleKind::Replace { ref search, ref replace, use_regex: false } if search == "IMG" && replace == "photo"
        ));
    }

    #[test]
    fn sequence_rule_applies_defaults() {
        let raw = r#"{"id":"r2","type":"sequence"}"#;
        let rule: Rule = serde_json::from_str(raw).expect("must parse");
        assert!(matches!(
            rule.kind,
            RuleKind::Sequence { start: 1, pad: 0, ref separator } if separator.is_empty()
        ));
    }

    #[test]
    fn case_rule_parses_mode() {
        let raw = r#"{"id":"r3","type":"case","caseType":"title"}"#;
        let rule: Rule = serde_json::from_str(raw).expect("must parse");
        assert!(matches!(rule.kind, RuleKind::Case { mode: CaseMode::Title }));
    }

    #[test]
    fn validate_rejects_broken_regex() {
        let rule = Rule {
            id: "bad".to_string(),
            enabled: true,
            kind: RuleKind::Replace {
                search: "[unclosed".to_string(),
                replace: String::new(),
                use_regex: true,
            },
        };
        let err = validate_rules(&[rule]).expect_err("must fail");
        assert!(err.to_string().contains("正規表現が不正です"));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn validate_skips_disabled_rules() {
        let rule = Rule {
            id: "off".to_string(),
            enabled: false,
            kind: RuleKind::Replace {
                search: "[unclosed".to_string(),
                replace: String::new(),
                use_regex: true,
            },
        };
        validate_rules(&[rule]).expect("disabled rule must not be validated");
    }

    #[test]
    fn rule_serializes_with_type_tag() {
        let rule = Rule {
            id: "r1".to_string(),
            enabled: true,
            kind: RuleKind::Affixes {
                prefix: "pre_".to_string(),
                suffix: String::new(),
            },
        };
        let json = serde_json::to_string(&rule).expect("must serialize");
        assert!(json.contains(r#""type":"affixes""#));
        assert!(json.contains(r#""prefix":"pre_""#));
    }
}
