//! Trigger matching against the configuration snapshot
//!
//! Given the text sitting before the cursor, decide whether the word the user
//! just finished typing is a configured abbreviation. Whole-token equality
//! only: substring hits never count, the entire trailing word must equal a
//! trigger.

use crate::config::{AbbreviationMap, EngineSettings};
use crate::util::{fold_case, last_token};

/// A successful trigger match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The configured trigger that matched
    pub trigger: String,
    /// The unresolved expansion template for that trigger
    pub template: String,
    /// The word as actually typed (case may differ from `trigger`)
    pub typed: String,
}

/// Match the last whitespace-delimited token of `preceding_text` against the
/// abbreviation map.
///
/// Returns `None` when the engine is disabled, when no word touches the
/// cursor, or when no trigger equals the candidate. Comparison is case-folded
/// unless `case_sensitive` is set. The first hit in the map's deterministic
/// order (longest trigger first) wins.
pub fn match_abbreviation(
    preceding_text: &str,
    settings: EngineSettings,
    map: &AbbreviationMap,
) -> Option<MatchResult> {
    if !settings.enabled {
        return None;
    }

    let candidate = last_token(preceding_text)?;
    let folded_candidate = if settings.case_sensitive {
        None
    } else {
        Some(fold_case(candidate))
    };

    for (trigger, template) in map.iter() {
        let hit = match &folded_candidate {
            Some(folded) => fold_case(trigger) == *folded,
            None => trigger == candidate,
        };
        if hit {
            return Some(MatchResult {
                trigger: trigger.to_string(),
                template: template.to_string(),
                typed: candidate.to_string(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AbbreviationMap;

    fn map(pairs: &[(&str, &str)]) -> AbbreviationMap {
        AbbreviationMap::new(
            pairs
                .iter()
                .map(|(t, e)| (t.to_string(), e.to_string())),
        )
    }

    fn on() -> EngineSettings {
        EngineSettings {
            enabled: true,
            case_sensitive: false,
        }
    }

    #[test]
    fn matches_trailing_word() {
        let m = map(&[("ty", "Thank you")]);
        let result = match_abbreviation("ok ty", on(), &m).unwrap();
        assert_eq!(result.trigger, "ty");
        assert_eq!(result.template, "Thank you");
        assert_eq!(result.typed, "ty");
    }

    #[test]
    fn disabled_never_matches() {
        let m = map(&[("ty", "Thank you")]);
        let settings = EngineSettings {
            enabled: false,
            case_sensitive: false,
        };
        assert!(match_abbreviation("ty", settings, &m).is_none());
    }

    #[test]
    fn substring_is_not_a_match() {
        let m = map(&[("ty", "Thank you")]);
        assert!(match_abbreviation("qwerty", on(), &m).is_none());
        assert!(match_abbreviation("tyler", on(), &m).is_none());
    }

    #[test]
    fn trailing_whitespace_means_no_candidate() {
        let m = map(&[("ty", "Thank you")]);
        assert!(match_abbreviation("ty ", on(), &m).is_none());
    }

    #[test]
    fn case_insensitive_by_default() {
        let m = map(&[("ty", "Thank you")]);
        assert!(match_abbreviation("TY", on(), &m).is_some());
        assert!(match_abbreviation("Ty", on(), &m).is_some());
    }

    #[test]
    fn case_sensitive_requires_exact_case() {
        let m = map(&[("ty", "Thank you")]);
        let settings = EngineSettings {
            enabled: true,
            case_sensitive: true,
        };
        assert!(match_abbreviation("Ty", settings, &m).is_none());
        assert!(match_abbreviation("ty", settings, &m).is_some());
    }

    #[test]
    fn tie_break_prefers_longest_then_lexicographic() {
        // Both "Ty" and "ty" match "ty" case-insensitively; byte order picks "Ty"
        let m = map(&[("ty", "lower"), ("Ty", "upper")]);
        let result = match_abbreviation("ty", on(), &m).unwrap();
        assert_eq!(result.trigger, "Ty");
        assert_eq!(result.template, "upper");
    }
}
