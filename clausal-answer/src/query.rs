//! Best-effort attribute extraction from free-text claim queries.
//!
//! Every field is optional and independently extracted; failure to find a
//! field simply leaves it out. This is a heuristic, not a parse, and it never
//! signals an error.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Sparse attribute mapping extracted from a question, used in decision mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_duration: Option<String>,
}

fn age_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,3})[- ]*(years?[- ]old|y/o|yo\b|male\b|female\b|m\b|f\b)")
            .expect("static pattern")
    })
}

fn bare_age_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{2})\b").expect("static pattern"))
}

fn procedure_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b((?:[a-z]+ ){0,2}(?:surgery|surgeries|procedure|treatment|operation))\b")
            .expect("static pattern")
    })
}

fn location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Capitalized token(s) after a locative preposition stand in for
        // proper entity tagging.
        Regex::new(r"\b(?:in|at|near)\s+([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)")
            .expect("static pattern")
    })
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)[- ]?(month|year)s?([- ]?(old|policy))?").expect("static pattern")
    })
}

/// Heuristically extract claim attributes from `query`.
///
/// ```
/// use clausal_answer::parse_query;
///
/// let parsed = parse_query("45 year old male, knee surgery in Pune, 3-month policy");
/// assert_eq!(parsed.age, Some(45));
/// assert_eq!(parsed.gender.as_deref(), Some("male"));
/// ```
pub fn parse_query(query: &str) -> ParsedQuery {
    let mut result = ParsedQuery::default();
    let lowercase = query.to_lowercase();

    // Age: prefer a number with an age-like suffix, then fall back to any
    // standalone two-digit number that is not a policy duration.
    if let Some(caps) = age_regex().captures(query) {
        result.age = caps[1].parse().ok();
    } else {
        for matched in bare_age_regex().find_iter(query) {
            let tail = query[matched.end()..].trim_start_matches([' ', '-']);
            let tail = tail.to_lowercase();
            if tail.starts_with("month") || tail.starts_with("year") {
                continue;
            }
            result.age = matched.as_str().parse().ok();
            break;
        }
    }

    // Gender: the "female" cue must win before the "male" substring check.
    if lowercase.contains("female") || lowercase.contains("f,") {
        result.gender = Some("female".to_string());
    } else if lowercase.contains("male") || lowercase.contains("m,") {
        result.gender = Some("male".to_string());
    }

    // Procedure: the shortest phrase ending in a procedure keyword.
    if let Some(caps) = procedure_regex().captures(query) {
        let phrase = caps[1].trim();
        // Drop a leading age/gender word the greedy prefix may have caught.
        let phrase = phrase
            .trim_start_matches("male ")
            .trim_start_matches("female ")
            .trim();
        if !phrase.is_empty() {
            result.procedure = Some(phrase.to_string());
        }
    }

    if let Some(caps) = location_regex().captures(query) {
        result.location = Some(caps[1].to_string());
    }

    if let Some(m) = duration_regex().find(query) {
        result.policy_duration = Some(m.as_str().to_string());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_claim_query() {
        let parsed = parse_query("45 year old male, knee surgery in Pune, 3-month policy");

        assert_eq!(parsed.age, Some(45));
        assert_eq!(parsed.gender.as_deref(), Some("male"));
        assert!(parsed.procedure.as_deref().unwrap().contains("surgery"));
        assert_eq!(parsed.location.as_deref(), Some("Pune"));
        assert!(parsed.policy_duration.as_deref().unwrap().contains("3-month"));
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let parsed = parse_query("What does the policy say about dental care?");

        assert_eq!(parsed.age, None);
        assert_eq!(parsed.gender, None);
        assert_eq!(parsed.procedure, None);
        assert_eq!(parsed.location, None);
        assert_eq!(parsed.policy_duration, None);

        // The sparse mapping serializes without the absent keys.
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_female_not_shadowed_by_male() {
        let parsed = parse_query("32 year old female, cataract procedure at Mumbai");
        assert_eq!(parsed.gender.as_deref(), Some("female"));
        assert_eq!(parsed.age, Some(32));
        assert!(parsed.procedure.as_deref().unwrap().contains("procedure"));
        assert_eq!(parsed.location.as_deref(), Some("Mumbai"));
    }

    #[test]
    fn test_bare_age_skips_durations() {
        let parsed = parse_query("Claim for a 12 month policy holder aged 67, hip surgery");
        assert_eq!(parsed.age, Some(67));
        assert!(parsed.policy_duration.as_deref().unwrap().starts_with("12"));
    }

    #[test]
    fn test_duration_keeps_policy_suffix() {
        let parsed = parse_query("3-month policy, 45M");
        assert_eq!(parsed.policy_duration.as_deref(), Some("3-month policy"));
        assert_eq!(parsed.age, Some(45));
    }

    #[test]
    fn test_dollar_amounts_are_not_ages() {
        let parsed = parse_query("Is the $500 cap in the policy?");
        assert_eq!(parsed.age, None);
    }

    #[test]
    fn test_multiword_location() {
        let parsed = parse_query("appendix surgery in New Delhi last week");
        assert_eq!(parsed.location.as_deref(), Some("New Delhi"));
    }
}
