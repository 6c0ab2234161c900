//! Expected answer shape
//!
//! The generation service is asked to reply with:
//!
//! ```json
//! { "results": [ { "itemNum": "23", "title": "...", "match_reason": "...",
//!                  "match_score": 0.9, "fee": "...", "benefit": "..." } ] }
//! ```
//!
//! Bundles carry `itemNums` instead of `itemNum`. The gateway normally relays
//! the text untouched; these types back the opt-in validation.

use crate::{KbGateError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level answer document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEnvelope {
    pub results: Vec<Candidate>,
}

/// Single MBS item or a bundle of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Single {
        #[serde(rename = "itemNum")]
        item_num: String,
    },
    Bundle {
        #[serde(rename = "itemNums")]
        item_nums: Vec<String>,
    },
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCandidate")]
pub struct Candidate {
    #[serde(flatten)]
    pub item: ItemRef,
    pub title: String,
    pub match_reason: String,
    pub match_score: f64,
    pub fee: String,
    pub benefit: String,
}

#[derive(Deserialize)]
struct RawCandidate {
    #[serde(rename = "itemNum", default, deserialize_with = "opt_string_or_number")]
    item_num: Option<String>,
    #[serde(rename = "itemNums")]
    item_nums: Option<Vec<String>>,
    title: String,
    match_reason: String,
    match_score: f64,
    #[serde(deserialize_with = "string_or_number")]
    fee: String,
    #[serde(deserialize_with = "string_or_number")]
    benefit: String,
}

impl TryFrom<RawCandidate> for Candidate {
    type Error = String;

    fn try_from(raw: RawCandidate) -> std::result::Result<Self, Self::Error> {
        let item = match (raw.item_num, raw.item_nums) {
            (Some(item_num), None) => ItemRef::Single { item_num },
            (None, Some(item_nums)) if !item_nums.is_empty() => ItemRef::Bundle { item_nums },
            (None, Some(_)) => return Err("itemNums must not be empty".to_string()),
            (Some(_), Some(_)) => {
                return Err("candidate has both itemNum and itemNums".to_string())
            }
            (None, None) => return Err("candidate has neither itemNum nor itemNums".to_string()),
        };

        if !(0.0..=1.0).contains(&raw.match_score) {
            return Err(format!(
                "match_score {} outside 0..=1",
                raw.match_score
            ));
        }

        Ok(Self {
            item,
            title: raw.title,
            match_reason: raw.match_reason,
            match_score: raw.match_score,
            fee: raw.fee,
            benefit: raw.benefit,
        })
    }
}

/// Models sometimes emit fees as bare numbers
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(Some)
}

impl AnswerEnvelope {
    /// Parse and check generated text against the expected shape
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| KbGateError::MalformedAnswer(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_and_bundle() {
        let text = r#"{
            "results": [
                { "itemNum": "58503", "title": "Chest x-ray", "match_reason": "direct match",
                  "match_score": 0.93, "fee": "$48.35", "benefit": "$41.10" },
                { "itemNums": ["23", "11700"], "title": "Consult + ECG", "match_reason": "bundle",
                  "match_score": 0.61, "fee": "$73.10", "benefit": "$62.15" }
            ]
        }"#;

        let answer = AnswerEnvelope::parse(text).unwrap();
        assert_eq!(answer.results.len(), 2);
        assert_eq!(
            answer.results[0].item,
            ItemRef::Single {
                item_num: "58503".to_string()
            }
        );
        assert_eq!(
            answer.results[1].item,
            ItemRef::Bundle {
                item_nums: vec!["23".to_string(), "11700".to_string()]
            }
        );
    }

    #[test]
    fn test_numeric_fields_are_tolerated() {
        let text = r#"{ "results": [ { "itemNum": 23, "title": "t", "match_reason": "r",
            "match_score": 0.5, "fee": 41.2, "benefit": 35 } ] }"#;
        let answer = AnswerEnvelope::parse(text).unwrap();
        assert_eq!(answer.results[0].fee, "41.2");
        assert_eq!(answer.results[0].benefit, "35");
        assert_eq!(
            answer.results[0].item,
            ItemRef::Single {
                item_num: "23".to_string()
            }
        );
    }

    #[test]
    fn test_empty_results_are_valid() {
        let answer = AnswerEnvelope::parse(r#"{ "results": [] }"#).unwrap();
        assert!(answer.results.is_empty());
    }

    #[test]
    fn test_rejects_missing_item_reference() {
        let text = r#"{ "results": [ { "title": "t", "match_reason": "r",
            "match_score": 0.5, "fee": "1", "benefit": "1" } ] }"#;
        assert!(matches!(
            AnswerEnvelope::parse(text),
            Err(KbGateError::MalformedAnswer(_))
        ));
    }

    #[test]
    fn test_rejects_both_item_references() {
        let text = r#"{ "results": [ { "itemNum": "1", "itemNums": ["1"], "title": "t",
            "match_reason": "r", "match_score": 0.5, "fee": "1", "benefit": "1" } ] }"#;
        assert!(AnswerEnvelope::parse(text).is_err());
    }

    #[test]
    fn test_rejects_score_out_of_range() {
        let text = r#"{ "results": [ { "itemNum": "1", "title": "t", "match_reason": "r",
            "match_score": 1.4, "fee": "1", "benefit": "1" } ] }"#;
        assert!(AnswerEnvelope::parse(text).is_err());
    }

    #[test]
    fn test_rejects_prose() {
        let err = AnswerEnvelope::parse("Sorry, I could not find anything.").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Malformed answer from generation service:"));
    }
}
