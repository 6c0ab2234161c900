//! Instruction template sent to the generation service
//!
//! The template asks for the top-K MBS candidates as strict JSON and embeds
//! the current UTC date. The user's query is appended separately by
//! [`compose_input`].

use chrono::{NaiveDate, Utc};

/// Label placed in front of the user's query
pub const USER_QUERY_PREFIX: &str = "User query: ";

/// Builds the instruction text for a given top-K
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionTemplate {
    top_k: u8,
}

impl InstructionTemplate {
    pub fn new(top_k: u8) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> u8 {
        self.top_k
    }

    /// Render with today's UTC date
    pub fn render_today(&self) -> String {
        self.render(Utc::now().date_naive())
    }

    /// Render with an explicit date
    pub fn render(&self, date: NaiveDate) -> String {
        format!(
            r#"Return the top {top_k} most relevant MBS candidates (single items or bundles). Each must follow MBS rules (validity, no conflicts).

JSON only:
{{
  "results": [
    {{
      "itemNum": "123",   // bundles use "itemNums": ["123","10997"]
      "title": "brief description",
      "match_reason": "why this bundle or item matches the query",
      "match_score": 0.0-1.0,
      "fee": "scheduled fee amount (or total for bundles)",
      "benefit": "Medicare benefit amount (or total for bundles)"
    }}
  ]
}}

Current date: {date}."#,
            top_k = self.top_k,
            date = date.format("%Y-%m-%d"),
        )
    }
}

/// Join the instruction and the query into the text submitted upstream
pub fn compose_input(instruction: &str, query: &str) -> String {
    format!("{instruction}\n\n{USER_QUERY_PREFIX}{query}")
}
