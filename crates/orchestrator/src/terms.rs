//! Search-term prompt and reply parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::OrchestratorError;

/// Marker free gateways put in replies that are really error reports.
pub const GATEWAY_ERROR_MARKER: &str = "Error: ";

// First `[` through last `]`, across lines
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Build the search-term prompt.
pub fn terms_prompt(subject: &str, script: &str, amount: u32) -> String {
    format!(
        r#"# Role: Video Search Terms Generator

## Goals:
Generate {amount} search terms for stock videos, depending on the subject of a video.

## Constrains:
1. the search terms are to be returned as a json-array of strings.
2. each search term should consist of 1-3 words, always add the main subject of the video.
3. you must only return the json-array of strings. you must not return anything else. you must not return the script.
4. the search terms must be related to the subject of the video.
5. reply with english search terms only.

## Output Example:
["search term 1", "search term 2", "search term 3","search term 4","search term 5"]

## Context:
### Video Subject
{subject}

### Video Script
{script}

Please note that you must use English for generating video search terms; Chinese is not accepted."#
    )
}

/// Parse a reply into a non-empty list of terms.
///
/// The reply is parsed as JSON first. When it is not valid JSON, the
/// bracketed span is extracted and parsed instead.
///
/// ```rust
/// use orchestrator::parse_terms;
///
/// let terms = parse_terms(r#"here you go: ["cats","dogs","pets"]"#).unwrap();
/// assert_eq!(terms, vec!["cats", "dogs", "pets"]);
/// ```
pub fn parse_terms(raw: &str) -> Result<Vec<String>, OrchestratorError> {
    if raw.contains(GATEWAY_ERROR_MARKER) {
        return Err(OrchestratorError::Validation(format!(
            "provider returned an error payload: {}",
            raw.trim()
        )));
    }

    let value = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => value,
        Err(direct_err) => {
            let span = JSON_ARRAY.find(raw).ok_or_else(|| {
                OrchestratorError::Validation(format!(
                    "reply is not JSON and contains no array: {}",
                    direct_err
                ))
            })?;
            serde_json::from_str::<Value>(span.as_str()).map_err(|e| {
                OrchestratorError::Validation(format!("extracted array is not valid JSON: {}", e))
            })?
        }
    };

    terms_from_value(value)
}

fn terms_from_value(value: Value) -> Result<Vec<String>, OrchestratorError> {
    let Value::Array(items) = value else {
        return Err(OrchestratorError::Validation(
            "reply is not a JSON array".to_string(),
        ));
    };

    let terms = items
        .into_iter()
        .map(|item| match item {
            Value::String(term) => Ok(term),
            other => Err(OrchestratorError::Validation(format!(
                "search term is not a string: {}",
                other
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if terms.is_empty() {
        return Err(OrchestratorError::Validation(
            "reply contains no search terms".to_string(),
        ));
    }
    Ok(terms)
}
