//! Narration script prompt and cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::OrchestratorError;

/// Reply text some free gateways send once their daily quota is spent.
pub const QUOTA_EXHAUSTED_MARKER: &str = "当日额度已消耗完";

// `.` does not cross newlines, so annotations never swallow a paragraph break
static BRACKET_ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*\]").unwrap());
static PAREN_ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*\)").unwrap());
static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Build the narration prompt.
pub fn script_prompt(subject: &str, language: &str, paragraph_number: u32) -> String {
    let mut prompt = format!(
        r#"# Role: Video Script Generator

## Goals:
Generate a script for a video, depending on the subject of the video.

## Constrains:
1. the script is to be returned as a string with the specified number of paragraphs.
2. do not under any circumstance reference this prompt in your response.
3. get straight to the point, don't start with unnecessary things like, "welcome to this video".
4. you must not include any type of markdown or formatting in the script, never use a title.
5. only return the raw content of the script.
6. do not include "voiceover", "narrator" or similar indicators of what should be spoken at the beginning of each paragraph or line.
7. you must not mention the prompt, or anything about the script itself. also, never talk about the amount of paragraphs or lines. just write the script.
8. respond in the same language as the video subject.
9. use informal, conversational language that people use in their daily lives - avoid formal or academic tone.
10. make the content engaging and interesting by:
    - using natural expressions and idioms common in everyday speech
    - incorporating rhetorical questions to maintain viewer interest
    - using relatable examples and scenarios
    - keeping sentences concise and dynamic
    - adding personality and warmth to the tone
11. ensure the language feels authentic to native speakers of the target language
12. maintain a friendly and approachable tone throughout the script

# Initialization:
- video subject: {subject}
- number of paragraphs: {paragraph_number}"#
    );

    let language = language.trim();
    if !language.is_empty() {
        prompt.push_str("\n- language: ");
        prompt.push_str(language);
    }
    prompt
}

/// Strip markup from a raw reply and normalize paragraph breaks.
///
/// Markdown emphasis and heading markers go, as do single-line `[...]` and
/// `(...)` annotations. Runs of spaces or tabs become one space. Blank
/// paragraphs are dropped and the rest rejoined with one blank line.
///
/// ```rust
/// use orchestrator::clean_script;
///
/// let raw = "Hello **world** [ignore] (also ignore)\n\nSecond paragraph";
/// assert_eq!(clean_script(raw), "Hello world \n\nSecond paragraph");
/// ```
pub fn clean_script(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace(['*', '#'], "");
    let text = BRACKET_ANNOTATION.replace_all(&text, "");
    let text = PAREN_ANNOTATION.replace_all(&text, "");
    let text = INLINE_WHITESPACE.replace_all(&text, " ");

    text.split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// Clean a raw reply and check that it is a usable script.
pub fn validate_script(raw: &str) -> Result<String, OrchestratorError> {
    if raw.contains(QUOTA_EXHAUSTED_MARKER) {
        return Err(OrchestratorError::Validation(
            "provider reported its daily quota is exhausted".to_string(),
        ));
    }

    let script = clean_script(raw);
    if script.is_empty() {
        return Err(OrchestratorError::Validation(
            "script is empty after cleanup".to_string(),
        ));
    }
    Ok(script)
}
