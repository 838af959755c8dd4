//! Parse LLM output into QA records

use crate::error::ExtractorError;
use docqa_domain::QaRecord;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fence regex is valid"))
}

/// Parse an LLM reply into QA records
///
/// The reply must contain a JSON array, either bare or inside a fenced code
/// block. Elements that are not objects with non-empty string `question` and
/// `answer` fields are dropped; their siblings are kept.
pub fn parse_llm_response(response: &str) -> Result<Vec<QaRecord>, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)?;

    let items = json
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON array".to_string()))?;

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_record_json(item) {
            Ok(record) => {
                if let Err(e) = record.validate() {
                    debug!("Record {} failed validation: {}", idx, e);
                    continue;
                }
                records.push(record);
            }
            Err(e) => {
                debug!("Dropping record {}: {}", idx, e);
            }
        }
    }

    Ok(records)
}

/// Locate the JSON payload in a reply
///
/// Uses the first fenced block anywhere in the reply, falling back to the
/// whole reply.
pub fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let payload = match fence_regex().captures(response).and_then(|caps| caps.get(1)) {
        Some(block) => block.as_str(),
        None => response.trim(),
    };

    if payload.is_empty() {
        return Err(ExtractorError::InvalidFormat("Empty reply".to_string()));
    }
    Ok(payload)
}

/// Parse a single record from JSON
fn parse_record_json(json: &Value) -> Result<QaRecord, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Record is not a JSON object".to_string())?;

    let question = obj
        .get("question")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'question'".to_string())?;

    let answer = obj
        .get("answer")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'answer'".to_string())?;

    let mut record = QaRecord::new(question, answer);

    if let Some(topic) = obj.get("topic").and_then(|v| v.as_str()) {
        if !topic.trim().is_empty() {
            record = record.with_topic(topic);
        }
    }

    Ok(record)
}
