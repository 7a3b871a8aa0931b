//! `string` keyword set (§4.4.2): `minLength`/`maxLength` measured in Unicode
//! code points via `schema_uri::text`, `pattern`, `format`, and the
//! `contentEncoding`/`contentMediaType` annotations.

use schema_core::{Reporter, ValidationOutput};
use schema_uri::text::codepoint_count;
use serde_json::Value;

use crate::format::Format;

#[derive(Debug, Clone)]
pub struct StringNode {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<CompiledPattern>,
    pub format: Option<Format>,
    pub content_encoding: Option<String>,
    pub content_media_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub regex: fancy_regex::Regex,
}

impl StringNode {
    pub fn validate(
        &self,
        instance: &Value,
        location: &str,
        absolute_keyword_location: &str,
        reporter: &mut dyn Reporter,
    ) {
        let Value::String(s) = instance else { return };
        let count = codepoint_count(s);

        if let Some(min) = self.min_length {
            if count < min {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("string has {count} code points, expected at least {min}"),
                    "minLength",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(max) = self.max_length {
            if count > max {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("string has {count} code points, expected at most {max}"),
                    "maxLength",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(pattern) = &self.pattern {
            match pattern.regex.is_match(s) {
                Ok(true) => {}
                Ok(false) | Err(_) => {
                    reporter.error(ValidationOutput::new(
                        location,
                        format!("string does not match pattern \"{}\"", pattern.source),
                        "pattern",
                        absolute_keyword_location,
                    ));
                }
            }
        }
        if let Some(format) = self.format {
            if !format.check(s) {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("\"{s}\" is not a valid {}", format.name()),
                    "format",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(encoding) = &self.content_encoding {
            if encoding == "base64" {
                if !is_valid_base64(s) {
                    reporter.error(ValidationOutput::new(
                        location,
                        "string is not valid base64",
                        "contentEncoding",
                        absolute_keyword_location,
                    ));
                }
            } else {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("unsupported contentEncoding \"{encoding}\""),
                    "contentEncoding",
                    absolute_keyword_location,
                ));
            }
        }
        // contentMediaType only has an agreed validation rule for
        // "application/json"; any other declared media type (or none) is
        // an annotation this validator passes through unchecked.
        if let Some(media_type) = &self.content_media_type {
            if media_type == "application/json" && serde_json::from_str::<Value>(s).is_err() {
                reporter.error(ValidationOutput::new(
                    location,
                    "string is not valid application/json",
                    "contentMediaType",
                    absolute_keyword_location,
                ));
            }
        }
    }
}

fn is_valid_base64(s: &str) -> bool {
    let trimmed = s.trim_end_matches('=');
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
        && s.len() % 4 == 0
}
