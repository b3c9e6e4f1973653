use serde::{Deserialize, Serialize};

/// A single-turn generation request as the consumers build it.
///
/// Callers guard against blank prompts before constructing one; the prompt
/// is non-empty at call time.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Outcome of one generation attempt.
///
/// Only `Success` carries a payload. `Unavailable` covers both the demo-mode
/// gate (no credential configured) and a nominally successful response with
/// no extractable text; consumers treat those two identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Unavailable,
    TransportError(String),
}

/// Request body for the generateContent endpoint
#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

/// Content structure for requests
#[derive(Serialize, Clone, Debug)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Part structure for a piece of content
#[derive(Serialize, Clone, Debug)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Response from the generateContent endpoint.
///
/// Every level is optional or defaulted: any shape other than the expected
/// one decodes to "no usable text" instead of a decode error.
#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in the response
#[derive(Deserialize, Debug)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
}

/// Content part in the response
#[derive(Deserialize, Debug, Default)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Part response from the API
#[derive(Deserialize, Debug)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case_instruction() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("hello")],
            system_instruction: Some(Content::text("be brief")),
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn request_omits_absent_instruction() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("hello")],
            system_instruction: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn response_tolerates_unexpected_shapes() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());

        let bare: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert!(bare.candidates[0].content.is_none());

        let textless: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).unwrap();
        let content = textless.candidates[0].content.as_ref().unwrap();
        assert!(content.parts[0].text.is_none());
    }
}
