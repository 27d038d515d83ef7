//! Conversion between unified types and Gemini types

use super::types::{GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig};
use crate::error::{Error, Result};
use crate::types::{FinishReason, GenerateRequest, GenerateResponse, Message, Role, Usage};

pub fn to_gemini_request(req: &GenerateRequest) -> GeminiRequest {
    let system_instruction = req
        .system
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| GeminiContent {
            role: None,
            parts: vec![text_part(s)],
        });

    let generation_config = (!req.options.is_empty()).then(|| GenerationConfig {
        temperature: req.options.temperature,
        top_p: req.options.top_p,
        max_output_tokens: req.options.max_tokens,
        stop_sequences: req.options.stop_sequences.clone(),
    });

    GeminiRequest {
        system_instruction,
        contents: req.messages.iter().map(to_gemini_content).collect(),
        generation_config,
    }
}

fn to_gemini_content(msg: &Message) -> GeminiContent {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![text_part(&msg.content)],
    }
}

fn text_part(text: &str) -> GeminiPart {
    GeminiPart {
        text: Some(text.to_string()),
    }
}

/// Take the first candidate's text parts, concatenated.
pub fn from_gemini_response(resp: GeminiResponse) -> Result<GenerateResponse> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::invalid_response(format!("prompt blocked: {reason}")));
        }
        return Err(Error::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }

    let usage = resp
        .usage_metadata
        .map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
        .unwrap_or_default();

    Ok(GenerateResponse {
        text,
        finish_reason: parse_finish_reason(candidate.finish_reason.as_deref()),
        usage,
        model: resp.model_version,
    })
}

fn parse_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        None | Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            FinishReason::ContentFilter
        }
        Some(other) => FinishReason::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerateOptions;
    use serde_json::json;

    #[test]
    fn request_maps_roles_and_system() {
        let req = GenerateRequest::new(
            "gemini-1.5-flash-latest",
            vec![
                Message::user("Salom"),
                Message::assistant("Salom! 😊"),
                Message::user("Naruto haqida"),
            ],
        )
        .with_system("Sen anime bo'yicha yordamchisan.");

        let body = serde_json::to_value(to_gemini_request(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "systemInstruction": { "parts": [{ "text": "Sen anime bo'yicha yordamchisan." }] },
                "contents": [
                    { "role": "user", "parts": [{ "text": "Salom" }] },
                    { "role": "model", "parts": [{ "text": "Salom! 😊" }] },
                    { "role": "user", "parts": [{ "text": "Naruto haqida" }] }
                ]
            })
        );
    }

    #[test]
    fn options_become_generation_config() {
        let req = GenerateRequest::new("m", vec![Message::user("x")])
            .with_options(GenerateOptions::new().temperature(0.7).max_tokens(512));
        let body = serde_json::to_value(to_gemini_request(&req)).unwrap();
        assert_eq!(
            body["generationConfig"],
            json!({ "temperature": 0.7f32, "maxOutputTokens": 512 })
        );
    }

    fn parse(v: serde_json::Value) -> Result<GenerateResponse> {
        from_gemini_response(serde_json::from_value(v).unwrap())
    }

    #[test]
    fn response_joins_text_parts() {
        let resp = parse(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "# Top 3\n" }, { "text": "- Naruto" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14 },
            "modelVersion": "gemini-1.5-flash-002"
        }))
        .unwrap();
        assert_eq!(resp.text(), "# Top 3\n- Naruto");
        assert_eq!(resp.finish_reason, FinishReason::Stop);
        assert_eq!(resp.usage.total_tokens, 14);
        assert_eq!(resp.model.as_deref(), Some("gemini-1.5-flash-002"));
    }

    #[test]
    fn missing_text_is_empty_response() {
        assert!(matches!(parse(json!({})), Err(Error::EmptyResponse)));
        assert!(matches!(
            parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
            Err(Error::EmptyResponse)
        ));
    }

    #[test]
    fn blocked_prompt_is_invalid_response() {
        let err = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } })).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
