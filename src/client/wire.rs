//! generateContent wire format
//!
//! Only the fields this application reads or writes are modelled; everything
//! else in the service's response is ignored by serde.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{RestoreError, Result};

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineImage,
    },
    Text {
        text: String,
    },
}

/// Image bytes travelling inline with the request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<Modality>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Image,
    Text,
}

fn serialize_base64<S: Serializer>(
    data: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

impl GenerateContentRequest {
    /// Restoration request: the photo first, then the instruction, accepting image and text back
    pub fn restoration(image: Vec<u8>, mime_type: &str, prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineImage {
                            mime_type: mime_type.to_string(),
                            data: image,
                        },
                    },
                    RequestPart::Text { text: prompt.to_string() },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
            },
        }
    }
}

/// Response body; missing fields deserialize as empty
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub inline_data: Option<ResponseBlob>,
    #[serde(default)]
    pub text: Option<String>,
    /// Reasoning parts are not part of the answer text
    #[serde(default)]
    pub thought: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBlob {
    #[serde(default)]
    pub data: String,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Answer text of the first candidate, reasoning parts excluded
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// Pull the restored image out of a response.
///
/// The first part carrying inline data wins, whatever comes before or after
/// it. Without one, non-blank text means the model declined and is returned
/// as [`RestoreError::ServiceRefusal`]. With neither, the result is `Ok(None)`.
pub fn extract_image(response: GenerateContentResponse) -> Result<Option<String>> {
    if let Some(blob) = response
        .first_parts()
        .iter()
        .find_map(|part| part.inline_data.as_ref())
    {
        if blob.data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(blob.data.clone()));
    }

    let text = response.text();
    let text = text.trim();
    if !text.is_empty() {
        return Err(RestoreError::ServiceRefusal(text.to_string()));
    }

    Ok(None)
}
