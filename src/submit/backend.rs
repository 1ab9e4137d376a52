use crate::foundation::error::{MaskError, MaskResult};
use crate::submit::request::EditRequest;

/// The external image-edit service.
///
/// Implementations own transport, authentication and retries; the editor only hands over a
/// finished request and reports failures as [`MaskError::Backend`].
pub trait EditBackend {
    fn edit(&mut self, request: &EditRequest) -> MaskResult<EditResponse>;
}

impl<B: EditBackend + ?Sized> EditBackend for &mut B {
    fn edit(&mut self, request: &EditRequest) -> MaskResult<EditResponse> {
        (**self).edit(request)
    }
}

impl<B: EditBackend + ?Sized> EditBackend for Box<B> {
    fn edit(&mut self, request: &EditRequest) -> MaskResult<EditResponse> {
        (**self).edit(request)
    }
}

/// Response body of an image-edit call.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditResponse {
    /// Unix seconds.
    pub created: u64,
    pub data: Vec<GeneratedImage>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratedImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl EditResponse {
    pub fn from_json(text: &str) -> MaskResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| MaskError::backend(format!("malformed edit response: {e}")))
    }

    /// An empty `data` array means the backend produced nothing.
    pub fn ensure_nonempty(self) -> MaskResult<Self> {
        if self.data.is_empty() {
            return Err(MaskError::backend("edit response contained no images"));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/submit/backend.rs"]
mod tests;
