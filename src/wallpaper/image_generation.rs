//! Provider seam for image generation.
//!
//! This module defines the [`ImageGenerationClient`] trait that concrete image
//! services (see [`ImagenClient`](crate::clients::imagen::ImagenClient))
//! implement, together with the values that flow across it:
//!
//! - [`GenerationRequest`]: the enriched, immutable request for one API call
//! - [`ProviderImage`]: a raw payload as the provider returned it
//! - [`ProviderError`]: a structured service error or a transport failure
//! - [`GeneratedImage`] / [`ResultSet`]: what the rest of the crate displays
//!
//! # Example
//!
//! ```rust
//! use ai_wallpaper::image_generation::GenerationRequest;
//!
//! let request = GenerationRequest::wallpaper("rainy cyberpunk street");
//! assert_eq!(request.number_of_images, 4);
//! assert_eq!(request.aspect_ratio, "9:16");
//! assert!(request.prompt.starts_with("phone wallpaper, rainy cyberpunk street,"));
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Number of wallpapers requested per generation.
pub const WALLPAPER_COUNT: u32 = 4;
pub const WALLPAPER_ASPECT_RATIO: &str = "9:16";
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Qualifiers wrapped around every user prompt.
const PROMPT_PREFIX: &str = "phone wallpaper";
const PROMPT_SUFFIX: &str =
    "9:16 aspect ratio, high resolution, visually stunning, cinematic, beautiful";

/// One request to an image service. Built once per call and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Text exactly as the user typed it.
    pub raw_prompt: String,
    /// Enriched prompt sent to the service.
    pub prompt: String,
    pub number_of_images: u32,
    pub output_mime_type: String,
    pub aspect_ratio: String,
}

impl GenerationRequest {
    /// Build the wallpaper request for `prompt`: stylistic qualifiers around
    /// the text, four JPEG outputs, portrait 9:16.
    pub fn wallpaper(prompt: &str) -> Self {
        GenerationRequest {
            raw_prompt: prompt.to_string(),
            prompt: enrich_prompt(prompt),
            number_of_images: WALLPAPER_COUNT,
            output_mime_type: JPEG_MIME_TYPE.to_string(),
            aspect_ratio: WALLPAPER_ASPECT_RATIO.to_string(),
        }
    }
}

/// Wrap a user prompt in the fixed wallpaper qualifiers.
pub fn enrich_prompt(prompt: &str) -> String {
    format!("{}, {}, {}", PROMPT_PREFIX, prompt, PROMPT_SUFFIX)
}

/// A raw image payload as returned by a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ProviderImage {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        ProviderImage {
            bytes,
            mime_type: JPEG_MIME_TYPE.to_string(),
        }
    }

    /// Decode a base64 payload. When the provider did not state a MIME type,
    /// it is sniffed from the magic bytes.
    pub fn from_base64(encoded: &str, mime_type: Option<&str>) -> Result<Self, ProviderError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ProviderError::Transport(format!("invalid base64 image data: {}", e)))?;
        let mime_type = match mime_type {
            Some(mime) if !mime.is_empty() => mime.to_string(),
            _ => sniff_mime_type(&bytes).to_string(),
        };
        Ok(ProviderImage { bytes, mime_type })
    }
}

/// Determine an image MIME type from its leading magic bytes.
///
/// ```
/// use ai_wallpaper::image_generation::sniff_mime_type;
///
/// assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
/// assert_eq!(sniff_mime_type(b"\x89PNG\r\n\x1a\n"), "image/png");
/// assert_eq!(sniff_mime_type(b"hello"), "application/octet-stream");
/// ```
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        JPEG_MIME_TYPE
    } else if bytes.starts_with(b"\x89PNG") {
        "image/png"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// Failure reported by an [`ImageGenerationClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    /// The service answered with a structured error.
    Service {
        /// HTTP status code, when the error came over HTTP.
        status_code: Option<u16>,
        /// Service status label such as `RESOURCE_EXHAUSTED`.
        status: Option<String>,
        /// Human readable message from the service.
        message: String,
    },
    /// Anything that is not a service answer: network, decoding, panics.
    Transport(String),
}

impl ProviderError {
    /// Shorthand for a service error carrying only a message.
    pub fn service(message: impl Into<String>) -> Self {
        ProviderError::Service {
            status_code: None,
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Service {
                status_code: Some(code),
                message,
                ..
            } => write!(f, "Service error ({}): {}", code, message),
            ProviderError::Service { message, .. } => write!(f, "Service error: {}", message),
            ProviderError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl Error for ProviderError {}

/// Trait for image services able to turn a [`GenerationRequest`] into images.
///
/// Implementations must be stateless with respect to requests: every call is
/// independent and safe to run concurrently.
#[async_trait]
pub trait ImageGenerationClient: Send + Sync {
    /// Issue exactly one request to the service and return the images it
    /// reported, in order. An empty vector is a valid answer at this level.
    async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ProviderImage>, ProviderError>;

    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: ImageGenerationClient + ?Sized> ImageGenerationClient for Arc<T> {
    async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ProviderImage>, ProviderError> {
        (**self).generate_images(request).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// A displayable image.
///
/// Holds the decoded bytes (for saving) and a ready-to-use `data:` URI (for
/// display). Cloning is cheap; both are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    bytes: Arc<[u8]>,
    mime_type: Arc<str>,
    data_uri: Arc<str>,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>, mime_type: &str) -> Self {
        let data_uri = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
        GeneratedImage {
            bytes: Arc::from(bytes),
            mime_type: Arc::from(mime_type),
            data_uri: Arc::from(data_uri),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// `data:<mime>;base64,<payload>` reference usable directly as an image source.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

impl From<ProviderImage> for GeneratedImage {
    fn from(image: ProviderImage) -> Self {
        GeneratedImage::new(image.bytes, &image.mime_type)
    }
}

/// The images produced by one successful generation, tied to its prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSet {
    prompt: String,
    images: Vec<GeneratedImage>,
}

impl ResultSet {
    pub fn new(prompt: impl Into<String>, images: Vec<GeneratedImage>) -> Self {
        ResultSet {
            prompt: prompt.into(),
            images,
        }
    }

    /// The user prompt (not the enriched one) that produced these images.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&GeneratedImage> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallpaper_request_carries_fixed_parameters() {
        let request = GenerationRequest::wallpaper("sunset over mountains");
        assert_eq!(request.raw_prompt, "sunset over mountains");
        assert_eq!(
            request.prompt,
            "phone wallpaper, sunset over mountains, 9:16 aspect ratio, high resolution, \
             visually stunning, cinematic, beautiful"
        );
        assert_eq!(request.number_of_images, 4);
        assert_eq!(request.output_mime_type, "image/jpeg");
        assert_eq!(request.aspect_ratio, "9:16");
    }

    #[test]
    fn test_data_uri_is_base64_of_bytes() {
        let image = GeneratedImage::new(b"Hello World".to_vec(), "image/jpeg");
        assert_eq!(image.data_uri(), "data:image/jpeg;base64,SGVsbG8gV29ybGQ=");
        assert_eq!(image.bytes(), b"Hello World");
    }

    #[test]
    fn test_provider_image_from_base64_sniffs_missing_mime() {
        // "/9j/" is the base64 prefix of a JPEG SOI marker
        let image = ProviderImage::from_base64("/9j/4AAQSkZJRgABAQEAYABgAAD/2wBDAA==", None)
            .unwrap();
        assert_eq!(image.mime_type, "image/jpeg");

        let stated = ProviderImage::from_base64("SGVsbG8=", Some("image/png")).unwrap();
        assert_eq!(stated.mime_type, "image/png");
        assert_eq!(stated.bytes, b"Hello");
    }

    #[test]
    fn test_provider_image_rejects_bad_base64() {
        let err = ProviderImage::from_base64("not base64!!", None).unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
