//! The generation service: one prompt in, one [`ResultSet`] or one
//! classified [`GenerationError`] out.
//!
//! [`GenerationService`] wraps any [`ImageGenerationClient`], enriches the
//! prompt, makes a single call, and translates provider failures into the
//! user-facing taxonomy via [`classify_failure`]. It keeps no state between
//! calls.

use crate::image_generation::{
    GeneratedImage, GenerationRequest, ImageGenerationClient, ProviderError, ResultSet,
};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt;

/// Service wording that marks a rejected credential.
const INVALID_KEY_MARKER: &str = "API key not valid";
/// Service wording that marks quota or billing exhaustion.
const QUOTA_MARKER: &str = "quota";

/// Why a generation produced no images. `Display` is the text shown to users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationError {
    /// The prompt was blank; no request was sent.
    EmptyPrompt,
    InvalidCredential,
    QuotaExceeded,
    /// The service answered successfully but without images.
    EmptyResult,
    /// Any other service-reported failure, with the service message.
    Service(String),
    /// Transport or unexpected failure.
    Unknown,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EmptyPrompt => write!(f, "Please describe the wallpaper you want."),
            GenerationError::InvalidCredential => write!(
                f,
                "The provided API key is not valid. Please check your configuration."
            ),
            GenerationError::QuotaExceeded => write!(
                f,
                "You have exceeded your API quota. Please check your billing account or try again later."
            ),
            GenerationError::EmptyResult => write!(
                f,
                "Failed to generate images. The API did not return any images. The prompt may have been rejected."
            ),
            GenerationError::Service(msg) => write!(f, "Failed to generate images. {}", msg),
            GenerationError::Unknown => write!(
                f,
                "An unknown error occurred while communicating with the image generation service."
            ),
        }
    }
}

impl Error for GenerationError {}

/// Map a provider failure onto the user-facing taxonomy.
///
/// Matching is on the service's own wording, checked in priority order:
/// invalid key, then quota, then any other service error. Errors that never
/// reached the service are [`GenerationError::Unknown`]. Unrecognised service
/// messages stay [`GenerationError::Service`].
///
/// ```
/// use ai_wallpaper::generation::{classify_failure, GenerationError};
/// use ai_wallpaper::image_generation::ProviderError;
///
/// let err = ProviderError::service("Quota exceeded: you exceeded your current quota");
/// assert_eq!(classify_failure(&err), GenerationError::QuotaExceeded);
///
/// let err = ProviderError::Transport("connection reset".into());
/// assert_eq!(classify_failure(&err), GenerationError::Unknown);
/// ```
pub fn classify_failure(err: &ProviderError) -> GenerationError {
    match err {
        ProviderError::Service { message, .. } => {
            if message.contains(INVALID_KEY_MARKER) {
                GenerationError::InvalidCredential
            } else if message.contains(QUOTA_MARKER) {
                GenerationError::QuotaExceeded
            } else {
                GenerationError::Service(message.clone())
            }
        }
        ProviderError::Transport(_) => GenerationError::Unknown,
    }
}

/// Stateless wrapper turning prompts into wallpaper result sets.
pub struct GenerationService<C: ImageGenerationClient> {
    client: C,
}

impl<C: ImageGenerationClient> GenerationService<C> {
    pub fn new(client: C) -> Self {
        GenerationService { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Generate wallpapers for `prompt`.
    ///
    /// Makes exactly one provider call. Returns every image the provider
    /// reported; zero images is [`GenerationError::EmptyResult`].
    pub async fn generate(&self, prompt: &str) -> Result<ResultSet, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let request = GenerationRequest::wallpaper(prompt);
        debug!(
            "GenerationService::generate(...): model={} images={} aspect_ratio={} prompt={:?}",
            self.client.model_name(),
            request.number_of_images,
            request.aspect_ratio,
            request.prompt
        );

        let images = match self.client.generate_images(&request).await {
            Ok(images) => images,
            Err(err) => {
                if log::log_enabled!(log::Level::Error) {
                    error!(
                        "GenerationService::generate(...): image service error: {}",
                        err
                    );
                }
                return Err(classify_failure(&err));
            }
        };

        if images.is_empty() {
            error!("GenerationService::generate(...): service returned no images");
            return Err(GenerationError::EmptyResult);
        }
        if images.len() < request.number_of_images as usize {
            warn!(
                "GenerationService::generate(...): requested {} images, service returned {}",
                request.number_of_images,
                images.len()
            );
        }

        info!(
            "GenerationService::generate(...): received {} images",
            images.len()
        );
        let images = images.into_iter().map(GeneratedImage::from).collect();
        Ok(ResultSet::new(prompt, images))
    }
}
