//! Imagen image generation over the Google Generative Language REST API.
//!
//! Requests go to `POST {base_url}/models/{model}:predict` with the credential
//! in the `x-goog-api-key` header:
//!
//! ```text
//! {"instances":[{"prompt":"..."}],
//!  "parameters":{"sampleCount":4,"aspectRatio":"9:16","outputOptions":{"mimeType":"image/jpeg"}}}
//! ```
//!
//! Successful answers carry `predictions[].bytesBase64Encoded`; failures carry
//! `{"error":{"code":..,"message":..,"status":..}}`.
//!
//! ```rust,no_run
//! use ai_wallpaper::clients::imagen::{ImagenClient, Model};
//! use ai_wallpaper::image_generation::{GenerationRequest, ImageGenerationClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = std::env::var("API_KEY")?;
//!     let client = ImagenClient::new_with_model_enum(&key, Model::Imagen40Generate001)?;
//!     let images = client
//!         .generate_images(&GenerationRequest::wallpaper("misty pine forest"))
//!         .await?;
//!     println!("{} images", images.len());
//!     Ok(())
//! }
//! ```

use crate::clients::http_pool::get_http_client;
use crate::config::{ConfigError, WallpaperConfig, DEFAULT_BASE_URL};
use crate::image_generation::{
    GenerationRequest, ImageGenerationClient, ProviderError, ProviderImage,
};
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub struct ImagenClient {
    api_key: String,
    base_url: String,
    pub model: String,
}

// Imagen models available on the Generative Language API as of 2025
pub enum Model {
    Imagen40Generate001,
    Imagen40UltraGenerate001,
    Imagen40FastGenerate001,
    Imagen30Generate002,
}

pub fn model_to_string(model: Model) -> String {
    match model {
        Model::Imagen40Generate001 => "imagen-4.0-generate-001".to_string(),
        Model::Imagen40UltraGenerate001 => "imagen-4.0-ultra-generate-001".to_string(),
        Model::Imagen40FastGenerate001 => "imagen-4.0-fast-generate-001".to_string(),
        Model::Imagen30Generate002 => "imagen-3.0-generate-002".to_string(),
    }
}

impl ImagenClient {
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Result<Self, ConfigError> {
        Self::new_with_base_url(secret_key, model_name, DEFAULT_BASE_URL)
    }

    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Result<Self, ConfigError> {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Create a client against a custom base URL.
    /// The default base URL is "<https://generativelanguage.googleapis.com/v1beta>"
    ///
    /// A blank `secret_key` is rejected with [`ConfigError::MissingCredential`],
    /// so no request is ever sent without a credential.
    pub fn new_with_base_url(
        secret_key: &str,
        model_name: &str,
        base_url: &str,
    ) -> Result<Self, ConfigError> {
        let secret_key = secret_key.trim();
        if secret_key.is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(ImagenClient {
            api_key: secret_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model_name.to_string(),
        })
    }

    pub fn from_config(config: &WallpaperConfig) -> Result<Self, ConfigError> {
        Self::new_with_base_url(&config.api_key, &config.model, &config.base_url)
    }

    pub fn predict_url(&self) -> String {
        format!("{}/models/{}:predict", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters<'a>,
}

#[derive(Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_options: OutputOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    status: Option<String>,
}

fn predict_body(request: &GenerationRequest) -> PredictRequest<'_> {
    PredictRequest {
        instances: vec![PredictInstance {
            prompt: &request.prompt,
        }],
        parameters: PredictParameters {
            sample_count: request.number_of_images,
            aspect_ratio: &request.aspect_ratio,
            output_options: OutputOptions {
                mime_type: &request.output_mime_type,
            },
        },
    }
}

/// Decode a successful `:predict` body. Filtered predictions carry no bytes
/// and are skipped.
fn parse_predict_response(body: &str) -> Result<Vec<ProviderImage>, ProviderError> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Transport(format!("invalid predict response: {}", e)))?;

    let mut images = Vec::with_capacity(response.predictions.len());
    for prediction in response.predictions {
        match prediction.bytes_base64_encoded {
            Some(encoded) => images.push(ProviderImage::from_base64(
                &encoded,
                prediction.mime_type.as_deref(),
            )?),
            None => warn!(
                "ImagenClient: prediction without image data (filtered: {})",
                prediction
                    .rai_filtered_reason
                    .as_deref()
                    .unwrap_or("no reason given")
            ),
        }
    }
    Ok(images)
}

/// Longest raw (non-envelope) error body shown to the user, in chars.
const MAX_RAW_ERROR_CHARS: usize = 200;

/// Turn a non-2xx answer into a service error. Bodies that are not the
/// documented error envelope fall back to the HTTP reason phrase when empty or
/// markup (proxy error pages), otherwise to the body cut to
/// [`MAX_RAW_ERROR_CHARS`].
fn parse_error_response(status: StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError::Service {
            status_code: envelope.error.code.or(Some(status.as_u16())),
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => {
            let raw = body.trim();
            let message = if raw.is_empty() || raw.starts_with('<') {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected HTTP status")
                    .to_string()
            } else if raw.chars().count() > MAX_RAW_ERROR_CHARS {
                let mut cut: String = raw.chars().take(MAX_RAW_ERROR_CHARS).collect();
                cut.push('…');
                cut
            } else {
                raw.to_string()
            };
            ProviderError::Service {
                status_code: Some(status.as_u16()),
                status: None,
                message,
            }
        }
    }
}

#[async_trait]
impl ImageGenerationClient for ImagenClient {
    async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ProviderImage>, ProviderError> {
        let http = get_http_client(&self.base_url)
            .map_err(|e| ProviderError::Transport(format!("HTTP client setup failed: {}", e)))?;

        let url = self.predict_url();
        debug!("ImagenClient::generate_images(...): POST {}", url);

        let response = http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&predict_body(request))
            .send()
            .await
            .map_err(|e| {
                error!("ImagenClient::generate_images(...): request failed: {}", e);
                ProviderError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("reading response body: {}", e)))?;

        if !status.is_success() {
            let err = parse_error_response(status, &body);
            error!("ImagenClient::generate_images(...): {}", err);
            return Err(err);
        }

        parse_predict_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
