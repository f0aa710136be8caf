//! # ai-wallpaper
//!
//! ai-wallpaper turns a short description ("rainy cyberpunk street") into four
//! portrait phone wallpapers using a hosted image-generation model, and keeps
//! the small amount of UI state needed to show them: a grid of results, a
//! full-screen viewer, remix, download and retry.
//!
//! The crate is split into two layers:
//!
//! * **Generation client**: [`GenerationService`] enriches the prompt, makes a
//!   single call through the [`image_generation::ImageGenerationClient`] trait
//!   (implemented by [`clients::imagen::ImagenClient`]), and turns failures into
//!   a [`generation::GenerationError`] whose `Display` is ready for the user.
//! * **Interaction controller**: [`InteractionController`] owns one
//!   [`controller::UiState`] and drives it through the pure
//!   [`controller::transition`] function. Views render from
//!   [`InteractionController::snapshot`] and subscribe to
//!   [`event::WallpaperEvent`]s.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use ai_wallpaper::clients::imagen::ImagenClient;
//! use ai_wallpaper::{InteractionController, WallpaperConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     ai_wallpaper::init_logger();
//!
//!     // Fails fast when API_KEY is missing.
//!     let config = WallpaperConfig::from_env()?;
//!     let controller =
//!         InteractionController::from_config(ImagenClient::from_config(&config)?, &config);
//!
//!     controller.submit("sunset over mountains").await;
//!
//!     let state = controller.snapshot();
//!     match state.error_message() {
//!         Some(message) => println!("{}", message),
//!         None => {
//!             for image in state.images() {
//!                 println!("{}...", &image.data_uri()[..40]);
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Testing against a fake service
//!
//! Anything implementing [`image_generation::ImageGenerationClient`] can stand
//! in for the real API:
//!
//! ```rust
//! use ai_wallpaper::image_generation::{
//!     GenerationRequest, ImageGenerationClient, ProviderError, ProviderImage,
//! };
//! use async_trait::async_trait;
//!
//! struct FourGreyTiles;
//!
//! #[async_trait]
//! impl ImageGenerationClient for FourGreyTiles {
//!     async fn generate_images(
//!         &self,
//!         request: &GenerationRequest,
//!     ) -> Result<Vec<ProviderImage>, ProviderError> {
//!         Ok((0..request.number_of_images)
//!             .map(|_| ProviderImage::jpeg(vec![0xFF, 0xD8, 0xFF]))
//!             .collect())
//!     }
//!
//!     fn model_name(&self) -> &str {
//!         "grey-tiles"
//!     }
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Diagnostics follow `RUST_LOG`, e.g. `RUST_LOG=ai_wallpaper=debug`.
///
/// ```rust
/// ai_wallpaper::init_logger();
/// ai_wallpaper::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

pub mod wallpaper;

pub use wallpaper::clients;
pub use wallpaper::config;
pub use wallpaper::config::{ConfigError, WallpaperConfig};
pub use wallpaper::controller;
pub use wallpaper::controller::{Phase, UiState, FALLBACK_PROMPT};
pub use wallpaper::download;
pub use wallpaper::event;
pub use wallpaper::event::{EventHandler, WallpaperEvent};
pub use wallpaper::generation;
pub use wallpaper::generation::GenerationError;
pub use wallpaper::image_generation;
pub use wallpaper::image_generation::{GeneratedImage, GenerationRequest, ResultSet};
pub use wallpaper::{GenerationService, InteractionController};
