//! Controller event system.
//!
//! The presentation layer implements [`EventHandler`] to learn when it has to
//! re-render: a generation started or finished, the viewer opened or closed,
//! an image was saved. The handler has a single default no-op method, so a
//! view only matches the events it cares about, then reads the fresh state
//! through [`InteractionController::snapshot`](crate::controller::InteractionController::snapshot).
//!
//! # Example
//!
//! ```rust,no_run
//! use ai_wallpaper::event::{EventHandler, WallpaperEvent};
//! use async_trait::async_trait;
//!
//! struct Redraw;
//!
//! #[async_trait]
//! impl EventHandler for Redraw {
//!     async fn on_event(&self, event: &WallpaperEvent) {
//!         match event {
//!             WallpaperEvent::GenerationStarted { prompt } => {
//!                 println!("drawing 4 skeleton cards for {:?}", prompt);
//!             }
//!             WallpaperEvent::GenerationFailed { message, .. } => {
//!                 println!("error panel: {}", message);
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::path::PathBuf;

/// Something the controller did that a view may want to reflect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WallpaperEvent {
    /// The controller entered `Loading` for `prompt`.
    GenerationStarted { prompt: String },
    /// A result set was stored.
    GenerationSucceeded { prompt: String, image_count: usize },
    /// The generation failed; `message` is what the error panel shows.
    GenerationFailed { prompt: String, message: String },
    /// A submit, retry, remix, select or download was rejected by the state
    /// machine.
    ActionIgnored { reason: String },
    ViewerOpened { index: usize },
    ViewerClosed,
    ImageSaved { path: PathBuf },
}

/// Receiver for [`WallpaperEvent`]s, shared as `Arc<dyn EventHandler>`.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_event(&self, _event: &WallpaperEvent) {}
}
