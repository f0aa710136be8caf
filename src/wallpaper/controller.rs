//! The interaction controller: the one owner of UI state.
//!
//! State lives in a single [`UiState`] value. Every user action is an
//! [`Action`], and [`transition`] is a pure function from `(UiState, Action)`
//! to `(UiState, Effect)`. [`InteractionController`] holds the state, feeds
//! actions through `transition`, and carries out the resulting [`Effect`]s:
//! calling the generation service, waiting out the remix delay, saving files,
//! and notifying the [`EventHandler`].
//!
//! ```text
//! Welcome ──submit──▶ Loading ──ok──▶ Results ──select/close──▶ (viewer)
//!                       ▲   └──err──▶ Error
//!                       │               │
//!                       └──retry/remix──┘
//! ```
//!
//! Only one generation is ever in flight. `submit` while `Loading` is a no-op,
//! and a started generation always runs to completion; its result is applied
//! whatever the user did in the meantime.
//!
//! # Example
//!
//! ```rust,no_run
//! use ai_wallpaper::clients::imagen::ImagenClient;
//! use ai_wallpaper::controller::{InteractionController, Phase};
//! use ai_wallpaper::WallpaperConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WallpaperConfig::from_env()?;
//!     let controller =
//!         InteractionController::from_config(ImagenClient::from_config(&config)?, &config);
//!
//!     controller.submit("sunset over mountains").await;
//!     if let Phase::Results(results) = controller.snapshot().phase() {
//!         controller.select(0).await;
//!         let path = controller.download().await?;
//!         println!("{} wallpapers, saved the first to {}", results.len(), path.display());
//!     }
//!     Ok(())
//! }
//! ```

use crate::config::{WallpaperConfig, DEFAULT_REMIX_DELAY};
use crate::download::{download_filename, save_image, DownloadError};
use crate::event::{EventHandler, WallpaperEvent};
use crate::generation::{GenerationError, GenerationService};
use crate::image_generation::{GeneratedImage, ImageGenerationClient, ResultSet};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Prompt used by `retry` when nothing has succeeded yet.
pub const FALLBACK_PROMPT: &str = "lo-fi alley in a rainy cyberpunk city";

/// What the main content area shows.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Welcome,
    Loading,
    /// Carries the user-facing message.
    Error(String),
    Results(ResultSet),
}

/// Complete UI state. The viewer selection is a sub-state of `Results`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UiState {
    phase: Phase,
    last_successful_prompt: Option<String>,
    selected: Option<usize>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match &self.phase {
            Phase::Results(results) => Some(results),
            _ => None,
        }
    }

    /// Current images; empty unless in `Results`.
    pub fn images(&self) -> &[GeneratedImage] {
        self.results().map(ResultSet::images).unwrap_or(&[])
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn last_successful_prompt(&self) -> Option<&str> {
        self.last_successful_prompt.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Image open in the viewer, if any.
    pub fn selected_image(&self) -> Option<&GeneratedImage> {
        self.selected
            .and_then(|index| self.results().and_then(|results| results.get(index)))
    }
}

/// Inputs to the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Submit(String),
    Retry,
    Select(usize),
    Close,
    Remix,
    Download,
    GenerationFinished {
        prompt: String,
        outcome: Result<ResultSet, GenerationError>,
    },
}

/// Work the controller must do after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Call the generation service with this prompt.
    Generate(String),
    /// Wait the remix delay, then submit `prompt`. `viewer_was_open` tells
    /// whether the remix closed an open viewer.
    Remix { prompt: String, viewer_was_open: bool },
    /// Save the image under a name derived from `prompt`.
    Save { image: GeneratedImage, prompt: String },
    Notify(WallpaperEvent),
}

fn ignored(reason: &str) -> Effect {
    Effect::Notify(WallpaperEvent::ActionIgnored {
        reason: reason.to_string(),
    })
}

/// Start a generation unless one is running or the prompt is blank.
fn start_generation(mut state: UiState, prompt: String) -> (UiState, Effect) {
    if state.is_loading() {
        return (state, ignored("a generation is already in progress"));
    }
    if prompt.trim().is_empty() {
        return (state, ignored("the prompt is empty"));
    }
    state.phase = Phase::Loading;
    state.selected = None;
    (state, Effect::Generate(prompt))
}

/// The state machine. Pure: no I/O, no clock, no locking.
pub fn transition(mut state: UiState, action: Action) -> (UiState, Effect) {
    match action {
        Action::Submit(prompt) => start_generation(state, prompt),
        Action::Retry => {
            if !matches!(state.phase, Phase::Error(_)) {
                return (state, ignored("retry is only available after an error"));
            }
            let prompt = state
                .last_successful_prompt
                .clone()
                .unwrap_or_else(|| FALLBACK_PROMPT.to_string());
            start_generation(state, prompt)
        }
        Action::Select(index) => {
            let in_range = state.results().map_or(false, |results| index < results.len());
            if !in_range {
                return (state, ignored("no such image to open"));
            }
            state.selected = Some(index);
            (state, Effect::Notify(WallpaperEvent::ViewerOpened { index }))
        }
        Action::Close => match state.selected.take() {
            Some(_) => (state, Effect::Notify(WallpaperEvent::ViewerClosed)),
            None => (state, Effect::None),
        },
        Action::Remix => match state.last_successful_prompt.clone() {
            Some(prompt) => {
                let viewer_was_open = state.selected.take().is_some();
                (
                    state,
                    Effect::Remix {
                        prompt,
                        viewer_was_open,
                    },
                )
            }
            None => (state, ignored("nothing to remix yet")),
        },
        Action::Download => match state.selected_image().cloned() {
            Some(image) => {
                let prompt = state.last_successful_prompt.clone().unwrap_or_default();
                (state, Effect::Save { image, prompt })
            }
            None => (state, ignored("no image is selected")),
        },
        Action::GenerationFinished { prompt, outcome } => {
            state.selected = None;
            match outcome {
                Ok(results) => {
                    let image_count = results.len();
                    state.phase = Phase::Results(results);
                    state.last_successful_prompt = Some(prompt.clone());
                    (
                        state,
                        Effect::Notify(WallpaperEvent::GenerationSucceeded {
                            prompt,
                            image_count,
                        }),
                    )
                }
                Err(err) => {
                    let message = err.to_string();
                    state.phase = Phase::Error(message.clone());
                    (
                        state,
                        Effect::Notify(WallpaperEvent::GenerationFailed { prompt, message }),
                    )
                }
            }
        }
    }
}

/// Owns the [`UiState`] and sequences user actions into generation calls.
///
/// All methods take `&self`; the state lock is never held across an `.await`,
/// so the view can keep reading [`snapshot`](Self::snapshot) while a
/// generation is in flight.
pub struct InteractionController<C: ImageGenerationClient> {
    service: GenerationService<C>,
    state: Mutex<UiState>,
    event_handler: Option<Arc<dyn EventHandler>>,
    download_dir: PathBuf,
    remix_delay: Duration,
}

impl<C: ImageGenerationClient> InteractionController<C> {
    pub fn new(client: C) -> Self {
        InteractionController {
            service: GenerationService::new(client),
            state: Mutex::new(UiState::new()),
            event_handler: None,
            download_dir: PathBuf::from("."),
            remix_delay: DEFAULT_REMIX_DELAY,
        }
    }

    pub fn from_config(client: C, config: &WallpaperConfig) -> Self {
        Self::new(client)
            .with_download_dir(config.download_dir.clone())
            .with_remix_delay(config.remix_delay)
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_remix_delay(mut self, delay: Duration) -> Self {
        self.remix_delay = delay;
        self
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> UiState {
        self.lock_state().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().is_loading()
    }

    pub fn images(&self) -> Vec<GeneratedImage> {
        self.lock_state().images().to_vec()
    }

    pub fn selected_image(&self) -> Option<GeneratedImage> {
        self.lock_state().selected_image().cloned()
    }

    pub fn last_successful_prompt(&self) -> Option<String> {
        self.lock_state().last_successful_prompt.clone()
    }

    /// Generate wallpapers for `prompt`. Returns `false` when the submission
    /// was rejected (blank prompt or a generation already in flight).
    pub async fn submit(&self, prompt: impl Into<String>) -> bool {
        let effect = self.dispatch(Action::Submit(prompt.into()));
        self.run(effect).await
    }

    /// Resubmit the last good prompt (or [`FALLBACK_PROMPT`]). Only from `Error`.
    pub async fn retry(&self) -> bool {
        let effect = self.dispatch(Action::Retry);
        self.run(effect).await
    }

    /// Close the viewer, then regenerate with the last good prompt.
    pub async fn remix(&self) -> bool {
        let effect = self.dispatch(Action::Remix);
        self.run(effect).await
    }

    /// Open the viewer on image `index` of the current results.
    pub async fn select(&self, index: usize) -> bool {
        let effect = self.dispatch(Action::Select(index));
        self.run(effect).await
    }

    /// Close the viewer. Returns `false` if it was not open.
    pub async fn close(&self) -> bool {
        let effect = self.dispatch(Action::Close);
        self.run(effect).await
    }

    /// Save the image open in the viewer and return where it was written.
    pub async fn download(&self) -> Result<PathBuf, DownloadError> {
        match self.dispatch(Action::Download) {
            Effect::Save { image, prompt } => {
                let filename = download_filename(&prompt, chrono::Utc::now().timestamp_millis());
                let path = save_image(&self.download_dir, &filename, image.bytes()).await?;
                info!(
                    "InteractionController::download(): saved {} bytes to {}",
                    image.bytes().len(),
                    path.display()
                );
                self.emit(&WallpaperEvent::ImageSaved { path: path.clone() })
                    .await;
                Ok(path)
            }
            other => {
                self.run(other).await;
                Err(DownloadError::NothingSelected)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, UiState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `action` atomically and hand back the effect to execute.
    fn dispatch(&self, action: Action) -> Effect {
        let mut guard = self.lock_state();
        let current = std::mem::take(&mut *guard);
        let (next, effect) = transition(current, action);
        *guard = next;
        effect
    }

    /// Execute an effect. Returns whether it changed anything the user sees.
    async fn run(&self, effect: Effect) -> bool {
        match effect {
            Effect::None => false,
            Effect::Generate(prompt) => {
                self.generate(prompt).await;
                true
            }
            Effect::Remix {
                prompt,
                viewer_was_open,
            } => {
                if viewer_was_open {
                    self.emit(&WallpaperEvent::ViewerClosed).await;
                }
                if !self.remix_delay.is_zero() {
                    tokio::time::sleep(self.remix_delay).await;
                }
                match self.dispatch(Action::Submit(prompt)) {
                    Effect::Generate(prompt) => {
                        self.generate(prompt).await;
                        true
                    }
                    Effect::Notify(event) => {
                        self.notify(event).await;
                        false
                    }
                    _ => false,
                }
            }
            Effect::Notify(event) => self.notify(event).await,
            // Only produced by `Action::Download`, which `download` handles itself.
            Effect::Save { .. } => false,
        }
    }

    async fn notify(&self, event: WallpaperEvent) -> bool {
        let accepted = !matches!(event, WallpaperEvent::ActionIgnored { .. });
        if let WallpaperEvent::ActionIgnored { reason } = &event {
            warn!("InteractionController: action ignored: {}", reason);
        }
        self.emit(&event).await;
        accepted
    }

    async fn generate(&self, prompt: String) {
        info!("InteractionController: generating wallpapers for {:?}", prompt);
        self.emit(&WallpaperEvent::GenerationStarted {
            prompt: prompt.clone(),
        })
        .await;

        let outcome = self.service.generate(&prompt).await;

        let effect = self.dispatch(Action::GenerationFinished { prompt, outcome });
        if let Effect::Notify(event) = effect {
            self.emit(&event).await;
        }
    }

    async fn emit(&self, event: &WallpaperEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_event(event).await;
        }
    }
}
