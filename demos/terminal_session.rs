//! Terminal front-end for the wallpaper generator.
//!
//! Type a description to generate four wallpapers, then:
//!
//! ```text
//! :open N      open wallpaper N (1-4) in the viewer
//! :close       close the viewer
//! :download    save the open wallpaper
//! :remix       regenerate with the last prompt
//! :retry       retry after an error
//! :quit
//! ```
//!
//! Run with:
//!
//! ```bash
//! API_KEY="your-gemini-api-key" RUST_LOG=info cargo run --example terminal_session
//! ```

use ai_wallpaper::clients::imagen::ImagenClient;
use ai_wallpaper::{
    EventHandler, InteractionController, Phase, UiState, WallpaperConfig, WallpaperEvent,
};
use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

struct StatusLine;

#[async_trait]
impl EventHandler for StatusLine {
    async fn on_event(&self, event: &WallpaperEvent) {
        match event {
            WallpaperEvent::GenerationStarted { prompt } => {
                println!("⏳ Generating wallpapers for \"{}\"...", prompt)
            }
            WallpaperEvent::ViewerOpened { index } => println!("🖼  Viewing wallpaper {}", index + 1),
            WallpaperEvent::ViewerClosed => println!("Viewer closed"),
            WallpaperEvent::ImageSaved { path } => println!("💾 Saved {}", path.display()),
            WallpaperEvent::ActionIgnored { reason } => println!("(ignored: {})", reason),
            _ => {}
        }
    }
}

fn render(state: &UiState) {
    match state.phase() {
        Phase::Welcome => {
            println!("AI Wallpaper Generator");
            println!("Describe a scene or a style and get four phone wallpapers.");
        }
        Phase::Loading => println!("[ ▒▒ ] [ ▒▒ ]\n[ ▒▒ ] [ ▒▒ ]"),
        Phase::Error(message) => {
            println!("Oops! Something went wrong.");
            println!("{}", message);
            println!("Type :retry to try again.");
        }
        Phase::Results(results) => {
            for (i, image) in results.images().iter().enumerate() {
                let marker = if state.selected_index() == Some(i) { "*" } else { " " };
                println!(
                    "{} [{}] {} KB {}",
                    marker,
                    i + 1,
                    image.bytes().len() / 1024,
                    image.mime_type()
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ai_wallpaper::init_logger();

    let config = WallpaperConfig::from_env()?;
    log::info!("Using model {} ({:?})", config.model, config.download_dir);

    let controller = InteractionController::from_config(ImagenClient::from_config(&config)?, &config)
        .with_event_handler(Arc::new(StatusLine));

    render(&controller.snapshot());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            ":quit" | ":q" => break,
            ":close" => {
                controller.close().await;
            }
            ":remix" => {
                controller.remix().await;
            }
            ":retry" => {
                controller.retry().await;
            }
            ":download" => {
                if let Err(err) = controller.download().await {
                    println!("{}", err);
                }
            }
            _ if line.starts_with(":open") => {
                match line[":open".len()..].trim().parse::<usize>() {
                    Ok(n) if n > 0 => {
                        controller.select(n - 1).await;
                    }
                    _ => println!("usage: :open N"),
                }
            }
            prompt => {
                controller.submit(prompt).await;
            }
        }

        render(&controller.snapshot());
    }

    Ok(())
}
