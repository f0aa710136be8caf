// src/wallpaper/mod.rs

pub mod clients;
pub mod config;
pub mod controller;
pub mod download;
pub mod event;
pub mod generation;
pub mod image_generation;

pub use controller::InteractionController;
pub use generation::GenerationService;
