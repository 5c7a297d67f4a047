//! Virtual Gallery Core Domain Logic
//!
//! This crate contains:
//! - The gallery catalog (ordered, immutable item collection)
//! - Gallery controller and its view state
//! - Command vocabulary and keyboard binding
//! - Configuration
//! - Error types
//! - Localisation
//! - Asset resolution and decoding

pub mod assets;
pub mod catalog;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod i18n;
pub mod keyboard;
pub mod timer;

pub use assets::{decode_image, is_supported_image, AssetKind, AssetLoader, AssetResolver, DecodedImage, LoadedAsset};
pub use catalog::{Catalog, GalleryItem, ImageRef, ItemId, ItemInfo};
pub use command::{Command, CommandId, GalleryCommand};
pub use config::{AppConfig, GalleryConfig, GeneralConfig};
pub use controller::{GalleryController, GalleryView, GalleryViewState, DEFAULT_FLIP_DELAY};
pub use error::AppError;
pub use i18n::I18n;
pub use keyboard::{BindingGuard, KeyDisposition, KeyRouter, KeyboardBinding};
pub use timer::OneShotTimer;
