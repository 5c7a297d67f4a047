//! Virtual Gallery UI Layer
//!
//! Provides:
//! - egui-based gallery components
//! - wgpu rendering pipeline
//! - Input handling
//! - Texture cache for decoded assets

pub mod components;
pub mod input;
pub mod renderer;
pub mod textures;
pub mod theme;

pub use components::{GalleryAction, GalleryScreen};
pub use input::InputHandler;
pub use renderer::Renderer;
pub use textures::TextureCache;
pub use theme::Theme;
