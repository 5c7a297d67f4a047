//! UI Components

pub mod controls;
pub mod frame;
pub mod gallery_screen;
pub mod header;
pub mod story_panel;
pub mod thumbnail_strip;

pub use controls::{ControlRow, NavButtons};
pub use frame::ItemFrame;
pub use gallery_screen::{GalleryAction, GalleryScreen};
pub use header::Header;
pub use story_panel::StoryPanel;
pub use thumbnail_strip::ThumbnailStrip;
