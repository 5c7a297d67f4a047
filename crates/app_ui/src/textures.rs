//! GPU textures for decoded gallery assets

use app_core::{AssetKind, ImageRef, LoadedAsset};
use egui::{ColorImage, TextureHandle, TextureOptions};
use std::collections::{HashMap, HashSet};

/// What the cache knows about an asset
#[derive(Clone, Copy)]
pub enum TextureState<'a> {
    Ready(&'a TextureHandle),
    Failed,
    Missing,
}

/// Texture handles keyed by image reference and rendition
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<(ImageRef, AssetKind), TextureHandle>,
    failed: HashSet<(ImageRef, AssetKind)>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload a finished load. Failures are remembered so they are not retried.
    pub fn insert(&mut self, ctx: &egui::Context, asset: LoadedAsset) {
        let key = (asset.image, asset.kind);

        match asset.result {
            Ok(decoded) => {
                let size = [decoded.width as usize, decoded.height as usize];
                let image = ColorImage::from_rgba_unmultiplied(size, &decoded.pixels);
                let name = format!("{}#{:?}", key.0, key.1);
                let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);

                self.failed.remove(&key);
                self.textures.insert(key, handle);
            }
            Err(_) => {
                self.textures.remove(&key);
                self.failed.insert(key);
            }
        }
    }

    pub fn state(&self, image: &ImageRef, kind: AssetKind) -> TextureState<'_> {
        let key = (image.clone(), kind);
        match self.textures.get(&key) {
            Some(handle) => TextureState::Ready(handle),
            None if self.failed.contains(&key) => TextureState::Failed,
            None => TextureState::Missing,
        }
    }

    pub fn get(&self, image: &ImageRef, kind: AssetKind) -> Option<&TextureHandle> {
        match self.state(image, kind) {
            TextureState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    /// Full-size texture if loaded, else the thumbnail as a stand-in
    pub fn best(&self, image: &ImageRef) -> Option<&TextureHandle> {
        self.get(image, AssetKind::Full)
            .or_else(|| self.get(image, AssetKind::Thumbnail))
    }

    /// Whether a load should be requested
    pub fn needs(&self, image: &ImageRef, kind: AssetKind) -> bool {
        matches!(self.state(image, kind), TextureState::Missing)
    }

    /// Drop full-size textures other than `keep`
    pub fn evict_full_except(&mut self, keep: &[&ImageRef]) {
        let before = self.textures.len();
        self.textures
            .retain(|(image, kind), _| *kind == AssetKind::Thumbnail || keep.contains(&image));

        let evicted = before - self.textures.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} full-size textures", evicted);
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{AppError, DecodedImage};

    fn decoded(image: &str, kind: AssetKind) -> LoadedAsset {
        LoadedAsset {
            image: ImageRef::new(image),
            kind,
            result: Ok(DecodedImage {
                width: 2,
                height: 2,
                pixels: vec![255; 16],
            }),
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new();
        let a = ImageRef::new("/a.png");

        assert!(cache.needs(&a, AssetKind::Thumbnail));
        cache.insert(&ctx, decoded("/a.png", AssetKind::Thumbnail));

        assert!(!cache.needs(&a, AssetKind::Thumbnail));
        assert!(cache.needs(&a, AssetKind::Full));
        assert!(cache.get(&a, AssetKind::Full).is_none());
        assert!(cache.best(&a).is_some());
        assert_eq!(cache.get(&a, AssetKind::Thumbnail).unwrap().size(), [2, 2]);
    }

    #[test]
    fn test_failures_not_retried() {
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new();
        let missing = ImageRef::new("/missing.png");

        cache.insert(
            &ctx,
            LoadedAsset {
                image: missing.clone(),
                kind: AssetKind::Full,
                result: Err(AppError::AssetNotFound("/missing.png".into())),
            },
        );

        assert!(matches!(cache.state(&missing, AssetKind::Full), TextureState::Failed));
        assert!(!cache.needs(&missing, AssetKind::Full));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evict_full_keeps_thumbnails() {
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new();
        for name in ["/a.png", "/b.png", "/c.png"] {
            cache.insert(&ctx, decoded(name, AssetKind::Full));
            cache.insert(&ctx, decoded(name, AssetKind::Thumbnail));
        }

        let b = ImageRef::new("/b.png");
        cache.evict_full_except(&[&b]);

        assert_eq!(cache.len(), 4);
        assert!(cache.get(&b, AssetKind::Full).is_some());
        assert!(cache.get(&ImageRef::new("/a.png"), AssetKind::Full).is_none());
        assert!(cache.get(&ImageRef::new("/a.png"), AssetKind::Thumbnail).is_some());
    }
}
