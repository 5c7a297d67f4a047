//! Image asset resolution and background decoding
//!
//! Catalog image references are root-relative web paths ("/recovery/p1.png").
//! The resolver maps them under a configured asset root; the loader decodes
//! them off the UI thread and hands back RGBA pixels.

use crate::catalog::ImageRef;
use crate::AppError;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use image::{GenericImageView, ImageReader};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Largest edge uploaded for a full-size image
pub const FULL_MAX_DIM: u32 = 4096;

/// Maps image references to files under an asset root
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a reference to a file path. References may not leave the root.
    pub fn resolve(&self, image: &ImageRef) -> Result<PathBuf, AppError> {
        let relative = Path::new(image.as_str().trim_start_matches('/'));

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(AppError::AssetNotFound(image.to_string()));
        }

        if !is_supported_image(relative) {
            return Err(AppError::UnsupportedFormat(image.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

/// Which rendition of an asset is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Full,
    Thumbnail,
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Result of a background load
#[derive(Debug)]
pub struct LoadedAsset {
    pub image: ImageRef,
    pub kind: AssetKind,
    pub result: Result<DecodedImage, AppError>,
}

/// Decode an image file, downscaling so neither edge exceeds `max_dim`
pub fn decode_image(path: &Path, max_dim: Option<u32>) -> Result<DecodedImage, AppError> {
    if !path.exists() {
        return Err(AppError::AssetNotFound(path.display().to_string()));
    }

    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;

    let img = match max_dim {
        Some(max) => {
            let (w, h) = img.dimensions();
            if w > max || h > max {
                img.thumbnail(max, max)
            } else {
                img
            }
        }
        None => img,
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Check if a file is a supported image format
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp"
            )
        })
        .unwrap_or(false)
}

enum LoadRequest {
    One(ImageRef, AssetKind),
    Thumbnails(Vec<ImageRef>),
}

type WakeFn = Arc<dyn Fn() + Send + Sync>;

/// Background image loader.
///
/// Requests are queued to a worker thread; thumbnail batches fan out over
/// the rayon pool. Each finished asset is queued for [`AssetLoader::try_recv`]
/// and the wake callback is invoked so the host can redraw.
pub struct AssetLoader {
    request_tx: Sender<LoadRequest>,
    result_rx: Receiver<LoadedAsset>,
    pending: Mutex<HashSet<(ImageRef, AssetKind)>>,
}

impl AssetLoader {
    pub fn new(
        resolver: AssetResolver,
        thumbnail_size: u32,
        wake: impl Fn() + Send + Sync + 'static,
    ) -> Result<Self, AppError> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<LoadRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<LoadedAsset>();
        let wake: WakeFn = Arc::new(wake);

        std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                Self::worker(resolver, thumbnail_size, request_rx, result_tx, wake);
            })
            .map_err(|e| AppError::Init(format!("asset loader thread: {}", e)))?;

        Ok(Self {
            request_tx,
            result_rx,
            pending: Mutex::new(HashSet::new()),
        })
    }

    fn worker(
        resolver: AssetResolver,
        thumbnail_size: u32,
        request_rx: Receiver<LoadRequest>,
        result_tx: Sender<LoadedAsset>,
        wake: WakeFn,
    ) {
        let load = |image: &ImageRef, kind: AssetKind| {
            let max_dim = match kind {
                AssetKind::Full => FULL_MAX_DIM,
                AssetKind::Thumbnail => thumbnail_size,
            };
            let result = resolver
                .resolve(image)
                .and_then(|path| decode_image(&path, Some(max_dim)));

            if let Err(e) = &result {
                tracing::warn!("Failed to load {} ({:?}): {}", image, kind, e);
            }

            LoadedAsset {
                image: image.clone(),
                kind,
                result,
            }
        };

        let deliver = |asset: LoadedAsset| {
            if result_tx.send(asset).is_ok() {
                wake();
            }
        };

        while let Ok(request) = request_rx.recv() {
            match request {
                LoadRequest::One(image, kind) => {
                    tracing::debug!("Loading {} ({:?})", image, kind);
                    deliver(load(&image, kind));
                }
                LoadRequest::Thumbnails(images) => {
                    tracing::debug!("Generating {} thumbnails", images.len());
                    let assets: Vec<LoadedAsset> = images
                        .par_iter()
                        .map(|image| load(image, AssetKind::Thumbnail))
                        .collect();
                    for asset in assets {
                        deliver(asset);
                    }
                }
            }
        }

        tracing::debug!("Asset loader stopped");
    }

    /// Queue a load. Returns `false` if the same asset is already pending.
    pub fn request(&self, image: &ImageRef, kind: AssetKind) -> bool {
        if !self.pending.lock().insert((image.clone(), kind)) {
            return false;
        }

        self.send(LoadRequest::One(image.clone(), kind))
    }

    /// Queue thumbnails for several images in one batch
    pub fn request_thumbnails<'a>(&self, images: impl IntoIterator<Item = &'a ImageRef>) -> usize {
        let batch: Vec<ImageRef> = {
            let mut pending = self.pending.lock();
            images
                .into_iter()
                .filter(|image| pending.insert(((*image).clone(), AssetKind::Thumbnail)))
                .cloned()
                .collect()
        };

        let count = batch.len();
        if count > 0 && !self.send(LoadRequest::Thumbnails(batch)) {
            return 0;
        }
        count
    }

    fn send(&self, request: LoadRequest) -> bool {
        match self.request_tx.send(request) {
            Ok(()) => true,
            Err(_) => {
                tracing::error!("Asset loader channel closed");
                false
            }
        }
    }

    pub fn is_pending(&self, image: &ImageRef, kind: AssetKind) -> bool {
        self.pending.lock().contains(&(image.clone(), kind))
    }

    /// Take a finished asset, if any
    pub fn try_recv(&self) -> Option<LoadedAsset> {
        let asset = self.result_rx.try_recv().ok()?;
        self.settle(&asset);
        Some(asset)
    }

    /// Wait up to `timeout` for a finished asset
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadedAsset> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(asset) => {
                self.settle(&asset);
                Some(asset)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn settle(&self, asset: &LoadedAsset) {
        self.pending.lock().remove(&(asset.image.clone(), asset.kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn write_png(dir: &Path, relative: &str, width: u32, height: u32) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]))
            .save(&path)
            .unwrap();
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.PNG")));
        assert!(is_supported_image(Path::new("test.WebP")));
        assert!(!is_supported_image(Path::new("test.txt")));
        assert!(!is_supported_image(Path::new("test")));
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let resolver = AssetResolver::new("/srv/public");
        let path = resolver.resolve(&ImageRef::new("/recovery/p1.png")).unwrap();
        assert_eq!(path, PathBuf::from("/srv/public/recovery/p1.png"));
    }

    #[test]
    fn test_resolve_rejects_escapes_and_formats() {
        let resolver = AssetResolver::new("/srv/public");
        assert!(matches!(
            resolver.resolve(&ImageRef::new("/../etc/passwd.png")),
            Err(AppError::AssetNotFound(_))
        ));
        assert!(matches!(
            resolver.resolve(&ImageRef::new("/")),
            Err(AppError::AssetNotFound(_))
        ));
        assert!(matches!(
            resolver.resolve(&ImageRef::new("/notes/readme.txt")),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_decode_image_downscales() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "big.png", 400, 200);

        let full = decode_image(&dir.path().join("big.png"), None).unwrap();
        assert_eq!((full.width, full.height), (400, 200));
        assert_eq!(full.pixels.len(), 400 * 200 * 4);

        let thumb = decode_image(&dir.path().join("big.png"), Some(100)).unwrap();
        assert!(thumb.width <= 100 && thumb.height <= 100);
        assert_eq!(thumb.width, 100);
    }

    #[test]
    fn test_decode_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            decode_image(&dir.path().join("absent.png"), None),
            Err(AppError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_loader_delivers_and_wakes() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "recovery/a.png", 64, 48);

        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let loader = AssetLoader::new(AssetResolver::new(dir.path()), 32, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        let image = ImageRef::new("/recovery/a.png");
        assert!(loader.request(&image, AssetKind::Full));
        assert!(!loader.request(&image, AssetKind::Full));
        assert!(loader.is_pending(&image, AssetKind::Full));

        let asset = loader.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(asset.image, image);
        assert_eq!(asset.kind, AssetKind::Full);
        let decoded = asset.result.unwrap();
        assert_eq!((decoded.width, decoded.height), (64, 48));
        assert!(!loader.is_pending(&image, AssetKind::Full));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_thumbnail_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 80, 80);
        write_png(dir.path(), "b.png", 80, 40);

        let loader = AssetLoader::new(AssetResolver::new(dir.path()), 16, || {}).unwrap();
        let images = [ImageRef::new("/a.png"), ImageRef::new("/b.png"), ImageRef::new("/missing.png")];
        assert_eq!(loader.request_thumbnails(images.iter()), 3);
        assert_eq!(loader.request_thumbnails(images.iter()), 0);

        let mut ok = 0;
        let mut failed = 0;
        for _ in 0..images.len() {
            let asset = loader.recv_timeout(Duration::from_secs(10)).unwrap();
            assert_eq!(asset.kind, AssetKind::Thumbnail);
            match asset.result {
                Ok(decoded) => {
                    assert!(decoded.width <= 16 && decoded.height <= 16);
                    ok += 1;
                }
                Err(e) => {
                    assert!(e.is_recoverable());
                    failed += 1;
                }
            }
        }
        assert_eq!((ok, failed), (2, 1));
        assert!(loader.try_recv().is_none());
    }
}
