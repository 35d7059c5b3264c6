//! Texture resolver backed by an image directory on disk.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use orrery_scene::{AssetError, AssetResolver, AssetState, Image, ImageHandle};
use tracing::{debug, info, warn};

/// Resolves texture names to image files under a root directory.
///
/// Missing files stay `Pending` and are looked up again on the next
/// request. Files that fail to decode are reported once and never retried.
pub struct DirectoryAssetResolver {
    root: PathBuf,
    loaded: HashMap<String, ImageHandle>,
    failed: HashSet<String>,
}

impl DirectoryAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of decoded images.
    pub fn loaded(&self) -> usize {
        self.loaded.len()
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        if path.extension().is_none() {
            path.with_extension("png")
        } else {
            path
        }
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode an image file into linear RGB texels.
pub fn load_image(name: &str, path: &Path) -> Result<Image, AssetError> {
    let rgb = image::open(path)
        .map_err(|e| AssetError::Decode {
            name: name.to_string(),
            reason: e.to_string(),
        })?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let texels = rgb
        .pixels()
        .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
        .collect();
    Image::new(width, height, texels)
}

impl AssetResolver for DirectoryAssetResolver {
    fn resolve(&mut self, name: &str) -> AssetState {
        if let Some(handle) = self.loaded.get(name) {
            return AssetState::Ready(Arc::clone(handle));
        }
        if self.failed.contains(name) {
            return AssetState::Pending;
        }

        let path = self.path_for(name);
        if !path.is_file() {
            debug!("Texture '{}' not found at {}", name, path.display());
            return AssetState::Pending;
        }

        match load_image(name, &path) {
            Ok(image) => {
                info!(
                    "Loaded texture '{}' ({}x{})",
                    name,
                    image.width(),
                    image.height()
                );
                let handle = Arc::new(image);
                self.loaded.insert(name.to_string(), Arc::clone(&handle));
                AssetState::Ready(handle)
            }
            Err(err) => {
                warn!("{err}");
                self.failed.insert(name.to_string());
                AssetState::Pending
            }
        }
    }
}
