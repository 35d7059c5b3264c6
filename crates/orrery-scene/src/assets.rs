//! Asset resolution seam and surface materials.
//!
//! The scene never loads images itself. It asks an [`AssetResolver`] for a
//! named image; a `Pending` answer binds a flat-colored placeholder that is
//! swapped for the real texture once the image arrives.

use std::collections::HashMap;
use std::sync::Arc;

/// Errors reported by asset resolvers.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The named asset is not available yet (or at all). Recoverable: the
    /// body renders with a placeholder until the asset is bound.
    #[error("asset `{name}` unresolved")]
    AssetUnresolved { name: String },

    /// The asset exists but could not be decoded.
    #[error("asset `{name}` could not be decoded: {reason}")]
    Decode { name: String, reason: String },

    /// Image dimensions and texel data disagree.
    #[error("image data size ({actual}) does not match {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        width: u32,
        height: u32,
    },
}

/// A decoded RGB image in linear color space.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    texels: Vec<[f32; 3]>,
}

/// Shared, immutable image.
pub type ImageHandle = Arc<Image>;

impl Image {
    /// Create an image from row-major texels.
    pub fn new(width: u32, height: u32, texels: Vec<[f32; 3]>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 || texels.len() != (width as usize) * (height as usize) {
            return Err(AssetError::DataSizeMismatch {
                actual: texels.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// A single-color image.
    pub fn solid(color: [f32; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-texel lookup. `u` wraps around, `v` clamps.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 3] {
        let u = u.rem_euclid(1.0);
        let v = v.clamp(0.0, 1.0);
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.texels[(y * self.width + x) as usize]
    }
}

/// Outcome of an asset lookup.
#[derive(Clone, Debug)]
pub enum AssetState {
    /// The image is decoded and ready to bind.
    Ready(ImageHandle),
    /// The image is still loading (or missing); bind a placeholder.
    Pending,
}

/// Resolves named images for body surfaces.
pub trait AssetResolver {
    /// Look up an image by name. Must not block.
    fn resolve(&mut self, name: &str) -> AssetState;
}

/// Surface material bound to a scene node.
#[derive(Clone, Debug)]
pub enum Material {
    /// No texture requested; shade with the descriptor color.
    Flat { color: [f32; 3] },
    /// Texture requested but not yet available.
    Placeholder { asset: String, color: [f32; 3] },
    /// Texture bound.
    Textured { asset: String, image: ImageHandle },
}

impl Material {
    /// Surface albedo at the given spherical texture coordinate.
    pub fn albedo(&self, u: f32, v: f32) -> [f32; 3] {
        match self {
            Material::Flat { color } | Material::Placeholder { color, .. } => *color,
            Material::Textured { image, .. } => image.sample(u, v),
        }
    }

    /// Name of the asset still awaited, if any.
    pub fn pending_asset(&self) -> Option<&str> {
        match self {
            Material::Placeholder { asset, .. } => Some(asset),
            _ => None,
        }
    }

    /// Whether a texture is bound.
    pub fn is_textured(&self) -> bool {
        matches!(self, Material::Textured { .. })
    }
}

/// In-memory resolver: images registered by name, anything else is pending.
#[derive(Default)]
pub struct MemoryAssetResolver {
    images: HashMap<String, ImageHandle>,
}

impl MemoryAssetResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under a name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, image: Image) -> ImageHandle {
        let handle = Arc::new(image);
        self.images.insert(name.into(), Arc::clone(&handle));
        handle
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if no images are registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetResolver for MemoryAssetResolver {
    fn resolve(&mut self, name: &str) -> AssetState {
        match self.images.get(name) {
            Some(handle) => AssetState::Ready(Arc::clone(handle)),
            None => AssetState::Pending,
        }
    }
}
