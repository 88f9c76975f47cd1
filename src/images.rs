// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Local image storage and reference resolution.
//!
//! References stored on documents are either plain remote URLs or strings
//! with the `local:` prefix naming a file inside the app-private image root.
//! Written images are downscaled to a kind-specific bound and re-encoded as
//! JPEG before hitting disk.

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Prefix distinguishing local references from remote URLs.
pub const LOCAL_PREFIX: &str = "local:";

const JPEG_QUALITY: u8 = 80;
const PROFILE_IMAGE_SIZE: u32 = 300;
const POST_IMAGE_SIZE: u32 = 1080;

/// What an image is for; decides directory and maximum dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Profile,
    Post,
    Message,
    BoardSnapshot,
}

impl ImageKind {
    fn dir(self) -> &'static str {
        match self {
            ImageKind::Profile => "profile_images",
            ImageKind::Post => "post_images",
            ImageKind::Message => "message_images",
            ImageKind::BoardSnapshot => "tactics_images",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            ImageKind::Profile => "profile_",
            ImageKind::Post => "post_",
            ImageKind::Message => "message_",
            ImageKind::BoardSnapshot => "tactics_",
        }
    }

    fn max_dimension(self) -> u32 {
        match self {
            ImageKind::Profile => PROFILE_IMAGE_SIZE,
            _ => POST_IMAGE_SIZE,
        }
    }
}

/// Outcome of resolving a stored reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    Local(PathBuf),
    Remote(String),
    Fallback,
}

pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Downscale, re-encode, and persist an image; returns the reference
    /// string to store on the owning document.
    pub async fn save(&self, kind: ImageKind, owner: &str, data: Vec<u8>) -> Result<String> {
        let max = kind.max_dimension();
        let encoded = tokio::task::spawn_blocking(move || process_image(&data, max))
            .await
            .map_err(Error::backend)??;

        let dir = self.root.join(kind.dir());
        fs::create_dir_all(&dir).await.map_err(Error::backend)?;

        let filename = format!("{}{}_{}.jpg", kind.file_prefix(), owner, Uuid::new_v4());
        let path = dir.join(&filename);
        fs::write(&path, encoded).await.map_err(Error::backend)?;
        debug!(path = %path.display(), "image saved");

        Ok(format!("{}{}/{}", LOCAL_PREFIX, kind.dir(), filename))
    }

    /// Turn a stored reference into something loadable. Unresolvable input
    /// (missing file, traversal attempt, unknown scheme) yields `Fallback`.
    pub fn resolve(&self, reference: &str) -> ResolvedImage {
        if let Some(rel) = reference.strip_prefix(LOCAL_PREFIX) {
            match self.local_path(rel) {
                Some(path) if path.is_file() => ResolvedImage::Local(path),
                _ => ResolvedImage::Fallback,
            }
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            ResolvedImage::Remote(reference.to_string())
        } else {
            ResolvedImage::Fallback
        }
    }

    /// Remove the underlying file for a local reference. Remote references
    /// and already-missing files report `false` rather than failing.
    pub async fn delete(&self, reference: &str) -> Result<bool> {
        let Some(rel) = reference.strip_prefix(LOCAL_PREFIX) else {
            return Ok(false);
        };
        let Some(path) = self.local_path(rel) else {
            return Ok(false);
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::backend(err)),
        }
    }

    /// Join a relative reference onto the root, refusing anything that
    /// would escape it.
    fn local_path(&self, rel: &str) -> Option<PathBuf> {
        let rel = Path::new(rel);
        let safe = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if safe {
            Some(self.root.join(rel))
        } else {
            None
        }
    }
}

/// Decode, downscale to fit `max` on the longer side (never upscale), and
/// encode as JPEG.
fn process_image(data: &[u8], max: u32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| Error::Validation(format!("unreadable image: {e}")))?;

    let img = if img.width() > max || img.height() > max {
        img.resize(max, max, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .map_err(Error::backend)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn temp_store() -> ImageStore {
        let root = std::env::temp_dir().join(format!("hc-image-test-{}", Uuid::new_v4()));
        ImageStore::new(root)
    }

    #[tokio::test]
    async fn save_resolve_delete_round_trip() {
        let store = temp_store();

        let reference = store
            .save(ImageKind::Profile, "acct1", png_bytes(64, 64))
            .await
            .unwrap();
        assert!(reference.starts_with("local:profile_images/profile_acct1_"));

        let resolved = store.resolve(&reference);
        let ResolvedImage::Local(path) = resolved else {
            panic!("expected local resolution, got {resolved:?}");
        };
        assert!(path.is_file());

        assert!(store.delete(&reference).await.unwrap());
        assert_eq!(store.resolve(&reference), ResolvedImage::Fallback);
        // Second delete is a no-op.
        assert!(!store.delete(&reference).await.unwrap());
    }

    #[tokio::test]
    async fn profile_images_are_bounded_to_300px() {
        let store = temp_store();
        let reference = store
            .save(ImageKind::Profile, "acct1", png_bytes(600, 300))
            .await
            .unwrap();

        let ResolvedImage::Local(path) = store.resolve(&reference) else {
            panic!("expected local resolution");
        };
        let written = image::open(path).unwrap();
        assert_eq!((written.width(), written.height()), (300, 150));
    }

    #[tokio::test]
    async fn small_images_are_not_upscaled() {
        let store = temp_store();
        let reference = store
            .save(ImageKind::Post, "p1", png_bytes(40, 20))
            .await
            .unwrap();

        let ResolvedImage::Local(path) = store.resolve(&reference) else {
            panic!("expected local resolution");
        };
        let written = image::open(path).unwrap();
        assert_eq!((written.width(), written.height()), (40, 20));
    }

    #[test]
    fn remote_urls_pass_through() {
        let store = temp_store();
        assert_eq!(
            store.resolve("https://example.com/a.jpg"),
            ResolvedImage::Remote("https://example.com/a.jpg".to_string())
        );
    }

    #[test]
    fn traversal_and_garbage_fall_back() {
        let store = temp_store();
        assert_eq!(store.resolve("local:../../etc/passwd"), ResolvedImage::Fallback);
        assert_eq!(store.resolve("ftp://example.com/a.jpg"), ResolvedImage::Fallback);
        assert_eq!(store.resolve(""), ResolvedImage::Fallback);
    }

    #[tokio::test]
    async fn non_image_payload_is_rejected_before_io() {
        let store = temp_store();
        let err = store
            .save(ImageKind::Post, "p1", b"not an image".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
