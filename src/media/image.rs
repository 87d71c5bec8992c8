// SPDX-License-Identifier: MPL-2.0
//! Decoding of server-rendered views and ownership of the displayable handle.
//!
//! [`DecodedImage`] is plain pixel data. It is cheap to clone and travels
//! inside messages. [`ImageHandle`] is what the viewer displays. Exactly one
//! value owns it and it is released when dropped. [`WeakImageHandle`]
//! observes whether a handle is still alive without keeping it alive.

use crate::error::FetchError;
use iced::widget::image;
use image_rs::GenericImageView;
use std::fmt;
use std::sync::{Arc, Weak};

/// RGBA pixels decoded from a PNG/JPEG response body.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Stored in Arc to avoid expensive cloning.
    pixels: Arc<Vec<u8>>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl DecodedImage {
    /// Decodes an encoded image body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] when the bytes are not an image of a
    /// supported format.
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        let img = image_rs::load_from_memory(bytes)
            .map_err(|e| FetchError::Decode(format!("invalid image data ({e})")))?;
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(width, height, img.to_rgba8().into_vec()))
    }

    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    pub fn rgba_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

struct HandleInner {
    handle: image::Handle,
    width: u32,
    height: u32,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        log::trace!("released {}x{} view image", self.width, self.height);
    }
}

/// Displayable image owned by one fetch lifecycle. Not `Clone`.
pub struct ImageHandle {
    inner: Arc<HandleInner>,
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .finish()
    }
}

impl ImageHandle {
    #[must_use]
    pub fn new(decoded: &DecodedImage) -> Self {
        let handle = image::Handle::from_rgba(
            decoded.width,
            decoded.height,
            decoded.rgba_bytes().to_vec(),
        );
        Self {
            inner: Arc::new(HandleInner {
                handle,
                width: decoded.width,
                height: decoded.height,
            }),
        }
    }

    /// Handle given to the `image` widget.
    #[must_use]
    pub fn widget_handle(&self) -> image::Handle {
        self.inner.handle.clone()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakImageHandle {
        WeakImageHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning observer of an [`ImageHandle`].
#[derive(Clone)]
pub struct WeakImageHandle {
    inner: Weak<HandleInner>,
}

impl fmt::Debug for WeakImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakImageHandle")
            .field("live", &self.is_live())
            .finish()
    }
}

impl WeakImageHandle {
    /// Whether the owning handle has not been released yet.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
