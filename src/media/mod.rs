// SPDX-License-Identifier: MPL-2.0
//! Image data received from the planning server.

pub mod image;

pub use image::{DecodedImage, ImageHandle, WeakImageHandle};
