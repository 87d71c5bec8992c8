// SPDX-License-Identifier: MPL-2.0
//! `orthoview` is a desktop client for an orthopedic operation plan server,
//! built with the Iced GUI framework.
//!
//! It shows server-rendered views of the operation plan scene and of the
//! pre-operative bone positioning, the registration status of the
//! positioning points and the positioning error. All geometry is computed
//! by the server; the client fetches, decodes and displays.

pub mod api;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod i18n;
pub mod media;
pub mod session;
pub mod ui;

#[cfg(test)]
mod test_utils;
