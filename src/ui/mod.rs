// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! owns its state, handles its messages and reports effects the
//! application turns into further tasks.
//!
//! - [`viewer`] - server-rendered view with view selector and refresh
//! - [`positioning`] - point registration status and positioning error
//! - [`notifications`] - toast notifications for short notices
//! - [`design_tokens`] - design system constants (colors, spacing, sizing)

pub mod design_tokens;
pub mod notifications;
pub mod positioning;
pub mod viewer;
