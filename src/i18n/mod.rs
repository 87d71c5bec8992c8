// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! UI strings are Fluent messages embedded from `assets/i18n/`. The locale
//! is resolved from the CLI, then the config file, then the OS, falling back
//! to `en-US`.
//!
//! Error messages shown in place of a view image are protocol-level strings
//! and are not translated.

pub mod fluent;

pub use fluent::I18n;

/// Message keys the UI looks up. Every bundle must define all of them.
pub const KEYS: &[&str] = &[
    "window-title",
    "screen-model",
    "screen-positioning",
    "plan-id-label",
    "plan-id-placeholder",
    "refresh-button",
    "viewer-loading",
    "viewer-empty",
    "notice-missing-plan-id",
    "notice-model-refresh-missing-plan-id",
    "notice-model-view-missing-plan-id",
    "notice-config-load-error",
    "status-events",
    "status-anonymous",
    "positioning-points-title",
    "positioning-error-title",
    "positioning-col-index",
    "positioning-col-type",
    "positioning-col-model",
    "positioning-col-world",
    "positioning-point-main",
    "positioning-point-prediction",
    "positioning-not-registered",
    "positioning-no-data",
    "positioning-not-calculated",
    "positioning-mean-error",
    "positioning-evaluate-button",
    "positioning-evaluating",
];
