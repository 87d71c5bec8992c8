// SPDX-License-Identifier: MPL-2.0
//! Server-rendered view display: view selector, refresh button and the
//! image area driven by the fetch lifecycle.

pub mod component;

pub use component::{Display, Effect, Message, RefusedAction, State};
