// SPDX-License-Identifier: MPL-2.0
//! Positioning review panel: point registration status and positioning
//! error evaluation.

mod state;
mod view;

pub use state::{Effect, Message, State};
pub use view::{view, world_cell};
