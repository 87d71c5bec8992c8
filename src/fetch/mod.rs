// SPDX-License-Identifier: MPL-2.0
//! Remote image fetch lifecycle shared by both viewers.
//!
//! - [`request`]: plan id validation and the activation descriptor
//! - [`lifecycle`]: synchronous state machine owned by a viewer
//! - [`runner`]: the async request run inside an iced `Task`

pub mod lifecycle;
pub mod request;
pub mod runner;

pub use lifecycle::{Activation, ActivationId, FetchConfig, FetchLifecycle, FetchStatus};
pub use request::{FetchRequest, PlanId};
pub use runner::{fetch_view, run, Completion};
