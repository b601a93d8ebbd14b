//! Chat interaction controller
//!
//! This module provides the orchestrator that:
//! - Owns the conversation log and the composed-message buffer
//! - Keeps spoken and typed input from racing on the same buffer
//! - Gates submits on the dispatcher's state
//! - Reads replies aloud when speech output is enabled
//! - Releases capture and playback on disposal
//!
//! `spawn_controller` runs it as a single-owner event loop.

mod controller;
mod event;
mod runtime;
mod snapshot;

pub use controller::{ChatInteractionController, ControllerConfig};
pub use event::{ControllerEvent, EventSink, UserCommand};
pub use runtime::{spawn_controller, CommandReply, ControllerHandle};
pub use snapshot::{ControllerSnapshot, InteractionPhase};
