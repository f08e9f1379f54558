//! # Request and Response Envelopes
//!
//! This crate defines the messages exchanged between callers and the
//! directory service.
//!
//! ## Philosophy
//!
//! - **Messages, not shared state**: A request carries everything it needs,
//!   including the caller's authorization context
//! - **Typed, not stringly-typed**: The `module`/`action` pair is parsed once
//!   into a closed [`Request`] enum; everything past the parser matches on it
//! - **Traceable**: Every response carries the id of the request it answers
//!
//! ## Wire format
//!
//! Success: `{id, status, data?}`. Failure: `{id, status, errorCode,
//! description}`. Field names are camelCase.

pub mod message;
pub mod typed;

pub use message::{RequestEnvelope, Response, ResponseBody, Status};
pub use typed::{
    AuthAction, ClientStatsAction, Module, NfsAction, Request, RouteError, ACTION_NOT_FOUND,
    MODULE_NOT_FOUND,
};
