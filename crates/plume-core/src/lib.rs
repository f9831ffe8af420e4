//! # Plume Core
//!
//! The data types shared between a bot host and the plugins it loads:
//!
//! - **Event model**: [`MessageEvent`], [`NoticeEvent`], [`RequestEvent`], the
//!   tagged [`Event`] and its [`EventCategory`]
//! - **Host API**: the [`Api`] trait handlers use to act on events
//! - **CQ codes**: string message helpers in [`cq`]
//!
//! Registration and dispatch live in `plume-framework`.

pub mod api;
pub mod cq;
pub mod error;
pub mod event;

pub use api::{Api, Target};
pub use error::{ApiError, ApiResult, EventError, EventResult};
pub use event::{
    Event, EventCategory, MessageEvent, MessageType, NoticeEvent, RequestEvent, RequestType,
    Sender, UserEvent,
};
