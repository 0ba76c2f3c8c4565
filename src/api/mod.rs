//! Client side of the work-items service
//!
//! Token acquisition, the HTTP test client, endpoint builders and the wire
//! models shared by the scenarios.

pub mod auth;
pub mod client;
pub mod constants;
pub mod logging;
pub mod models;

pub use auth::TokenProvider;
pub use client::{ApiResponse, HttpTestClient, RequestBody, RequestOptions};
pub use logging::{RequestContext, RequestLogger};
pub use models::{Credentials, ErrorEnvelope, NewTag, Tag, TagEventData, TagEventRequest, Token};
