//! Blocking client for the Pet Friends REST API.
//!
//! # Overview
//! Two layers share one crate. `PetFriendsClient` builds `HttpRequest` values
//! and normalizes `HttpResponse` values without touching the network
//! (host-does-IO pattern). `PetFriends` is the blocking facade that runs those
//! requests through a `ureq` agent and hands back `(status, body)` pairs.
//!
//! # Design
//! - Every operation returns an `ApiResponse`: the raw status code plus a
//!   `ResponseBody` that is parsed JSON when the payload parses, raw text
//!   otherwise. Status codes are never interpreted.
//! - Pet records stay server-side `serde_json::Value`s; input DTOs only carry
//!   forwarded field values.
//! - Transport and file errors surface unchanged through `ClientError`.

pub mod body;
pub mod client;
pub mod error;
pub mod facade;
pub mod http;
pub mod types;

pub use body::{ApiResponse, ResponseBody};
pub use client::PetFriendsClient;
pub use error::ClientError;
pub use facade::{PetFriends, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, MultipartBody, RequestBody};
pub use types::{Credentials, NewPet, PetPhoto, PetUpdate};
