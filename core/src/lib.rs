//! Typed JSON fetching for TheMealDB.
//!
//! # Overview
//! A request is built as plain data (`HttpRequest`), executed by a
//! `Transport`, and the `HttpResponse` body is decoded into domain values.
//! `LiveTransport` does real I/O; `MockTransport` replays recorded replies,
//! so everything above the transport runs the same way offline.
//!
//! # Design
//! - `MealDbClient` is stateless. Operations take `&self` and can run in
//!   parallel from several threads.
//! - Each operation is split into `build_*` (produces request), `parse_*`
//!   (consumes response) and `fetch_*` (both, via the transport).
//! - Decoding goes through the `Decode` trait, whose `target()` names the
//!   JSON shape a type expects: keyed, unkeyed, single value or
//!   dynamic-keyed. Dynamic-keyed families such as `strIngredient1..N` are
//!   ordered by `resolver::resolve_keys`.
//! - No retries unless a `RetryPolicy` is attached.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod resolver;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::MealDbClient;
pub use config::ClientConfig;
pub use decode::{decode_slice, Decode, DecodeTarget, DynamicKeys, KeyedContainer};
pub use error::{ConfigError, DecodeError, FetchError, TransportError};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, RequestBuilder};
pub use resolver::{resolve_keys, KeyPattern, ResolvedKey};
pub use retry::RetryPolicy;
pub use transport::{LiveTransport, MockTransport, Transport};
pub use types::{Category, Ingredient, Meal, MealSummary};
