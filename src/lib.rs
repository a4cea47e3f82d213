//! # bsh-engine - a typed client SDK for the BSH platform
//!
//! `bsh-engine` wraps the BSH HTTP APIs (entities, auth, users, settings, caching,
//! images, mailing, api keys, plugins and status) behind typed services. Every
//! service goes through one request client that signs requests, delegates to a
//! pluggable transport, and normalizes every answer into the platform's response
//! envelope or a typed error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bsh_engine::{BshEngine, Callbacks, Credential};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewProduct {
//!     name: String,
//!     price: f64,
//! }
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bsh_engine::Error> {
//!     let engine = BshEngine::builder()
//!         .host("https://api.example.com")
//!         .auth(|| async { Some(Credential::jwt("access-token")) })
//!         .build();
//!
//!     let products = engine.entities("Product")?;
//!
//!     // Without callbacks the envelope is returned...
//!     let lamp = NewProduct { name: "Lamp".into(), price: 19.9 };
//!     let created = products.create::<Product, _>(&lamp, Callbacks::none()).await?;
//!     if let Some(product) = created.into_value().and_then(|r| r.into_first()) {
//!         println!("Created {} with id {}", product.name, product.id);
//!     }
//!
//!     // ...with callbacks it is handed over and the call yields `Outcome::Consumed`.
//!     products
//!         .find_by_id::<Product>(
//!             1,
//!             Callbacks::none()
//!                 .on_success(|r| println!("found {} product(s)", r.data.len()))
//!                 .on_error(|e| eprintln!("lookup failed: {}", e)),
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Callback or return
//!
//! Each call does exactly one of two things with its result:
//!
//! - If the matching callback (`on_success`, `on_download`, `on_error`) was
//!   registered in [`Callbacks`], it is invoked once and the call resolves to
//!   [`Outcome::Consumed`].
//! - Otherwise the value is returned as [`Outcome::Value`], or the HTTP failure is
//!   returned as `Err(Error::Api(..))`.
//!
//! Transport failures (connection refused, DNS, timeouts) never reach `on_error`;
//! they are returned as-is.
//!
//! ## Error Handling
//!
//! ```no_run
//! use bsh_engine::{BshEngine, Callbacks, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let engine = BshEngine::builder().host("https://api.example.com").build();
//! match engine.users()?.me::<serde_json::Value>(Callbacks::none()).await {
//!     Ok(outcome) => println!("Me: {:?}", outcome.into_value()),
//!     Err(e) if e.is_unauthorized() => eprintln!("Token expired, refresh and retry"),
//!     Err(Error::Api(err)) => {
//!         eprintln!("HTTP error {} at {}", err.status, err.endpoint);
//!         for validation in err.response.iter().flat_map(|r| r.validations.iter().flatten()) {
//!             eprintln!("  {}: {}", validation.field, validation.error);
//!         }
//!     }
//!     Err(e) => eprintln!("Request never completed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` per request and response, `warn` on
//! HTTP failures, `error` on undecodable envelopes) and never installs a subscriber.

mod auth;
mod client;
mod engine;
mod error;
mod interceptor;
mod request;
mod response;
pub mod services;
mod transport;

pub use auth::{AuthProvider, AuthType, Credential, RefreshTokenProvider, API_KEY_HEADER};
pub use client::{BshClient, BshClientBuilder};
pub use engine::{BshEngine, BshEngineBuilder};
pub use error::{ApiError, Error, Result};
pub use interceptor::{RequestInterceptor, ResponseInterceptor};
pub use request::{with_query, BshRequest, Callbacks, FormData, FormPart, RequestBody};
pub use response::{is_ok, Blob, BshResponse, Outcome, ResponseMeta, Validation};
pub use services::{
    ApiKeyService, AuthService, AuthTokens, BshSearch, CachingService, ChangePasswordRequest,
    EntityService, ExportFormat, Filter, FilterOperator, ImageService, LoginRequest, Mail,
    MailingService, Pagination, PluginService, SettingsService, Sort, SortDirection,
    StatusService, UserService,
};
pub use transport::{
    ReqwestTransport, ReqwestTransportBuilder, Transport, TransportBody, TransportRequest,
    TransportResponse,
};
