//! Domain services: one per API area, each a thin path builder over [`BshClient`].
//!
//! Services never normalize responses themselves. They pick the verb, build the
//! path, tag the request with an operation id, and delegate to the client, so the
//! callback-or-return contract of [`BshClient`] holds for every method here.
//!
//! [`BshClient`]: crate::BshClient

mod api_keys;
mod auth;
mod caching;
mod entities;
mod images;
mod mailing;
mod plugins;
mod search;
mod settings;
mod status;
mod users;

pub use api_keys::ApiKeyService;
pub use auth::{AuthService, AuthTokens, LoginRequest};
pub use caching::CachingService;
pub use entities::{EntityService, ExportFormat};
pub use images::ImageService;
pub use mailing::{Mail, MailingService};
pub use plugins::PluginService;
pub use search::{BshSearch, Filter, FilterOperator, Pagination, Sort, SortDirection};
pub use settings::SettingsService;
pub use status::StatusService;
pub use users::{ChangePasswordRequest, UserService};

use crate::request::{with_query, BshRequest};

/// Query parameters a service appends to every path it builds.
pub(crate) type Params = Vec<(String, String)>;

pub(crate) fn collect_params<I, K, V>(params: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    params.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// A request for `path` plus `params`, tagged with the operation id `api`.
pub(crate) fn tagged(
    path: impl AsRef<str>,
    api: impl Into<String>,
    params: &[(String, String)],
) -> BshRequest {
    BshRequest::new(with_query(path.as_ref(), params.iter().map(|(k, v)| (k, v)))).with_api(api)
}
