use super::{collect_params, tagged, Params};
use crate::request::Callbacks;
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    /// Recipients.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
}

/// Transactional mail.
#[derive(Clone)]
pub struct MailingService {
    client: BshClient,
    params: Params,
}

impl MailingService {
    /// Creates the service.
    pub fn new(client: BshClient) -> Self {
        Self {
            client,
            params: Params::new(),
        }
    }

    /// Returns a copy of the service that appends `params` to every path.
    pub fn with_params<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            client: self.client.clone(),
            params: collect_params(params),
        }
    }

    /// `POST /api/mailing/send`
    pub async fn send<T, B>(
        &self,
        mail: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/mailing/send", "mailing.send", &self.params).with_json(mail)?;
        self.client.post(request, callbacks).await
    }
}
