use super::{DataError, Repository};
use crate::shared::config::AppConfig;
use crate::system::auth::storage;
use async_trait::async_trait;
use contracts::domain::a001_producer::{NewProducer, Producer, ProducerPatch};
use contracts::domain::a002_entry::{Entry, EntryPatch, NewEntry};
use contracts::domain::a003_municipality::Municipality;
use contracts::domain::a004_color::Color;
use contracts::domain::a005_community::Community;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::system::users::{UserAccount, UserAccountPatch};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// PostgREST client. Reads the session token from `localStorage` on every
/// request so a fresh login is picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct BaasClient {
    config: AppConfig,
}

impl BaasClient {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session token when logged in, public key otherwise
    fn bearer(&self) -> String {
        storage::get_access_token()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &format!("Bearer {}", self.bearer()))
    }

    async fn fetch_table<T>(&self) -> Result<Vec<T>, DataError>
    where
        T: AggregateRoot + DeserializeOwned,
    {
        let url = format!("{}?select=*", self.config.rest_url(T::collection_name()));
        log::debug!("GET {}", url);

        let response = self
            .authorized(Request::get(&url))
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;
        let body = read_body(&url, response).await?;

        serde_json::from_str::<Vec<T>>(&body).map_err(|e| {
            log::error!("decode {} failed: {}", T::collection_name(), e);
            DataError::Decode(format!("{}: {}", T::collection_name(), e))
        })
    }

    async fn patch_row<T, P>(&self, id: &T::Id, patch: &P) -> Result<(), DataError>
    where
        T: AggregateRoot,
        P: Serialize,
    {
        let url = format!(
            "{}?id={}",
            self.config.rest_url(T::collection_name()),
            urlencoding::encode(&id.eq_filter())
        );
        log::debug!("PATCH {}", url);

        let request = self
            .authorized(Request::patch(&url))
            .header("Prefer", "return=minimal")
            .json(patch)
            .map_err(|e| DataError::Decode(format!("serialize patch: {}", e)))?;
        let response = request.send().await.map_err(|e| network_error(&url, e))?;
        read_body(&url, response).await.map(|_| ())
    }

    async fn insert_row<T, R>(&self, row: &R) -> Result<(), DataError>
    where
        T: AggregateRoot,
        R: Serialize,
    {
        let url = self.config.rest_url(T::collection_name());
        log::debug!("POST {}", url);

        let request = self
            .authorized(Request::post(&url))
            .header("Prefer", "return=minimal")
            .json(row)
            .map_err(|e| DataError::Decode(format!("serialize row: {}", e)))?;
        let response = request.send().await.map_err(|e| network_error(&url, e))?;
        read_body(&url, response).await.map(|_| ())
    }
}

fn network_error(url: &str, e: gloo_net::Error) -> DataError {
    log::error!("request {} failed: {}", url, e);
    DataError::Network(e.to_string())
}

/// Body of a 2xx response, or the mapped error for anything else
pub(crate) async fn read_body(url: &str, response: Response) -> Result<String, DataError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| DataError::Network(e.to_string()))?;

    if response_ok(status) {
        Ok(body)
    } else {
        log::error!("{} answered {}: {}", url, status, body);
        Err(DataError::from_status(status, &body))
    }
}

fn response_ok(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait(?Send)]
impl Repository for BaasClient {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, DataError> {
        self.fetch_table::<Producer>().await
    }

    async fn fetch_entries(&self) -> Result<Vec<Entry>, DataError> {
        self.fetch_table::<Entry>().await
    }

    async fn fetch_municipalities(&self) -> Result<Vec<Municipality>, DataError> {
        self.fetch_table::<Municipality>().await
    }

    async fn fetch_colors(&self) -> Result<Vec<Color>, DataError> {
        self.fetch_table::<Color>().await
    }

    async fn fetch_communities(&self) -> Result<Vec<Community>, DataError> {
        self.fetch_table::<Community>().await
    }

    async fn fetch_users(&self) -> Result<Vec<UserAccount>, DataError> {
        self.fetch_table::<UserAccount>().await
    }

    async fn update_producer(&self, id: i64, patch: &ProducerPatch) -> Result<(), DataError> {
        self.patch_row::<Producer, _>(&id, patch).await
    }

    async fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<(), DataError> {
        self.patch_row::<Entry, _>(&id, patch).await
    }

    async fn update_user(&self, id: Uuid, patch: &UserAccountPatch) -> Result<(), DataError> {
        self.patch_row::<UserAccount, _>(&id, patch).await
    }

    async fn insert_producer(&self, row: &NewProducer) -> Result<(), DataError> {
        self.insert_row::<Producer, _>(row).await
    }

    async fn insert_entry(&self, row: &NewEntry) -> Result<(), DataError> {
        self.insert_row::<Entry, _>(row).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok() {
        assert!(response_ok(200));
        assert!(response_ok(204));
        assert!(!response_ok(301));
        assert!(!response_ok(404));
    }
}
