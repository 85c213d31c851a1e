//! Name-addressed client for the Dynatrace configuration API
//!
//! The remote API only addresses objects by id. Every operation here takes a
//! human-readable name instead and resolves it to an id by listing the whole
//! family and scanning for an exact match. Nothing is cached between calls.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::descriptor::{Api, UpsertStrategy};
use super::error::{SyncError, SyncResult};
use super::extension;
use super::models::{DynatraceEntity, Value, parse_values};
use super::transport::{HttpTransport, TransportResponse};
use crate::config::ClientConfig;

/// Basic CRUD on any supported configuration API, addressed by name.
///
/// Implementations hide the per-family inconsistencies (list envelopes,
/// extension uploads) behind one interface.
#[async_trait]
pub trait DynatraceClient: Send + Sync {
    /// All `(id, name)` summaries of a family.
    ///
    /// `GET <environment-url>/api/config/v1/alertingProfiles`
    async fn list(&self, api: &Api) -> SyncResult<Vec<Value>>;

    /// Id of the first object named exactly `name`, in list order
    async fn resolve(&self, api: &Api, name: &str) -> SyncResult<Option<String>>;

    /// `(true, id)` when an object with that name exists, `(false, "")` otherwise
    async fn exists_by_name(&self, api: &Api, name: &str) -> SyncResult<(bool, String)>;

    /// Body of the object named `name`; [`SyncError::NotFound`] when absent
    async fn read_by_name(&self, api: &Api, name: &str) -> SyncResult<Vec<u8>>;

    /// `GET <collection>/<id>`
    async fn read_by_id(&self, api: &Api, id: &str) -> SyncResult<Vec<u8>>;

    /// Create the object if no object of that name exists, replace it otherwise.
    ///
    /// ```text
    /// GET  <collection>        resolve the name
    /// POST <collection>        when absent
    /// PUT  <collection>/<id>   when present
    /// ```
    async fn upsert_by_name(&self, api: &Api, name: &str, body: &str)
    -> SyncResult<DynatraceEntity>;

    /// Delete the object named `name`. Deleting an absent name succeeds.
    async fn delete_by_name(&self, api: &Api, name: &str) -> SyncResult<()>;
}

/// [`DynatraceClient`] talking to one environment over HTTP
#[derive(Debug, Clone)]
pub struct RestClient {
    environment_url: String,
    transport: HttpTransport,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> SyncResult<Self> {
        let transport = HttpTransport::new(
            &config.token,
            config.timeout,
            &config.user_agent,
            config.request_logging,
        )?;
        Ok(Self::with_transport(config.environment_url.clone(), transport))
    }

    pub fn with_transport(environment_url: impl Into<String>, transport: HttpTransport) -> Self {
        RestClient {
            environment_url: environment_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    fn collection_url(&self, api: &Api) -> String {
        api.url_from_environment_url(&self.environment_url)
    }

    fn object_url(&self, api: &Api, id: &str) -> String {
        format!("{}/{}", self.collection_url(api), urlencoding::encode(id))
    }

    async fn create(&self, api: &Api, name: &str, body: &str) -> SyncResult<DynatraceEntity> {
        let url = self.collection_url(api);
        let response = self.transport.post_json(&url, body).await?.error_for_status()?;

        let mut entity = decode_entity(&response)?;
        if entity.name.is_empty() {
            entity.name = name.to_string();
        }

        info!("Created {} '{}' with id {}", api.id(), name, entity.id);
        Ok(entity)
    }

    async fn update(
        &self,
        api: &Api,
        name: &str,
        id: &str,
        body: &str,
    ) -> SyncResult<DynatraceEntity> {
        let url = self.object_url(api, id);
        let response = self.transport.put_json(&url, body).await?.error_for_status()?;

        // Most families answer 204; keep whatever id the server echoes otherwise
        let id = serde_json::from_slice::<DynatraceEntity>(&response.body)
            .map(|entity| entity.id)
            .unwrap_or_else(|_| id.to_string());

        info!("Updated {} '{}' ({})", api.id(), name, id);
        Ok(DynatraceEntity::new(id, name))
    }
}

fn decode_entity(response: &TransportResponse) -> SyncResult<DynatraceEntity> {
    serde_json::from_slice(&response.body).map_err(|source| SyncError::MalformedResponse {
        url: response.url.clone(),
        source,
    })
}

/// First value named exactly `name`
pub fn find_by_name<'a>(values: &'a [Value], name: &str) -> Option<&'a Value> {
    let mut matches = values.iter().filter(|v| v.name == name);
    let first = matches.next()?;

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            "Found {} objects named '{}', using the first one ({})",
            duplicates + 1,
            name,
            first.id
        );
    }
    Some(first)
}

#[async_trait]
impl DynatraceClient for RestClient {
    async fn list(&self, api: &Api) -> SyncResult<Vec<Value>> {
        let url = self.collection_url(api);
        let response = self.transport.get(&url).await?.error_for_status()?;

        let values = parse_values(&response.body, api.list_shape())
            .map_err(|source| SyncError::MalformedResponse { url, source })?;

        debug!("Listed {} {} objects", values.len(), api.id());
        Ok(values)
    }

    async fn resolve(&self, api: &Api, name: &str) -> SyncResult<Option<String>> {
        let values = self.list(api).await?;
        let id = find_by_name(&values, name).map(|v| v.id.clone());

        debug!("Resolved {} '{}' -> {:?}", api.id(), name, id);
        Ok(id)
    }

    async fn exists_by_name(&self, api: &Api, name: &str) -> SyncResult<(bool, String)> {
        Ok(match self.resolve(api, name).await? {
            Some(id) => (true, id),
            None => (false, String::new()),
        })
    }

    async fn read_by_name(&self, api: &Api, name: &str) -> SyncResult<Vec<u8>> {
        let id = self
            .resolve(api, name)
            .await?
            .ok_or_else(|| SyncError::NotFound {
                api: api.id().to_string(),
                name: name.to_string(),
            })?;

        self.read_by_id(api, &id).await
    }

    async fn read_by_id(&self, api: &Api, id: &str) -> SyncResult<Vec<u8>> {
        let url = self.object_url(api, id);
        let response = self.transport.get(&url).await?.error_for_status()?;
        Ok(response.body)
    }

    async fn upsert_by_name(
        &self,
        api: &Api,
        name: &str,
        body: &str,
    ) -> SyncResult<DynatraceEntity> {
        match api.upsert_strategy() {
            UpsertStrategy::ExtensionUpload => {
                let url = self.collection_url(api);
                extension::upload_extension(&self.transport, &url, name, body).await
            }
            UpsertStrategy::StandardJson => match self.resolve(api, name).await? {
                Some(id) => self.update(api, name, &id, body).await,
                None => self.create(api, name, body).await,
            },
        }
    }

    async fn delete_by_name(&self, api: &Api, name: &str) -> SyncResult<()> {
        let Some(id) = self.resolve(api, name).await? else {
            debug!("No {} named '{}', nothing to delete", api.id(), name);
            return Ok(());
        };

        let url = self.object_url(api, &id);
        self.transport.delete(&url).await?.error_for_status()?;

        info!("Deleted {} '{}' ({})", api.id(), name, id);
        Ok(())
    }
}
