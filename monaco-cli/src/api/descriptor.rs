//! Configuration API family descriptors
//!
//! An [`Api`] names one family of configuration objects (alerting profiles,
//! dashboards, extensions, ...) and knows where its collection endpoint lives
//! relative to an environment URL. It also records the two places where the
//! families disagree with each other: the shape of the list response and the
//! way objects are written.

use serde::Serialize;

/// Family identifier of the extension API, the only family that is not
/// written as plain JSON.
pub const EXTENSION_API_ID: &str = "extension";

/// How a family's list endpoint wraps its summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListShape {
    /// `{"<key>": [{"id": .., "name": ..}, ...]}`
    Keyed(String),
    /// `[{"id": .., "name": ..}, ...]`
    Array,
}

impl ListShape {
    pub fn keyed(key: impl Into<String>) -> Self {
        ListShape::Keyed(key.into())
    }
}

impl Default for ListShape {
    fn default() -> Self {
        ListShape::keyed("values")
    }
}

/// How objects of a family are created or updated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpsertStrategy {
    /// Resolve the name, then POST to the collection or PUT to `<collection>/<id>`
    StandardJson,
    /// Zip the payload and upload it as a multipart form, guarded by a version check
    ExtensionUpload,
}

impl UpsertStrategy {
    /// Pick the strategy for a family identifier.
    ///
    /// Families not listed here are written as plain JSON.
    pub fn for_family(api_id: &str) -> Self {
        match api_id {
            EXTENSION_API_ID => UpsertStrategy::ExtensionUpload,
            _ => UpsertStrategy::StandardJson,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpsertStrategy::StandardJson => "json",
            UpsertStrategy::ExtensionUpload => "extension-upload",
        }
    }
}

/// Descriptor of one configuration API family
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Api {
    id: String,
    url_path: String,
    list_shape: ListShape,
    strategy: UpsertStrategy,
}

impl Api {
    /// Create a descriptor whose list response uses the `values` envelope
    pub fn new(id: impl Into<String>, url_path: impl Into<String>) -> Self {
        Self::with_list_shape(id, url_path, ListShape::default())
    }

    pub fn with_list_shape(
        id: impl Into<String>,
        url_path: impl Into<String>,
        list_shape: ListShape,
    ) -> Self {
        let id = id.into();
        let strategy = UpsertStrategy::for_family(&id);
        Api {
            id,
            url_path: url_path.into(),
            list_shape,
            strategy,
        }
    }

    /// Stable family identifier (e.g. `alerting-profile`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the collection endpoint relative to the environment URL
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    pub fn list_shape(&self) -> &ListShape {
        &self.list_shape
    }

    pub fn upsert_strategy(&self) -> UpsertStrategy {
        self.strategy
    }

    /// Collection endpoint of this family in the given environment
    pub fn url_from_environment_url(&self, environment_url: &str) -> String {
        let base = environment_url.trim_end_matches('/');
        if self.url_path.starts_with('/') {
            format!("{}{}", base, self.url_path)
        } else {
            format!("{}/{}", base, self.url_path)
        }
    }
}

/// (id, path, list key) of every built-in family; `None` marks a bare array
const KNOWN_APIS: &[(&str, &str, Option<&str>)] = &[
    ("alerting-profile", "/api/config/v1/alertingProfiles", Some("values")),
    ("management-zone", "/api/config/v1/managementZones", Some("values")),
    ("auto-tag", "/api/config/v1/autoTags", Some("values")),
    ("dashboard", "/api/config/v1/dashboards", Some("dashboards")),
    ("notification", "/api/config/v1/notifications", Some("values")),
    (EXTENSION_API_ID, "/api/config/v1/extensions", Some("extensions")),
    ("custom-service-java", "/api/config/v1/service/customServices/java", Some("values")),
    ("anomaly-detection-metrics", "/api/config/v1/anomalyDetection/metricEvents", Some("values")),
    ("synthetic-location", "/api/v1/synthetic/locations", Some("locations")),
    ("synthetic-monitor", "/api/v1/synthetic/monitors", Some("monitors")),
    ("application-web", "/api/config/v1/applications/web", Some("values")),
    ("application-mobile", "/api/config/v1/applications/mobile", Some("values")),
    ("app-detection-rule", "/api/config/v1/applicationDetectionRules", Some("values")),
    ("aws-credentials", "/api/config/v1/aws/credentials", None),
    ("kubernetes-credentials", "/api/config/v1/kubernetes/credentials", Some("values")),
    ("azure-credentials", "/api/config/v1/azure/credentials", Some("values")),
    ("request-attributes", "/api/config/v1/service/requestAttributes", Some("values")),
    ("calculated-metrics-service", "/api/config/v1/calculatedMetrics/service", Some("values")),
    ("conditional-naming-processgroup", "/api/config/v1/conditionalNaming/processGroup", Some("values")),
    ("conditional-naming-host", "/api/config/v1/conditionalNaming/host", Some("values")),
    ("conditional-naming-service", "/api/config/v1/conditionalNaming/service", Some("values")),
    ("maintenance-window", "/api/config/v1/maintenanceWindows", Some("values")),
    ("request-naming-service", "/api/config/v1/service/requestNaming", Some("values")),
];

/// All built-in API families, in catalogue order
pub fn known_apis() -> Vec<Api> {
    KNOWN_APIS
        .iter()
        .map(|(id, path, key)| {
            let shape = match key {
                Some(key) => ListShape::keyed(*key),
                None => ListShape::Array,
            };
            Api::with_list_shape(*id, *path, shape)
        })
        .collect()
}

/// Look up a built-in family by identifier
pub fn find_api(id: &str) -> Option<Api> {
    known_apis().into_iter().find(|api| api.id() == id)
}
