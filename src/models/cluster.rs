use serde::{Deserialize, Deserializer};

// ═══════════════════════════════════════════════════════════════════
// Gauge groups (shared by the wire format and the domain model)
// ═══════════════════════════════════════════════════════════════════

/// GraphQL may hand back `null` for a counter; treat it as zero.
fn zero_if_null<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntityGauges {
    #[serde(deserialize_with = "zero_if_null")]
    pub total: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub agent: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub proxy: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub other: i64,
}

/// Pass/fail and status breakdown. Used for both event and keepalive gauges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateGauges {
    #[serde(deserialize_with = "zero_if_null")]
    pub total: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub state_passing: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub state_failing: i64,
    #[serde(rename = "statusOK", deserialize_with = "zero_if_null")]
    pub status_ok: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub status_warning: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub status_critical: i64,
    #[serde(deserialize_with = "zero_if_null")]
    pub status_other: i64,
}

pub type EventGauges = StateGauges;
pub type KeepaliveGauges = StateGauges;

// ═══════════════════════════════════════════════════════════════════
// Domain model
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    pub name: String,
    pub entity: EntityGauges,
    pub event: EventGauges,
    pub keepalive: KeepaliveGauges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterErrorKind {
    /// The cluster was reached but its metrics could not be fetched.
    Fetch,
    /// The request could not be forwarded to the cluster.
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterError {
    pub kind: ClusterErrorKind,
    pub name: String,
    pub message: String,
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ClusterErrorKind::Fetch => "fetch",
            ClusterErrorKind::Forward => "forward",
        };
        write!(f, "{kind} error ({}): {}", self.name, self.message)
    }
}

/// One entry of the metrics query. `total` is `None` when the backend sent
/// no metrics payload for the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub total: Option<i64>,
    pub namespaces: Vec<Namespace>,
    pub error: Option<ClusterError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub backend_version: String,
    pub clusters: Vec<Cluster>,
}

// ═══════════════════════════════════════════════════════════════════
// Wire format: `{ versions { backend { version } } }`
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    data: Option<VersionData>,
}

#[derive(Debug, Default, Deserialize)]
struct VersionData {
    #[serde(default)]
    versions: Option<Versions>,
}

#[derive(Debug, Default, Deserialize)]
struct Versions {
    #[serde(default)]
    backend: Option<BackendVersion>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendVersion {
    #[serde(default)]
    version: Option<String>,
}

impl VersionResponse {
    /// Backend version, if the response carried a non-empty one.
    pub fn backend_version(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .versions
            .as_ref()?
            .backend
            .as_ref()?
            .version
            .as_deref()
            .filter(|v| !v.is_empty())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wire format: the forwarded cluster metrics query
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct ClusterMetricsResponse {
    #[serde(default)]
    data: Option<ClusterMetricsData>,
}

#[derive(Debug, Default, Deserialize)]
struct ClusterMetricsData {
    #[serde(default)]
    clusters: Vec<ClusterEntry>,
}

/// Either the `... on Query` branch (`name` + `metrics`) or the
/// `... on ForwardErr` branch (`errName` + `errMsg`).
#[derive(Debug, Default, Deserialize)]
struct ClusterEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metrics: Option<MetricsPayload>,
    #[serde(default, rename = "errName")]
    err_name: Option<String>,
    #[serde(default, rename = "errMsg")]
    err_msg: Option<String>,
}

/// `clusterMetrics` resolves to either `ClusterMetrics` or `FetchErr`. The
/// two share no keys, so a `code` or `message` key selects `FetchErr` even
/// when its values are null.
#[derive(Debug)]
enum MetricsPayload {
    FetchErr(FetchErr),
    Metrics(ClusterMetricsPayload),
}

impl<'de> Deserialize<'de> for MetricsPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_fetch_err = value.get("code").is_some() || value.get("message").is_some();
        if is_fetch_err {
            serde_json::from_value(value)
                .map(MetricsPayload::FetchErr)
                .map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(MetricsPayload::Metrics)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FetchErr {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl FetchErr {
    fn describe(self) -> String {
        let message = self.message.unwrap_or_default();
        let code = match self.code {
            Some(serde_json::Value::Null) | None => None,
            Some(serde_json::Value::String(code)) => Some(code),
            Some(code) => Some(code.to_string()),
        };
        match code {
            Some(code) if message.is_empty() => code,
            Some(code) => format!("{code}: {message}"),
            None if message.is_empty() => "unknown fetch error".to_string(),
            None => message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterMetricsPayload {
    #[serde(default)]
    namespaces: Vec<NamespaceEntry>,
    #[serde(default)]
    cluster_gauges: Option<ClusterGauges>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClusterGauges {
    #[serde(deserialize_with = "zero_if_null")]
    total: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    entity_gauges: Option<EntityGauges>,
    #[serde(default)]
    event_gauges: Option<EventGauges>,
    #[serde(default)]
    keepalive_gauges: Option<KeepaliveGauges>,
}

impl ClusterMetricsResponse {
    /// Convert to the domain model, preserving arrival order.
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.data
            .map(|d| d.clusters)
            .unwrap_or_default()
            .into_iter()
            .map(ClusterEntry::into_cluster)
            .collect()
    }
}

impl ClusterEntry {
    fn into_cluster(self) -> Cluster {
        let forward_error = if self.err_name.is_some() || self.err_msg.is_some() {
            Some(ClusterError {
                kind: ClusterErrorKind::Forward,
                name: self.err_name.clone().unwrap_or_default(),
                message: self.err_msg.unwrap_or_default(),
            })
        } else {
            None
        };

        let name = self.name.or(self.err_name).unwrap_or_default();

        match self.metrics {
            Some(MetricsPayload::Metrics(payload)) => Cluster {
                total: Some(payload.cluster_gauges.map(|g| g.total).unwrap_or_default()),
                namespaces: payload
                    .namespaces
                    .into_iter()
                    .map(NamespaceEntry::into_namespace)
                    .collect(),
                name,
                error: forward_error,
            },
            Some(MetricsPayload::FetchErr(err)) => {
                let message = err.describe();
                Cluster {
                    error: Some(ClusterError {
                        kind: ClusterErrorKind::Fetch,
                        name: name.clone(),
                        message,
                    }),
                    name,
                    total: None,
                    namespaces: Vec::new(),
                }
            }
            None => Cluster {
                name,
                total: None,
                namespaces: Vec::new(),
                error: forward_error,
            },
        }
    }
}

impl NamespaceEntry {
    fn into_namespace(self) -> Namespace {
        Namespace {
            name: self.name.unwrap_or_default(),
            entity: self.entity_gauges.unwrap_or_default(),
            event: self.event_gauges.unwrap_or_default(),
            keepalive: self.keepalive_gauges.unwrap_or_default(),
        }
    }
}
