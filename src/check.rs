use std::io::{self, Write};

use crate::client::{GraphqlClient, QueryExecutor};
use crate::config::{CheckConfig, PLUGIN_NAME};
use crate::error::CheckError;
use crate::format::MetricBuffer;
use crate::models::{ClusterError, ClusterMetricsResponse, QueryResult, VersionResponse};
use crate::queries::{CLUSTER_METRICS_QUERY, VERSION_QUERY};
use crate::state::CheckState;
use crate::tags::TagSet;
use crate::walker;

pub const BACKEND_VERSION_TAG: &str = "sensu_backend_version";
pub const BACKEND_URL_TAG: &str = "sensu_backend_url";

/// Result of one run. `lines` is empty unless the backend was queried successfully.
#[derive(Debug)]
pub struct CheckOutcome {
    pub state: CheckState,
    pub lines: Vec<String>,
    pub message: Option<String>,
    pub cluster_errors: Vec<ClusterError>,
}

impl CheckOutcome {
    pub fn failed(err: &CheckError) -> Self {
        Self {
            state: err.state(),
            lines: Vec::new(),
            message: Some(err.to_string()),
            cluster_errors: Vec::new(),
        }
    }

    /// Write every metric line followed by `\n`.
    pub fn write_lines<W: Write>(&self, mut out: W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    /// Print the lines to `out` and the status message to `diag`, returning the
    /// state to exit with. Unwritable output is UNKNOWN.
    pub fn emit<W: Write, E: Write>(&self, out: W, mut diag: E) -> CheckState {
        if let Err(e) = self.write_lines(out) {
            tracing::error!("check: writing metric lines failed: {e}");
            let _ = writeln!(
                diag,
                "{PLUGIN_NAME} {}: writing metric lines failed: {e}",
                CheckState::Unknown
            );
            return CheckState::Unknown;
        }
        if let Some(message) = &self.message {
            let _ = writeln!(diag, "{PLUGIN_NAME} {}: {message}", self.state);
        }
        self.state
    }
}

/// Validate the config, build the HTTP client and run the check.
pub async fn execute(config: &CheckConfig, timestamp: i64) -> CheckOutcome {
    if let Err(e) = config.validate() {
        tracing::warn!("check: {e}");
        return CheckOutcome::failed(&e);
    }
    match GraphqlClient::new(config) {
        Ok(client) => run_validated(config, &client, timestamp).await,
        Err(e) => CheckOutcome::failed(&e),
    }
}

/// Run the check against `executor`. Any configuration, transport or parse
/// failure aborts the run with no metric lines.
pub async fn run(
    config: &CheckConfig,
    executor: &dyn QueryExecutor,
    timestamp: i64,
) -> CheckOutcome {
    if let Err(e) = config.validate() {
        tracing::warn!("check: {e}");
        return CheckOutcome::failed(&e);
    }
    run_validated(config, executor, timestamp).await
}

async fn run_validated(
    config: &CheckConfig,
    executor: &dyn QueryExecutor,
    timestamp: i64,
) -> CheckOutcome {
    let result = match query(executor).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("check: {e}");
            return CheckOutcome::failed(&e);
        }
    };

    let mut tags = TagSet::new();
    tags.set(BACKEND_VERSION_TAG, result.backend_version.as_str());
    tags.set(BACKEND_URL_TAG, config.url.as_str());

    let mut buffer = MetricBuffer::new(config.output_format);
    let cluster_errors = walker::walk(&result.clusters, &mut tags, &mut buffer, timestamp);

    tracing::info!(
        "check: {} clusters, {} metric lines ({})",
        result.clusters.len(),
        buffer.len(),
        config.output_format.selector()
    );

    let (state, message) = if config.warn_on_cluster_error && !cluster_errors.is_empty() {
        let summary: Vec<String> = cluster_errors.iter().map(ToString::to_string).collect();
        (
            CheckState::Warning,
            Some(format!(
                "{} cluster(s) reported errors: {}",
                cluster_errors.len(),
                summary.join("; ")
            )),
        )
    } else {
        (CheckState::Ok, None)
    };

    CheckOutcome {
        state,
        lines: buffer.into_lines(),
        message,
        cluster_errors,
    }
}

/// Version gate, then the cluster metrics query. The second query is only
/// issued once a non-empty backend version came back.
pub async fn query(executor: &dyn QueryExecutor) -> Result<QueryResult, CheckError> {
    let body = executor.execute("version", VERSION_QUERY).await?;
    let version: VersionResponse =
        serde_json::from_slice(&body).map_err(|source| CheckError::Parse {
            query: "version",
            source,
        })?;
    let backend_version = version
        .backend_version()
        .ok_or(CheckError::MissingBackendVersion)?
        .to_string();
    tracing::debug!("check: backend version {backend_version}");

    let body = executor.execute("cluster metrics", CLUSTER_METRICS_QUERY).await?;
    let metrics: ClusterMetricsResponse =
        serde_json::from_slice(&body).map_err(|source| CheckError::Parse {
            query: "cluster metrics",
            source,
        })?;

    Ok(QueryResult {
        backend_version,
        clusters: metrics.into_clusters(),
    })
}
