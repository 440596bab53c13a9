use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::CheckConfig;
use crate::error::CheckError;

/// Runs one GraphQL document and hands back the raw response body.
///
/// `label` only names the query in errors and logs.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, label: &'static str, document: &str) -> Result<Vec<u8>, CheckError>;
}

/// `POST`s `{"query": ...}` to the backend GraphQL endpoint.
pub struct GraphqlClient {
    http: reqwest::Client,
    url: String,
}

impl GraphqlClient {
    pub fn new(config: &CheckConfig) -> Result<Self, CheckError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Key {}", config.api_key))
            .map_err(|e| CheckError::InvalidConfig(format!("api key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.skip_verify);

        if config.skip_verify {
            tracing::warn!("client: TLS certificate verification disabled");
        }

        if let Some(path) = &config.trusted_ca_file {
            let pem = std::fs::read(path).map_err(|e| CheckError::CaBundle {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
                CheckError::CaBundle {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            if certs.is_empty() {
                return Err(CheckError::CaBundle {
                    path: path.display().to_string(),
                    reason: "no PEM certificates found".to_string(),
                });
            }
            tracing::debug!("client: trusting {} CA cert(s) from {}", certs.len(), path.display());
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http = builder.build().map_err(|e| CheckError::Transport {
            query: "client setup",
            source: e,
        })?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl QueryExecutor for GraphqlClient {
    async fn execute(&self, label: &'static str, document: &str) -> Result<Vec<u8>, CheckError> {
        let transport = |source| CheckError::Transport {
            query: label,
            source,
        };
        let payload = serde_json::json!({ "query": document });

        let resp = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        let body = resp.bytes().await.map_err(transport)?;

        tracing::debug!("client: {label} query returned {} bytes", body.len());
        Ok(body.to_vec())
    }
}
