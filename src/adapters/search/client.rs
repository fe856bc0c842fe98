//! Search backend client
//!
//! [`SearchBackend`] is the seam between the export pipeline and the network.
//! [`HttpSearchBackend`] implements it over reqwest. The client is built once
//! by the caller and handed to the pipeline, so tests can substitute a double.

use super::models::{excerpt, PitResponse, SearchRequest};
use crate::config::BackendConfig;
use crate::domain::{ElastictlError, ExportError, IndexName, KeepAlive, PitId, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Requests the export pipeline issues against the search backend
///
/// Every method is a single request. Nothing is retried.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// `GET {index}`: raw index definition (settings, mappings, aliases)
    async fn get_index(&self, index: &IndexName) -> std::result::Result<String, ExportError>;

    /// `POST {index}/_pit?keep_alive=..`: open a point-in-time snapshot
    async fn open_point_in_time(
        &self,
        index: &IndexName,
        keep_alive: &KeepAlive,
    ) -> std::result::Result<PitId, ExportError>;

    /// `DELETE _pit`: release a point-in-time snapshot
    async fn close_point_in_time(&self, pit: &PitId) -> std::result::Result<(), ExportError>;

    /// `POST _search?size=..[&sort=..]`: raw response body of one page
    async fn search(&self, request: &SearchRequest) -> std::result::Result<String, ExportError>;

    /// Base URL used in log output
    fn base_url(&self) -> &str;
}

/// reqwest-backed [`SearchBackend`]
pub struct HttpSearchBackend {
    base_url: Url,
    client: Client,
    username: Option<String>,
    password: Option<crate::config::SecretString>,
}

impl HttpSearchBackend {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL cannot be parsed or the
    /// HTTP client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use elastictl::adapters::search::HttpSearchBackend;
    /// use elastictl::config::BackendConfig;
    ///
    /// let backend = HttpSearchBackend::new(&BackendConfig::default()).unwrap();
    /// ```
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            ElastictlError::Configuration(format!(
                "Invalid backend URL '{}': {e}",
                config.base_url
            ))
        })?;

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for search backend");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            ElastictlError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ExportError> {
        self.base_url.join(path).map_err(|e| {
            ExportError::BackendUnreachable(format!("Cannot build URL for '{path}': {e}"))
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(
                username,
                self.password
                    .as_ref()
                    .map(|p| p.expose_secret().as_ref().to_string()),
            ),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> std::result::Result<String, ExportError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ExportError::BackendUnreachable(format!("{what}: {e}")))?;

        read_body(response, what).await
    }
}

async fn read_body(response: Response, what: &str) -> std::result::Result<String, ExportError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        ExportError::MalformedResponse(format!("{what}: failed to read response body: {e}"))
    })?;

    if !status.is_success() {
        return Err(ExportError::MalformedResponse(format!(
            "{what} failed with status {status}: {}",
            excerpt(&body)
        )));
    }

    Ok(body)
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn get_index(&self, index: &IndexName) -> std::result::Result<String, ExportError> {
        let url = self.endpoint(index.as_str())?;
        tracing::debug!(url = %url, "Fetching index definition");

        self.send(self.client.get(url), "index definition request")
            .await
    }

    async fn open_point_in_time(
        &self,
        index: &IndexName,
        keep_alive: &KeepAlive,
    ) -> std::result::Result<PitId, ExportError> {
        let url = self.endpoint(&format!("{index}/_pit"))?;
        tracing::debug!(url = %url, keep_alive = %keep_alive, "Opening point in time");

        let request = self
            .client
            .post(url)
            .query(&[("keep_alive", keep_alive.as_str())]);
        let body = self.send(request, "point-in-time request").await?;

        PitResponse::parse_id(&body)
    }

    async fn close_point_in_time(&self, pit: &PitId) -> std::result::Result<(), ExportError> {
        let url = self.endpoint("_pit")?;

        let request = self
            .client
            .delete(url)
            .json(&serde_json::json!({ "id": pit.as_str() }));
        self.send(request, "point-in-time release").await?;

        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> std::result::Result<String, ExportError> {
        let url = self.endpoint("_search")?;

        let mut http = self
            .client
            .post(url)
            .query(&[("size", request.size.to_string())]);
        if let Some(sort) = &request.sort {
            http = http.query(&[("sort", sort.as_str())]);
        }

        self.send(http.json(&request.body), "search request").await
    }

    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_client_creation() {
        let backend = HttpSearchBackend::new(&BackendConfig::default()).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:9200/");
    }

    #[test]
    fn test_client_keeps_path_prefix() {
        let config = BackendConfig {
            base_url: "https://proxy.example.com/es".to_string(),
            ..Default::default()
        };
        let backend = HttpSearchBackend::new(&config).unwrap();

        assert_eq!(
            backend.endpoint("_search").unwrap().as_str(),
            "https://proxy.example.com/es/_search"
        );
        assert_eq!(
            backend.endpoint("logs/_pit").unwrap().as_str(),
            "https://proxy.example.com/es/logs/_pit"
        );
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let config = BackendConfig {
            base_url: "http://".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpSearchBackend::new(&config),
            Err(ElastictlError::Configuration(_))
        ));
    }

    #[test]
    fn test_client_with_credentials() {
        let config = BackendConfig {
            username: Some("elastic".to_string()),
            password: Some(secret_string("changeme".to_string())),
            ..Default::default()
        };
        let backend = HttpSearchBackend::new(&config).unwrap();
        assert_eq!(backend.username.as_deref(), Some("elastic"));
    }
}
