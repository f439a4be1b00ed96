use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::SourceConfig;
use crate::models::{ReferenceKey, Release, ResultSeries, ResultSnapshot};

use super::{FeedError, ResultSource};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Reads the published result store and the GitHub releases API over HTTP.
pub struct HttpSource {
    client: Client,
    results_base_url: String,
    releases_url: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self {
            client,
            results_base_url: config.results_base_url.trim_end_matches('/').to_string(),
            releases_url: config.releases_url(),
        })
    }

    fn ref_url(&self, key: &ReferenceKey, file: &str) -> String {
        format!("{}/{}/{}", self.results_base_url, key.storage_path(), file)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        tracing::debug!(%url, "fetching");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ResultSource for HttpSource {
    async fn info(&self) -> Result<serde_json::Value, FeedError> {
        self.get_json(&format!("{}/info.json", self.results_base_url))
            .await
    }

    async fn latest(&self, key: &ReferenceKey) -> Result<ResultSnapshot, FeedError> {
        self.get_json(&self.ref_url(key, "latest.json")).await
    }

    async fn series(&self, key: &ReferenceKey) -> Result<ResultSeries, FeedError> {
        self.get_json(&self.ref_url(key, "results.json")).await
    }

    async fn releases(&self) -> Result<Vec<Release>, FeedError> {
        self.get_json(&self.releases_url).await
    }

    fn name(&self) -> &str {
        &self.results_base_url
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source_for(server: &MockServer) -> HttpSource {
        let config = SourceConfig {
            results_base_url: server.uri(),
            api_host: server.uri(),
            request_timeout_secs: 1,
            ..SourceConfig::default()
        };
        HttpSource::new(&config).unwrap()
    }

    async fn respond(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[test]
    fn builds_store_urls() {
        let config = SourceConfig {
            results_base_url: "https://example.org/test262/".into(),
            ..SourceConfig::default()
        };
        let source = HttpSource::new(&config).unwrap();

        assert_eq!(
            source.ref_url(&ReferenceKey::branch("main"), "latest.json"),
            "https://example.org/test262/refs/heads/main/latest.json"
        );
        assert_eq!(
            source.ref_url(&ReferenceKey::tag("v0.11"), "results.json"),
            "https://example.org/test262/refs/tags/v0.11.0/results.json"
        );
        assert_eq!(
            source.releases_url,
            "https://api.github.com/repos/boa-dev/boa/releases"
        );
    }

    #[tokio::test]
    async fn decodes_latest_run_for_a_tag() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/refs/tags/v0.11.0/latest.json",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "commit": "abc", "total": 10, "passed": 7, "ignored": 1,
                "results": {"suites": [{"name": "language", "passed": 7, "ignored": 1, "total": 10}]}
            })),
        )
        .await;

        let snapshot = source_for(&server)
            .latest(&ReferenceKey::tag("v0.11"))
            .await
            .unwrap();
        assert_eq!(snapshot.commit, "abc");
        assert_eq!(snapshot.failed(), Some(2));
    }

    #[tokio::test]
    async fn missing_file_maps_to_status() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/refs/heads/master/results.json",
            ResponseTemplate::new(404),
        )
        .await;

        let err = source_for(&server)
            .series(&ReferenceKey::branch("master"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FeedError::Status { status: 404, ref url } if url.ends_with("/refs/heads/master/results.json")
        ));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/repos/boa-dev/boa/releases",
            ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"),
        )
        .await;

        let err = source_for(&server).releases().await.unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/info.json",
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let err = source_for(&server).info().await.unwrap_err();
        assert!(matches!(err, FeedError::Timeout(_)));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network() {
        let config = SourceConfig {
            results_base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 1,
            ..SourceConfig::default()
        };
        let err = HttpSource::new(&config).unwrap().info().await.unwrap_err();
        assert!(matches!(err, FeedError::Network(_)));
    }
}
