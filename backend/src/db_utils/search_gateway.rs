//! Client for the external search service's advanced search endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use common::{search_params::SearchParameters, search_result::SearchResultSet};

use crate::config::FilterConfig;

#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Runs one search. Transport, status and decoding failures are returned
    /// to the caller untouched; nothing here retries.
    async fn advanced_search(&self, params: &SearchParameters) -> anyhow::Result<SearchResultSet>;
}


pub struct HttpSearchGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSearchGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build search client")?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn from_config(config: &FilterConfig) -> anyhow::Result<Self> {
        Self::new(config.search_endpoint.clone(), config.search_timeout)
    }

    fn advanced_search_url(&self) -> String {
        format!("{}/advanced_search", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchGateway for HttpSearchGateway {
    async fn advanced_search(&self, params: &SearchParameters) -> anyhow::Result<SearchResultSet> {
        let t0 = std::time::Instant::now();
        let url = self.advanced_search_url();
        let response = self
            .client
            .get(&url)
            .query(&params.to_query_pairs())
            .send()
            .await
            .with_context(|| format!("Search request to {url} failed"))?;
        let status = response.status();
        let response_txt = response.text().await.context("Failed to read search response")?;
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("Search service error: {}: {}", status, response_txt);
        }
        let result: SearchResultSet =
            serde_json::from_str(&response_txt).context("Malformed search service response")?;
        let dt_ms = t0.elapsed().as_millis();
        tracing::debug!(
            hits = result.results.len(),
            total = result.total,
            "advanced search completed in {}ms",
            dt_ms
        );
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use common::search_params::ParamValue;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn params() -> SearchParameters {
        SearchParameters::single("page", ParamValue::text(2))
            .merge(SearchParameters::single("topics", ParamValue::list([4, 9])))
            .merge(SearchParameters::single("order", ParamValue::nested("public_timestamp", "desc")))
    }

    #[tokio::test]
    async fn sends_flattened_params_and_decodes_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/advanced_search"))
            .and(query_param("page", "2"))
            .and(query_param("topics[]", "4"))
            .and(query_param("order[public_timestamp]", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 8, "title": "x"}, {"id": 3}],
                "total": 12
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpSearchGateway::new(server.uri(), Duration::from_secs(2)).unwrap();
        let result = gateway.advanced_search(&params()).await.unwrap();
        assert_eq!(result.ids(), vec![8, 3]);
        assert_eq!(result.total, 12);
    }

    #[tokio::test]
    async fn server_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let gateway = HttpSearchGateway::new(server.uri(), Duration::from_secs(2)).unwrap();
        let err = gateway.advanced_search(&params()).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn malformed_responses_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let gateway = HttpSearchGateway::new(server.uri(), Duration::from_secs(2)).unwrap();
        assert!(gateway.advanced_search(&params()).await.is_err());
    }

    #[tokio::test]
    async fn timeouts_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": [], "total": 0}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let gateway = HttpSearchGateway::new(server.uri(), Duration::from_millis(50)).unwrap();
        assert!(gateway.advanced_search(&params()).await.is_err());
    }
}
