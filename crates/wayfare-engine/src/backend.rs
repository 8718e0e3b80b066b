//! # HTTP Route Backend
//!
//! The [`RouteBackend`] implementation that speaks the backend's JSON
//! protocol over HTTP.
//!
//! ## Wire Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DirectRoute        POST {base}/get_route                              │
//! │  PredictedArrival   POST {base}/predict                                │
//! │                                                                         │
//! │  Body:     serialized RouteQuery (arrival_time only for /predict)      │
//! │  Response: RouteResponse, decoded REGARDLESS of HTTP status - the      │
//! │            backend reports failures in-band via the "error" field.     │
//! │            Only an unreachable backend or an undecodable body is a     │
//! │            transport failure.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use wayfare_core::{RequestMode, RouteQuery, RouteResponse};

use crate::controller::RouteBackend;
use crate::error::{BackendError, BackendResult, EngineError, EngineResult};

// =============================================================================
// HTTP Backend
// =============================================================================

/// HTTP client for the route/prediction backend.
pub struct HttpRouteBackend {
    client: reqwest::Client,
    route_url: Url,
    predict_url: Url,
}

impl HttpRouteBackend {
    /// Builds a backend client for a base URL with a per-request timeout.
    pub fn new(base_url: &str, request_timeout: Duration) -> EngineResult<Self> {
        let mut base: Url = base_url
            .parse()
            .map_err(|e| EngineError::InvalidUrl(format!("{base_url}: {e}")))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(EngineError::InvalidUrl(format!(
                "{base_url}: expected http or https"
            )));
        }

        // Joining replaces the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let join = |segment: &str| {
            base.join(segment)
                .map_err(|e| EngineError::InvalidUrl(format!("{base_url}: {e}")))
        };

        Ok(HttpRouteBackend {
            client: reqwest::Client::builder()
                .timeout(request_timeout)
                .build()
                .map_err(|e| EngineError::InvalidConfig(e.to_string()))?,
            route_url: join("get_route")?,
            predict_url: join("predict")?,
        })
    }

    /// The operation URL for a request mode.
    fn target(&self, mode: RequestMode) -> &Url {
        match mode {
            RequestMode::DirectRoute => &self.route_url,
            RequestMode::PredictedArrival => &self.predict_url,
        }
    }
}

#[async_trait]
impl RouteBackend for HttpRouteBackend {
    async fn fetch_route(&self, query: &RouteQuery) -> BackendResult<RouteResponse> {
        let url = self.target(query.mode());
        debug!(%url, mode = %query.mode(), "posting route query");

        let response = self
            .client
            .post(url.clone())
            .json(query)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        response
            .json::<RouteResponse>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for HttpRouteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRouteBackend")
            .field("route_url", &self.route_url.as_str())
            .field("predict_url", &self.predict_url.as_str())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_urls_join_onto_the_base() {
        let backend =
            HttpRouteBackend::new("http://localhost:8000", Duration::from_secs(10)).unwrap();
        assert_eq!(
            backend.target(RequestMode::DirectRoute).as_str(),
            "http://localhost:8000/get_route"
        );
        assert_eq!(
            backend.target(RequestMode::PredictedArrival).as_str(),
            "http://localhost:8000/predict"
        );
    }

    #[test]
    fn test_base_path_is_preserved_with_or_without_slash() {
        for base in ["http://example.com/api", "http://example.com/api/"] {
            let backend = HttpRouteBackend::new(base, Duration::from_secs(10)).unwrap();
            assert_eq!(
                backend.target(RequestMode::DirectRoute).as_str(),
                "http://example.com/api/get_route"
            );
        }
    }

    #[test]
    fn test_non_http_bases_are_rejected() {
        assert!(HttpRouteBackend::new("not a url", Duration::from_secs(10)).is_err());
        assert!(HttpRouteBackend::new("ftp://example.com", Duration::from_secs(10)).is_err());
    }
}
