use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tablero_application::{
    UpstreamBody, UpstreamGateway, UpstreamMethod, UpstreamRequest, UpstreamResponse,
};
use tablero_core::{AppError, AppResult};
use tracing::debug;
use url::Url;

/// HTTP implementation of the upstream business-service port.
pub struct ReqwestUpstreamGateway {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ReqwestUpstreamGateway {
    /// Creates a gateway over an existing HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Creates a gateway with its own client bounded by a request timeout.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build upstream HTTP client: {error}"))
            })?;

        Ok(Self::new(http_client, base_url))
    }

    fn endpoint(&self, path: &str, query: Option<&str>) -> AppResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}")).map_err(|error| {
            AppError::Validation(format!("invalid upstream path '{path}': {error}"))
        })?;

        let base_path = format!("{}/", self.base_url.path().trim_end_matches('/'));
        if url.origin() != self.base_url.origin() || !url.path().starts_with(&base_path) {
            return Err(AppError::Validation(format!(
                "upstream path '{path}' escapes the upstream base URL"
            )));
        }

        url.set_query(query);

        Ok(url)
    }
}

#[async_trait]
impl UpstreamGateway for ReqwestUpstreamGateway {
    async fn send(&self, request: UpstreamRequest) -> AppResult<UpstreamResponse> {
        let url = self.endpoint(request.path.as_str(), request.query.as_deref())?;
        debug!(method = request.method.as_str(), %url, "sending upstream request");

        let mut builder = match request.method {
            UpstreamMethod::Get => self.http_client.get(url),
            UpstreamMethod::Post => self.http_client.post(url),
        }
        .header(ACCEPT, "application/json");

        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_slice());
        }

        builder = match request.body {
            Some(UpstreamBody::Json(value)) => builder.json(&value),
            Some(UpstreamBody::Multipart {
                content_type,
                bytes,
            }) => builder.header(CONTENT_TYPE, content_type).body(bytes),
            None => builder,
        };

        let response = builder.send().await.map_err(|error| {
            if error.is_builder() {
                AppError::Internal(format!("failed to build upstream request: {error}"))
            } else {
                AppError::Unavailable(format!(
                    "failed to reach upstream for '{}': {error}",
                    request.path.as_str()
                ))
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(|error| {
            AppError::Unavailable(format!(
                "failed to read upstream body for '{}': {error}",
                request.path.as_str()
            ))
        })?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tablero_application::{
        ForwardedHeader, UpstreamBody, UpstreamGateway, UpstreamMethod, UpstreamPath,
        UpstreamRequest,
    };
    use tablero_core::AppError;
    use url::Url;
    use wiremock::matchers::{body_bytes, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::ReqwestUpstreamGateway;

    fn gateway_for(uri: &str) -> ReqwestUpstreamGateway {
        let base_url = Url::parse(uri).unwrap_or_else(|error| panic!("bad uri {uri}: {error}"));
        ReqwestUpstreamGateway::with_timeout(base_url, Duration::from_secs(5))
            .unwrap_or_else(|error| panic!("client build failed: {error}"))
    }

    fn request(
        method: UpstreamMethod,
        raw_path: &str,
        query: Option<&str>,
        body: Option<UpstreamBody>,
    ) -> UpstreamRequest {
        UpstreamRequest {
            method,
            path: UpstreamPath::new(raw_path)
                .unwrap_or_else(|error| panic!("bad path {raw_path}: {error}")),
            query: query.map(str::to_owned),
            headers: vec![ForwardedHeader::new("authorization", "Bearer abc")],
            body,
        }
    }

    #[tokio::test]
    async fn get_forwards_path_query_and_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ventas/clientes"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&format!("{}/api/", server.uri()));
        let response = gateway
            .send(request(UpstreamMethod::Get, "ventas/clientes", Some("page=2"), None))
            .await
            .unwrap_or_else(|error| panic!("send failed: {error}"));

        assert_eq!(response.status, 200);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&response.body).ok(),
            Some(json!([{ "id": 1 }]))
        );
        assert!(
            response
                .content_type
                .as_deref()
                .is_some_and(|value| value.starts_with("application/json"))
        );
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ventas"))
            .and(body_json(json!({ "cliente": "ACME" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9 })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server.uri());
        let response = gateway
            .send(request(
                UpstreamMethod::Post,
                "ventas",
                None,
                Some(UpstreamBody::Json(json!({ "cliente": "ACME" }))),
            ))
            .await
            .unwrap_or_else(|error| panic!("send failed: {error}"));

        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn post_forwards_multipart_bytes_and_boundary() {
        let payload = b"--b1\r\nContent-Disposition: form-data; name=\"guia\"\r\n\r\nG-001\r\n--b1--\r\n";
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logistica/guias"))
            .and(header("content-type", "multipart/form-data; boundary=b1"))
            .and(body_bytes(payload.to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server.uri());
        let response = gateway
            .send(request(
                UpstreamMethod::Post,
                "logistica/guias",
                None,
                Some(UpstreamBody::Multipart {
                    content_type: "multipart/form-data; boundary=b1".to_owned(),
                    bytes: payload.to_vec(),
                }),
            ))
            .await
            .unwrap_or_else(|error| panic!("send failed: {error}"));

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn non_ascii_cookie_is_forwarded_byte_for_byte() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventario"))
            .and(|request: &wiremock::Request| {
                request
                    .headers
                    .get("cookie")
                    .is_some_and(|value| value.as_bytes() == b"sede=Ca\xf1ete")
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server.uri());
        let mut upstream_request = request(UpstreamMethod::Get, "inventario", None, None);
        upstream_request.headers =
            vec![ForwardedHeader::new("cookie", b"sede=Ca\xf1ete".to_vec())];

        let response = gateway
            .send(upstream_request)
            .await
            .unwrap_or_else(|error| panic!("send failed: {error}"));
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn error_status_is_returned_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventario"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server.uri());
        let response = gateway
            .send(request(UpstreamMethod::Get, "inventario", None, None))
            .await
            .unwrap_or_else(|error| panic!("send failed: {error}"));

        assert_eq!(response.status, 500);
        assert_eq!(response.body, b"boom".to_vec());
    }

    #[tokio::test]
    async fn slow_upstream_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/inventario"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let base_url =
            Url::parse(&server.uri()).unwrap_or_else(|error| panic!("bad uri: {error}"));
        let gateway = ReqwestUpstreamGateway::with_timeout(base_url, Duration::from_millis(50))
            .unwrap_or_else(|error| panic!("client build failed: {error}"));

        let result = gateway
            .send(request(UpstreamMethod::Get, "inventario", None, None))
            .await;
        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }

    #[test]
    fn endpoint_stays_under_base_path() {
        let gateway = gateway_for("http://erp.internal/api/");

        let url = gateway
            .endpoint("ventas/clientes", Some("page=2"))
            .unwrap_or_else(|error| panic!("endpoint failed: {error}"));
        assert_eq!(url.as_str(), "http://erp.internal/api/ventas/clientes?page=2");

        for escaping in ["%2e%2e/admin/usuarios", "ventas/%2E%2E/%2e%2e/admin", "../admin"] {
            let result = gateway.endpoint(escaping, None);
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "'{escaping}' resolved to {result:?}"
            );
        }
    }

    #[test]
    fn endpoint_accepts_root_base_url() {
        let gateway = gateway_for("http://erp.internal");

        let url = gateway
            .endpoint("inventario", None)
            .unwrap_or_else(|error| panic!("endpoint failed: {error}"));
        assert_eq!(url.as_str(), "http://erp.internal/inventario");
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let gateway = gateway_for("http://127.0.0.1:1");

        let result = gateway
            .send(request(UpstreamMethod::Get, "inventario", None, None))
            .await;
        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }
}
