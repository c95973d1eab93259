//! REST transport: one authenticated GET per RPC

use qstor_domain::constants::{API_PATH, API_PORT};
use qstor_domain::{normalize_host, QuantaStorConfig, QuantaStorError, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::payload::Payload;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Issues `GET <base_url><endpoint>?<payload>` and validates the answer.
#[derive(Clone)]
pub struct RestTransport {
    http: HttpClient,
    base_url: Url,
}

impl RestTransport {
    /// Build a transport from validated configuration.
    ///
    /// # Errors
    /// [`QuantaStorError::InvalidAddress`] for a bad `san_ip`,
    /// [`QuantaStorError::Config`] for an unparsable `base_url` override.
    pub fn new(config: &QuantaStorConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout())
            .basic_auth(&config.san_login, &config.san_password)
            .accept_invalid_certs(!config.verify_ssl)
            .build()?;

        Ok(Self { http, base_url: api_base_url(config)? })
    }

    /// Root every endpoint is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Call `endpoint` and return the decoded JSON body.
    ///
    /// # Errors
    /// - [`QuantaStorError::Transport`] when the status is not 200
    /// - [`QuantaStorError::RemoteApi`] when the body carries `RestError`
    /// - [`QuantaStorError::Network`] for connection and decode failures
    pub async fn call(&self, endpoint: &str, payload: &Payload) -> Result<Value> {
        let url = self.base_url.join(endpoint).map_err(InfraError::from)?;
        debug!(endpoint, %payload, "calling QuantaStor API");

        let request = self.http.request(Method::GET, url).query(payload.as_query());
        let response = self.http.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(QuantaStorError::Transport {
                endpoint: endpoint.to_string(),
                payload: payload.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(InfraError::from)?;
        if let Some(rest_error) = body.as_object().and_then(|obj| obj.get("RestError")) {
            return Err(QuantaStorError::RemoteApi {
                endpoint: endpoint.to_string(),
                payload: payload.to_string(),
                error: rest_error.as_str().map_or_else(|| rest_error.to_string(), str::to_string),
            });
        }

        Ok(body)
    }
}

/// `https://<host>:8153/qstorapi/`, or the configured override with a
/// trailing slash so endpoints join underneath it.
fn api_base_url(config: &QuantaStorConfig) -> Result<Url> {
    let raw = match config.base_url.as_deref() {
        Some(url) if url.ends_with('/') => url.to_string(),
        Some(url) => format!("{url}/"),
        None => format!("https://{}:{API_PORT}/{API_PATH}", normalize_host(&config.san_ip)?),
    };
    Url::parse(&raw).map_err(|err| InfraError::from(err).into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::quantastor::test_config;

    #[test]
    fn default_base_url_brackets_ipv6() {
        let v4 = QuantaStorConfig::new("10.0.0.5", "admin", "pw");
        assert_eq!(api_base_url(&v4).unwrap().as_str(), "https://10.0.0.5:8153/qstorapi/");

        let v6 = QuantaStorConfig::new("fe80::1", "admin", "pw");
        assert_eq!(api_base_url(&v6).unwrap().as_str(), "https://[fe80::1]:8153/qstorapi/");
    }

    #[test]
    fn override_gets_trailing_slash() {
        let mut config = QuantaStorConfig::new("10.0.0.5", "admin", "pw");
        config.base_url = Some("http://127.0.0.1:9000/qstorapi".into());
        assert_eq!(api_base_url(&config).unwrap().as_str(), "http://127.0.0.1:9000/qstorapi/");

        config.base_url = Some("::not a url::".into());
        assert!(matches!(api_base_url(&config), Err(QuantaStorError::Config(_))));
    }

    #[tokio::test]
    async fn sends_payload_as_query_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/qstorapi/storageVolumeGet"))
            .and(query_param("storageVolume", "vol-a"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "v-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = RestTransport::new(&test_config(&server.uri())).unwrap();
        let body = transport
            .call("storageVolumeGet", &Payload::new().str("storageVolume", "vol-a"))
            .await
            .unwrap();
        assert_eq!(body["id"], "v-1");
    }

    #[tokio::test]
    async fn non_200_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = RestTransport::new(&test_config(&server.uri())).unwrap();
        let err = transport.call("hostGet", &Payload::new().str("host", "h")).await.unwrap_err();

        match err {
            QuantaStorError::Transport { endpoint, payload, status } => {
                assert_eq!(endpoint, "hostGet");
                assert_eq!(payload, "host=h");
                assert_eq!(status, 404);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rest_error_in_body_is_remote_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"RestError": "object not found"})),
            )
            .mount(&server)
            .await;

        let transport = RestTransport::new(&test_config(&server.uri())).unwrap();
        let err = transport.call("storageVolumeGet", &Payload::new()).await.unwrap_err();
        assert!(
            matches!(err, QuantaStorError::RemoteApi { ref error, .. } if error == "object not found")
        );
    }

    #[tokio::test]
    async fn non_object_bodies_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(0)))
            .mount(&server)
            .await;

        let transport = RestTransport::new(&test_config(&server.uri())).unwrap();
        let body = transport.call("storageVolumeAclEnum", &Payload::new()).await.unwrap();
        assert_eq!(body, json!(0));
    }

    #[tokio::test]
    async fn invalid_json_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let transport = RestTransport::new(&test_config(&server.uri())).unwrap();
        let err = transport.call("storageSystemGet", &Payload::new()).await.unwrap_err();
        assert!(matches!(err, QuantaStorError::Network(_)), "got {err:?}");
    }
}
