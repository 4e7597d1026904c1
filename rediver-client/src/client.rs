//! Request construction and response shaping.

use crate::error::ApiClientError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use rediver_core::Credential;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Header carrying the admin credential on every authenticated call.
pub const API_KEY_HEADER: &str = "X-Admin-API-Key";
/// Used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Method, query, body and extra headers for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn patch() -> Self {
        Self::with_method(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiClientError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiClientError::invalid_request(format!("Invalid request body: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query<Q: Serialize>(mut self, params: &Q) -> Result<Self, ApiClientError> {
        self.query.extend(query_pairs(params)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Flatten a serializable params struct into query pairs, skipping nulls.
pub fn query_pairs<Q: Serialize>(params: &Q) -> Result<Vec<(String, String)>, ApiClientError> {
    let value = serde_json::to_value(params)
        .map_err(|err| ApiClientError::invalid_request(format!("Invalid query: {err}")))?;
    let serde_json::Value::Object(map) = value else {
        return Err(ApiClientError::invalid_request(
            "Query parameters must serialize to an object",
        ));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::String(s) => pairs.push((key, s)),
            other => pairs.push((key, other.to_string())),
        }
    }
    Ok(pairs)
}

/// Admin API client. Cheap to clone; clones share the credential slot, so a
/// key set by the session store is seen by every page.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    api_key: Arc<RwLock<Option<Credential>>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: Arc::new(RwLock::new(None)),
        }
    }

    /// Client over reqwest for `base_url` with the fixed timeout.
    pub fn connect(base_url: &str) -> Result<Self, ApiClientError> {
        let transport = ReqwestTransport::new(base_url, REQUEST_TIMEOUT)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn set_api_key(&self, key: Option<Credential>) {
        let mut slot = self.api_key.write().unwrap_or_else(|e| e.into_inner());
        *slot = key;
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn current_key(&self) -> Option<Credential> {
        self.api_key
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Issue one call and shape the response into `T`.
    ///
    /// 2xx with a body decodes as `T`; `204` (or an empty 2xx body) decodes
    /// from JSON `null`, so `()`, `Option<_>` and `Value` callers get their
    /// empty value. Anything else is an [`ApiClientError`] carrying the status.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiClientError> {
        let request = self.build_request(endpoint, options)?;
        let method = request.method.clone();
        tracing::debug!(%method, endpoint, "api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, endpoint, error = %err, "api transport failure");
                return Err(err);
            }
        };

        let status = response.status;
        let shaped = shape_response(response);
        if let Err(err) = &shaped {
            tracing::warn!(
                %method,
                endpoint,
                status = status.as_u16(),
                code = err.code(),
                "api call failed"
            );
        }
        shaped
    }

    fn build_request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if let Some(key) = self.current_key() {
            let mut value = HeaderValue::from_str(key.expose())
                .map_err(|_| ApiClientError::invalid_request("API key is not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static("x-admin-api-key"), value);
        }

        let body = match options.body {
            Some(value) => Some(serde_json::to_vec(&value).map_err(|err| {
                ApiClientError::invalid_request(format!("Invalid request body: {err}"))
            })?),
            None => None,
        };

        let path = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{endpoint}")
        };

        Ok(HttpRequest {
            method: options.method,
            path,
            query: options.query,
            headers,
            body,
        })
    }
}

pub(crate) fn shape_response<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<T, ApiClientError> {
    let status = response.status;
    if !status.is_success() {
        return Err(ApiClientError::from_response(status, &response.body));
    }

    if status == StatusCode::NO_CONTENT || response.body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(serde_json::Value::Null)
            .map_err(|err| ApiClientError::decode(status, err));
    }

    serde_json::from_slice(&response.body).map_err(|err| ApiClientError::decode(status, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        name: String,
    }

    #[test]
    fn test_shape_parses_success_body() {
        let response = HttpResponse::new(StatusCode::CREATED, r#"{"name":"a"}"#);
        let thing: Thing = shape_response(response).unwrap();
        assert_eq!(thing.name, "a");
    }

    #[test]
    fn test_shape_204_is_empty() {
        let unit: () = shape_response(HttpResponse::new(StatusCode::NO_CONTENT, "")).unwrap();
        assert_eq!(unit, ());
        let none: Option<Thing> =
            shape_response(HttpResponse::new(StatusCode::NO_CONTENT, "")).unwrap();
        assert!(none.is_none());
        let value: serde_json::Value =
            shape_response(HttpResponse::new(StatusCode::NO_CONTENT, "")).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_shape_204_into_required_type_is_decode_error() {
        let err = shape_response::<Thing>(HttpResponse::new(StatusCode::NO_CONTENT, "")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Decode);
        assert_eq!(err.status(), Some(204));
    }

    #[test]
    fn test_query_pairs_skip_nulls() {
        #[derive(Serialize)]
        struct Q {
            a: Option<u32>,
            b: Option<String>,
            c: bool,
        }
        let pairs = query_pairs(&Q {
            a: Some(3),
            b: None,
            c: false,
        })
        .unwrap();
        assert_eq!(
            pairs,
            vec![("a".to_string(), "3".to_string()), ("c".to_string(), "false".to_string())]
        );
    }

    #[test]
    fn test_query_pairs_reject_scalars() {
        assert!(query_pairs(&5u32).is_err());
    }
}
