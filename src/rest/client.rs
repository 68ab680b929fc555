//! REST transport for the JIRA API.
//!
//! This module provides the [`RestClient`] type, which performs one
//! authenticated HTTP exchange per call and yields parsed JSON or a
//! structured failure. It is the only place in the crate that touches the
//! network.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::auth::Credentials;
use crate::config::BaseUrl;
use crate::rest::attachment::{AttachmentContent, NewAttachment};
use crate::rest::errors::{ResponseError, RestError};

/// Anti-CSRF header required by JIRA for multipart uploads.
const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// A REST client that speaks JSON to a JIRA server.
///
/// The client owns a base URL and a `reqwest::Client`; every request URI is
/// built by appending a relative path to that base. When credentials are
/// configured they are attached to every outgoing request, and a session
/// credential is lazily initialized before the first call that needs it.
///
/// The client performs no caching, no retries, and imposes no timeout of its
/// own; cancellation and timeouts are whatever the underlying
/// `reqwest::Client` is configured with. Each method issues exactly one HTTP
/// exchange and completes before returning.
///
/// Cloning is cheap and shares both the HTTP connection pool and the
/// credential state.
///
/// # Example
///
/// ```rust,ignore
/// use jira_api::{BaseUrl, Credentials, RestClient};
///
/// let base = BaseUrl::new("https://jira.example.com")?;
/// let client = RestClient::with_credentials(base, Credentials::basic("bob", "secret"));
///
/// let issue = client.get_object("rest/api/2/issue/PROJ-1").await?;
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    /// The internal reqwest HTTP client.
    http: reqwest::Client,
    /// Base URL every request path is appended to.
    base: BaseUrl,
    /// Credentials attached to each request, if configured.
    credentials: Option<Arc<Credentials>>,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

/// Request body shapes the transport can send.
enum Payload {
    /// A well-formed JSON document.
    Json(Value),
    /// A pre-rendered string sent verbatim with a JSON content type.
    Raw(String),
    /// A multipart form with one `file` part per attachment.
    Multipart(Vec<NewAttachment>),
}

impl RestClient {
    /// Creates an unauthenticated client for the given base URL.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(base: BaseUrl) -> Self {
        Self::build(default_http_client(), base, None)
    }

    /// Creates an authenticated client for the given base URL.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn with_credentials(base: BaseUrl, credentials: Credentials) -> Self {
        Self::build(default_http_client(), base, Some(credentials))
    }

    /// Creates a client backed by a caller-supplied `reqwest::Client`.
    ///
    /// Use this to control timeouts, proxies, or TLS settings; the transport
    /// itself imposes none.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        base: BaseUrl,
        credentials: Option<Credentials>,
    ) -> Self {
        Self::build(http, base, credentials)
    }

    fn build(http: reqwest::Client, base: BaseUrl, credentials: Option<Credentials>) -> Self {
        Self {
            http,
            base,
            credentials: credentials.map(Arc::new),
        }
    }

    /// Returns the base URL of this client.
    #[must_use]
    pub const fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Returns the configured credentials, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_deref()
    }

    /// Exposes the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Builds a full request URI from a relative path and ordered query
    /// parameters.
    ///
    /// The path is appended to the base URL verbatim; parameters are appended
    /// in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::UriSyntax`] when the composed string is not a
    /// valid URI.
    pub fn build_uri(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, RestError> {
        let composed = format!("{}{}", self.base, path);
        let mut url = Url::parse(&composed).map_err(|source| RestError::UriSyntax {
            uri: composed.clone(),
            source,
        })?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    /// Executes an HTTP GET expecting a JSON object.
    ///
    /// Returns `None` when the response body is empty (zero length), which is
    /// distinct from an empty object `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Response`] for status codes of 300 and above,
    /// [`RestError::Network`] when the server could not be reached, and
    /// [`RestError::Decode`]/[`RestError::UnexpectedJson`] when a successful
    /// body is not a JSON object.
    pub async fn get_object(&self, path: &str) -> Result<Option<Value>, RestError> {
        self.get_object_with_params(path, &[]).await
    }

    /// Executes an HTTP GET with query parameters, expecting a JSON object.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`].
    pub async fn get_object_with_params(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, params)?;
        let body = self.execute(Method::GET, url, None).await?;
        parse_json(body, "object", Value::is_object)
    }

    /// Executes an HTTP GET expecting a JSON array.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`]; the body must be a JSON array instead.
    pub async fn get_array(&self, path: &str) -> Result<Option<Value>, RestError> {
        self.get_array_with_params(path, &[]).await
    }

    /// Executes an HTTP GET with query parameters, expecting a JSON array.
    ///
    /// # Errors
    ///
    /// See [`Self::get_array`].
    pub async fn get_array_with_params(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, params)?;
        let body = self.execute(Method::GET, url, None).await?;
        parse_json(body, "array", Value::is_array)
    }

    /// Executes an HTTP POST with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`].
    pub async fn post(&self, path: &str, payload: &Value) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, &[])?;
        let body = self
            .execute(Method::POST, url, Some(Payload::Json(payload.clone())))
            .await?;
        parse_json(body, "object", Value::is_object)
    }

    /// Executes an HTTP POST with an empty JSON object `{}` as the payload.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`].
    pub async fn post_empty(&self, path: &str) -> Result<Option<Value>, RestError> {
        self.post(path, &Value::Object(serde_json::Map::new())).await
    }

    /// Executes an HTTP POST whose payload is sent as a JSON *string
    /// literal*: the body is wrapped in quotes rather than structured JSON.
    ///
    /// At least one JIRA REST endpoint expects this malformed shape
    /// (JRA-29304). Do not use this method where well-formed JSON is
    /// expected.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`].
    pub async fn post_raw_string(
        &self,
        path: &str,
        payload: &str,
    ) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, &[])?;
        let body = self
            .execute(Method::POST, url, Some(Payload::Raw(quote_payload(payload))))
            .await?;
        parse_json(body, "object", Value::is_object)
    }

    /// Executes a multipart HTTP POST uploading the given attachments.
    ///
    /// Sets the `X-Atlassian-Token: nocheck` header and adds one named `file`
    /// part per attachment. Attachment content is read exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidAttachment`] when an attachment has no
    /// content, [`RestError::AttachmentIo`] when its content cannot be read,
    /// and otherwise the errors of [`Self::get_object`].
    pub async fn post_attachments(
        &self,
        path: &str,
        attachments: Vec<NewAttachment>,
    ) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, &[])?;
        let body = self
            .execute(Method::POST, url, Some(Payload::Multipart(attachments)))
            .await?;
        // The attachments endpoint answers with an array of created records
        parse_json(body, "object or array", |v| v.is_object() || v.is_array())
    }

    /// Executes an HTTP PUT with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`].
    pub async fn put(&self, path: &str, payload: &Value) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, &[])?;
        let body = self
            .execute(Method::PUT, url, Some(Payload::Json(payload.clone())))
            .await?;
        parse_json(body, "object", Value::is_object)
    }

    /// Executes an HTTP DELETE.
    ///
    /// # Errors
    ///
    /// See [`Self::get_object`].
    pub async fn delete(&self, path: &str) -> Result<Option<Value>, RestError> {
        self.prepare().await?;
        let url = self.build_uri(path, &[])?;
        let body = self.execute(Method::DELETE, url, None).await?;
        parse_json(body, "object", Value::is_object)
    }

    /// POST used by the credential lifecycle itself; bypasses lazy session
    /// establishment to avoid re-entering it.
    pub(crate) async fn raw_post(
        &self,
        path: &str,
        payload: &Value,
    ) -> Result<Option<Value>, RestError> {
        let url = self.build_uri(path, &[])?;
        let body = self
            .execute(Method::POST, url, Some(Payload::Json(payload.clone())))
            .await?;
        parse_json(body, "object", Value::is_object)
    }

    /// DELETE used by the credential lifecycle itself.
    pub(crate) async fn raw_delete(&self, path: &str) -> Result<Option<Value>, RestError> {
        let url = self.build_uri(path, &[])?;
        let body = self.execute(Method::DELETE, url, None).await?;
        parse_json(body, "object", Value::is_object)
    }

    /// Runs lazy session establishment when a session credential is
    /// configured. A no-op for anonymous and basic-auth clients.
    async fn prepare(&self) -> Result<(), RestError> {
        if let Some(credentials) = &self.credentials {
            credentials.initialize(self).await?;
        }
        Ok(())
    }

    /// Performs one HTTP exchange and returns the raw body text, or `None`
    /// for an empty body.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        payload: Option<Payload>,
    ) -> Result<Option<String>, RestError> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");

        request = match payload {
            None => request,
            Some(Payload::Json(value)) => request.json(&value),
            Some(Payload::Raw(text)) => request
                .header(CONTENT_TYPE, "application/json")
                .body(text),
            Some(Payload::Multipart(attachments)) => request
                .header(ATLASSIAN_TOKEN_HEADER, "nocheck")
                .multipart(build_multipart_form(attachments).await?),
        };

        if let Some(credentials) = &self.credentials {
            request = credentials.authenticate(request).await;
        }

        tracing::debug!(%method, %url, "sending request");

        let response = request.send().await?;
        let status = response.status();
        let headers = parse_response_headers(response.headers());

        // reqwest's text() decodes using the charset advertised by the
        // response Content-Type header, falling back to UTF-8.
        let body = response.text().await?;

        if status.as_u16() >= 300 {
            return Err(ResponseError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
                headers,
            }
            .into());
        }

        Ok(if body.is_empty() { None } else { Some(body) })
    }
}

fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .use_rustls_tls()
        .build()
        .expect("Failed to create HTTP client")
}

/// Wraps a raw payload in quotes so it is sent as a JSON string literal.
fn quote_payload(payload: &str) -> String {
    format!("\"{payload}\"")
}

/// Parses an optional body into JSON of the expected shape.
///
/// An absent (empty) body stays `None`; that is a valid outcome for every
/// transport method and distinct from `{}` or `[]`.
fn parse_json(
    body: Option<String>,
    expected: &'static str,
    is_expected_shape: impl Fn(&Value) -> bool,
) -> Result<Option<Value>, RestError> {
    match body {
        None => Ok(None),
        Some(text) => {
            let value: Value = serde_json::from_str(&text)?;
            if is_expected_shape(&value) {
                Ok(Some(value))
            } else {
                Err(RestError::UnexpectedJson { expected })
            }
        }
    }
}

/// Flattens response headers into a map of lowercase name to values.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

/// Builds the multipart form for an attachment upload, reading each
/// attachment's content exactly once.
async fn build_multipart_form(
    attachments: Vec<NewAttachment>,
) -> Result<reqwest::multipart::Form, RestError> {
    let mut form = reqwest::multipart::Form::new();

    for attachment in attachments {
        let NewAttachment { file_name, content } = attachment;

        let bytes = match content {
            Some(AttachmentContent::Bytes(bytes)) => bytes,
            Some(AttachmentContent::Reader(mut reader)) => {
                let mut buffer = Vec::new();
                reader
                    .read_to_end(&mut buffer)
                    .map_err(|source| RestError::AttachmentIo {
                        file_name: file_name.clone(),
                        source,
                    })?;
                buffer
            }
            Some(AttachmentContent::Path(path)) => {
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| RestError::AttachmentIo {
                        file_name: file_name.clone(),
                        source,
                    })?
            }
            None => return Err(RestError::InvalidAttachment { file_name }),
        };

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        form = form.part("file", part);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;

    fn test_client() -> RestClient {
        RestClient::new(BaseUrl::new("http://x/rest/api/2/").unwrap())
    }

    // === URI building ===

    #[test]
    fn test_build_uri_appends_path_to_base() {
        let client = test_client();
        let url = client.build_uri("issue/10001", &[]).unwrap();
        assert_eq!(url.as_str(), "http://x/rest/api/2/issue/10001");
    }

    #[test]
    fn test_build_uri_appends_query_parameter() {
        let client = test_client();
        let url = client
            .build_uri("issue/10001", &[("expand", "changelog")])
            .unwrap();
        assert_eq!(url.as_str(), "http://x/rest/api/2/issue/10001?expand=changelog");
    }

    #[test]
    fn test_build_uri_preserves_parameter_order() {
        let client = test_client();
        let url = client
            .build_uri("search", &[("jql", "project=TEST"), ("maxResults", "10")])
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.starts_with("jql="));
        assert!(query.contains("maxResults=10"));
    }

    #[test]
    fn test_build_uri_encodes_parameter_values() {
        let client = test_client();
        let url = client
            .build_uri("search", &[("jql", "project = TEST")])
            .unwrap();
        assert!(!url.as_str().contains("project = TEST"));
    }

    // === Body parsing ===

    #[test]
    fn test_parse_json_empty_body_is_none() {
        let result = parse_json(None, "object", Value::is_object).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_json_object_body() {
        let result = parse_json(Some(r#"{"id":"1"}"#.to_string()), "object", Value::is_object)
            .unwrap()
            .unwrap();
        assert_eq!(result["id"], "1");
    }

    #[test]
    fn test_parse_json_rejects_invalid_json() {
        let result = parse_json(Some("not json".to_string()), "object", Value::is_object);
        assert!(matches!(result, Err(RestError::Decode(_))));
    }

    #[test]
    fn test_parse_json_rejects_wrong_shape() {
        let result = parse_json(Some("[]".to_string()), "object", Value::is_object);
        assert!(matches!(
            result,
            Err(RestError::UnexpectedJson { expected: "object" })
        ));
    }

    #[test]
    fn test_parse_json_accepts_empty_array() {
        let result = parse_json(Some("[]".to_string()), "array", Value::is_array)
            .unwrap()
            .unwrap();
        assert_eq!(result, serde_json::json!([]));
    }

    // === Raw string payloads ===

    #[test]
    fn test_quote_payload_wraps_in_quotes() {
        assert_eq!(quote_payload("6.30"), "\"6.30\"");
        assert_eq!(quote_payload(""), "\"\"");
    }

    // === Multipart ===

    #[tokio::test]
    async fn test_multipart_rejects_attachment_without_content() {
        let attachment = NewAttachment {
            file_name: "report.txt".to_string(),
            content: None,
        };
        let result = build_multipart_form(vec![attachment]).await;
        assert!(matches!(
            result,
            Err(RestError::InvalidAttachment { file_name }) if file_name == "report.txt"
        ));
    }

    #[tokio::test]
    async fn test_multipart_accepts_bytes_and_reader() {
        let attachments = vec![
            NewAttachment::from_bytes("a.txt", b"abc".to_vec()),
            NewAttachment::from_reader("b.txt", std::io::Cursor::new(b"def".to_vec())),
        ];
        assert!(build_multipart_form(attachments).await.is_ok());
    }

    // === Construction ===

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestClient>();
    }

    #[test]
    fn test_client_without_credentials() {
        let client = test_client();
        assert!(client.credentials().is_none());
    }
}
