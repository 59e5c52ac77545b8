//! Recorded request/response interactions.
//!
//! An [`Interaction`] is one fixture: the request mapping it answers, the
//! response mapping it replays, and the caller-defined variables attached to
//! it. Records are built from fixture JSON, from another record used as a
//! template, or from a captured live exchange.

use crate::exchange::{decode_base64url, encode_base64, HttpRequest, HttpResponse, ResponseArtifact};
use crate::merge::{merge_into, recursive_merge};
use crate::reference::{ReferenceResolver, FILE_REFERENCE_KEY};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Key of a record's identifier.
pub const ID_KEY: &str = "id";
/// Key naming the identifier of a template record.
pub const ID_REFERENCE_KEY: &str = "idReference";
/// Key of the consumer variables mapping.
pub const CONSUMER_KEY: &str = "consumer";
/// Key of the provider variables mapping.
pub const PROVIDER_KEY: &str = "provider";

const REQUEST_KEY: &str = "request";
const RESPONSE_KEY: &str = "response";
const METHOD_KEY: &str = "method";
const PATH_KEY: &str = "path";
const HEADERS_KEY: &str = "headers";
const BODY_KEY: &str = "body";
const DATA_KEY: &str = "data";
const STATUS_KEY: &str = "status";

/// How many nested interaction-level file references are followed.
const MAX_REFERENCE_DEPTH: usize = 8;

/// A single recorded interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    id: Option<String>,
    base_url: Option<String>,
    file_name: Option<String>,
    /// Matching path, relative to `base_url` when it applies
    path: Option<String>,
    method: Option<String>,
    request: Map<String, Value>,
    response: Map<String, Value>,
    consumer_variables: Map<String, Value>,
    provider_variables: Map<String, Value>,
    consumed: bool,
}

impl Interaction {
    /// Build a record from a fixture mapping.
    ///
    /// A `fileReference` on the mapping is loaded first and overlaid by the
    /// inline fields; the response mapping may carry its own reference.
    pub fn from_json(
        json: &Map<String, Value>,
        base_url: Option<&str>,
        file_name: Option<&str>,
        resolver: &ReferenceResolver<'_>,
    ) -> Self {
        let mut interaction = Self {
            base_url: base_url.map(String::from),
            file_name: file_name.map(String::from),
            ..Self::default()
        };
        interaction.apply_json(json, resolver);
        interaction
    }

    /// Value copy of `template`, with the consumed flag cleared.
    pub fn from_template(template: &Interaction) -> Self {
        Self {
            consumed: false,
            ..template.clone()
        }
    }

    /// Value copy of `template` with `json` overlaid on top of it.
    pub fn from_template_with(
        template: &Interaction,
        json: &Map<String, Value>,
        file_name: Option<&str>,
        resolver: &ReferenceResolver<'_>,
    ) -> Self {
        let mut interaction = Self::from_template(template);
        if let Some(name) = file_name {
            interaction.file_name = Some(name.to_string());
        }
        interaction.apply_json(json, resolver);
        interaction
    }

    /// Build a record from a live request/response pair.
    ///
    /// Bodies that parse as JSON are stored structurally; anything else is
    /// stored base64-encoded. Upload bytes are kept separately under `data`.
    pub fn from_capture(
        request: &HttpRequest,
        upload: Option<&[u8]>,
        response: &HttpResponse,
        response_body: Option<&[u8]>,
        base_url: Option<&str>,
    ) -> Self {
        let mut request_json = Map::new();
        request_json.insert(METHOD_KEY.to_string(), Value::from(request.method.as_str()));
        request_json.insert(PATH_KEY.to_string(), Value::from(request.url.as_str()));
        if !request.headers.is_empty() {
            request_json.insert(HEADERS_KEY.to_string(), string_map(&request.headers));
        }
        if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
            let value = serde_json::from_slice(body)
                .unwrap_or_else(|_| Value::String(encode_base64(body)));
            request_json.insert(BODY_KEY.to_string(), value);
        }
        if let Some(upload) = upload {
            request_json.insert(DATA_KEY.to_string(), Value::String(encode_base64(upload)));
        }

        let mut response_json = Map::new();
        response_json.insert(STATUS_KEY.to_string(), Value::from(response.status));
        response_json.insert(HEADERS_KEY.to_string(), string_map(&response.headers));
        if let Some(body) = response_body.filter(|b| !b.is_empty()) {
            match serde_json::from_slice::<Value>(body) {
                Ok(value) => response_json.insert(BODY_KEY.to_string(), value),
                Err(_) => response_json.insert(DATA_KEY.to_string(), Value::String(encode_base64(body))),
            };
        }

        let mut interaction = Self {
            base_url: base_url.map(String::from),
            request: request_json,
            response: response_json,
            ..Self::default()
        };
        interaction.refresh_route();
        interaction
    }

    fn apply_json(&mut self, json: &Map<String, Value>, resolver: &ReferenceResolver<'_>) {
        let json = expand_nested(json, resolver, 0);

        if let Some(Value::Object(request)) = json.get(REQUEST_KEY) {
            merge_into(&mut self.request, request);
            self.refresh_route();
        }

        if let Some(Value::Object(response)) = json.get(RESPONSE_KEY) {
            let mut response = resolver.expand(response);
            response.remove(FILE_REFERENCE_KEY);
            if response.contains_key(BODY_KEY) {
                self.response.remove(DATA_KEY);
            } else if response.contains_key(DATA_KEY) {
                self.response.remove(BODY_KEY);
            }
            merge_into(&mut self.response, &response);
        }

        if let Some(Value::Object(vars)) = json.get(CONSUMER_KEY) {
            merge_into(&mut self.consumer_variables, vars);
        }

        if let Some(Value::Object(vars)) = json.get(PROVIDER_KEY) {
            merge_into(&mut self.provider_variables, vars);
        }

        if let Some(id) = json.get(ID_KEY).and_then(Value::as_str) {
            self.id = Some(id.to_string());
        }
    }

    /// Re-derive the matching keys from the stored request mapping.
    fn refresh_route(&mut self) {
        self.method = self
            .request
            .get(METHOD_KEY)
            .and_then(Value::as_str)
            .map(String::from);

        let full = self.request.get(PATH_KEY).and_then(Value::as_str);
        self.path = match (full, self.base_url.as_deref()) {
            (Some(full), Some(base)) => Some(full.strip_prefix(base).unwrap_or(full).to_string()),
            (Some(full), None) => Some(full.to_string()),
            (None, _) => None,
        };
    }

    /// Identifier, if the fixture declared one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Name of the document this record was loaded from.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Matching path, relative to the base URL when one applied.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Stored request mapping. Its path is never base-URL-stripped.
    pub fn request(&self) -> &Map<String, Value> {
        &self.request
    }

    pub fn response(&self) -> &Map<String, Value> {
        &self.response
    }

    pub fn request_headers(&self) -> Option<&Map<String, Value>> {
        self.request.get(HEADERS_KEY).and_then(Value::as_object)
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.request.get(BODY_KEY)
    }

    pub fn response_headers(&self) -> Option<&Map<String, Value>> {
        self.response.get(HEADERS_KEY).and_then(Value::as_object)
    }

    pub fn response_body(&self) -> Option<&Value> {
        self.response.get(BODY_KEY)
    }

    /// Response status code, if present and a valid `u16`.
    pub fn status(&self) -> Option<u16> {
        self.response
            .get(STATUS_KEY)
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    pub fn consumer_variables(&self) -> &Map<String, Value> {
        &self.consumer_variables
    }

    pub fn provider_variables(&self) -> &Map<String, Value> {
        &self.provider_variables
    }

    pub fn consumer_variable(&self, key: &str) -> Option<&Value> {
        self.consumer_variables.get(key)
    }

    pub fn provider_variable(&self, key: &str) -> Option<&Value> {
        self.provider_variables.get(key)
    }

    pub fn set_consumer_variable(&mut self, key: impl Into<String>, value: Value) {
        self.consumer_variables.insert(key.into(), value);
    }

    pub fn set_provider_variable(&mut self, key: impl Into<String>, value: Value) {
        self.provider_variables.insert(key.into(), value);
    }

    /// Whether a catalog lookup has already handed this record out.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub(crate) fn set_consumed(&mut self, consumed: bool) {
        self.consumed = consumed;
    }

    /// Whether this record answers `request`.
    pub fn matches(&self, request: &HttpRequest) -> bool {
        self.matches_route(&request.method, &request.url)
    }

    /// Method equality plus suffix match of `url` against the stored path.
    pub fn matches_route(&self, method: &str, url: &str) -> bool {
        match (self.method.as_deref(), self.path.as_deref()) {
            (Some(own_method), Some(own_path)) => own_method == method && url.ends_with(own_path),
            _ => false,
        }
    }

    /// Fixture mapping for this record.
    ///
    /// Loading the result with [`Interaction::from_json`] yields an
    /// equivalent record; file references are already expanded.
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(REQUEST_KEY.to_string(), Value::Object(self.request.clone()));
        payload.insert(RESPONSE_KEY.to_string(), Value::Object(self.response.clone()));

        if let Some(id) = &self.id {
            payload.insert(ID_KEY.to_string(), Value::String(id.clone()));
        }
        if !self.consumer_variables.is_empty() {
            payload.insert(CONSUMER_KEY.to_string(), Value::Object(self.consumer_variables.clone()));
        }
        if !self.provider_variables.is_empty() {
            payload.insert(PROVIDER_KEY.to_string(), Value::Object(self.provider_variables.clone()));
        }

        payload
    }

    /// Rebuild the stub response.
    ///
    /// Returns `None` when the status is missing or invalid, or the stored
    /// path is not a URL.
    pub fn to_response_artifact(&self) -> Option<ResponseArtifact> {
        let url = self.path.as_deref().filter(|p| is_url(p))?;
        let Some(status) = self.status() else {
            debug!(id = ?self.id, "Response has no usable status");
            return None;
        };

        let headers = self
            .response_headers()
            .map(|headers| {
                headers
                    .iter()
                    .filter_map(|(name, value)| header_value(value).map(|v| (name.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();

        Some(ResponseArtifact {
            url: url.to_string(),
            status,
            headers,
            body: self.response_bytes(),
        })
    }

    fn response_bytes(&self) -> Vec<u8> {
        if let Some(body) = self.response_body() {
            if let Ok(bytes) = serde_json::to_vec(body) {
                return bytes;
            }
        }

        match self.response.get(DATA_KEY).and_then(Value::as_str) {
            Some(data) => decode_base64url(data).unwrap_or_else(|| {
                warn!(id = ?self.id, "Response data is not valid base64");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }
}

/// Expand interaction-level references, following nested ones.
fn expand_nested(
    json: &Map<String, Value>,
    resolver: &ReferenceResolver<'_>,
    depth: usize,
) -> Map<String, Value> {
    match resolver.resolve(json) {
        Some(_) if depth >= MAX_REFERENCE_DEPTH => {
            warn!(depth, "File reference chain too deep, ignoring the rest");
            json.clone()
        }
        Some(base) => recursive_merge(&expand_nested(&base, resolver, depth + 1), json),
        None => json.clone(),
    }
}

fn string_map(map: &HashMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn header_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts absolute and relative URL references made of legal URL characters.
fn is_url(candidate: &str) -> bool {
    static URL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    URL_PATTERN
        .get_or_init(|| Regex::new(r"^(?:[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{FsFileProvider, MemoryFileProvider};
    use serde_json::json;
    use std::path::Path;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn load(value: Value, base_url: Option<&str>) -> Interaction {
        let provider = FsFileProvider;
        let resolver = ReferenceResolver::new(&provider, None);
        Interaction::from_json(&object(value), base_url, Some("test.json"), &resolver)
    }

    fn users_fixture() -> Value {
        json!({
            "id": "list-users",
            "request": {
                "method": "GET",
                "path": "https://api.test/v1/users",
                "headers": {"Accept": "application/json"}
            },
            "response": {
                "status": 200,
                "headers": {"Content-Type": "application/json"},
                "body": {"users": [{"name": "Ann"}]}
            },
            "consumer": {"token": "abc"},
            "provider": {"state": "has users"}
        })
    }

    #[test]
    fn test_from_json_fields() {
        let interaction = load(users_fixture(), None);

        assert_eq!(interaction.id(), Some("list-users"));
        assert_eq!(interaction.method(), Some("GET"));
        assert_eq!(interaction.path(), Some("https://api.test/v1/users"));
        assert_eq!(interaction.status(), Some(200));
        assert_eq!(interaction.file_name(), Some("test.json"));
        assert_eq!(interaction.consumer_variable("token"), Some(&json!("abc")));
        assert_eq!(interaction.provider_variable("state"), Some(&json!("has users")));
        assert!(!interaction.is_consumed());
    }

    #[test]
    fn test_base_url_stripped_for_matching_only() {
        let interaction = load(users_fixture(), Some("https://api.test"));

        assert_eq!(interaction.path(), Some("/v1/users"));
        assert_eq!(
            interaction.request()["path"],
            json!("https://api.test/v1/users")
        );
    }

    #[test]
    fn test_base_url_not_a_prefix() {
        let interaction = load(users_fixture(), Some("https://other.test"));
        assert_eq!(interaction.path(), Some("https://api.test/v1/users"));
    }

    #[test]
    fn test_payload_round_trip() {
        let fixture = users_fixture();
        let interaction = load(fixture.clone(), None);

        assert_eq!(Value::Object(interaction.payload()), fixture);

        let reloaded = load(Value::Object(interaction.payload()), None);
        assert_eq!(reloaded, interaction);
    }

    #[test]
    fn test_payload_omits_empty_parts() {
        let interaction = load(
            json!({"request": {"method": "GET", "path": "/a"}, "response": {"status": 204}}),
            None,
        );
        let payload = interaction.payload();

        assert_eq!(payload.len(), 2);
        assert!(payload.contains_key("request"));
        assert!(payload.contains_key("response"));
    }

    #[test]
    fn test_suffix_matching() {
        let interaction = load(
            json!({"request": {"method": "GET", "path": "/v1/users"}, "response": {"status": 200}}),
            None,
        );

        assert!(interaction.matches(&HttpRequest::new("GET", "https://host:8080/api/v1/users")));
        assert!(interaction.matches(&HttpRequest::new("GET", "http://localhost/v1/users")));
        assert!(!interaction.matches(&HttpRequest::new("GET", "https://host:8080/v1/users/extra")));
        assert!(!interaction.matches(&HttpRequest::new("POST", "https://host:8080/api/v1/users")));

        assert!(interaction.matches_route("GET", "/api/v1/users"));
        assert!(!interaction.matches_route("PUT", "/api/v1/users"));
    }

    #[test]
    fn test_no_method_never_matches() {
        let interaction = load(json!({"request": {"path": "/v1"}, "response": {"status": 200}}), None);
        assert!(!interaction.matches_route("GET", "/v1"));
    }

    #[test]
    fn test_template_copy_is_independent() {
        let template = load(users_fixture(), None);
        let mut copy = Interaction::from_template(&template);
        copy.set_consumer_variable("token", json!("changed"));
        copy.set_consumed(true);

        assert_eq!(template.consumer_variable("token"), Some(&json!("abc")));
        assert!(!template.is_consumed());
    }

    #[test]
    fn test_template_overlay() {
        let template = load(users_fixture(), None);
        let provider = FsFileProvider;
        let resolver = ReferenceResolver::new(&provider, None);
        let overlay = object(json!({"response": {"status": 404}, "consumer": {"extra": 1}}));

        let derived = Interaction::from_template_with(&template, &overlay, Some("other.json"), &resolver);

        assert_eq!(derived.status(), Some(404));
        assert_eq!(derived.method(), Some("GET"));
        assert_eq!(derived.path(), template.path());
        assert_eq!(derived.response_body(), template.response_body());
        assert_eq!(derived.consumer_variable("token"), Some(&json!("abc")));
        assert_eq!(derived.consumer_variable("extra"), Some(&json!(1)));
        assert_eq!(derived.file_name(), Some("other.json"));
        assert_eq!(template.status(), Some(200));
    }

    #[test]
    fn test_template_switches_body_representation() {
        let provider = FsFileProvider;
        let resolver = ReferenceResolver::new(&provider, None);

        let json_stub = load(
            json!({"request": {"method": "GET", "path": "/a"}, "response": {"status": 200, "body": {"k": 1}}}),
            None,
        );
        let overlay = object(json!({"response": {"data": "aGVsbG8"}}));
        let binary = Interaction::from_template_with(&json_stub, &overlay, None, &resolver);

        assert!(binary.response_body().is_none());
        assert_eq!(binary.status(), Some(200));
        assert_eq!(binary.to_response_artifact().unwrap().body, b"hello");

        let overlay = object(json!({"response": {"body": {"k": 2}}}));
        let back_to_json = Interaction::from_template_with(&binary, &overlay, None, &resolver);

        assert!(!back_to_json.response().contains_key("data"));
        assert_eq!(back_to_json.to_response_artifact().unwrap().body, br#"{"k":2}"#);
    }

    #[test]
    fn test_capture_null_body_replays() {
        let request = HttpRequest::new("GET", "https://api.test/nothing");
        let interaction =
            Interaction::from_capture(&request, None, &HttpResponse::new(200), Some(b"null"), None);

        assert_eq!(interaction.response_body(), Some(&Value::Null));
        assert_eq!(interaction.to_response_artifact().unwrap().body, b"null");
    }

    #[test]
    fn test_template_request_override_keeps_route() {
        let template = load(users_fixture(), Some("https://api.test"));
        let provider = FsFileProvider;
        let resolver = ReferenceResolver::new(&provider, None);
        let overlay = object(json!({"request": {"headers": {"Accept": "text/plain"}}}));

        let derived = Interaction::from_template_with(&template, &overlay, None, &resolver);

        assert_eq!(derived.path(), Some("/v1/users"));
        assert_eq!(derived.method(), Some("GET"));
        assert_eq!(derived.request_headers().unwrap()["Accept"], json!("text/plain"));
    }

    #[test]
    fn test_file_references() {
        let provider = MemoryFileProvider::new()
            .with_file(
                "/fx/users.json",
                r#"{"id": "base", "request": {"method": "GET", "path": "/v1/users"}}"#,
            )
            .with_file(
                "/fx/users-response.json",
                r#"{"status": 200, "headers": {"X-Base": "1"}, "body": {"users": []}}"#,
            );
        let resolver = ReferenceResolver::new(&provider, Some(Path::new("/fx")));
        let json = object(json!({
            "fileReference": "users.json",
            "id": "inline",
            "response": {"fileReference": "users-response.json", "headers": {"X-Inline": "2"}}
        }));

        let interaction = Interaction::from_json(&json, None, None, &resolver);

        assert_eq!(interaction.id(), Some("inline"));
        assert_eq!(interaction.path(), Some("/v1/users"));
        assert_eq!(interaction.status(), Some(200));
        assert_eq!(
            interaction.response_headers().unwrap(),
            &object(json!({"X-Base": "1", "X-Inline": "2"}))
        );
        assert!(!interaction.response().contains_key("fileReference"));
        assert!(!interaction.payload().contains_key("fileReference"));
    }

    #[test]
    fn test_nested_interaction_references() {
        let provider = MemoryFileProvider::new()
            .with_file("/fx/a.json", r#"{"fileReference": "b.json", "response": {"status": 201}}"#)
            .with_file("/fx/b.json", r#"{"request": {"method": "POST", "path": "/items"}, "response": {"status": 500}}"#);
        let resolver = ReferenceResolver::new(&provider, Some(Path::new("/fx")));

        let interaction =
            Interaction::from_json(&object(json!({"fileReference": "a.json"})), None, None, &resolver);

        assert_eq!(interaction.method(), Some("POST"));
        assert_eq!(interaction.status(), Some(201));
    }

    #[test]
    fn test_self_reference_terminates() {
        let provider = MemoryFileProvider::new().with_file(
            "/fx/loop.json",
            r#"{"fileReference": "loop.json", "request": {"method": "GET", "path": "/loop"}}"#,
        );
        let resolver = ReferenceResolver::new(&provider, Some(Path::new("/fx")));

        let interaction =
            Interaction::from_json(&object(json!({"fileReference": "loop.json"})), None, None, &resolver);
        assert_eq!(interaction.path(), Some("/loop"));
    }

    #[test]
    fn test_missing_reference_uses_inline() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FsFileProvider;
        let resolver = ReferenceResolver::new(&provider, Some(dir.path()));
        let json = object(json!({
            "fileReference": "missing.json",
            "request": {"method": "GET", "path": "/a"},
            "response": {"status": 200}
        }));

        let interaction = Interaction::from_json(&json, None, None, &resolver);
        assert_eq!(interaction.path(), Some("/a"));
        assert_eq!(interaction.status(), Some(200));
    }

    #[test]
    fn test_response_artifact_json_body() {
        let interaction = load(users_fixture(), Some("https://api.test"));
        let artifact = interaction.to_response_artifact().unwrap();

        assert_eq!(artifact.status, 200);
        assert_eq!(artifact.url, "/v1/users");
        assert_eq!(artifact.headers.get("Content-Type").unwrap(), "application/json");
        let body: Value = serde_json::from_slice(&artifact.body).unwrap();
        assert_eq!(body, json!({"users": [{"name": "Ann"}]}));
    }

    #[test]
    fn test_response_artifact_data_fallback() {
        // "hello?>" in base64url without padding
        let interaction = load(
            json!({
                "request": {"method": "GET", "path": "/raw"},
                "response": {"status": 200, "data": "aGVsbG8_Pg"}
            }),
            None,
        );

        let artifact = interaction.to_response_artifact().unwrap();
        assert_eq!(artifact.body, b"hello?>");
    }

    #[test]
    fn test_response_artifact_empty_body() {
        let interaction = load(
            json!({"request": {"method": "DELETE", "path": "/a"}, "response": {"status": 204}}),
            None,
        );

        let artifact = interaction.to_response_artifact().unwrap();
        assert!(artifact.body.is_empty());
        assert!(artifact.headers.is_empty());
    }

    #[test]
    fn test_missing_status_is_absent() {
        let interaction = load(
            json!({"request": {"method": "GET", "path": "/a"}, "response": {"body": {"ok": true}}}),
            None,
        );
        assert!(interaction.to_response_artifact().is_none());

        let interaction = load(
            json!({"request": {"method": "GET", "path": "/a"}, "response": {"status": "200"}}),
            None,
        );
        assert!(interaction.to_response_artifact().is_none());
    }

    #[test]
    fn test_invalid_url_is_absent() {
        let interaction = load(
            json!({"request": {"method": "GET", "path": "/has space"}, "response": {"status": 200}}),
            None,
        );
        assert!(interaction.to_response_artifact().is_none());

        let interaction = load(json!({"response": {"status": 200}}), None);
        assert!(interaction.to_response_artifact().is_none());
    }

    #[test]
    fn test_capture_json_exchange() {
        let request = HttpRequest::new("POST", "https://api.test/v1/users")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"name": "Ann"}"#);
        let response = HttpResponse::new(201).with_header("Location", "/v1/users/1");

        let interaction = Interaction::from_capture(
            &request,
            None,
            &response,
            Some(br#"{"id": 1}"#),
            Some("https://api.test"),
        );

        assert_eq!(interaction.path(), Some("/v1/users"));
        assert_eq!(interaction.request()["path"], json!("https://api.test/v1/users"));
        assert_eq!(interaction.request_body(), Some(&json!({"name": "Ann"})));
        assert_eq!(interaction.response_body(), Some(&json!({"id": 1})));
        assert!(!interaction.response().contains_key("data"));
        assert_eq!(interaction.status(), Some(201));
        assert!(interaction.matches(&request));
    }

    #[test]
    fn test_capture_binary_exchange() {
        let request = HttpRequest::new("PUT", "https://api.test/upload").with_body(vec![0xff, 0x00]);
        let response = HttpResponse::new(200);

        let interaction = Interaction::from_capture(
            &request,
            Some(&[1, 2, 3]),
            &response,
            Some(&[0xfb, 0xff, 0x00]),
            None,
        );

        assert_eq!(interaction.request_body(), Some(&json!("/wA=")));
        assert_eq!(interaction.request()["data"], json!("AQID"));
        assert!(interaction.response_body().is_none());
        assert_eq!(interaction.response()["data"], json!("+/8A"));
        assert!(interaction.request_headers().is_none());

        let artifact = interaction.to_response_artifact().unwrap();
        assert_eq!(artifact.body, vec![0xfb, 0xff, 0x00]);
    }
}
