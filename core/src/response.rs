//! API response wrapper with lazily decoded top-level sections.
//!
//! Every Tumblr response is an envelope of the form
//! `{"meta": {...}, "response": {...}, "errors": [...]}`. `Response` keeps the
//! raw body and decodes the envelope on first use; later calls reuse the
//! memoized sections.

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::find_header;

/// The decoded top-level sections of a response body. A section that is
/// missing, or that has an unexpected JSON type, is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub meta: Option<Map<String, Value>>,
    pub result: Option<Map<String, Value>>,
    /// Kept as raw JSON: the API sends an array, older endpoints an object.
    pub errors: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct Response {
    body: Vec<u8>,
    headers: Vec<(String, String)>,
    sections: OnceLock<Sections>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct Envelope<T> {
    #[serde(default)]
    response: T,
}

impl Response {
    pub fn new(body: Vec<u8>, headers: Vec<(String, String)>) -> Self {
        Self {
            body,
            headers,
            sections: OnceLock::new(),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Decode the `meta`, `response` and `errors` sections.
    ///
    /// Fails with `EmptyBody` for a zero-length body and with `Decode` when
    /// the top level is not a JSON object. Once it has succeeded, further
    /// calls return the memoized sections without touching the body.
    pub fn populate(&self) -> Result<&Sections, ApiError> {
        if let Some(sections) = self.sections.get() {
            return Ok(sections);
        }
        if self.body.is_empty() {
            return Err(ApiError::EmptyBody);
        }
        let mut top: Map<String, Value> = serde_json::from_slice(&self.body)?;
        let sections = Sections {
            meta: take_object(&mut top, "meta"),
            result: take_object(&mut top, "response"),
            errors: top.remove("errors"),
        };
        Ok(self.sections.get_or_init(|| sections))
    }

    pub fn is_populated(&self) -> bool {
        self.sections.get().is_some()
    }

    pub fn meta(&self) -> Result<Option<&Map<String, Value>>, ApiError> {
        Ok(self.populate()?.meta.as_ref())
    }

    pub fn result(&self) -> Result<Option<&Map<String, Value>>, ApiError> {
        Ok(self.populate()?.result.as_ref())
    }

    pub fn errors(&self) -> Result<Option<&Value>, ApiError> {
        Ok(self.populate()?.errors.as_ref())
    }

    /// Deserialize the `response` section into `T`, defaulting it when the
    /// section is absent.
    pub fn decode<T>(&self) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        if self.body.is_empty() {
            return Err(ApiError::EmptyBody);
        }
        let envelope: Envelope<T> = serde_json::from_slice(&self.body)?;
        Ok(envelope.response)
    }
}

fn take_object(top: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match top.remove(key) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> Response {
        Response::new(body.as_bytes().to_vec(), Vec::new())
    }

    #[test]
    fn populate_extracts_all_sections() {
        let resp = response(
            r#"{"meta":{"status":200,"msg":"OK"},"response":{"posts":[]},"errors":[{"code":1}]}"#,
        );
        let sections = resp.populate().unwrap();
        assert_eq!(sections.meta.as_ref().unwrap()["msg"], "OK");
        assert!(sections.result.as_ref().unwrap().contains_key("posts"));
        assert!(sections.errors.as_ref().unwrap().is_array());
    }

    #[test]
    fn populate_empty_body_fails() {
        let err = response("").populate().unwrap_err();
        assert!(matches!(err, ApiError::EmptyBody));
    }

    #[test]
    fn populate_non_object_fails_with_decode_error() {
        for body in ["not json", "[1,2,3]", "\"text\"", "{"] {
            let err = response(body).populate().unwrap_err();
            assert!(matches!(err, ApiError::Decode(_)), "{body}");
        }
    }

    #[test]
    fn missing_sections_are_absent_not_errors() {
        let resp = response(r#"{"response":{"id":1}}"#);
        assert!(resp.meta().unwrap().is_none());
        assert!(resp.errors().unwrap().is_none());
        assert_eq!(resp.result().unwrap().unwrap()["id"], 1);
    }

    #[test]
    fn populate_is_memoized() {
        let resp = response(r#"{"meta":{"status":200}}"#);
        assert!(!resp.is_populated());
        let first = resp.populate().unwrap() as *const Sections;
        let second = resp.populate().unwrap() as *const Sections;
        assert!(resp.is_populated());
        assert_eq!(first, second);
    }

    #[test]
    fn decode_typed_result() {
        #[derive(Deserialize, Default)]
        struct Created {
            id: u64,
        }
        let created: Created = response(r#"{"response":{"id":77}}"#).decode().unwrap();
        assert_eq!(created.id, 77);

        let empty: Created = response("{}").decode().unwrap();
        assert_eq!(empty.id, 0);
    }

    #[test]
    fn header_lookup() {
        let resp = Response::new(
            Vec::new(),
            vec![("Location".to_string(), "https://x/avatar.png".to_string())],
        );
        assert_eq!(resp.header("LOCATION"), Some("https://x/avatar.png"));
    }
}
