//! Firestore REST client for flat string documents.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{CanopyError, Result};

use super::config::RemoteConfig;
use super::store::{Document, DocumentStore};

/// Firestore REST endpoint.
const API_URL: &str = "https://firestore.googleapis.com/v1";

/// Documents requested per list page.
const PAGE_SIZE: &str = "300";

/// Writes and lists documents in the project's default database.
pub struct Firestore {
    client: Client,
    api_url: String,
    project: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl Firestore {
    /// Create a client for `project` authenticated with a bearer token.
    pub fn new(
        project: impl Into<String>,
        access_token: impl Into<String>,
        config: &RemoteConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CanopyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: API_URL.to_string(),
            project: project.into(),
            access_token: access_token.into(),
        })
    }

    /// Project and token both taken from the config.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let store = Self::new(config.require_project()?, config.require_token()?, config)?;
        Ok(match &config.firestore_url {
            Some(url) => store.with_api_url(url.clone()),
            None => store,
        })
    }

    /// Point the client at another endpoint, such as a local emulator.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.api_url, self.project, collection
        )
    }
}

/// Wrap every value as a Firestore `stringValue`.
pub fn encode_fields(fields: &Document) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), json!({ "stringValue": v })))
        .collect();
    json!({ "fields": encoded })
}

/// Flatten one typed Firestore value to a string.
///
/// Documents edited from the app may hold numbers for `x`/`y`; those are
/// rendered as text. Nested maps and arrays keep their JSON form.
pub fn decode_value(value: &Value) -> String {
    let Some(obj) = value.as_object() else {
        return value.to_string();
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return String::new();
    };
    match (kind.as_str(), inner) {
        ("nullValue", _) => String::new(),
        (_, Value::String(s)) => s.clone(),
        (_, Value::Bool(b)) => b.to_string(),
        (_, Value::Number(n)) => n.to_string(),
        (_, other) => other.to_string(),
    }
}

/// Last path segment of a document resource name.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

impl DocumentStore for Firestore {
    fn set(&self, collection: &str, id: &str, fields: &Document) -> Result<()> {
        let url = format!("{}/{}", self.collection_url(collection), id);
        let document_error = |message: String| CanopyError::Document {
            id: id.to_string(),
            message,
        };

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.access_token)
            .json(&encode_fields(fields))
            .send()
            .map_err(|e| document_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(document_error(format!("({}) {}", status, error_text)));
        }

        debug!(collection, id, "document written");
        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>> {
        let url = self.collection_url(collection);
        let list_error = |message: String| CanopyError::Collection {
            name: collection.to_string(),
            message,
        };

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().map_err(|e| list_error(e.to_string()))?;
            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().unwrap_or_default();
                return Err(list_error(format!("({}) {}", status, error_text)));
            }

            let page: ListResponse = serde_json::from_str(
                &response.text().map_err(|e| list_error(e.to_string()))?,
            )?;

            for doc in page.documents {
                let fields: Document = doc
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), decode_value(v)))
                    .collect();
                documents.push((document_id(&doc.name).to_string(), fields));
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_fields() {
        let mut doc = Document::new();
        doc.insert("name".into(), "Oak".into());
        doc.insert("x".into(), "-74.18".into());

        assert_eq!(
            encode_fields(&doc),
            json!({
                "fields": {
                    "name": { "stringValue": "Oak" },
                    "x": { "stringValue": "-74.18" }
                }
            })
        );
    }

    #[test]
    fn test_decode_values() {
        assert_eq!(decode_value(&json!({ "stringValue": "Elm" })), "Elm");
        assert_eq!(decode_value(&json!({ "integerValue": "12" })), "12");
        assert_eq!(decode_value(&json!({ "doubleValue": 40.5 })), "40.5");
        assert_eq!(decode_value(&json!({ "booleanValue": true })), "true");
        assert_eq!(decode_value(&json!({ "nullValue": null })), "");
    }

    #[test]
    fn test_list_failure_names_collection() {
        // Nothing listens on port 1.
        let mut config = RemoteConfig::from_toml(
            r#"
            project = "p"
            firestore_url = "http://127.0.0.1:1/v1"
            "#,
        )
        .unwrap();
        config.access_token = Some("token".to_string());
        let store = Firestore::from_config(&config).unwrap();

        match store.list("trees") {
            Err(CanopyError::Collection { name, .. }) => assert_eq!(name, "trees"),
            other => panic!("expected a collection error, got {other:?}"),
        }
    }

    #[test]
    fn test_list_response_parsing() {
        let body = r#"{
            "documents": [
                {
                    "name": "projects/p/databases/(default)/documents/trees/17",
                    "fields": { "zone": { "stringValue": "3" } }
                }
            ],
            "nextPageToken": "abc"
        }"#;
        let page: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.documents.len(), 1);
        assert_eq!(document_id(&page.documents[0].name), "17");
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        let empty: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.documents.is_empty());
    }
}
