//! Nextcloud Talk mention lookup
//!
//! Queries the chat mention endpoint of the spreed app over OCS.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use super::{LookupClient, LookupError, LookupRequest};
use crate::mention::suggestion::RawCandidate;

/// Path segments of the chat API below the server base URL
const CHAT_API_SEGMENTS: &[&str] = &["ocs", "v2.php", "apps", "spreed", "api", "v1", "chat"];

#[derive(Debug, Deserialize)]
struct OcsEnvelope {
    ocs: OcsBody,
}

#[derive(Debug, Deserialize)]
struct OcsBody {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Lookup client for a Nextcloud Talk server
#[derive(Debug, Clone)]
pub struct NextcloudClient {
    http: reqwest::Client,
}

impl NextcloudClient {
    pub fn new() -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mentions/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self { http })
    }

    /// Mention endpoint for a room
    ///
    /// The room token is escaped as a single path segment.
    pub fn mentions_url(base_url: &str, room: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| LookupError::Network(format!("Invalid server URL {}: {}", base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| LookupError::Network(format!("Invalid server URL {}", base_url)))?
            .pop_if_empty()
            .extend(CHAT_API_SEGMENTS)
            .push(room)
            .push("mentions");

        Ok(url)
    }

    async fn fetch(&self, request: &LookupRequest) -> Result<Vec<RawCandidate>, LookupError> {
        let url = Self::mentions_url(&request.base_url, request.scope.as_str())?;

        let mut params = vec![
            ("search", request.query.clone()),
            ("limit", request.limit.to_string()),
        ];
        if let Some(cursor) = &request.cursor {
            params.push(("cursor", cursor.clone()));
        }

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, &request.credentials)
            .header("OCS-APIRequest", "true")
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LookupError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        parse_mentions_body(&body)
    }
}

impl LookupClient for NextcloudClient {
    fn lookup<'a>(
        &'a self,
        request: &'a LookupRequest,
    ) -> BoxFuture<'a, Result<Vec<RawCandidate>, LookupError>> {
        self.fetch(request).boxed()
    }
}

/// Decode an OCS mention response
///
/// Entries that are not objects, or carry fields of the wrong type, decode to an
/// empty candidate so the mapper drops them individually.
pub fn parse_mentions_body(body: &str) -> Result<Vec<RawCandidate>, LookupError> {
    let envelope: OcsEnvelope =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    Ok(envelope
        .ocs
        .data
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}

#[cfg(test)]
#[path = "nextcloud_tests.rs"]
mod nextcloud_tests;
