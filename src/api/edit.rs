use reqwest::multipart::{Form, Part};
use tracing::{debug, info};
use url::Url;

use super::client::{ApiClient, API_KEY_HEADER};
use super::types::{EditConfig, EditResponse};
use crate::error::{DeckError, Result};

const EDIT_ENDPOINT: &str = "presentation/edit";

const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

impl ApiClient {
    /// Submit a deck with its replacements to the edit endpoint.
    ///
    /// Sent exactly once: a failed edit is reported, never retried.
    pub async fn edit_presentation(
        &self,
        file_name: &str,
        deck: Vec<u8>,
        config: &EditConfig,
    ) -> Result<Url> {
        let url = self.build_url(EDIT_ENDPOINT)?;
        let api_key = self.api_key()?;
        let config_json = serde_json::to_string(config)?;

        info!(
            "Sending {} replacement(s) to {}",
            config.replacements.len(),
            url
        );
        debug!("Edit config: {}", config_json);

        let transport = |source| DeckError::Transport {
            url: url.to_string(),
            source,
        };

        let part = Part::bytes(deck)
            .file_name(file_name.to_string())
            .mime_str(PPTX_MIME)
            .map_err(transport)?;
        let form = Form::new()
            .part("pptx_file", part)
            .text("config", config_json);

        let response = self
            .client
            .post(url.clone())
            .header(API_KEY_HEADER, api_key)
            .header("User-Agent", &self.user_agent)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        debug!("Edit response: HTTP {}", status);

        parse_edit_response(status, &body)
    }
}

fn parse_edit_response(status: u16, body: &str) -> Result<Url> {
    if status != 200 {
        return Err(DeckError::RemoteEdit {
            status,
            reason: body.to_string(),
        });
    }

    let response: EditResponse = serde_json::from_str(body).map_err(|e| DeckError::RemoteEdit {
        status,
        reason: format!("unreadable response: {}", e),
    })?;

    let location = response
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| DeckError::RemoteEdit {
            status,
            reason: "API response does not contain a URL".to_string(),
        })?;

    Url::parse(&location).map_err(|e| DeckError::RemoteEdit {
        status,
        reason: format!("invalid result URL {}: {}", location, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Replacement;
    use crate::testing::serve_once;

    fn config() -> EditConfig {
        EditConfig {
            replacements: vec![Replacement {
                shape_name: "Title".into(),
                content: "New Title".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_edit_sends_multipart_with_key() {
        let (base, request) = serve_once(200, r#"{"url":"http://files.local/result.pptx"}"#).await;
        let client = ApiClient::new(base.as_str(), Some("k-1".into()), 5).unwrap();

        let url = client
            .edit_presentation("talk.pptx", b"PK-deck".to_vec(), &config())
            .await
            .unwrap();
        assert_eq!(url.as_str(), "http://files.local/result.pptx");

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /api/v1/presentation/edit HTTP/1.1"));
        let lower = raw.to_lowercase();
        assert!(lower.contains("x-api-key: k-1"));
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(raw.contains(r#"name="pptx_file"; filename="talk.pptx""#));
        assert!(raw.contains(PPTX_MIME));
        assert!(raw.contains("PK-deck"));
        assert!(raw.contains(r#"name="config""#));
        assert!(raw.contains(r#"{"replacements":[{"shape_name":"Title","content":"New Title"}]}"#));
    }

    #[tokio::test]
    async fn test_edit_rejection_keeps_status_and_body() {
        let (base, request) = serve_once(400, "unknown shape").await;
        let client = ApiClient::new(base.as_str(), Some("k-1".into()), 5).unwrap();

        let err = client
            .edit_presentation("talk.pptx", b"PK-deck".to_vec(), &config())
            .await
            .unwrap_err();
        match err {
            DeckError::RemoteEdit { status, reason } => {
                assert_eq!(status, 400);
                assert_eq!(reason, "unknown shape");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        request.await.unwrap();
    }

    #[tokio::test]
    async fn test_edit_without_key_sends_nothing() {
        let client = ApiClient::new("http://127.0.0.1:9/api/v1/", None, 5).unwrap();
        let err = client
            .edit_presentation("talk.pptx", Vec::new(), &config())
            .await
            .unwrap_err();
        assert!(matches!(err, DeckError::Input(_)));
    }

    #[test]
    fn test_success_with_url() {
        let url = parse_edit_response(200, r#"{"url":"http://x/result.pptx"}"#).unwrap();
        assert_eq!(url.as_str(), "http://x/result.pptx");
    }

    #[test]
    fn test_success_without_url_is_error() {
        let err = parse_edit_response(200, r#"{"status":"ok"}"#).unwrap_err();
        match err {
            DeckError::RemoteEdit { status, reason } => {
                assert_eq!(status, 200);
                assert!(reason.contains("does not contain a URL"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_200_surfaces_status_and_body() {
        let err = parse_edit_response(422, "shape not found").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("shape not found"));
    }

    #[test]
    fn test_created_is_not_success() {
        assert!(parse_edit_response(201, r#"{"url":"http://x/a.pptx"}"#).is_err());
    }
}
