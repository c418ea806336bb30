//! Custom updates posted into the player's current gaming context.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use playkit_core::{Session, Validate, ValidationError};
use playkit_graph::decode::bool_value;
use playkit_graph::{GraphConnection, GraphError, GraphRequest};
use serde::Serialize;
use tracing::info;

use crate::error::DialogError;

const CUSTOM_UPDATE_PATH: &str = "me/custom_update";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Text with per-locale overrides, sent as `{"default", "localizations"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    #[serde(rename = "default")]
    pub default_text: String,
    pub localizations: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            default_text: text.into(),
            localizations: BTreeMap::new(),
        }
    }

    pub fn localized(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.localizations.insert(locale.to_string(), text.into());
        self
    }
}

/// Remote media shown with the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMedia {
    Gif { url: String },
    Video { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomUpdateMedia {
    /// PNG bytes, sent inline as a data URL.
    Image(Vec<u8>),
    Remote(UrlMedia),
}

/// A custom update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomUpdateContent {
    pub text: LocalizedText,
    pub media: CustomUpdateMedia,
    pub cta: Option<LocalizedText>,
    /// Handed back to the game when a receiver opens the update.
    pub payload: Option<String>,
}

impl CustomUpdateContent {
    pub fn with_image(message: impl Into<String>, png: Vec<u8>) -> Self {
        Self {
            text: LocalizedText::new(message),
            media: CustomUpdateMedia::Image(png),
            cta: None,
            payload: None,
        }
    }

    pub fn with_media(message: impl Into<String>, media: UrlMedia) -> Self {
        Self {
            text: LocalizedText::new(message),
            media: CustomUpdateMedia::Remote(media),
            cta: None,
            payload: None,
        }
    }
}

impl Validate for CustomUpdateContent {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.text.default_text.is_empty() {
            return Err(ValidationError::required("message", "The message is required."));
        }
        match &self.media {
            CustomUpdateMedia::Image(data) if data.is_empty() => Err(ValidationError::invalid(
                "image",
                "The image cannot be empty.",
            )),
            CustomUpdateMedia::Remote(UrlMedia::Gif { url } | UrlMedia::Video { url })
                if url.is_empty() =>
            {
                Err(ValidationError::invalid("media", "The media URL cannot be empty."))
            }
            _ => Ok(()),
        }
    }
}

/// Builds the `me/custom_update` request for the session's gaming context.
pub fn custom_update_request(
    session: &Session,
    content: &CustomUpdateContent,
) -> Result<GraphRequest, DialogError> {
    content.validate()?;
    let context = session
        .gaming_context()
        .ok_or(DialogError::MissingGamingContext)?;

    let mut request = GraphRequest::for_session(session, CUSTOM_UPDATE_PATH)
        .method(playkit_graph::HttpMethod::Post)
        .param("context_token_id", context.identifier.as_str())
        .param("text", to_json(&content.text)?);

    if let Some(cta) = &content.cta {
        request = request.param("cta", to_json(cta)?);
    }
    request = match &content.media {
        CustomUpdateMedia::Image(png) => {
            request.param("image", format!("{PNG_DATA_URL_PREFIX}{}", BASE64.encode(png)))
        }
        CustomUpdateMedia::Remote(media) => request.param("media", to_json(media)?),
    };
    if let Some(payload) = &content.payload {
        request = request.param("payload", payload.as_str());
    }
    Ok(request)
}

/// Posts a custom update; resolves to the server's `success` flag.
pub async fn send_custom_update(
    conn: &dyn GraphConnection,
    session: &Session,
    content: &CustomUpdateContent,
) -> Result<bool, DialogError> {
    let request = custom_update_request(session, content)?;
    let response = conn.start(request).await?;
    let success = response
        .get("success")
        .and_then(bool_value)
        .ok_or_else(|| GraphError::Decoding("custom update response has no success flag".into()))?;
    info!(success, "custom update sent");
    Ok(success)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, DialogError> {
    serde_json::to_string(value).map_err(|e| DialogError::Graph(GraphError::Json(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_core::{GamingContext, Settings};
    use playkit_graph::ParamValue;
    use playkit_graph::mock::MockConnection;
    use serde_json::{Value, json};

    fn in_context() -> Session {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        session.set_gaming_context(Some(GamingContext::new("12345", 2)));
        session
    }

    fn text_param(request: &GraphRequest, name: &str) -> String {
        match request.get_param(name) {
            Some(ParamValue::Text(s)) => s.clone(),
            other => panic!("{name}: {other:?}"),
        }
    }

    #[test]
    fn image_update_parameters() {
        let mut content = CustomUpdateContent::with_image("Beat my score", vec![1, 2, 3]);
        content.text = content.text.localized("es_LA", "Supera mi puntaje");
        content.cta = Some(LocalizedText::new("Play"));
        content.payload = Some("level=3".into());

        let request = custom_update_request(&in_context(), &content).unwrap();
        assert_eq!(request.path, "me/custom_update");
        assert_eq!(text_param(&request, "context_token_id"), "12345");
        assert_eq!(text_param(&request, "image"), "data:image/png;base64,AQID");
        assert_eq!(text_param(&request, "payload"), "level=3");

        let text: Value = serde_json::from_str(&text_param(&request, "text")).unwrap();
        assert_eq!(
            text,
            json!({"default": "Beat my score", "localizations": {"es_LA": "Supera mi puntaje"}})
        );
        let cta: Value = serde_json::from_str(&text_param(&request, "cta")).unwrap();
        assert_eq!(cta["default"], "Play");
        assert!(request.get_param("media").is_none());
    }

    #[test]
    fn media_update_parameters() {
        let content = CustomUpdateContent::with_media(
            "Watch",
            UrlMedia::Gif {
                url: "https://example.com/a.gif".into(),
            },
        );
        let request = custom_update_request(&in_context(), &content).unwrap();
        let media: Value = serde_json::from_str(&text_param(&request, "media")).unwrap();
        assert_eq!(media, json!({"gif": {"url": "https://example.com/a.gif"}}));
        assert!(request.get_param("image").is_none());
    }

    #[test]
    fn requires_context_and_valid_content() {
        let outside = Session::in_memory(Settings::with_app_id("123"));
        let content = CustomUpdateContent::with_image("hi", vec![1]);
        assert!(matches!(
            custom_update_request(&outside, &content),
            Err(DialogError::MissingGamingContext)
        ));

        let empty_message = CustomUpdateContent::with_image("", vec![1]);
        assert!(matches!(
            custom_update_request(&in_context(), &empty_message),
            Err(DialogError::Validation(ref e)) if e.name() == "message"
        ));

        let empty_image = CustomUpdateContent::with_image("hi", Vec::new());
        assert!(matches!(
            custom_update_request(&in_context(), &empty_image),
            Err(DialogError::Validation(ref e)) if e.name() == "image"
        ));
    }

    #[tokio::test]
    async fn send_decodes_success() {
        let conn = MockConnection::new();
        conn.push_ok(json!({"success": true}));
        conn.push_ok(json!({"id": "x"}));
        let content = CustomUpdateContent::with_image("hi", vec![1]);

        assert!(send_custom_update(&conn, &in_context(), &content).await.unwrap());
        let err = send_custom_update(&conn, &in_context(), &content)
            .await
            .unwrap_err();
        assert!(matches!(err, DialogError::Graph(GraphError::Decoding(_))));
    }
}
