//! Graph request builder.

use playkit_core::Session;

/// HTTP verb of a graph request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// A single request parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    /// Binary upload sent as a multipart part.
    Attachment {
        filename: String,
        content_type: String,
        data: Vec<u8>,
    },
}

impl ParamValue {
    /// Form representation; `None` for attachments.
    pub fn as_form_value(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Attachment { .. } => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for ParamValue {
    fn from(i: u64) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Error handling flags for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestFlags {
    /// Server auth errors must not clear the current token.
    pub do_not_invalidate_token_on_error: bool,
    /// Skip interactive recovery of server errors.
    pub disable_error_recovery: bool,
}

/// A request against the graph API.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRequest {
    pub path: String,
    pub params: Vec<(String, ParamValue)>,
    pub method: HttpMethod,
    /// Access token string; the client falls back to the app token.
    pub token: Option<String>,
    /// Graph API version, e.g. `v17.0`; the client default when `None`.
    pub version: Option<String>,
    /// Graph domain of the token, selects `graph.fb.gg` for `gaming`.
    pub graph_domain: Option<String>,
    pub flags: RequestFlags,
}

impl GraphRequest {
    /// Creates a GET request for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            method: HttpMethod::Get,
            token: None,
            version: None,
            graph_domain: None,
            flags: RequestFlags::default(),
        }
    }

    /// Creates a POST request for `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path).method(HttpMethod::Post)
    }

    /// Creates a request carrying the session's access token and graph version.
    pub fn for_session(session: &Session, path: impl Into<String>) -> Self {
        let mut request = Self::new(path);
        if let Some(token) = session.access_token() {
            request.token = Some(token.token_string.clone());
            request.graph_domain = token.graph_domain.clone();
        }
        request.version = Some(session.settings().graph_api_version.clone());
        request
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Appends a parameter, replacing an existing one with the same name.
    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set_param(name, value);
        self
    }

    pub fn set_param(&mut self, name: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name.to_string(), value)),
        }
    }

    pub fn attachment(
        self,
        name: &str,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.param(
            name,
            ParamValue::Attachment {
                filename: filename.into(),
                content_type: content_type.into(),
                data,
            },
        )
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn flags(mut self, flags: RequestFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn has_attachments(&self) -> bool {
        self.params
            .iter()
            .any(|(_, v)| matches!(v, ParamValue::Attachment { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_core::{AccessToken, Settings};

    #[test]
    fn param_replaces_existing_value() {
        let req = GraphRequest::post("me/videos")
            .param("upload_phase", "start")
            .param("upload_phase", "finish");
        assert_eq!(req.params.len(), 1);
        assert_eq!(
            req.get_param("upload_phase"),
            Some(&ParamValue::Text("finish".into()))
        );
        assert_eq!(req.method, HttpMethod::Post);
    }

    #[test]
    fn attachments_detected() {
        let req = GraphRequest::post("me/photos").param("caption", "hi");
        assert!(!req.has_attachments());
        let req = req.attachment("picture", "image.png", "image/png", vec![1, 2, 3]);
        assert!(req.has_attachments());
        assert_eq!(req.get_param("picture").unwrap().as_form_value(), None);
    }

    #[test]
    fn for_session_uses_token_and_version() {
        let mut session = Session::in_memory(Settings::with_app_id("123"));
        let req = GraphRequest::for_session(&session, "me");
        assert!(req.token.is_none());
        assert_eq!(req.version.as_deref(), Some("v17.0"));

        session
            .set_access_token(Some(
                AccessToken::new("tok", "123", "u").with_graph_domain("gaming"),
            ))
            .unwrap();
        let req = GraphRequest::for_session(&session, "me");
        assert_eq!(req.token.as_deref(), Some("tok"));
        assert_eq!(req.graph_domain.as_deref(), Some("gaming"));
    }

    #[test]
    fn form_values() {
        assert_eq!(ParamValue::from(42i64).as_form_value().unwrap(), "42");
        assert_eq!(ParamValue::from(true).as_form_value().unwrap(), "true");
        assert_eq!(ParamValue::from("x").as_text(), Some("x"));
    }
}
