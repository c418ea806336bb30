//! Graph API client.
//!
//! Async HTTP client using `reqwest`. GET/DELETE parameters go in the
//! query string; POST bodies are urlencoded, or multipart when the request
//! carries attachments.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use playkit_core::{GAMING_GRAPH_DOMAIN, Settings};
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tracing::debug;

use crate::connection::{GraphConnection, GraphFuture};
use crate::error::GraphError;
use crate::request::{GraphRequest, HttpMethod, ParamValue};

/// Characters left unescaped in path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'.')
    .remove(b'~');

const FACEBOOK_DOMAIN: &str = "facebook.com";
const GAMING_DOMAIN: &str = "fb.gg";

/// Graph API client.
pub struct HttpGraphClient {
    http: reqwest::Client,
    app_id: String,
    client_token: String,
    default_version: String,
    domain_part: String,
    base_url_override: Option<String>,
}

impl HttpGraphClient {
    /// Creates a client for the app described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self, GraphError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("playkit/{}", playkit_core::SDK_VERSION))
            .build()?;

        Ok(Self {
            http,
            app_id: settings.app_id.clone(),
            client_token: settings.client_token.clone(),
            default_version: settings.graph_api_version.clone(),
            domain_part: settings.facebook_domain_part.clone(),
            base_url_override: None,
        })
    }

    /// Sets a custom base URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: String) -> Self {
        self.base_url_override = Some(url);
        self
    }

    /// Base URL for a request, chosen by the token's graph domain.
    fn base_url(&self, graph_domain: Option<&str>) -> String {
        if let Some(url) = &self.base_url_override {
            return url.clone();
        }
        let domain = if graph_domain == Some(GAMING_GRAPH_DOMAIN) {
            GAMING_DOMAIN
        } else {
            FACEBOOK_DOMAIN
        };
        if self.domain_part.is_empty() {
            format!("https://graph.{domain}")
        } else {
            format!("https://graph.{}.{domain}", self.domain_part)
        }
    }

    /// Full URL for `request`, with encoded path segments.
    pub fn url_for(&self, request: &GraphRequest) -> String {
        let version = request
            .version
            .as_deref()
            .unwrap_or(&self.default_version);
        let path = request
            .path
            .trim_matches('/')
            .split('/')
            .map(|seg| utf8_percent_encode(seg, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{version}/{path}",
            self.base_url(request.graph_domain.as_deref())
        )
    }

    /// Token sent with the request: the user token, else the app token.
    fn access_token_param(&self, request: &GraphRequest) -> Option<String> {
        if let Some(token) = &request.token {
            return Some(token.clone());
        }
        if self.app_id.is_empty() || self.client_token.is_empty() {
            return None;
        }
        Some(format!("{}|{}", self.app_id, self.client_token))
    }

    /// Performs the request and decodes the JSON body.
    pub async fn execute(&self, request: GraphRequest) -> Result<Value, GraphError> {
        let url = self.url_for(&request);

        let mut fields: Vec<(String, String)> = vec![
            ("format".into(), "json".into()),
            ("sdk".into(), "rust".into()),
        ];
        if let Some(token) = self.access_token_param(&request) {
            fields.push(("access_token".into(), token));
        }

        debug!(
            method = request.method.as_str(),
            path = %request.path,
            params = request.params.len(),
            "graph request"
        );

        let builder = match request.method {
            HttpMethod::Get | HttpMethod::Delete => {
                fields.extend(form_fields(&request));
                let builder = if request.method == HttpMethod::Get {
                    self.http.get(&url)
                } else {
                    self.http.delete(&url)
                };
                builder.query(&fields)
            }
            HttpMethod::Post if request.has_attachments() => {
                let mut form = Form::new();
                for (k, v) in fields {
                    form = form.text(k, v);
                }
                for (name, value) in request.params {
                    form = match value {
                        ParamValue::Attachment {
                            filename,
                            content_type,
                            data,
                        } => form.part(
                            name,
                            Part::bytes(data)
                                .file_name(filename)
                                .mime_str(&content_type)?,
                        ),
                        other => match other.as_form_value() {
                            Some(text) => form.text(name, text),
                            None => form,
                        },
                    };
                }
                self.http.post(&url).multipart(form)
            }
            HttpMethod::Post => {
                fields.extend(form_fields(&request));
                self.http.post(&url).form(&fields)
            }
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        parse_response(status, &body)
    }
}

impl GraphConnection for HttpGraphClient {
    fn start(&self, request: GraphRequest) -> GraphFuture<'_> {
        Box::pin(self.execute(request))
    }
}

/// Non-attachment parameters as form pairs.
fn form_fields(request: &GraphRequest) -> Vec<(String, String)> {
    request
        .params
        .iter()
        .filter_map(|(k, v)| v.as_form_value().map(|v| (k.clone(), v)))
        .collect()
}

/// Maps a raw HTTP response to a JSON value or a typed error.
fn parse_response(status: u16, body: &[u8]) -> Result<Value, GraphError> {
    let parsed = serde_json::from_slice::<Value>(body);

    if let Ok(value) = &parsed
        && let Some(err) = server_error(value)
    {
        return Err(err);
    }

    if !(200..300).contains(&status) {
        return Err(GraphError::Api {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    match parsed? {
        Value::Bool(success) => Ok(json!({ "success": success })),
        value => Ok(value),
    }
}

/// Extracts the graph error envelope `{"error": {...}}`, if present.
fn server_error(value: &Value) -> Option<GraphError> {
    let error = value.get("error")?.as_object()?;
    Some(GraphError::Server {
        code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
        subcode: error.get("error_subcode").and_then(Value::as_i64),
        error_type: error
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}
