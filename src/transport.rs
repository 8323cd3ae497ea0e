use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::config::CloudBaseConfig;
use crate::error::CloudBaseError;
use crate::retry::{is_retryable_http_error, retry_delay};

/// Raw result of one POST round-trip.
///
/// HTTP-level error statuses (4xx/5xx) are ordinary replies here; only
/// transport-level failures (DNS, refused connections, TLS) are errors. The
/// caller interprets the status through the decoded `httpStatus` field.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Executes one blocking POST round-trip per call.
///
/// No timeout, no retry, and no connection reuse unless configured; the
/// defaults carry no policy at all.
#[derive(Debug)]
pub struct Transport {
    http: Client,
    max_retries: u32,
}

impl Transport {
    pub fn new(config: &CloudBaseConfig) -> Result<Self, CloudBaseError> {
        let mut builder = Client::builder().user_agent(config.resolved_user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if !config.keep_alive {
            builder = builder.pool_max_idle_per_host(0);
        }
        let http = builder.build().map_err(CloudBaseError::from)?;

        Ok(Self {
            http,
            max_retries: config.max_retries,
        })
    }

    /// POST `fields` to `url`, attaching `attachments` as binary form parts.
    ///
    /// With attachments the request is multipart/form-data; without, a
    /// URL-encoded form. With a non-zero retry budget, transport errors and
    /// retryable statuses back off and retry; an unhealed retryable status
    /// is still returned as an ordinary reply so the wire behavior is
    /// unchanged, while a persistent transport error surfaces as
    /// `RetryExhausted`.
    pub async fn post(
        &self,
        url: &str,
        fields: &BTreeMap<String, String>,
        attachments: &BTreeMap<String, PathBuf>,
    ) -> Result<TransportReply, CloudBaseError> {
        debug!(
            "POST {url} ({} fields, {} attachments)",
            fields.len(),
            attachments.len()
        );

        let mut last_status: Option<StatusCode> = None;
        let mut last_error: Option<String> = None;

        for attempt in 0..=self.max_retries {
            match self.post_once(url, fields, attachments).await {
                Ok(reply) => {
                    let retryable = is_retryable_http_error(
                        reply.status.as_u16(),
                        &String::from_utf8_lossy(&reply.body),
                    );
                    if attempt < self.max_retries && retryable {
                        last_status = Some(reply.status);
                        tokio::time::sleep(retry_delay(attempt)).await;
                        continue;
                    }
                    return Ok(reply);
                }
                Err(error @ CloudBaseError::Attachment { .. }) => {
                    // Local file problems are not transient.
                    return Err(error);
                }
                Err(error) => {
                    if attempt < self.max_retries {
                        last_error = Some(error.to_string());
                        tokio::time::sleep(retry_delay(attempt)).await;
                        continue;
                    }
                    if self.max_retries == 0 {
                        return Err(error);
                    }
                    return Err(CloudBaseError::RetryExhausted {
                        attempts: attempt + 1,
                        status: last_status,
                        last_error: Some(error.to_string()),
                    });
                }
            }
        }

        Err(CloudBaseError::RetryExhausted {
            attempts: self.max_retries + 1,
            status: last_status,
            last_error,
        })
    }

    async fn post_once(
        &self,
        url: &str,
        fields: &BTreeMap<String, String>,
        attachments: &BTreeMap<String, PathBuf>,
    ) -> Result<TransportReply, CloudBaseError> {
        let request = if attachments.is_empty() {
            self.http.post(url).form(fields)
        } else {
            let mut form = Form::new();
            for (key, value) in fields {
                form = form.text(key.clone(), value.clone());
            }
            for (field, path) in attachments {
                form = form.part(field.clone(), file_part(field, path).await?);
            }
            self.http.post(url).multipart(form)
        };

        let response = request.send().await.map_err(CloudBaseError::from)?;
        let status = response.status();

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            body.extend_from_slice(&chunk.map_err(CloudBaseError::from)?);
        }

        Ok(TransportReply { status, body })
    }
}

async fn file_part(field: &str, path: &Path) -> Result<Part, CloudBaseError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CloudBaseError::attachment(field, path, source))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| field.to_owned());

    Ok(Part::bytes(bytes).file_name(file_name))
}
