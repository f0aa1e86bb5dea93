use crate::error::EngineError;
use crate::models::{DocumentContent, SourceKind};
use crate::retry::{retry, RetryPolicy};
use reqwest::Client;
use std::time::Duration;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_NAME: &str = "document";
const DEFAULT_MIME: &str = "application/pdf";

/// Extension-based resolution, checked before content-type heuristics.
const EXTENSION_MIMES: &[(&str, &str)] = &[
    (".pdf", "application/pdf"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".doc", "application/msword"),
    (".txt", "text/plain"),
    (".csv", "text/csv"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// Substring heuristics over the declared content type, in priority order.
const CONTENT_TYPE_HINTS: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    (
        "word",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("text", "text/plain"),
    (
        "excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// Acquires document bytes from a URL or an already-received upload.
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    pub fn new() -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|err| EngineError::Configuration(format!("http client: {err}")))?;
        Ok(Self { client })
    }

    /// GET the document with bounded retry. Any non-2xx status or transport
    /// failure counts as transient until the attempt cap is reached.
    pub async fn fetch_url(&self, url: &str) -> Result<DocumentContent, EngineError> {
        let result = retry(RetryPolicy::download(), || {
            let client = self.client.clone();
            let url = url.to_string();
            async move {
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|err| err.to_string())?;
                if !response.status().is_success() {
                    return Err(format!("HTTP {} from {url}", response.status()));
                }
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(|value| value.to_string());
                let bytes = response.bytes().await.map_err(|err| err.to_string())?;
                Ok((bytes.to_vec(), content_type))
            }
        })
        .await;

        let (bytes, content_type) = result.map_err(EngineError::Download)?;
        let name = display_name_from_url(url);
        let mime = resolve_mime(content_type.as_deref(), &name);
        log::info!("downloaded {name} ({} bytes, {mime})", bytes.len());
        Ok(DocumentContent {
            bytes,
            mime,
            name,
            source: SourceKind::Url,
        })
    }

    /// Wrap an already-received multipart payload. No network, no retry.
    pub fn from_upload(
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<DocumentContent, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::InvalidUpload(
                "uploaded file is empty".to_string(),
            ));
        }
        let name = filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_NAME)
            .to_string();
        let mime = resolve_mime(content_type, &name);
        Ok(DocumentContent {
            bytes,
            mime,
            name,
            source: SourceKind::Upload,
        })
    }
}

/// Last path segment of the URL, with query string and fragment stripped.
pub fn display_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

/// Resolve the document MIME type through a fixed-priority rule table:
/// usable declared content type, then filename extension, then substring
/// heuristics over the declared type, then the default.
pub fn resolve_mime(declared: Option<&str>, name: &str) -> String {
    let declared = declared
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or(ct)
                .trim()
                .to_ascii_lowercase()
        })
        .filter(|ct| !ct.is_empty());

    if let Some(ct) = &declared {
        if ct.contains('/') && ct != "application/octet-stream" {
            return ct.clone();
        }
    }

    let lower_name = name.to_ascii_lowercase();
    for (extension, mime) in EXTENSION_MIMES {
        if lower_name.ends_with(extension) {
            return (*mime).to_string();
        }
    }

    if let Some(ct) = &declared {
        for (needle, mime) in CONTENT_TYPE_HINTS {
            if ct.contains(needle) {
                return (*mime).to_string();
            }
        }
    }

    DEFAULT_MIME.to_string()
}
