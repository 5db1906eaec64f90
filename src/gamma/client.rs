use crate::config::Config;
use crate::gamma::request::{self, GenerationParams};
use crate::gamma::resolve::{self, Status};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument};

const API_KEY_HEADER: &str = "X-API-KEY";

#[derive(Debug, Error)]
pub enum GammaError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: status {status}, body: {body}")]
    Api { status: u16, body: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one generation attempt. Callers branch on `url` first, then
/// `generation_id` (created but no final URL yet), then `error`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationResult {
    pub url: Option<String>,
    pub generation_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetDownloads {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetBundle {
    pub generation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pptx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<AssetDownloads>,
}

/// Client for the Gamma generation API. Holds one reqwest client and the
/// process-wide timing budget; no state is carried between calls.
#[derive(Debug, Clone)]
pub struct GammaClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    generation_timeout: Duration,
    poll_interval: Duration,
    download_dir: PathBuf,
}

impl GammaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            generation_timeout: config.generation_timeout,
            poll_interval: config.poll_interval,
            download_dir: std::env::temp_dir(),
        }
    }

    /// Run one generation: create the job, short-circuit on a direct URL,
    /// otherwise poll the status endpoint until a terminal state or the
    /// timeout budget is spent. Every failure mode is folded into the
    /// returned [`GenerationResult`]; this method itself never fails.
    #[instrument(skip(self, params))]
    pub async fn generate(&self, params: GenerationParams) -> GenerationResult {
        let body = request::normalize(params);
        if body.input_text.trim().is_empty() {
            return GenerationResult {
                error: Some("inputText must not be empty".to_string()),
                ..GenerationResult::default()
            };
        }

        let create_data = match self.create(&body).await {
            Ok(data) => data,
            Err(err) => {
                return GenerationResult {
                    error: Some(err.to_string()),
                    ..GenerationResult::default()
                };
            }
        };

        // Some API revisions complete synchronously and hand back a URL in
        // the create response; no polling in that case.
        if let Some(url) = resolve::extract_result_url(&create_data) {
            return GenerationResult {
                url: Some(url),
                generation_id: resolve::extract_generation_id(&create_data),
                error: None,
            };
        }

        let Some(generation_id) = resolve::extract_generation_id(&create_data) else {
            return GenerationResult {
                error: Some(format!("unexpected response shape: {create_data}")),
                ..GenerationResult::default()
            };
        };

        match self.poll(generation_id).await {
            Ok(result) => result,
            Err(err) => GenerationResult {
                error: Some(err.to_string()),
                ..GenerationResult::default()
            },
        }
    }

    /// Fetch the current status payload for a generation once and resolve
    /// downloadable artifact URLs; optionally download them to the shared
    /// temporary directory. The status fetch itself failing is a hard error;
    /// a missing artifact URL or a failed individual download is not.
    #[instrument(skip(self))]
    pub async fn get_assets(
        &self,
        generation_id: &str,
        download: bool,
    ) -> Result<AssetBundle, GammaError> {
        let payload = self.fetch_status(generation_id).await?;

        let pdf = resolve::extract_asset_url(&payload, "pdf");
        let pptx = resolve::extract_asset_url(&payload, "pptx");

        let downloads = if download {
            Some(
                self.download_assets(generation_id, pdf.as_deref(), pptx.as_deref())
                    .await,
            )
        } else {
            None
        };

        Ok(AssetBundle {
            generation_id: generation_id.to_string(),
            pdf,
            pptx,
            downloads,
        })
    }

    async fn create(&self, body: &request::RequestBody) -> Result<Value, GammaError> {
        debug!("creating generation");
        let response = self
            .http
            .post(&self.base_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        self.read_json(response).await
    }

    async fn fetch_status(&self, generation_id: &str) -> Result<Value, GammaError> {
        let url = format!("{}/{generation_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        self.read_json(response).await
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, GammaError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "gamma api returned error");
            return Err(GammaError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn poll(&self, generation_id: String) -> Result<GenerationResult, GammaError> {
        let started = Instant::now();

        while started.elapsed() < self.generation_timeout {
            let payload = self.fetch_status(&generation_id).await?;
            let status = resolve::extract_status(&payload);
            debug!(%generation_id, %status, "poll tick");

            match resolve::classify_status(&status) {
                Status::Completed => {
                    return Ok(match resolve::extract_result_url(&payload) {
                        Some(url) => GenerationResult {
                            url: Some(url),
                            generation_id: Some(generation_id),
                            error: None,
                        },
                        // A completed job with no discoverable artifact is an
                        // anomaly to surface, payload included.
                        None => GenerationResult {
                            url: None,
                            generation_id: Some(generation_id),
                            error: Some(format!(
                                "generation completed but no export URL found: {payload}"
                            )),
                        },
                    });
                }
                Status::Failed => {
                    return Ok(GenerationResult {
                        url: None,
                        generation_id: Some(generation_id),
                        error: Some(format!("generation failed: {payload}")),
                    });
                }
                Status::InProgress => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Ok(GenerationResult {
            url: None,
            error: Some(format!("timed out waiting for generation {generation_id}")),
            generation_id: Some(generation_id),
        })
    }

    async fn download_assets(
        &self,
        generation_id: &str,
        pdf_url: Option<&str>,
        pptx_url: Option<&str>,
    ) -> AssetDownloads {
        let mut downloads = AssetDownloads::default();

        if let Some(url) = pdf_url {
            match self.download_file(url, generation_id, "pdf").await {
                Ok(path) => downloads.pdf = Some(path),
                Err(err) => downloads.pdf_error = Some(err.to_string()),
            }
        }

        if let Some(url) = pptx_url {
            match self.download_file(url, generation_id, "pptx").await {
                Ok(path) => downloads.pptx = Some(path),
                Err(err) => downloads.pptx_error = Some(err.to_string()),
            }
        }

        downloads
    }

    async fn download_file(
        &self,
        url: &str,
        generation_id: &str,
        extension: &str,
    ) -> Result<String, GammaError> {
        // Artifact URLs are pre-signed; no auth header.
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GammaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let path = self.download_dir.join(format!("{generation_id}.{extension}"));
        let mut file = tokio::fs::File::create(&path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        debug!(path = %path.display(), "artifact downloaded");
        Ok(path.to_string_lossy().into_owned())
    }
}
