use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::thread;
use std::time::Duration;

/// Blocking HTTP GET with bounded retries and a response size cap.
pub struct HttpFetcher {
    client: Client,
    max_response_bytes: usize,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build schedule HTTP client")?;

        Ok(Self {
            client,
            max_response_bytes: 1024 * 1024,
            max_retries: 2,
            retry_delay_ms: 400,
        })
    }

    /// Fetch `url` with the given query string. `secret`, when set, is scrubbed
    /// from any error message before it is returned or logged.
    pub fn fetch_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        secret: Option<&str>,
    ) -> Result<String> {
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=self.max_retries {
            match self.fetch_once(url, query) {
                Ok(content) => return Ok(content),
                Err(err) => {
                    let message = redact_secret(&format!("{:#}", err), secret);
                    let is_last_attempt = attempt == self.max_retries;
                    if is_last_attempt {
                        last_error = Some(anyhow!(
                            "Failed to fetch schedule from {} after {} attempts: {}",
                            url,
                            attempt + 1,
                            message
                        ));
                    } else {
                        log::warn!(
                            "Schedule fetch attempt {} failed for {}: {}",
                            attempt + 1,
                            url,
                            message
                        );
                        thread::sleep(Duration::from_millis(self.retry_delay_ms));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Unknown schedule fetch error")))
    }

    fn fetch_once(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .context("Network error during schedule fetch")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("Schedule fetch failed with HTTP status {}", status));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                return Err(anyhow!(
                    "Schedule response too large ({} bytes > {} bytes)",
                    content_length,
                    self.max_response_bytes
                ));
            }
        }

        let bytes = response
            .bytes()
            .context("Failed to read schedule response body")?;

        if bytes.len() > self.max_response_bytes {
            return Err(anyhow!(
                "Schedule response too large ({} bytes > {} bytes)",
                bytes.len(),
                self.max_response_bytes
            ));
        }

        String::from_utf8(bytes.to_vec()).context("Schedule response is not valid UTF-8")
    }
}

pub(crate) fn redact_secret(message: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => message.replace(secret, "***redacted***"),
        _ => message.to_string(),
    }
}
