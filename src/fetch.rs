use crate::error::InstallError;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, StatusCode, Url};
use tracing::debug;

pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Complete response body of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// HTTP GET that follows redirects itself so the hop count can be capped.
pub struct Fetcher {
    client: Client,
    max_redirects: usize,
}

impl Fetcher {
    pub fn new(max_redirects: usize) -> Result<Self, InstallError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(InstallError::HttpClient)?;
        Ok(Self { client, max_redirects })
    }

    pub async fn fetch(&self, url: &str) -> Result<Payload, InstallError> {
        let mut current = Url::parse(url).map_err(|e| InstallError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let mut hops = 0usize;
        loop {
            debug!(url = %current, hops, "GET");
            let resp = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|source| InstallError::Transport { url: current.to_string(), source })?;
            let status = resp.status();

            if is_followed_redirect(status) {
                if hops == self.max_redirects {
                    return Err(InstallError::TooManyRedirects {
                        url: current.to_string(),
                        limit: self.max_redirects,
                    });
                }
                let next = resp
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|loc| current.join(loc).ok())
                    .ok_or_else(|| InstallError::MissingRedirectLocation {
                        status: status.as_u16(),
                        url: current.to_string(),
                    })?;
                debug!(status = status.as_u16(), from = %current, to = %next, "following redirect");
                current = next;
                hops += 1;
                continue;
            }

            if !status.is_success() {
                return Err(InstallError::Download { status: status.as_u16(), url: current.to_string() });
            }

            let body = resp
                .bytes()
                .await
                .map_err(|source| InstallError::Transport { url: current.to_string(), source })?;
            debug!(bytes = body.len(), url = %current, "download complete");
            return Ok(Payload(body.to_vec()));
        }
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}
