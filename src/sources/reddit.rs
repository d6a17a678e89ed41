//! Reddit-style JSON listing fetcher.
//!
//! Each source id maps to `<base>/r/<id>.json`. The body is expected to be a
//! listing envelope (see [`Listing`]). Any deviation, whether a transport
//! error, a non-2xx status, a timeout or an undecodable body, is reported as
//! a [`FetchError`] and left to the caller to account for.

use super::is_valid_source_id;
use crate::config::FetchSettings;
use crate::error::{FetchError, RunError};
use crate::models::Listing;
use crate::utils::{looks_truncated, truncate_for_log};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Fetches listings for source ids from one base URL.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RedditSource {
    client: Client,
    base_url: Url,
}

impl RedditSource {
    /// Build a fetcher whose requests all carry the configured deadline and
    /// User-Agent.
    pub fn new(settings: &FetchSettings) -> Result<Self, RunError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(RunError::Client)?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    /// Canonical listing URL for `source`.
    pub fn listing_url(&self, source: &str) -> Result<Url, FetchError> {
        let invalid = || FetchError::InvalidSource {
            source_id: source.to_string(),
        };
        if !is_valid_source_id(source) {
            return Err(invalid());
        }
        self.base_url
            .join(&format!("r/{source}.json"))
            .map_err(|_| invalid())
    }

    /// Perform one GET for `source` and decode the listing.
    ///
    /// Emits exactly one "Fetching" status event before the request goes out.
    /// The body of a non-2xx response is never decoded.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_listing(&self, source: &str) -> Result<Listing, FetchError> {
        let url = self.listing_url(source)?;
        info!(%url, "Fetching");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;
        debug!(bytes = body.len(), "Received listing body");

        let listing = serde_json::from_slice::<Listing>(&body).map_err(|e| {
            warn!(
                truncated = looks_truncated(&e),
                body_preview = %truncate_for_log(&String::from_utf8_lossy(&body), 200),
                "Body is not a listing"
            );
            FetchError::Decode {
                url: url.to_string(),
                source: e,
            }
        })?;

        debug!(items = listing.len(), "Decoded listing");
        Ok(listing)
    }
}
