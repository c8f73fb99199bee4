//! HTTP client for the push half of the smart transport protocol.
//!
//! A push is two round-trips against the remote: a GET on the ref
//! advertisement endpoint to learn the remote master tip, then a POST of the
//! negotiation line and pack stream to the receive endpoint. Both carry basic
//! auth credentials. Transport failures and HTTP error statuses surface as
//! [`RemoteError::AuthOrNetwork`]; a reply the server produced is returned to
//! the caller for interpretation.

use crate::areas::refs::MASTER_REF;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RemoteError;
use bytes::Bytes;
use reqwest::Client;

const RECEIVE_PACK_SERVICE: &str = "git-receive-pack";

pub struct Remote {
    url: String,
    username: String,
    password: String,
    client: Client,
}

impl Remote {
    pub fn new(url: String, username: String, password: String) -> Self {
        Remote {
            url,
            username,
            password,
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the ref advertisement and extract the remote master tip
    ///
    /// `None` means the remote has no master branch yet, so a push creates it.
    pub async fn discover_master(&self) -> anyhow::Result<Option<ObjectId>> {
        let url = format!("{}/info/refs?service={}", self.url, RECEIVE_PACK_SERVICE);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| RemoteError::AuthOrNetwork {
                url: url.clone(),
                source,
            })?;

        let body = response
            .bytes()
            .await
            .map_err(|source| RemoteError::AuthOrNetwork { url, source })?;

        Self::parse_master_tip(&body)
    }

    /// POST the negotiation line and pack stream to the receive endpoint
    ///
    /// Returns the raw response body; the caller decides whether the remote
    /// acknowledged the unpack.
    pub async fn send_pack(&self, payload: Bytes) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.url, RECEIVE_PACK_SERVICE);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .body(payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| RemoteError::AuthOrNetwork {
                url: url.clone(),
                source,
            })?;

        let body = response
            .text()
            .await
            .map_err(|source| RemoteError::AuthOrNetwork { url, source })?;

        Ok(body)
    }

    /// Pick the master tip out of a newline-delimited ref advertisement
    ///
    /// Length-prefixed control records (lines opening with the hex prefix
    /// `00`) are skipped; the first remaining line mentioning the master ref
    /// contributes its first whitespace-separated token as the tip.
    fn parse_master_tip(body: &[u8]) -> anyhow::Result<Option<ObjectId>> {
        for line in body.split(|&byte| byte == b'\n') {
            if line.starts_with(b"00") {
                continue;
            }

            let mentions_master = line
                .windows(MASTER_REF.len())
                .any(|window| window == MASTER_REF.as_bytes());
            if !mentions_master {
                continue;
            }

            let tip = line
                .split(|byte: &u8| byte.is_ascii_whitespace())
                .find(|token| !token.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Malformed ref advertisement line"))?;
            let tip = std::str::from_utf8(tip)
                .map_err(|_| anyhow::anyhow!("Invalid UTF-8 in ref advertisement"))?;

            return ObjectId::try_parse(String::from(tip)).map(Some);
        }

        Ok(None)
    }
}
