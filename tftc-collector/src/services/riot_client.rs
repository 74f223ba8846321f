//! Riot TFT API client
//!
//! Every request waits on a single token-bucket limiter shared by all workers,
//! then goes through the retry policy:
//! - 2xx: decoded body
//! - 404: `Ok(None)`
//! - 429: wait `Retry-After * attempt + margin`, retry
//! - 500/502/503/504: wait the server cooldown, retry
//! - 400/401/403 and anything unexpected: `FetchError::Fatal`
//!
//! No wait follows the final attempt; exhausting attempts yields
//! `FetchError::Transient`.

use crate::config::{ApiConfig, RateLimitConfig, RetryConfig, Settings};
use crate::error::FetchError;
use crate::services::riot_types::{
    Division, LeagueEntryDto, LeagueListDto, MatchDto, SummonerDto, Tier,
};
use crate::services::transport::{HttpTransport, Transport};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::RateLimiter;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Direct (unkeyed) limiter shared by every request of one client
pub type ApiRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

type FetchResult<T> = Result<Option<T>, FetchError>;

/// Which API host serves an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// Shard-scoped: summoner and league endpoints
    Platform,
    /// Region-scoped: match endpoints
    Region,
}

pub struct RiotClient {
    transport: Arc<dyn Transport>,
    rate_limiter: ApiRateLimiter,
    retry: RetryConfig,
    api: ApiConfig,
}

impl RiotClient {
    /// Build a client that talks to the real API
    pub fn new(settings: &Settings) -> tftc_common::Result<Self> {
        let transport = HttpTransport::new(
            settings.api_key.clone(),
            settings.retry.request_timeout(),
        )?;

        Self::with_transport(
            Arc::new(transport),
            settings.api.clone(),
            settings.rate_limit,
            settings.retry,
        )
    }

    /// Build a client over any transport (tests use a scripted one)
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        api: ApiConfig,
        rate_limit: RateLimitConfig,
        retry: RetryConfig,
    ) -> tftc_common::Result<Self> {
        let rate_limiter = RateLimiter::direct(rate_limit.quota()?);

        Ok(Self {
            transport,
            rate_limiter,
            retry,
            api,
        })
    }

    fn url(&self, host: Host, path: &str) -> String {
        let base = match host {
            Host::Platform => &self.api.platform_url,
            Host::Region => &self.api.region_url,
        };
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    /// Perform one logical request: rate limit, retry, classify
    ///
    /// Returns the raw body on success and `None` on 404.
    pub async fn request(&self, host: Host, path: &str) -> FetchResult<String> {
        let url = self.url(host, path);
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_status = 0u16;

        for attempt in 1..=max_attempts {
            self.rate_limiter.until_ready().await;

            let response = self.transport.get(&url).await?;
            last_status = response.status;

            match response.status {
                200..=299 => return Ok(Some(response.body)),
                404 => {
                    debug!(endpoint = path, "Not found");
                    return Ok(None);
                }
                400 | 401 | 403 => {
                    return Err(FetchError::Fatal {
                        status: response.status,
                        endpoint: path.to_string(),
                    });
                }
                429 => {
                    if attempt == max_attempts {
                        break;
                    }
                    let wait = self
                        .retry
                        .rate_limit_wait(response.retry_after.as_deref(), attempt);
                    warn!(
                        endpoint = path,
                        attempt,
                        "Received a 429, waiting {} seconds",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                500 | 502 | 503 | 504 => {
                    if attempt == max_attempts {
                        break;
                    }
                    let wait = self.retry.server_error_cooldown();
                    warn!(
                        endpoint = path,
                        attempt,
                        status = response.status,
                        "Server error, waiting {} seconds",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                other => {
                    warn!(endpoint = path, status = other, "Unexpected status");
                    return Err(FetchError::Fatal {
                        status: other,
                        endpoint: path.to_string(),
                    });
                }
            }
        }

        Err(FetchError::Transient {
            endpoint: path.to_string(),
            attempts: max_attempts,
            last_status,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, host: Host, path: &str) -> FetchResult<T> {
        let Some(body) = self.request(host, path).await? else {
            return Ok(None);
        };

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| FetchError::Decode {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
    }

    pub async fn summoner_by_puuid(&self, puuid: &str) -> FetchResult<SummonerDto> {
        let path = format!("/tft/summoner/v1/summoners/by-puuid/{}", puuid);
        self.get_json(Host::Platform, &path).await
    }

    pub async fn summoner_by_id(&self, summoner_id: &str) -> FetchResult<SummonerDto> {
        let path = format!("/tft/summoner/v1/summoners/{}", summoner_id);
        self.get_json(Host::Platform, &path).await
    }

    /// Look up a summoner by display name
    pub async fn summoner_by_name(&self, name: &str) -> FetchResult<SummonerDto> {
        if name.trim().is_empty() {
            return Err(FetchError::InvalidRequest(
                "summoner name must not be empty".to_string(),
            ));
        }
        let path = format!(
            "/tft/summoner/v1/summoners/by-name/{}",
            utf8_percent_encode(name, NON_ALPHANUMERIC)
        );
        self.get_json(Host::Platform, &path).await
    }

    /// Ranked entries of a summoner; empty when unranked
    pub async fn league_entries_by_summoner(
        &self,
        summoner_id: &str,
    ) -> FetchResult<Vec<LeagueEntryDto>> {
        let path = format!("/tft/league/v1/entries/by-summoner/{}", summoner_id);
        self.get_json(Host::Platform, &path).await
    }

    /// Most recent match ids played by `puuid`
    pub async fn match_ids_by_puuid(&self, puuid: &str, count: u32) -> FetchResult<Vec<String>> {
        let path = format!("/tft/match/v1/matches/by-puuid/{}/ids?count={}", puuid, count);
        self.get_json(Host::Region, &path).await
    }

    pub async fn match_by_id(&self, match_id: &str) -> FetchResult<MatchDto> {
        let path = format!("/tft/match/v1/matches/{}", match_id);
        self.get_json(Host::Region, &path).await
    }

    /// One page of a tier/division ladder
    ///
    /// Pages start at 1. Apex tiers only have division I.
    pub async fn league_entries(
        &self,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> FetchResult<Vec<LeagueEntryDto>> {
        if page == 0 {
            return Err(FetchError::InvalidRequest(
                "league pages start at 1".to_string(),
            ));
        }
        if tier.is_apex() && division != Division::I {
            return Err(FetchError::InvalidRequest(format!(
                "{} only has division I",
                tier
            )));
        }

        let path = format!("/tft/league/v1/entries/{}/{}?page={}", tier, division, page);
        self.get_json(Host::Platform, &path).await
    }

    /// Full league of an apex tier
    pub async fn league_list(&self, tier: Tier) -> FetchResult<LeagueListDto> {
        if !tier.is_apex() {
            return Err(FetchError::InvalidRequest(format!(
                "{} has no league list; use league_entries",
                tier
            )));
        }

        let path = format!("/tft/league/v1/{}", tier.as_str().to_lowercase());
        self.get_json(Host::Platform, &path).await
    }
}
