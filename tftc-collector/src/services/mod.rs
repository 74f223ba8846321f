//! Remote API access: transport, rate-limited client and response types

pub mod riot_client;
pub mod riot_types;
pub mod transport;

pub use riot_client::{ApiRateLimiter, Host, RiotClient};
pub use riot_types::{
    Division, LeagueEntryDto, LeagueListDto, MatchDto, SummonerDto, Tier,
};
pub use transport::{ApiResponse, HttpTransport, Transport};
