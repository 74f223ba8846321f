//! Riot TFT API response types
//!
//! Only the summoner and match shapes matter to the traversal; the league
//! types back the ladder lookups. Fields the API may omit are defaulted so a
//! partial document still decodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summoner profile (`/tft/summoner/v1/summoners/...`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    /// Encrypted summoner id (used by the league endpoints)
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_icon_id: i64,
    #[serde(default)]
    pub revision_date: i64,
    #[serde(default)]
    pub summoner_level: i64,
}

/// Ranked entry (`/tft/league/v1/entries/...`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    #[serde(default)]
    pub league_id: String,
    #[serde(default)]
    pub queue_type: String,
    #[serde(default)]
    pub tier: String,
    /// Division within the tier ("I".."IV")
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub summoner_id: String,
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub league_points: i64,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub hot_streak: bool,
}

/// Apex league listing (`/tft/league/v1/{challenger|grandmaster|master}`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueListDto {
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub league_id: String,
    #[serde(default)]
    pub queue: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LeagueItemDto>,
}

/// Entry inside a `LeagueListDto`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueItemDto {
    #[serde(default)]
    pub summoner_id: String,
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub league_points: i64,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub hot_streak: bool,
}

/// Full match document (`/tft/match/v1/matches/{matchId}`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    #[serde(default)]
    pub info: MatchInfo,
}

impl MatchDto {
    /// PUUIDs of everyone who played in the match
    pub fn participant_puuids(&self) -> &[String] {
        &self.metadata.participants
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchMetadata {
    #[serde(default)]
    pub data_version: String,
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub game_datetime: i64,
    #[serde(default)]
    pub game_length: f64,
    #[serde(default)]
    pub game_variation: Option<String>,
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub participants: Vec<MatchParticipant>,
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub tft_set_number: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchParticipant {
    #[serde(default)]
    pub companion: Companion,
    #[serde(default)]
    pub gold_left: i64,
    #[serde(default)]
    pub last_round: i64,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub placement: i64,
    #[serde(default)]
    pub players_eliminated: i64,
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub time_eliminated: f64,
    #[serde(default)]
    pub total_damage_to_players: i64,
    #[serde(default)]
    pub traits: Vec<TraitDto>,
    #[serde(default)]
    pub units: Vec<UnitDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Companion {
    #[serde(rename = "content_ID", default)]
    pub content_id: String,
    #[serde(rename = "skin_ID", default)]
    pub skin_id: i64,
    #[serde(default)]
    pub species: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TraitDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub num_units: i64,
    #[serde(default)]
    pub style: i64,
    #[serde(default)]
    pub tier_current: i64,
    #[serde(default)]
    pub tier_total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnitDto {
    #[serde(default)]
    pub character_id: String,
    #[serde(default)]
    pub items: Vec<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rarity: i64,
    #[serde(default)]
    pub tier: i64,
}

/// Ranked tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Challenger,
    Grandmaster,
    Master,
    Diamond,
    Platinum,
    Gold,
    Silver,
    Bronze,
    Iron,
}

impl Tier {
    /// Challenger, Grandmaster and Master have a single division and a league list
    pub fn is_apex(self) -> bool {
        matches!(self, Tier::Challenger | Tier::Grandmaster | Tier::Master)
    }

    /// Upper-case name used in API paths
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Challenger => "CHALLENGER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Master => "MASTER",
            Tier::Diamond => "DIAMOND",
            Tier::Platinum => "PLATINUM",
            Tier::Gold => "GOLD",
            Tier::Silver => "SILVER",
            Tier::Bronze => "BRONZE",
            Tier::Iron => "IRON",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Division within a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Division {
    I,
    II,
    III,
    IV,
}

impl Division {
    pub fn as_str(self) -> &'static str {
        match self {
            Division::I => "I",
            Division::II => "II",
            Division::III => "III",
            Division::IV => "IV",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
