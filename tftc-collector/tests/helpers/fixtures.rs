//! Canned Riot API documents and their paths

use super::ScriptedTransport;
use serde_json::{json, Value};

/// Seed match used by the scenario tests
pub const SEED_MATCH: &str = "NA1_4092101718";

pub fn summoner_path(puuid: &str) -> String {
    format!("/tft/summoner/v1/summoners/by-puuid/{}", puuid)
}

pub fn league_path(puuid: &str) -> String {
    format!("/tft/league/v1/entries/by-summoner/{}", summoner_id(puuid))
}

pub fn match_ids_path(puuid: &str) -> String {
    format!("/tft/match/v1/matches/by-puuid/{}/ids?count=20", puuid)
}

pub fn match_path(match_id: &str) -> String {
    format!("/tft/match/v1/matches/{}", match_id)
}

/// Encrypted summoner id the fixtures use for `puuid`
pub fn summoner_id(puuid: &str) -> String {
    format!("sid-{}", puuid)
}

pub fn summoner_body(puuid: &str) -> Value {
    json!({
        "id": summoner_id(puuid),
        "accountId": format!("acc-{}", puuid),
        "puuid": puuid,
        "name": format!("Player {}", puuid),
        "profileIconId": 29,
        "revisionDate": 1_700_000_000_000i64,
        "summonerLevel": 150
    })
}

pub fn league_body(tier: &str, rank: &str, league_points: i64) -> Value {
    json!([{
        "leagueId": "league-1",
        "queueType": "RANKED_TFT",
        "tier": tier,
        "rank": rank,
        "leaguePoints": league_points,
        "wins": 12,
        "losses": 30
    }])
}

pub fn match_body(match_id: &str, participants: &[&str]) -> Value {
    json!({
        "metadata": {
            "data_version": "5",
            "match_id": match_id,
            "participants": participants
        },
        "info": {
            "game_datetime": 1_700_000_000_000i64,
            "game_length": 2100.5,
            "game_version": "Version 13.23",
            "participants": participants.iter().enumerate().map(|(i, puuid)| json!({
                "puuid": puuid,
                "placement": i + 1,
                "level": 8,
                "gold_left": 3,
                "companion": { "content_ID": "c-1", "skin_ID": 1, "species": "PetTFTAvatar" },
                "traits": [{ "name": "Set10_Jazz", "num_units": 2, "style": 1, "tier_current": 1, "tier_total": 3 }],
                "units": [{ "character_id": "TFT10_Ahri", "items": [1, 2], "rarity": 4, "tier": 2 }]
            })).collect::<Vec<_>>(),
            "queue_id": 1100,
            "tft_set_number": 10
        }
    })
}

/// Script a ranked summoner who played `match_ids`
pub fn script_summoner(transport: &ScriptedTransport, puuid: &str, match_ids: &[&str]) {
    transport.respond_json(summoner_path(puuid), &summoner_body(puuid));
    transport.respond_json(league_path(puuid), &league_body("GOLD", "II", 57));
    transport.respond_json(match_ids_path(puuid), &json!(match_ids));
}

pub fn script_match(transport: &ScriptedTransport, match_id: &str, participants: &[&str]) {
    transport.respond_json(match_path(match_id), &match_body(match_id, participants));
}
