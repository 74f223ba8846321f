//! Record resolution
//!
//! Resolving a key fetches the record, stores it and returns the keys of its
//! neighbors (matches of a summoner, summoners of a match). Both resolvers
//! check the store first, so resolving a stored key costs no API call and
//! yields nothing.

use crate::context::CollectorContext;
use crate::error::CollectError;
use crate::models::{InsertOutcome, NewMatch, NewRecord, NewSummoner, RecordKind};
use tftc_common::time::now_rfc3339;
use tracing::{debug, info};

/// Resolve `key` of `kind`, returning the neighbor keys to explore
pub async fn resolve(
    ctx: &CollectorContext,
    kind: RecordKind,
    key: &str,
) -> Result<Vec<String>, CollectError> {
    match kind {
        RecordKind::Summoner => resolve_summoner(ctx, key).await,
        RecordKind::Match => resolve_match(ctx, key).await,
    }
}

/// Fetch and store a summoner, returning their recent match ids
///
/// Nothing is returned when the summoner was already stored (including by a
/// racing worker) or any lookup came back 404.
pub async fn resolve_summoner(
    ctx: &CollectorContext,
    puuid: &str,
) -> Result<Vec<String>, CollectError> {
    if ctx.store.exists(RecordKind::Summoner, puuid).await? {
        debug!(puuid = %puuid, "Summoner already scanned");
        return Ok(Vec::new());
    }

    let Some(summoner) = ctx.client.summoner_by_puuid(puuid).await? else {
        debug!(puuid = %puuid, "Summoner not found");
        return Ok(Vec::new());
    };

    let Some(entries) = ctx.client.league_entries_by_summoner(&summoner.id).await? else {
        debug!(puuid = %puuid, "Ranked entries not found");
        return Ok(Vec::new());
    };
    let ranked = entries.into_iter().next();

    let record = NewSummoner {
        puuid: puuid.to_string(),
        summoner_level: summoner.summoner_level,
        tier: ranked.as_ref().map(|entry| entry.tier.clone()),
        rank: ranked.as_ref().map(|entry| entry.rank.clone()),
        league_points: ranked.as_ref().map(|entry| entry.league_points),
        fetched_at: now_rfc3339(),
    };

    match ctx.store.insert_if_absent(&NewRecord::from(record)).await? {
        InsertOutcome::Inserted { id } => {
            info!(puuid = %puuid, id, "Stored summoner");
        }
        InsertOutcome::AlreadyPresent => return Ok(Vec::new()),
    }

    let match_ids = ctx
        .client
        .match_ids_by_puuid(puuid, ctx.settings.match_history_count)
        .await?;

    Ok(match_ids.unwrap_or_default())
}

/// Fetch and store a match, returning its participants' PUUIDs
pub async fn resolve_match(
    ctx: &CollectorContext,
    match_id: &str,
) -> Result<Vec<String>, CollectError> {
    if ctx.store.exists(RecordKind::Match, match_id).await? {
        debug!(match_id = %match_id, "Match already scanned");
        return Ok(Vec::new());
    }

    let Some(found) = ctx.client.match_by_id(match_id).await? else {
        debug!(match_id = %match_id, "Match not found");
        return Ok(Vec::new());
    };

    let participants = found.participant_puuids().to_vec();
    let record = NewMatch {
        match_id: match_id.to_string(),
        payload: serde_json::to_value(&found).map_err(tftc_common::Error::from)?,
        participants: participants.clone(),
        fetched_at: now_rfc3339(),
    };

    if let InsertOutcome::Inserted { id } =
        ctx.store.insert_if_absent(&NewRecord::from(record)).await?
    {
        info!(match_id = %match_id, id, "Stored match");
    }

    Ok(participants)
}
