//! The boxcat announcement feed.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::http::HttpClient;
use crate::protocol::{Endpoint, PATH_EVENTS, status};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusResult {
    Success,
    Offline,
    BadClientVersion,
    ParseError,
}

/// Announcement for one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventStatus {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub events: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusReport {
    pub result: StatusResult,
    pub global: Option<String>,
    pub games:  BTreeMap<String, EventStatus>,
}

impl StatusReport {
    pub fn empty(result: StatusResult) -> Self {
        Self {
            result,
            global: None,
            games: BTreeMap::new(),
        }
    }
}

/// Fetch and parse the feed. Never fails: problems become a [`StatusResult`].
pub async fn fetch_status<C: HttpClient>(client: &C, endpoint: &Endpoint) -> StatusReport {
    let url = endpoint.url(PATH_EVENTS);
    let headers = endpoint.identity_headers();

    let response = match client.get(&url, &headers, endpoint.timeout).await {
        Ok(response) => response,
        Err(e) => {
            warn!(%url, error = %e, "no response from boxcat status feed");
            return StatusReport::empty(StatusResult::Offline);
        }
    };

    if response.status == status::BAD_CLIENT_VERSION {
        return StatusReport::empty(StatusResult::BadClientVersion);
    }

    let report = parse_status(&response.body);
    debug!(result = ?report.result, games = report.games.len(), "parsed boxcat status feed");
    report
}

/// Parse a feed body.
///
/// Only malformed JSON is an error. Anything else unexpected is read as absent:
/// a missing or non-boolean `online` means offline, non-string `header`, `footer`
/// and `global` are dropped, non-string events are skipped one by one, and
/// entries without a string `name` are ignored. A repeated name replaces the
/// earlier entry.
pub fn parse_status(body: &[u8]) -> StatusReport {
    let json: Value = match serde_json::from_slice(body) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "boxcat status feed is not valid JSON");
            return StatusReport::empty(StatusResult::ParseError);
        }
    };

    if json.get("online").and_then(Value::as_bool) != Some(true) {
        return StatusReport::empty(StatusResult::Offline);
    }

    let global = string_field(&json, "global");

    let mut games = BTreeMap::new();
    for game in json.get("games").and_then(Value::as_array).into_iter().flatten() {
        let Some(name) = game.get("name").and_then(Value::as_str) else {
            continue;
        };

        let events = game
            .get("events")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect();

        games.insert(
            name.to_string(),
            EventStatus {
                header: string_field(game, "header"),
                footer: string_field(game, "footer"),
                events,
            },
        );
    }

    StatusReport {
        result: StatusResult::Success,
        global,
        games,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
