use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Event type emitted when a media server deletes an item
pub const DELETE_EVENT: &str = "deep.delete";

/// Library events handled by every supported server
const LIBRARY_EVENTS: &[&str] = &["library.new"];

/// Media types whose payload may carry a series name
const SERIES_LIKE: [&str; 5] = ["tv", "series", "episode", "season", "show"];

/// Media server that sends webhooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaServer {
    #[default]
    Emby,
    Jellyfin,
    Plex,
}

impl MediaServer {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emby => "emby",
            Self::Jellyfin => "jellyfin",
            Self::Plex => "plex",
        }
    }
}

impl std::fmt::Display for MediaServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emby" => Ok(Self::Emby),
            "jellyfin" => Ok(Self::Jellyfin),
            "plex" => Ok(Self::Plex),
            _ => Err(format!("Unknown media server: {s}")),
        }
    }
}

/// Event types that trigger a cleanup for the given server
#[must_use]
pub const fn allowed_events(server: MediaServer) -> &'static [&'static str] {
    match server {
        MediaServer::Emby | MediaServer::Jellyfin | MediaServer::Plex => LIBRARY_EVENTS,
    }
}

/// Display label for a webhook media type
#[must_use]
pub fn media_type_label(media_type: Option<&str>) -> String {
    let Some(media_type) = media_type.filter(|t| !t.is_empty()) else {
        return "Unknown type".to_string();
    };

    match media_type.to_lowercase().as_str() {
        "movie" => "Movie".to_string(),
        "tv" => "TV series".to_string(),
        "series" | "episode" | "show" => "Series".to_string(),
        "season" => "Season".to_string(),
        _ => media_type.to_string(),
    }
}

/// Webhook event forwarded by the media server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Raw server payload, either a JSON object or a string holding JSON
    #[serde(default)]
    pub json_object: Option<serde_json::Value>,
}

impl WebhookEvent {
    /// De-duplication key: `item_id_event_channel`
    #[must_use]
    pub fn dedup_key(&self) -> String {
        super::EventDeduplicator::key(
            self.item_id.as_deref(),
            self.event.as_deref(),
            self.channel.as_deref(),
        )
    }

    /// Whether the media type denotes a series, season or episode
    #[must_use]
    pub fn is_series_like(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|t| SERIES_LIKE.contains(&t.to_lowercase().as_str()))
    }

    /// `Item.SeriesName` from the payload, if any
    #[must_use]
    pub fn series_name(&self) -> Option<String> {
        let payload = match self.json_object.as_ref()? {
            serde_json::Value::String(raw) => match serde_json::from_str(raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Failed to parse webhook payload: {}", e);
                    return None;
                }
            },
            value => value.clone(),
        };

        payload
            .get("Item")?
            .get("SeriesName")?
            .as_str()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Title to search CAS with: the series name for series-like items, else the item name
    #[must_use]
    pub fn search_title(&self) -> Option<String> {
        if self.is_series_like() {
            if let Some(series) = self.series_name() {
                debug!("Series-like item, searching by series name: {}", series);
                return Some(series);
            }
        } else {
            debug!(
                "Media type {:?}, searching by item name",
                self.media_type.as_deref()
            );
        }

        self.item_name.clone().filter(|name| !name.is_empty())
    }
}
