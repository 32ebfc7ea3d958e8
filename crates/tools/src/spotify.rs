//! Music catalog provider tools
//!
//! Planners sometimes namespace these as `spotify.search_track`; the prefix
//! is stripped before decoding.

use serde_json::{json, Value};

use plan_relay_core::Args;

use crate::args::{ArgReader, DecodeError, DecodeResult};
use crate::ProviderTool;

/// How a pending OAuth login is completed.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthGrant {
    Code(String),
    RedirectUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpotifyTool {
    Whoami,
    AuthBegin,
    AuthComplete(AuthGrant),
    SearchTrack {
        query: String,
        market: Option<String>,
        limit: i64,
    },
    AnalyzeMood {
        prompt: String,
    },
    GetRecommendations {
        seed_tracks: Vec<String>,
        mood: Option<String>,
        energy: Option<f64>,
        valence: Option<f64>,
        danceability: Option<f64>,
        tempo: Option<f64>,
        limit: i64,
    },
    CreatePlaylistWithTracks {
        name: String,
        track_ids: Vec<String>,
        description: String,
        public: bool,
    },
    ExplainSelection {
        tracks: Value,
        context: Value,
    },
    BuildPlaylistFromProfile {
        mood_prompt: String,
        name: Option<String>,
        public: bool,
        limit: i64,
    },
    CreatePlaylist {
        name: String,
        description: String,
        public: bool,
    },
    AddToPlaylist {
        playlist_id: String,
        track_ids: Vec<String>,
    },
    EnsureDeviceReady,
    PlayPlaylist {
        playlist_id: String,
        device_id: Option<String>,
    },
    CreatePublicMix {
        mood_prompt: String,
        name: String,
        limit: i64,
    },
}

impl SpotifyTool {
    /// Strip the optional `spotify.` namespace.
    pub fn canonical_name(tool: &str) -> &str {
        tool.strip_prefix("spotify.").unwrap_or(tool)
    }
}

impl ProviderTool for SpotifyTool {
    fn decode(tool: &str, args: &Args) -> DecodeResult<Self> {
        let tool = Self::canonical_name(tool);
        let r = ArgReader::new(tool, args);
        let decoded = match tool {
            "whoami" => Self::Whoami,
            "auth_begin" => Self::AuthBegin,
            "auth_complete" => {
                if let Some(code) = r.non_empty_str("code")? {
                    Self::AuthComplete(AuthGrant::Code(code))
                } else if let Some(url) = r.non_empty_str("redirect_url")? {
                    Self::AuthComplete(AuthGrant::RedirectUrl(url))
                } else {
                    return Err(r.missing_alternative("'code' or 'redirect_url'"));
                }
            }
            "search_track" => Self::SearchTrack {
                query: r.required_str("query")?,
                market: r.optional_str("market")?,
                limit: r.int_or("limit", 10)?,
            },
            "analyze_mood" => Self::AnalyzeMood {
                prompt: r.required_str("prompt")?,
            },
            "get_recommendations" => Self::GetRecommendations {
                seed_tracks: r.string_list("seed_tracks")?,
                mood: r.optional_str("mood")?,
                energy: r.optional_f64("energy")?,
                valence: r.optional_f64("valence")?,
                danceability: r.optional_f64("danceability")?,
                tempo: r.optional_f64("tempo")?,
                limit: r.int_or("limit", 20)?,
            },
            "create_playlist_with_tracks" => Self::CreatePlaylistWithTracks {
                name: r.required_str("name")?,
                track_ids: r.string_list("track_ids")?,
                description: r.str_or("description", "")?,
                public: r.bool_or("public", false)?,
            },
            "explain_selection" => Self::ExplainSelection {
                tracks: r.required_value("tracks")?,
                context: r.required_value("context")?,
            },
            "build_playlist_from_profile" => Self::BuildPlaylistFromProfile {
                mood_prompt: r.required_str("mood_prompt")?,
                name: r.optional_str("name")?,
                public: r.bool_or("public", false)?,
                limit: r.int_or("limit", 25)?,
            },
            "create_playlist" => Self::CreatePlaylist {
                name: r.required_str("name")?,
                description: r.str_or("description", "")?,
                public: r.bool_or("public", false)?,
            },
            "add_to_playlist" => Self::AddToPlaylist {
                playlist_id: r.required_str("playlist_id")?,
                track_ids: r.required_string_list("track_ids")?,
            },
            "ensure_device_ready" => Self::EnsureDeviceReady,
            "play_playlist" => Self::PlayPlaylist {
                playlist_id: r.required_str("playlist_id")?,
                device_id: r.optional_str("device_id")?,
            },
            "create_public_mix" => Self::CreatePublicMix {
                mood_prompt: r.required_str("mood_prompt")?,
                name: r.str_or("name", "Bot Mix")?,
                limit: r.int_or("limit", 20)?,
            },
            other => {
                return Err(DecodeError::Unsupported {
                    tool: other.to_string(),
                })
            }
        };
        Ok(decoded)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Whoami => "whoami",
            Self::AuthBegin => "auth_begin",
            Self::AuthComplete(_) => "auth_complete",
            Self::SearchTrack { .. } => "search_track",
            Self::AnalyzeMood { .. } => "analyze_mood",
            Self::GetRecommendations { .. } => "get_recommendations",
            Self::CreatePlaylistWithTracks { .. } => "create_playlist_with_tracks",
            Self::ExplainSelection { .. } => "explain_selection",
            Self::BuildPlaylistFromProfile { .. } => "build_playlist_from_profile",
            Self::CreatePlaylist { .. } => "create_playlist",
            Self::AddToPlaylist { .. } => "add_to_playlist",
            Self::EnsureDeviceReady => "ensure_device_ready",
            Self::PlayPlaylist { .. } => "play_playlist",
            Self::CreatePublicMix { .. } => "create_public_mix",
        }
    }

    fn arguments(&self) -> Value {
        match self {
            Self::Whoami | Self::AuthBegin | Self::EnsureDeviceReady => json!({}),
            Self::AuthComplete(AuthGrant::Code(code)) => json!({"code": code}),
            Self::AuthComplete(AuthGrant::RedirectUrl(url)) => json!({"redirect_url": url}),
            Self::SearchTrack {
                query,
                market,
                limit,
            } => json!({"query": query, "market": market, "limit": limit}),
            Self::AnalyzeMood { prompt } => json!({"prompt": prompt}),
            Self::GetRecommendations {
                seed_tracks,
                mood,
                energy,
                valence,
                danceability,
                tempo,
                limit,
            } => json!({
                "seed_tracks": seed_tracks,
                "mood": mood,
                "energy": energy,
                "valence": valence,
                "danceability": danceability,
                "tempo": tempo,
                "limit": limit,
            }),
            Self::CreatePlaylistWithTracks {
                name,
                track_ids,
                description,
                public,
            } => json!({
                "name": name,
                "track_ids": track_ids,
                "description": description,
                "public": public,
            }),
            Self::ExplainSelection { tracks, context } => {
                json!({"tracks": tracks, "context": context})
            }
            Self::BuildPlaylistFromProfile {
                mood_prompt,
                name,
                public,
                limit,
            } => json!({
                "mood_prompt": mood_prompt,
                "name": name,
                "public": public,
                "limit": limit,
            }),
            Self::CreatePlaylist {
                name,
                description,
                public,
            } => json!({"name": name, "description": description, "public": public}),
            Self::AddToPlaylist {
                playlist_id,
                track_ids,
            } => json!({"playlist_id": playlist_id, "track_ids": track_ids}),
            Self::PlayPlaylist {
                playlist_id,
                device_id,
            } => json!({"playlist_id": playlist_id, "device_id": device_id}),
            Self::CreatePublicMix {
                mood_prompt,
                name,
                limit,
            } => json!({"mood_prompt": mood_prompt, "name": name, "limit": limit}),
        }
    }
}
