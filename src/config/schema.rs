use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/bpm-tagger/config.toml` or `~/.config/bpm-tagger/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `BPM_TAGGER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Client id for the client-credentials flow.
    /// Falls back to `SPOTIPY_CLIENT_ID` when unset.
    pub client_id: Option<String>,
    /// Client secret for the client-credentials flow.
    /// Falls back to `SPOTIPY_CLIENT_SECRET` when unset.
    pub client_secret: Option<String>,
    /// Base URL of the Web API, without trailing slash.
    pub api_base_url: String,
    /// Token endpoint used to exchange the client credentials.
    pub auth_url: String,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
    /// Optional ISO 3166-1 market passed along with searches.
    pub market: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: "https://api.spotify.com/v1".to_string(),
            auth_url: "https://accounts.spotify.com/api/token".to_string(),
            timeout_secs: 30,
            market: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "ogg", "opus", "m4a", "wav", "aiff"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}
