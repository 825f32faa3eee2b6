//! Social network and eSports site links
//!
//! Both link sets are fixed-key maps of URL strings. Blank entries never
//! leave the client, and the service stores what it receives as JSON text.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Social networks a fan can link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialNetwork {
    Twitter,
    Instagram,
    Twitch,
}

impl SocialNetwork {
    pub const ALL: [SocialNetwork; 3] = [Self::Twitter, Self::Instagram, Self::Twitch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Twitch => "twitch",
        }
    }
}

/// eSports sites a fan can link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EsportsSite {
    Hltv,
    Faceit,
    Gametracker,
}

impl EsportsSite {
    pub const ALL: [EsportsSite; 3] = [Self::Hltv, Self::Faceit, Self::Gametracker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hltv => "hltv",
            Self::Faceit => "faceit",
            Self::Gametracker => "gametracker",
        }
    }
}

impl fmt::Display for SocialNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EsportsSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| format!("unknown social network '{}'", s))
    }
}

impl FromStr for EsportsSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|site| site.as_str() == s)
            .ok_or_else(|| format!("unknown eSports site '{}'", s))
    }
}

/// Social network profile URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitch: String,
}

impl SocialLinks {
    pub fn get(&self, network: SocialNetwork) -> &str {
        match network {
            SocialNetwork::Twitter => &self.twitter,
            SocialNetwork::Instagram => &self.instagram,
            SocialNetwork::Twitch => &self.twitch,
        }
    }

    pub fn set(&mut self, network: SocialNetwork, url: impl Into<String>) {
        let slot = match network {
            SocialNetwork::Twitter => &mut self.twitter,
            SocialNetwork::Instagram => &mut self.instagram,
            SocialNetwork::Twitch => &mut self.twitch,
        };
        *slot = url.into();
    }

    /// Entries worth sending: blank and whitespace-only values are dropped.
    pub fn filled(&self) -> BTreeMap<String, String> {
        filled(SocialNetwork::ALL.iter().map(|n| (n.as_str(), self.get(*n))))
    }

    /// Decode the service's stored JSON text, falling back to empty links.
    pub fn from_stored(raw: Option<&str>) -> Self {
        from_stored(raw, "social_media_links")
    }
}

/// eSports site profile URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsportsLinks {
    #[serde(default)]
    pub hltv: String,
    #[serde(default)]
    pub faceit: String,
    #[serde(default)]
    pub gametracker: String,
}

impl EsportsLinks {
    pub fn get(&self, site: EsportsSite) -> &str {
        match site {
            EsportsSite::Hltv => &self.hltv,
            EsportsSite::Faceit => &self.faceit,
            EsportsSite::Gametracker => &self.gametracker,
        }
    }

    pub fn set(&mut self, site: EsportsSite, url: impl Into<String>) {
        let slot = match site {
            EsportsSite::Hltv => &mut self.hltv,
            EsportsSite::Faceit => &mut self.faceit,
            EsportsSite::Gametracker => &mut self.gametracker,
        };
        *slot = url.into();
    }

    pub fn filled(&self) -> BTreeMap<String, String> {
        filled(EsportsSite::ALL.iter().map(|s| (s.as_str(), self.get(*s))))
    }

    pub fn from_stored(raw: Option<&str>) -> Self {
        from_stored(raw, "esports_profile_links")
    }

    /// All values as typed, including blank ones.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        EsportsSite::ALL.into_iter().map(move |site| self.get(site))
    }
}

fn filled<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    entries
        .filter(|(_, url)| !url.trim().is_empty())
        .map(|(key, url)| (key.to_string(), url.to_string()))
        .collect()
}

fn from_stored<T: DeserializeOwned + Default>(raw: Option<&str>, column: &str) -> T {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return T::default();
    };

    match serde_json::from_str(raw) {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!(column = column, error = %e, "Stored links are not valid JSON, using empty links");
            T::default()
        }
    }
}
