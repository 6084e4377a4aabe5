//! Subject profile types produced by the encyclopedia scraper.
//!
//! Optional fields are plain `Option`s. The fixed "not found" texts that API
//! consumers expect are produced only by [`SubjectProfile::render`].

use serde::{Deserialize, Serialize};

pub const OFFICIAL_SITE_NOT_FOUND: &str = "official site not found";
pub const IMAGE_NOT_FOUND: &str = "image not found";
pub const PROFESSION_NOT_FOUND: &str = "profession not found";
pub const INFOBOX_NOT_FOUND: &str = "Infobox not found";
pub const SUMMARY_NOT_FOUND: &str = "summary not found";

/// Social platforms recognised on a subject's article page.
///
/// Declaration order is classification order: the first platform whose
/// domain appears in a link claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Youtube,
    Spotify,
    Soundcloud,
    X,
    Instagram,
    AppleMusic,
    Facebook,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 7] = [
        SocialPlatform::Youtube,
        SocialPlatform::Spotify,
        SocialPlatform::Soundcloud,
        SocialPlatform::X,
        SocialPlatform::Instagram,
        SocialPlatform::AppleMusic,
        SocialPlatform::Facebook,
    ];

    /// Wire key used in `social_links` objects.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Spotify => "spotify",
            SocialPlatform::Soundcloud => "soundcloud",
            SocialPlatform::X => "x",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::AppleMusic => "applemusic",
            SocialPlatform::Facebook => "facebook",
        }
    }

    /// Substrings that identify the platform in a link. `X` keeps the legacy
    /// `twitter.com` alongside `x.com`.
    #[must_use]
    pub fn domains(self) -> &'static [&'static str] {
        match self {
            SocialPlatform::Youtube => &["youtube.com"],
            SocialPlatform::Spotify => &["spotify.com"],
            SocialPlatform::Soundcloud => &["soundcloud.com"],
            SocialPlatform::X => &["twitter.com", "x.com"],
            SocialPlatform::Instagram => &["instagram.com"],
            SocialPlatform::AppleMusic => &["music.apple.com"],
            SocialPlatform::Facebook => &["facebook.com"],
        }
    }

    /// Classify a link by the first platform whose domain appears anywhere
    /// in `href`, so archive and redirect wrappers still count.
    #[must_use]
    pub fn classify(href: &str) -> Option<SocialPlatform> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.domains().iter().any(|domain| href.contains(*domain)))
    }
}

/// One optional URL per [`SocialPlatform`]. Every key is always serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub youtube: Option<String>,
    pub spotify: Option<String>,
    pub soundcloud: Option<String>,
    pub x: Option<String>,
    pub instagram: Option<String>,
    pub applemusic: Option<String>,
    pub facebook: Option<String>,
}

impl SocialLinks {
    #[must_use]
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        self.slot(platform).as_deref()
    }

    pub fn set(&mut self, platform: SocialPlatform, url: impl Into<String>) {
        *self.slot_mut(platform) = Some(url.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        SocialPlatform::ALL
            .into_iter()
            .all(|platform| self.get(platform).is_none())
    }

    fn slot(&self, platform: SocialPlatform) -> &Option<String> {
        match platform {
            SocialPlatform::Youtube => &self.youtube,
            SocialPlatform::Spotify => &self.spotify,
            SocialPlatform::Soundcloud => &self.soundcloud,
            SocialPlatform::X => &self.x,
            SocialPlatform::Instagram => &self.instagram,
            SocialPlatform::AppleMusic => &self.applemusic,
            SocialPlatform::Facebook => &self.facebook,
        }
    }

    fn slot_mut(&mut self, platform: SocialPlatform) -> &mut Option<String> {
        match platform {
            SocialPlatform::Youtube => &mut self.youtube,
            SocialPlatform::Spotify => &mut self.spotify,
            SocialPlatform::Soundcloud => &mut self.soundcloud,
            SocialPlatform::X => &mut self.x,
            SocialPlatform::Instagram => &mut self.instagram,
            SocialPlatform::AppleMusic => &mut self.applemusic,
            SocialPlatform::Facebook => &mut self.facebook,
        }
    }
}

/// Fields extracted from a subject's canonical article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub canonical_url: String,
    pub official_site_url: Option<String>,
    pub social_links: SocialLinks,
    pub image_url: Option<String>,
    pub profession: Option<String>,
    pub summary: Option<String>,
    /// Whether the page carried an information box at all.
    pub has_infobox: bool,
}

/// Wire form of a [`SubjectProfile`] with "not found" texts filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedProfile {
    pub canonical_url: String,
    pub official_site_url: String,
    pub social_links: SocialLinks,
    pub image_url: String,
    pub profession: String,
    pub summary: String,
}

impl SubjectProfile {
    #[must_use]
    pub fn render(&self) -> RenderedProfile {
        let profession_missing = if self.has_infobox {
            PROFESSION_NOT_FOUND
        } else {
            INFOBOX_NOT_FOUND
        };

        RenderedProfile {
            canonical_url: self.canonical_url.clone(),
            official_site_url: or_sentinel(self.official_site_url.as_deref(), OFFICIAL_SITE_NOT_FOUND),
            social_links: self.social_links.clone(),
            image_url: or_sentinel(self.image_url.as_deref(), IMAGE_NOT_FOUND),
            profession: or_sentinel(self.profession.as_deref(), profession_missing),
            summary: or_sentinel(self.summary.as_deref(), SUMMARY_NOT_FOUND),
        }
    }
}

fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    value.unwrap_or(sentinel).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_profile(has_infobox: bool) -> SubjectProfile {
        SubjectProfile {
            canonical_url: "https://ja.wikipedia.org/wiki/Example".to_string(),
            official_site_url: None,
            social_links: SocialLinks::default(),
            image_url: None,
            profession: None,
            summary: None,
            has_infobox,
        }
    }

    #[test]
    fn classify_matches_platform_domains() {
        assert_eq!(
            SocialPlatform::classify("https://www.youtube.com/@artist"),
            Some(SocialPlatform::Youtube)
        );
        assert_eq!(
            SocialPlatform::classify("//open.spotify.com/artist/1"),
            Some(SocialPlatform::Spotify)
        );
        assert_eq!(
            SocialPlatform::classify("https://music.apple.com/jp/artist/1"),
            Some(SocialPlatform::AppleMusic)
        );
    }

    #[test]
    fn classify_maps_twitter_and_x_to_same_platform() {
        assert_eq!(
            SocialPlatform::classify("https://twitter.com/artist"),
            Some(SocialPlatform::X)
        );
        assert_eq!(
            SocialPlatform::classify("https://x.com/artist"),
            Some(SocialPlatform::X)
        );
    }

    #[test]
    fn classify_finds_platform_inside_wrapped_urls() {
        assert_eq!(
            SocialPlatform::classify("https://web.archive.org/web/2020/https://twitter.com/taro"),
            Some(SocialPlatform::X)
        );
        assert_eq!(
            SocialPlatform::classify("https://www.google.com/url?q=https://www.youtube.com/@taro"),
            Some(SocialPlatform::Youtube)
        );
    }

    #[test]
    fn classify_prefers_earlier_platform_when_several_appear() {
        assert_eq!(
            SocialPlatform::classify("https://www.youtube.com/redirect?q=https://x.com/taro"),
            Some(SocialPlatform::Youtube)
        );
    }

    #[test]
    fn classify_ignores_unrelated_links() {
        assert_eq!(SocialPlatform::classify("https://www.apple.com/jp/"), None);
        assert_eq!(SocialPlatform::classify("/wiki/YouTube"), None);
        assert_eq!(SocialPlatform::classify("#cite_note-1"), None);
    }

    #[test]
    fn social_links_serialize_every_key() {
        let json = serde_json::to_value(SocialLinks::default()).expect("serialize");
        for platform in SocialPlatform::ALL {
            assert!(
                json.get(platform.key()).is_some_and(serde_json::Value::is_null),
                "missing null key {}",
                platform.key()
            );
        }
    }

    #[test]
    fn social_links_set_overwrites() {
        let mut links = SocialLinks::default();
        links.set(SocialPlatform::X, "https://twitter.com/a");
        links.set(SocialPlatform::X, "https://x.com/a");
        assert_eq!(links.get(SocialPlatform::X), Some("https://x.com/a"));
        assert!(!links.is_empty());
    }

    #[test]
    fn render_uses_infobox_sentinel_when_infobox_missing() {
        let rendered = bare_profile(false).render();
        assert_eq!(rendered.profession, INFOBOX_NOT_FOUND);
        assert_eq!(rendered.image_url, IMAGE_NOT_FOUND);
        assert_eq!(rendered.official_site_url, OFFICIAL_SITE_NOT_FOUND);
        assert_eq!(rendered.summary, SUMMARY_NOT_FOUND);
    }

    #[test]
    fn render_uses_profession_sentinel_when_row_missing() {
        let rendered = bare_profile(true).render();
        assert_eq!(rendered.profession, PROFESSION_NOT_FOUND);
    }

    #[test]
    fn render_passes_found_values_through() {
        let mut profile = bare_profile(true);
        profile.profession = Some("俳優, 歌手".to_string());
        profile.summary = Some("概要".to_string());
        let rendered = profile.render();
        assert_eq!(rendered.profession, "俳優, 歌手");
        assert_eq!(rendered.summary, "概要");
        assert_eq!(rendered.canonical_url, profile.canonical_url);
    }
}
