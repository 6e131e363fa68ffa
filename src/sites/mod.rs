/// Site profiles: the fixed toggle vocabulary for each restricted site
pub mod twitter;
pub mod youtube;

use web_sys::Document;

use crate::media::MediaGate;
use crate::settings::Settings;

/// A named, independently switchable content transformation.
///
/// `apply` must be idempotent and purely additive (marker classes, focus
/// redirection); `clear` removes exactly the markers `apply` added. Both
/// are best-effort: missing page elements are a no-op.
pub struct Toggle {
    pub name: &'static str,
    pub enabled: fn(&Settings) -> bool,
    pub apply: fn(&Document, &MediaGate),
    pub clear: fn(&Document, &MediaGate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Youtube,
    Twitter,
}

impl Site {
    pub fn from_name(name: &str) -> Option<Site> {
        match name {
            "youtube" => Some(Site::Youtube),
            "twitter" => Some(Site::Twitter),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Site::Youtube => "youtube",
            Site::Twitter => "twitter",
        }
    }

    /// Body class set while the site's restrictions are active; the
    /// extension stylesheet keys its static rules off this.
    pub fn gate_class(self) -> &'static str {
        match self {
            Site::Youtube => "shield-youtube-active",
            Site::Twitter => "shield-twitter-active",
        }
    }

    pub fn toggles(self) -> &'static [Toggle] {
        match self {
            Site::Youtube => &youtube::TOGGLES,
            Site::Twitter => &twitter::TOGGLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Site::from_name("youtube"), Some(Site::Youtube));
        assert_eq!(Site::from_name("twitter"), Some(Site::Twitter));
        assert_eq!(Site::from_name("tiktok"), None);
        assert_eq!(Site::from_name(""), None);
    }

    #[test]
    fn test_name_roundtrip() {
        for site in [Site::Youtube, Site::Twitter] {
            assert_eq!(Site::from_name(site.name()), Some(site));
        }
    }

    #[test]
    fn test_gate_classes_are_distinct() {
        assert_ne!(Site::Youtube.gate_class(), Site::Twitter.gate_class());
    }

    #[test]
    fn test_toggle_names_unique_per_site() {
        for site in [Site::Youtube, Site::Twitter] {
            let names: Vec<&str> = site.toggles().iter().map(|t| t.name).collect();
            let mut deduped = names.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), names.len(), "{:?}", names);
        }
    }

    #[test]
    fn test_toggle_predicates_resample_settings() {
        let mut settings = Settings::default();

        let enabled_count = |settings: &Settings, site: Site| {
            site.toggles()
                .iter()
                .filter(|t| (t.enabled)(settings))
                .count()
        };

        let before = enabled_count(&settings, Site::Youtube);
        settings.youtube.hide_shorts = false;
        assert_eq!(enabled_count(&settings, Site::Youtube), before - 1);

        settings.youtube.disable_autoplay = true;
        assert_eq!(enabled_count(&settings, Site::Youtube), before);

        let before = enabled_count(&settings, Site::Twitter);
        settings.twitter.hide_trends = false;
        settings.twitter.stop_autoplay = true;
        assert_eq!(enabled_count(&settings, Site::Twitter), before);
    }

    #[test]
    fn test_default_toggle_states() {
        let settings = Settings::default();
        let on = |site: Site, name: &str| {
            site.toggles()
                .iter()
                .find(|t| t.name == name)
                .map(|t| (t.enabled)(&settings))
                .unwrap_or_else(|| panic!("no toggle named {}", name))
        };

        assert!(on(Site::Youtube, "hide-shorts"));
        assert!(on(Site::Youtube, "hide-related"));
        assert!(on(Site::Youtube, "hide-comments"));
        assert!(on(Site::Youtube, "hide-endscreen"));
        assert!(!on(Site::Youtube, "block-autoplay"));
        assert!(!on(Site::Youtube, "hide-header-badges"));

        assert!(on(Site::Twitter, "default-following"));
        assert!(on(Site::Twitter, "hide-trends"));
        assert!(!on(Site::Twitter, "hide-recommendations"));
        assert!(!on(Site::Twitter, "block-autoplay"));
    }
}
