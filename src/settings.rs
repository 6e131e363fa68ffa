/// Settings document shared with the options popup via chrome.storage.sync
use serde::{Deserialize, Serialize};

/// One wall-clock restriction window, `"HH:MM"` endpoints inclusive.
///
/// `end < start` means the window wraps past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Both endpoints as minutes of the day, or None if either is malformed.
    pub fn minutes(&self) -> Option<(u16, u16)> {
        Some((parse_hhmm(&self.start)?, parse_hhmm(&self.end)?))
    }
}

fn parse_hhmm(s: &str) -> Option<u16> {
    let (hours, minutes) = s.split_once(':')?;
    let hours: u16 = hours.trim().parse().ok()?;
    let minutes: u16 = minutes.trim().parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Schedule fields shared by the common block and every per-site block.
///
/// Stored flattened alongside the site's toggle flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schedule {
    pub enabled: bool,
    pub always_on: bool,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday.
    pub active_days: Vec<u8>,
    pub time_slots: Vec<TimeSlot>,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            enabled: true,
            always_on: true,
            active_days: Vec::new(),
            time_slots: vec![TimeSlot::new("07:00", "12:00")],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonSettings {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub grayscale: bool,
}

impl Default for CommonSettings {
    fn default() -> Self {
        CommonSettings {
            schedule: Schedule::default(),
            grayscale: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YoutubeSettings {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub hide_shorts: bool,
    pub redirect_home: bool,
    pub hide_related: bool,
    pub hide_endscreen: bool,
    pub hide_comments: bool,
    pub disable_autoplay: bool,
    pub hide_header_badges: bool,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        YoutubeSettings {
            schedule: Schedule::default(),
            hide_shorts: true,
            redirect_home: true,
            hide_related: true,
            hide_endscreen: true,
            hide_comments: true,
            disable_autoplay: false,
            hide_header_badges: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwitterSettings {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub default_following: bool,
    pub hide_recommendations: bool,
    pub hide_trends: bool,
    pub stop_autoplay: bool,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        TwitterSettings {
            schedule: Schedule::default(),
            default_following: true,
            hide_recommendations: false,
            hide_trends: true,
            stop_autoplay: false,
        }
    }
}

/// TikTok has no schedule: the block is unconditional while the flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiktokSettings {
    pub block: bool,
}

impl Default for TiktokSettings {
    fn default() -> Self {
        TiktokSettings { block: true }
    }
}

/// Root settings document.
///
/// Owned by the options popup; the core only reads it. Every field falls
/// back to the shipped default when missing, so a partial document from an
/// older version merges cleanly instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub common: CommonSettings,
    pub youtube: YoutubeSettings,
    pub twitter: TwitterSettings,
    pub tiktok: TiktokSettings,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            common: CommonSettings::default(),
            youtube: YoutubeSettings::default(),
            twitter: TwitterSettings::default(),
            tiktok: TiktokSettings::default(),
            dark_mode: false,
        }
    }
}

impl Settings {
    /// Drop malformed time slots from every schedule block.
    ///
    /// A slot that does not parse as `"HH:MM"` contributes no restriction
    /// window (fails closed); each drop is logged once at load time so the
    /// evaluator never has to re-check strings.
    pub fn normalized(mut self) -> Settings {
        retain_valid_slots(&mut self.common.schedule.time_slots, "common");
        retain_valid_slots(&mut self.youtube.schedule.time_slots, "youtube");
        retain_valid_slots(&mut self.twitter.schedule.time_slots, "twitter");
        self
    }
}

fn retain_valid_slots(slots: &mut Vec<TimeSlot>, block: &str) {
    slots.retain(|slot| {
        let valid = slot.minutes().is_some();
        if !valid {
            log::warn!(
                "{}: dropping malformed time slot {}-{}",
                block,
                slot.start,
                slot.end
            );
        }
        valid
    });
}
