/// Restriction-window evaluation: decides whether a site is restricted now
use crate::settings::{Schedule, Settings, TimeSlot};
use crate::sites::Site;

/// A wall-clock instant reduced to what the evaluator needs.
///
/// Built from `js_sys::Date` at the call site so the evaluation itself
/// stays deterministic and clock-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,
    /// Minutes since local midnight, 0..=1439.
    pub minute_of_day: u16,
}

impl LocalTime {
    pub fn new(weekday: u8, hours: u16, minutes: u16) -> LocalTime {
        LocalTime {
            weekday,
            minute_of_day: hours * 60 + minutes,
        }
    }

    pub fn now() -> LocalTime {
        let date = js_sys::Date::new_0();
        LocalTime {
            weekday: date.get_day() as u8,
            minute_of_day: (date.get_hours() * 60 + date.get_minutes()) as u16,
        }
    }
}

/// Whether restrictions are active for `site` at `now`.
///
/// Decision order, first match wins:
/// 1. global always-on,
/// 2. site disabled -> inactive,
/// 3. site always-on,
/// 4. common schedule (day + any slot),
/// 5. site's own day list, then its own slots.
pub fn restrictions_active(settings: &Settings, site: Site, now: LocalTime) -> bool {
    if settings.common.schedule.always_on {
        return true;
    }

    let site_schedule = match site {
        Site::Youtube => &settings.youtube.schedule,
        Site::Twitter => &settings.twitter.schedule,
    };

    if !site_schedule.enabled {
        return false;
    }
    if site_schedule.always_on {
        return true;
    }

    // The common window applies to every site; no match falls through to
    // the site's own schedule.
    if in_window(&settings.common.schedule, now) {
        return true;
    }

    if !site_schedule.active_days.contains(&now.weekday) {
        return false;
    }
    any_slot_contains(&site_schedule.time_slots, now.minute_of_day)
}

fn in_window(schedule: &Schedule, now: LocalTime) -> bool {
    schedule.active_days.contains(&now.weekday)
        && any_slot_contains(&schedule.time_slots, now.minute_of_day)
}

fn any_slot_contains(slots: &[TimeSlot], minute: u16) -> bool {
    slots
        .iter()
        .filter_map(TimeSlot::minutes)
        .any(|(start, end)| slot_contains(start, end, minute))
}

/// Closed-closed interval test, wrap-aware.
///
/// `end < start` means the window spans midnight.
pub fn slot_contains(start: u16, end: u16, minute: u16) -> bool {
    if end > start {
        start <= minute && minute <= end
    } else {
        minute >= start || minute <= end
    }
}
