use chrono::{Datelike, Local, Weekday};
use egui::{Color32, RichText, Ui};

use crate::config::WeekStart;
use crate::i18n::Translate;
use crate::model::{DaySet, ModelError, ProfileCollection};

use super::theme::accent;

/// Short day names, indexed 0 = Sunday
pub const DAY_KEYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday(day: u8) -> Option<Weekday> {
    WEEKDAYS.get(usize::from(day)).copied()
}

/// Day index (0 = Sunday) of a chrono weekday
pub fn day_index(weekday: Weekday) -> u8 {
    // num_days_from_sunday is always below 7
    weekday.num_days_from_sunday() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayToggle {
    Day(u8),
    Holiday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayEntry {
    pub toggle: DayToggle,
    pub key: &'static str,
    pub checked: bool,
}

/// Checkbox row for a profile's days plus the optional holiday flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOfWeekPanel {
    pub week_start: WeekStart,
    pub holiday_visible: bool,
}

impl DayOfWeekPanel {
    pub fn new(week_start: WeekStart, holiday_visible: bool) -> Self {
        Self {
            week_start,
            holiday_visible,
        }
    }

    /// Checkboxes in display order
    pub fn entries(&self, days: DaySet, holiday: bool) -> Vec<DayEntry> {
        let mut entries: Vec<DayEntry> = self
            .week_start
            .order()
            .into_iter()
            .map(|day| DayEntry {
                toggle: DayToggle::Day(day),
                key: DAY_KEYS[usize::from(day)],
                checked: days.contains(day),
            })
            .collect();
        if self.holiday_visible {
            entries.push(DayEntry {
                toggle: DayToggle::Holiday,
                key: "Holiday",
                checked: holiday,
            });
        }
        entries
    }

    /// Draw the row; returns the checkbox the user flipped this frame
    pub fn render(&self, ui: &mut Ui, days: DaySet, holiday: bool, t: &dyn Translate) -> Option<DayToggle> {
        let today = day_index(Local::now().weekday());
        let mut clicked = None;

        ui.horizontal_wrapped(|ui| {
            for entry in self.entries(days, holiday) {
                let mut checked = entry.checked;
                let mut label = RichText::new(t.t(entry.key));
                if entry.toggle == DayToggle::Day(today) {
                    label = label.color(accent());
                } else if entry.toggle == DayToggle::Holiday {
                    label = label.color(Color32::from_rgb(0xe5, 0xc0, 0x7b));
                }
                let response = ui.checkbox(&mut checked, label);
                let response = match entry.toggle {
                    DayToggle::Day(day) => match weekday(day) {
                        Some(weekday) => response.on_hover_text(weekday.to_string()),
                        None => response,
                    },
                    DayToggle::Holiday => response,
                };
                if response.changed() {
                    clicked = Some(entry.toggle);
                }
            }
        });

        clicked
    }
}

pub fn apply_toggle(
    profiles: &ProfileCollection,
    id: &str,
    toggle: DayToggle,
) -> Result<ProfileCollection, ModelError> {
    match toggle {
        DayToggle::Day(day) => profiles.toggle_day(id, day),
        DayToggle::Holiday => profiles.toggle_holiday(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileData, ProfileNode};

    fn keys(entries: &[DayEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.key).collect()
    }

    #[test]
    fn sunday_start_lists_in_index_order() {
        let panel = DayOfWeekPanel::new(WeekStart::Sunday, false);
        let entries = panel.entries(DaySet::WORKDAYS, false);
        assert_eq!(keys(&entries), vec!["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]);
        let checked: Vec<bool> = entries.iter().map(|entry| entry.checked).collect();
        assert_eq!(checked, vec![false, true, true, true, true, true, false]);
    }

    #[test]
    fn monday_start_moves_sunday_last_and_adds_holiday() {
        let panel = DayOfWeekPanel::new(WeekStart::Monday, true);
        let entries = panel.entries(DaySet::from_days([0]), true);
        assert_eq!(
            keys(&entries),
            vec!["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su", "Holiday"]
        );
        assert_eq!(entries[6].toggle, DayToggle::Day(0));
        assert!(entries[6].checked);
        assert_eq!(entries[7].toggle, DayToggle::Holiday);
        assert!(entries[7].checked);
    }

    #[test]
    fn weekday_mapping_round_trips() {
        for day in 0..7 {
            let weekday = weekday(day).expect("valid day");
            assert_eq!(day_index(weekday), day);
        }
        assert_eq!(weekday(0), Some(Weekday::Sun));
        assert_eq!(weekday(7), None);
    }

    #[test]
    fn toggles_flip_days_and_holiday_independently() {
        let profiles = ProfileCollection::new(vec![ProfileNode::profile(
            "p",
            "Weekdays",
            "",
            ProfileData::default(),
        )]);
        let data = |profiles: &ProfileCollection| {
            profiles
                .get("p")
                .and_then(|node| node.data.clone())
                .expect("profile data")
        };

        let updated = apply_toggle(&profiles, "p", DayToggle::Day(0)).expect("toggle sunday");
        assert!(data(&updated).days_of_week.contains(0));
        assert!(!data(&updated).holiday);

        let updated = apply_toggle(&updated, "p", DayToggle::Holiday).expect("toggle holiday");
        assert!(data(&updated).holiday);
        assert_eq!(data(&updated).days_of_week, data(&profiles).days_of_week.toggle(0));
    }
}
