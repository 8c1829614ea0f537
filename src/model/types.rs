use serde::{Deserialize, Serialize};

use super::intervals::{default_intervals, interval_count};

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Profile,
}

impl NodeKind {
    /// String-table key, also used as the default title of new nodes
    pub fn key(self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Profile => "profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    #[default]
    Temperature,
    Percent,
    OnOff,
}

impl IntervalType {
    pub const ALL: [IntervalType; 3] = [
        IntervalType::Temperature,
        IntervalType::Percent,
        IntervalType::OnOff,
    ];

    pub fn key(self) -> &'static str {
        match self {
            IntervalType::Temperature => "temperature",
            IntervalType::Percent => "percent",
            IntervalType::OnOff => "onoff",
        }
    }
}

/// Inclusive value range of one interval type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp into `[min, max]`. NaN lands on `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn span(&self) -> f64 {
        (self.max - self.min).max(0.0)
    }
}

/// Static `IntervalType -> Domain` mapping. Overridable from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainTable {
    #[serde(default = "default_temperature_domain")]
    pub temperature: Domain,
    #[serde(default = "default_percent_domain")]
    pub percent: Domain,
    #[serde(default = "default_onoff_domain")]
    pub onoff: Domain,
}

fn default_temperature_domain() -> Domain {
    Domain::new(16.0, 30.0)
}

fn default_percent_domain() -> Domain {
    Domain::new(0.0, 100.0)
}

fn default_onoff_domain() -> Domain {
    Domain::new(0.0, 1.0)
}

impl Default for DomainTable {
    fn default() -> Self {
        Self {
            temperature: default_temperature_domain(),
            percent: default_percent_domain(),
            onoff: default_onoff_domain(),
        }
    }
}

impl DomainTable {
    pub fn get(&self, interval_type: IntervalType) -> Domain {
        match interval_type {
            IntervalType::Temperature => self.temperature,
            IntervalType::Percent => self.percent,
            IntervalType::OnOff => self.onoff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Normal,
    High,
    Highest,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::High, Priority::Highest];

    pub fn key(self) -> &'static str {
        match self {
            Priority::Normal => "Normal priority",
            Priority::High => "High priority",
            Priority::Highest => "Highest priority",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::Normal),
            1 => Ok(Priority::High),
            2 => Ok(Priority::Highest),
            other => Err(format!("priority must be 0, 1 or 2, got {other}")),
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Highest => 2,
        }
    }
}

/// Set of day indices, 0 = Sunday .. 6 = Saturday.
///
/// Stored as a bitset; serialized as an ascending array of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);
    /// Monday through Friday
    pub const WORKDAYS: DaySet = DaySet(0b0011_1110);

    pub fn from_days(days: impl IntoIterator<Item = u8>) -> Self {
        days.into_iter()
            .fold(DaySet::EMPTY, |set, day| set.with(day, true))
    }

    pub fn contains(self, day: u8) -> bool {
        day < 7 && self.0 & (1 << day) != 0
    }

    /// Set or clear one day. Indices outside 0..7 are ignored.
    pub fn with(self, day: u8, on: bool) -> Self {
        if day >= 7 {
            return self;
        }
        if on {
            DaySet(self.0 | (1 << day))
        } else {
            DaySet(self.0 & !(1 << day))
        }
    }

    pub fn toggle(self, day: u8) -> Self {
        self.with(day, !self.contains(day))
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..7u8).filter(move |day| self.contains(*day))
    }

    #[cfg(test)]
    fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

impl From<Vec<u8>> for DaySet {
    fn from(days: Vec<u8>) -> Self {
        DaySet::from_days(days)
    }
}

impl From<DaySet> for Vec<u8> {
    fn from(set: DaySet) -> Self {
        set.iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(rename = "type", default)]
    pub interval_type: IntervalType,
    #[serde(rename = "prio", default)]
    pub priority: Priority,
    #[serde(rename = "dow", default = "default_days")]
    pub days_of_week: DaySet,
    #[serde(default)]
    pub holiday: bool,
    /// Stored in hours under `intervalDuration`, e.g. `0.5` for half-hour slots
    #[serde(rename = "intervalDuration", default = "default_interval_minutes", with = "stored_hours")]
    pub interval_duration_minutes: u32,
    #[serde(default)]
    pub intervals: Vec<f64>,
}

fn default_true() -> bool {
    true
}

fn default_days() -> DaySet {
    DaySet::WORKDAYS
}

fn default_interval_minutes() -> u32 {
    DEFAULT_INTERVAL_MINUTES
}

mod stored_hours {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(f64::from(*minutes) / 60.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let hours = f64::deserialize(deserializer)?;
        let minutes = (hours * 60.0).round();
        if !minutes.is_finite() || minutes < 1.0 || minutes > f64::from(u32::MAX) {
            return Err(D::Error::custom(format!(
                "interval duration must be a positive number of hours, got {hours}"
            )));
        }
        Ok(minutes as u32)
    }
}

impl ProfileData {
    /// Fresh schedule data for a new profile.
    ///
    /// A duration that does not divide the day falls back to hourly slots.
    pub fn new_default(domains: &DomainTable, interval_duration_minutes: u32) -> Self {
        let interval_type = IntervalType::default();
        let (minutes, count) = match interval_count(interval_duration_minutes) {
            Ok(count) => (interval_duration_minutes, count),
            Err(_) => (DEFAULT_INTERVAL_MINUTES, 24),
        };
        Self {
            enabled: true,
            members: Vec::new(),
            interval_type,
            priority: Priority::Normal,
            days_of_week: DaySet::WORKDAYS,
            holiday: false,
            interval_duration_minutes: minutes,
            intervals: default_intervals(interval_type, domains.get(interval_type), count),
        }
    }
}

impl Default for ProfileData {
    fn default() -> Self {
        Self::new_default(&DomainTable::default(), DEFAULT_INTERVAL_MINUTES)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNode {
    pub id: String,
    pub title: String,
    /// Id of the containing folder, empty for root nodes
    #[serde(default)]
    pub parent: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProfileData>,
}

impl ProfileNode {
    pub fn folder(id: impl Into<String>, title: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent: parent.into(),
            kind: NodeKind::Folder,
            is_open: true,
            data: None,
        }
    }

    pub fn profile(
        id: impl Into<String>,
        title: impl Into<String>,
        parent: impl Into<String>,
        data: ProfileData,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent: parent.into(),
            kind: NodeKind::Profile,
            is_open: false,
            data: Some(data),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}
