//! Interval sequences: one value per time slot of the day

use std::collections::BTreeSet;

use super::error::ModelError;
use super::types::{Domain, IntervalType, MINUTES_PER_DAY};

/// Number of slots in a day for the given slot length.
///
/// Durations that do not divide 1440 are rejected rather than rounded.
pub fn interval_count(duration_minutes: u32) -> Result<usize, ModelError> {
    if duration_minutes == 0
        || duration_minutes > MINUTES_PER_DAY
        || MINUTES_PER_DAY % duration_minutes != 0
    {
        return Err(ModelError::InvalidDuration(duration_minutes));
    }
    Ok((MINUTES_PER_DAY / duration_minutes) as usize)
}

/// Slot lengths offered by the editor, every one a divisor of the day
pub fn valid_durations() -> impl Iterator<Item = u32> {
    [15, 20, 30, 60, 120, 180, 240, 360, 480, 720]
        .into_iter()
        .filter(|minutes| MINUTES_PER_DAY % minutes == 0)
}

pub fn default_value(interval_type: IntervalType, domain: Domain) -> f64 {
    match interval_type {
        IntervalType::OnOff => domain.min,
        IntervalType::Temperature | IntervalType::Percent => domain.midpoint(),
    }
}

pub fn default_intervals(interval_type: IntervalType, domain: Domain, count: usize) -> Vec<f64> {
    vec![default_value(interval_type, domain); count]
}

pub fn set_slot(
    intervals: &[f64],
    index: usize,
    raw_value: f64,
    domain: Domain,
) -> Result<Vec<f64>, ModelError> {
    check_index(intervals, index)?;
    let mut updated = intervals.to_vec();
    updated[index] = domain.clamp(raw_value);
    Ok(updated)
}

/// Assign `value` to every slot of the inclusive range; the pair may come in either order.
pub fn set_range(
    intervals: &[f64],
    start_index: usize,
    end_index: usize,
    value: f64,
    domain: Domain,
) -> Result<Vec<f64>, ModelError> {
    check_index(intervals, start_index)?;
    check_index(intervals, end_index)?;
    let (low, high) = (start_index.min(end_index), start_index.max(end_index));
    let clamped = domain.clamp(value);
    let mut updated = intervals.to_vec();
    for slot in &mut updated[low..=high] {
        *slot = clamped;
    }
    Ok(updated)
}

/// Clamp every value into the domain, e.g. after the interval type changed
pub fn clamp_all(intervals: &[f64], domain: Domain) -> Vec<f64> {
    intervals.iter().map(|value| domain.clamp(*value)).collect()
}

/// Nearest-slot resampling to a new slot count.
///
/// Going from hourly to half-hourly repeats each value twice; the reverse keeps
/// the first value of every pair.
pub fn resample(intervals: &[f64], new_count: usize, fill: f64) -> Vec<f64> {
    if intervals.is_empty() {
        return vec![fill; new_count];
    }
    let old_count = intervals.len();
    (0..new_count)
        .map(|slot| intervals[slot * old_count / new_count])
        .collect()
}

/// `(hour, "mm")` shown under a slot
pub fn label_for_slot(index: usize, duration_minutes: u32) -> (u32, String) {
    let start = index as u64 * u64::from(duration_minutes);
    let hour = (start / 60) as u32;
    let minutes = format!("{:02}", start % 60);
    (hour, minutes)
}

/// Slot label as "HH:MM"
pub fn slot_clock_label(index: usize, duration_minutes: u32) -> String {
    let (hour, minutes) = label_for_slot(index, duration_minutes);
    format!("{:02}:{}", hour, minutes)
}

pub fn format_value(value: f64, interval_type: IntervalType) -> String {
    match interval_type {
        IntervalType::Temperature => format!("{}º", format_number(value)),
        IntervalType::Percent => format!("{}%", format_number(value)),
        IntervalType::OnOff => {
            if value > 0.0 {
                "on".to_string()
            } else {
                "off".to_string()
            }
        }
    }
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

fn check_index(intervals: &[f64], index: usize) -> Result<(), ModelError> {
    if index >= intervals.len() {
        return Err(ModelError::IndexOutOfRange {
            index,
            len: intervals.len(),
        });
    }
    Ok(())
}

/// Slots picked for batch editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSelection {
    slots: BTreeSet<usize>,
}

impl SlotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.slots.contains(&index)
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.slots.remove(&index) {
            self.slots.insert(index);
        }
    }

    /// Add the inclusive range, in either order
    pub fn select_range(&mut self, a: usize, b: usize) {
        self.slots.extend(a.min(b)..=a.max(b));
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Drop indices that no longer exist after the slot count shrank
    pub fn retain_below(&mut self, count: usize) {
        self.slots.retain(|index| *index < count);
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().copied()
    }

    /// Edit one slot. When it is part of the selection the whole selection
    /// takes the value, otherwise only that slot changes.
    pub fn apply(
        &self,
        intervals: &[f64],
        index: usize,
        value: f64,
        domain: Domain,
    ) -> Result<Vec<f64>, ModelError> {
        check_index(intervals, index)?;
        if !self.contains(index) {
            return set_slot(intervals, index, value, domain);
        }
        let clamped = domain.clamp(value);
        let mut updated = intervals.to_vec();
        for slot in self.iter().filter(|slot| *slot < intervals.len()) {
            updated[slot] = clamped;
        }
        Ok(updated)
    }
}
