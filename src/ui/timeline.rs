//! Pointer handling and sizing for the interval timeline.
//!
//! Nothing here touches egui; views feed in measured widths, pointer
//! positions and the frame clock, and get slot indices and values back.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::model::{set_range, Domain, ModelError, SlotSelection};

/// Per-slot width used when the container could not be measured
pub const MIN_SLOT_WIDTH: f32 = 8.0;
/// Seconds between the first resize trigger and the re-measurement
pub const REMEASURE_DELAY: f64 = 0.1;
/// Width drift in points below which the last measurement is kept
const WIDTH_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    pub measured_width: f32,
    pub slot_count: usize,
}

impl TimelineLayout {
    pub fn new(measured_width: f32, slot_count: usize) -> Self {
        Self {
            measured_width,
            slot_count,
        }
    }

    pub fn slot_width(&self) -> f32 {
        if self.slot_count == 0 || !self.measured_width.is_finite() || self.measured_width <= 0.0 {
            return MIN_SLOT_WIDTH;
        }
        (self.measured_width / self.slot_count as f32).max(MIN_SLOT_WIDTH)
    }

    pub fn content_width(&self) -> f32 {
        self.slot_width() * self.slot_count as f32
    }

    /// Slots no longer fit and the timeline needs to scroll
    pub fn overflows(&self) -> bool {
        self.content_width() > self.measured_width.max(0.0) + 0.5
    }

    pub fn slot_left(&self, index: usize) -> f32 {
        index as f32 * self.slot_width()
    }

    /// Slot under a pointer x offset from the timeline's left edge, clamped to the ends
    pub fn slot_at(&self, x: f32) -> Option<usize> {
        if self.slot_count == 0 {
            return None;
        }
        if !x.is_finite() || x <= 0.0 {
            return Some(0);
        }
        let index = (x / self.slot_width()) as usize;
        Some(index.min(self.slot_count - 1))
    }
}

/// Value for a pointer y on a vertical slider track; the top of the track is `domain.max`.
///
/// Values snap to whole numbers.
pub fn value_at(y: f32, track_top: f32, track_height: f32, domain: Domain) -> f64 {
    if track_height <= 0.0 || !y.is_finite() {
        return domain.min;
    }
    let fraction = (1.0 - (y - track_top) / track_height).clamp(0.0, 1.0);
    let raw = domain.min + f64::from(fraction) * domain.span();
    domain.clamp(raw.round())
}

/// Inverse of `value_at`, for drawing the bar height of a slot
pub fn fill_fraction(value: f64, domain: Domain) -> f32 {
    if domain.span() <= 0.0 {
        return 1.0;
    }
    ((domain.clamp(value) - domain.min) / domain.span()) as f32
}

/// Drag across slot bars painting one value.
///
/// Always recomputed from the snapshot taken at press time, so only the window
/// between anchor and pointer carries the value and pulling back restores the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDrag {
    original: Vec<f64>,
    anchor: usize,
    current: usize,
    value: f64,
}

impl ValueDrag {
    pub fn start(intervals: &[f64], anchor: usize, value: f64) -> Result<Self, ModelError> {
        if anchor >= intervals.len() {
            return Err(ModelError::IndexOutOfRange {
                index: anchor,
                len: intervals.len(),
            });
        }
        Ok(Self {
            original: intervals.to_vec(),
            anchor,
            current: anchor,
            value,
        })
    }

    pub fn update(&mut self, slot: usize, value: f64) {
        self.current = slot.min(self.original.len().saturating_sub(1));
        self.value = value;
    }

    pub fn window(&self) -> (usize, usize) {
        (self.anchor.min(self.current), self.anchor.max(self.current))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// A press without sideways movement on a selected slot edits the whole selection
    pub fn preview(&self, selection: &SlotSelection, domain: Domain) -> Vec<f64> {
        let result = if self.anchor == self.current && selection.contains(self.anchor) {
            selection.apply(&self.original, self.anchor, self.value, domain)
        } else {
            set_range(&self.original, self.anchor, self.current, self.value, domain)
        };
        // Both indices were clamped into range when the drag started and moved
        result.unwrap_or_else(|_| self.original.clone())
    }

    pub fn original(&self) -> &[f64] {
        &self.original
    }
}

/// Drag along the time labels selecting a window of slots
#[derive(Debug, Clone, PartialEq)]
pub struct SelectDrag {
    base: SlotSelection,
    anchor: usize,
    current: usize,
}

impl SelectDrag {
    /// `additive` keeps the existing selection and adds the window to it
    pub fn start(selection: &SlotSelection, anchor: usize, additive: bool) -> Self {
        let base = if additive {
            selection.clone()
        } else {
            SlotSelection::new()
        };
        Self {
            base,
            anchor,
            current: anchor,
        }
    }

    pub fn update(&mut self, slot: usize) {
        self.current = slot;
    }

    pub fn selection(&self) -> SlotSelection {
        let mut selection = self.base.clone();
        selection.select_range(self.anchor, self.current);
        selection
    }
}

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    /// Subscriber id -> time of the first unserved trigger
    pending: HashMap<u64, Option<f64>>,
}

/// Broadcasts container resizes to every mounted timeline
#[derive(Debug, Clone, Default)]
pub struct ResizeHub {
    inner: Rc<RefCell<HubState>>,
}

impl ResizeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> ResizeSubscription {
        let mut state = self.inner.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.pending.insert(id, None);
        ResizeSubscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    pub fn notify(&self, now: f64) {
        for since in self.inner.borrow_mut().pending.values_mut() {
            since.get_or_insert(now);
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

/// Registration with a `ResizeHub`; dropping it unregisters
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    hub: Weak<RefCell<HubState>>,
}

impl ResizeSubscription {
    /// Ask for a re-measurement, e.g. because the slot count changed.
    /// Repeated requests before it is served collapse into one.
    pub fn request(&self, now: f64) {
        if let Some(hub) = self.hub.upgrade() {
            if let Some(since) = hub.borrow_mut().pending.get_mut(&self.id) {
                since.get_or_insert(now);
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        let Some(hub) = self.hub.upgrade() else {
            return false;
        };
        let pending = hub.borrow().pending.get(&self.id).copied().flatten();
        pending.is_some()
    }

    /// True once when a pending request is at least `REMEASURE_DELAY` old
    pub fn take_due(&self, now: f64) -> bool {
        let Some(hub) = self.hub.upgrade() else {
            return false;
        };
        let mut state = hub.borrow_mut();
        let due = state
            .pending
            .get(&self.id)
            .copied()
            .flatten()
            .is_some_and(|since| now - since >= REMEASURE_DELAY);
        if due {
            if let Some(since) = state.pending.get_mut(&self.id) {
                *since = None;
            }
        }
        due
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().pending.remove(&self.id);
        }
    }
}

/// Per-profile timeline state kept by the app between frames
#[derive(Debug)]
pub struct TimelineState {
    pub profile_id: String,
    pub layout: TimelineLayout,
    pub selection: SlotSelection,
    pub value_drag: Option<ValueDrag>,
    pub select_drag: Option<SelectDrag>,
    subscription: ResizeSubscription,
}

impl TimelineState {
    /// Mount with an immediate measurement
    pub fn mount(hub: &ResizeHub, profile_id: &str, measured_width: f32, slot_count: usize) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            layout: TimelineLayout::new(measured_width, slot_count),
            selection: SlotSelection::new(),
            value_drag: None,
            select_drag: None,
            subscription: hub.subscribe(),
        }
    }

    /// Per-frame bookkeeping. A slot-count change applies at once and schedules a
    /// re-measurement, as does a container width that drifted from the last
    /// measurement. Returns true when the measured width was refreshed.
    pub fn sync(&mut self, now: f64, observed_width: f32, slot_count: usize) -> bool {
        if (observed_width - self.layout.measured_width).abs() > WIDTH_TOLERANCE {
            self.subscription.request(now);
        }
        if slot_count != self.layout.slot_count {
            self.layout.slot_count = slot_count;
            self.selection.retain_below(slot_count);
            self.value_drag = None;
            self.select_drag = None;
            self.subscription.request(now);
        }
        if self.subscription.take_due(now) {
            self.layout.measured_width = observed_width;
            return true;
        }
        false
    }

    pub fn remeasure_pending(&self) -> bool {
        self.subscription.is_pending()
    }
}
