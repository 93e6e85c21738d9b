use std::collections::VecDeque;

use crate::speed_filter::{MIN_DELTA_TIME, Position};

pub const MAX_HISTORY_ENTRIES: usize = 20;
pub const DEFAULT_UPDATE_PERIOD: f64 = 0.25;
pub const MIN_UPDATE_PERIOD: f64 = 0.1;
pub const MAX_UPDATE_PERIOD: f64 = 1.0;
/// Moves shorter than this are not worth recording.
const MIN_RECORDED_DISTANCE: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: f64,
    pub distance: f32,
    pub delta_time: f32,
    pub speed: f32,
}

/// Bounded, most-recent-first list of measurements.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Inserts at index 0, evicting the oldest entry once over capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}

/// Throttled speed measurement for the diagnostic view, independent of any live filter.
#[derive(Debug, Clone)]
pub struct SpeedProbe {
    history: HistoryRing,
    paused: bool,
    update_period: f64,
    last_sample: Option<f64>,
    current: Option<(Position, f64)>,
    previous: Option<(Position, f64)>,
    distance: f32,
    delta_time: f32,
    raw_speed: f32,
}

impl SpeedProbe {
    pub fn new() -> Self {
        Self {
            history: HistoryRing::default(),
            paused: false,
            update_period: DEFAULT_UPDATE_PERIOD,
            last_sample: None,
            current: None,
            previous: None,
            distance: 0.0,
            delta_time: 0.0,
            raw_speed: 0.0,
        }
    }

    /// Returns true when the sample was taken (not throttled or paused).
    pub fn sample(&mut self, position: Position, now: f64) -> bool {
        if self.paused {
            return false;
        }
        if let Some(last) = self.last_sample {
            if now - last < self.update_period {
                return false;
            }
        }

        self.previous = self.current.replace((position, now));
        self.last_sample = Some(now);

        let Some((previous_position, previous_time)) = self.previous else {
            return true;
        };

        self.distance = position.horizontal_distance(&previous_position);
        self.delta_time = (now - previous_time) as f32;

        if now - previous_time > MIN_DELTA_TIME {
            self.raw_speed = self.distance / self.delta_time;
            if self.distance > MIN_RECORDED_DISTANCE {
                self.history.push(HistoryEntry {
                    timestamp: now,
                    distance: self.distance,
                    delta_time: self.delta_time,
                    speed: self.raw_speed,
                });
            }
        }
        true
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            // force a sample on the next frame
            self.last_sample = None;
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_update_period(&mut self, seconds: f64) {
        self.update_period = seconds.clamp(MIN_UPDATE_PERIOD, MAX_UPDATE_PERIOD);
    }

    pub fn update_period(&self) -> f64 {
        self.update_period
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn last_sample_time(&self) -> Option<f64> {
        self.last_sample
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn raw_speed(&self) -> f32 {
        self.raw_speed
    }

    pub fn current_position(&self) -> Option<Position> {
        self.current.map(|(position, _)| position)
    }

    pub fn previous_position(&self) -> Option<Position> {
        self.previous.map(|(position, _)| position)
    }
}

impl Default for SpeedProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: f64) -> HistoryEntry {
        HistoryEntry { timestamp, distance: 1.0, delta_time: 1.0, speed: 1.0 }
    }

    #[test]
    fn ring_is_most_recent_first() {
        let mut ring = HistoryRing::new(3);
        for t in 0..5 {
            ring.push(entry(t as f64));
        }
        let stamps: Vec<f64> = ring.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![4.0, 3.0, 2.0]);
    }

    #[test]
    fn probe_throttles_samples() {
        let mut probe = SpeedProbe::new();
        assert!(probe.sample(Position::new(0.0, 0.0, 0.0), 0.0));
        assert!(!probe.sample(Position::new(1.0, 0.0, 0.0), 0.1));
        assert!(probe.sample(Position::new(2.0, 0.0, 0.0), 0.5));
        assert!((probe.raw_speed() - 4.0).abs() < 1e-5);
        assert_eq!(probe.history().len(), 1);
    }

    #[test]
    fn stationary_samples_are_not_recorded() {
        let mut probe = SpeedProbe::new();
        probe.sample(Position::new(1.0, 0.0, 1.0), 0.0);
        probe.sample(Position::new(1.0, 5.0, 1.0), 1.0);
        assert_eq!(probe.raw_speed(), 0.0);
        assert!(probe.history().is_empty());
    }

    #[test]
    fn resume_forces_immediate_sample() {
        let mut probe = SpeedProbe::new();
        probe.sample(Position::new(0.0, 0.0, 0.0), 0.0);
        probe.set_paused(true);
        assert!(!probe.sample(Position::new(1.0, 0.0, 0.0), 1.0));
        probe.set_paused(false);
        assert!(probe.sample(Position::new(1.0, 0.0, 0.0), 1.01));
    }

    #[test]
    fn clear_history_keeps_measurement() {
        let mut probe = SpeedProbe::new();
        probe.sample(Position::new(0.0, 0.0, 0.0), 0.0);
        probe.sample(Position::new(3.0, 0.0, 4.0), 1.0);
        assert_eq!(probe.history().len(), 1);

        probe.clear_history();
        assert!(probe.history().is_empty());
        assert!((probe.raw_speed() - 5.0).abs() < 1e-5);
        assert_eq!(probe.last_sample_time(), Some(1.0));

        probe.sample(Position::new(6.0, 0.0, 8.0), 2.0);
        assert_eq!(probe.history().len(), 1);
    }

    #[test]
    fn update_period_is_clamped() {
        let mut probe = SpeedProbe::new();
        probe.set_update_period(0.0);
        assert_eq!(probe.update_period(), MIN_UPDATE_PERIOD);
        probe.set_update_period(9.0);
        assert_eq!(probe.update_period(), MAX_UPDATE_PERIOD);
    }
}
