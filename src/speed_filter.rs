/// Samples closer together than this (seconds) do not refresh the raw speed.
pub const MIN_DELTA_TIME: f64 = 0.01;
pub const MIN_DAMPING: f32 = 0.01;
pub const MAX_DAMPING: f32 = 1.0;
pub const DEFAULT_DAMPING: f32 = 0.1;

/// A world-space position. `y` is the vertical axis; `x` and `z` span the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance to `other` measured on the ground plane only.
    pub fn horizontal_distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct VelocityFilter {
    previous: Option<(Position, f64)>,
    raw_speed: f32,
    display_speed: f32,
    damping: f32,
}

impl VelocityFilter {
    pub fn new(damping: f32) -> Self {
        Self {
            previous: None,
            raw_speed: 0.0,
            display_speed: 0.0,
            damping: damping.clamp(MIN_DAMPING, MAX_DAMPING),
        }
    }

    /// Feeds one sample taken at `now` (seconds) and returns the smoothed speed.
    pub fn update(&mut self, position: Position, now: f64) -> f32 {
        let Some((previous_position, previous_time)) = self.previous else {
            // First sample after construction or reset only seeds the filter
            self.previous = Some((position, now));
            return self.display_speed;
        };

        let delta_time = now - previous_time;
        if delta_time > MIN_DELTA_TIME {
            let distance = position.horizontal_distance(&previous_position);
            self.raw_speed = distance / delta_time as f32;
            self.previous = Some((position, now));
        }

        // Exponential smoothing runs every call, including sub-threshold ones
        self.display_speed += (self.raw_speed - self.display_speed) * self.damping;
        self.display_speed
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.raw_speed = 0.0;
        self.display_speed = 0.0;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(MIN_DAMPING, MAX_DAMPING);
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn display_speed(&self) -> f32 {
        self.display_speed
    }

    pub fn raw_speed(&self) -> f32 {
        self.raw_speed
    }

    pub fn previous_position(&self) -> Option<Position> {
        self.previous.map(|(position, _)| position)
    }

    pub fn previous_time(&self) -> Option<f64> {
        self.previous.map(|(_, time)| time)
    }
}

impl Default for VelocityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DAMPING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_only_seeds() {
        let mut filter = VelocityFilter::new(1.0);
        let speed = filter.update(Position::new(100.0, 0.0, 100.0), 5.0);
        assert_eq!(speed, 0.0);
        assert_eq!(filter.raw_speed(), 0.0);
        assert_eq!(filter.previous_position(), Some(Position::new(100.0, 0.0, 100.0)));
    }

    #[test]
    fn vertical_motion_is_ignored() {
        let mut filter = VelocityFilter::new(1.0);
        filter.update(Position::new(0.0, 0.0, 0.0), 0.0);
        filter.update(Position::new(0.0, 12.0, 0.0), 0.5);
        assert_eq!(filter.raw_speed(), 0.0);
        assert_eq!(filter.display_speed(), 0.0);
    }

    #[test]
    fn raw_speed_is_horizontal_distance_over_time() {
        let mut filter = VelocityFilter::new(1.0);
        filter.update(Position::new(0.0, 0.0, 0.0), 0.0);
        filter.update(Position::new(3.0, 7.0, 4.0), 0.5);
        assert!((filter.raw_speed() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn near_duplicate_timestamp_keeps_previous_sample() {
        let mut filter = VelocityFilter::new(0.5);
        filter.update(Position::new(0.0, 0.0, 0.0), 0.0);
        filter.update(Position::new(10.0, 0.0, 0.0), 1.0);
        assert!((filter.raw_speed() - 10.0).abs() < 1e-5);
        assert!((filter.display_speed() - 5.0).abs() < 1e-5);

        // dt = 0.005 is below the threshold: raw speed is stale, smoothing still runs
        filter.update(Position::new(500.0, 0.0, 0.0), 1.005);
        assert!((filter.raw_speed() - 10.0).abs() < 1e-5);
        assert!((filter.display_speed() - 7.5).abs() < 1e-5);
        assert_eq!(filter.previous_time(), Some(1.0));
    }

    #[test]
    fn damping_is_clamped() {
        let mut filter = VelocityFilter::default();
        filter.set_damping(0.0);
        assert_eq!(filter.damping(), MIN_DAMPING);
        filter.set_damping(3.0);
        assert_eq!(filter.damping(), MAX_DAMPING);
        filter.set_damping(-1.0);
        assert_eq!(filter.damping(), MIN_DAMPING);
    }

    #[test]
    fn reset_clears_state() {
        let mut filter = VelocityFilter::new(1.0);
        filter.update(Position::new(0.0, 0.0, 0.0), 0.0);
        filter.update(Position::new(5.0, 0.0, 0.0), 1.0);
        filter.reset();
        assert_eq!(filter.display_speed(), 0.0);
        assert_eq!(filter.raw_speed(), 0.0);
        assert_eq!(filter.previous_position(), None);
    }
}
