/// Acceptance window for a ray parameter.
///
/// Intersection code asks whether a root lies strictly inside the window;
/// color output pins channel values into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Window from `min` to `max`. `min > max` gives a window that holds nothing.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the window; negative when it is empty.
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Closed test, endpoints included.
    pub fn contains(&self, x: f32) -> bool {
        (self.min..=self.max).contains(&x)
    }

    /// Open test, endpoints excluded. Hit tests use this so a root sitting
    /// exactly on `min` (the surface a bounce left from) is rejected.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Pin `x` to the window.
    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.min).min(self.max)
    }

    /// Copy with a new upper bound; closest-hit search narrows with this.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval { max, ..*self }
    }

    /// Holds no value at all.
    pub const EMPTY: Interval = Interval::new(f32::INFINITY, f32::NEG_INFINITY);

    /// Holds every value, infinities included.
    pub const UNIVERSE: Interval = Interval::new(f32::NEG_INFINITY, f32::INFINITY);
}
