/// A closed range `[min, max]` along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True when `x` lies strictly inside, endpoints excluded.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// True when the two ranges share at least one point. Touching
    /// endpoints overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn midpoint(&self) -> f32 {
        0.5 * (self.min + self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrounds_excludes_endpoints() {
        let span = Interval::new(0.0, 10.0);

        assert!(span.surrounds(5.0));
        assert!(!span.surrounds(0.0));
        assert!(!span.surrounds(10.0));
        assert!(!span.surrounds(-0.1));
    }

    #[test]
    fn test_overlap_is_boundary_inclusive() {
        let a = Interval::new(0.0, 1.0);

        assert!(a.overlaps(&Interval::new(1.0, 2.0)));
        assert!(a.overlaps(&Interval::new(-1.0, 0.0)));
        assert!(a.overlaps(&Interval::new(0.25, 0.5)));
        assert!(!a.overlaps(&Interval::new(1.01, 2.0)));
    }

    #[test]
    fn test_midpoint() {
        let span = Interval::new(-2.0, 6.0);

        assert_eq!(span.midpoint(), 2.0);
    }
}
