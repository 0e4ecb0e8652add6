//! Piecewise-linear colour gradients over `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::RasterError;

/// A colour at a position along a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

/// Colour stops kept sorted ascending by position.
///
/// Sampling outside the stop range clamps to the nearest end stop.
/// Serialized as its list of stops; deserializing re-inserts each one, so
/// out-of-range positions are rejected and the order is restored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a gradient from `(position, colour)` pairs in any order.
    pub fn with_stops(
        stops: impl IntoIterator<Item = (f64, Rgb)>,
    ) -> Result<Self, RasterError> {
        let mut gradient = Self::new();
        for (position, color) in stops {
            gradient.insert(position, color)?;
        }
        Ok(gradient)
    }

    /// Insert a stop, after any existing stops at the same position.
    pub fn insert(&mut self, position: f64, color: Rgb) -> Result<(), RasterError> {
        if !(0.0..=1.0).contains(&position) {
            return Err(RasterError::InvalidStopPosition(position));
        }
        let index = self.stops.partition_point(|s| s.position <= position);
        self.stops.insert(index, ColorStop { position, color });
        Ok(())
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Sample the colour at `position`.
    pub fn sample(&self, position: f64) -> Result<Rgb, RasterError> {
        if self.stops.len() < 2 {
            return Err(RasterError::TooFewStops(self.stops.len()));
        }
        Ok(self.interpolate(position))
    }

    /// Requires at least two stops.
    fn interpolate(&self, position: f64) -> Rgb {
        // Few stops: a linear scan for the first stop at or past `position`.
        let index = self
            .stops
            .iter()
            .position(|s| s.position >= position)
            .unwrap_or(self.stops.len());
        if index == 0 {
            return self.stops[0].color;
        }
        if index == self.stops.len() {
            return self.stops[index - 1].color;
        }
        let left = &self.stops[index - 1];
        let right = &self.stops[index];
        let span = right.position - left.position;
        if span <= 0.0 {
            return left.color;
        }
        left.color.lerp(right.color, (position - left.position) / span)
    }
}

/// A gradient checked to have at least two stops, so sampling cannot fail.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckedGradient(ColorGradient);

impl CheckedGradient {
    pub fn sample(&self, position: f64) -> Rgb {
        self.0.interpolate(position)
    }

    pub fn stops(&self) -> &[ColorStop] {
        self.0.stops()
    }
}

impl TryFrom<ColorGradient> for CheckedGradient {
    type Error = RasterError;

    fn try_from(gradient: ColorGradient) -> Result<Self, Self::Error> {
        match gradient.stops.len() {
            n if n < 2 => Err(RasterError::TooFewStops(n)),
            _ => Ok(Self(gradient)),
        }
    }
}

impl TryFrom<Vec<ColorStop>> for ColorGradient {
    type Error = RasterError;

    fn try_from(stops: Vec<ColorStop>) -> Result<Self, Self::Error> {
        Self::with_stops(stops.into_iter().map(|s| (s.position, s.color)))
    }
}

impl From<ColorGradient> for Vec<ColorStop> {
    fn from(gradient: ColorGradient) -> Self {
        gradient.stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> ColorGradient {
        ColorGradient::with_stops([(1.0, Rgb::new(1.0, 0.5, 0.0)), (0.0, Rgb::new(0.0, 0.0, 1.0))])
            .unwrap()
    }

    #[test]
    fn test_insert_keeps_stops_sorted() {
        let gradient = ColorGradient::with_stops([
            (0.5, Rgb::BLACK),
            (0.0, Rgb::BLACK),
            (1.0, Rgb::BLACK),
            (0.25, Rgb::BLACK),
        ])
        .unwrap();
        let positions: Vec<f64> = gradient.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn test_midpoint_is_average() {
        let mid = two_stop().sample(0.5).unwrap();
        assert_eq!(mid, Rgb::new(0.5, 0.25, 0.5));
    }

    #[test]
    fn test_endpoints_hit_stop_colours() {
        let gradient = two_stop();
        assert_eq!(gradient.sample(0.0).unwrap(), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(gradient.sample(1.0).unwrap(), Rgb::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let gradient = ColorGradient::with_stops([
            (0.2, Rgb::new(0.1, 0.1, 0.1)),
            (0.8, Rgb::new(0.9, 0.9, 0.9)),
        ])
        .unwrap();
        assert_eq!(gradient.sample(0.0).unwrap(), Rgb::new(0.1, 0.1, 0.1));
        assert_eq!(gradient.sample(1.0).unwrap(), Rgb::new(0.9, 0.9, 0.9));
        assert_eq!(gradient.sample(-5.0).unwrap(), Rgb::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn test_continuous_across_internal_stops() {
        let gradient = ColorGradient::with_stops([
            (0.0, Rgb::new(0.0, 0.0, 0.0)),
            (0.4, Rgb::new(1.0, 0.2, 0.3)),
            (1.0, Rgb::new(0.0, 1.0, 0.5)),
        ])
        .unwrap();
        let eps = 1e-9;
        let below = gradient.sample(0.4 - eps).unwrap();
        let above = gradient.sample(0.4 + eps).unwrap();
        assert!((below.r - above.r).abs() < 1e-6);
        assert!((below.g - above.g).abs() < 1e-6);
        assert!((below.b - above.b).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_positions_do_not_divide_by_zero() {
        let gradient = ColorGradient::with_stops([
            (0.0, Rgb::BLACK),
            (0.5, Rgb::new(1.0, 0.0, 0.0)),
            (0.5, Rgb::new(0.0, 1.0, 0.0)),
            (1.0, Rgb::WHITE),
        ])
        .unwrap();
        let c = gradient.sample(0.5).unwrap();
        assert!(c.r.is_finite() && c.g.is_finite() && c.b.is_finite());
    }

    #[test]
    fn test_too_few_stops() {
        let mut gradient = ColorGradient::new();
        assert!(matches!(gradient.sample(0.5), Err(RasterError::TooFewStops(0))));
        gradient.insert(0.3, Rgb::WHITE).unwrap();
        assert!(matches!(gradient.sample(0.5), Err(RasterError::TooFewStops(1))));
    }

    #[test]
    fn test_checked_gradient_matches_sample() {
        let gradient = two_stop();
        let checked = CheckedGradient::try_from(gradient.clone()).unwrap();
        for t in [-1.0, 0.0, 0.3, 0.5, 1.0, 2.0] {
            assert_eq!(checked.sample(t), gradient.sample(t).unwrap());
        }
    }

    #[test]
    fn test_checked_gradient_needs_two_stops() {
        let one = ColorGradient::with_stops([(0.5, Rgb::WHITE)]).unwrap();
        assert!(matches!(
            CheckedGradient::try_from(one),
            Err(RasterError::TooFewStops(1))
        ));
    }

    #[test]
    fn test_deserialize_sorts_stops() {
        let gradient: ColorGradient = ron::from_str(
            "[(position: 1.0, color: (r: 1.0, g: 1.0, b: 1.0)), \
              (position: 0.0, color: (r: 0.0, g: 0.0, b: 0.0))]",
        )
        .unwrap();
        let positions: Vec<f64> = gradient.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 1.0]);
        assert_eq!(gradient.sample(0.5).unwrap(), Rgb::grey(0.5));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_stop() {
        let result: Result<ColorGradient, _> = ron::from_str(
            "[(position: 0.0, color: (r: 0.0, g: 0.0, b: 0.0)), \
              (position: 7.0, color: (r: 1.0, g: 1.0, b: 1.0))]",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_stops_reload_unchanged() {
        let gradient = two_stop();
        let text = ron::to_string(&gradient).unwrap();
        let back: ColorGradient = ron::from_str(&text).unwrap();
        assert_eq!(back, gradient);
    }

    #[test]
    fn test_invalid_stop_position() {
        let mut gradient = ColorGradient::new();
        assert!(matches!(
            gradient.insert(1.5, Rgb::WHITE),
            Err(RasterError::InvalidStopPosition(p)) if p == 1.5
        ));
        assert!(gradient.insert(f64::NAN, Rgb::WHITE).is_err());
    }
}
