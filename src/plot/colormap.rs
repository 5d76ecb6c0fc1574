use crate::prelude::*;

/// An 8 bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// matplotlib's viridis sampled at nine evenly spaced stops
const VIRIDIS: [Rgb; 9] = [
    Rgb { r: 68, g: 1, b: 84 },
    Rgb { r: 72, g: 40, b: 120 },
    Rgb { r: 62, g: 73, b: 137 },
    Rgb { r: 49, g: 104, b: 142 },
    Rgb { r: 38, g: 130, b: 142 },
    Rgb { r: 31, g: 158, b: 137 },
    Rgb { r: 53, g: 183, b: 121 },
    Rgb { r: 110, g: 206, b: 88 },
    Rgb { r: 253, g: 231, b: 37 },
];

/// Piecewise linear color map over `[0, 1]`
#[derive(Debug, Clone, Copy)]
pub struct Colormap {
    stops: &'static [Rgb],
}

impl Colormap {
    pub fn viridis() -> Self {
        Self { stops: &VIRIDIS }
    }

    /// Color at position `t`. Positions outside of `[0, 1]` are clamped and NaN maps
    /// to the low end.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let segments = self.stops.len() - 1;
        let position = t * segments as f64;
        let lower = (position.floor() as usize).min(segments - 1);
        let frac = position - lower as f64;

        let lerp = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * frac).round() as u8
        };

        let lo = self.stops[lower];
        let hi = self.stops[lower + 1];
        Rgb::new(lerp(lo.r, hi.r), lerp(lo.g, hi.g), lerp(lo.b, hi.b))
    }

    /// Color of `value` on a scale running from `min` to `max`
    pub fn map(&self, value: f64, min: f64, max: f64) -> Rgb {
        self.sample(normalize(value, min, max))
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::viridis()
    }
}

/// position of `value` in `[min, max]`. A flat range puts every value in the middle
pub(crate) fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() <= f64::EPSILON * min.abs().max(max.abs()).max(1.0) {
        0.5
    } else {
        (value - min) / span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn viridis_endpoints() {
        let cmap = Colormap::viridis();

        assert_eq!(cmap.sample(0.0), Rgb::new(68, 1, 84));
        assert_eq!(cmap.sample(1.0), Rgb::new(253, 231, 37));
        assert_eq!(cmap.sample(0.5), Rgb::new(38, 130, 142));
        assert_eq!(cmap.sample(1.0).to_string(), "#fde725");
    }

    #[test]
    fn clamps_out_of_range() {
        let cmap = Colormap::viridis();

        assert_eq!(cmap.sample(-3.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(7.5), cmap.sample(1.0));
        assert_eq!(cmap.sample(f64::NAN), cmap.sample(0.0));
        assert_eq!(cmap.map(30.0, 0.0, 10.0), cmap.sample(1.0));
    }

    #[test]
    fn interpolates_between_stops() {
        let cmap = Colormap::viridis();
        // halfway between the last two stops
        let mid = cmap.sample(0.9375);
        assert_eq!(mid, Rgb::new(182, 219, 63));
    }

    #[test]
    fn normalized_positions() {
        assert_relative_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_relative_eq!(normalize(-1.0, -1.0, 3.0), 0.0);
        assert_relative_eq!(normalize(2.0, 2.0, 2.0), 0.5);
        assert_relative_eq!(normalize(0.25, 0.0, 0.5), 0.5);
    }
}
