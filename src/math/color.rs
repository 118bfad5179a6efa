//! RGB distance, neighbor averaging and HSV conversion helpers

/// 8-bit RGB triple
pub type Rgb = [u8; 3];

/// Squared Euclidean distance between a palette color and a target mean
pub fn distance_sq(color: Rgb, target: [f64; 3]) -> f64 {
    color
        .iter()
        .zip(target.iter())
        .map(|(&c, &t)| {
            let d = f64::from(c) - t;
            d * d
        })
        .sum()
}

/// Running sum of RGB samples used to compute neighbor means
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorAccumulator {
    sum: [u32; 3],
    count: u32,
}

impl ColorAccumulator {
    /// Add one color sample
    pub fn add(&mut self, color: Rgb) {
        for (total, channel) in self.sum.iter_mut().zip(color) {
            *total += u32::from(channel);
        }
        self.count += 1;
    }

    /// Number of samples added
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Mean color, `None` when nothing was added
    pub fn mean(&self) -> Option<[f64; 3]> {
        if self.count == 0 {
            return None;
        }
        let n = f64::from(self.count);
        Some(self.sum.map(|total| f64::from(total) / n))
    }
}

/// Convert RGB to HSV with every component normalised to `[0, 1]`
pub fn rgb_to_hsv(color: Rgb) -> [f64; 3] {
    let [r, g, b] = color.map(|c| f64::from(c) / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue_degrees = if delta <= f64::EPSILON {
        0.0
    } else if (max - r).abs() <= f64::EPSILON {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if (max - g).abs() <= f64::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max <= f64::EPSILON { 0.0 } else { delta / max };
    [hue_degrees / 360.0, saturation, max]
}

/// Convert normalised HSV back to 8-bit RGB
pub fn hsv_to_rgb(hsv: [f64; 3]) -> Rgb {
    let hue_degrees = (hsv[0] * 360.0).rem_euclid(360.0);
    let saturation = hsv[1].clamp(0.0, 1.0);
    let value = hsv[2].clamp(0.0, 1.0);

    let channel = |n: f64| {
        let k = (n + hue_degrees / 60.0) % 6.0;
        let weight = k.min(4.0 - k).clamp(0.0, 1.0);
        let v = value - value * saturation * weight;
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    [channel(5.0), channel(3.0), channel(1.0)]
}
