//! RGB radiance/reflectance values.
//!
//! Spectral rendering beyond three RGB samples is out of scope, so this
//! collapses the usual `CoefficientSpectrum`-parameterized design down to a
//! single concrete three-channel type.

use crate::math::Float;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

pub fn xyz_to_rgb(xyz: [Float; 3]) -> [Float; 3] {
    [
        3.240479 * xyz[0] - 1.537150 * xyz[1] - 0.498535 * xyz[2],
        -0.969256 * xyz[0] + 1.875991 * xyz[1] + 0.041556 * xyz[2],
        0.055648 * xyz[0] - 0.204043 * xyz[1] + 1.057311 * xyz[2],
    ]
}

pub fn rgb_to_xyz(rgb: [Float; 3]) -> [Float; 3] {
    [
        0.412453 * rgb[0] + 0.357580 * rgb[1] + 0.180423 * rgb[2],
        0.212671 * rgb[0] + 0.715160 * rgb[1] + 0.072169 * rgb[2],
        0.019334 * rgb[0] + 0.119193 * rgb[1] + 0.950227 * rgb[2],
    ]
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Spectrum {
    pub c: [Float; 3],
}

impl Spectrum {
    pub const BLACK: Spectrum = Spectrum { c: [0.0, 0.0, 0.0] };

    pub fn new(v: Float) -> Self {
        Spectrum { c: [v, v, v] }
    }

    pub fn rgb(r: Float, g: Float, b: Float) -> Self {
        Spectrum { c: [r, g, b] }
    }

    pub fn from_rgb_array(c: [Float; 3]) -> Self {
        Spectrum { c }
    }

    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    pub fn to_xyz(&self) -> [Float; 3] {
        rgb_to_xyz(self.c)
    }

    pub fn sqrt(&self) -> Self {
        Spectrum {
            c: [self.c[0].sqrt(), self.c[1].sqrt(), self.c[2].sqrt()],
        }
    }

    pub fn lerp(t: Float, s1: Self, s2: Self) -> Self {
        (1.0 - t) * s1 + t * s2
    }

    pub fn clamp(&self, low: Float, high: Float) -> Self {
        Spectrum {
            c: [
                self.c[0].max(low).min(high),
                self.c[1].max(low).min(high),
                self.c[2].max(low).min(high),
            ],
        }
    }

    pub fn clamp_positive(&self) -> Self {
        self.clamp(0.0, Float::INFINITY)
    }

    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// The maximum of the three channels, used by the path integrator's
    /// Russian roulette termination heuristic.
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }

    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / 3.0
    }
}

impl Index<usize> for Spectrum {
    type Output = Float;
    fn index(&self, i: usize) -> &Float {
        &self.c[i]
    }
}

impl IndexMut<usize> for Spectrum {
    fn index_mut(&mut self, i: usize) -> &mut Float {
        &mut self.c[i]
    }
}

impl Add for Spectrum {
    type Output = Spectrum;
    fn add(self, rhs: Spectrum) -> Spectrum {
        Spectrum {
            c: [self.c[0] + rhs.c[0], self.c[1] + rhs.c[1], self.c[2] + rhs.c[2]],
        }
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, rhs: Spectrum) {
        *self = *self + rhs;
    }
}

impl Sub for Spectrum {
    type Output = Spectrum;
    fn sub(self, rhs: Spectrum) -> Spectrum {
        Spectrum {
            c: [self.c[0] - rhs.c[0], self.c[1] - rhs.c[1], self.c[2] - rhs.c[2]],
        }
    }
}

impl SubAssign for Spectrum {
    fn sub_assign(&mut self, rhs: Spectrum) {
        *self = *self - rhs;
    }
}

impl Mul for Spectrum {
    type Output = Spectrum;
    fn mul(self, rhs: Spectrum) -> Spectrum {
        Spectrum {
            c: [self.c[0] * rhs.c[0], self.c[1] * rhs.c[1], self.c[2] * rhs.c[2]],
        }
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, rhs: Spectrum) {
        *self = *self * rhs;
    }
}

impl Mul<Float> for Spectrum {
    type Output = Spectrum;
    fn mul(self, rhs: Float) -> Spectrum {
        Spectrum {
            c: [self.c[0] * rhs, self.c[1] * rhs, self.c[2] * rhs],
        }
    }
}

impl MulAssign<Float> for Spectrum {
    fn mul_assign(&mut self, rhs: Float) {
        *self = *self * rhs;
    }
}

impl Mul<Spectrum> for Float {
    type Output = Spectrum;
    fn mul(self, rhs: Spectrum) -> Spectrum {
        rhs * self
    }
}

impl Div<Float> for Spectrum {
    type Output = Spectrum;
    fn div(self, rhs: Float) -> Spectrum {
        Spectrum {
            c: [self.c[0] / rhs, self.c[1] / rhs, self.c[2] / rhs],
        }
    }
}

impl DivAssign<Float> for Spectrum {
    fn div_assign(&mut self, rhs: Float) {
        *self = *self / rhs;
    }
}

impl Div<Spectrum> for Spectrum {
    type Output = Spectrum;
    fn div(self, rhs: Spectrum) -> Spectrum {
        Spectrum {
            c: [self.c[0] / rhs.c[0], self.c[1] / rhs.c[1], self.c[2] / rhs.c[2]],
        }
    }
}

impl Neg for Spectrum {
    type Output = Spectrum;
    fn neg(self) -> Spectrum {
        Spectrum {
            c: [-self.c[0], -self.c[1], -self.c[2]],
        }
    }
}

impl Sum for Spectrum {
    fn sum<I: Iterator<Item = Spectrum>>(iter: I) -> Self {
        iter.fold(Spectrum::BLACK, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_sum() {
        let spectra = vec![Spectrum::new(1.0), Spectrum::new(2.0), Spectrum::new(3.0)];
        let total: Spectrum = spectra.into_iter().sum();
        assert_eq!(total, Spectrum::new(6.0));
    }

    #[test]
    fn clamp_positive_removes_negatives() {
        let s = Spectrum::rgb(-1.0, 0.5, 2.0);
        let c = s.clamp_positive();
        assert_eq!(c.c, [0.0, 0.5, 2.0]);
    }

    #[test]
    fn max_component_value_picks_largest_channel() {
        let s = Spectrum::rgb(0.1, 0.9, 0.4);
        assert_eq!(s.max_component_value(), 0.9);
    }
}
