use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{HelixisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Builds a colour from unchecked components, all of which must lie in 0..=255.
    pub fn from_components(red: i64, green: i64, blue: i64) -> Result<Self> {
        let channel = |v: i64| u8::try_from(v).ok();
        match (channel(red), channel(green), channel(blue)) {
            (Some(r), Some(g), Some(b)) => Ok(Self::new(r, g, b)),
            _ => Err(HelixisError::invalid(
                "One or more RGB values are outside the valid range (0-255).",
            )),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Returns `amount` colours near `self`, each channel shifted by Gaussian
    /// noise with standard deviation `sigma` and clamped to the valid range.
    pub fn similar<R: Rng + ?Sized>(
        self,
        amount: usize,
        sigma: f64,
        rng: &mut R,
    ) -> Result<Vec<Self>> {
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(HelixisError::invalid(format!(
                "Color deviation must be a non-negative number, got {sigma}."
            )));
        }
        let noise = Normal::new(0.0, sigma).map_err(|e| {
            HelixisError::invalid(format!("invalid colour deviation {sigma}: {e}"))
        })?;

        let mut jitter = |base: u8| -> u8 {
            let shifted = f64::from(base) + noise.sample(rng);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = shifted.clamp(0.0, 255.0) as u8;
            value
        };

        Ok((0..amount)
            .map(|_| Self::new(jitter(self.red), jitter(self.green), jitter(self.blue)))
            .collect())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        assert_eq!(Rgb::new(255, 0, 0).to_hex(), "#ff0000");
        assert_eq!(Rgb::new(1, 10, 171).to_hex(), "#010aab");
    }

    #[test]
    fn out_of_range_components_are_rejected() {
        assert!(Rgb::from_components(256, 0, 0).is_err());
        assert!(Rgb::from_components(0, -1, 0).is_err());
        assert_eq!(Rgb::from_components(0, 128, 255).unwrap(), Rgb::new(0, 128, 255));
    }

    #[test]
    fn similar_returns_requested_amount() {
        let mut rng = StdRng::seed_from_u64(42);
        let colors = Rgb::new(255, 0, 0).similar(5, 30.0, &mut rng).unwrap();
        assert_eq!(colors.len(), 5);
    }

    #[test]
    fn zero_sigma_reproduces_base_colour() {
        let mut rng = StdRng::seed_from_u64(42);
        let base = Rgb::new(12, 200, 99);
        let colors = base.similar(3, 0.0, &mut rng).unwrap();
        assert!(colors.iter().all(|c| *c == base));
    }

    #[test]
    fn negative_sigma_is_an_error() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(Rgb::new(0, 0, 0).similar(1, -1.0, &mut rng).is_err());
        assert!(Rgb::new(0, 0, 0).similar(1, f64::NAN, &mut rng).is_err());
    }
}
