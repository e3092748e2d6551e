use bevy::color::Srgba;
use bevy::prelude::*;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::activity::{Proximity, ProximityBands};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Grid granularity must be at least 1")]
    ZeroGranularity,

    #[error("Neighbor count must be at least 1")]
    ZeroNeighbors,

    #[error("Drift amplitude must be finite and non-negative, got {0}")]
    InvalidAmplitude(f32),

    #[error("Drift duration must be positive, got {min}s plus up to {spread}s")]
    InvalidDriftDuration { min: f32, spread: f32 },

    #[error("Star radius must be positive, got {min}px plus up to {spread}px")]
    InvalidRadius { min: f32, spread: f32 },

    #[error("{band} band bound {bound} must be above the band before it")]
    UnorderedBands { band: Proximity, bound: f32 },

    #[error("{band} band opacities must stay within 0..=1 and fade with distance")]
    InvalidOpacity { band: Proximity },

    #[error("Twinkle retarget interval must be positive, got {0}s")]
    InvalidTwinkleInterval(f32),

    #[error("Twinkle fade must be positive, got {min}s plus up to {spread}s")]
    InvalidTwinkleFade { min: f32, spread: f32 },
}

/// Random motion of each star around its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftSettings {
    /// Half-width of the box around the origin, per axis
    pub amplitude: f32,
    pub min_duration: f32,
    pub duration_spread: f32,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            amplitude: 50.0,
            min_duration: 1.0,
            duration_spread: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwinkleSettings {
    pub count: usize,
    pub size: f32,
    pub retarget_interval: f32,
    pub min_fade: f32,
    pub fade_spread: f32,
}

impl Default for TwinkleSettings {
    fn default() -> Self {
        Self {
            count: 500,
            size: 2.0,
            retarget_interval: 1.0,
            min_fade: 0.5,
            fade_spread: 0.5,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StarfieldConfig {
    /// Cells per axis of the jittered grid
    pub granularity: u32,
    pub neighbor_count: usize,
    pub min_radius: f32,
    pub radius_spread: f32,
    pub color: Srgba,
    pub bands: ProximityBands,
    pub drift: DriftSettings,
    pub twinkle: TwinkleSettings,
    /// Fixed seed for reproducible fields, entropy when `None`
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            granularity: 20,
            neighbor_count: 5,
            min_radius: 2.0,
            radius_spread: 2.0,
            color: Srgba::new(156.0 / 255.0, 217.0 / 255.0, 249.0 / 255.0, 1.0),
            bands: ProximityBands::default(),
            drift: DriftSettings::default(),
            twinkle: TwinkleSettings::default(),
            seed: None,
        }
    }
}

impl StarfieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.granularity == 0 {
            return Err(ConfigError::ZeroGranularity);
        }
        if self.neighbor_count == 0 {
            return Err(ConfigError::ZeroNeighbors);
        }
        if !self.drift.amplitude.is_finite() || self.drift.amplitude < 0.0 {
            return Err(ConfigError::InvalidAmplitude(self.drift.amplitude));
        }
        if !(self.drift.min_duration > 0.0 && self.drift.duration_spread >= 0.0) {
            return Err(ConfigError::InvalidDriftDuration {
                min: self.drift.min_duration,
                spread: self.drift.duration_spread,
            });
        }
        if !(self.min_radius > 0.0 && self.radius_spread >= 0.0) {
            return Err(ConfigError::InvalidRadius {
                min: self.min_radius,
                spread: self.radius_spread,
            });
        }
        self.validate_bands()?;
        if !(self.twinkle.retarget_interval > 0.0) {
            return Err(ConfigError::InvalidTwinkleInterval(
                self.twinkle.retarget_interval,
            ));
        }
        if !(self.twinkle.min_fade > 0.0 && self.twinkle.fade_spread >= 0.0) {
            return Err(ConfigError::InvalidTwinkleFade {
                min: self.twinkle.min_fade,
                spread: self.twinkle.fade_spread,
            });
        }
        Ok(())
    }

    // Bands must widen outwards while their opacities fade, so activity never
    // grows as a star moves away from the target.
    fn validate_bands(&self) -> Result<(), ConfigError> {
        let mut previous_bound = 0.0;
        let mut previous_opacity = (1.0, 1.0);

        for proximity in Proximity::iter() {
            let Some(band) = self.bands.band(proximity) else {
                continue;
            };
            if !(band.max_distance_squared > previous_bound) {
                return Err(ConfigError::UnorderedBands {
                    band: proximity,
                    bound: band.max_distance_squared,
                });
            }
            let in_range = |value: f32| (0.0..=1.0).contains(&value);
            if !in_range(band.line)
                || !in_range(band.circle)
                || band.line > previous_opacity.0
                || band.circle > previous_opacity.1
            {
                return Err(ConfigError::InvalidOpacity { band: proximity });
            }
            previous_bound = band.max_distance_squared;
            previous_opacity = (band.line, band.circle);
        }
        Ok(())
    }

    pub fn rng(&self) -> fastrand::Rng {
        self.seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(StarfieldConfig::default().validate(), Ok(()), "defaults");
    }

    #[test]
    fn zero_granularity_is_rejected() {
        let config = StarfieldConfig {
            granularity: 0,
            ..default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroGranularity),
            "granularity 0"
        );
    }

    #[test]
    fn overlapping_bands_are_rejected() {
        let mut config = StarfieldConfig::default();
        config.bands.close.max_distance_squared = 3000.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnorderedBands {
                band: Proximity::Close,
                bound: 3000.0
            }),
            "close band inside near band"
        );
    }

    #[test]
    fn brightening_bands_are_rejected() {
        let mut config = StarfieldConfig::default();
        config.bands.far.circle = 0.9;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidOpacity {
                band: Proximity::Far
            }),
            "far band brighter than close band"
        );
    }

    #[test]
    fn nan_drift_amplitude_is_rejected() {
        let mut config = StarfieldConfig::default();
        config.drift.amplitude = f32::NAN;
        assert!(
            matches!(config.validate(), Err(ConfigError::InvalidAmplitude(_))),
            "NaN amplitude"
        );
    }

    #[test]
    fn error_messages_name_the_band() {
        let error = ConfigError::InvalidOpacity {
            band: Proximity::Near,
        };
        assert!(error.to_string().starts_with("Near band"), "{error}");
    }

    #[test]
    fn seeded_configs_produce_identical_rngs() {
        let config = StarfieldConfig {
            seed: Some(42),
            ..default()
        };
        assert_eq!(config.rng().u64(..), config.rng().u64(..), "same seed");
    }
}
