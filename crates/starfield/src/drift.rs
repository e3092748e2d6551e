use bevy::prelude::*;

use crate::config::{DriftSettings, StarfieldConfig};
use crate::field::{Star, StarfieldRng};

pub fn ease_in_out_circ(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        (1.0 - 2.0f32.mul_add(-2.0 * t * t, 1.0).max(0.0).sqrt()) / 2.0
    } else {
        let rest = (-2.0f32).mul_add(t, 2.0);
        (rest.mul_add(-rest, 1.0).max(0.0).sqrt() + 1.0) / 2.0
    }
}

/// One leg of a star's endless wander around its origin.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Drift {
    from: Vec2,
    to: Vec2,
    /// Set by the first tick of the leg
    started_at: Option<f32>,
    duration: f32,
}

impl Drift {
    /// Starts a leg from `from` to a random spot in the box around `origin`.
    pub fn toward(
        from: Vec2,
        origin: Vec2,
        settings: &DriftSettings,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let amplitude = settings.amplitude;
        let offset = Vec2::new(
            rng.f32().mul_add(2.0 * amplitude, -amplitude),
            rng.f32().mul_add(2.0 * amplitude, -amplitude),
        );
        Self {
            from,
            to: origin + offset,
            started_at: None,
            duration: rng
                .f32()
                .mul_add(settings.duration_spread, settings.min_duration),
        }
    }

    pub const fn target(&self) -> Vec2 {
        self.to
    }

    pub const fn duration(&self) -> f32 {
        self.duration
    }

    pub fn progress(&mut self, now: f32) -> f32 {
        let started_at = *self.started_at.get_or_insert(now);
        if self.duration > 0.0 {
            (now - started_at) / self.duration
        } else {
            1.0
        }
    }

    /// Position of the star at `now`.
    ///
    /// A finished leg lands exactly on its target and is replaced by a fresh
    /// one, whose clock starts on the following tick.
    pub fn advance(
        &mut self,
        origin: Vec2,
        now: f32,
        settings: &DriftSettings,
        rng: &mut fastrand::Rng,
    ) -> Vec2 {
        let progress = self.progress(now);
        if progress < 1.0 {
            return self.from.lerp(self.to, ease_in_out_circ(progress));
        }

        let arrived = self.to;
        *self = Self::toward(arrived, origin, settings, rng);
        arrived
    }
}

pub fn drift_stars(
    time: Res<Time>,
    config: Res<StarfieldConfig>,
    mut rng: ResMut<StarfieldRng>,
    mut stars: Query<(&mut Star, &mut Drift)>,
) {
    let now = time.elapsed_secs();
    for (mut star, mut drift) in &mut stars {
        let origin = star.origin;
        star.position = drift.advance(origin, now, &config.drift, &mut rng.0);
    }
}
