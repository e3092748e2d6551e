use bevy::prelude::*;

use crate::config::StarfieldConfig;
use crate::field::StarfieldRng;
use crate::viewport::Viewport;

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0f32).mul_add(t, 2.0).powi(3) / 2.0
    }
}

/// A background star that fades between random opacities.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Twinkle {
    /// Position as a fraction of the viewport, so it follows resizes
    pub anchor: Vec2,
    from: f32,
    to: f32,
    started_at: f32,
    fade: f32,
}

impl Twinkle {
    pub const fn new(anchor: Vec2) -> Self {
        Self {
            anchor,
            from: 0.0,
            to: 0.0,
            started_at: 0.0,
            fade: 0.0,
        }
    }

    pub fn opacity_at(&self, now: f32) -> f32 {
        if self.fade <= 0.0 {
            return self.to;
        }
        let progress = (now - self.started_at) / self.fade;
        (self.to - self.from).mul_add(ease_in_out_cubic(progress), self.from)
    }

    /// Starts fading from wherever the star is now towards `opacity`.
    pub fn retarget(&mut self, now: f32, opacity: f32, fade: f32) {
        self.from = self.opacity_at(now);
        self.to = opacity;
        self.started_at = now;
        self.fade = fade;
    }

    pub fn position(&self, viewport: &Viewport) -> Vec2 {
        self.anchor * viewport.size()
    }
}

/// When the next round of fades begins, in seconds since startup.
#[derive(Resource, Debug, Default)]
pub struct TwinkleClock {
    pub next_at: f32,
}

pub fn spawn_twinkles(
    mut commands: Commands,
    config: Res<StarfieldConfig>,
    mut rng: ResMut<StarfieldRng>,
) {
    let twinkles: Vec<Twinkle> = (0..config.twinkle.count)
        .map(|_| Twinkle::new(Vec2::new(rng.0.f32(), rng.0.f32())))
        .collect();
    commands.spawn_batch(twinkles);
}

pub fn retarget_twinkles(
    time: Res<Time>,
    config: Res<StarfieldConfig>,
    mut clock: ResMut<TwinkleClock>,
    mut rng: ResMut<StarfieldRng>,
    mut twinkles: Query<&mut Twinkle>,
) {
    let now = time.elapsed_secs();
    if now < clock.next_at {
        return;
    }
    clock.next_at = now + config.twinkle.retarget_interval;

    let settings = &config.twinkle;
    for mut twinkle in &mut twinkles {
        let opacity = rng.0.f32();
        let fade = rng.0.f32().mul_add(settings.fade_spread, settings.min_fade);
        twinkle.retarget(now, opacity, fade);
    }
}
