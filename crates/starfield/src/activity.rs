use bevy::math::Vec2;
use strum::{Display, EnumIter};

/// How close a star sits to the target, coarsest first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Proximity {
    Near,
    Close,
    Far,
    Outside,
}

/// One distance band and the opacities it lights up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Exclusive upper bound, in squared pixels
    pub max_distance_squared: f32,
    /// Opacity of the links to the star's neighbors
    pub line: f32,
    /// Opacity of the star's disc
    pub circle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityBands {
    pub near: Band,
    pub close: Band,
    pub far: Band,
}

impl Default for ProximityBands {
    fn default() -> Self {
        // ~63px, ~141px and 200px away from the target
        Self {
            near: Band {
                max_distance_squared: 4000.0,
                line: 0.3,
                circle: 0.6,
            },
            close: Band {
                max_distance_squared: 20000.0,
                line: 0.1,
                circle: 0.3,
            },
            far: Band {
                max_distance_squared: 40000.0,
                line: 0.02,
                circle: 0.1,
            },
        }
    }
}

impl ProximityBands {
    pub fn classify(&self, distance_squared: f32) -> Proximity {
        let distance_squared = distance_squared.abs();
        if distance_squared < self.near.max_distance_squared {
            Proximity::Near
        } else if distance_squared < self.close.max_distance_squared {
            Proximity::Close
        } else if distance_squared < self.far.max_distance_squared {
            Proximity::Far
        } else {
            Proximity::Outside
        }
    }

    pub const fn band(&self, proximity: Proximity) -> Option<&Band> {
        match proximity {
            Proximity::Near => Some(&self.near),
            Proximity::Close => Some(&self.close),
            Proximity::Far => Some(&self.far),
            Proximity::Outside => None,
        }
    }
}

/// Per-frame opacity of a star, recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Activity {
    pub line: f32,
    pub circle: f32,
}

impl Activity {
    pub const NONE: Self = Self {
        line: 0.0,
        circle: 0.0,
    };

    pub fn at_distance_squared(distance_squared: f32, bands: &ProximityBands) -> Self {
        bands
            .band(bands.classify(distance_squared))
            .map_or(Self::NONE, |band| Self {
                line: band.line,
                circle: band.circle,
            })
    }

    pub fn between(target: Vec2, position: Vec2, bands: &ProximityBands) -> Self {
        Self::at_distance_squared(target.distance_squared(position), bands)
    }

    pub fn draws_links(self) -> bool {
        self.line > 0.0
    }

    pub fn draws_disc(self) -> bool {
        self.circle > 0.0
    }
}
