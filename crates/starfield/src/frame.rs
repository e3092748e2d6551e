use bevy::prelude::*;

use crate::activity::{Activity, ProximityBands};
use crate::config::StarfieldConfig;
use crate::field::Star;
use crate::viewport::{CanvasGate, Target};

/// Line from a star to one of its neighbors, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

/// Filled circle drawn for a star, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub star: Entity,
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Everything drawn on the canvas for the latest composed frame.
///
/// Left untouched while the canvas gate is closed, which freezes the picture.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct StarfieldFrame {
    pub links: Vec<Link>,
    pub discs: Vec<Disc>,
}

impl StarfieldFrame {
    pub fn clear(&mut self) {
        self.links.clear();
        self.discs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.discs.is_empty()
    }

    /// Redraws the frame from scratch for the given stars and target.
    pub fn compose<'a>(
        &mut self,
        stars: impl IntoIterator<Item = (Entity, &'a Star)>,
        position_of: impl Fn(Entity) -> Option<Vec2>,
        target: Vec2,
        bands: &ProximityBands,
    ) {
        self.clear();

        for (entity, star) in stars {
            let activity = Activity::between(target, star.position, bands);

            if activity.draws_links() {
                self.links.extend(
                    star.neighbors
                        .iter()
                        .filter_map(|&neighbor| position_of(neighbor))
                        .map(|to| Link {
                            from: star.position,
                            to,
                            alpha: activity.line,
                        }),
                );
            }

            if activity.draws_disc() {
                self.discs.push(Disc {
                    star: entity,
                    center: star.position,
                    radius: star.radius,
                    alpha: activity.circle,
                });
            }
        }
    }
}

pub fn compose_frame(
    gate: Res<CanvasGate>,
    target: Res<Target>,
    config: Res<StarfieldConfig>,
    stars: Query<(Entity, &Star)>,
    mut frame: ResMut<StarfieldFrame>,
) {
    if !gate.enabled {
        return;
    }
    frame.compose(
        stars.iter(),
        |entity| stars.get(entity).ok().map(|(_, star)| star.position),
        target.position,
        &config.bands,
    );
}
