use bevy::prelude::*;

use crate::config::StarfieldConfig;
use crate::drift::Drift;
use crate::grid::scatter_origins;
use crate::neighbors::nearest_neighbors;
use crate::viewport::Viewport;

/// A point of the starfield grid.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Star {
    /// Anchor the star wanders around, fixed for the lifetime of the grid
    pub origin: Vec2,
    /// Current canvas position
    pub position: Vec2,
    pub radius: f32,
    /// Closest stars at generation time, nearest first
    pub neighbors: Vec<Entity>,
}

#[derive(Resource)]
pub struct StarfieldRng(pub fastrand::Rng);

/// Rebuilds the whole field whenever the viewport changes size, including the first frame.
pub fn regenerate_starfield(
    mut commands: Commands,
    viewport: Res<Viewport>,
    config: Res<StarfieldConfig>,
    mut rng: ResMut<StarfieldRng>,
    stars: Query<Entity, With<Star>>,
) {
    if !viewport.is_changed() {
        return;
    }

    for entity in &stars {
        commands.entity(entity).despawn();
    }

    let origins = scatter_origins(
        viewport.width,
        viewport.height,
        config.granularity,
        &mut rng.0,
    );
    let neighbors = nearest_neighbors(&origins, config.neighbor_count);

    // Ids are reserved first so neighbor lists can point at stars spawned later
    let entities: Vec<Entity> = origins.iter().map(|_| commands.spawn_empty().id()).collect();

    for ((&entity, &origin), indices) in entities.iter().zip(&origins).zip(neighbors) {
        let neighbors = indices
            .into_iter()
            .filter_map(|index| entities.get(index).copied())
            .collect();
        let radius = rng.0.f32().mul_add(config.radius_spread, config.min_radius);
        let drift = Drift::toward(origin, origin, &config.drift, &mut rng.0);

        commands.entity(entity).insert((
            Star {
                origin,
                position: origin,
                radius,
                neighbors,
            },
            drift,
        ));
    }

    info!(
        "Generated {} stars for a {}x{} viewport",
        entities.len(),
        viewport.width,
        viewport.height
    );
}
