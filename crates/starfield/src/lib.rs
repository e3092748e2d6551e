use bevy::prelude::*;
use bevy::window::{CursorMoved, WindowResized};
use canvas_helpers::CanvasSettings;
use canvas_helpers::input::is_touch_primary;

pub mod activity;
pub mod config;
pub mod drift;
pub mod field;
pub mod frame;
pub mod grid;
pub mod neighbors;
mod render;
pub mod twinkle;
pub mod viewport;

pub use config::StarfieldConfig;
use field::{Star, StarfieldRng};
use frame::StarfieldFrame;
pub use render::StarfieldRenderPlugin;
use twinkle::{Twinkle, TwinkleClock};
use viewport::{CanvasGate, PointerMode, ScrollOffset, Target, Viewport};

const CANVAS_SELECTOR: &str = "#starfield";

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum StarfieldState {
    #[default]
    Running,
    Stopped,
}

/// Frame stages, run in this order while the field is running.
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum StarfieldSet {
    Listen,
    Generate,
    Animate,
    Compose,
    Present,
}

/// Simulation side of the starfield, usable without a window or renderer.
#[derive(Default)]
pub struct StarfieldPlugin {
    pub config: StarfieldConfig,
}

impl StarfieldPlugin {
    pub fn seeded(seed: u64) -> Self {
        Self {
            config: StarfieldConfig {
                seed: Some(seed),
                ..default()
            },
        }
    }
}

impl Plugin for StarfieldPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(err) => {
                error!("Invalid starfield config, falling back to defaults: {err}");
                StarfieldConfig {
                    seed: self.config.seed,
                    ..default()
                }
            }
        };

        app.add_event::<CursorMoved>()
            .add_event::<WindowResized>()
            .init_state::<StarfieldState>()
            .insert_resource(StarfieldRng(config.rng()))
            .insert_resource(PointerMode {
                touch_primary: is_touch_primary(),
            })
            .insert_resource(config)
            .init_resource::<Viewport>()
            .init_resource::<Target>()
            .init_resource::<ScrollOffset>()
            .init_resource::<CanvasGate>()
            .init_resource::<StarfieldFrame>()
            .init_resource::<TwinkleClock>()
            .configure_sets(
                Update,
                (
                    StarfieldSet::Listen,
                    StarfieldSet::Generate,
                    StarfieldSet::Animate,
                    StarfieldSet::Compose,
                    StarfieldSet::Present,
                )
                    .chain(),
            )
            .add_systems(Startup, (viewport::init_viewport, twinkle::spawn_twinkles))
            .add_systems(
                Update,
                (
                    viewport::track_resize,
                    viewport::poll_document_scroll,
                    viewport::track_pointer,
                    viewport::gate_canvas,
                )
                    .chain()
                    .in_set(StarfieldSet::Listen),
            )
            .add_systems(
                Update,
                field::regenerate_starfield.in_set(StarfieldSet::Generate),
            )
            .add_systems(
                Update,
                (drift::drift_stars, twinkle::retarget_twinkles).in_set(StarfieldSet::Animate),
            )
            .add_systems(
                Update,
                frame::compose_frame.in_set(StarfieldSet::Compose),
            )
            .add_systems(OnEnter(StarfieldState::Stopped), shut_down);

        for set in [
            StarfieldSet::Listen,
            StarfieldSet::Generate,
            StarfieldSet::Animate,
            StarfieldSet::Compose,
            StarfieldSet::Present,
        ] {
            app.configure_sets(Update, set.run_if(in_state(StarfieldState::Running)));
        }
    }
}

fn shut_down(
    mut commands: Commands,
    stars: Query<Entity, Or<(With<Star>, With<Twinkle>)>>,
    mut frame: ResMut<StarfieldFrame>,
) {
    for entity in &stars {
        commands.entity(entity).despawn();
    }
    frame.clear();
    info!("Starfield stopped");
}

fn stop_on_escape(
    keycode: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<StarfieldState>>,
) {
    if keycode.just_pressed(KeyCode::Escape) {
        next_state.set(StarfieldState::Stopped);
    }
}

pub fn run() {
    let settings = CanvasSettings::new("Starfield", CANVAS_SELECTOR);

    canvas_helpers::get_default_app(&settings)
        .add_plugins((StarfieldPlugin::default(), StarfieldRenderPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, stop_on_escape)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bevy::state::app::StatesPlugin;

    use super::*;

    fn headless_app(width: f32, height: f32) -> App {
        let mut app = App::new();
        app.add_plugins((StatesPlugin, StarfieldPlugin::seeded(2024)))
            .init_resource::<Time>()
            .insert_resource(Viewport::new(width, height));
        app.update();
        app
    }

    fn stars(app: &mut App) -> Vec<(Entity, Star)> {
        let mut query = app.world_mut().query::<(Entity, &Star)>();
        query
            .iter(app.world())
            .map(|(entity, star)| (entity, star.clone()))
            .collect()
    }

    fn move_pointer(app: &mut App, position: Vec2) {
        app.world_mut().send_event(CursorMoved {
            window: Entity::PLACEHOLDER,
            position,
            delta: None,
        });
    }

    #[test]
    fn first_frame_builds_the_field() {
        let mut app = headless_app(800.0, 600.0);
        let stars = stars(&mut app);

        assert!((400..=441).contains(&stars.len()), "{} stars", stars.len());
        for (entity, star) in &stars {
            assert_eq!(star.neighbors.len(), 5, "five neighbors each");
            assert!(!star.neighbors.contains(entity), "never its own neighbor");
            assert!((2.0..=4.0).contains(&star.radius), "radius {}", star.radius);
        }
        assert_eq!(
            app.world().resource::<Target>().position,
            Vec2::new(400.0, 300.0),
            "target starts at the centre"
        );
    }

    #[test]
    fn neighbors_point_at_live_stars() {
        let mut app = headless_app(640.0, 480.0);
        let stars = stars(&mut app);
        let live: Vec<Entity> = stars.iter().map(|(entity, _)| *entity).collect();
        assert!(
            stars
                .iter()
                .flat_map(|(_, star)| &star.neighbors)
                .all(|neighbor| live.contains(neighbor)),
            "dangling neighbor"
        );
    }

    #[test]
    fn resizing_regenerates_the_field() {
        let mut app = headless_app(800.0, 600.0);
        let before: Vec<Entity> = stars(&mut app).into_iter().map(|(entity, _)| entity).collect();

        app.world_mut().send_event(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 400.0,
            height: 300.0,
        });
        app.update();

        let after = stars(&mut app);
        assert!(!after.is_empty(), "a new field was generated");
        assert!(
            after.iter().all(|(entity, _)| !before.contains(entity)),
            "old stars were despawned"
        );
        assert!(
            after
                .iter()
                .all(|(_, star)| star.origin.x < 400.0 + 20.0 && star.origin.y < 300.0 + 15.0),
            "origins follow the new viewport"
        );
        assert_eq!(
            app.world().resource::<Target>().position,
            Vec2::new(200.0, 150.0),
            "untouched target re-centres"
        );
    }

    #[test]
    fn empty_viewport_has_no_stars() {
        let mut app = headless_app(0.0, 0.0);
        assert!(stars(&mut app).is_empty(), "nothing to scatter over");
        assert!(app.world().resource::<StarfieldFrame>().is_empty(), "nothing drawn");
    }

    #[test]
    fn pointer_moves_the_target() {
        let mut app = headless_app(800.0, 600.0);
        move_pointer(&mut app, Vec2::new(120.0, 80.0));
        app.update();

        let target = *app.world().resource::<Target>();
        assert_eq!(target.position, Vec2::new(120.0, 80.0), "follows the pointer");
        assert!(target.pointer_seen, "pointer recorded");
    }

    #[test]
    fn touch_hosts_keep_the_centre_target() {
        let mut app = headless_app(800.0, 600.0);
        app.insert_resource(PointerMode {
            touch_primary: true,
        });
        move_pointer(&mut app, Vec2::new(120.0, 80.0));
        app.update();

        assert_eq!(
            app.world().resource::<Target>().position,
            Vec2::new(400.0, 300.0),
            "pointer ignored"
        );
    }

    #[test]
    fn far_target_clears_the_frame() {
        let mut app = headless_app(800.0, 600.0);
        assert!(!app.world().resource::<StarfieldFrame>().is_empty(), "centre is lit");

        move_pointer(&mut app, Vec2::new(5000.0, 5000.0));
        app.update();
        assert!(app.world().resource::<StarfieldFrame>().is_empty(), "all stars dark");
    }

    #[test]
    fn scrolling_past_the_canvas_freezes_the_frame() {
        let mut app = headless_app(800.0, 600.0);
        let lit = app.world().resource::<StarfieldFrame>().clone();

        app.insert_resource(ScrollOffset(Vec2::new(0.0, 700.0)));
        move_pointer(&mut app, Vec2::new(5000.0, 5000.0));
        app.update();
        assert!(!app.world().resource::<CanvasGate>().enabled, "gate closed");
        assert_eq!(*app.world().resource::<StarfieldFrame>(), lit, "frame frozen");

        app.insert_resource(ScrollOffset(Vec2::ZERO));
        move_pointer(&mut app, Vec2::new(5000.0, 5000.0));
        app.update();
        assert!(app.world().resource::<CanvasGate>().enabled, "gate reopened");
        assert!(app.world().resource::<StarfieldFrame>().is_empty(), "redrawn");
    }

    #[test]
    fn stopping_clears_the_field() {
        let mut app = headless_app(800.0, 600.0);
        app.world_mut()
            .resource_mut::<NextState<StarfieldState>>()
            .set(StarfieldState::Stopped);
        app.update();

        assert!(stars(&mut app).is_empty(), "stars despawned");
        let mut twinkles = app.world_mut().query::<&Twinkle>();
        assert_eq!(twinkles.iter(app.world()).count(), 0, "twinkles despawned");
        assert!(app.world().resource::<StarfieldFrame>().is_empty(), "frame cleared");

        // Nothing is regenerated while stopped
        app.insert_resource(Viewport::new(300.0, 300.0));
        app.update();
        assert!(stars(&mut app).is_empty(), "loop no longer runs");
    }

    #[test]
    fn stars_wander_within_their_box_across_legs() {
        use std::time::Duration;

        use crate::drift::Drift;

        let mut app = headless_app(800.0, 600.0);
        let amplitude = app.world().resource::<StarfieldConfig>().drift.amplitude;
        let origins: HashMap<Entity, Vec2> = stars(&mut app)
            .into_iter()
            .map(|(entity, star)| (entity, star.origin))
            .collect();
        let mut drifts = app.world_mut().query::<(Entity, &Drift)>();
        let first_targets: HashMap<Entity, Vec2> = drifts
            .iter(app.world())
            .map(|(entity, drift)| (entity, drift.target()))
            .collect();

        // Legs last at most two seconds, so every star finishes at least one
        for _ in 0..210 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(1.0 / 60.0));
            app.update();

            for (entity, star) in stars(&mut app) {
                assert_eq!(Some(&star.origin), origins.get(&entity), "origin stays put");
                let offset = (star.position - star.origin).abs();
                assert!(
                    offset.cmple(Vec2::splat(amplitude + 1e-3)).all(),
                    "{entity} wandered to {} from {}",
                    star.position,
                    star.origin
                );
            }
        }

        assert!(
            stars(&mut app)
                .iter()
                .any(|(_, star)| star.position != star.origin),
            "stars moved"
        );
        assert!(
            drifts
                .iter(app.world())
                .all(|(entity, drift)| first_targets.get(&entity) != Some(&drift.target())),
            "every star started a new leg"
        );
    }

    #[test]
    fn twinkles_are_spawned_once() {
        let mut app = headless_app(800.0, 600.0);
        app.update();
        let mut twinkles = app.world_mut().query::<&Twinkle>();
        assert_eq!(twinkles.iter(app.world()).count(), 500, "one layer of twinkles");
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let mut app = App::new();
        app.add_plugins((
            StatesPlugin,
            StarfieldPlugin {
                config: StarfieldConfig {
                    granularity: 0,
                    ..default()
                },
            },
        ));
        assert_eq!(
            app.world().resource::<StarfieldConfig>().granularity,
            20,
            "default granularity"
        );
    }
}
