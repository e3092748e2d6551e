use bevy::prelude::*;

use crate::StarfieldSet;
use crate::config::StarfieldConfig;
use crate::field::Star;
use crate::frame::StarfieldFrame;
use crate::twinkle::Twinkle;
use crate::viewport::Viewport;

// Twinkles sit behind the field, links are drawn by gizmos on top
const TWINKLE_Z: f32 = -1.0;
const DISC_Z: f32 = 0.0;

/// Puts the composed frame on screen. Needs the render, sprite and gizmo plugins.
pub struct StarfieldRenderPlugin;

impl Plugin for StarfieldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_disc_mesh, thin_link_gizmos))
            .add_systems(
                Update,
                (
                    (attach_star_visuals, attach_twinkle_visuals),
                    (present_discs, present_links, present_twinkles),
                )
                    .chain()
                    .in_set(StarfieldSet::Present),
            );
    }
}

/// Unit circle shared by every star, scaled by the star radius.
#[derive(Resource)]
struct DiscMesh(Handle<Mesh>);

fn setup_disc_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(DiscMesh(meshes.add(Circle::new(1.0))));
}

// Links are hairlines on a canvas, gizmos default to 2 px
const LINK_WIDTH: f32 = 1.0;

fn thin_link_gizmos(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    config.line_width = LINK_WIDTH;
}

fn attach_star_visuals(
    mut commands: Commands,
    added: Query<Entity, Added<Star>>,
    disc_mesh: Res<DiscMesh>,
    config: Res<StarfieldConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for entity in &added {
        // Each star fades on its own, so each gets its own material
        let material = materials.add(ColorMaterial::from(Color::Srgba(
            config.color.with_alpha(0.0),
        )));
        commands.entity(entity).insert((
            Mesh2d(disc_mesh.0.clone()),
            MeshMaterial2d(material),
            Transform::default(),
            Visibility::Hidden,
        ));
    }
}

fn attach_twinkle_visuals(
    mut commands: Commands,
    added: Query<Entity, Added<Twinkle>>,
    config: Res<StarfieldConfig>,
) {
    for entity in &added {
        commands.entity(entity).insert((
            Sprite {
                color: Color::WHITE.with_alpha(0.0),
                custom_size: Some(Vec2::splat(config.twinkle.size)),
                ..default()
            },
            Transform::default(),
        ));
    }
}

fn present_discs(
    frame: Res<StarfieldFrame>,
    viewport: Res<Viewport>,
    config: Res<StarfieldConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut discs: Query<(&mut Transform, &mut Visibility, &MeshMaterial2d<ColorMaterial>), With<Star>>,
) {
    // A frozen frame keeps the last picture on screen
    if !frame.is_changed() {
        return;
    }

    for (_, mut visibility, _) in &mut discs {
        visibility.set_if_neq(Visibility::Hidden);
    }

    for disc in &frame.discs {
        let Ok((mut transform, mut visibility, material)) = discs.get_mut(disc.star) else {
            continue;
        };
        transform.translation = viewport.canvas_to_world(disc.center).extend(DISC_Z);
        transform.scale = Vec3::splat(disc.radius);
        *visibility = Visibility::Visible;

        if let Some(material) = materials.get_mut(&material.0) {
            material.color = Color::Srgba(config.color.with_alpha(disc.alpha));
        }
    }
}

fn present_links(
    frame: Res<StarfieldFrame>,
    viewport: Res<Viewport>,
    config: Res<StarfieldConfig>,
    mut gizmos: Gizmos,
) {
    // Gizmos only last one frame, so links are resubmitted even when frozen
    for link in &frame.links {
        gizmos.line_2d(
            viewport.canvas_to_world(link.from),
            viewport.canvas_to_world(link.to),
            config.color.with_alpha(link.alpha),
        );
    }
}

fn present_twinkles(
    time: Res<Time>,
    viewport: Res<Viewport>,
    mut twinkles: Query<(&Twinkle, &mut Transform, &mut Sprite)>,
) {
    let now = time.elapsed_secs();
    for (twinkle, mut transform, mut sprite) in &mut twinkles {
        transform.translation = viewport
            .canvas_to_world(twinkle.position(&viewport))
            .extend(TWINKLE_Z);
        sprite.color = sprite.color.with_alpha(twinkle.opacity_at(now));
    }
}
