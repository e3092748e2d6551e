use bevy::math::Vec2;

// Largest surface the GL backend accepts on most mobile browsers
const MAX_SURFACE_EXTENT: f32 = 2048.0;

// wgpu refuses to configure a surface above the texture limit and panics instead
pub fn clamp_to_surface_limits(size: Vec2) -> Vec2 {
    size.min(Vec2::splat(MAX_SURFACE_EXTENT)).max(Vec2::ZERO)
}

#[cfg(target_arch = "wasm32")]
fn browser_inner_size() -> Option<Vec2> {
    let wasm_window = web_sys::window()?;
    let width = wasm_window.inner_width().ok()?.as_f64()?;
    let height = wasm_window.inner_height().ok()?.as_f64()?;
    Some(Vec2::new(width as f32, height as f32))
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(inner_size) = browser_inner_size() else {
        return;
    };
    let target = clamp_to_surface_limits(inner_size);

    for mut window in &mut primary_query {
        if (window.resolution.width() - target.x).abs() > f32::EPSILON
            || (window.resolution.height() - target.y).abs() > f32::EPSILON
        {
            window.resolution.set(target.x, target.y);
        }
    }
}
