use bevy::prelude::*;

/// Whether the host's primary pointer is a touch screen.
///
/// Pointer-follow effects are skipped on those hosts since a finger never hovers.
#[cfg(target_arch = "wasm32")]
pub fn is_touch_primary() -> bool {
    web_sys::window().is_some_and(|window| window.navigator().max_touch_points() > 0)
}

#[cfg(not(target_arch = "wasm32"))]
pub const fn is_touch_primary() -> bool {
    false
}

/// Scroll offset of the page hosting the canvas, in CSS pixels.
///
/// Native windows have no document around them and report `None`.
#[cfg(target_arch = "wasm32")]
pub fn document_scroll_offset() -> Option<Vec2> {
    let window = web_sys::window()?;
    let x = window.scroll_x().ok()?;
    let y = window.scroll_y().ok()?;
    Some(Vec2::new(x as f32, y as f32))
}

#[cfg(not(target_arch = "wasm32"))]
pub const fn document_scroll_offset() -> Option<Vec2> {
    None
}

/// Logical size of the primary window, if there is one.
pub fn primary_window_size(
    windows: &Query<&Window, With<bevy::window::PrimaryWindow>>,
) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    Some(Vec2::new(window.width(), window.height()))
}
