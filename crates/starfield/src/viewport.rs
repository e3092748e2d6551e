use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, WindowResized};
use canvas_helpers::input::{document_scroll_offset, primary_window_size};

/// Size of the canvas in logical pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() / 2.0
    }

    /// Canvas coordinates have their origin top-left with y pointing down,
    /// the 2D camera looks at the centre with y pointing up.
    pub fn canvas_to_world(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x - self.width / 2.0, self.height / 2.0 - point.y)
    }
}

/// Where proximity is measured from: the pointer, or the centre until it shows up.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct Target {
    pub position: Vec2,
    pub pointer_seen: bool,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset(pub Vec2);

/// Whether the canvas is redrawn this frame.
#[derive(Resource, Debug)]
pub struct CanvasGate {
    pub enabled: bool,
}

impl Default for CanvasGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct PointerMode {
    pub touch_primary: bool,
}

pub fn init_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
    mut target: ResMut<Target>,
) {
    if let Some(size) = primary_window_size(&windows) {
        viewport.set_if_neq(Viewport::new(size.x, size.y));
    }
    target.position = viewport.center();
}

pub fn track_resize(
    mut resized: EventReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
    mut target: ResMut<Target>,
) {
    let primary = primary.get_single().ok();
    let Some(latest) = resized
        .read()
        .filter(|event| primary.is_none_or(|window| window == event.window))
        .last()
    else {
        return;
    };

    let next = Viewport::new(latest.width, latest.height);
    if viewport.set_if_neq(next) {
        debug!("Viewport resized to {}x{}", next.width, next.height);
        if !target.pointer_seen {
            target.position = next.center();
        }
    }
}

pub fn poll_document_scroll(mut scroll: ResMut<ScrollOffset>) {
    if let Some(offset) = document_scroll_offset() {
        scroll.set_if_neq(ScrollOffset(offset));
    }
}

/// Pointer positions are page coordinates, hence the scroll offset.
pub fn track_pointer(
    mut moved: EventReader<CursorMoved>,
    pointer: Res<PointerMode>,
    scroll: Res<ScrollOffset>,
    mut target: ResMut<Target>,
) {
    if pointer.touch_primary {
        moved.clear();
        return;
    }
    let Some(latest) = moved.read().last() else {
        return;
    };
    target.position = latest.position + scroll.0;
    target.pointer_seen = true;
}

/// Stops redrawing once the page has scrolled a full viewport past the canvas.
pub fn gate_canvas(
    scroll: Res<ScrollOffset>,
    viewport: Res<Viewport>,
    mut gate: ResMut<CanvasGate>,
) {
    let enabled = scroll.0.y <= viewport.height;
    if gate.enabled != enabled {
        gate.enabled = enabled;
        debug!("Starfield drawing {}", if enabled { "resumed" } else { "paused" });
    }
}
