use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{WindowMode, WindowResolution};

#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

// Size used by native builds, the browser canvas follows its parent instead
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

/// Settings for the window (or browser canvas) an app draws into.
#[derive(Debug, Clone)]
pub struct CanvasSettings {
    pub title: String,
    /// CSS selector of the canvas element on wasm
    pub selector: String,
    pub clear_color: Color,
}

impl CanvasSettings {
    pub fn new(title: &str, selector: &str) -> Self {
        Self {
            title: title.to_string(),
            selector: selector.to_string(),
            clear_color: Color::BLACK,
        }
    }
}

// Creates a Bevy app whose primary window fills its canvas.
// Every app in the workspace goes through this so native and wasm builds agree.
pub fn get_default_app(settings: &CanvasSettings) -> App {
    let mut app = App::new();

    // Nothing is loaded from disk, but wasm builds would otherwise request .meta files
    let asset_plugin = bevy::asset::AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: settings.title.clone(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some(settings.selector.clone()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Keeps scrolling, F5, Ctrl+R etc. working on the host page.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL
                    | bevy::render::settings::Backends::PRIMARY,
            ),
            power_preference: bevy::render::settings::PowerPreference::LowPower,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin)
            .set(window_plugin)
            .set(render_plugin),
    );

    // Paces frames to the display, which also idles the app when the page is hidden.
    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(settings.clear_color));

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, handle_browser_resize);

    app
}
