use bevy::log::warn;
use bevy::math::Vec2;

/// Scatters one jittered origin per cell of a `granularity`² grid covering the viewport.
///
/// Steps are accumulated in `f64`, the precision of a browser canvas script,
/// so an axis gets the same 20 or 21 columns the page itself would lay out
/// when the accumulated step falls just short of the edge. Origins are
/// returned column by column.
pub fn scatter_origins(
    width: f32,
    height: f32,
    granularity: u32,
    rng: &mut fastrand::Rng,
) -> Vec<Vec2> {
    let (width, height) = (f64::from(width), f64::from(height));
    let step_x = width / f64::from(granularity);
    let step_y = height / f64::from(granularity);

    // A step that is zero or NaN never reaches the edge
    if granularity == 0
        || !(width.is_finite() && height.is_finite() && step_x > 0.0 && step_y > 0.0)
    {
        warn!("Skipping star grid for a {width}x{height} viewport");
        return Vec::new();
    }

    let mut origins = Vec::with_capacity((granularity as usize + 1).pow(2));

    let mut x = 0.0;
    while x < width {
        let mut y = 0.0;
        while y < height {
            origins.push(Vec2::new(
                rng.f64().mul_add(step_x, x) as f32,
                rng.f64().mul_add(step_y, y) as f32,
            ));
            y += step_y;
        }
        x += step_x;
    }

    origins
}
