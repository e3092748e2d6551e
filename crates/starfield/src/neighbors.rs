use bevy::math::Vec2;

/// Finds, for every point, the `k` other points closest to it by squared distance.
///
/// Each list holds `min(k, n - 1)` indices ordered nearest first. A later point
/// only displaces a kept one when strictly closer, so ties go to whichever point
/// comes first in `points`. Runs once per grid, hence the all-pairs scan.
pub fn nearest_neighbors(points: &[Vec2], k: usize) -> Vec<Vec<usize>> {
    points
        .iter()
        .enumerate()
        .map(|(index, &point)| closest_to(points, index, point, k))
        .collect()
}

fn closest_to(points: &[Vec2], skip: usize, point: Vec2, k: usize) -> Vec<usize> {
    let mut closest: Vec<(f32, usize)> = Vec::with_capacity(k + 1);

    for (candidate, other) in points.iter().enumerate() {
        if candidate == skip {
            continue;
        }
        let distance = point.distance_squared(*other);
        if distance.is_nan() {
            continue;
        }
        let slot = closest.partition_point(|&(kept, _)| kept <= distance);
        if slot < k {
            closest.insert(slot, (distance, candidate));
            closest.truncate(k);
        }
    }

    closest.into_iter().map(|(_, index)| index).collect()
}
