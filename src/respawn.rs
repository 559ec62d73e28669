//! Density-dependent resource regrowth.
//!
//! Every resource spawn point draws once per tick, whether or not it
//! currently holds a resource. The chance of regrowth is looked up from the
//! number of resources visible in a square around the point, so thinned-out
//! patches behave differently from dense ones and a patch harvested bare
//! can collapse for good under the default table.

use rand::Rng;

use crate::config::HarvestConfig;
use crate::grid::GridState;
use crate::reservation::Reservation;
use crate::types::{Cell, Position};

/// Resources within `radius` (Chebyshev) of `point`, the point included.
pub fn local_density(grid: &GridState, point: Position, radius: usize) -> usize {
    grid.window(point, radius, radius).count(Cell::Resource)
}

/// Draws regrowth for every spawn point and returns `Resource` reservations
/// for the ones that fire, in spawn-point order.
pub fn respawn<R: Rng>(
    grid: &GridState,
    config: &HarvestConfig,
    rng: &mut R,
) -> Vec<Reservation> {
    grid.resource_spawns()
        .iter()
        .filter_map(|&point| {
            let count = local_density(grid, point, config.respawn_radius);
            let probability = config.spawn_probability(count);
            let draw: f64 = rng.gen();
            (draw < probability).then(|| Reservation::resource(point))
        })
        .collect()
}
