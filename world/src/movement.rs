//! Shared movement and collection validation.
//!
//! Creatures and the player validate moves with the same algorithm and
//! differ only in terrain compatibility and move distance. A legal move is
//! a straight line or a single L-bend: of the two candidate paths between
//! origin and target, at least one must be fully traversable.

use crate::{log::Event, Scenario};
use wildgrid_core::{Coordinate, Entity, EntityId, SimError, Terrain};

/// Enumerates every coordinate within `radius` Manhattan distance of
/// `origin`, origin included. Callers filter for grid bounds; this helper
/// deliberately does not.
pub(crate) fn range(radius: u32, origin: Coordinate) -> Vec<Coordinate> {
    let reach = radius as i32;
    let mut cells = Vec::new();
    for dx in -reach..=reach {
        for dy in -reach..=reach {
            let candidate = origin.translate(dx, dy);
            if origin.manhattan_distance(candidate) <= radius {
                cells.push(candidate);
            }
        }
    }
    cells
}

/// Builds the two candidate L-paths from `from` to `to`, listing the
/// intermediate and final cells only. The first path runs along the origin
/// row before turning; the second runs along the origin column first.
fn l_paths(from: Coordinate, to: Coordinate) -> (Vec<Coordinate>, Vec<Coordinate>) {
    let mut row_first = Vec::new();
    let mut column_first = Vec::new();

    let step_x = (to.x() - from.x()).signum();
    let mut x = from.x();
    while x != to.x() {
        x += step_x;
        row_first.push(Coordinate::new(x, from.y()));
        column_first.push(Coordinate::new(x, to.y()));
    }

    let step_y = (to.y() - from.y()).signum();
    let mut y = from.y();
    while y != to.y() {
        y += step_y;
        row_first.push(Coordinate::new(to.x(), y));
        column_first.push(Coordinate::new(from.x(), y));
    }

    (row_first, column_first)
}

fn terrain_allows(mover: &Entity, terrain: Terrain) -> bool {
    match mover {
        Entity::Creature { habitat, .. } => habitat.allows(terrain),
        Entity::Player { .. } => !matches!(terrain, Terrain::Water | Terrain::Peak),
        Entity::Plant { .. } => false,
    }
}

/// A path is traversable iff it is non-empty and every cell on it is in
/// bounds, unoccupied, and terrain-compatible with the mover.
fn path_is_valid(scenario: &Scenario, mover: &Entity, path: &[Coordinate]) -> bool {
    if path.is_empty() {
        return false;
    }
    path.iter().all(|cell| {
        scenario.in_bounds(*cell)
            && scenario.occupant_at(*cell).is_none()
            && scenario
                .terrain_at(*cell)
                .is_some_and(|terrain| terrain_allows(mover, terrain))
    })
}

/// Determines whether the entity may move to `target` this turn.
///
/// # Errors
///
/// Returns [`SimError::OutOfBounds`] when `target` lies outside the grid;
/// enumeration call sites discard that case rather than surface it.
pub(crate) fn can_move(
    scenario: &Scenario,
    id: EntityId,
    target: Coordinate,
) -> Result<bool, SimError> {
    let Some(mover) = scenario.entity(id) else {
        return Ok(false);
    };
    if !scenario.in_bounds(target) {
        return Err(SimError::OutOfBounds(target));
    }
    let distance = mover.coordinate().manhattan_distance(target);
    let (row_first, column_first) = l_paths(mover.coordinate(), target);
    let reachable =
        path_is_valid(scenario, mover, &row_first) || path_is_valid(scenario, mover, &column_first);
    Ok(reachable && distance <= mover.move_distance())
}

/// Every coordinate in the entity's move range that `can_move` accepts.
/// Out-of-bounds candidates fail with a squashed error and are omitted.
pub(crate) fn possible_moves(scenario: &Scenario, id: EntityId) -> Vec<Coordinate> {
    let Some(mover) = scenario.entity(id) else {
        return Vec::new();
    };
    range(mover.move_distance(), mover.coordinate())
        .into_iter()
        .filter(|candidate| matches!(can_move(scenario, id, *candidate), Ok(true)))
        .collect()
}

/// Moves the entity to `target` without re-validating; callers establish
/// legality through `can_move`/`possible_moves` first.
///
/// A move event capturing the pre-move position is logged first. The
/// player then attempts to collect the destination occupant before tiles
/// are swapped; collection failures are expected there and suppressed.
pub(crate) fn move_entity(scenario: &mut Scenario, id: EntityId, target: Coordinate) {
    let Some(snapshot) = scenario.entity(id).cloned() else {
        return;
    };
    let origin = snapshot.coordinate();
    let is_player = matches!(snapshot, Entity::Player { .. });
    scenario.log_mut().record(Event::Moved {
        actor: snapshot,
        from: origin,
        to: target,
    });
    if is_player {
        let _ = collect(scenario, target);
    }
    scenario.vacate(origin);
    scenario.occupy(id, target);
    if let Some(mover) = scenario.entity_mut(id) {
        mover.set_coordinate(target);
    }
}

/// Neighbouring in-bounds tiles the player may collect from: occupied by a
/// creature or plant, any terrain.
pub(crate) fn possible_collections(scenario: &Scenario) -> Vec<Coordinate> {
    let Some(player_id) = scenario.player_id() else {
        return Vec::new();
    };
    let Some(player) = scenario.entity(player_id) else {
        return Vec::new();
    };
    range(1, player.coordinate())
        .into_iter()
        .filter(|candidate| {
            scenario
                .occupant_at(*candidate)
                .and_then(|occupant| scenario.entity(occupant))
                .is_some_and(Entity::is_collectable)
        })
        .collect()
}

/// Collects whatever occupies `coordinate` on the player's behalf.
///
/// Emptiness is probed through the raw row-major index before the bounds
/// check, preserving the long-standing lookup order: an out-of-bounds
/// coordinate whose raw index aliases an occupied slot reports
/// `OutOfBounds`, any other out-of-bounds coordinate reports
/// `NoSuchEntity`.
///
/// # Errors
///
/// [`SimError::NoSuchEntity`] for an empty tile, [`SimError::OutOfBounds`]
/// for an out-of-bounds coordinate over an occupied aliased slot.
pub(crate) fn collect(scenario: &mut Scenario, coordinate: Coordinate) -> Result<(), SimError> {
    let Some(occupant) = scenario.raw_occupant_at(coordinate) else {
        return Err(SimError::NoSuchEntity(coordinate));
    };
    if !scenario.in_bounds(coordinate) {
        return Err(SimError::OutOfBounds(coordinate));
    }
    let Some(target) = scenario.entity(occupant).cloned() else {
        return Err(SimError::NoSuchEntity(coordinate));
    };
    if !target.is_collectable() {
        return Ok(());
    }
    let Some(player_id) = scenario.player_id() else {
        return Ok(());
    };
    let Some(collector) = scenario.entity(player_id).cloned() else {
        return Ok(());
    };
    let site = target.coordinate();
    scenario.log_mut().record(Event::Collected {
        actor: collector,
        target,
        at: site,
    });
    scenario.remove_entity(occupant);
    Ok(())
}
