#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative scenario state management for Wild Grid.
//!
//! A [`Scenario`] owns the tile arena, the occupancy grid, the entity table,
//! the seeded random source, and the event log. Adapters mutate it only
//! through [`apply`] and read it only through the [`query`] module; the
//! wildlife scheduler and movement validation live in submodules so every
//! rule that touches scenario internals stays in this crate.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use wildgrid_core::{Command, Coordinate, Entity, EntityId, SimError, Terrain};

pub mod codec;
mod log;
mod movement;
mod session;
mod wildlife;

pub use log::{Event, EventLog, LogStats};
pub use session::Session;

/// The minimum width and height of a scenario grid.
pub const MIN_SIZE: i32 = 5;
/// The maximum width and height of a scenario grid.
pub const MAX_SIZE: i32 = 15;

/// Represents one authoritative simulation world: a bounded tile grid, its
/// inhabitants, a reproducible random source, and the audit log of every
/// state change.
#[derive(Clone, Debug)]
pub struct Scenario {
    name: String,
    width: i32,
    height: i32,
    seed: i64,
    tiles: Vec<Terrain>,
    occupancy: Vec<Option<EntityId>>,
    entities: BTreeMap<EntityId, Entity>,
    creatures: Vec<EntityId>,
    rng: ChaCha8Rng,
    log: EventLog,
    next_id: u32,
}

impl Scenario {
    /// Creates a new scenario with an all-[`Terrain::Plain`] grid, an empty
    /// entity table, and a random source seeded from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IllegalConfiguration`] when either dimension
    /// falls outside `[MIN_SIZE, MAX_SIZE]` or the seed is negative.
    pub fn new(
        name: impl Into<String>,
        width: i32,
        height: i32,
        seed: i64,
    ) -> Result<Scenario, SimError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&width) {
            return Err(SimError::IllegalConfiguration(format!(
                "width {width} must satisfy {MIN_SIZE} <= width <= {MAX_SIZE}"
            )));
        }
        if !(MIN_SIZE..=MAX_SIZE).contains(&height) {
            return Err(SimError::IllegalConfiguration(format!(
                "height {height} must satisfy {MIN_SIZE} <= height <= {MAX_SIZE}"
            )));
        }
        if seed < 0 {
            return Err(SimError::IllegalConfiguration(format!(
                "seed {seed} must not be negative"
            )));
        }
        let capacity = (width * height) as usize;
        Ok(Scenario {
            name: name.into(),
            width,
            height,
            seed,
            tiles: vec![Terrain::Plain; capacity],
            occupancy: vec![None; capacity],
            entities: BTreeMap::new(),
            creatures: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
            log: EventLog::new(),
            next_id: 0,
        })
    }

    /// Name of this scenario.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the tile grid.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the tile grid.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Seed the random source was initialised from.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    /// Total number of tiles in the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Read-only access to the scenario's event log.
    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// Replaces the terrain layout of the whole grid.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IllegalConfiguration`] when the layout length
    /// does not match the grid dimensions.
    pub fn set_terrain(&mut self, tiles: Vec<Terrain>) -> Result<(), SimError> {
        if tiles.len() != self.size() {
            return Err(SimError::IllegalConfiguration(format!(
                "terrain layout of {} tiles does not fit a {}x{} grid",
                tiles.len(),
                self.width,
                self.height
            )));
        }
        self.tiles = tiles;
        Ok(())
    }

    /// Places a new entity on its coordinate's tile and registers creatures
    /// with the wildlife roster in placement order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfBounds`] for a coordinate outside the grid
    /// and [`SimError::IllegalConfiguration`] when the tile is already
    /// occupied.
    pub fn place_entity(&mut self, entity: Entity) -> Result<EntityId, SimError> {
        let coordinate = entity.coordinate();
        let index = self
            .index(coordinate)
            .ok_or(SimError::OutOfBounds(coordinate))?;
        if self.occupancy[index].is_some() {
            return Err(SimError::IllegalConfiguration(format!(
                "tile {coordinate} is already occupied"
            )));
        }
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.occupancy[index] = Some(id);
        if matches!(entity, Entity::Creature { .. }) {
            self.creatures.push(id);
        }
        let _ = self.entities.insert(id, entity);
        Ok(id)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, coordinate: Coordinate) -> bool {
        coordinate.x() >= 0
            && coordinate.x() < self.width
            && coordinate.y() >= 0
            && coordinate.y() < self.height
    }

    /// Terrain of the tile at the coordinate, if in bounds.
    #[must_use]
    pub fn terrain_at(&self, coordinate: Coordinate) -> Option<Terrain> {
        self.index(coordinate).map(|index| self.tiles[index])
    }

    /// Occupant of the tile at the coordinate, if in bounds and occupied.
    #[must_use]
    pub fn occupant_at(&self, coordinate: Coordinate) -> Option<EntityId> {
        self.index(coordinate).and_then(|index| self.occupancy[index])
    }

    /// Looks up an entity by identifier.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn index(&self, coordinate: Coordinate) -> Option<usize> {
        if self.in_bounds(coordinate) {
            Some((coordinate.y() * self.width + coordinate.x()) as usize)
        } else {
            None
        }
    }

    /// Row-major index without per-axis bounds checks. The collect quirk
    /// depends on this: an out-of-bounds coordinate may alias an in-bounds
    /// slot when its raw index still lands inside the arena.
    fn raw_index(&self, coordinate: Coordinate) -> Option<usize> {
        let raw = i64::from(coordinate.y()) * i64::from(self.width) + i64::from(coordinate.x());
        if raw >= 0 && (raw as usize) < self.size() {
            Some(raw as usize)
        } else {
            None
        }
    }

    fn raw_occupant_at(&self, coordinate: Coordinate) -> Option<EntityId> {
        self.raw_index(coordinate).and_then(|index| self.occupancy[index])
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    fn occupy(&mut self, id: EntityId, coordinate: Coordinate) {
        if let Some(index) = self.index(coordinate) {
            self.occupancy[index] = Some(id);
        }
    }

    fn vacate(&mut self, coordinate: Coordinate) {
        if let Some(index) = self.index(coordinate) {
            self.occupancy[index] = None;
        }
    }

    /// Removes an entity from the table, its tile, and the wildlife roster.
    /// Past events keep their own snapshots of removed entities.
    fn remove_entity(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.remove(&id) {
            self.vacate(entity.coordinate());
        }
        self.creatures.retain(|registered| *registered != id);
    }

    fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    fn creature_at(&self, position: usize) -> Option<EntityId> {
        self.creatures.get(position).copied()
    }

    fn player_id(&self) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, entity)| matches!(entity, Entity::Player { .. }))
            .map(|(id, _)| *id)
    }

    /// Draws one uniform index in `[0, bound)` from the scenario's seeded
    /// random source. Every draw in the simulation routes through here, so
    /// the draw sequence is exactly the documented scheduler sequence.
    fn draw_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "draw_index requires a non-empty range");
        self.rng.gen_range(0..bound)
    }
}

/// Applies the provided command to the scenario, mutating state
/// deterministically.
///
/// Movement commands are trusted: callers validate destinations through
/// [`query::possible_moves`] first and `MoveEntity` does not re-validate.
///
/// # Errors
///
/// `Collect` surfaces [`SimError::NoSuchEntity`] and
/// [`SimError::OutOfBounds`]; the other commands never fail.
pub fn apply(scenario: &mut Scenario, command: Command) -> Result<(), SimError> {
    match command {
        Command::MoveEntity { id, target } => {
            movement::move_entity(scenario, id, target);
            Ok(())
        }
        Command::Collect { target } => movement::collect(scenario, target),
        Command::EndTurn => {
            wildlife::advance(scenario);
            Ok(())
        }
    }
}

/// Query functions that provide read-only access to scenario state.
pub mod query {
    use super::{movement, LogStats, Scenario};
    use wildgrid_core::{Coordinate, Entity, EntityId, Terrain};

    /// Enumerates every destination the entity may legally move to this
    /// turn. Out-of-bounds candidates are filtered, not reported.
    #[must_use]
    pub fn possible_moves(scenario: &Scenario, id: EntityId) -> Vec<Coordinate> {
        movement::possible_moves(scenario, id)
    }

    /// Enumerates the neighbouring tiles the player may collect from.
    #[must_use]
    pub fn possible_collections(scenario: &Scenario) -> Vec<Coordinate> {
        movement::possible_collections(scenario)
    }

    /// Captures a read-only view of the tile grid.
    #[must_use]
    pub fn tile_view(scenario: &Scenario) -> TileView<'_> {
        TileView { scenario }
    }

    /// Looks up a single entity by identifier.
    #[must_use]
    pub fn entity(scenario: &Scenario, id: EntityId) -> Option<&Entity> {
        scenario.entity(id)
    }

    /// Captures snapshots of every entity, ordered by identifier.
    #[must_use]
    pub fn entity_view(scenario: &Scenario) -> Vec<EntitySnapshot> {
        scenario
            .entities
            .iter()
            .map(|(id, entity)| EntitySnapshot {
                id: *id,
                entity: entity.clone(),
            })
            .collect()
    }

    /// The player entity, if the scenario has one.
    #[must_use]
    pub fn player(scenario: &Scenario) -> Option<(EntityId, &Entity)> {
        let id = scenario.player_id()?;
        scenario.entity(id).map(|entity| (id, entity))
    }

    /// Identifiers of the wildlife roster in registration order.
    #[must_use]
    pub fn creatures(scenario: &Scenario) -> Vec<EntityId> {
        scenario.creatures.clone()
    }

    /// Renders the full event log.
    #[must_use]
    pub fn log_text(scenario: &Scenario) -> String {
        scenario.log().render()
    }

    /// Running statistics derived from the event log.
    #[must_use]
    pub fn stats(scenario: &Scenario) -> LogStats {
        scenario.log().stats()
    }

    /// Renders the human summary block: name, dimensions, entity count.
    #[must_use]
    pub fn summary(scenario: &Scenario) -> String {
        format!(
            "{}\nWidth: {}, Height: {}\nEntities: {}",
            scenario.name(),
            scenario.width(),
            scenario.height(),
            scenario.entities.len()
        )
    }

    /// Immutable snapshot of one entity used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EntitySnapshot {
        /// Identifier allocated by the scenario.
        pub id: EntityId,
        /// Copy of the entity's state at capture time.
        pub entity: Entity,
    }

    /// Read-only view into the tile grid and its occupancy.
    #[derive(Clone, Copy, Debug)]
    pub struct TileView<'a> {
        scenario: &'a Scenario,
    }

    impl TileView<'_> {
        /// Terrain of the tile at the coordinate, if in bounds.
        #[must_use]
        pub fn terrain(&self, coordinate: Coordinate) -> Option<Terrain> {
            self.scenario.terrain_at(coordinate)
        }

        /// Entity occupying the coordinate, if any.
        #[must_use]
        pub fn occupant(&self, coordinate: Coordinate) -> Option<EntityId> {
            self.scenario.occupant_at(coordinate)
        }

        /// Reports whether the tile is free for traversal.
        #[must_use]
        pub fn is_free(&self, coordinate: Coordinate) -> bool {
            self.scenario.occupant_at(coordinate).is_none()
        }

        /// Width and height of the underlying grid.
        #[must_use]
        pub const fn dimensions(&self) -> (i32, i32) {
            (self.scenario.width(), self.scenario.height())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, Scenario};
    use wildgrid_core::{Command, Coordinate, Entity, Habitat, SimError, SizeClass, Terrain};

    fn plain_scenario() -> Scenario {
        Scenario::new("Test Range", 5, 5, 0).expect("valid scenario")
    }

    #[test]
    fn construction_enforces_dimension_bounds() {
        assert!(matches!(
            Scenario::new("tiny", 4, 5, 0),
            Err(SimError::IllegalConfiguration(_))
        ));
        assert!(matches!(
            Scenario::new("vast", 5, 16, 0),
            Err(SimError::IllegalConfiguration(_))
        ));
        assert!(Scenario::new("edge", 15, 15, 0).is_ok());
    }

    #[test]
    fn construction_rejects_negative_seed() {
        assert!(matches!(
            Scenario::new("unlucky", 5, 5, -3),
            Err(SimError::IllegalConfiguration(_))
        ));
    }

    #[test]
    fn set_terrain_requires_matching_length() {
        let mut scenario = plain_scenario();
        assert!(matches!(
            scenario.set_terrain(vec![Terrain::Water; 24]),
            Err(SimError::IllegalConfiguration(_))
        ));
        assert!(scenario.set_terrain(vec![Terrain::Shore; 25]).is_ok());
        assert_eq!(scenario.terrain_at(Coordinate::new(2, 2)), Some(Terrain::Shore));
    }

    #[test]
    fn place_entity_refuses_shared_tiles() {
        let mut scenario = plain_scenario();
        let plant = Entity::Plant {
            size: SizeClass::Tiny,
            coordinate: Coordinate::new(1, 1),
        };
        assert!(scenario.place_entity(plant.clone()).is_ok());
        assert!(matches!(
            scenario.place_entity(plant),
            Err(SimError::IllegalConfiguration(_))
        ));
    }

    #[test]
    fn place_entity_refuses_out_of_bounds_coordinates() {
        let mut scenario = plain_scenario();
        let plant = Entity::Plant {
            size: SizeClass::Tiny,
            coordinate: Coordinate::new(9, 0),
        };
        assert!(matches!(
            scenario.place_entity(plant),
            Err(SimError::OutOfBounds(_))
        ));
    }

    #[test]
    fn creatures_register_in_placement_order() {
        let mut scenario = plain_scenario();
        let first = scenario
            .place_entity(Entity::Creature {
                size: SizeClass::Tiny,
                coordinate: Coordinate::new(0, 0),
                habitat: Habitat::Plain,
            })
            .expect("place");
        let second = scenario
            .place_entity(Entity::Creature {
                size: SizeClass::Huge,
                coordinate: Coordinate::new(4, 4),
                habitat: Habitat::Plain,
            })
            .expect("place");
        assert_eq!(query::creatures(&scenario), vec![first, second]);
    }

    #[test]
    fn end_turn_without_creatures_consumes_no_draws() {
        let mut idle = plain_scenario();
        let mut control = plain_scenario();

        apply(&mut idle, Command::EndTurn).expect("end turn");

        assert_eq!(idle.draw_index(1000), control.draw_index(1000));
    }

    #[test]
    fn summary_counts_entities() {
        let mut scenario = plain_scenario();
        let _ = scenario
            .place_entity(Entity::Player {
                coordinate: Coordinate::new(2, 2),
                name: "Ada".to_string(),
            })
            .expect("place");
        assert_eq!(
            query::summary(&scenario),
            "Test Range\nWidth: 5, Height: 5\nEntities: 1"
        );
    }
}
