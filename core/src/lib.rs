#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wild Grid engine.
//!
//! This crate defines the value types that connect the authoritative
//! scenario world, the autonomous wildlife scheduler, and the adapters.
//! Adapters submit [`Command`] values describing desired mutations, the
//! world executes those commands via its `apply` entry point, and every
//! resulting state change is recorded in the scenario's event log. All
//! types here are plain values with structural equality; mutable world
//! state lives exclusively in the world crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance a player may travel in a single turn, independent of the
/// [`SizeClass`] table.
pub const PLAYER_MOVE_DISTANCE: u32 = 4;

/// Location of a single grid tile expressed as signed x and y coordinates.
///
/// Coordinates may lie outside any particular scenario's bounds; range
/// enumeration deliberately produces out-of-bounds candidates which the
/// world filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate at the provided position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal position, increasing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical position, increasing downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Component-wise difference from this coordinate to `other`.
    #[must_use]
    pub const fn offset(self, other: Coordinate) -> Coordinate {
        Coordinate::new(other.x - self.x, other.y - self.y)
    }

    /// Returns this coordinate translated by the given tile amounts.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Coordinate {
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// Returns the machine-readable `x,y` encoding used by the save format.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parses a coordinate from its `x,y` encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BadSave`] unless the input is exactly two
    /// comma-separated integers. Trailing fields count: `"1,2,"` has three
    /// fields and is rejected.
    pub fn decode(encoded: &str) -> Result<Coordinate, SimError> {
        let fields: Vec<&str> = encoded.split(',').collect();
        let [x, y] = fields.as_slice() else {
            return Err(SimError::BadSave(format!(
                "coordinate `{encoded}` must have exactly two components"
            )));
        };
        let parse = |component: &str| {
            component.parse::<i32>().map_err(|_| {
                SimError::BadSave(format!("coordinate component `{component}` is not an integer"))
            })
        };
        Ok(Coordinate::new(parse(x)?, parse(y)?))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Kind of terrain occupying a tile.
///
/// Terrain restricts which entities may inhabit or traverse a tile; the
/// rules live with the movement validation in the world crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground, traversable by land life and the player.
    Plain,
    /// Open water, exclusive to water-dwelling creatures.
    Water,
    /// Transitional sandy ground between plain and water.
    Shore,
    /// Rough high ground; creatures may cross it, the player may not.
    Peak,
}

impl Terrain {
    /// Returns the single-character encoding used by the save format.
    #[must_use]
    pub const fn encode(self) -> char {
        match self {
            Terrain::Plain => 'P',
            Terrain::Water => 'W',
            Terrain::Shore => 'S',
            Terrain::Peak => 'X',
        }
    }

    /// Parses a terrain kind from its single-character encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BadSave`] for any unknown character.
    pub fn decode(encoded: char) -> Result<Terrain, SimError> {
        match encoded {
            'P' => Ok(Terrain::Plain),
            'W' => Ok(Terrain::Water),
            'S' => Ok(Terrain::Shore),
            'X' => Ok(Terrain::Peak),
            other => Err(SimError::BadSave(format!("unknown terrain encoding `{other}`"))),
        }
    }
}

/// Physical size category of an entity.
///
/// Each class carries fixed collection points and a fixed per-turn move
/// distance; points ascend with size while move distance descends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeClass {
    /// Smaller than a breadbox.
    Tiny,
    /// Up to roughly human sized.
    Small,
    /// Larger than a human, smaller than a cart.
    Large,
    /// Anything larger still.
    Huge,
}

impl SizeClass {
    /// Points earned when an entity of this class is collected.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            SizeClass::Tiny => 1,
            SizeClass::Small => 2,
            SizeClass::Large => 3,
            SizeClass::Huge => 4,
        }
    }

    /// Maximum number of tiles an entity of this class traverses per turn.
    #[must_use]
    pub const fn move_distance(self) -> u32 {
        match self {
            SizeClass::Tiny => 4,
            SizeClass::Small => 3,
            SizeClass::Large => 2,
            SizeClass::Huge => 1,
        }
    }

    /// Returns the upper-case token used by the save format.
    #[must_use]
    pub const fn encode(self) -> &'static str {
        match self {
            SizeClass::Tiny => "TINY",
            SizeClass::Small => "SMALL",
            SizeClass::Large => "LARGE",
            SizeClass::Huge => "HUGE",
        }
    }

    /// Parses a size class from its upper-case token.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BadSave`] for any unknown token.
    pub fn decode(encoded: &str) -> Result<SizeClass, SimError> {
        match encoded {
            "TINY" => Ok(SizeClass::Tiny),
            "SMALL" => Ok(SizeClass::Small),
            "LARGE" => Ok(SizeClass::Large),
            "HUGE" => Ok(SizeClass::Huge),
            other => Err(SimError::BadSave(format!("unknown size class `{other}`"))),
        }
    }
}

/// Terrain family a creature is restricted to.
///
/// Closed by construction: a creature can only ever carry one of these two
/// values, so incompatible habitats are unrepresentable at runtime and the
/// save codec is the sole place that rejects unknown tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Habitat {
    /// Land life: any terrain except water.
    Plain,
    /// Water life: water terrain only.
    Water,
}

impl Habitat {
    /// Reports whether a creature of this habitat may stand on `terrain`.
    #[must_use]
    pub const fn allows(self, terrain: Terrain) -> bool {
        match self {
            Habitat::Water => matches!(terrain, Terrain::Water),
            Habitat::Plain => !matches!(terrain, Terrain::Water),
        }
    }

    /// Returns the upper-case token used by the save format.
    #[must_use]
    pub const fn encode(self) -> &'static str {
        match self {
            Habitat::Plain => "PLAIN",
            Habitat::Water => "WATER",
        }
    }

    /// Parses a habitat from its upper-case token.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BadSave`] for any unknown token.
    pub fn decode(encoded: &str) -> Result<Habitat, SimError> {
        match encoded {
            "PLAIN" => Ok(Habitat::Plain),
            "WATER" => Ok(Habitat::Water),
            other => Err(SimError::BadSave(format!("unknown habitat `{other}`"))),
        }
    }
}

/// Unique identifier assigned to an entity by its scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// An inhabitant of a scenario tile.
///
/// A closed set of variants so that every behaviour is an exhaustive match
/// rather than a runtime type test. Creatures move autonomously and can be
/// collected, plants only sit and wait to be collected, and the player is
/// the one entity that collects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    /// Mobile, collectable wildlife bound to a habitat.
    Creature {
        /// Physical size, governing points and move distance.
        size: SizeClass,
        /// Tile the creature currently occupies.
        coordinate: Coordinate,
        /// Terrain family the creature is restricted to.
        habitat: Habitat,
    },
    /// Stationary, collectable plant life.
    Plant {
        /// Physical size, governing points.
        size: SizeClass,
        /// Tile the plant occupies.
        coordinate: Coordinate,
    },
    /// The player-controlled collector.
    Player {
        /// Tile the player currently occupies.
        coordinate: Coordinate,
        /// Name chosen for the expedition.
        name: String,
    },
}

impl Entity {
    /// Tile this entity currently occupies.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        match self {
            Entity::Creature { coordinate, .. }
            | Entity::Plant { coordinate, .. }
            | Entity::Player { coordinate, .. } => *coordinate,
        }
    }

    /// Moves this entity's recorded position to the given coordinate.
    pub fn set_coordinate(&mut self, target: Coordinate) {
        match self {
            Entity::Creature { coordinate, .. }
            | Entity::Plant { coordinate, .. }
            | Entity::Player { coordinate, .. } => *coordinate = target,
        }
    }

    /// Size class of this entity. The player is fixed to [`SizeClass::Small`].
    #[must_use]
    pub const fn size(&self) -> SizeClass {
        match self {
            Entity::Creature { size, .. } | Entity::Plant { size, .. } => *size,
            Entity::Player { .. } => SizeClass::Small,
        }
    }

    /// Maximum tiles this entity traverses in one turn.
    ///
    /// The player's distance is fixed at [`PLAYER_MOVE_DISTANCE`] rather
    /// than drawn from the size table; plants never move.
    #[must_use]
    pub const fn move_distance(&self) -> u32 {
        match self {
            Entity::Creature { size, .. } => size.move_distance(),
            Entity::Plant { .. } => 0,
            Entity::Player { .. } => PLAYER_MOVE_DISTANCE,
        }
    }

    /// Points earned when this entity is collected.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.size().points()
    }

    /// Reports whether the player may collect this entity.
    #[must_use]
    pub const fn is_collectable(&self) -> bool {
        matches!(self, Entity::Creature { .. } | Entity::Plant { .. })
    }

    /// Human-readable species or plant name, or the player's chosen name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Entity::Creature { size, habitat, .. } => {
                let name = match (size, habitat) {
                    (SizeClass::Tiny, Habitat::Plain) => "Mouse",
                    (SizeClass::Tiny, Habitat::Water) => "Crab",
                    (SizeClass::Small, Habitat::Plain) => "Fox",
                    (SizeClass::Small, Habitat::Water) => "Fish",
                    (SizeClass::Large, Habitat::Plain) => "Horse",
                    (SizeClass::Large, Habitat::Water) => "Shark",
                    (SizeClass::Huge, Habitat::Plain) => "Elephant",
                    (SizeClass::Huge, Habitat::Water) => "Whale",
                };
                name.to_string()
            }
            Entity::Plant { size, .. } => {
                let name = match size {
                    SizeClass::Tiny => "Flower",
                    SizeClass::Small => "Shrub",
                    SizeClass::Large => "Sapling",
                    SizeClass::Huge => "Tree",
                };
                name.to_string()
            }
            Entity::Player { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for Entity {
    /// Renders `name [Kind] at (x,y)`, with creatures appending their
    /// habitat, e.g. `Fox [Creature] at (2,5) [PLAIN]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Entity::Creature { .. } => "Creature",
            Entity::Plant { .. } => "Plant",
            Entity::Player { .. } => "Player",
        };
        write!(f, "{} [{}] at {}", self.display_name(), kind, self.coordinate())?;
        if let Entity::Creature { habitat, .. } = self {
            write!(f, " [{}]", habitat.encode())?;
        }
        Ok(())
    }
}

/// Commands that express all permissible scenario mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves an entity to a destination already validated by the caller.
    MoveEntity {
        /// Identifier of the entity to move.
        id: EntityId,
        /// Destination tile.
        target: Coordinate,
    },
    /// Collects whatever occupies the target tile on the player's behalf.
    Collect {
        /// Tile to collect from.
        target: Coordinate,
    },
    /// Ends the player's turn, letting the wildlife scheduler run once.
    EndTurn,
}

/// Unified error for every failure the simulation surface reports.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// The coordinate lies outside the scenario's dimensions.
    #[error("coordinate {0} is outside the scenario bounds")]
    OutOfBounds(Coordinate),
    /// The addressed tile has no occupant.
    #[error("no entity occupies {0}")]
    NoSuchEntity(Coordinate),
    /// Save data was malformed or semantically invalid; nothing was loaded.
    #[error("malformed save data: {0}")]
    BadSave(String),
    /// A scenario was constructed with out-of-range dimensions or seed.
    #[error("illegal scenario configuration: {0}")]
    IllegalConfiguration(String),
}
