//! Append-only event log and its derived statistics.
//!
//! Events snapshot the entities involved at record time, so the log stays
//! renderable after an entity moves on or is collected away.

use std::fmt;

use wildgrid_core::{Coordinate, Entity};

/// One recorded state change.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An entity relocated. `actor` is snapshotted before the move, so its
    /// coordinate equals `from`.
    Moved {
        /// Pre-move snapshot of the moving entity.
        actor: Entity,
        /// Origin tile.
        from: Coordinate,
        /// Destination tile.
        to: Coordinate,
    },
    /// The player collected a creature or plant.
    Collected {
        /// Snapshot of the collecting player.
        actor: Entity,
        /// Snapshot of the collected entity.
        target: Entity,
        /// Tile the target was collected from.
        at: Coordinate,
    },
}

const ENTRY_SEPARATOR: &str = "-----";

/// Ordered record of every move and collection, with running counters.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
    entities_collected: u32,
    points_earned: u32,
    tiles_traversed: u32,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> EventLog {
        EventLog::default()
    }

    /// Appends an event and folds it into the counters.
    pub fn record(&mut self, event: Event) {
        match &event {
            Event::Moved { from, to, .. } => {
                self.tiles_traversed += from.manhattan_distance(*to);
            }
            Event::Collected { target, .. } => {
                self.entities_collected += 1;
                self.points_earned += target.points();
            }
        }
        self.events.push(event);
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Copies the running counters out.
    #[must_use]
    pub const fn stats(&self) -> LogStats {
        LogStats {
            entities_collected: self.entities_collected,
            points_earned: self.points_earned,
            tiles_traversed: self.tiles_traversed,
        }
    }

    /// Renders every entry: the actor's description at its captured
    /// coordinate, the action line, then a separator. No trailing newline
    /// after the final separator.
    #[must_use]
    pub fn render(&self) -> String {
        let entries: Vec<String> = self.events.iter().map(render_entry).collect();
        entries.join("\n")
    }
}

fn render_entry(event: &Event) -> String {
    match event {
        Event::Moved { actor, to, .. } => {
            format!("{actor}\nMOVED TO {to}\n{ENTRY_SEPARATOR}")
        }
        Event::Collected { actor, target, .. } => {
            format!("{actor}\nCOLLECTED\n{target}\n{ENTRY_SEPARATOR}")
        }
    }
}

/// Snapshot of the log's running counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogStats {
    /// Number of entities the player has collected.
    pub entities_collected: u32,
    /// Sum of size-class points over collected entities.
    pub points_earned: u32,
    /// Sum of Manhattan distances over every recorded move.
    pub tiles_traversed: u32,
}

impl fmt::Display for LogStats {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Entities collected: {}\nPoints earned: {}\nTiles traversed: {}",
            self.entities_collected, self.points_earned, self.tiles_traversed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventLog};
    use wildgrid_core::{Coordinate, Entity, Habitat, SizeClass};

    fn fox(x: i32, y: i32) -> Entity {
        Entity::Creature {
            size: SizeClass::Small,
            coordinate: Coordinate::new(x, y),
            habitat: Habitat::Plain,
        }
    }

    fn dave(x: i32, y: i32) -> Entity {
        Entity::Player {
            coordinate: Coordinate::new(x, y),
            name: "Dave".to_string(),
        }
    }

    #[test]
    fn move_events_accumulate_manhattan_distance() {
        let mut log = EventLog::new();
        log.record(Event::Moved {
            actor: fox(0, 0),
            from: Coordinate::new(0, 0),
            to: Coordinate::new(3, 2),
        });
        assert_eq!(log.stats().tiles_traversed, 5);
        assert_eq!(log.stats().entities_collected, 0);
    }

    #[test]
    fn collect_events_accumulate_points_by_size() {
        let mut log = EventLog::new();
        log.record(Event::Collected {
            actor: dave(3, 5),
            target: Entity::Plant {
                size: SizeClass::Huge,
                coordinate: Coordinate::new(3, 4),
            },
            at: Coordinate::new(3, 4),
        });
        let stats = log.stats();
        assert_eq!(stats.entities_collected, 1);
        assert_eq!(stats.points_earned, 4);
        assert_eq!(stats.tiles_traversed, 0);
    }

    #[test]
    fn render_matches_the_documented_entry_shape() {
        let mut log = EventLog::new();
        log.record(Event::Moved {
            actor: fox(2, 5),
            from: Coordinate::new(2, 5),
            to: Coordinate::new(3, 5),
        });
        log.record(Event::Collected {
            actor: dave(3, 5),
            target: Entity::Plant {
                size: SizeClass::Small,
                coordinate: Coordinate::new(3, 4),
            },
            at: Coordinate::new(3, 4),
        });
        assert_eq!(
            log.render(),
            "Fox [Creature] at (2,5) [PLAIN]\n\
             MOVED TO (3,5)\n\
             -----\n\
             Dave [Player] at (3,5)\n\
             COLLECTED\n\
             Shrub [Plant] at (3,4)\n\
             -----"
        );
    }

    #[test]
    fn empty_log_renders_empty() {
        assert_eq!(EventLog::new().render(), "");
    }

    #[test]
    fn stats_display_one_counter_per_line() {
        let mut log = EventLog::new();
        log.record(Event::Moved {
            actor: fox(0, 0),
            from: Coordinate::new(0, 0),
            to: Coordinate::new(0, 4),
        });
        assert_eq!(
            log.stats().to_string(),
            "Entities collected: 0\nPoints earned: 0\nTiles traversed: 4"
        );
    }
}
