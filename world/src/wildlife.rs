//! Autonomous wildlife scheduler.
//!
//! Runs once per ended turn and relocates creatures using the scenario's
//! seeded random source. The draw sequence is load-bearing for replay:
//! with no creatures registered nothing is drawn at all; otherwise one
//! draw fixes the iteration count, each iteration draws one roster pick,
//! and a destination is drawn only when a pick has two or more candidate
//! moves.

use crate::{movement, Scenario};

/// Advances every-creature scheduling for one ended turn.
///
/// Draw discipline, in order:
/// 1. `n` in `[0, roster_len)`; the loop below runs `n + 1` times.
/// 2. Per iteration, a roster pick in `[0, roster_len)`.
/// 3. Zero candidate moves: nothing happens, no further draw. Exactly one
///    candidate: the creature takes it, no further draw. Otherwise one
///    draw in `[0, candidate_count)` selects the destination.
pub(crate) fn advance(scenario: &mut Scenario) {
    let roster_len = scenario.creature_count();
    if roster_len == 0 {
        return;
    }
    let rounds = scenario.draw_index(roster_len);
    for _ in 0..=rounds {
        let pick = scenario.draw_index(roster_len);
        let Some(id) = scenario.creature_at(pick) else {
            continue;
        };
        let candidates = movement::possible_moves(scenario, id);
        let destination = match candidates.len() {
            0 => continue,
            1 => candidates[0],
            count => candidates[scenario.draw_index(count)],
        };
        movement::move_entity(scenario, id, destination);
    }
}

#[cfg(test)]
mod tests {
    use super::advance;
    use crate::{apply, movement, query, Scenario};
    use wildgrid_core::{Command, Coordinate, Entity, Habitat, SizeClass, Terrain};

    fn scenario_with_terrain(rows: &[&str], seed: i64) -> Scenario {
        let width = rows[0].len() as i32;
        let height = rows.len() as i32;
        let mut scenario = Scenario::new("Wildlife Range", width, height, seed).expect("scenario");
        let tiles = rows
            .concat()
            .chars()
            .map(|encoded| Terrain::decode(encoded).expect("terrain"))
            .collect();
        scenario.set_terrain(tiles).expect("layout");
        scenario
    }

    fn creature(size: SizeClass, x: i32, y: i32) -> Entity {
        Entity::Creature {
            size,
            coordinate: Coordinate::new(x, y),
            habitat: Habitat::Plain,
        }
    }

    fn populated(seed: i64) -> Scenario {
        let mut scenario =
            scenario_with_terrain(&["PPPPP", "PPPPP", "PPPPP", "PPPPP", "PPPPP"], seed);
        let _ = scenario
            .place_entity(creature(SizeClass::Tiny, 0, 0))
            .expect("place");
        let _ = scenario
            .place_entity(creature(SizeClass::Small, 2, 2))
            .expect("place");
        let _ = scenario
            .place_entity(creature(SizeClass::Large, 4, 4))
            .expect("place");
        scenario
    }

    #[test]
    fn equal_seeds_replay_identically() {
        let mut first = populated(41);
        let mut second = populated(41);
        for _ in 0..5 {
            apply(&mut first, Command::EndTurn).expect("end turn");
            apply(&mut second, Command::EndTurn).expect("end turn");
        }
        assert_eq!(query::entity_view(&first), query::entity_view(&second));
        assert_eq!(query::log_text(&first), query::log_text(&second));
    }

    #[test]
    fn advance_follows_the_documented_draw_sequence() {
        let mut scheduled = populated(7);
        let mut manual = scheduled.clone();

        advance(&mut scheduled);

        let roster = query::creatures(&manual);
        let rounds = manual.draw_index(roster.len());
        for _ in 0..=rounds {
            let pick = manual.draw_index(roster.len());
            let id = roster[pick];
            let candidates = movement::possible_moves(&manual, id);
            let destination = match candidates.len() {
                0 => continue,
                1 => candidates[0],
                count => candidates[manual.draw_index(count)],
            };
            movement::move_entity(&mut manual, id, destination);
        }

        assert_eq!(query::entity_view(&scheduled), query::entity_view(&manual));
        // Both sources must now be in the same position in the stream.
        assert_eq!(scheduled.draw_index(1000), manual.draw_index(1000));
    }

    #[test]
    fn boxed_in_creatures_stay_put_without_a_destination_draw() {
        // The lone plain tile is surrounded by water, so the creature has
        // zero candidates every iteration.
        let mut scheduled =
            scenario_with_terrain(&["PWWWW", "WWWWW", "WWWWW", "WWWWW", "WWWWW"], 3);
        let _ = scheduled
            .place_entity(creature(SizeClass::Tiny, 0, 0))
            .expect("place");
        let mut control = scheduled.clone();

        advance(&mut scheduled);

        assert_eq!(query::log_text(&scheduled), "");
        let trapped = query::creatures(&scheduled)[0];
        assert_eq!(
            query::entity(&scheduled, trapped).expect("creature").coordinate(),
            Coordinate::new(0, 0)
        );

        // Replicate the draws by hand: the round count plus one pick per
        // iteration, nothing else.
        let rounds = control.draw_index(1);
        for _ in 0..=rounds {
            let _ = control.draw_index(1);
        }
        assert_eq!(scheduled.draw_index(1000), control.draw_index(1000));
    }

    #[test]
    fn a_single_candidate_is_taken_without_a_destination_draw() {
        // Two plain tiles in a water arena: the creature shuttles between
        // them, always with exactly one legal destination.
        let mut scheduled =
            scenario_with_terrain(&["PPWWW", "WWWWW", "WWWWW", "WWWWW", "WWWWW"], 11);
        let _ = scheduled
            .place_entity(creature(SizeClass::Tiny, 0, 0))
            .expect("place");
        let mut control = scheduled.clone();

        advance(&mut scheduled);

        let rounds = control.draw_index(1);
        for _ in 0..=rounds {
            let _ = control.draw_index(1);
        }
        assert_eq!(scheduled.draw_index(1000), control.draw_index(1000));
        assert_eq!(query::stats(&scheduled).tiles_traversed, rounds as u32 + 1);
    }

    #[test]
    fn advance_moves_only_registered_creatures() {
        let mut scenario = populated(13);
        let _ = scenario
            .place_entity(Entity::Plant {
                size: SizeClass::Huge,
                coordinate: Coordinate::new(1, 3),
            })
            .expect("place");
        let _ = scenario
            .place_entity(Entity::Player {
                coordinate: Coordinate::new(3, 1),
                name: "Dave".to_string(),
            })
            .expect("place");

        advance(&mut scenario);

        for snapshot in query::entity_view(&scenario) {
            match snapshot.entity {
                Entity::Plant { coordinate, .. } => {
                    assert_eq!(coordinate, Coordinate::new(1, 3));
                }
                Entity::Player { coordinate, .. } => {
                    assert_eq!(coordinate, Coordinate::new(3, 1));
                }
                Entity::Creature { .. } => {}
            }
        }
    }
}
