//! Save-format encoding and decoding.
//!
//! A save is plain text: the scenario name, three `Key:value` header
//! lines, the terrain map fenced by `=` separator lines, then one line
//! per occupied tile in increasing tile-index order. Decoding is strict
//! and order-dependent; every violation reports [`SimError::BadSave`]
//! with the offending line number.

use std::io::{Read, Write};

use crate::Scenario;
use wildgrid_core::{Coordinate, Entity, Habitat, SimError, SizeClass, Terrain};

/// Header values of `-1` stand for "unset" and fall back to this.
const DEFAULT_HEADER_VALUE: i32 = 5;

/// Renders the scenario in save format. No trailing newline; the entity
/// block is omitted entirely when the scenario is empty.
#[must_use]
pub fn encode(scenario: &Scenario) -> String {
    let separator = "=".repeat(scenario.width() as usize);
    let mut lines = vec![
        scenario.name().to_string(),
        format!("Width:{}", scenario.width()),
        format!("Height:{}", scenario.height()),
        format!("Seed:{}", scenario.seed()),
        separator.clone(),
    ];
    for y in 0..scenario.height() {
        let mut row = String::with_capacity(scenario.width() as usize);
        for x in 0..scenario.width() {
            let terrain = scenario
                .terrain_at(Coordinate::new(x, y))
                .unwrap_or(Terrain::Plain);
            row.push(terrain.encode());
        }
        lines.push(row);
    }
    lines.push(separator);
    for y in 0..scenario.height() {
        for x in 0..scenario.width() {
            let coordinate = Coordinate::new(x, y);
            let Some(id) = scenario.occupant_at(coordinate) else {
                continue;
            };
            if let Some(entity) = scenario.entity(id) {
                lines.push(encode_entity(entity));
            }
        }
    }
    lines.join("\n")
}

fn encode_entity(entity: &Entity) -> String {
    match entity {
        Entity::Player { coordinate, name } => {
            format!("Player-{}-{name}", coordinate.encode())
        }
        Entity::Creature {
            size,
            coordinate,
            habitat,
        } => format!(
            "Creature-{}-{}-{}",
            size.encode(),
            coordinate.encode(),
            habitat.encode()
        ),
        Entity::Plant { size, coordinate } => {
            format!("Plant-{}-{}", size.encode(), coordinate.encode())
        }
    }
}

/// Parses a scenario from save text.
///
/// # Errors
///
/// [`SimError::BadSave`] naming the first offending line; nothing is
/// partially constructed on failure.
pub fn decode(text: &str) -> Result<Scenario, SimError> {
    let mut cursor = Cursor::new(text);

    let name = cursor.next("scenario name")?.to_string();
    let width = header_value(&mut cursor, "Width")?;
    let height = header_value(&mut cursor, "Height")?;
    let seed = header_value(&mut cursor, "Seed")?;

    let separator = "=".repeat(width.max(0) as usize);
    expect_separator(&mut cursor, &separator)?;

    let construction_line = cursor.line;
    let mut scenario = Scenario::new(name, width, height, i64::from(seed))
        .map_err(|source| bad(construction_line, &source.to_string()))?;

    let mut tiles = Vec::with_capacity(scenario.size());
    for _ in 0..height {
        let row = cursor.next("terrain row")?;
        let line = cursor.line;
        if row.chars().count() != width as usize {
            return Err(bad(
                line,
                &format!("terrain row must be exactly {width} characters"),
            ));
        }
        for encoded in row.chars() {
            tiles.push(Terrain::decode(encoded).map_err(|source| bad(line, &source.to_string()))?);
        }
    }
    scenario
        .set_terrain(tiles)
        .map_err(|source| bad(cursor.line, &source.to_string()))?;
    expect_separator(&mut cursor, &separator)?;

    while let Some(entity_line) = cursor.advance() {
        let line = cursor.line;
        let entity = decode_entity(entity_line, line)?;
        let coordinate = entity.coordinate();
        let terrain = scenario
            .terrain_at(coordinate)
            .ok_or_else(|| bad(line, &format!("coordinate {coordinate} is out of bounds")))?;
        if !placement_allowed(&entity, terrain) {
            return Err(bad(
                line,
                &format!("entity cannot stand on {terrain:?} at {coordinate}"),
            ));
        }
        let _ = scenario
            .place_entity(entity)
            .map_err(|source| bad(line, &source.to_string()))?;
    }

    Ok(scenario)
}

/// Reads the full stream and decodes it.
///
/// # Errors
///
/// [`SimError::BadSave`] on both stream failures and malformed content.
pub fn read_from<R: Read>(mut reader: R) -> Result<Scenario, SimError> {
    let mut text = String::new();
    let _ = reader
        .read_to_string(&mut text)
        .map_err(|source| SimError::BadSave(format!("failed to read save: {source}")))?;
    decode(&text)
}

/// Encodes the scenario into the stream.
///
/// # Errors
///
/// [`SimError::BadSave`] when the stream rejects the write.
pub fn write_to<W: Write>(mut writer: W, scenario: &Scenario) -> Result<(), SimError> {
    writer
        .write_all(encode(scenario).as_bytes())
        .map_err(|source| SimError::BadSave(format!("failed to write save: {source}")))
}

fn decode_entity(text: &str, line: usize) -> Result<Entity, SimError> {
    let fields: Vec<&str> = text.split('-').collect();
    match fields.as_slice() {
        ["Player", coordinate, name] => Ok(Entity::Player {
            coordinate: Coordinate::decode(coordinate)
                .map_err(|source| bad(line, &source.to_string()))?,
            name: (*name).to_string(),
        }),
        ["Creature", size, coordinate, habitat] => Ok(Entity::Creature {
            size: SizeClass::decode(size).map_err(|source| bad(line, &source.to_string()))?,
            coordinate: Coordinate::decode(coordinate)
                .map_err(|source| bad(line, &source.to_string()))?,
            habitat: Habitat::decode(habitat).map_err(|source| bad(line, &source.to_string()))?,
        }),
        ["Plant", size, coordinate] => Ok(Entity::Plant {
            size: SizeClass::decode(size).map_err(|source| bad(line, &source.to_string()))?,
            coordinate: Coordinate::decode(coordinate)
                .map_err(|source| bad(line, &source.to_string()))?,
        }),
        _ => Err(bad(line, "unrecognised entity line")),
    }
}

/// Terrain compatibility at load time mirrors the movement rules.
fn placement_allowed(entity: &Entity, terrain: Terrain) -> bool {
    match entity {
        Entity::Creature { habitat, .. } => habitat.allows(terrain),
        Entity::Plant { .. } => terrain != Terrain::Water,
        Entity::Player { .. } => !matches!(terrain, Terrain::Water | Terrain::Peak),
    }
}

fn header_value(cursor: &mut Cursor<'_>, key: &str) -> Result<i32, SimError> {
    let text = cursor.next(key)?;
    let line = cursor.line;
    let fields: Vec<&str> = text.split(':').collect();
    let [found_key, value] = fields.as_slice() else {
        return Err(bad(line, &format!("expected {key}:<value>")));
    };
    if *found_key != key {
        return Err(bad(line, &format!("expected {key}, found {found_key}")));
    }
    let parsed: i32 = value
        .parse()
        .map_err(|_| bad(line, &format!("{key} value {value:?} is not an integer")))?;
    if parsed == -1 {
        Ok(DEFAULT_HEADER_VALUE)
    } else {
        Ok(parsed)
    }
}

fn expect_separator(cursor: &mut Cursor<'_>, separator: &str) -> Result<(), SimError> {
    let text = cursor.next("separator")?;
    if text == separator {
        Ok(())
    } else {
        Err(bad(cursor.line, &format!("expected separator {separator:?}")))
    }
}

fn bad(line: usize, what: &str) -> SimError {
    SimError::BadSave(format!("line {line}: {what}"))
}

/// Line reader that tracks the one-based line number for error reports.
struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Cursor<'a> {
        Cursor {
            lines: text.lines(),
            line: 0,
        }
    }

    fn advance(&mut self) -> Option<&'a str> {
        let text = self.lines.next()?;
        self.line += 1;
        Some(text)
    }

    fn next(&mut self, what: &str) -> Result<&'a str, SimError> {
        let line = self.line + 1;
        self.advance()
            .ok_or_else(|| bad(line, &format!("missing {what}")))
    }
}
