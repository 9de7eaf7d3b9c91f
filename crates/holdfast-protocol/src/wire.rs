//! Flat-text save codec.
//!
//! One logical record per line, fields space-separated except the terrain
//! array, which is a single comma-joined `MAP` record. Field order is fixed;
//! there is no version tag, so any format change is breaking. Parsing is
//! strict: every malformed record is a hard error and the caller decides how
//! to degrade (typically by starting a fresh match).

use std::fmt::Write as _;

use thiserror::Error;

use crate::{
    BuildingKind, BuildingRecord, ResourceAmounts, Side, Snapshot, Terrain, UnitKind, UnitRecord,
};

/// Upper bound on record-list preallocation; entity counts are read from
/// untrusted input.
const PREALLOC_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("save data ended before the {0} record")]
    MissingRecord(&'static str),
    #[error("malformed {record} record on line {line}")]
    Malformed { record: &'static str, line: usize },
    #[error("bad integer {text:?} on line {line}")]
    BadInteger { text: String, line: usize },
    #[error("unknown terrain token {0:?}")]
    UnknownTerrain(String),
    #[error("unknown side flag {0:?}")]
    UnknownSide(String),
    #[error("unknown unit kind {0:?}")]
    UnknownUnitKind(String),
    #[error("unknown building kind {0:?}")]
    UnknownBuildingKind(String),
    #[error("terrain array holds {got} entries, grid needs {expected}")]
    TerrainCountMismatch { got: usize, expected: usize },
}

/// Serialize a snapshot to the save text, fields in the fixed record order.
pub fn write_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "W {} {}", snapshot.width, snapshot.height);
    let _ = writeln!(
        out,
        "T {} {}",
        snapshot.turn,
        if snapshot.human_turn { 1 } else { 0 }
    );

    for side in Side::BOTH {
        let res = snapshot.resources(side);
        let _ = writeln!(
            out,
            "R {} {} {} {} {}",
            side.token(),
            res.gold,
            res.wood,
            res.stone,
            res.food
        );
    }

    out.push_str("MAP ");
    for (i, terrain) in snapshot.terrain.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(terrain.token());
    }
    out.push('\n');

    let _ = writeln!(out, "B {}", snapshot.buildings.len());
    for b in &snapshot.buildings {
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            b.side.token(),
            b.kind.token(),
            b.x,
            b.y,
            b.hits
        );
    }

    let _ = writeln!(out, "U {}", snapshot.units.len());
    for u in &snapshot.units {
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            u.side.token(),
            u.kind.token(),
            u.x,
            u.y,
            u.hits
        );
    }

    out
}

/// Parse save text back into a snapshot. Reads records in the exact order
/// `write_snapshot` emits them.
pub fn read_snapshot(raw: &str) -> Result<Snapshot, WireError> {
    let mut lines = Cursor::new(raw);

    let (width, height) = {
        let (line, number) = lines.next("W")?;
        let fields = tagged_fields(line, number, "W", 2)?;
        (
            parse_int(fields[0], number)? as u32,
            parse_int(fields[1], number)? as u32,
        )
    };

    let (turn, human_turn) = {
        let (line, number) = lines.next("T")?;
        let fields = tagged_fields(line, number, "T", 2)?;
        (
            parse_int(fields[0], number)? as u32,
            parse_int(fields[1], number)? == 1,
        )
    };

    let human_resources = read_resources(&mut lines, Side::Human)?;
    let opponent_resources = read_resources(&mut lines, Side::Opponent)?;

    let terrain = {
        let (line, number) = lines.next("MAP")?;
        let body = line.strip_prefix("MAP ").ok_or(WireError::Malformed {
            record: "MAP",
            line: number,
        })?;
        body.split(',')
            .map(|token| {
                Terrain::from_token(token).ok_or_else(|| WireError::UnknownTerrain(token.into()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let expected = (width as usize) * (height as usize);
    if terrain.len() != expected {
        return Err(WireError::TerrainCountMismatch {
            got: terrain.len(),
            expected,
        });
    }

    let building_count = read_count(&mut lines, "B")?;
    // Counts come straight from the file; cap the preallocation so a bogus
    // count surfaces as a missing-record error, not an allocation abort.
    let mut buildings = Vec::with_capacity(building_count.min(PREALLOC_LIMIT));
    for _ in 0..building_count {
        let (line, number) = lines.next("building")?;
        let (side, x, y, hits, kind_token) = read_entity_fields(line, number, "building")?;
        let kind = BuildingKind::from_token(kind_token)
            .ok_or_else(|| WireError::UnknownBuildingKind(kind_token.into()))?;
        buildings.push(BuildingRecord {
            side,
            kind,
            x,
            y,
            hits,
        });
    }

    let unit_count = read_count(&mut lines, "U")?;
    let mut units = Vec::with_capacity(unit_count.min(PREALLOC_LIMIT));
    for _ in 0..unit_count {
        let (line, number) = lines.next("unit")?;
        let (side, x, y, hits, kind_token) = read_entity_fields(line, number, "unit")?;
        let kind = UnitKind::from_token(kind_token)
            .ok_or_else(|| WireError::UnknownUnitKind(kind_token.into()))?;
        units.push(UnitRecord {
            side,
            kind,
            x,
            y,
            hits,
        });
    }

    Ok(Snapshot {
        width,
        height,
        turn,
        human_turn,
        human_resources,
        opponent_resources,
        terrain,
        buildings,
        units,
    })
}

struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    number: usize,
}

impl<'a> Cursor<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.lines(),
            number: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<(&'a str, usize), WireError> {
        self.number += 1;
        match self.lines.next() {
            Some(line) => Ok((line, self.number)),
            None => Err(WireError::MissingRecord(expected)),
        }
    }
}

/// Split a `TAG f1 f2 ...` line, check the tag, and require an exact field count.
fn tagged_fields<'a>(
    line: &'a str,
    number: usize,
    tag: &'static str,
    count: usize,
) -> Result<Vec<&'a str>, WireError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some(tag) {
        return Err(WireError::Malformed { record: tag, line: number });
    }
    let fields: Vec<_> = parts.collect();
    if fields.len() != count {
        return Err(WireError::Malformed { record: tag, line: number });
    }
    Ok(fields)
}

fn parse_int(text: &str, line: usize) -> Result<i32, WireError> {
    text.parse().map_err(|_| WireError::BadInteger {
        text: text.into(),
        line,
    })
}

fn read_resources(lines: &mut Cursor<'_>, side: Side) -> Result<ResourceAmounts, WireError> {
    let (line, number) = lines.next("R")?;
    let mut parts = line.split_whitespace();
    if parts.next() != Some("R") || parts.next() != Some(side.token()) {
        return Err(WireError::Malformed { record: "R", line: number });
    }
    let fields: Vec<_> = parts.collect();
    if fields.len() != 4 {
        return Err(WireError::Malformed { record: "R", line: number });
    }
    Ok(ResourceAmounts {
        gold: parse_int(fields[0], number)?,
        wood: parse_int(fields[1], number)?,
        stone: parse_int(fields[2], number)?,
        food: parse_int(fields[3], number)?,
    })
}

fn read_count(lines: &mut Cursor<'_>, tag: &'static str) -> Result<usize, WireError> {
    let (line, number) = lines.next(tag)?;
    let fields = tagged_fields(line, number, tag, 1)?;
    let count = parse_int(fields[0], number)?;
    if count < 0 {
        return Err(WireError::Malformed { record: tag, line: number });
    }
    Ok(count as usize)
}

fn read_entity_fields<'a>(
    line: &'a str,
    number: usize,
    record: &'static str,
) -> Result<(Side, i32, i32, i32, &'a str), WireError> {
    let fields: Vec<_> = line.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(WireError::Malformed { record, line: number });
    }
    let side = Side::from_token(fields[0]).ok_or_else(|| WireError::UnknownSide(fields[0].into()))?;
    let x = parse_int(fields[2], number)?;
    let y = parse_int(fields[3], number)?;
    let hits = parse_int(fields[4], number)?;
    Ok((side, x, y, hits, fields[1]))
}
