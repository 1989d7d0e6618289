//! Loader for colliders CSV files.
//!
//! Layout:
//! ```text
//! lat0 37.792480, lon0 -122.397450
//! posX,posY,posZ,halfSizeX,halfSizeY,halfSizeZ
//! -310.2389,-439.2315,85.5,5,5,85.5
//! ```

use anyhow::{anyhow, bail, Context, Result};
use roadmap_core::{GlobalPosition, ObstacleRecord};
use std::fs;
use std::path::Path;

/// Home position from the header plus every obstacle row.
#[derive(Debug, Clone)]
pub struct ColliderMap {
    pub home: GlobalPosition,
    pub obstacles: Vec<ObstacleRecord>,
}

pub fn load_colliders(path: impl AsRef<Path>) -> Result<ColliderMap> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read colliders file {}", path.display()))?;
    parse_colliders(&text).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_colliders(text: &str) -> Result<ColliderMap> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| anyhow!("colliders file is empty"))?;
    let home = parse_home(header)?;

    let mut obstacles = Vec::new();
    // Second line is the column header.
    for (idx, line) in lines.enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values = line
            .split(',')
            .map(|field| field.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .with_context(|| format!("line {}: invalid number", idx + 2))?;
        let [north, east, alt, dn, de, dalt] = values[..] else {
            bail!("line {}: expected 6 columns, found {}", idx + 2, values.len());
        };
        obstacles.push(ObstacleRecord::new(north, east, alt, dn, de, dalt));
    }

    Ok(ColliderMap { home, obstacles })
}

/// Parse `lat0 <lat>, lon0 <lon>`.
fn parse_home(line: &str) -> Result<GlobalPosition> {
    let mut lat = None;
    let mut lon = None;
    for part in line.split(',') {
        let mut tokens = part.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some("lat0"), Some(value)) => lat = Some(value.parse::<f64>()?),
            (Some("lon0"), Some(value)) => lon = Some(value.parse::<f64>()?),
            _ => {}
        }
    }
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(GlobalPosition::new(lat, lon, 0.0)),
        _ => bail!("missing lat0/lon0 header: {:?}", line),
    }
}
