//! Map file parsing and the post-invasion report.
//!
//! A map file holds one city per line followed by its roads:
//!
//! ```text
//! Foo north=Bar west=Baz south=Qu-ux
//! Bar south=Foo west=Bee
//! ```

use crate::graph::WorldGraph;
use invasion_core::{Direction, Error, Result};
use std::collections::{BTreeSet, HashSet};
use std::io::BufRead;

/// A road leaving a city, as written in the map file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    pub direction: Direction,
    pub to: String,
}

/// A city line from the map file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    pub name: String,
    pub roads: Vec<Road>,
}

/// The world as described by a map file, in input order
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    cities: Vec<CityEntry>,
}

impl WorldMap {
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_reader(input.as_bytes())
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut cities = Vec::new();
        let mut seen = HashSet::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let mut parts = line.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };

            if !seen.insert(name.to_string()) {
                return Err(Error::MapParse {
                    line: line_no,
                    message: format!("city {} declared twice", name),
                });
            }

            let roads = parts
                .map(|token| parse_road(token, line_no))
                .collect::<Result<Vec<_>>>()?;

            cities.push(CityEntry {
                name: name.to_string(),
                roads,
            });
        }

        Ok(Self { cities })
    }

    pub fn cities(&self) -> &[CityEntry] {
        &self.cities
    }

    /// Build the undirected graph. Declared cities come first, then cities
    /// that only appear as road targets.
    pub fn to_graph(&self) -> WorldGraph {
        let mut graph = WorldGraph::new();
        for city in &self.cities {
            graph.add_city(&city.name);
        }
        for city in &self.cities {
            for road in &city.roads {
                graph.connect(&city.name, &road.to);
            }
        }
        graph
    }

    /// Render what is left of the world.
    ///
    /// One line per surviving declared city in input order, listing only
    /// roads into surviving cities, or `---` when none remain.
    pub fn report(&self, destroyed: &BTreeSet<&str>) -> Vec<String> {
        self.cities
            .iter()
            .filter(|city| !destroyed.contains(city.name.as_str()))
            .map(|city| {
                let roads: Vec<String> = city
                    .roads
                    .iter()
                    .filter(|road| !destroyed.contains(road.to.as_str()))
                    .map(|road| format!("{}={}", road.direction, road.to))
                    .collect();
                if roads.is_empty() {
                    format!("{} ---", city.name)
                } else {
                    format!("{} {}", city.name, roads.join(" "))
                }
            })
            .collect()
    }
}

fn parse_road(token: &str, line: usize) -> Result<Road> {
    let malformed = |message: String| Error::MapParse { line, message };

    let (direction, to) = token
        .split_once('=')
        .ok_or_else(|| malformed(format!("road {} is missing '='", token)))?;
    if to.is_empty() {
        return Err(malformed(format!("road {} has no destination", token)));
    }
    let direction = Direction::from_keyword(direction)
        .ok_or_else(|| malformed(format!("unknown direction {}", direction)))?;

    Ok(Road {
        direction,
        to: to.to_string(),
    })
}
