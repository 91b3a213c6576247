//! Undirected city graph.

use invasion_core::{CityId, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Static topology of the world.
///
/// Cities get dense ids in first-seen order and that order is the stable
/// iteration order of [`WorldGraph::locations`]. Roads are symmetric. The
/// graph never learns which cities are destroyed; callers pass their
/// destroyed-set into [`WorldGraph::surviving_neighbors`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldGraph {
    names: Vec<String>,
    index: HashMap<String, CityId>,
    adjacency: Vec<BTreeSet<CityId>>,
}

impl WorldGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an adjacency list.
    ///
    /// Every listed road is made bidirectional, duplicates collapse and
    /// self-loops are dropped. Cities that only appear as neighbours are
    /// added after the listed ones, in first-mention order.
    pub fn from_adjacency<'a, I, N>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, N)>,
        N: IntoIterator<Item = &'a str>,
    {
        let entries: Vec<(&str, Vec<&str>)> = adjacency
            .into_iter()
            .map(|(city, neighbors)| (city, neighbors.into_iter().collect()))
            .collect();

        let mut graph = Self::new();
        for (city, _) in &entries {
            graph.add_city(city);
        }
        for (city, neighbors) in &entries {
            for neighbor in neighbors {
                graph.connect(city, neighbor);
            }
        }
        graph
    }

    /// Add a city, returning the existing id if it is already known
    pub(crate) fn add_city(&mut self, name: &str) -> CityId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = CityId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.adjacency.push(BTreeSet::new());
        id
    }

    pub(crate) fn connect(&mut self, a: &str, b: &str) {
        let a = self.add_city(a);
        let b = self.add_city(b);
        if a == b {
            return;
        }
        self.adjacency[a.index()].insert(b);
        self.adjacency[b.index()].insert(a);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn city_id(&self, name: &str) -> Option<CityId> {
        self.index.get(name).copied()
    }

    /// Like [`WorldGraph::city_id`], failing for unknown names
    pub fn lookup(&self, name: &str) -> Result<CityId> {
        self.city_id(name)
            .ok_or_else(|| Error::InvalidLocation(name.to_string()))
    }

    pub fn contains(&self, id: CityId) -> bool {
        id.index() < self.names.len()
    }

    pub fn name(&self, id: CityId) -> Result<&str> {
        self.names
            .get(id.index())
            .map(String::as_str)
            .ok_or_else(|| Error::InvalidLocation(format!("#{}", id.0)))
    }

    /// All cities in insertion order
    pub fn locations(&self) -> impl Iterator<Item = CityId> + '_ {
        (0..self.names.len()).map(|i| CityId(i as u32))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Every city adjacent to `id`, destroyed or not
    pub fn neighbors(&self, id: CityId) -> Result<&BTreeSet<CityId>> {
        self.adjacency
            .get(id.index())
            .ok_or_else(|| Error::InvalidLocation(format!("#{}", id.0)))
    }

    /// Neighbour names of `name`, sorted by city id
    pub fn neighbor_names(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.lookup(name)?;
        self.neighbors(id)?
            .iter()
            .map(|&neighbor| self.name(neighbor))
            .collect()
    }

    /// Neighbours of `id` that are not in `destroyed`, sorted by city id
    pub fn surviving_neighbors(
        &self,
        id: CityId,
        destroyed: &BTreeSet<CityId>,
    ) -> Result<Vec<CityId>> {
        Ok(self
            .neighbors(id)?
            .iter()
            .copied()
            .filter(|neighbor| !destroyed.contains(neighbor))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> WorldGraph {
        WorldGraph::from_adjacency([
            ("a", vec!["b", "c"]),
            ("b", vec!["c"]),
            ("d", vec![]),
        ])
    }

    #[test]
    fn test_graph_creation() {
        let graph = sample_graph();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.names().collect::<Vec<_>>(), vec!["a", "b", "d", "c"]);
        assert!(!graph.is_empty());
        assert!(WorldGraph::new().is_empty());
    }

    #[test]
    fn test_roads_are_bidirectional() {
        let graph = sample_graph();
        assert_eq!(graph.neighbor_names("a").unwrap(), vec!["b", "c"]);
        assert_eq!(graph.neighbor_names("b").unwrap(), vec!["a", "c"]);
        assert_eq!(graph.neighbor_names("c").unwrap(), vec!["a", "b"]);
        assert!(graph.neighbor_names("d").unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_and_self_loops_collapse() {
        let graph = WorldGraph::from_adjacency([
            ("a", vec!["b", "b", "a"]),
            ("b", vec!["a"]),
        ]);
        assert_eq!(graph.neighbor_names("a").unwrap(), vec!["b"]);
        assert_eq!(graph.neighbor_names("b").unwrap(), vec!["a"]);
    }

    #[test]
    fn test_unknown_city_is_invalid() {
        let graph = sample_graph();
        assert!(matches!(
            graph.neighbor_names("x"),
            Err(Error::InvalidLocation(name)) if name == "x"
        ));
        assert!(matches!(
            graph.neighbors(CityId(99)),
            Err(Error::InvalidLocation(_))
        ));
        assert!(!graph.contains(CityId(4)));
        assert!(graph.contains(CityId(3)));
    }

    #[test]
    fn test_surviving_neighbors_filters_destroyed() {
        let graph = sample_graph();
        let a = graph.lookup("a").unwrap();
        let b = graph.lookup("b").unwrap();
        let c = graph.lookup("c").unwrap();

        let destroyed = BTreeSet::from([b]);
        assert_eq!(graph.surviving_neighbors(a, &destroyed).unwrap(), vec![c]);

        let destroyed = BTreeSet::from([b, c]);
        assert!(graph.surviving_neighbors(a, &destroyed).unwrap().is_empty());

        // Adjacency itself is untouched
        assert_eq!(graph.neighbors(a).unwrap().len(), 2);
    }
}
