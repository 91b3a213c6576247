//! Epoch engine for running an invasion.

use crate::graph::WorldGraph;
use invasion_core::{AlienId, CityId, Error, Result, SimulationConfig, MAX_ALIENS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info, instrument, trace};

/// Where aliens start
#[derive(Debug, Clone)]
pub enum Placement {
    /// Aliens `1..=n` spread round-robin over the cities in graph order;
    /// alien `i` lands on city `(i - 1) % city_count`.
    RoundRobin(usize),
    /// Exact starting city per alien, used verbatim
    Explicit(BTreeMap<AlienId, String>),
}

/// A city destroyed by colliding aliens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestructionEvent {
    pub epoch: u32,
    pub city: String,
    /// Sorted ascending
    pub aliens: Vec<AlienId>,
}

impl fmt::Display for DestructionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aliens: Vec<String> = self.aliens.iter().map(ToString::to_string).collect();
        write!(f, "{} destroyed by alien [{}]!", self.city, aliens.join(" "))
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    BudgetExhausted,
    NoAliensAlive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub termination: Termination,
    pub epochs_run: u32,
    pub events: Vec<DestructionEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivorData {
    pub alien: AlienId,
    pub city: String,
}

/// Serializable end-of-run state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub termination: Termination,
    pub epochs_run: u32,
    pub survivors: Vec<SurvivorData>,
    pub destroyed_cities: Vec<String>,
}

/// Runs an alien invasion over a [`WorldGraph`].
///
/// The engine exclusively owns the live aliens and the destroyed-set. An
/// alien is removed from `alien_locations` as soon as it dies, and a city
/// never leaves `destroyed` once it enters.
#[derive(Debug)]
pub struct Simulation<R = ChaCha8Rng> {
    graph: WorldGraph,
    destroyed: BTreeSet<CityId>,
    alien_locations: BTreeMap<AlienId, CityId>,
    max_epochs: u32,
    remaining_epochs: u32,
    rng: R,
}

impl Simulation<ChaCha8Rng> {
    /// Create an engine whose generator is seeded from `config.seed`
    pub fn new(config: &SimulationConfig, graph: WorldGraph, placement: Placement) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, graph, placement, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Create an engine drawing moves from `rng`. `config.seed` is ignored.
    pub fn with_rng(
        config: &SimulationConfig,
        graph: WorldGraph,
        placement: Placement,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let alien_locations = place_aliens(&graph, placement)?;

        debug!(
            aliens = alien_locations.len(),
            cities = graph.len(),
            max_epochs = config.max_epochs,
            "Simulation initialized"
        );

        Ok(Self {
            graph,
            destroyed: BTreeSet::new(),
            alien_locations,
            max_epochs: config.max_epochs,
            remaining_epochs: config.max_epochs,
            rng,
        })
    }

    /// Run epochs until the budget is spent or every alien is dead.
    ///
    /// Both stop signals are normal completions; any other error aborts
    /// the run and is returned.
    #[instrument(skip(self), fields(aliens = self.alien_locations.len(), max_epochs = self.max_epochs))]
    pub fn run(&mut self) -> Result<RunOutcome> {
        info!(
            "Starting invasion: {} aliens over {} cities",
            self.alien_locations.len(),
            self.graph.len()
        );

        let mut events = Vec::new();
        let termination = loop {
            match self.advance_epoch() {
                Ok(epoch_events) => events.extend(epoch_events),
                Err(Error::BudgetExhausted) => break Termination::BudgetExhausted,
                Err(Error::NoAgentsAlive) => break Termination::NoAliensAlive,
                Err(e) => return Err(e),
            }

            let epoch = self.epochs_run();
            if epoch % 1000 == 0 {
                info!(
                    "Epoch {}/{}: {} aliens alive, {} cities destroyed",
                    epoch,
                    self.max_epochs,
                    self.alien_locations.len(),
                    self.destroyed.len()
                );
            }
        };

        info!(
            event = "invasion_complete",
            termination = ?termination,
            epochs_run = self.epochs_run(),
            survivors = self.alien_locations.len(),
            cities_destroyed = self.destroyed.len(),
            "Invasion complete"
        );

        Ok(RunOutcome {
            termination,
            epochs_run: self.epochs_run(),
            events,
        })
    }

    /// Move every live alien once and resolve collisions.
    ///
    /// Fails with [`Error::BudgetExhausted`] or [`Error::NoAgentsAlive`]
    /// when the run is over. Moves are planned from the positions at the
    /// start of the epoch, and every check runs before positions or the
    /// destroyed-set change.
    pub fn advance_epoch(&mut self) -> Result<Vec<DestructionEvent>> {
        if self.remaining_epochs == 0 {
            return Err(Error::BudgetExhausted);
        }
        if self.alien_locations.is_empty() {
            return Err(Error::NoAgentsAlive);
        }
        self.remaining_epochs -= 1;
        let epoch = self.epochs_run();

        let aliens: Vec<AlienId> = self.alien_locations.keys().copied().collect();
        let mut moves = Vec::with_capacity(aliens.len());
        for alien in aliens {
            let next = self.plan_move(alien)?;
            moves.push((alien, next));
        }

        let arrivals = group_arrivals(moves.iter().copied());
        for (&city, aliens) in &arrivals {
            if aliens.len() > 1 && self.destroyed.contains(&city) {
                return Err(Error::AlreadyDestroyed(self.graph.name(city)?.to_string()));
            }
        }

        for (alien, next) in moves {
            self.alien_locations.insert(alien, next);
        }

        let mut events = Vec::new();
        for (city, aliens) in arrivals {
            if aliens.len() < 2 {
                continue;
            }
            events.push(self.destroy_city(epoch, city, aliens)?);
        }

        debug!(
            epoch,
            aliens_alive = self.alien_locations.len(),
            cities_destroyed = events.len(),
            "Epoch complete"
        );

        Ok(events)
    }

    /// Next city for `alien`: a random surviving neighbour, or where it
    /// already is when it is trapped.
    fn plan_move(&mut self, alien: AlienId) -> Result<CityId> {
        let current = *self
            .alien_locations
            .get(&alien)
            .ok_or(Error::UnknownAlien(alien))?;

        if self.destroyed.contains(&current) {
            return Err(Error::InconsistentState(format!(
                "alien {} is in destroyed city {}",
                alien,
                self.graph.name(current)?
            )));
        }

        let candidates = self.graph.surviving_neighbors(current, &self.destroyed)?;
        let next = pick_neighbor(&candidates, &mut self.rng).unwrap_or(current);

        trace!(
            alien = alien.0,
            from = current.0,
            to = next.0,
            trapped = candidates.is_empty(),
            "Alien move"
        );
        Ok(next)
    }

    fn destroy_city(&mut self, epoch: u32, city: CityId, aliens: Vec<AlienId>) -> Result<DestructionEvent> {
        let name = self.graph.name(city)?.to_string();
        if !self.destroyed.insert(city) {
            return Err(Error::AlreadyDestroyed(name));
        }
        for alien in &aliens {
            self.alien_locations.remove(alien);
        }

        info!(
            event = "city_destroyed",
            epoch,
            city = %name,
            aliens = ?aliens,
            "City destroyed"
        );

        Ok(DestructionEvent {
            epoch,
            city: name,
            aliens,
        })
    }

    pub fn graph(&self) -> &WorldGraph {
        &self.graph
    }

    pub fn alien_count(&self) -> usize {
        self.alien_locations.len()
    }

    /// Current city of a live alien
    pub fn alien_location(&self, alien: AlienId) -> Option<&str> {
        let city = self.alien_locations.get(&alien)?;
        self.graph.name(*city).ok()
    }

    pub fn is_destroyed(&self, city: &str) -> bool {
        self.graph
            .city_id(city)
            .is_some_and(|id| self.destroyed.contains(&id))
    }

    /// Names of every destroyed city
    pub fn destroyed_cities(&self) -> BTreeSet<&str> {
        self.destroyed
            .iter()
            .filter_map(|&id| self.graph.name(id).ok())
            .collect()
    }

    pub fn remaining_epochs(&self) -> u32 {
        self.remaining_epochs
    }

    pub fn epochs_run(&self) -> u32 {
        self.max_epochs - self.remaining_epochs
    }

    pub fn summary(&self, outcome: &RunOutcome) -> RunSummary {
        let survivors = self
            .alien_locations
            .iter()
            .filter_map(|(&alien, &city)| {
                self.graph.name(city).ok().map(|name| SurvivorData {
                    alien,
                    city: name.to_string(),
                })
            })
            .collect();

        RunSummary {
            termination: outcome.termination,
            epochs_run: outcome.epochs_run,
            survivors,
            destroyed_cities: self
                .destroyed_cities()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Pick one candidate uniformly at random, `None` when there are none
pub fn pick_neighbor<R: Rng + ?Sized>(candidates: &[CityId], rng: &mut R) -> Option<CityId> {
    candidates.choose(rng).copied()
}

/// Group planned moves by destination city. Each group is sorted, so the
/// result does not depend on the order moves are visited in.
pub fn group_arrivals(
    moves: impl IntoIterator<Item = (AlienId, CityId)>,
) -> BTreeMap<CityId, Vec<AlienId>> {
    let mut arrivals: BTreeMap<CityId, Vec<AlienId>> = BTreeMap::new();
    for (alien, city) in moves {
        arrivals.entry(city).or_default().push(alien);
    }
    for aliens in arrivals.values_mut() {
        aliens.sort_unstable();
    }
    arrivals
}

fn place_aliens(graph: &WorldGraph, placement: Placement) -> Result<BTreeMap<AlienId, CityId>> {
    let requested = match &placement {
        Placement::RoundRobin(n) => *n,
        Placement::Explicit(locations) => locations.len(),
    };
    if requested > MAX_ALIENS {
        return Err(Error::InvalidAgentCount(requested));
    }
    if graph.is_empty() && requested > 0 {
        return Err(Error::EmptyWorld);
    }

    match placement {
        Placement::RoundRobin(n) => {
            let cities: Vec<CityId> = graph.locations().collect();
            Ok((0..n)
                .map(|i| (AlienId(i as u32 + 1), cities[i % cities.len()]))
                .collect())
        }
        Placement::Explicit(locations) => locations
            .into_iter()
            .map(|(alien, city)| graph.lookup(&city).map(|id| (alien, id)))
            .collect(),
    }
}
