//! The population simulator.
//!
//! A [`Simulator`] owns the contact graph, one [`Individual`] per graph node, the random number
//! generators and the [`SimulationLog`]. Each call to [`Simulator::simulate_one_day`] visits every
//! individual once, in id order, and mutates state in place. An individual infected earlier in
//! the scan is therefore already contagious to neighbors visited later on the same day. This
//! scan-order bias is part of the model; it averages out over runs with different seeds.

use std::fmt::{self, Display};

use log::{debug, info, trace};

use crate::error::EpiError;
use crate::individual::{DiseaseProfile, DiseaseRng, IdCounter, Individual, Status};
use crate::network::ContactGraph;
use crate::parameters::{IndividualParameters, Parameters};
use crate::random::RngStore;
use crate::report::{DailyRecord, SimulationLog};

/// Added to the number of tests when computing the daily positive rate.
pub const POSITIVE_RATE_EPSILON: f64 = 1e-8;

/// Counts accumulated while scanning the population for one day.
#[derive(Debug, Default)]
struct DayCounts {
    new_infections: u64,
    tests_administered: u64,
    positive_tests: u64,
}

impl DayCounts {
    fn record_test(&mut self, positive: bool) {
        self.tests_administered += 1;
        if positive {
            self.positive_tests += 1;
        }
    }
}

pub struct Simulator {
    parameters: Parameters,
    profile: DiseaseProfile,
    graph: ContactGraph,
    population: Vec<Individual>,
    rngs: RngStore,
    ids: IdCounter,
    log: SimulationLog,
    cumulative_infections: u64,
    cumulative_tests: u64,
    day: u32,
}

impl Simulator {
    /// Builds a simulator and resets it with `parameters.seed` and `parameters.individual`.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidParameter`] if the parameters are invalid.
    pub fn new(parameters: Parameters) -> Result<Self, EpiError> {
        let profile = parameters.validate()?;
        let seed = parameters.seed;
        let individual = parameters.individual.clone();
        let mut simulator = Simulator {
            parameters,
            profile,
            graph: ContactGraph::default(),
            population: Vec::new(),
            rngs: RngStore::new(seed),
            ids: IdCounter::default(),
            log: SimulationLog::new(),
            cumulative_infections: 0,
            cumulative_tests: 0,
            day: 0,
        };
        simulator.reset(seed, individual)?;
        Ok(simulator)
    }

    /// Starts a new run: re-seeds the generators, rebuilds the contact graph, recreates the
    /// population with fresh ids and clears the counters and the log. Nothing is modified if
    /// `individual` is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidParameter`] if `individual` is invalid.
    pub fn reset(&mut self, seed: u64, individual: IndividualParameters) -> Result<(), EpiError> {
        let profile = self.parameters.disease_profile(&individual)?;
        let rngs = RngStore::new(seed);
        let graph = ContactGraph::small_world(
            self.parameters.population_size,
            self.parameters.neighbors,
            self.parameters.rewiring_probability,
            &rngs,
        )?;

        self.parameters.seed = seed;
        self.parameters.individual = individual;
        self.profile = profile;
        self.rngs = rngs;
        self.ids.reset();
        self.population = (0..graph.node_count())
            .map(|node| Individual::new(&mut self.ids, profile, graph.neighbors(node).to_vec()))
            .collect();
        self.graph = graph;
        self.log.clear();
        self.cumulative_infections = 0;
        self.cumulative_tests = 0;
        self.day = 0;
        info!(
            "reset simulation: seed {seed}, {} individuals, {} contacts",
            self.population.len(),
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Infects a susceptible individual directly, outside the daily scan. The infection is not
    /// counted in the log.
    ///
    /// # Errors
    ///
    /// Returns an [`EpiError`] if `id` is unknown or the individual is not susceptible.
    pub fn force_infect(&mut self, id: usize) -> Result<(), EpiError> {
        let individual = self
            .population
            .get_mut(id)
            .ok_or(EpiError::InvalidIndividual(id))?;
        if !individual.is_susceptible() {
            return Err(EpiError::NotSusceptible(id));
        }
        individual.infect();
        trace!("individual {id} force infected");
        Ok(())
    }

    /// Simulates one day and returns the record appended to the log.
    ///
    /// For each individual in id order: advance its clock; skip it if isolated; expose it to
    /// background infection; expose it to each contagious neighbor and note whether any neighbor
    /// has tested positive; then give it a contact-traced test if so, or a surveillance test
    /// otherwise.
    pub fn simulate_one_day(&mut self) -> &DailyRecord {
        let Parameters {
            background_infection_probability,
            transmission_probability,
            contact_test_probability,
            surveillance_test_probability,
            ..
        } = self.parameters;
        let mut counts = DayCounts::default();

        for id in 0..self.population.len() {
            self.population[id].advance_one_day(&self.rngs);

            if self.population[id].tested_positive() {
                // isolated
                continue;
            }

            if self.rngs.sample_uniform(DiseaseRng) < background_infection_probability
                && self.population[id].is_susceptible()
            {
                self.population[id].infect();
                counts.new_infections += 1;
                trace!("individual {id} infected by background exposure");
            }

            let mut contact_flagged = false;
            for position in 0..self.population[id].neighbor_ids().len() {
                let neighbor_id = self.population[id].neighbor_ids()[position];
                let neighbor = &self.population[neighbor_id];
                let (contagious, isolated) = (neighbor.is_contagious(), neighbor.tested_positive());

                if contagious
                    && self.rngs.sample_uniform(DiseaseRng) < transmission_probability
                    && self.population[id].is_susceptible()
                {
                    self.population[id].infect();
                    counts.new_infections += 1;
                    trace!("individual {id} infected by {neighbor_id}");
                }
                if isolated {
                    contact_flagged = true;
                }
            }

            if contact_flagged {
                if self.rngs.sample_uniform(DiseaseRng) < contact_test_probability {
                    let positive = self.population[id].attempt_test();
                    counts.record_test(positive);
                    trace!("individual {id} contact tested, positive: {positive}");
                }
                continue;
            }

            if self.rngs.sample_uniform(DiseaseRng) < surveillance_test_probability {
                let positive = self.population[id].attempt_test();
                counts.record_test(positive);
                trace!("individual {id} surveillance tested, positive: {positive}");
            }
        }

        self.record_day(&counts)
    }

    fn record_day(&mut self, counts: &DayCounts) -> &DailyRecord {
        #[allow(clippy::cast_precision_loss)]
        let positive_rate = counts.positive_tests as f64
            / (counts.tests_administered as f64 + POSITIVE_RATE_EPSILON);
        self.cumulative_infections += counts.new_infections;
        self.cumulative_tests += counts.tests_administered;
        self.day += 1;

        debug!(
            "day {}: {} new infections, {} tests ({} positive)",
            self.day, counts.new_infections, counts.tests_administered, counts.positive_tests
        );
        self.log.push(DailyRecord {
            day: self.day,
            new_infections: counts.new_infections,
            tests_administered: counts.tests_administered,
            positive_tests: counts.positive_tests,
            positive_rate,
            cumulative_infections: self.cumulative_infections,
            cumulative_tests: self.cumulative_tests,
            seed: self.parameters.seed,
        })
    }

    /// Simulates `days` consecutive days.
    pub fn run(&mut self, days: u32) -> &SimulationLog {
        for _ in 0..days {
            self.simulate_one_day();
        }
        info!(
            "finished day {}: {} cumulative infections, {} cumulative tests",
            self.day, self.cumulative_infections, self.cumulative_tests
        );
        &self.log
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn disease_profile(&self) -> &DiseaseProfile {
        &self.profile
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.parameters.seed
    }

    #[must_use]
    pub fn graph(&self) -> &ContactGraph {
        &self.graph
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.population
    }

    #[must_use]
    pub fn individual(&self, id: usize) -> Option<&Individual> {
        self.population.get(id)
    }

    #[must_use]
    pub fn log(&self) -> &SimulationLog {
        &self.log
    }

    /// Number of days simulated since the last reset.
    #[must_use]
    pub fn current_day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub fn cumulative_infections(&self) -> u64 {
        self.cumulative_infections
    }

    #[must_use]
    pub fn cumulative_tests(&self) -> u64 {
        self.cumulative_tests
    }

    /// Population counts indexed by [`Status::code`].
    #[must_use]
    pub fn status_counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for individual in &self.population {
            counts[usize::from(individual.status().code())] += 1;
        }
        counts
    }

    /// The current status of every individual, in id order, for rendering alongside
    /// [`Simulator::graph`].
    #[must_use]
    pub fn status_snapshot(&self) -> Vec<Status> {
        self.population.iter().map(Individual::status).collect()
    }
}

impl Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.parameters;
        writeln!(f, "Simulator (seed {}, day {})", p.seed, self.day)?;
        writeln!(f, "P={}", p.background_infection_probability)?;
        writeln!(f, "I={}", p.transmission_probability)?;
        writeln!(f, "L={}", p.incubation_length)?;
        writeln!(f, "T={}", p.contact_test_probability)?;
        writeln!(f, "S={}", p.surveillance_test_probability)?;
        write!(f, "population: {}", self.population.len())
    }
}
