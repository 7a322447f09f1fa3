//! Model parameters.
//!
//! Parameters can be built in code (starting from [`Parameters::default`]) or read from a JSON
//! file. Every field is optional in the file; missing fields take their default value:
//!
//! ```json
//! {
//!     "rewiring_probability": 0.5,
//!     "neighbors": 4,
//!     "background_infection_probability": 0.001,
//!     "transmission_probability": 0.35,
//!     "incubation_length": 3,
//!     "contact_test_probability": 0.4,
//!     "surveillance_test_probability": 0.01,
//!     "population_size": 1000,
//!     "seed": 1,
//!     "individual": {
//!         "symptom_probabilities": [0.40, 0.55, 0.05],
//!         "cure_dates": [10, 10, 21]
//!     }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EpiError;
use crate::individual::DiseaseProfile;

/// Per-individual disease course overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IndividualParameters {
    /// Probabilities of the asymptomatic, mild and severe outcomes.
    pub symptom_probabilities: Vec<f64>,
    /// Days since infection at which each outcome is cured.
    pub cure_dates: Vec<u32>,
}

impl Default for IndividualParameters {
    fn default() -> Self {
        Self {
            symptom_probabilities: vec![0.40, 0.55, 0.05],
            cure_dates: vec![10, 10, 21],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// R: probability that a ring lattice edge is rewired.
    pub rewiring_probability: f64,
    /// K: each node is joined to its K nearest ring neighbors.
    pub neighbors: usize,
    /// P: daily probability of infection from outside the network.
    pub background_infection_probability: f64,
    /// I: probability of infection from one contagious neighbor in one day.
    pub transmission_probability: f64,
    /// L: days of incubation before the symptom category is drawn.
    pub incubation_length: u32,
    /// T: probability of getting tested when a neighbor has tested positive.
    pub contact_test_probability: f64,
    /// S: daily probability of a surveillance test.
    pub surveillance_test_probability: f64,
    pub population_size: usize,
    pub seed: u64,
    pub individual: IndividualParameters,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            rewiring_probability: 0.5,
            neighbors: 4,
            background_infection_probability: 0.001,
            transmission_probability: 0.35,
            incubation_length: 3,
            contact_test_probability: 0.4,
            surveillance_test_probability: 0.01,
            population_size: 1000,
            seed: 1,
            individual: IndividualParameters::default(),
        }
    }
}

impl Parameters {
    /// Reads parameters from a JSON file and validates them.
    ///
    /// # Errors
    ///
    /// Returns an [`EpiError`] if the file cannot be read, is not valid JSON for this type, or
    /// holds invalid values.
    pub fn load_from_json(file_path: &Path) -> Result<Self, EpiError> {
        let file = File::open(file_path)?;
        let parameters: Parameters = serde_json::from_reader(BufReader::new(file))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Checks every value and returns the validated disease course.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<DiseaseProfile, EpiError> {
        for (name, value) in [
            ("rewiring_probability", self.rewiring_probability),
            (
                "background_infection_probability",
                self.background_infection_probability,
            ),
            ("transmission_probability", self.transmission_probability),
            ("contact_test_probability", self.contact_test_probability),
            (
                "surveillance_test_probability",
                self.surveillance_test_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EpiError::invalid_parameter(
                    name,
                    format!("{value} is not a probability"),
                ));
            }
        }
        if self.population_size == 0 {
            return Err(EpiError::invalid_parameter(
                "population_size",
                "must be at least one",
            ));
        }
        if self.neighbors > self.population_size {
            return Err(EpiError::invalid_parameter(
                "neighbors",
                format!(
                    "{} neighbors requested for a population of {}",
                    self.neighbors, self.population_size
                ),
            ));
        }
        self.disease_profile(&self.individual)
    }

    /// Combines the incubation length with per-individual settings.
    ///
    /// # Errors
    ///
    /// See [`DiseaseProfile::new`].
    pub fn disease_profile(
        &self,
        individual: &IndividualParameters,
    ) -> Result<DiseaseProfile, EpiError> {
        DiseaseProfile::new(
            self.incubation_length,
            &individual.symptom_probabilities,
            &individual.cure_dates,
        )
    }
}
