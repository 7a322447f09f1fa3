//! One person's infection and testing state.
//!
//! An [`Individual`] moves through
//! `Susceptible -> Incubating -> {Asymptomatic | Mild | Severe} -> Susceptible`.
//! There is no terminal state: a cured individual can be infected again.

use std::fmt::{self, Display};

use log::trace;

use crate::define_rng;
use crate::error::EpiError;
use crate::numeric::is_probability_vector;
use crate::random::RngStore;

define_rng!(pub DiseaseRng);

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Status {
    Susceptible = 0,
    Incubating = 1,
    Asymptomatic = 2,
    Mild = 3,
    Severe = 4,
}

impl Status {
    /// The outcomes of the symptom draw, in the order of `symptom_probabilities` and `cure_dates`.
    pub const SYMPTOM_CATEGORIES: [Status; 3] = [Status::Asymptomatic, Status::Mild, Status::Severe];

    pub const ALL: [Status; 5] = [
        Status::Susceptible,
        Status::Incubating,
        Status::Asymptomatic,
        Status::Mild,
        Status::Severe,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn is_infected(self) -> bool {
        self != Status::Susceptible
    }

    /// Mild or severe.
    #[must_use]
    pub fn is_symptomatic(self) -> bool {
        matches!(self, Status::Mild | Status::Severe)
    }

    /// Index into [`Status::SYMPTOM_CATEGORIES`], or `None` before the symptom draw.
    #[must_use]
    pub fn symptom_index(self) -> Option<usize> {
        match self {
            Status::Asymptomatic => Some(0),
            Status::Mild => Some(1),
            Status::Severe => Some(2),
            Status::Susceptible | Status::Incubating => None,
        }
    }
}

/// The disease course shared by every individual in a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiseaseProfile {
    incubation_length: u32,
    symptom_probabilities: [f64; 3],
    cure_dates: [u32; 3],
}

impl DiseaseProfile {
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidParameter`] if either slice does not have exactly three
    /// entries, the probabilities are not a distribution, the incubation length is zero, or a
    /// cure date does not fall after the incubation length.
    pub fn new(
        incubation_length: u32,
        symptom_probabilities: &[f64],
        cure_dates: &[u32],
    ) -> Result<Self, EpiError> {
        let symptom_probabilities: [f64; 3] = symptom_probabilities.try_into().map_err(|_| {
            EpiError::invalid_parameter(
                "symptom_probabilities",
                format!(
                    "expected 3 probabilities but {} received",
                    symptom_probabilities.len()
                ),
            )
        })?;
        let cure_dates: [u32; 3] = cure_dates.try_into().map_err(|_| {
            EpiError::invalid_parameter(
                "cure_dates",
                format!("expected 3 cure dates but {} received", cure_dates.len()),
            )
        })?;
        if !is_probability_vector(&symptom_probabilities) {
            return Err(EpiError::invalid_parameter(
                "symptom_probabilities",
                format!("{symptom_probabilities:?} must lie in [0, 1] and sum to 1"),
            ));
        }
        if incubation_length == 0 {
            return Err(EpiError::invalid_parameter(
                "incubation_length",
                "must be at least one day",
            ));
        }
        if let Some(date) = cure_dates.iter().find(|&&date| date <= incubation_length) {
            return Err(EpiError::invalid_parameter(
                "cure_dates",
                format!("cure date {date} must be later than incubation length {incubation_length}"),
            ));
        }
        Ok(Self {
            incubation_length,
            symptom_probabilities,
            cure_dates,
        })
    }

    #[must_use]
    pub fn incubation_length(&self) -> u32 {
        self.incubation_length
    }

    #[must_use]
    pub fn symptom_probabilities(&self) -> [f64; 3] {
        self.symptom_probabilities
    }

    #[must_use]
    pub fn cure_dates(&self) -> [u32; 3] {
        self.cure_dates
    }

    /// Days since infection at which an individual in `category` is cured.
    #[must_use]
    pub fn cure_date(&self, category: Status) -> Option<u32> {
        category.symptom_index().map(|index| self.cure_dates[index])
    }
}

/// Hands out dense, 0-based individual ids in construction order.
#[derive(Debug, Default)]
pub struct IdCounter {
    next: usize,
}

impl IdCounter {
    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The number of ids handed out since the last reset.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.next
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Individual {
    id: usize,
    status: Status,
    days_since_infection: u32,
    profile: DiseaseProfile,
    tested_positive: bool,
    neighbor_ids: Vec<usize>,
}

impl Individual {
    pub fn new(ids: &mut IdCounter, profile: DiseaseProfile, neighbor_ids: Vec<usize>) -> Self {
        Self {
            id: ids.next_id(),
            status: Status::Susceptible,
            days_since_infection: 0,
            profile,
            tested_positive: false,
            neighbor_ids,
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn days_since_infection(&self) -> u32 {
        self.days_since_infection
    }

    #[must_use]
    pub fn tested_positive(&self) -> bool {
        self.tested_positive
    }

    #[must_use]
    pub fn neighbor_ids(&self) -> &[usize] {
        &self.neighbor_ids
    }

    #[must_use]
    pub fn profile(&self) -> &DiseaseProfile {
        &self.profile
    }

    #[must_use]
    pub fn is_susceptible(&self) -> bool {
        self.status == Status::Susceptible
    }

    /// Infectious and not isolated.
    #[must_use]
    pub fn is_contagious(&self) -> bool {
        self.status.is_infected() && !self.tested_positive
    }

    /// Starts incubation. Must only be called on a susceptible individual.
    pub fn infect(&mut self) {
        debug_assert!(
            self.is_susceptible(),
            "individual {} infected while {:?}",
            self.id,
            self.status
        );
        self.status = Status::Incubating;
        self.days_since_infection = 0;
    }

    /// Tests this individual and returns the result. Only an infected individual tests
    /// positive; testing a susceptible individual has no effect.
    pub fn attempt_test(&mut self) -> bool {
        if self.status.is_infected() {
            self.tested_positive = true;
        }
        self.tested_positive
    }

    pub fn cure(&mut self) {
        self.status = Status::Susceptible;
        self.days_since_infection = 0;
        self.tested_positive = false;
    }

    /// Advances the infection clock by one day: draws the symptom category when incubation
    /// ends, self-tests while symptomatic, and cures on the category's cure date. Susceptible
    /// individuals do not age.
    pub fn advance_one_day(&mut self, rngs: &RngStore) {
        if self.status == Status::Susceptible {
            return;
        }
        self.days_since_infection += 1;

        let incubation_length = self.profile.incubation_length;
        if self.days_since_infection == incubation_length {
            let index = rngs.sample_weighted(DiseaseRng, &self.profile.symptom_probabilities);
            self.status = Status::SYMPTOM_CATEGORIES[index];
            trace!("individual {} developed {:?}", self.id, self.status);
        }

        if self.status.is_symptomatic() {
            self.attempt_test();
        }

        if self.days_since_infection >= incubation_length
            && self.profile.cure_date(self.status) == Some(self.days_since_infection)
        {
            trace!("individual {} cured as {:?}", self.id, self.status);
            self.cure();
        }
    }
}

impl Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.status.is_infected() {
            write!(f, "(infected)")?;
        }
        if self.tested_positive {
            write!(f, "(tested)")?;
        }
        Ok(())
    }
}
