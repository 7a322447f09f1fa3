//! Agent-based simulation of an infectious disease spreading over a campus contact network.
//!
//! A population of individuals is placed on a Watts–Strogatz small-world contact graph. Each
//! simulated day every individual who is not isolated goes through the same steps:
//! * their disease course advances (incubation, then a drawn symptom category, then cure),
//! * they may be infected from outside the network or by a contagious neighbor,
//! * they may be tested, either because a neighbor tested positive or by surveillance or
//!   because they show symptoms.
//!
//! An individual who tests positive is isolated for good: they are skipped by the daily scan
//! and stop transmitting. The [`Simulator`] records one [`DailyRecord`] per day with the number
//! of new infections, the number of tests and the positive rate.
//!
//! All randomness flows from one seed through an [`RngStore`] holding one independent
//! generator per purpose, so identical parameters and seed reproduce a run exactly.
pub mod error;
pub mod hashing;
pub mod individual;
pub mod log;
pub mod macros;
pub mod network;
pub mod numeric;
pub mod parameters;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulator;

pub use error::EpiError;
pub use individual::{DiseaseProfile, Individual, Status};
pub use network::ContactGraph;
pub use parameters::{IndividualParameters, Parameters};
pub use random::{RngId, RngStore};
pub use report::{DailyRecord, ReportWriter, SimulationLog};
pub use runner::{run_with_args, BaseArgs};
pub use simulator::Simulator;

// Re-exported for use by `define_rng!`
pub use paste;
pub use rand;
