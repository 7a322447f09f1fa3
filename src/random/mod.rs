//! Seeded, named random number generators.
//!
//! Each generator is identified by a zero-sized type implementing [`RngId`], declared with
//! [`define_rng!`]. All generators in an [`RngStore`] share one base seed; the seed of an
//! individual generator is the base seed offset by a hash of its name, so generators are
//! independent of each other and of the order in which they are first used.

mod macros;
mod rng_store;

pub use macros::define_rng;
pub use rng_store::RngStore;

use crate::rand::SeedableRng;

pub trait RngId: Copy + Clone + 'static {
    type RngType: SeedableRng;
    fn get_name() -> &'static str;
}
