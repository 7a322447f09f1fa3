use std::any::{Any, TypeId};
use std::cell::{RefCell, RefMut};

use log::trace;
use rustc_hash::FxHashMap;

use crate::hashing::hash_str;
use crate::rand::distr::uniform::{SampleRange, SampleUniform};
use crate::rand::distr::weighted::{Weight, WeightedIndex};
use crate::rand::distr::Distribution;
use crate::rand::{Rng, SeedableRng};
use crate::random::RngId;

// This is a wrapper that allows for future support for different types of
// random number generators (anything that implements SeedableRng is valid).
struct RngHolder {
    rng: Box<dyn Any>,
}

/// Owns every generator used by a simulation run.
///
/// Generators are created lazily on first use and live in a `RefCell` so that sampling only
/// needs a shared borrow of the store. This lets a caller hold `&mut` to other simulation state
/// while drawing from the store.
pub struct RngStore {
    base_seed: u64,
    rng_holders: RefCell<FxHashMap<TypeId, RngHolder>>,
}

impl RngStore {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        RngStore {
            base_seed,
            rng_holders: RefCell::new(FxHashMap::default()),
        }
    }

    /// Gets a mutable reference to the random number generator associated with the given
    /// [`RngId`], creating it from the base seed if it has not been used yet.
    fn get_rng<R: RngId>(&self) -> RefMut<'_, R::RngType> {
        let rng_holders = self
            .rng_holders
            .try_borrow_mut()
            .expect("random number generators are not re-entrant");
        RefMut::map(rng_holders, |holders| {
            holders
                .entry(TypeId::of::<R>())
                .or_insert_with(|| {
                    trace!(
                        "creating new RNG {} (base seed={})",
                        R::get_name(),
                        self.base_seed
                    );
                    let seed_offset = hash_str(R::get_name());
                    RngHolder {
                        rng: Box::new(R::RngType::seed_from_u64(
                            self.base_seed.wrapping_add(seed_offset),
                        )),
                    }
                })
                .rng
                .downcast_mut::<R::RngType>()
                .expect("RNG stored under the wrong type id")
        })
    }

    /// Gets a random sample from the generator associated with the given [`RngId`] by applying
    /// the specified sampler function.
    pub fn sample<R: RngId, T>(
        &self,
        _rng_id: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T {
        let mut rng = self.get_rng::<R>();
        sampler(&mut rng)
    }

    /// Gets a random sample within the range provided by `range`.
    pub fn sample_range<R: RngId, S, T>(&self, rng_id: R, range: S) -> T
    where
        R::RngType: Rng,
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(rng_id, |rng| rng.random_range(range))
    }

    /// Draws a uniform value in `[0, 1)`. Every call consumes exactly one value from the
    /// generator, so a Bernoulli trial `sample_uniform(..) < p` advances the generator even when
    /// `p` is 0 or 1.
    pub fn sample_uniform<R: RngId>(&self, rng_id: R) -> f64
    where
        R::RngType: Rng,
    {
        self.sample(rng_id, |rng| rng.random::<f64>())
    }

    /// Draws an index into `weights` with probability proportional to its weight.
    ///
    /// # Panics
    ///
    /// Panics if the weights are empty, negative, or all zero.
    pub fn sample_weighted<R: RngId, T>(&self, rng_id: R, weights: &[T]) -> usize
    where
        R::RngType: Rng,
        T: Clone
            + Default
            + SampleUniform
            + for<'a> std::ops::AddAssign<&'a T>
            + PartialOrd
            + Weight,
    {
        let index = WeightedIndex::new(weights).expect("invalid sampling weights");
        self.sample(rng_id, |rng| index.sample(rng))
    }
}
