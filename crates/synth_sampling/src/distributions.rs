//! Distribution primitives: weighted categorical and triangular sampling.
//!
//! Both samplers are inverse-CDF draws from a single uniform variate, so a
//! seeded [`SynthRng`] reproduces the same outcomes call for call.

use crate::rng::SynthRng;
use rand::Rng;
use rand_distr::Distribution;
use synth_core::types::{CategoricalDistribution, SynthError, TriangularSpec, WeightedOutcome};

/// Draw one outcome from a categorical distribution.
///
/// Accumulates weights in declaration order and returns the first outcome
/// whose cumulative weight reaches the uniform draw. If rounding leaves the
/// total mass just below the draw, the last outcome is returned.
///
/// # Example
///
/// ```
/// use synth_core::types::{CategoricalDistribution, WeightedOutcome};
/// use synth_sampling::distributions::sample_categorical;
/// use synth_sampling::rng::SynthRng;
///
/// let targets = CategoricalDistribution::new(vec![
///     WeightedOutcome::new(0.130, 0.3),
///     WeightedOutcome::new(0.135, 0.5),
///     WeightedOutcome::new(0.140, 0.2),
/// ])
/// .unwrap();
///
/// let mut rng = SynthRng::from_seed(1);
/// let target = *sample_categorical(&targets, &mut rng);
/// assert!([0.130, 0.135, 0.140].contains(&target));
/// ```
#[inline]
pub fn sample_categorical<'a, T>(
    dist: &'a CategoricalDistribution<T>,
    rng: &mut SynthRng,
) -> &'a T {
    dist.select(rng.gen_uniform())
}

/// Validate raw weighted outcomes and draw one of them.
///
/// Convenience for callers holding unvalidated configuration data.
///
/// # Returns
///
/// * `Err(SynthError::InvalidDistribution)` - Empty list, negative weight, or
///   total mass not close to one
pub fn draw_weighted<T: Clone>(
    outcomes: Vec<WeightedOutcome<T>>,
    rng: &mut SynthRng,
) -> Result<T, SynthError> {
    let dist = CategoricalDistribution::new(outcomes)?;
    Ok(sample_categorical(&dist, rng).clone())
}

/// Triangular distribution sampled by inverse CDF.
///
/// Implements [`rand_distr::Distribution<f64>`], so it works with any
/// `rand` generator as well as [`SynthRng`].
///
/// # Example
///
/// ```
/// use rand_distr::Distribution;
/// use synth_core::types::TriangularSpec;
/// use synth_sampling::distributions::Triangular;
/// use synth_sampling::rng::SynthRng;
///
/// let dist = Triangular::new(TriangularSpec::new(0.10, 0.19, 0.13).unwrap());
/// let mut rng = SynthRng::from_seed(42);
/// let x = dist.sample(&mut rng);
/// assert!((0.10..=0.19).contains(&x));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    spec: TriangularSpec,
}

impl Triangular {
    /// Wrap validated triangular parameters.
    pub fn new(spec: TriangularSpec) -> Self {
        Self { spec }
    }

    /// Validate raw parameters and build the sampler.
    ///
    /// # Returns
    ///
    /// * `Err(SynthError::InvalidDistribution)` - `high == low` or `mode`
    ///   outside `[low, high]`
    pub fn from_bounds(low: f64, high: f64, mode: f64) -> Result<Self, SynthError> {
        TriangularSpec::new(low, high, mode).map(Self::new)
    }

    /// Parameters of the distribution.
    #[inline]
    pub fn spec(&self) -> &TriangularSpec {
        &self.spec
    }
}

impl Distribution<f64> for Triangular {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.spec.inverse_cdf(rng.gen::<f64>())
    }
}

/// Draw one triangular sample from raw parameters.
///
/// # Returns
///
/// * `Err(SynthError::InvalidDistribution)` - `high == low` or `mode`
///   outside `[low, high]`
pub fn sample_triangular(
    low: f64,
    high: f64,
    mode: f64,
    rng: &mut SynthRng,
) -> Result<f64, SynthError> {
    Ok(Triangular::from_bounds(low, high, mode)?.sample(rng))
}
