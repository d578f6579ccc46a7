use mcsim_core::cogs::{RngCore, SeedableRng};
use mcsim_core_bond::{NonNegativeF64, PositiveF64};
use mcsim_core_maths::StdMathsCore;

use mcsim_impls::{
    cogs::{
        event_handler::{
            grouped::{GroupedEventHandler, GroupedRates},
            inhomogeneous::{InhomogeneousEventHandler, RateBound},
            list::ListEventHandler,
        },
        rng::{rand::RandAsRng, wyhash::WyHash},
    },
    equilibrium::{sweep, Metropolis},
    kinetic::{advance, KineticMonteCarlo, Termination},
    rate_sampler::{next_event, RateVector},
    thinning::{next_time, PoissonThinner},
};

use rand::{rngs::StdRng, SeedableRng as _};

type Rng = WyHash<StdMathsCore>;

fn chi_square<const N: usize>(counts: &[usize; N], weights: &[f64; N]) -> f64 {
    let total_weight: f64 = weights.iter().sum();
    let samples = counts.iter().sum::<usize>() as f64;

    counts
        .iter()
        .zip(weights)
        .map(|(count, weight)| {
            let expected = samples * weight / total_weight;

            (*count as f64 - expected).powi(2) / expected
        })
        .sum()
}

// 99.9% quantile of the chi-square distribution with 3 degrees of freedom
const CHI_SQUARE_3_DOF: f64 = 16.266;

#[test]
fn next_event_goodness_of_fit() {
    let weights = [0.1, 0.2, 0.3, 0.4];

    let mut rng = Rng::seed_from_u64(2024);
    let mut counts = [0_usize; 4];

    for _ in 0..100_000 {
        counts[next_event(&weights, &mut rng).unwrap()] += 1;
    }

    assert!(chi_square(&counts, &weights) < CHI_SQUARE_3_DOF);
}

#[test]
fn rate_vector_and_grouped_rates_goodness_of_fit() {
    let weights = [0.1, 0.2, 0.3, 0.4];

    let vector = RateVector::new(weights.to_vec()).unwrap();

    let mut grouped = GroupedRates::new();
    for (i, weight) in weights.iter().enumerate() {
        grouped.set_rate(i, *weight).unwrap();
    }

    let mut rng = RandAsRng::<StdMathsCore, _>::from(StdRng::seed_from_u64(2025));

    let mut vector_counts = [0_usize; 4];
    let mut grouped_counts = [0_usize; 4];

    for _ in 0..100_000 {
        vector_counts[vector.sample(&mut rng).unwrap()] += 1;
        grouped_counts[grouped.sample(&mut rng).unwrap()] += 1;
    }

    assert!(chi_square(&vector_counts, &weights) < CHI_SQUARE_3_DOF);
    assert!(chi_square(&grouped_counts, &weights) < CHI_SQUARE_3_DOF);
}

#[test]
fn thinning_matches_the_homogeneous_distribution() {
    const N: usize = 100_000;

    let thinner = PoissonThinner::default();
    let mut rng = Rng::seed_from_u64(99);

    let mut homogeneous = (0..N)
        .map(|_| next_time(1.5, &mut rng).unwrap().get())
        .collect::<Vec<_>>();
    let mut thinned = (0..N)
        .map(|_| thinner.next_time(|_| 1.5, 4.0, &mut rng).unwrap().get())
        .collect::<Vec<_>>();

    homogeneous.sort_by(f64::total_cmp);
    thinned.sort_by(f64::total_cmp);

    // Largest CDF difference between matching order statistics
    let ks = homogeneous
        .iter()
        .zip(&thinned)
        .map(|(a, b)| (1.0 - (-1.5 * a).exp() - (1.0 - (-1.5 * b).exp())).abs())
        .fold(0.0_f64, f64::max);

    assert!(ks < 0.01);
}

#[test]
fn radioactive_decay() {
    const PARTICLES: usize = 2000;

    let mut handler = ListEventHandler::with_update(
        vec![1.0; PARTICLES],
        |particle: &usize, rates: &mut RateVector| rates.set(*particle, 0.0),
    )
    .unwrap();

    let mut rng = Rng::seed_from_u64(3);
    let mut decayed = vec![false; PARTICLES];

    let result = advance(
        &mut rng,
        &mut handler,
        |particle: &usize| {
            assert!(!decayed[*particle]);
            decayed[*particle] = true;
        },
        NonNegativeF64::new(1.0).unwrap(),
    )
    .unwrap();

    assert!(result.time <= 1.0);
    assert_eq!(result.termination, Termination::Horizon);

    let surviving = decayed.iter().filter(|d| !**d).count();
    assert_eq!(PARTICLES - surviving, usize::try_from(result.steps).unwrap());

    let fraction = surviving as f64 / PARTICLES as f64;
    assert!((fraction - (-1.0_f64).exp()).abs() < 0.05);
}

#[test]
fn birth_death_process_with_grouped_rates() {
    // A population of size n grows with rate 1 and shrinks with rate n / 10
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Reaction {
        Birth,
        Death,
    }

    let population = core::cell::Cell::new(10_u32);

    let mut handler = GroupedEventHandler::with_update(
        [(Reaction::Birth, 1.0), (Reaction::Death, 1.0)],
        |_: &Reaction, rates: &mut GroupedRates<Reaction>| {
            rates.set_rate(Reaction::Death, f64::from(population.get()) / 10.0)
        },
    )
    .unwrap();

    let mut rng = Rng::seed_from_u64(5);

    let result = KineticMonteCarlo {
        start_time: NonNegativeF64::zero(),
        max_steps: Some(100_000),
    }
    .advance(
        &mut rng,
        &mut handler,
        |reaction: &Reaction| match reaction {
            Reaction::Birth => population.set(population.get() + 1),
            Reaction::Death => population.set(population.get() - 1),
        },
        NonNegativeF64::infinity(),
    )
    .unwrap();

    assert_eq!(result.steps, 100_000);
    assert_eq!(result.termination, Termination::StepLimit);

    // The death rate tracks the population after every event
    assert_eq!(
        handler.rates().rate(&Reaction::Death).map(PositiveF64::get),
        Some(f64::from(population.get()) / 10.0).filter(|rate| *rate > 0.0)
    );

    // The stationary distribution is Poisson(10)
    assert!(population.get() < 40);
}

#[test]
fn inhomogeneous_event_count() {
    const TRAJECTORIES: usize = 5000;

    // rate(t) = 1 / (1 + t) over [0, e^2 - 1] fires Poisson(2) events
    let horizon = NonNegativeF64::new(2.0_f64.exp() - 1.0).unwrap();

    let mut rng = Rng::seed_from_u64(6);

    let mut events = 0_u64;

    for _ in 0..TRAJECTORIES {
        let mut handler = InhomogeneousEventHandler::new(
            |t: f64| [1.0 / (1.0 + t)],
            if rng.sample_u64() % 2 == 0 {
                RateBound::NonIncreasing
            } else {
                RateBound::Constant(PositiveF64::one())
            },
        );

        let result = advance(&mut rng, &mut handler, |_: &usize| (), horizon).unwrap();

        assert!(result.time <= horizon);
        events += result.steps;
    }

    let mean = events as f64 / TRAJECTORIES as f64;

    assert!((mean - 2.0).abs() < 0.1);
}

#[test]
fn metropolis_two_level_system() {
    const UPDATES: usize = 200_000;

    let metropolis = Metropolis::new(1.0);
    let excited = core::cell::Cell::new(false);
    let excited_count = core::cell::Cell::new(0_usize);

    let flip = |rng: &mut Rng| {
        let delta_energy = if excited.get() { -1.0 } else { 1.0 };

        if metropolis.accept(delta_energy, rng) {
            excited.set(!excited.get());
        }

        if excited.get() {
            excited_count.set(excited_count.get() + 1);
        }
    };

    let mut rng = Rng::seed_from_u64(7);

    assert_eq!(sweep(&mut [flip], &[1.0], &mut rng, UPDATES), Ok(UPDATES));

    let fraction = excited_count.get() as f64 / UPDATES as f64;
    let expected = (-1.0_f64).exp() / (1.0 + (-1.0_f64).exp());

    assert!((fraction - expected).abs() < 0.01);
}
