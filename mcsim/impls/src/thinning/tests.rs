use mcsim_core::{
    cogs::SeedableRng,
    error::SamplingError,
};
use mcsim_core_bond::NonNegativeF64;
use mcsim_core_maths::StdMathsCore;

use crate::{cogs::rng::wyhash::WyHash, testing::DummyRng};

use super::{next_time, PoissonThinner, Thinned, MAX_ZERO_RATE_CANDIDATES};

#[test]
fn homogeneous_rejects_invalid_rates() {
    let mut rng = DummyRng::new(vec![]);

    for rate in [0.0, -1.0, f64::INFINITY] {
        assert_eq!(
            next_time(rate, &mut rng),
            Err(SamplingError::NonPositiveRate(rate))
        );
    }

    assert!(next_time(f64::NAN, &mut rng).is_err());
}

#[test]
fn homogeneous_mean_is_inverse_rate() {
    const N: usize = 100_000;

    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(1);

    for rate in [0.1, 1.0, 4.0] {
        let mean = (0..N)
            .map(|_| next_time(rate, &mut rng).unwrap().get())
            .sum::<f64>()
            / (N as f64);

        // The exponential standard deviation is 1/rate
        assert!((mean - 1.0 / rate).abs() < 5.0 / rate / (N as f64).sqrt());
    }
}

#[test]
fn thinning_rejects_zero_rate_candidates() {
    let thinner = PoissonThinner::default();

    let mut rng = DummyRng::new(vec![(-0.5_f64).exp(), 0.9, (-1.0_f64).exp(), 0.25]);

    let delta_t = thinner
        .next_time(|t| if t < 1.0 { 0.0 } else { 0.5 }, 1.0, &mut rng)
        .unwrap();

    assert!((delta_t.get() - 1.5).abs() < 1e-9);
}

#[test]
fn thinning_checks_the_bound() {
    let mut rng = DummyRng::new(vec![0.5, 0.5]);

    assert!(matches!(
        PoissonThinner::default().next_time(|_| 3.0, 2.0, &mut rng),
        Err(SamplingError::RateBoundExceeded { bound, .. }) if bound == 2.0
    ));

    let mut rng = DummyRng::new(vec![0.5, 0.5]);

    assert!(PoissonThinner::new(false)
        .next_time(|_| 3.0, 2.0, &mut rng)
        .is_ok());

    let mut rng = DummyRng::new(vec![]);

    for bound in [0.0, -1.0, f64::INFINITY] {
        assert_eq!(
            PoissonThinner::default().next_time(|_| 1.0, bound, &mut rng),
            Err(SamplingError::InvalidRateBound(bound))
        );
    }

    let mut rng = DummyRng::new(vec![0.5]);

    assert!(matches!(
        PoissonThinner::default().next_time(|_| -1.0, 2.0, &mut rng),
        Err(SamplingError::NegativeRate { .. })
    ));
}

#[test]
fn thinning_constant_rate_matches_homogeneous() {
    const N: usize = 50_000;

    let thinner = PoissonThinner::default();
    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(2);

    let samples = (0..N)
        .map(|_| thinner.next_time(|_| 2.0, 5.0, &mut rng).unwrap().get())
        .collect::<Vec<_>>();

    let mean = samples.iter().sum::<f64>() / (N as f64);
    assert!((mean - 0.5).abs() < 5.0 * 0.5 / (N as f64).sqrt());

    // P(T > 1) = e^-2
    let tail = samples.iter().filter(|t| **t > 1.0).count() as f64 / (N as f64);
    assert!((tail - (-2.0_f64).exp()).abs() < 0.01);
}

#[test]
fn thinning_until_stops_at_the_limit() {
    let thinner = PoissonThinner::default();
    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(3);

    assert_eq!(
        thinner
            .next_time_until(|_| 0.0, 1.0, NonNegativeF64::new(5.0).unwrap(), &mut rng)
            .unwrap(),
        None
    );

    for _ in 0..1000 {
        if let Some(delta_t) = thinner
            .next_time_until(|_| 1.0, 1.0, NonNegativeF64::new(0.5).unwrap(), &mut rng)
            .unwrap()
        {
            assert!(delta_t <= 0.5);
        }
    }
}

#[test]
fn decreasing_rate_exhausts() {
    let mut rng = DummyRng::new(vec![]);

    assert_eq!(
        PoissonThinner::default()
            .next_time_decreasing(|_| 0.0, &mut rng)
            .unwrap(),
        None
    );

    let mut rng = DummyRng::new(vec![0.5, 0.9]);

    assert_eq!(
        PoissonThinner::default()
            .next_time_decreasing(|t| if t < 0.1 { 1.0 } else { 0.0 }, &mut rng)
            .unwrap(),
        None
    );
}

#[test]
fn decreasing_rate_detects_increase() {
    let mut rng = DummyRng::new(vec![0.5]);

    assert!(matches!(
        PoissonThinner::default().next_time_decreasing(|t| 1.0 + t, &mut rng),
        Err(SamplingError::IncreasingRate { previous, .. }) if previous == 1.0
    ));
}

#[test]
fn decreasing_rate_survival() {
    const N: usize = 50_000;

    let thinner = PoissonThinner::default();
    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(4);

    // rate(t) = 2 / (1 + t)  =>  P(T > t) = (1 + t)^-2
    let tail = (0..N)
        .filter(|_| {
            thinner
                .next_time_decreasing(|t| 2.0 / (1.0 + t), &mut rng)
                .unwrap()
                .unwrap()
                > 1.0
        })
        .count() as f64
        / (N as f64);

    assert!((tail - 0.25).abs() < 0.01);
}

#[test]
fn competing_processes() {
    const N: usize = 50_000;

    let thinner = PoissonThinner::default();
    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(5);

    let mut counts = [0_usize; 3];
    let mut total_time = 0.0;

    for _ in 0..N {
        let (delta_t, index) = thinner.next(|_| [1.0, 0.0, 3.0], 5.0, &mut rng).unwrap();

        counts[index] += 1;
        total_time += delta_t.get();
    }

    assert_eq!(counts[1], 0);
    assert!((counts[0] as f64 / (N as f64) - 0.25).abs() < 0.01);
    assert!((total_time / (N as f64) - 0.25).abs() < 0.01);

    assert_eq!(
        thinner
            .next_decreasing_until(|_| vec![0.0, 0.0], NonNegativeF64::infinity(), &mut rng)
            .unwrap(),
        Thinned::Exhausted
    );

    let mut rng = DummyRng::new(vec![0.75]);

    assert_eq!(
        thinner
            .next_index(|t| [t, 1.0 - t], 0.5, &mut rng)
            .unwrap(),
        1
    );
}

#[test]
fn vanishing_rate_without_limit_is_an_error() {
    let thinner = PoissonThinner::default();
    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(17);

    assert_eq!(
        thinner.next_time(|_| 0.0, 1.0, &mut rng),
        Err(SamplingError::NoPositiveRate)
    );
    assert_eq!(
        thinner.next(|_| [0.0, 0.0], 3.0, &mut rng),
        Err(SamplingError::NoPositiveRate)
    );

    // A finite limit ends the loop before the zero-rate streak matters
    assert_eq!(
        thinner.next_bounded_until(
            |_| [0.0],
            1.0,
            NonNegativeF64::new(f64::from(MAX_ZERO_RATE_CANDIDATES) * 2.0).unwrap(),
            &mut rng
        ),
        Ok(Thinned::BeyondLimit)
    );
}

#[test]
fn zero_rate_streak_is_reset_by_positive_rates() {
    let thinner = PoissonThinner::default();
    let mut rng = WyHash::<StdMathsCore>::seed_from_u64(18);

    // The rate is positive for a sliver of every unit interval
    let delta_t = thinner
        .next_time(|t| if t.fract() < 0.01 { 1.0 } else { 0.0 }, 1.0, &mut rng)
        .unwrap();

    assert!(delta_t.get().fract() < 0.01);
}
