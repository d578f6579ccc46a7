use mcsim_core::cogs::RngCore;
use mcsim_core_bond::NonNegativeF64;
use mcsim_core_maths::StdMathsCore;
use mcsim_impls::{
    cogs::rng::wyhash::WyHash, kinetic::KineticMonteCarlo, thinning::PoissonThinner,
};

use crate::{try_parse, try_print, RngArgs, SimulationArgs, SweepArgs};

#[test]
fn parses_minimal_arguments_with_defaults() {
    let args = SimulationArgs::from_ron("(rng: Seed(42))").unwrap();

    assert_eq!(args.rng, RngArgs::Seed(42));
    assert_eq!(args.kinetic, KineticMonteCarlo::default());
    assert_eq!(args.thinning, PoissonThinner::new(true));
    assert_eq!(args.sweep, SweepArgs { number_updates: 1 });
}

#[test]
fn parses_full_arguments() {
    let args = SimulationArgs::from_ron(
        "(
            rng: Entropy,
            kinetic: (start_time: 0.5, max_steps: 100),
            thinning: (check_bound: false),
            sweep: (number_updates: 10),
        )",
    )
    .unwrap();

    assert_eq!(args.rng, RngArgs::Entropy);
    assert_eq!(
        args.kinetic,
        KineticMonteCarlo {
            start_time: NonNegativeF64::new(0.5).unwrap(),
            max_steps: Some(100),
        }
    );
    assert!(!args.thinning.check_bound);
    assert_eq!(args.sweep.number_updates, 10);
}

#[test]
fn rejects_unknown_fields_with_path() {
    let err = SimulationArgs::from_ron("(rng: Seed(1), kinetic: (strat_time: 1.0))").unwrap_err();
    let message = format!("{:#}", err);

    assert!(message.contains("simulation.kinetic"), "{}", message);
    assert!(message.contains("strat_time"), "{}", message);
}

#[test]
fn rejects_negative_start_time() {
    let err = SimulationArgs::from_ron("(rng: Seed(1), kinetic: (start_time: -1.0))").unwrap_err();
    let message = format!("{:#}", err);

    assert!(message.contains("negative"), "{}", message);
}

#[test]
fn requires_rng() {
    assert!(SimulationArgs::from_ron("(sweep: (number_updates: 2))").is_err());
}

#[test]
fn printed_arguments_parse_back() {
    let args = SimulationArgs {
        rng: RngArgs::Seed(7),
        kinetic: KineticMonteCarlo {
            start_time: NonNegativeF64::new(2.0).unwrap(),
            max_steps: Some(3),
        },
        thinning: PoissonThinner::new(false),
        sweep: SweepArgs { number_updates: 4 },
    };

    let printed = try_print(&args).unwrap();

    assert!(printed.contains("SimulationArgs"), "{}", printed);
    assert_eq!(try_parse::<SimulationArgs>("printed", &printed).unwrap(), args);
}

#[test]
fn seeded_rng_is_reproducible() {
    let args = SimulationArgs::from_ron("(rng: Seed(42))").unwrap();

    let mut a = args.build_rng().unwrap();
    let mut b = args.build_rng().unwrap();

    for _ in 0..16 {
        assert_eq!(a.sample_u64(), b.sample_u64());
    }

    let mut c = RngArgs::Seed(43)
        .build::<StdMathsCore, WyHash<StdMathsCore>>()
        .unwrap();

    assert_ne!(a.sample_u64(), c.sample_u64());
}

#[test]
fn entropy_rng_builds() {
    let mut rng = RngArgs::Entropy
        .build::<StdMathsCore, WyHash<StdMathsCore>>()
        .unwrap();

    let _ = rng.sample_u64();
}
