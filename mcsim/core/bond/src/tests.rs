use crate::{ClosedOpenUnitF64, ClosedUnitF64, NonNegativeF64, OpenClosedUnitF64, PositiveF64};

#[test]
fn range_checks() {
    assert!(NonNegativeF64::new(0.0).is_ok());
    assert!(NonNegativeF64::new(f64::INFINITY).is_ok());
    assert!(NonNegativeF64::new(-1e-300).is_err());
    assert!(NonNegativeF64::new(f64::NAN).is_err());

    assert!(PositiveF64::new(0.0).is_err());
    assert!(PositiveF64::new(1e-300).is_ok());
    assert!(PositiveF64::new(f64::NAN).is_err());

    assert!(ClosedUnitF64::new(0.0).is_ok());
    assert!(ClosedUnitF64::new(1.0).is_ok());
    assert!(ClosedUnitF64::new(1.0 + f64::EPSILON).is_err());

    assert!(ClosedOpenUnitF64::new(0.0).is_ok());
    assert!(ClosedOpenUnitF64::new(1.0).is_err());

    assert!(OpenClosedUnitF64::new(0.0).is_err());
    assert!(OpenClosedUnitF64::new(1.0).is_ok());
}

#[test]
fn arithmetic_preserves_bounds() {
    let a = NonNegativeF64::new(1.5).unwrap();
    let b = NonNegativeF64::new(2.0).unwrap();
    let p = PositiveF64::new(0.5).unwrap();

    assert_eq!(a + b, 3.5);
    assert_eq!(a * b, 3.0);
    assert_eq!(b / p, 4.0);
    assert_eq!((a + p).get(), 2.0);
    assert_eq!(a.saturating_sub(b), NonNegativeF64::zero());
    assert_eq!(b.saturating_sub(a), 0.5);
    assert_eq!([a, b, a].into_iter().sum::<NonNegativeF64>(), 5.0);
    assert!(a < b);
    assert!(p < a);
}

#[test]
fn debug_shows_range() {
    assert_eq!(
        format!("{:?}", NonNegativeF64::new(2.5).unwrap()),
        "NonNegativeF64(0.0 <= 2.5)"
    );
    assert_eq!(
        format!("{:?}", PositiveF64::new(0.25).unwrap()),
        "PositiveF64(0.0 < 0.25)"
    );
    assert_eq!(
        format!("{:?}", ClosedUnitF64::one()),
        "ClosedUnitF64(0.0 <= 1 <= 1.0)"
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        PositiveF64::new(-2.0).unwrap_err().to_string(),
        "-2 is not positive."
    );
    assert_eq!(
        ClosedUnitF64::new(1.5).unwrap_err().to_string(),
        "1.5 is not in [0.0, 1.0]."
    );
}
