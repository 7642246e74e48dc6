//! End-to-end zone classification scenarios.
//!
//! Run with: cargo test -p part77-core --test zone_scenarios

use part77_core::{
    classify, ApproachCategory, Edge, Point2, Point3, Runway, RunwayCategory, RunwayEnd,
    SurfaceError, SurfaceRules, SurfaceSet, Zone,
};

fn runway(
    name: &str,
    category: RunwayCategory,
    end1: (&str, f64, f64, ApproachCategory),
    end2: (&str, f64, f64, ApproachCategory),
) -> Runway {
    Runway::new(
        name,
        category,
        RunwayEnd::new(end1.0, Point2::new(end1.1, end1.2), end1.3),
        RunwayEnd::new(end2.0, Point2::new(end2.1, end2.2), end2.3),
    )
}

fn utility_09_27() -> Runway {
    runway(
        "09/27",
        RunwayCategory::Utility,
        ("09", -1000.0, 0.0, ApproachCategory::Visual),
        ("27", 1000.0, 0.0, ApproachCategory::Visual),
    )
}

fn assert_limit(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("expected a build limit");
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected limit {expected}, got {actual}"
    );
}

/// The primary surface wins regardless of height.
#[test]
fn test_primary_precedence() {
    let visual = runway(
        "09/27",
        RunwayCategory::Visual,
        ("09", -1000.0, 0.0, ApproachCategory::Visual),
        ("27", 1000.0, 0.0, ApproachCategory::Visual),
    );
    let result = classify(Point3::new(0.0, 0.0, 650.0), &[visual], 600.0).unwrap();
    assert_eq!(result.zone, Zone::Primary);
    assert_limit(result.build_limit_ft, 600.0);
}

/// Hard-surfaced runways carry the primary surface 200 ft past each end.
#[test]
fn test_hard_surface_extends_primary() {
    let rwy = utility_09_27().with_special_surface(true);
    let result = classify(Point3::new(1150.0, 0.0, 0.0), &[rwy], 0.0).unwrap();
    assert_eq!(result.zone, Zone::Primary);

    let result = classify(Point3::new(1150.0, 0.0, 0.0), &[utility_09_27()], 0.0).unwrap();
    assert_eq!(result.zone, Zone::Approach);
}

/// A point on the horizontal-surface boundary is inside it.
#[test]
fn test_horizontal_boundary() {
    let result = classify(Point3::new(1000.0, 5000.0, 500.0), &[utility_09_27()], 500.0).unwrap();
    assert_eq!(result.zone, Zone::Horizontal);
    assert_limit(result.build_limit_ft, 500.0);
}

#[test]
fn test_single_runway_horizontal() {
    let result = classify(Point3::new(0.0, 3000.0, 500.0), &[utility_09_27()], 500.0).unwrap();
    assert_eq!(result.zone, Zone::Horizontal);
    assert_limit(result.build_limit_ft, 500.0);
    assert_eq!(result.runway, None);
}

/// Conical limits climb from EAE+150 at the horizontal edge to EAE+350
/// 4,000 ft out, then nothing applies.
#[test]
fn test_conical_monotonic() {
    let eae = 500.0;
    let set = SurfaceSet::build(&[utility_09_27()], SurfaceRules::default()).unwrap();

    let mut previous = eae + 150.0;
    for step in 1..=8 {
        let s = step as f64 * 500.0;
        let result = set.classify(Point3::new(0.0, 5000.0 + s, eae + 150.0), eae);
        assert_eq!(result.zone, Zone::Conical, "offset {s}");
        let limit = result.build_limit_ft.unwrap();
        assert!(limit > previous, "limit must rise with distance");
        assert_limit(Some(limit), eae + 150.0 + s / 20.0);
        previous = limit;
    }
    assert_limit(Some(previous), eae + 350.0);

    let beyond = set.classify(Point3::new(0.0, 9100.0, eae + 150.0), eae);
    assert_eq!(beyond.zone, Zone::NotApplicable);
    assert_eq!(beyond.build_limit_ft, None);
}

/// Approach surfaces win over the horizontal surface where they are higher.
#[test]
fn test_approach_limit() {
    let result = classify(Point3::new(3500.0, 0.0, 500.0), &[utility_09_27()], 500.0).unwrap();
    assert_eq!(result.zone, Zone::Approach);
    assert_limit(result.build_limit_ft, 625.0);
    assert_eq!(result.runway.as_deref(), Some("09/27"));
    assert_eq!(result.end.as_deref(), Some("27"));

    let result = classify(Point3::new(-3500.0, 0.0, 500.0), &[utility_09_27()], 500.0).unwrap();
    assert_eq!(result.end.as_deref(), Some("09"));
}

#[test]
fn test_transitional_limit() {
    let rules = SurfaceRules::default();
    let result = classify(Point3::new(0.0, 600.0, 500.0), &[utility_09_27()], 500.0).unwrap();
    assert_eq!(result.zone, Zone::Transitional);
    assert_limit(
        result.build_limit_ft,
        500.0 + 150.0 * (600.0 - 125.0) / rules.transitional_offset_ft(),
    );
}

/// Precision approaches reach well beyond the horizontal surface.
#[test]
fn test_precision_approach_outside_horizontal() {
    let rwy = runway(
        "09/27",
        RunwayCategory::PrecisionInstrument,
        ("09", -5000.0, 0.0, ApproachCategory::Visual),
        ("27", 5000.0, 0.0, ApproachCategory::PrecisionInstrument),
    );
    let set = SurfaceSet::build(&[rwy], SurfaceRules::default()).unwrap();
    assert!(!set.horizontal().contains(Point2::new(20_000.0, 0.0)));

    let result = set.classify(Point3::new(20_000.0, 0.0, 0.0), 0.0);
    assert_eq!(result.zone, Zone::Approach);
    assert_limit(result.build_limit_ft, 200.0 + 5000.0 / 40.0);

    let above = set.classify(Point3::new(20_000.0, 0.0, 400.0), 0.0);
    assert_eq!(above.zone, Zone::NotApplicable);
}

/// Crossing runways produce one closed outline around all four ends.
#[test]
fn test_multi_runway_outline() {
    let runways = [
        utility_09_27(),
        runway(
            "18/36",
            RunwayCategory::NonPrecisionInstrument,
            ("18", 0.0, 4000.0, ApproachCategory::Visual),
            ("36", 0.0, -4000.0, ApproachCategory::Visual),
        )
        .with_special_surface(true),
    ];
    let set = SurfaceSet::build(&runways, SurfaceRules::default()).unwrap();
    let edges = set.horizontal().edges();
    assert!(edges.len() >= 3);
    for (i, edge) in edges.iter().enumerate() {
        let next = edges[(i + 1) % edges.len()];
        assert!(edge.end_point().distance(next.start_point()) < 1e-6);
    }
    assert!(edges.iter().any(|e| matches!(e, Edge::Arc { .. })));

    // The 18/36 ends sit at +/-4,200 ft with 10,000 ft radii.
    assert!(set.horizontal().contains(Point2::new(0.0, 14_200.0)));
    assert!(!set.horizontal().contains(Point2::new(0.0, 14_300.0)));
    // Both 09/27 circles are swallowed by the larger ones.
    assert_eq!(set.horizontal().circles().len(), 2);

    let result = set.classify(Point3::new(0.0, 16_200.0, 200.0), 0.0);
    assert_eq!(result.zone, Zone::Conical);
    assert_limit(result.build_limit_ft, 250.0);
}

/// A large runway circle may bound the outline on two separate stretches.
#[test]
fn test_outline_revisits_large_circle() {
    let runways = [
        runway(
            "05/23",
            RunwayCategory::NonPrecisionInstrument,
            ("05", 5779.0, -3625.0, ApproachCategory::Visual),
            ("23", 15_989.0, 2884.0, ApproachCategory::Visual),
        ),
        runway(
            "11/29",
            RunwayCategory::Utility,
            ("11", -11_448.0, -9468.0, ApproachCategory::Visual),
            ("29", -4712.0, -12_538.0, ApproachCategory::Visual),
        ),
    ];
    let set = SurfaceSet::build(&runways, SurfaceRules::default()).unwrap();
    assert_eq!(set.horizontal().circles().len(), 4);

    let (c0, c1) = (Point2::new(5779.0, -3625.0), Point2::new(15_989.0, 2884.0));
    let mid = (c0 + c1) * 0.5;
    let north_west = (c0 - c1).normalized().unwrap().right_normal();

    let inside = mid + north_west * 9000.0;
    let result = set.classify(Point3::new(inside.x, inside.y, 100.0), 100.0);
    assert_eq!(result.zone, Zone::Horizontal);
    assert_limit(result.build_limit_ft, 100.0);

    let outside = mid + north_west * 12_000.0;
    let result = set.classify(Point3::new(outside.x, outside.y, 200.0), 0.0);
    assert_eq!(result.zone, Zone::Conical);
    assert_limit(result.build_limit_ft, 250.0);

    assert!(classify(Point3::new(0.0, 0.0, 0.0), &runways, 0.0).is_ok());
}

/// Building once and classifying many times agrees with one-shot classification.
#[test]
fn test_surface_set_reuse() {
    let runways = [utility_09_27()];
    let set = SurfaceSet::build(&runways, SurfaceRules::default()).unwrap();
    for point in [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2500.0, 300.0, 520.0),
        Point3::new(-4000.0, 2000.0, 510.0),
        Point3::new(0.0, 8000.0, 700.0),
    ] {
        assert_eq!(set.classify(point, 500.0), classify(point, &runways, 500.0).unwrap());
    }
}

#[test]
fn test_invalid_runway_rejected() {
    let mut rwy = utility_09_27();
    rwy.end2.point = rwy.end1.point;
    let err = classify(Point3::new(0.0, 0.0, 0.0), &[rwy], 0.0).unwrap_err();
    assert!(matches!(err, SurfaceError::ZeroLengthRunway { .. }));

    let mut rwy = utility_09_27();
    rwy.name = "  ".to_string();
    let err = SurfaceSet::build(&[rwy], SurfaceRules::default()).unwrap_err();
    assert_eq!(err, SurfaceError::EmptyRunwayName);
}
