//! Textbook allocations pinned seat-for-seat, plus bounds and outcome tags.

use ap_algo::{
    allocate_adjusted_divisor, allocate_highest_averages, allocate_largest_remainder,
    allocation::allocate_largest_remainder_with_limits, seed, seed_rounded_down, Apportionment,
    BoundaryDirection, Completion, Contender, Divisor, Initial, Limits, Method, QuotaAdjust,
    Rounding, SeatBounds,
};

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

fn contenders(v: &[(&str, u32)]) -> Vec<Contender> {
    v.iter().map(|&(n, x)| Contender::new(n, f64::from(x))).collect()
}

fn small() -> Vec<Contender> {
    contenders(&[("A", 100), ("B", 80), ("C", 30), ("D", 20)])
}

/// Largest-remainder reference set.
fn colours_lr() -> Vec<Contender> {
    contenders(&[
        ("Yellow", 47_000),
        ("White", 16_000),
        ("Red", 15_800),
        ("Green", 12_000),
        ("Blue", 6_100),
        ("Pink", 3_100),
    ])
}

/// Highest-averages reference set.
fn colours_ha() -> Vec<Contender> {
    contenders(&[
        ("Yellow", 47_000),
        ("White", 16_000),
        ("Red", 15_900),
        ("Green", 12_000),
        ("Blue", 6_000),
        ("Pink", 3_100),
    ])
}

fn greek() -> Vec<Contender> {
    contenders(&[
        ("Alpha", 24_000),
        ("Beta", 56_000),
        ("Gamma", 28_000),
        ("Delta", 17_000),
        ("Epsilon", 65_000),
        ("Zeta", 47_000),
    ])
}

fn five_states() -> Vec<Contender> {
    contenders(&[("A", 25_010), ("B", 8_760), ("C", 11_590), ("D", 9_025), ("E", 15_080)])
}

fn assert_seats(a: &Apportionment, expected: &[(&str, u32)]) {
    for &(name, seats) in expected {
        assert_eq!(a.seats_of(name), Some(seats), "seats for {name} in {:?}", a.rows);
    }
    assert_eq!(a.rows.len(), expected.len());
}

fn assert_direction(a: &Apportionment, name: &str, dir: BoundaryDirection) {
    let row = a.row(name).expect("row present");
    assert_eq!(row.direction, dir, "direction for {name}");
}

fn ha(divisor: Divisor, c: &[Contender], n: u32) -> Apportionment {
    Method::highest_averages(divisor)
        .apportion(c, n, SeatBounds::NONE, &Limits::default())
        .unwrap()
}

// -----------------------------------------------------------------------------
// Highest averages
// -----------------------------------------------------------------------------

#[test]
fn dhondt_four_parties() {
    let a = allocate_highest_averages(Divisor::DHondt, &seed(&small(), 0), 8, None).unwrap();
    let rows: Vec<(&str, u32)> = a.rows.iter().map(|r| (r.name.as_str(), r.seats)).collect();
    assert_eq!(rows, vec![("A", 4), ("B", 3), ("C", 1), ("D", 0)]);
    assert_eq!(a.completion, Completion::Exact);
}

#[test]
fn sainte_lague_three_parties() {
    let c = contenders(&[("A", 53), ("B", 24), ("C", 23)]);
    let a = allocate_highest_averages(Divisor::SainteLague, &seed(&c, 0), 7, None).unwrap();
    assert_seats(&a, &[("A", 3), ("B", 2), ("C", 2)]);
}

#[test]
fn huntington_hill_seeded_with_one() {
    let c = contenders(&[("A", 100_000), ("B", 80_000), ("C", 30_000)]);
    let a = allocate_highest_averages(Divisor::HuntingtonHill, &seed(&c, 1), 8, None).unwrap();
    assert_seats(&a, &[("A", 4), ("B", 3), ("C", 1)]);
}

#[test]
fn divisor_family_on_colours() {
    let c = colours_ha();
    let cases: &[(Divisor, [u32; 6])] = &[
        (Divisor::DHondt, [5, 2, 2, 1, 0, 0]),
        (Divisor::SainteLague, [4, 2, 2, 1, 1, 0]),
        (Divisor::ModifiedSainteLague, [5, 2, 2, 1, 0, 0]),
        (Divisor::Imperiali, [7, 1, 1, 1, 0, 0]),
        (Divisor::Danish, [4, 2, 2, 1, 1, 0]),
    ];
    for (divisor, seats) in cases {
        let a = ha(*divisor, &c, 10);
        let expected: Vec<(&str, u32)> =
            c.iter().map(|x| x.name.as_str()).zip(seats.iter().copied()).collect();
        assert_seats(&a, &expected);
        assert!(a.is_exact(), "{divisor}");
    }
}

/// The first divisor 0.7 holds back a lone first seat more than Sainte-Laguë
/// does, but less than the 1.4-scaled series would.
#[test]
fn modified_sainte_lague_first_divisor() {
    // 60/0.7 = 85.7 beats A's second quotient 100/1.5 = 66.7; at 1.4 B would sit at 42.9.
    let c = contenders(&[("A", 100), ("B", 60)]);
    assert_seats(&ha(Divisor::ModifiedSainteLague, &c, 2), &[("A", 1), ("B", 1)]);

    // 40/0.7 = 57.1 loses to 66.7, where plain Sainte-Laguë gives B 40/0.5 = 80.
    let c = contenders(&[("A", 100), ("B", 40)]);
    assert_seats(&ha(Divisor::ModifiedSainteLague, &c, 2), &[("A", 2), ("B", 0)]);
    assert_seats(&ha(Divisor::SainteLague, &c, 2), &[("A", 1), ("B", 1)]);
}

#[test]
fn dhondt_with_cap_pins_the_leader() {
    let a = allocate_highest_averages(Divisor::DHondt, &seed(&colours_ha(), 0), 10, Some(4)).unwrap();
    assert_seats(
        &a,
        &[("Yellow", 4), ("White", 2), ("Red", 2), ("Green", 2), ("Blue", 0), ("Pink", 0)],
    );
    assert_direction(&a, "Yellow", BoundaryDirection::ForcedMax);
    assert!(a.is_exact());
}

#[test]
fn dhondt_cap_too_low_is_infeasible() {
    let a = allocate_highest_averages(Divisor::DHondt, &seed(&colours_ha(), 0), 10, Some(1)).unwrap();
    assert!(a.rows.iter().all(|r| r.seats == 1));
    assert_eq!(a.awarded(), 6);
    assert_eq!(a.completion, Completion::Infeasible);
}

#[test]
fn rounded_down_seed_then_dhondt() {
    let c = colours_ha();
    let seeded = seed_rounded_down(&c, 10, SeatBounds::NONE).unwrap();
    let a = allocate_highest_averages(Divisor::DHondt, &seeded, 10, None).unwrap();
    assert_seats(
        &a,
        &[("Yellow", 5), ("White", 2), ("Red", 2), ("Green", 1), ("Blue", 0), ("Pink", 0)],
    );

    let via_method = Method::HighestAverages { divisor: Divisor::DHondt, initial: Initial::RoundedDown }
        .apportion(&c, 10, SeatBounds::NONE, &Limits::default())
        .unwrap();
    assert_eq!(via_method, a);
}

#[test]
fn huntington_hill_greek_and_five_states() {
    let a = ha(Divisor::HuntingtonHill, &greek(), 25);
    assert_seats(
        &a,
        &[("Alpha", 2), ("Beta", 6), ("Gamma", 3), ("Delta", 2), ("Epsilon", 7), ("Zeta", 5)],
    );
    let a = ha(Divisor::HuntingtonHill, &five_states(), 42);
    assert_seats(&a, &[("A", 15), ("B", 5), ("C", 7), ("D", 6), ("E", 9)]);
}

// -----------------------------------------------------------------------------
// Largest remainder
// -----------------------------------------------------------------------------

#[test]
fn hare_colours() {
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &colours_lr(), 10, SeatBounds::NONE).unwrap();
    assert_seats(
        &a,
        &[("Yellow", 5), ("White", 2), ("Red", 1), ("Green", 1), ("Blue", 1), ("Pink", 0)],
    );
    let order: Vec<&str> = a.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["Yellow", "White", "Red", "Green", "Blue", "Pink"]);
}

#[test]
fn droop_and_imperiali_colours() {
    for quota in [QuotaAdjust::Droop, QuotaAdjust::Imperiali] {
        let a = allocate_largest_remainder(quota, &colours_lr(), 10, SeatBounds::NONE).unwrap();
        assert_seats(
            &a,
            &[("Yellow", 5), ("White", 2), ("Red", 2), ("Green", 1), ("Blue", 0), ("Pink", 0)],
        );
    }
}

#[test]
fn hare_greek_and_five_states() {
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &greek(), 20, SeatBounds::NONE).unwrap();
    assert_seats(
        &a,
        &[("Alpha", 2), ("Beta", 5), ("Gamma", 2), ("Delta", 1), ("Epsilon", 6), ("Zeta", 4)],
    );
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &five_states(), 42, SeatBounds::NONE)
        .unwrap();
    assert_seats(&a, &[("A", 15), ("B", 5), ("C", 7), ("D", 6), ("E", 9)]);
}

/// Adding a seat costs C one: expected behaviour of quota methods, not a defect.
#[test]
fn alabama_paradox_is_expected() {
    let c = contenders(&[("A", 6), ("B", 6), ("C", 2)]);
    let ten = allocate_largest_remainder(QuotaAdjust::Hare, &c, 10, SeatBounds::NONE).unwrap();
    let eleven = allocate_largest_remainder(QuotaAdjust::Hare, &c, 11, SeatBounds::NONE).unwrap();
    assert_seats(&ten, &[("A", 4), ("B", 4), ("C", 2)]);
    assert_seats(&eleven, &[("A", 5), ("B", 5), ("C", 1)]);
    assert!(eleven.seats_of("C") < ten.seats_of("C"));
}

#[test]
fn hare_with_minimum_one() {
    for bounds in [SeatBounds::with_min(1), SeatBounds { min: Some(1), max: Some(4) }] {
        let a = allocate_largest_remainder(QuotaAdjust::Hare, &colours_lr(), 10, bounds).unwrap();
        assert_seats(
            &a,
            &[("Yellow", 4), ("White", 2), ("Red", 1), ("Green", 1), ("Blue", 1), ("Pink", 1)],
        );
        assert_direction(&a, "Blue", BoundaryDirection::ForcedMin);
        assert_direction(&a, "Pink", BoundaryDirection::ForcedMin);
        assert!(a.is_exact());
    }
}

#[test]
fn hare_with_maximum_three() {
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &colours_lr(), 10, SeatBounds::with_max(3))
        .unwrap();
    assert_seats(
        &a,
        &[("Yellow", 3), ("White", 2), ("Red", 2), ("Green", 2), ("Blue", 1), ("Pink", 0)],
    );
    assert_direction(&a, "Yellow", BoundaryDirection::ForcedMax);
    assert!(a.is_exact());
}

#[test]
fn hare_with_minimum_and_maximum_together() {
    let c = contenders(&[("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1), ("F", 9)]);
    let bounds = SeatBounds::new(Some(1), Some(2)).unwrap();
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &c, 8, bounds).unwrap();
    // F is capped first; the remaining quota 5/6 gives everyone one seat and A the tie.
    assert_seats(&a, &[("A", 2), ("B", 1), ("C", 1), ("D", 1), ("E", 1), ("F", 2)]);
    assert_direction(&a, "F", BoundaryDirection::ForcedMax);
    assert_direction(&a, "A", BoundaryDirection::ForcedMax);
    assert_direction(&a, "B", BoundaryDirection::Unforced);
    assert_eq!(a.awarded(), 8);
    assert!(a.is_exact());
}

#[test]
fn voteless_minimums_beside_a_capped_leader() {
    let c = contenders(&[("A", 100), ("C", 0), ("D", 0)]);
    let bounds = SeatBounds::new(Some(1), Some(2)).unwrap();
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &c, 3, bounds).unwrap();
    assert_seats(&a, &[("A", 1), ("C", 1), ("D", 1)]);
    assert_direction(&a, "A", BoundaryDirection::Unforced);
    assert_direction(&a, "C", BoundaryDirection::ForcedMin);
    assert!(a.is_exact());

    let a = allocate_largest_remainder(QuotaAdjust::Hare, &c, 4, bounds).unwrap();
    assert_seats(&a, &[("A", 2), ("C", 1), ("D", 1)]);
    assert!(a.is_exact());
}

#[test]
fn hare_minimums_over_target_are_infeasible() {
    let a = allocate_largest_remainder(QuotaAdjust::Hare, &colours_lr(), 10, SeatBounds::with_min(3))
        .unwrap();
    assert!(a.rows.iter().all(|r| r.seats == 3 && r.direction == BoundaryDirection::ForcedMin));
    assert_eq!(a.completion, Completion::Infeasible);
    assert_eq!(a.gap(), -8);
}

#[test]
fn retry_bound_is_fatal() {
    let c = contenders(&[("A", 50), ("B", 50)]);
    let limits = Limits { max_quota_attempts: 2, ..Limits::default() };
    let err = allocate_largest_remainder_with_limits(
        QuotaAdjust::Imperiali,
        &c,
        1,
        SeatBounds::NONE,
        &limits,
    )
    .unwrap_err();
    assert_eq!(err, ap_algo::AllocError::RetryBoundExceeded { attempts: 2 });
}

// -----------------------------------------------------------------------------
// Adjusted divisor
// -----------------------------------------------------------------------------

#[test]
fn webster_differs_from_dhondt_on_small_set() {
    let web = allocate_adjusted_divisor(Rounding::Nearest, &small(), 8, SeatBounds::NONE).unwrap();
    assert_seats(&web, &[("A", 3), ("B", 3), ("C", 1), ("D", 1)]);
    let dh = ha(Divisor::DHondt, &small(), 8);
    assert_ne!(web.seats_of("D"), dh.seats_of("D"));
}

#[test]
fn three_roundings_on_greek() {
    let cases: &[(Rounding, [u32; 6])] = &[
        (Rounding::Down, [2, 6, 3, 2, 7, 5]),
        (Rounding::Up, [3, 6, 3, 2, 6, 5]),
        (Rounding::Nearest, [2, 6, 3, 2, 7, 5]),
    ];
    let c = greek();
    for (rounding, seats) in cases {
        let a = allocate_adjusted_divisor(*rounding, &c, 25, SeatBounds::NONE).unwrap();
        let expected: Vec<(&str, u32)> =
            c.iter().map(|x| x.name.as_str()).zip(seats.iter().copied()).collect();
        assert_seats(&a, &expected);
        assert!(a.is_exact(), "{rounding}");
    }
}

#[test]
fn three_roundings_on_five_states() {
    let cases: &[(Rounding, [u32; 5])] = &[
        (Rounding::Down, [16, 5, 7, 5, 9]),
        (Rounding::Up, [15, 5, 7, 6, 9]),
        (Rounding::Nearest, [15, 5, 7, 6, 9]),
    ];
    let c = five_states();
    for (rounding, seats) in cases {
        let a = allocate_adjusted_divisor(*rounding, &c, 42, SeatBounds::NONE).unwrap();
        let expected: Vec<(&str, u32)> =
            c.iter().map(|x| x.name.as_str()).zip(seats.iter().copied()).collect();
        assert_seats(&a, &expected);
    }
}

#[test]
fn webster_with_minimum_one() {
    for bounds in [SeatBounds::with_min(1), SeatBounds { min: Some(1), max: Some(4) }] {
        let a = allocate_adjusted_divisor(Rounding::Nearest, &colours_lr(), 10, bounds).unwrap();
        assert_seats(
            &a,
            &[("Yellow", 4), ("White", 2), ("Red", 1), ("Green", 1), ("Blue", 1), ("Pink", 1)],
        );
        assert_direction(&a, "Pink", BoundaryDirection::ForcedMin);
        assert!(a.is_exact());
    }
}

#[test]
fn jefferson_with_maximum_two() {
    let a = allocate_adjusted_divisor(Rounding::Down, &colours_lr(), 10, SeatBounds::with_max(2))
        .unwrap();
    assert_seats(
        &a,
        &[("Yellow", 2), ("White", 2), ("Red", 2), ("Green", 2), ("Blue", 1), ("Pink", 1)],
    );
    for name in ["Yellow", "White", "Red", "Green"] {
        assert_direction(&a, name, BoundaryDirection::ForcedMax);
    }
    assert!(a.is_exact());
}

#[test]
fn all_pinned_at_minimum_is_infeasible() {
    for min in [2, 3] {
        let a = allocate_adjusted_divisor(Rounding::Down, &colours_lr(), 10, SeatBounds::with_min(min))
            .unwrap();
        assert!(a.rows.iter().all(|r| r.direction == BoundaryDirection::ForcedMin));
        assert_eq!(a.completion, Completion::Infeasible);
    }
}

#[test]
fn simultaneous_flip_returns_tagged_near_match() {
    let c = contenders(&[("A", 1), ("B", 1)]);
    let a = allocate_adjusted_divisor(Rounding::Nearest, &c, 1, SeatBounds::NONE).unwrap();
    assert_eq!(a.completion, Completion::Approximate);
    assert_eq!(a.awarded(), 0);
}
