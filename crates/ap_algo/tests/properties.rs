//! Property tests: seat totals, permutation invariance, monotonicity, bounds.

use ap_algo::{
    allocate_adjusted_divisor, allocate_highest_averages, seed, Completion, Contender, Divisor, Limits, Method, QuotaAdjust,
    Rounding, SeatBounds,
};
use proptest::prelude::*;

fn build(votes: &[u32]) -> Vec<Contender> {
    votes
        .iter()
        .enumerate()
        .map(|(i, &v)| Contender::new(format!("P{i:02}"), f64::from(v)))
        .collect()
}

fn plain_divisors() -> impl Strategy<Value = Divisor> {
    prop::sample::select(vec![
        Divisor::Danish,
        Divisor::SainteLague,
        Divisor::ModifiedSainteLague,
        Divisor::SquareMean,
        Divisor::DHondt,
        Divisor::Imperiali,
    ])
}

fn quotas() -> impl Strategy<Value = QuotaAdjust> {
    prop::sample::select(QuotaAdjust::ALL.to_vec())
}

fn roundings() -> impl Strategy<Value = Rounding> {
    prop::sample::select(Rounding::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn highest_averages_fill_every_seat(
        votes in prop::collection::vec(1u32..200_000, 1..10),
        n in 1u32..60,
        divisor in plain_divisors(),
    ) {
        let c = build(&votes);
        let a = allocate_highest_averages(divisor, &seed(&c, 0), n, None).unwrap();
        prop_assert_eq!(a.awarded(), u64::from(n));
        prop_assert_eq!(a.completion, Completion::Exact);
    }

    #[test]
    fn largest_remainder_fills_every_seat(
        votes in prop::collection::vec(1u32..200_000, 1..10),
        n in 1u32..60,
        quota in quotas(),
    ) {
        let c = build(&votes);
        let a = Method::largest_remainder(quota)
            .apportion(&c, n, SeatBounds::NONE, &Limits::default())
            .unwrap();
        prop_assert_eq!(a.awarded(), u64::from(n));
    }

    #[test]
    fn adjusted_divisor_is_exact_or_tagged(
        votes in prop::collection::vec(1u32..200_000, 1..10),
        n in 1u32..60,
        rounding in roundings(),
    ) {
        let c = build(&votes);
        let a = Method::adjusted_divisor(rounding)
            .apportion(&c, n, SeatBounds::NONE, &Limits::default())
            .unwrap();
        prop_assert_eq!(a.completion == Completion::Exact, a.awarded() == u64::from(n));
    }

    #[test]
    fn result_ignores_input_order(
        votes in prop::collection::vec(1u32..1_000, 2..8),
        n in 1u32..30,
    ) {
        let c = build(&votes);
        let mut r = c.clone();
        r.reverse();
        for m in Method::standard_set() {
            let lim = Limits::default();
            let x = m.apportion(&c, n, SeatBounds::NONE, &lim);
            let y = m.apportion(&r, n, SeatBounds::NONE, &lim);
            prop_assert_eq!(x, y, "{}", m.label());
        }
    }

    #[test]
    fn more_votes_never_cost_a_divisor_seat(
        votes in prop::collection::vec(1u32..100_000, 2..8),
        bump in 1u32..50_000,
        n in 1u32..40,
        divisor in plain_divisors(),
    ) {
        let before = build(&votes);
        let mut after = before.clone();
        after[0].votes += f64::from(bump);
        let a = allocate_highest_averages(divisor, &seed(&before, 0), n, None).unwrap();
        let b = allocate_highest_averages(divisor, &seed(&after, 0), n, None).unwrap();
        prop_assert!(b.seats_of("P00") >= a.seats_of("P00"));
    }

    #[test]
    fn more_votes_never_cost_an_adjusted_divisor_seat(
        votes in prop::collection::vec(1u32..100_000, 2..8),
        bump in 1u32..50_000,
        n in 1u32..40,
        rounding in roundings(),
    ) {
        let before = build(&votes);
        let mut after = before.clone();
        after[0].votes += f64::from(bump);
        let a = allocate_adjusted_divisor(rounding, &before, n, SeatBounds::NONE);
        let b = allocate_adjusted_divisor(rounding, &after, n, SeatBounds::NONE);
        // Ties and rejected sizes end inexact; only settled pairs are comparable.
        if let (Ok(a), Ok(b)) = (a, b) {
            if a.is_exact() && b.is_exact() {
                prop_assert!(b.seats_of("P00") >= a.seats_of("P00"), "{}", rounding);
            }
        }
    }

    #[test]
    fn uniform_bounds_are_honoured(
        votes in prop::collection::vec(1u32..100_000, 1..8),
        min in 1u32..3,
        span in 0u32..4,
        fill in 0.0f64..=1.0,
        quota in quotas(),
    ) {
        let c = build(&votes);
        let len = c.len() as u32;
        let max = min + span;
        // Any target within [len·min, len·max] is reachable.
        let n = len * min + ((f64::from(len * span) * fill).round() as u32);
        let bounds = SeatBounds::new(Some(min), Some(max)).unwrap();
        let a = Method::largest_remainder(quota)
            .apportion(&c, n, bounds, &Limits::default())
            .unwrap();
        prop_assert!(a.rows.iter().all(|r| (min..=max).contains(&r.seats)), "{:?}", a.rows);
        prop_assert_eq!(a.awarded(), u64::from(n));
        prop_assert_eq!(a.completion, Completion::Exact);

        let floor_only = Method::largest_remainder(quota)
            .apportion(&c, n, SeatBounds::with_min(min), &Limits::default())
            .unwrap();
        prop_assert!(floor_only.rows.iter().all(|r| r.seats >= min));
        prop_assert_eq!(floor_only.awarded(), u64::from(n));
    }
}
