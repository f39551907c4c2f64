use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spread_trade::{PairGenerator, SignalAction, SpreadRules, SpreadSeries, SpreadSignal};

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

#[test]
fn test_generated_pair_produces_signals() {
    let mut rng = StdRng::seed_from_u64(11);
    let points = PairGenerator::default()
        .generate_until(180, end_date(), &mut rng)
        .unwrap();
    let spread = SpreadSeries::from_pair_points(&points);

    assert_eq!(spread.len(), 181);
    assert_eq!(spread.latest().unwrap().date, end_date());

    let signals = SpreadRules::default().evaluate(&spread);
    assert!(!signals.is_empty());
    for signal in &signals {
        assert!((0.0..=1.0).contains(&signal.strength));
        assert!(!signal.message.is_empty());
    }
    // Neutral never appears alongside a fired rule
    if signals.iter().any(|s| s.action == SignalAction::Neutral) {
        assert_eq!(signals.len(), 1);
    }
}

#[test]
fn test_same_seed_same_signals() {
    let generator = PairGenerator::default();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = generator.generate_until(120, end_date(), &mut rng).unwrap();
        SpreadRules::default().evaluate(&SpreadSeries::from_pair_points(&points))
    };
    assert_eq!(run(3), run(3));
}

#[test]
fn test_strongly_correlated_legs() {
    let generator = PairGenerator {
        correlation: 0.95,
        ..PairGenerator::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let points = generator.generate_until(250, end_date(), &mut rng).unwrap();
    let spread = SpreadSeries::from_pair_points(&points);

    // Price levels drift together, so their correlation stays positive
    assert!(spread.leg_correlation() > 0.0);
}

#[test]
fn test_short_generated_history_is_neutral() {
    let mut rng = StdRng::seed_from_u64(1);
    let points = PairGenerator::default()
        .generate_until(30, end_date(), &mut rng)
        .unwrap();
    let signals = SpreadRules::default().evaluate(&SpreadSeries::from_pair_points(&points));
    assert_eq!(signals, vec![SpreadSignal::neutral()]);
}

#[test]
fn test_invalid_correlation_rejected() {
    let generator = PairGenerator {
        correlation: 1.5,
        ..PairGenerator::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    assert!(generator.generate_until(10, end_date(), &mut rng).is_err());
}
