mod common;

use common::date;
use expense_core::{
    domain::{months_between, ExpenseRecord, YearMonth},
    ledger::{
        aggregate, compute_monthly_payment, InstallmentBoundary, Ledger, MonthlyAggregator,
        SeriesOrder,
    },
};

fn month(label: &str) -> YearMonth {
    label.parse().expect("valid month label")
}

fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new("properties");
    ledger.add_expense(ExpenseRecord::long_term(
        "Car",
        18_000.0,
        date(2023, 11, 20),
        6.5,
        date(2025, 2, 20),
    ));
    ledger.add_expense(ExpenseRecord::long_term(
        "Phone",
        900.0,
        date(2024, 1, 31),
        0.0,
        date(2024, 7, 31),
    ));
    ledger.add_expense(ExpenseRecord::one_time("Flight", 320.0, date(2024, 3, 2)));
    ledger.add_expense(ExpenseRecord::one_time("Gift", 45.5, date(2023, 12, 24)));
    ledger
}

#[test]
fn three_month_loan_spreads_evenly() {
    let records = vec![ExpenseRecord::long_term(
        "Laptop",
        1200.0,
        date(2024, 1, 15),
        0.0,
        date(2024, 4, 15),
    )];
    let breakdown = aggregate(&records);
    let series = breakdown.series();
    assert_eq!(
        series,
        vec![
            (month("2024-01"), 400.0),
            (month("2024-02"), 400.0),
            (month("2024-03"), 400.0),
        ]
    );
}

#[test]
fn one_time_expense_lands_in_its_month() {
    let records = vec![ExpenseRecord::one_time("Dinner", 50.0, date(2024, 3, 9))];
    let breakdown = aggregate(&records);
    assert_eq!(breakdown.series(), vec![(month("2024-03"), 50.0)]);
    assert!(breakdown.skipped.is_empty());
}

#[test]
fn installment_sums_match_scheduled_totals() {
    let ledger = sample_ledger();
    let breakdown = ledger.monthly_breakdown(InstallmentBoundary::Installments);
    let expected: f64 = ledger.expenses.iter().map(ExpenseRecord::scheduled_total).sum();
    assert!((breakdown.total() - expected).abs() < 1e-6);

    for record in ledger.expenses.iter().filter(|record| record.long_term) {
        let charges = breakdown
            .buckets()
            .iter()
            .flat_map(|bucket| bucket.contributions.iter())
            .filter(|item| item.expense_id == record.id)
            .count() as i64;
        let end = record.end_date.unwrap();
        assert_eq!(charges, months_between(record.date, end));
    }
}

#[test]
fn contributions_fall_inside_their_expense_term() {
    let breakdown = sample_ledger().monthly_breakdown(InstallmentBoundary::Installments);
    for bucket in breakdown.buckets() {
        for item in &bucket.contributions {
            let first = YearMonth::of(item.date);
            match item.end_date {
                Some(end) => assert!(first <= bucket.month && bucket.month < YearMonth::of(end)),
                None => assert_eq!(first, bucket.month),
            }
        }
    }
}

#[test]
fn chronological_order_is_sorted_and_keeps_totals() {
    let ledger = sample_ledger();
    let first_seen = ledger
        .monthly_breakdown(InstallmentBoundary::Installments)
        .ordered(SeriesOrder::FirstSeen);
    let sorted = ledger
        .monthly_breakdown(InstallmentBoundary::Installments)
        .ordered(SeriesOrder::Chronological);

    let months: Vec<_> = sorted.series().into_iter().map(|(month, _)| month).collect();
    assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(first_seen.len(), sorted.len());
    assert!((first_seen.total() - sorted.total()).abs() < 1e-9);
    assert_eq!(first_seen.buckets()[0].month, month("2023-11"));
}

#[test]
fn through_end_date_adds_the_closing_month() {
    let records = vec![ExpenseRecord::long_term(
        "Laptop",
        1200.0,
        date(2024, 1, 15),
        0.0,
        date(2024, 4, 15),
    )];
    let breakdown = MonthlyAggregator::new(InstallmentBoundary::ThroughEndDate).aggregate(&records);
    assert_eq!(breakdown.len(), 4);
    assert_eq!(breakdown.get(month("2024-04")).unwrap().total(), 400.0);
}

#[test]
fn long_term_without_monthly_amount_is_reported() {
    let mut orphan = ExpenseRecord::one_time("Orphan", 300.0, date(2024, 2, 1));
    orphan.long_term = true;
    orphan.end_date = Some(date(2024, 6, 1));
    let records = vec![
        orphan.clone(),
        ExpenseRecord::one_time("Coffee", 4.0, date(2024, 2, 3)),
    ];

    let breakdown = aggregate(&records);
    assert_eq!(breakdown.skipped, vec![orphan.id]);
    assert_eq!(breakdown.series(), vec![(month("2024-02"), 4.0)]);
}

#[test]
fn amortized_payment_matches_known_schedule() {
    let payment = compute_monthly_payment(10_000.0, 12.0, date(2024, 1, 1), date(2025, 1, 1));
    assert!((payment - 888.4879).abs() < 1e-3, "{payment}");
    assert_eq!(
        compute_monthly_payment(500.0, 4.0, date(2024, 5, 1), date(2024, 5, 28)),
        0.0
    );
}
