mod common;

use common::{date, setup_test_env};
use expense_core::{
    config::Config,
    core::services::{ExpenseDraft, ExpenseService, ServiceError, SummaryOptions, SummaryService},
    domain::YearMonth,
    errors::ExpenseError,
    ledger::SeriesOrder,
};

#[test]
fn service_flow_persists_through_manager() {
    let (mut manager, _config) = setup_test_env();
    let ledger = manager.create("household").unwrap();

    let laptop = ExpenseService::add(
        ledger,
        ExpenseDraft::long_term("Laptop", 1200.0, date(2024, 1, 15), 0.0, date(2024, 4, 15)),
    )
    .unwrap();
    ExpenseService::add(
        ledger,
        ExpenseDraft::one_time("Dinner", 50.0, date(2024, 3, 10)),
    )
    .unwrap();
    manager.save().unwrap();

    let reloaded = manager.load("household").unwrap();
    assert_eq!(reloaded.expense_count(), 2);
    assert_eq!(reloaded.expense(laptop).unwrap().monthly_amount, Some(400.0));

    let totals = SummaryService::monthly_totals(reloaded, SummaryOptions::default());
    assert_eq!(
        totals,
        vec![
            (YearMonth::new(2024, 1).unwrap(), 400.0),
            (YearMonth::new(2024, 2).unwrap(), 400.0),
            (YearMonth::new(2024, 3).unwrap(), 450.0),
        ]
    );
}

#[test]
fn switching_a_record_to_one_time_clears_term_fields() {
    let (mut manager, _config) = setup_test_env();
    let ledger = manager.create("switch").unwrap();
    let id = ExpenseService::add(
        ledger,
        ExpenseDraft::long_term("Bike", 600.0, date(2024, 5, 1), 3.0, date(2024, 11, 1)),
    )
    .unwrap();

    ExpenseService::update(ledger, id, ExpenseDraft::one_time("Bike", 600.0, date(2024, 5, 1)))
        .unwrap();

    let record = ledger.expense(id).unwrap();
    assert!(!record.long_term);
    assert_eq!(record.interest_rate, None);
    assert_eq!(record.end_date, None);
    assert_eq!(record.monthly_amount, None);

    let series = SummaryService::chart_series(ledger, SummaryOptions::default());
    assert_eq!(series.month, vec!["2024-05"]);
    assert_eq!(series.expenses, vec![600.0]);
}

#[test]
fn validation_errors_map_to_invalid_input() {
    let (mut manager, _config) = setup_test_env();
    let ledger = manager.create("strict").unwrap();

    let mut draft = ExpenseDraft::one_time("Loan", 5000.0, date(2024, 1, 1));
    draft.long_term = true;
    draft.end_date = Some(date(2025, 1, 1));

    let err = ExpenseService::add(ledger, draft).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(matches!(
        ExpenseError::from(err),
        ExpenseError::InvalidInput(message) if message.contains("Interest rate")
    ));
    assert_eq!(ledger.expense_count(), 0);
}

#[test]
fn config_order_drives_summary() {
    let (mut manager, config_manager) = setup_test_env();
    let mut config = Config::default();
    config.set("series_order", "chronological").unwrap();
    config_manager.save(&config).unwrap();

    let ledger = manager.create("ordered").unwrap();
    ExpenseService::add(ledger, ExpenseDraft::one_time("Late", 10.0, date(2024, 9, 1))).unwrap();
    ExpenseService::add(ledger, ExpenseDraft::one_time("Early", 20.0, date(2024, 2, 1))).unwrap();

    let loaded = config_manager.load().unwrap();
    assert_eq!(loaded.series_order, SeriesOrder::Chronological);
    let series = SummaryService::chart_series(ledger, SummaryOptions::from(&loaded));
    assert_eq!(series.month, vec!["2024-02", "2024-09"]);
}
