#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::engine::replay;
    use crate::models::{Transaction, TransactionType};

    fn tx(
        id: &str,
        asset_id: &str,
        kind: TransactionType,
        amount: Decimal,
        date: &str,
    ) -> Transaction {
        Transaction::new(
            id.to_string(),
            asset_id.to_string(),
            "AAPL".to_string(),
            kind,
            amount,
            DateTime::parse_from_rfc3339(date)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn empty_input_yields_zeroed_outcome() {
        let outcome = replay("a1", &[]);

        assert_eq!(*outcome.current_value(), Decimal::ZERO);
        assert_eq!(*outcome.total_invested(), Decimal::ZERO);
        assert!(outcome.price_history().is_empty());
    }

    #[test]
    fn buy_sell_round_trip() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::Sell, dec!(100), "2024-01-02T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert_eq!(*outcome.current_value(), Decimal::ZERO);
        assert_eq!(*outcome.total_invested(), Decimal::ZERO);
        assert_eq!(outcome.price_history().len(), 2);
    }

    #[test]
    fn over_sell_clamps_to_zero() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(50), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::Sell, dec!(100), "2024-01-02T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert_eq!(*outcome.current_value(), Decimal::ZERO);
        assert_eq!(*outcome.total_invested(), Decimal::ZERO);
    }

    #[test]
    fn dividend_leaves_invested_capital_unchanged() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::Dividend, dec!(10), "2024-02-01T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert_eq!(*outcome.current_value(), dec!(110));
        assert_eq!(*outcome.total_invested(), dec!(100));
    }

    #[test]
    fn price_update_is_absolute() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::PriceUpdate, dec!(500), "2024-03-01T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert_eq!(*outcome.current_value(), dec!(500));
        assert_eq!(*outcome.total_invested(), dec!(100));
    }

    #[test]
    fn one_checkpoint_per_transaction() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::Dividend, dec!(5), "2024-01-01T10:00:00Z"),
            tx("t3", "a1", TransactionType::PriceUpdate, dec!(120), "2024-01-01T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        // Same-day repeats still produce one checkpoint each.
        assert_eq!(outcome.price_history().len(), 3);
    }

    #[test]
    fn filters_to_requested_asset() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a2", TransactionType::Buy, dec!(999), "2024-01-01T11:00:00Z"),
            tx("t3", "a2", TransactionType::PriceUpdate, dec!(1), "2024-01-02T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert_eq!(*outcome.current_value(), dec!(100));
        assert_eq!(outcome.price_history().len(), 1);
    }

    #[test]
    fn replay_is_deterministic() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::Sell, dec!(30), "2024-01-05T10:00:00Z"),
            tx("t3", "a1", TransactionType::Dividend, dec!(2), "2024-01-09T10:00:00Z"),
        ];

        let first = replay("a1", &transactions);
        let second = replay("a1", &transactions);

        assert_eq!(first, second);
    }

    #[test]
    fn sorts_chronologically_regardless_of_input_order() {
        // Given out of order: the price update predates the buy, so the buy
        // lands on top of it.
        let transactions = vec![
            tx("t1", "a1", TransactionType::Buy, dec!(100), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::PriceUpdate, dec!(50), "2024-01-01T09:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert_eq!(*outcome.current_value(), dec!(150));
        assert_eq!(*outcome.price_history()[0].value(), dec!(50));
        assert_eq!(*outcome.price_history()[1].value(), dec!(150));
    }

    #[test]
    fn same_instant_ties_keep_insertion_order() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::PriceUpdate, dec!(10), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::PriceUpdate, dec!(20), "2024-01-01T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        // The later-inserted update wins the tie.
        assert_eq!(*outcome.current_value(), dec!(20));
        assert_eq!(outcome.price_history().len(), 2);
    }

    #[test]
    fn outcome_is_never_negative() {
        let transactions = vec![
            tx("t1", "a1", TransactionType::Sell, dec!(500), "2024-01-01T10:00:00Z"),
            tx("t2", "a1", TransactionType::Buy, dec!(10), "2024-01-02T10:00:00Z"),
            tx("t3", "a1", TransactionType::Sell, dec!(50), "2024-01-03T10:00:00Z"),
        ];

        let outcome = replay("a1", &transactions);

        assert!(*outcome.current_value() >= Decimal::ZERO);
        assert!(*outcome.total_invested() >= Decimal::ZERO);
        for point in outcome.price_history() {
            assert!(*point.value() >= Decimal::ZERO);
        }
    }
}
