//! Property tests for schedule invariants.

use payoff_engine::{simulate, LoanSnapshot, Money, ScheduleStatus, Strategy};
use proptest::collection::vec;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest, ProptestConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cmp::Ordering;

const STRATEGIES: [Strategy; 6] = [
    Strategy::Snowball,
    Strategy::Avalanche,
    Strategy::HighestBalance,
    Strategy::LowestPayment,
    Strategy::HighestPayment,
    Strategy::Custom,
];

/// Builds loans whose minimum always exceeds the first month's interest.
///
/// Each tuple is `(balance_cents, rate_basis_points, extra_minimum_cents)`.
fn build_loans(params: &[(i64, i64, i64)]) -> (Vec<LoanSnapshot>, Decimal) {
    let mut total_minimum = Decimal::ZERO;
    let loans = params
        .iter()
        .enumerate()
        .map(|(idx, &(balance_cents, rate_bp, extra_cents))| {
            let interest_cents = balance_cents * rate_bp / 120_000;
            let minimum = Decimal::new(interest_cents + 1 + extra_cents, 2);
            total_minimum += minimum;
            LoanSnapshot::new(
                format!("loan-{}", idx),
                format!("Loan {}", idx),
                Decimal::new(balance_cents, 2),
                Decimal::new(rate_bp, 2),
                minimum,
            )
        })
        .collect();
    (loans, total_minimum)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_schedule_invariants_hold(
        params in vec((100i64..500_000, 0i64..3000, 0i64..20_000), 1..5),
        surplus_cents in 0i64..50_000,
        strategy_idx in 0usize..6,
    ) {
        let (loans, total_minimum) = build_loans(&params);
        let budget = total_minimum + Decimal::new(surplus_cents, 2);
        let strategy = STRATEGIES[strategy_idx];

        let schedule = simulate(&loans, strategy, budget).unwrap();

        prop_assert!(
            schedule.status == ScheduleStatus::Ok
                || schedule.status == ScheduleStatus::DidNotConverge
        );
        prop_assert!(schedule.months.len() <= 600);

        let mut previous_debt: Option<Money> = None;
        for (idx, month) in schedule.months.iter().enumerate() {
            prop_assert_eq!(month.month_number as usize, idx + 1);

            // remaining debt never increases when minimums cover interest
            if let Some(previous) = previous_debt {
                prop_assert!(month.remaining_debt_total <= previous);
            }
            previous_debt = Some(month.remaining_debt_total);

            let mut above_minimum = 0;
            for detail in &month.loan_breakdown {
                let split = detail.principal_portion.as_decimal()
                    + detail.interest_portion.as_decimal();
                prop_assert!((split - detail.payment.as_decimal()).abs() <= dec!(0.01));
                prop_assert!(detail.ending_balance >= Money::ZERO);
                prop_assert!(detail.interest_portion <= detail.interest_charged);

                let minimum = loans
                    .iter()
                    .find(|l| l.id == detail.loan_id)
                    .map(|l| Money::round(l.minimum_payment))
                    .unwrap();
                if detail.payment > minimum {
                    above_minimum += 1;
                }
            }
            prop_assert!(above_minimum <= 1);
            prop_assert!(month.total_payment <= Money::round(budget));
        }

        if schedule.status == ScheduleStatus::Ok {
            if let Some(last) = schedule.months.last() {
                prop_assert!(last.remaining_debt_total <= Money::round(dec!(0.01)));
            }
        }
    }

    #[test]
    fn prop_ordering_is_stable_and_repeatable(
        params in vec((0i64..5_000, 0i64..500, 0i64..300), 0..8),
        strategy_idx in 0usize..6,
    ) {
        let (loans, _) = build_loans(&params);
        let strategy = STRATEGIES[strategy_idx];

        let first = strategy.prioritize(&loans);
        let second = strategy.prioritize(&loans);
        prop_assert_eq!(&first, &second);

        prop_assert!(first.iter().all(|l| l.is_active()));
        prop_assert_eq!(first.len(), loans.iter().filter(|l| l.is_active()).count());

        for pair in first.windows(2) {
            let ordering = strategy.compare(pair[0], pair[1]);
            prop_assert!(ordering != Ordering::Greater);

            // equal keys keep the caller's order
            if ordering == Ordering::Equal {
                let pos = |id: &str| loans.iter().position(|l| l.id == id).unwrap();
                prop_assert!(pos(&pair[0].id) < pos(&pair[1].id));
            }
        }
    }
}
