//! Property-based tests for ReversalService.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{Currency, JournalLineId};

use crate::journal::header::JournalEntryHeader;
use crate::journal::line::AccountRef;
use crate::journal::submission::{JournalEntrySubmission, SubmissionLine};
use crate::workflow::reversal::ReversalService;

/// Strategy for generating random positive Decimal amounts.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn sided_line(number: usize, amount: Decimal, debit: bool) -> SubmissionLine {
    SubmissionLine {
        id: JournalLineId::new(),
        line_number: number,
        account: Some(AccountRef::new(format!("{}", 1000 + number), "Account")),
        description: String::new(),
        debit_amount: if debit { amount } else { Decimal::ZERO },
        credit_amount: if debit { Decimal::ZERO } else { amount },
        cost_center: None,
        dimension1: None,
        dimension2: None,
    }
}

/// Balanced entries of 2-8 lines: each amount appears once as a debit and
/// once as a credit.
fn arb_entry() -> impl Strategy<Value = JournalEntrySubmission> {
    prop::collection::vec(arb_amount(), 1..=4).prop_map(|amounts| {
        let mut lines = Vec::new();
        for amount in amounts {
            lines.push(sided_line(lines.len() + 1, amount, true));
            lines.push(sided_line(lines.len() + 1, amount, false));
        }
        let header = JournalEntryHeader::new(NaiveDate::from_ymd_opt(2024, 6, 30), Currency::Usd)
            .with_description("Accrual");
        JournalEntrySubmission::new(header, lines)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The reversing entry is balanced and mirrors the original totals.
    #[test]
    fn prop_reversal_is_balanced_mirror(entry in arb_entry()) {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let reversal = ReversalService::create_reversing_entry(&entry, "JE-2024-0001", date);

        prop_assert_eq!(reversal.totals.total_debit, entry.totals.total_credit);
        prop_assert_eq!(reversal.totals.total_credit, entry.totals.total_debit);
        prop_assert_eq!(reversal.lines.len(), entry.lines.len());
    }

    /// Original plus reversal nets to zero on every line.
    #[test]
    fn prop_reversal_nets_to_zero(entry in arb_entry()) {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let reversal = ReversalService::create_reversing_entry(&entry, "JE-2024-0001", date);

        for (before, after) in entry.lines.iter().zip(&reversal.lines) {
            prop_assert_eq!(&before.account, &after.account);
            let net = before.debit_amount - before.credit_amount
                + after.debit_amount - after.credit_amount;
            prop_assert_eq!(net, Decimal::ZERO);
        }
    }
}
