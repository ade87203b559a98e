//! Property-based tests for draft editing and auto-balance.
//!
//! Edits are generated as random operation sequences against line indexes,
//! so rejected operations (unknown position, too few lines) are exercised
//! alongside successful ones.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::Currency;

use crate::journal::auto_balance::{AutoBalanceOutcome, AutoBalancer, Confirmation};
use crate::journal::draft::JournalEntryDraft;
use crate::journal::error::JournalError;
use crate::journal::header::JournalEntryHeader;
use crate::journal::line::JournalLine;
use crate::journal::policy::BalancePolicy;
use crate::journal::validation::{validate_for_draft, validate_for_posting};

#[derive(Debug, Clone)]
enum Edit {
    Add,
    Remove(usize),
    Duplicate(usize),
    Move(usize, usize),
    Debit(usize, i64),
    Credit(usize, i64),
}

fn arb_cents() -> impl Strategy<Value = i64> {
    0i64..100_000_000
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::Add),
        (0usize..8).prop_map(Edit::Remove),
        (0usize..8).prop_map(Edit::Duplicate),
        (0usize..8, 0usize..9).prop_map(|(i, p)| Edit::Move(i, p)),
        (0usize..8, arb_cents()).prop_map(|(i, c)| Edit::Debit(i, c)),
        (0usize..8, arb_cents()).prop_map(|(i, c)| Edit::Credit(i, c)),
    ]
}

fn fresh() -> JournalEntryDraft {
    JournalEntryDraft::new(JournalEntryHeader::new(None, Currency::Usd))
}

/// Applies an edit; rejected edits keep the previous draft.
fn apply(draft: &JournalEntryDraft, edit: &Edit) -> JournalEntryDraft {
    let id_at = |index: usize| draft.lines()[index % draft.len()].id();
    let result = match *edit {
        Edit::Add => Ok(draft.add_line()),
        Edit::Remove(i) => draft.remove_line(id_at(i)),
        Edit::Duplicate(i) => draft.duplicate_line(id_at(i)),
        Edit::Move(i, position) => draft.move_line(id_at(i), position),
        Edit::Debit(i, cents) => draft.set_debit(id_at(i), Decimal::new(cents, 2)),
        Edit::Credit(i, cents) => draft.set_credit(id_at(i), Decimal::new(cents, 2)),
    };
    result.unwrap_or_else(|_| draft.clone())
}

fn build(edits: &[Edit]) -> JournalEntryDraft {
    edits.iter().fold(fresh(), |draft, edit| apply(&draft, edit))
}

fn amounts(line: &JournalLine) -> (Decimal, Decimal) {
    (line.debit_amount(), line.credit_amount())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Removing lines never takes the draft below two.
    #[test]
    fn prop_line_count_never_below_minimum(
        edits in prop::collection::vec(arb_edit(), 0..30),
        removals in prop::collection::vec(0usize..8, 0..20),
    ) {
        let mut draft = build(&edits);
        for index in removals {
            let id = draft.lines()[index % draft.len()].id();
            match draft.remove_line(id) {
                Ok(next) => draft = next,
                Err(err) => {
                    prop_assert_eq!(draft.len(), 2);
                    let is_too_few = matches!(err, JournalError::TooFewLines { .. });
                    prop_assert!(is_too_few);
                }
            }
            prop_assert!(draft.len() >= 2);
        }
    }

    /// Line numbers are always exactly 1..=N in order.
    #[test]
    fn prop_line_numbers_dense(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let draft = build(&edits);
        let numbers: Vec<usize> = draft.lines().iter().map(JournalLine::line_number).collect();
        let expected: Vec<usize> = (1..=draft.len()).collect();
        prop_assert_eq!(numbers, expected);
    }

    /// No line ever carries both a debit and a credit, or a negative amount.
    #[test]
    fn prop_debit_credit_exclusive(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let draft = build(&edits);
        for line in draft.lines() {
            let (debit, credit) = amounts(line);
            prop_assert!(debit >= Decimal::ZERO && credit >= Decimal::ZERO);
            prop_assert!(debit.is_zero() || credit.is_zero());
        }
    }

    /// Negative input is clamped to zero.
    #[test]
    fn prop_negative_amounts_clamped(cents in 1i64..100_000_000, debit_side in any::<bool>()) {
        let draft = fresh();
        let id = draft.lines()[0].id();
        let amount = Decimal::new(-cents, 2);
        let draft = if debit_side {
            draft.set_debit(id, amount).unwrap()
        } else {
            draft.set_credit(id, amount).unwrap()
        };
        prop_assert_eq!(amounts(&draft.lines()[0]), (Decimal::ZERO, Decimal::ZERO));
    }

    /// Balanced exactly when |difference| < 0.01.
    #[test]
    fn prop_balance_definition(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let draft = build(&edits);
        let totals = draft.totals();
        let expected = (totals.total_debit - totals.total_credit).abs() < dec!(0.01);
        prop_assert_eq!(BalancePolicy::default().is_balanced(&totals), expected);
    }

    /// Auto-balance on a balanced draft changes nothing; on an unbalanced
    /// draft one call balances it.
    #[test]
    fn prop_auto_balance_idempotent(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let balancer = AutoBalancer::default();
        let policy = BalancePolicy::default();
        let draft = build(&edits);

        let (once, outcome) = balancer.apply(&draft, Confirmation::Unconfirmed).unwrap();
        prop_assert!(policy.is_balanced(&once.totals()));
        if policy.is_balanced(&draft.totals()) {
            prop_assert_eq!(outcome, AutoBalanceOutcome::AlreadyBalanced);
            prop_assert_eq!(&once, &draft);
        }

        let (twice, second) = balancer.apply(&once, Confirmation::Unconfirmed).unwrap();
        prop_assert_eq!(second, AutoBalanceOutcome::AlreadyBalanced);
        prop_assert_eq!(once.totals(), twice.totals());
    }

    /// After auto-balance debits equal credits and only the last line moved.
    #[test]
    fn prop_auto_balance_touches_only_last_line(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let draft = build(&edits);
        prop_assume!(!BalancePolicy::default().is_balanced(&draft.totals()));

        let (after, _) = AutoBalancer::default()
            .apply(&draft, Confirmation::Unconfirmed)
            .unwrap();
        let totals = after.totals();
        prop_assert_eq!(totals.total_debit, totals.total_credit);

        let last = draft.len() - 1;
        for (index, (before, now)) in draft.lines().iter().zip(after.lines()).enumerate() {
            if index != last {
                prop_assert_eq!(before, now);
            }
        }
        prop_assert_eq!(after.last_line().map(JournalLine::id), draft.last_line().map(JournalLine::id));
    }

    /// When the last line is empty or already on the absorbing side, it
    /// grows by exactly |difference|.
    #[test]
    fn prop_auto_balance_adds_difference(
        debit in arb_cents(),
        credit in arb_cents(),
        last in arb_cents(),
        last_on_credit in any::<bool>(),
    ) {
        let draft = fresh().add_line();
        let ids: Vec<_> = draft.lines().iter().map(JournalLine::id).collect();
        let existing = Decimal::new(last, 2);
        let draft = draft
            .set_debit(ids[0], Decimal::new(debit, 2))
            .and_then(|d| d.set_credit(ids[1], Decimal::new(credit, 2)))
            .and_then(|d| {
                if last_on_credit {
                    d.set_credit(ids[2], existing)
                } else {
                    d.set_debit(ids[2], existing)
                }
            })
            .unwrap();

        let difference = draft.totals().difference();
        prop_assume!(!BalancePolicy::default().is_within_tolerance(difference));
        prop_assume!(existing.is_zero() || last_on_credit == (difference > Decimal::ZERO));

        let (after, _) = AutoBalancer::default()
            .apply(&draft, Confirmation::Unconfirmed)
            .unwrap();
        let line = after.last_line().unwrap();
        if difference > Decimal::ZERO {
            prop_assert_eq!(amounts(line), (Decimal::ZERO, existing + difference));
        } else {
            prop_assert_eq!(amounts(line), (existing - difference, Decimal::ZERO));
        }
    }
}

// ----------------------------------------------------------------------
// Worked scenarios
// ----------------------------------------------------------------------

#[test]
fn scenario_fresh_lines_are_degenerately_balanced() {
    let totals = fresh().totals();
    assert_eq!(totals.total_debit, Decimal::ZERO);
    assert_eq!(totals.total_credit, Decimal::ZERO);
    assert!(BalancePolicy::default().is_balanced(&totals));
}

#[test]
fn scenario_equal_debit_and_credit_balance() {
    let draft = fresh();
    let (a, b) = (draft.lines()[0].id(), draft.lines()[1].id());
    let draft = draft
        .set_debit(a, dec!(1000))
        .and_then(|d| d.set_credit(b, dec!(1000)))
        .unwrap();
    assert!(BalancePolicy::default().is_balanced(&draft.totals()));
}

#[test]
fn scenario_auto_balance_raises_last_credit() {
    let draft = fresh();
    let (a, b) = (draft.lines()[0].id(), draft.lines()[1].id());
    let draft = draft
        .set_debit(a, dec!(1000))
        .and_then(|d| d.set_credit(b, dec!(700)))
        .unwrap();
    assert_eq!(draft.totals().difference(), dec!(300));
    assert!(!BalancePolicy::default().is_balanced(&draft.totals()));

    let (after, _) = AutoBalancer::default()
        .apply(&draft, Confirmation::Unconfirmed)
        .unwrap();
    assert_eq!(after.line(b).unwrap().credit_amount(), dec!(1000));
    assert!(BalancePolicy::default().is_balanced(&after.totals()));
}

#[test]
fn scenario_remove_with_two_lines_rejected() {
    let draft = fresh();
    let before = draft.clone();
    let err = draft.remove_line(draft.lines()[0].id()).unwrap_err();
    assert!(matches!(err, JournalError::TooFewLines { minimum: 2, actual: 1 }));
    assert_eq!(draft, before);
    assert_eq!(draft.len(), 2);
}

#[test]
fn scenario_last_setter_wins() {
    let draft = fresh();
    let a = draft.lines()[0].id();
    let draft = draft
        .set_debit(a, dec!(500))
        .and_then(|d| d.set_credit(a, dec!(200)))
        .unwrap();
    assert_eq!(amounts(draft.line(a).unwrap()), (Decimal::ZERO, dec!(200)));
}

#[test]
fn scenario_unbalanced_entry_saves_but_cannot_post() {
    let policy = BalancePolicy::default();
    let draft = fresh();
    let a = draft.lines()[0].id();
    let draft = draft.set_debit(a, dec!(250)).unwrap();

    assert!(validate_for_draft(&draft, &policy).is_ok());
    assert!(validate_for_posting(&draft, &policy).is_err());
}
