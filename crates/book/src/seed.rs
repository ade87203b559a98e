//! Sample chart of accounts and built-in templates for demos and tests.

use rust_decimal::Decimal;
use tally_core::journal::{
    Account, AccountRef, AccountType, JournalTemplate, LineSide, TemplateLine,
};

use crate::repositories::account::InMemoryChart;

/// (code, name, type, balance)
const STANDARD_ACCOUNTS: &[(&str, &str, AccountType, i64)] = &[
    ("1000", "Cash - Operating Account", AccountType::Asset, 500_000),
    ("1100", "Accounts Receivable - Trade", AccountType::Asset, 250_000),
    ("1200", "Inventory - Raw Materials", AccountType::Asset, 350_000),
    ("1300", "Inventory - Finished Goods", AccountType::Asset, 200_000),
    ("1500", "Fixed Assets - Equipment", AccountType::Asset, 1_000_000),
    ("1510", "Accumulated Depreciation", AccountType::Asset, -250_000),
    ("2000", "Accounts Payable - Trade", AccountType::Liability, 180_000),
    ("2100", "Accrued Expenses", AccountType::Liability, 45_000),
    ("2200", "Short-term Loan", AccountType::Liability, 300_000),
    ("2210", "GST Payable - CGST", AccountType::Liability, 50_000),
    ("2211", "GST Payable - SGST", AccountType::Liability, 50_000),
    ("3000", "Owner's Capital", AccountType::Equity, 1_000_000),
    ("3100", "Retained Earnings", AccountType::Equity, 500_000),
    ("4000", "Revenue - Product Sales", AccountType::Income, 750_000),
    ("4100", "Revenue - Service Income", AccountType::Income, 250_000),
    ("5000", "COGS - Raw Materials", AccountType::Expense, 400_000),
    ("5100", "Depreciation Expense", AccountType::Expense, 50_000),
    ("5200", "Salary Expense", AccountType::Expense, 180_000),
    ("5300", "Rent Expense", AccountType::Expense, 60_000),
    ("5400", "Utilities Expense", AccountType::Expense, 25_000),
    ("5500", "Marketing Expense", AccountType::Expense, 40_000),
    ("5600", "Interest Expense", AccountType::Expense, 30_000),
];

/// A chart with the standard accounts, all active.
#[must_use]
pub fn standard_chart() -> InMemoryChart {
    InMemoryChart::from_accounts(STANDARD_ACCOUNTS.iter().map(|(code, name, kind, balance)| {
        Account::new(*code, *name, *kind).with_balance(Decimal::from(*balance))
    }))
}

fn account_name(code: &str) -> &'static str {
    STANDARD_ACCOUNTS
        .iter()
        .find(|(c, ..)| *c == code)
        .map_or("", |(_, name, ..)| *name)
}

fn pair(
    id: &str,
    name: &str,
    description: &str,
    amount: i64,
    debit: (&str, &str),
    credit: (&str, &str),
) -> JournalTemplate {
    let amount = Decimal::from(amount);
    let line = |(code, text): (&str, &str), side| TemplateLine {
        account: AccountRef::new(code, account_name(code)),
        description: text.to_string(),
        side,
        amount,
    };
    JournalTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        lines: vec![line(debit, LineSide::Debit), line(credit, LineSide::Credit)],
    }
}

/// The five built-in templates.
#[must_use]
pub fn builtin_templates() -> Vec<JournalTemplate> {
    vec![
        pair(
            "TPL-001",
            "Monthly Depreciation",
            "Standard monthly depreciation entry",
            12_500,
            ("5100", "Monthly depreciation expense"),
            ("1510", "Accumulated depreciation contra account"),
        ),
        pair(
            "TPL-002",
            "Salary Payment",
            "Monthly salary disbursement",
            180_000,
            ("5200", "Monthly salary payment"),
            ("1000", "Cash paid for salaries"),
        ),
        pair(
            "TPL-003",
            "Rent Payment",
            "Monthly rent expense",
            60_000,
            ("5300", "Monthly rent payment"),
            ("1000", "Cash paid for rent"),
        ),
        pair(
            "TPL-004",
            "Cash Sales",
            "Record cash sales transaction",
            100_000,
            ("1000", "Cash received from sales"),
            ("4000", "Sales revenue"),
        ),
        pair(
            "TPL-005",
            "Purchase on Credit",
            "Record credit purchase",
            50_000,
            ("5000", "Purchase of raw materials"),
            ("2000", "Credit purchase from supplier"),
        ),
    ]
}
