//! Plain-text rendering for terminal output.

use rust_decimal::Decimal;

use lendtrack_core::models::dashboard::DashboardDetails;
use lendtrack_core::models::finance::FinanceTotals;
use lendtrack_core::models::loan::{Loan, LoanBalance, LoanBookSummary};
use lendtrack_core::models::query::{ListQuery, Page};
use lendtrack_core::models::trend::TrendTable;

pub fn trend_table(table: &TrendTable) -> String {
    if table.is_empty() {
        return "No records found\n".to_string();
    }
    let mut out = format!(
        "{:<12} {:>14} {:>14} {:>14}\n",
        "Date", "Profit", "Expense", "Investment"
    );
    for row in table.rows() {
        out.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>14}\n",
            row.label.to_string(),
            row.profit.to_string(),
            row.expense.to_string(),
            row.investment.to_string()
        ));
    }
    out
}

pub fn finance_totals(totals: &FinanceTotals) -> String {
    format!(
        "Total Profit: {}\nTotal Expense: {}\nTotal Investment: {}\n",
        totals.profit, totals.expense, totals.investment
    )
}

pub fn loan_page(page: &Page<Loan>, query: &ListQuery) -> String {
    if page.items.is_empty() {
        return "No loans found\n".to_string();
    }
    let mut out = format!(
        "{:<26} {:<20} {:<14} {:>12} {:>12} {:<6}\n",
        "Id", "Name", "Phone", "Amount", "Remaining", "Status"
    );
    for loan in &page.items {
        out.push_str(&format!(
            "{:<26} {:<20} {:<14} {:>12} {:>12} {:<6}\n",
            loan.id,
            loan.form.name,
            loan.form.phone,
            loan.form.loan_amount.to_string(),
            loan.balance().outstanding().to_string(),
            loan.form.status.as_str()
        ));
    }
    out.push_str(&book_summary(&LoanBookSummary::from_loans(&page.items)));
    let window = query.window(page.total);
    if window.is_empty() {
        out.push_str(&format!(
            "Showing 0 of {} (page {} of {})\n",
            page.total, query.page_no, window.total_pages
        ));
    } else {
        out.push_str(&format!(
            "Showing {} to {} of {} (page {} of {})\n",
            window.start_index + 1,
            window.end_index,
            page.total,
            query.page_no,
            window.total_pages
        ));
    }
    out
}

/// One-line totals for the loans on the current page.
pub fn book_summary(s: &LoanBookSummary) -> String {
    format!(
        "{} loans ({} open, {} closed): lent {}, paid {}, outstanding {}\n",
        s.loan_count, s.open_count, s.closed_count, s.total_loan_amount, s.total_paid, s.total_outstanding
    )
}

pub fn loan_details(loan: &Loan) -> String {
    let b = loan.balance();
    format!(
        "{} ({})\nPhone: {}\nStatus: {}\nLoan amount: {}\nGiven: {}\nPaid: {} in {} of {} installments\n{}",
        loan.form.name,
        loan.id,
        loan.form.phone,
        loan.form.status,
        b.loan_amount,
        b.given_amount,
        b.paid,
        b.paid_installments,
        b.due_installments,
        balance(&b)
    )
}

pub fn balance(b: &LoanBalance) -> String {
    format!(
        "Outstanding: {}\nRemaining installments: {}\nExpected margin: {}\n",
        b.outstanding(),
        b.remaining_installments(),
        b.expected_margin()
    )
}

pub fn dashboard(d: &DashboardDetails) -> String {
    let money = |v: Decimal| v.round_dp(2).to_string();
    format!(
        "Users: {} ({} loans)\n\
         Loan amount: {}  Given: {}  Remaining: {}\n\
         Profit: {} (manual {}, loan {})\n\
         Expense: {}\n\
         Investment: {} + reserve {} = {}\n",
        d.users.total_users,
        d.users.total_loans,
        money(d.users.total_loan_amount),
        money(d.users.total_given_amount),
        money(d.users.total_remaining_loan),
        money(d.finance.total_profit),
        money(d.finance.manual_profit),
        money(d.finance.loan_profit),
        money(d.finance.total_expense),
        money(d.finance.total_investment),
        money(d.finance.total_reserve_fund),
        money(d.finance.committed_capital()),
    )
}
