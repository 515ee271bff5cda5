// ═══════════════════════════════════════════════════════════════════
// Model Tests — wire parsing, loan balances, queries, permissions
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use lendtrack_core::models::dashboard::DashboardDetails;
use lendtrack_core::models::finance::{
    DurationType, Expense, FinanceTotals, Investment, NewInvestment, ProfitSummary,
};
use lendtrack_core::models::loan::{Loan, LoanBookSummary, LoanForm, LoanStatus};
use lendtrack_core::models::permission::{Action, AppModule, Capabilities, Permissions};
use lendtrack_core::models::query::{ListQuery, PageWindow, SortOrder};

fn sample_loan_json() -> serde_json::Value {
    json!({
        "_id": "65f1c0ffee",
        "name": "Sunita",
        "phone": "9876543210",
        "loanAmount": 12000,
        "givenAmount": 10000,
        "perDayCollection": 100,
        "daysForLoan": 120,
        "totalDueInstallments": 120,
        "totalPaidInstallments": 30,
        "totalPaidLoan": 3000,
        "remainingLoan": 9000,
        "adharCard": "1234-5678-9012",
        "panCard": "ABCDE1234F",
        "referenceBy": "Mahesh",
        "status": "open",
        "createdAt": "2024-02-10T09:15:00.000Z",
        "__v": 0
    })
}

// ── Loans ───────────────────────────────────────────────────────────

mod loans {
    use super::*;

    #[test]
    fn parses_backend_record() {
        let loan: Loan = serde_json::from_value(sample_loan_json()).unwrap();
        assert_eq!(loan.id, "65f1c0ffee");
        assert_eq!(loan.form.name, "Sunita");
        assert_eq!(loan.form.loan_amount, dec!(12000));
        assert_eq!(loan.form.days_for_loan, 120);
        assert_eq!(loan.form.status, LoanStatus::Open);
        assert_eq!(
            loan.created_at.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
        );
    }

    #[test]
    fn missing_and_null_numbers_default_to_zero() {
        let loan: Loan = serde_json::from_value(json!({
            "_id": "x",
            "name": "A",
            "phone": "1",
            "remainingLoan": null,
            "referenceBy": null
        }))
        .unwrap();
        assert_eq!(loan.form.loan_amount, Decimal::ZERO);
        assert_eq!(loan.form.remaining_loan, Decimal::ZERO);
        assert_eq!(loan.form.total_paid_installments, 0);
        assert_eq!(loan.form.reference_by, "");
        assert_eq!(loan.form.status, LoanStatus::Open);
        assert!(loan.created_at.is_none());
    }

    #[test]
    fn status_is_case_insensitive_and_serialized_capitalized() {
        assert_eq!(LoanStatus::normalize("CLOSED"), LoanStatus::Closed);
        assert_eq!(LoanStatus::normalize("closed "), LoanStatus::Closed);
        assert_eq!(LoanStatus::normalize(""), LoanStatus::Open);
        assert_eq!(LoanStatus::normalize("pending"), LoanStatus::Open);

        let mut form = LoanForm::new("A", "1");
        form.status = LoanStatus::Closed;
        let v = serde_json::to_value(&form).unwrap();
        assert_eq!(v["status"], "Closed");
    }

    #[test]
    fn form_serializes_camel_case_numbers() {
        let mut form = LoanForm::new("Sunita", "98765");
        form.loan_amount = dec!(5000);
        form.days_for_loan = 50;
        let v = serde_json::to_value(&form).unwrap();
        assert_eq!(v["loanAmount"], 5000.0);
        assert_eq!(v["daysForLoan"], 50);
        assert_eq!(v["totalPaidInstallments"], 0);
        assert!(v.get("_id").is_none());
    }

    #[test]
    fn balance_figures() {
        let loan: Loan = serde_json::from_value(sample_loan_json()).unwrap();
        let b = loan.balance();
        assert_eq!(b.outstanding(), dec!(9000));
        assert_eq!(b.expected_margin(), dec!(2000));
        assert_eq!(b.remaining_installments(), 90);
        assert!(!b.is_settled());
    }

    #[test]
    fn installment_preview_saturates_at_zero() {
        let loan: Loan = serde_json::from_value(sample_loan_json()).unwrap();
        let after = loan.balance().after_installment(dec!(100));
        assert_eq!(after.outstanding(), dec!(8900));
        assert_eq!(after.paid_installments, 31);

        let overpaid = loan.balance().after_installment(dec!(10000));
        assert_eq!(overpaid.outstanding(), Decimal::ZERO);
        assert!(overpaid.is_settled());
    }

    #[test]
    fn book_summary() {
        let open: Loan = serde_json::from_value(sample_loan_json()).unwrap();
        let mut closed = open.clone();
        closed.id = "other".into();
        closed.form.status = LoanStatus::Closed;
        closed.form.total_paid_loan = dec!(12000);

        let summary = LoanBookSummary::from_loans([&open, &closed]);
        assert_eq!(summary.loan_count, 2);
        assert_eq!(summary.open_count, 1);
        assert_eq!(summary.closed_count, 1);
        assert_eq!(summary.total_loan_amount, dec!(24000));
        assert_eq!(summary.total_given_amount, dec!(20000));
        assert_eq!(summary.total_paid, dec!(15000));
        assert_eq!(summary.total_outstanding, dec!(9000));
    }

    #[test]
    fn empty_book_summary_is_zero() {
        let summary = LoanBookSummary::from_loans(std::iter::empty::<&Loan>());
        assert_eq!(summary, LoanBookSummary::default());
    }
}

// ── Finance ─────────────────────────────────────────────────────────

mod finance {
    use super::*;

    #[test]
    fn expense_accepts_timestamp_and_bare_date() {
        let a: Expense = serde_json::from_value(json!({
            "_id": "e1", "name": "Rent", "amount": 800, "date": "2024-04-01T00:00:00.000Z"
        }))
        .unwrap();
        let b: Expense = serde_json::from_value(json!({
            "_id": "e2", "name": "Tea", "amount": 20.5, "date": "2024-04-01", "description": null
        }))
        .unwrap();
        assert_eq!(a.date.date_naive(), b.date.date_naive());
        assert_eq!(b.amount, dec!(20.5));
        assert_eq!(b.description, "");
    }

    #[test]
    fn expense_with_bad_date_is_rejected() {
        let err = serde_json::from_value::<Expense>(json!({
            "name": "Rent", "amount": 800, "date": "not a date"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unrecognized date"));
    }

    #[test]
    fn investment_duration() {
        let inv: Investment = serde_json::from_value(json!({
            "_id": "i1", "name": "FD", "amount": 50000, "date": "2024-01-10",
            "durationType": "Year", "durationValue": 2
        }))
        .unwrap();
        assert_eq!(inv.duration_type, Some(DurationType::Year));
        assert_eq!(inv.duration_value, 2);
        assert_eq!("months".parse::<DurationType>().unwrap(), DurationType::Month);
        assert!("weeks".parse::<DurationType>().is_err());
    }

    #[test]
    fn new_investment_wire_shape() {
        let inv = NewInvestment {
            name: "Gold".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount: dec!(1500),
            duration_type: DurationType::Month,
            duration_value: 6,
            description: String::new(),
        };
        let v = serde_json::to_value(&inv).unwrap();
        assert_eq!(v["date"], "2024-06-01");
        assert_eq!(v["durationType"], "Month");
        assert_eq!(v["durationValue"], 6);
        assert_eq!(v["amount"], 1500.0);
    }

    #[test]
    fn totals_use_upstream_profit_and_summed_lists() {
        let expenses: Vec<Expense> = serde_json::from_value(json!([
            { "name": "a", "amount": 100, "date": "2024-01-01" },
            { "name": "b", "amount": 50, "date": "2024-01-02" }
        ]))
        .unwrap();
        let investments: Vec<Investment> = serde_json::from_value(json!([
            { "name": "c", "amount": 200, "date": "2024-01-02" }
        ]))
        .unwrap();
        let profit: ProfitSummary = serde_json::from_value(json!({
            "dailyTrend": [{ "date": "2024-01-02", "profit": 500 }],
            "totalProfit": 999
        }))
        .unwrap();

        let totals = FinanceTotals::compute(&expenses, &investments, &profit);
        assert_eq!(totals.expense, dec!(150));
        assert_eq!(totals.investment, dec!(200));
        assert_eq!(totals.profit, dec!(999));
    }

    #[test]
    fn totals_saturate_on_huge_amounts() {
        let big: Expense = serde_json::from_value(json!({
            "name": "big", "amount": 1, "date": "2024-01-01"
        }))
        .unwrap();
        let big = Expense {
            amount: Decimal::MAX - Decimal::ONE,
            ..big
        };
        let totals =
            FinanceTotals::compute(&[big.clone(), big], &[], &ProfitSummary::default());
        assert_eq!(totals.expense, Decimal::MAX);
        assert_eq!(totals.investment, Decimal::ZERO);
    }
}

// ── Dashboard ───────────────────────────────────────────────────────

mod dashboard {
    use super::*;

    #[test]
    fn parses_partial_payload() {
        let d: DashboardDetails = serde_json::from_value(json!({
            "users": { "totalUsers": 12, "totalLoans": 30, "totalRemainingLoan": 45000 },
            "finance": { "totalProfit": 9000, "totalInvestment": 1000, "totalReserveFund": 250 },
            "dailyTrend": [{ "date": "2024-01-01", "profit": 10 }]
        }))
        .unwrap();
        assert_eq!(d.users.total_users, 12);
        assert_eq!(d.users.total_given_amount, Decimal::ZERO);
        assert_eq!(d.finance.committed_capital(), dec!(1250));
        assert_eq!(d.daily_trend.len(), 1);
        assert_eq!(d.daily_trend[0].expense, Decimal::ZERO);
    }

    #[test]
    fn null_sections_default() {
        let d: DashboardDetails =
            serde_json::from_value(json!({ "users": null, "dailyTrend": null })).unwrap();
        assert_eq!(d, DashboardDetails::default());
    }
}

// ── Queries ─────────────────────────────────────────────────────────

mod queries {
    use super::*;

    #[test]
    fn default_query_wire_shape() {
        let v = serde_json::to_value(ListQuery::default()).unwrap();
        assert_eq!(
            v,
            json!({
                "searchKey": "",
                "pageNo": 1,
                "pageCount": 10,
                "sortByField": "createdAt",
                "sortByOrder": "desc"
            })
        );
    }

    #[test]
    fn toggle_sort_cycles_and_resets_page() {
        let mut q = ListQuery::default().with_page(4, 10);
        q.toggle_sort("name");
        assert_eq!(q.sort_by_field, "name");
        assert_eq!(q.sort_by_order, SortOrder::Asc);
        assert_eq!(q.page_no, 1);

        q.toggle_sort("name");
        assert_eq!(q.sort_by_order, SortOrder::Desc);

        q.toggle_sort("name");
        assert_eq!(q.sort_by_order, SortOrder::Asc);

        q.toggle_sort("loanAmount");
        assert_eq!(q.sort_by_field, "loanAmount");
        assert_eq!(q.sort_by_order, SortOrder::Asc);
    }

    #[test]
    fn default_desc_on_created_at_toggles_to_asc() {
        let mut q = ListQuery::default();
        q.toggle_sort("createdAt");
        assert_eq!(q.sort_by_order, SortOrder::Asc);
    }

    #[test]
    fn status_filter_wire_shape() {
        let q = ListQuery::default()
            .with_page(4, 10)
            .with_status(Some(LoanStatus::Closed));
        assert_eq!(q.page_no, 1);
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["status"], "Closed");

        let all = q.with_status(None);
        let v = serde_json::to_value(&all).unwrap();
        assert!(v.get("status").is_none());
    }

    #[test]
    fn search_resets_page() {
        let q = ListQuery::default().with_page(3, 25).with_search("sun");
        assert_eq!(q.page_no, 1);
        assert_eq!(q.page_count, 25);
        assert_eq!(q.search_key, "sun");
    }

    #[test]
    fn page_window() {
        let w = ListQuery::default().with_page(3, 10).window(25);
        assert_eq!(
            w,
            PageWindow {
                start_index: 20,
                end_index: 25,
                total_pages: 3
            }
        );
        assert!(!w.has_next(3));
        assert!(w.has_next(2));

        let empty = PageWindow::new(1, 10, 0);
        assert_eq!(empty.end_index, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn page_window_past_last_page_is_clamped() {
        let w = PageWindow::new(4, 10, 25);
        assert_eq!(w.start_index, 25);
        assert_eq!(w.end_index, 25);
        assert!(w.start_index <= w.end_index);
        assert!(w.is_empty());
        assert!(!PageWindow::new(3, 10, 25).is_empty());
    }
}

// ── Permissions ─────────────────────────────────────────────────────

mod permissions {
    use super::*;

    #[test]
    fn default_grants_nothing() {
        let p = Permissions::default();
        assert!(!p.allows(AppModule::Collection, Action::View));
        assert!(!p.allows(AppModule::Finance, Action::Create));
    }

    #[test]
    fn full_grants_everything() {
        let p = Permissions::full();
        for module in [AppModule::Collection, AppModule::Finance, AppModule::Dashboard] {
            for action in [Action::View, Action::Create, Action::Update, Action::Delete] {
                assert!(p.allows(module, action), "{module} {action}");
            }
        }
    }

    #[test]
    fn grants_are_per_module() {
        let p = Permissions::default().grant(AppModule::Finance, Capabilities::read_only());
        assert!(p.allows(AppModule::Finance, Action::View));
        assert!(!p.allows(AppModule::Finance, Action::Create));
        assert!(!p.allows(AppModule::Collection, Action::View));
    }

    #[test]
    fn deserializes_from_role_lookup_shape() {
        let p: Permissions = serde_json::from_value(json!({
            "Collection": { "canView": true, "canUpdate": true },
            "Finance": { "canView": true, "canCreate": true, "canUpdate": false, "canDelete": false }
        }))
        .unwrap();
        assert!(p.allows(AppModule::Collection, Action::Update));
        assert!(!p.allows(AppModule::Collection, Action::Delete));
        assert!(p.allows(AppModule::Finance, Action::Create));
        assert!(!p.allows(AppModule::Dashboard, Action::View));
    }
}
