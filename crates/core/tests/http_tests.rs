// ═══════════════════════════════════════════════════════════════════
// HTTP Backend Tests — endpoints, envelopes, auth header, error mapping
// (against a local mockito server)
// ═══════════════════════════════════════════════════════════════════

use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use serde_json::json;

use lendtrack_core::api::http::HttpBackend;
use lendtrack_core::api::report::{ReportFormat, ReportKind};
use lendtrack_core::api::traits::{DashboardApi, FinanceApi, LoanApi, ReportApi};
use lendtrack_core::config::ClientConfig;
use lendtrack_core::errors::CoreError;
use lendtrack_core::models::loan::{InstallmentRequest, LoanForm, LoanStatus};
use lendtrack_core::models::permission::Permissions;
use lendtrack_core::models::query::{ListQuery, PageRequest};
use lendtrack_core::LendTracker;

fn backend(server: &Server) -> HttpBackend {
    HttpBackend::new(&ClientConfig::new(server.url()).with_token("tok-123")).unwrap()
}

// ── Loans ───────────────────────────────────────────────────────────

mod loans {
    use super::*;

    #[tokio::test]
    async fn list_posts_query_and_reads_total() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/loan/list")
            .match_header("authorization", "Bearer tok-123")
            .match_body(Matcher::Json(json!({
                "searchKey": "sun",
                "pageNo": 1,
                "pageCount": 10,
                "sortByField": "createdAt",
                "sortByOrder": "desc"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": [
                        { "_id": "a1", "name": "Sunita", "phone": "1", "loanAmount": 1000, "status": "Open" },
                        { "_id": "a2", "name": "Sunil", "phone": "2", "loanAmount": 500, "status": "closed" }
                    ],
                    "total": 27
                })
                .to_string(),
            )
            .create_async()
            .await;

        let page = backend(&server)
            .list_loans(&ListQuery::default().with_search("sun"))
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(page.total, 27);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].form.status, LoanStatus::Closed);
        assert_eq!(page.items[0].form.loan_amount, dec!(1000));
    }

    #[tokio::test]
    async fn status_filter_is_sent_only_when_set() {
        let mut server = Server::new_async().await;
        let closed = server
            .mock("POST", "/loan/list")
            .match_body(Matcher::PartialJson(json!({ "status": "Closed", "pageNo": 1 })))
            .with_status(200)
            .with_body(r#"{"data":[{"_id":"a2","name":"Sunil","phone":"2","status":"Closed"}],"total":1}"#)
            .create_async()
            .await;

        let query = ListQuery::default()
            .with_page(3, 10)
            .with_status(Some(LoanStatus::Closed));
        let page = backend(&server).list_loans(&query).await.unwrap();
        closed.assert_async().await;
        assert_eq!(page.items[0].form.status, LoanStatus::Closed);
    }

    #[tokio::test]
    async fn details_accepts_wrapped_and_bare_record() {
        let mut server = Server::new_async().await;
        let _wrapped = server
            .mock("GET", "/loan/details/a1")
            .with_status(200)
            .with_body(r#"{"data":{"_id":"a1","name":"Sunita","phone":"1"}}"#)
            .create_async()
            .await;
        let _bare = server
            .mock("GET", "/loan/details/a2")
            .with_status(200)
            .with_body(r#"{"_id":"a2","name":"Sunil","phone":"2"}"#)
            .create_async()
            .await;

        let api = backend(&server);
        assert_eq!(api.loan_details("a1").await.unwrap().form.name, "Sunita");
        assert_eq!(api.loan_details("a2").await.unwrap().form.name, "Sunil");
    }

    #[tokio::test]
    async fn update_sends_id_alongside_form() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/loan/update")
            .match_body(Matcher::PartialJson(json!({
                "_id": "a1",
                "name": "Sunita",
                "phone": "98765",
                "status": "Closed"
            })))
            .with_status(200)
            .with_body(r#"{"message":"updated"}"#)
            .create_async()
            .await;

        let mut form = LoanForm::new("Sunita", "98765");
        form.status = LoanStatus::Closed;
        backend(&server).update_loan("a1", &form).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn installment_and_delete_paths() {
        let mut server = Server::new_async().await;
        let install = server
            .mock("POST", "/loan/addInstallment/a1")
            .match_body(Matcher::Json(json!({ "installAmount": 150.0 })))
            .with_status(200)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/loan/delete/a1")
            .with_status(204)
            .create_async()
            .await;

        let api = backend(&server);
        api.add_installment("a1", &InstallmentRequest { install_amount: dec!(150) })
            .await
            .unwrap();
        api.delete_loan("a1").await.unwrap();
        install.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn server_message_becomes_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/loan/details/missing")
            .with_status(404)
            .with_body(r#"{"message":"Loan not found"}"#)
            .create_async()
            .await;

        let err = backend(&server).loan_details("missing").await.unwrap_err();
        match err {
            CoreError::Api {
                endpoint,
                status,
                message,
            } => {
                assert_eq!(endpoint, "loan/details/missing");
                assert_eq!(status, 404);
                assert_eq!(message, "Loan not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_reason_phrase() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/loan/create")
            .with_status(502)
            .with_body("<html>upstream down</html>")
            .create_async()
            .await;

        let err = backend(&server)
            .create_loan(&LoanForm::new("A", "1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (loan/create, status 502): Bad Gateway");
    }

    #[tokio::test]
    async fn malformed_success_body_is_deserialization_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/loan/list")
            .with_status(200)
            .with_body("{ not json")
            .create_async()
            .await;

        let err = backend(&server)
            .list_loans(&ListQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}

// ── Finance ─────────────────────────────────────────────────────────

mod finance {
    use super::*;

    #[tokio::test]
    async fn nested_list_envelopes() {
        let mut server = Server::new_async().await;
        let _e = server
            .mock("POST", "/expense/list")
            .match_body(Matcher::Json(json!({ "pageNo": 1, "pageCount": 500 })))
            .with_status(200)
            .with_body(
                r#"{"data":{"expenses":[{"_id":"e1","name":"Rent","amount":100,"date":"2024-01-01T08:00:00.000Z"}]}}"#,
            )
            .create_async()
            .await;
        let _i = server
            .mock("POST", "/investment/list")
            .with_status(200)
            .with_body(r#"{"data":{"investments":null}}"#)
            .create_async()
            .await;

        let api = backend(&server);
        let expenses = api.list_expenses(PageRequest::FINANCE_BULK).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, dec!(100));
        let investments = api.list_investments(PageRequest::FINANCE_BULK).await.unwrap();
        assert!(investments.is_empty());
    }

    #[tokio::test]
    async fn profit_summary_and_dashboard() {
        let mut server = Server::new_async().await;
        let _p = server
            .mock("GET", "/profit/summary")
            .with_status(200)
            .with_body(
                r#"{"data":{"dailyTrend":[{"date":"2024-01-02","profit":500}],"totalProfit":500}}"#,
            )
            .create_async()
            .await;
        let _d = server
            .mock("GET", "/dashboard/details")
            .with_status(200)
            .with_body(r#"{"data":{"users":{"totalUsers":3},"finance":{"totalProfit":500}}}"#)
            .create_async()
            .await;

        let api = backend(&server);
        let profit = api.profit_summary().await.unwrap();
        assert_eq!(profit.total_profit, dec!(500));
        assert_eq!(profit.daily_trend.len(), 1);

        let dash = api.dashboard_details().await.unwrap();
        assert_eq!(dash.users.total_users, 3);
        assert_eq!(dash.finance.total_profit, dec!(500));
    }

    #[tokio::test]
    async fn report_download_returns_raw_bytes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/investment/download/excel")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_header(
                "content-type",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            )
            .with_body(vec![0x50, 0x4b, 0x03, 0x04])
            .create_async()
            .await;

        let report = backend(&server)
            .download_report(ReportKind::Investment, ReportFormat::Excel)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(report.bytes, vec![0x50, 0x4b, 0x03, 0x04]);
        assert_eq!(report.file_name, "investment_report.xlsx");
    }
}

// ── Auth ────────────────────────────────────────────────────────────

mod auth {
    use super::*;

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/dashboard/details")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"data":{}}"#)
            .create_async()
            .await;

        let api = HttpBackend::new(&ClientConfig::new(server.url())).unwrap();
        api.dashboard_details().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/profit/summary")
            .with_status(200)
            .with_body(r#"{"data":{"dailyTrend":[],"totalProfit":0}}"#)
            .create_async()
            .await;

        let config = ClientConfig::new(format!("{}/api/v1", server.url()));
        HttpBackend::new(&config).unwrap().profit_summary().await.unwrap();
        mock.assert_async().await;
    }
}

// ── End to end through the facade ───────────────────────────────────

#[tokio::test]
async fn facade_refresh_builds_trend_from_live_endpoints() {
    let mut server = Server::new_async().await;
    let _e = server
        .mock("POST", "/expense/list")
        .with_status(200)
        .with_body(
            r#"{"data":{"expenses":[
                {"name":"a","amount":100,"date":"2024-01-01T09:00:00Z"},
                {"name":"b","amount":50,"date":"2024-01-01T18:00:00Z"}
            ]}}"#,
        )
        .create_async()
        .await;
    let _i = server
        .mock("POST", "/investment/list")
        .with_status(200)
        .with_body(r#"{"data":{"investments":[{"name":"c","amount":200,"date":"2024-01-02"}]}}"#)
        .create_async()
        .await;
    let _p = server
        .mock("GET", "/profit/summary")
        .with_status(200)
        .with_body(
            r#"{"data":{"dailyTrend":[{"date":"2024-01-02","profit":500}],"totalProfit":500}}"#,
        )
        .create_async()
        .await;

    let tracker =
        LendTracker::connect(&ClientConfig::new(server.url()), Permissions::full()).unwrap();
    assert!(tracker.refresh_finance().await.unwrap().is_applied());

    let snapshot = tracker.finance_snapshot().unwrap();
    assert_eq!(
        snapshot.trend.to_csv(),
        "date,profit,expense,investment\n\
         2024-01-02,500,0,200\n\
         2024-01-01,0,150,0\n\
         Total,500,150,200\n"
    );
}
