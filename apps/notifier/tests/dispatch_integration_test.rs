//! 通知ディスパッチ統合テスト
//!
//! CSV ファイルの読み込みから送信までを、モックのメールセッションで通して検証する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p report-notifier --test dispatch_integration_test
//! ```

use std::{io::Write as _, sync::Arc};

use pretty_assertions::assert_eq;
use report_notifier::{
    progress::ProgressLevel,
    test_utils::{RecordingProgressSink, sender},
    usecase::{DispatchOutcome, DispatchService, build_plan},
};
use report_notifier_domain::{CcList, EmailMessage, NotificationCategory};
use report_notifier_infra::{
    load_report,
    mock::{MockMailConnector, MockNotificationSender},
};
use tempfile::NamedTempFile;

// =============================================================================
// ヘルパー
// =============================================================================

/// CSV 文字列を一時ファイルに書き出す
fn write_csv(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

struct Harness {
    service:   DispatchService,
    sender:    MockNotificationSender,
    connector: MockMailConnector,
    progress:  RecordingProgressSink,
}

fn harness() -> Harness {
    let sender = MockNotificationSender::new();
    let connector = MockMailConnector::new(sender.clone());
    let progress = RecordingProgressSink::new();
    let service = DispatchService::new(Arc::new(connector.clone()), Arc::new(progress.clone()));
    Harness {
        service,
        sender,
        connector,
        progress,
    }
}

const REPORT: &str = "\
Site Number,Name,DOWNLOAD,SDA Status,Email
1,Alice,no,CREATION SUCCESSFUL,a@x.com
2,Carol,YES,PENDING,c@x.com
1,Bob,no,PENDING,b@x.com
3,Dave,,PENDING,d@x.com
3,Erin,no,FAILED,e@x.com
";

// =============================================================================
// 送信
// =============================================================================

#[tokio::test]
async fn test_csvの内容に応じてサイトごとに文面を出し分ける() {
    let file = write_csv(REPORT);
    let rows = load_report(file.path()).unwrap().to_rows().unwrap();
    let h = harness();

    let outcome = h
        .service
        .run(&rows, &sender(), &CcList::parse("lead@x.com"))
        .await;

    let sent: Vec<(String, String)> = h
        .sender
        .sent_emails()
        .into_iter()
        .map(|m| (m.to, m.subject))
        .collect();
    assert_eq!(
        sent,
        vec![
            (
                "a@x.com".to_string(),
                "Reminder: Please Download Your File".to_string()
            ),
            (
                "b@x.com".to_string(),
                "Action Required: Please Complete Your Registration".to_string()
            ),
            (
                "d@x.com".to_string(),
                "Action Required: Please Register".to_string()
            ),
            (
                "e@x.com".to_string(),
                "Action Required: Please Register".to_string()
            ),
        ]
    );

    let summary = outcome.summary();
    assert!(outcome.is_completed());
    assert_eq!(summary.sites, 3);
    assert_eq!(summary.skipped_sites, 1);
    assert_eq!(summary.sent, 4);
    assert_eq!(h.connector.connect_count(), 1);
}

#[tokio::test]
async fn test_送信メッセージには送信者とccが設定される() {
    let file = write_csv(REPORT);
    let rows = load_report(file.path()).unwrap().to_rows().unwrap();
    let h = harness();

    h.service
        .run(&rows, &sender(), &CcList::parse(" lead@x.com, ,ops@x.com "))
        .await;

    let first: EmailMessage = h.sender.sent_emails().remove(0);
    assert_eq!(first.from, "automation@example.com");
    assert_eq!(first.cc, vec!["lead@x.com", "ops@x.com"]);
    assert!(first.body.starts_with("Dear User,"));
}

#[tokio::test]
async fn test_スキップしたサイトは警告のみで終了メッセージが最後に出る() {
    let file = write_csv(REPORT);
    let rows = load_report(file.path()).unwrap().to_rows().unwrap();
    let h = harness();

    h.service.run(&rows, &sender(), &CcList::default()).await;

    assert_eq!(
        h.progress.messages_at(ProgressLevel::Warning),
        vec!["Site 2: At least one user has downloaded. No emails will be sent."]
    );
    assert_eq!(
        h.progress.messages().last().map(String::as_str),
        Some("--- Email sending process finished ---")
    );
}

#[tokio::test]
async fn test_送信失敗で中断しても送信済みのメールは残る() {
    let file = write_csv(REPORT);
    let rows = load_report(file.path()).unwrap().to_rows().unwrap();
    let h = harness();
    h.sender.fail_sending_to("d@x.com");

    let outcome = h.service.run(&rows, &sender(), &CcList::default()).await;

    assert!(matches!(outcome, DispatchOutcome::UnexpectedError { .. }));
    let recipients: Vec<String> = h.sender.sent_emails().into_iter().map(|m| m.to).collect();
    assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);
}

// =============================================================================
// 入力検証
// =============================================================================

#[test]
fn test_email列がないファイルは送信前に列名を報告する() {
    let file = write_csv("Site Number,DOWNLOAD,SDA Status\n1,no,PENDING\n");
    let h = harness();

    let err = load_report(file.path()).unwrap().to_rows().unwrap_err();

    assert_eq!(err.as_missing_columns(), Some(&["Email".to_string()][..]));
    assert_eq!(h.connector.connect_count(), 0);
    assert!(h.sender.sent_emails().is_empty());
}

#[test]
fn test_計画はメールセッションを開かずに求められる() {
    let file = write_csv(REPORT);
    let rows = load_report(file.path()).unwrap().to_rows().unwrap();

    let categories: Vec<(String, NotificationCategory)> = build_plan(&rows)
        .into_iter()
        .map(|site| (site.site_id.to_string(), site.category))
        .collect();

    assert_eq!(
        categories,
        vec![
            ("1".to_string(), NotificationCategory::RegistrationMixed),
            ("2".to_string(), NotificationCategory::Skip),
            ("3".to_string(), NotificationCategory::AllUnregistered),
        ]
    );
}
