//! # レポート入力
//!
//! レポートの読み込みと必須列の検証を行い、問題があれば送信開始前に進捗へ報告する。
//!
//! 進捗には読み込み処理（io / csv / calamine）の原文を表示し、
//! 種別付きのエラーは診断ログにのみ出力する。

use std::path::Path;

use report_notifier_domain::Row;
use report_notifier_infra::{InfraError, InfraErrorKind, ReportTable, load_report};
use report_notifier_shared::event_log::error as error_context;

use crate::progress::ProgressSink;

/// レポートを読み込む
///
/// 失敗した場合は進捗にエラーを表示して `None` を返す。
pub fn load(file: &Path, progress: &dyn ProgressSink) -> Option<ReportTable> {
    load_report(file)
        .inspect_err(|e| report_error(e, progress))
        .ok()
}

/// 必須列のみを検証する
pub fn check_columns(report: &ReportTable, progress: &dyn ProgressSink) -> bool {
    report
        .validate()
        .inspect_err(|e| report_error(e, progress))
        .is_ok()
}

/// 必須列を検証して行に変換する
pub fn extract_rows(report: &ReportTable, progress: &dyn ProgressSink) -> Option<Vec<Row>> {
    report
        .to_rows()
        .inspect_err(|e| report_error(e, progress))
        .ok()
}

/// 利用者向けのエラー説明
pub fn describe(error: &InfraError) -> String {
    match error.kind() {
        InfraErrorKind::Io(e) => e.to_string(),
        InfraErrorKind::Csv(e) => e.to_string(),
        InfraErrorKind::Workbook(e) => e.to_string(),
        InfraErrorKind::NoWorksheet => "the workbook contains no worksheet".to_string(),
        InfraErrorKind::UnsupportedFormat(path) => {
            format!("unsupported file type: {path} (expected .csv, .xlsx, .xlsm, .xlsb, .xls or .ods)")
        }
        InfraErrorKind::MissingColumns(columns) => {
            format!("missing required columns: {}", columns.join(", "))
        }
    }
}

fn report_error(error: &InfraError, progress: &dyn ProgressSink) {
    match error.as_missing_columns() {
        Some(columns) => {
            tracing::error!(
                error.category = error_context::category::INPUT,
                error.kind = error_context::kind::MISSING_COLUMNS,
                "必須列が不足: {}",
                error
            );
            progress.error(format!(
                "The uploaded file is missing required columns: {}",
                columns.join(", ")
            ));
        }
        None => {
            tracing::error!(
                error.category = error_context::category::INPUT,
                error.kind = error_context::kind::UNREADABLE_REPORT,
                "レポートの読み込みに失敗: {:?}",
                error
            );
            progress.error(format!(
                "An error occurred while processing the file: {}",
                describe(error)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{progress::ProgressLevel, test_utils::RecordingProgressSink};

    fn table(headers: &[&str]) -> ReportTable {
        ReportTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            vec![headers.iter().map(|_| "x".to_string()).collect()],
        )
    }

    #[test]
    fn test_必須列が揃っていれば何も表示しない() {
        let recorder = RecordingProgressSink::new();
        let report = table(&["Site Number", "DOWNLOAD", "SDA Status", "Email"]);

        assert!(check_columns(&report, &recorder));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_不足列は定義順にまとめて表示する() {
        let recorder = RecordingProgressSink::new();
        let report = table(&["Email", "Site Number"]);

        assert!(!check_columns(&report, &recorder));
        assert_eq!(
            recorder.messages_at(ProgressLevel::Error),
            vec!["The uploaded file is missing required columns: DOWNLOAD, SDA Status"]
        );
    }

    #[test]
    fn test_非対応の形式は英語の説明を表示する() {
        let recorder = RecordingProgressSink::new();

        assert!(load(Path::new("report.pdf"), &recorder).is_none());

        let errors = recorder.messages_at(ProgressLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].starts_with(
                "An error occurred while processing the file: unsupported file type: report.pdf"
            ),
            "{}",
            errors[0]
        );
    }

    #[test]
    fn test_読み込みエラーは原文のみを表示する() {
        let recorder = RecordingProgressSink::new();
        let dir = tempfile::tempdir().unwrap();

        assert!(load(&dir.path().join("missing.csv"), &recorder).is_none());

        let errors = recorder.messages_at(ProgressLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_ascii(), "{}", errors[0]);
    }

    #[test]
    fn test_行に変換できる() {
        let recorder = RecordingProgressSink::new();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            file,
            "Site Number,DOWNLOAD,SDA Status,Email\n1,no,PENDING,a@x.com\n"
        )
        .unwrap();

        let report = load(file.path(), &recorder).unwrap();
        let rows = extract_rows(&report, &recorder).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email(), "a@x.com");
        assert!(recorder.events().is_empty());
    }
}
