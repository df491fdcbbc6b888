//! # レポート読み込み
//!
//! アップロードされたレポート（CSV / ワークブック）を [`ReportTable`] に読み込み、
//! 必須列を検証したうえでドメインの [`Row`] に変換する。
//!
//! ## 設計方針
//!
//! - **形式は拡張子で判定**: `.csv` は CSV、`.xlsx` 等はワークブックの先頭シート
//! - **列名は大文字小文字を区別**: ヘッダはそのまま保持する
//! - **検証は処理前に一括**: 不足列をすべて報告し、部分的な処理は行わない

mod csv_reader;
mod workbook;

use std::path::Path;

use report_notifier_domain::report::{Row, SiteId, column};

use crate::error::InfraError;

/// 読み込み済みのレポート
///
/// すべてのセルは文字列化済み。各レコードはヘッダと同じ長さに揃えてある。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl ReportTable {
    /// ヘッダとレコードからテーブルを作成する
    ///
    /// ヘッダより短いレコードは空セルで補い、長いレコードは切り詰める。
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let records = records
            .into_iter()
            .map(|mut record| {
                record.resize(width, String::new());
                record
            })
            .collect();
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 先頭 `n` 行を返す（プレビュー表示用）
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.records[..n.min(self.records.len())]
    }

    /// 必須列のうち存在しないものを定義順で返す
    pub fn missing_columns(&self) -> Vec<&'static str> {
        column::REQUIRED
            .into_iter()
            .filter(|required| !self.headers.iter().any(|header| header == required))
            .collect()
    }

    /// 必須列を検証する
    pub fn validate(&self) -> Result<(), InfraError> {
        let missing = self.missing_columns();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(InfraError::missing_columns(missing))
        }
    }

    /// 必須列を検証し、ドメインの行に変換する
    ///
    /// `DOWNLOAD` / `SDA Status` の空セルは `None` として扱う。
    pub fn to_rows(&self) -> Result<Vec<Row>, InfraError> {
        self.validate()?;

        let index_of = |name: &str| self.headers.iter().position(|header| header == name);
        // validate() 済みのため全列が存在する
        let (Some(site), Some(download), Some(status), Some(email)) = (
            index_of(column::SITE_NUMBER),
            index_of(column::DOWNLOAD),
            index_of(column::SDA_STATUS),
            index_of(column::EMAIL),
        ) else {
            return Err(InfraError::missing_columns(self.missing_columns()));
        };

        Ok(self
            .records
            .iter()
            .map(|record| {
                Row::new(
                    SiteId::new(record[site].clone()),
                    non_empty(&record[download]),
                    non_empty(&record[status]),
                    record[email].clone(),
                )
            })
            .collect())
    }
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// レポートファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Csv,
    Workbook,
}

impl ReportFormat {
    fn detect(path: &Path) -> Result<Self, InfraError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(InfraError::unsupported_format(path.display().to_string())),
        }
    }
}

/// レポートファイルを読み込む
#[tracing::instrument(skip_all, level = "debug", fields(path = %path.display()))]
pub fn load_report(path: &Path) -> Result<ReportTable, InfraError> {
    let table = match ReportFormat::detect(path)? {
        ReportFormat::Csv => csv_reader::read_csv_file(path)?,
        ReportFormat::Workbook => workbook::read_first_sheet(path)?,
    };

    tracing::debug!(
        rows = table.len(),
        columns = table.headers().len(),
        "レポートを読み込みました"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::error::InfraErrorKind;

    fn table(headers: &[&str], records: &[&[&str]]) -> ReportTable {
        ReportTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            records
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_短いレコードは空セルで補われる() {
        let t = table(&["a", "b", "c"], &[&["1"]]);
        assert_eq!(t.records()[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_email列がなければ列名を報告する() {
        let t = table(
            &["Site Number", "DOWNLOAD", "SDA Status"],
            &[&["1", "no", "PENDING"]],
        );

        let err = t.to_rows().unwrap_err();

        assert_eq!(err.as_missing_columns(), Some(&["Email".to_string()][..]));
    }

    #[test]
    fn test_不足列はすべて定義順で報告される() {
        let t = table(&["Email", "Other"], &[]);
        assert_eq!(t.missing_columns(), vec!["Site Number", "DOWNLOAD", "SDA Status"]);
    }

    #[test]
    fn test_列名は大文字小文字を区別する() {
        let t = table(&["site number", "download", "sda status", "email"], &[]);
        assert_eq!(t.missing_columns().len(), 4);
    }

    #[test]
    fn test_列の並び順に関係なく行に変換できる() {
        let t = table(
            &["Email", "SDA Status", "Extra", "DOWNLOAD", "Site Number"],
            &[
                &["a@x.com", "CREATION SUCCESSFUL", "x", "no", "1"],
                &["b@x.com", "", "y", "", "1"],
            ],
        );

        let rows = t.to_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].site_id().as_str(), "1");
        assert_eq!(rows[0].email(), "a@x.com");
        assert!(rows[0].is_registered());
        assert_eq!(rows[1].download_flag(), None);
        assert_eq!(rows[1].registration_status(), None);
    }

    #[test]
    fn test_headは行数を超えても安全に切り詰める() {
        let t = table(&["a"], &[&["1"], &["2"]]);
        assert_eq!(t.head(5).len(), 2);
        assert_eq!(t.head(1).len(), 1);
    }

    #[rstest]
    #[case("report.pdf")]
    #[case("report")]
    #[case("report.txt")]
    fn test_非対応の拡張子はエラーになる(#[case] name: &str) {
        let err = load_report(Path::new(name)).unwrap_err();
        assert!(matches!(err.kind(), InfraErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_csvファイルを読み込める() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "Site Number,DOWNLOAD,SDA Status,Email").unwrap();
        writeln!(file, "1,no,CREATION SUCCESSFUL,a@x.com").unwrap();
        writeln!(file, "1,no,PENDING,b@x.com").unwrap();
        file.flush().unwrap();

        let t = load_report(file.path()).unwrap();

        assert_eq!(t.len(), 2);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_存在しないファイルはioエラーになる() {
        let err = load_report(Path::new("/nonexistent/report.csv")).unwrap_err();
        assert!(matches!(err.kind(), InfraErrorKind::Io(_) | InfraErrorKind::Csv(_)));
    }
}
