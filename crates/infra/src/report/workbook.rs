//! ワークブック形式のレポート読み込み
//!
//! 先頭のワークシートのみを対象とし、1 行目をヘッダとして扱う。

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::ReportTable;
use crate::error::InfraError;

/// ワークブックの先頭シートを読み込む
pub(super) fn read_first_sheet(path: &Path) -> Result<ReportTable, InfraError> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(InfraError::no_worksheet)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let records = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(ReportTable::new(headers, records))
}

/// セルを文字列化する
///
/// 整数値の浮動小数点数は小数部を付けずに出力する（`1.0` → `"1"`）。
/// CSV とワークブックでサイト番号の表記を揃えるため。
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) if value.is_finite() && value.fract().abs() < f64::EPSILON => {
            format!("{value:.0}")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Data::Empty, "")]
    #[case(Data::String("CREATION SUCCESSFUL".to_string()), "CREATION SUCCESSFUL")]
    #[case(Data::Float(12.0), "12")]
    #[case(Data::Float(1.5), "1.5")]
    #[case(Data::Int(7), "7")]
    #[case(Data::Bool(true), "true")]
    fn test_セルを文字列化する(#[case] cell: Data, #[case] expected: &str) {
        assert_eq!(cell_text(&cell), expected);
    }
}
