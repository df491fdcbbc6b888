//! CSV 形式のレポート読み込み

use std::{fs::File, io::Read, path::Path};

use csv::ReaderBuilder;

use super::ReportTable;
use crate::error::InfraError;

/// CSV ファイルを読み込む
pub(super) fn read_csv_file(path: &Path) -> Result<ReportTable, InfraError> {
    let file = File::open(path)?;
    read_csv(file)
}

/// 任意のリーダーから CSV を読み込む
///
/// セルの値は前後の空白も含めてそのまま保持する。
/// 列数が揃っていないレコードも受け付ける。
pub(super) fn read_csv<R: Read>(reader: R) -> Result<ReportTable, InfraError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(ReportTable::new(headers, records))
}
