//! # インフラ層エラー定義
//!
//! レポートファイルの読み込みで発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Io, Csv, MissingColumns 等）
//!
//! どの経路で生成しても、その時点のスパン情報（どのファイルを読んでいたか等）が
//! 記録される。`ErrorLayer` 未登録の環境では空のトレースになる。

use std::fmt;

use derive_more::Display;
use itertools::Itertools;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::MissingColumns(columns) => { /* 列不足の報告 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// ファイル I/O エラー
    #[error("ファイル読み込みエラー: {0}")]
    Io(#[source] std::io::Error),

    /// CSV パースエラー
    #[error("CSV パースエラー: {0}")]
    Csv(#[source] csv::Error),

    /// ワークブックのパースエラー
    #[error("ワークブック読み込みエラー: {0}")]
    Workbook(#[source] calamine::Error),

    /// ワークブックにシートが存在しない
    #[error("ワークシートが見つかりません")]
    NoWorksheet,

    /// 対応していないファイル形式
    #[error("対応していないファイル形式です: {0}")]
    UnsupportedFormat(String),

    /// 必須列の不足
    ///
    /// 不足している列名を、必須列の定義順で保持する。
    #[error("必須列がありません: {}", .0.iter().join(", "))]
    MissingColumns(Vec<String>),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// MissingColumns バリアントの場合、不足している列名を返す
    pub fn as_missing_columns(&self) -> Option<&[String]> {
        match &self.kind {
            InfraErrorKind::MissingColumns(columns) => Some(columns),
            _ => None,
        }
    }

    pub fn missing_columns(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        InfraErrorKind::MissingColumns(columns.into_iter().map(Into::into).collect()).into()
    }

    pub fn unsupported_format(path: impl Into<String>) -> Self {
        InfraErrorKind::UnsupportedFormat(path.into()).into()
    }

    pub fn no_worksheet() -> Self {
        InfraErrorKind::NoWorksheet.into()
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

/// すべての生成経路はここを通り、その時点のスパンを記録する
impl From<InfraErrorKind> for InfraError {
    fn from(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(source: std::io::Error) -> Self {
        InfraErrorKind::Io(source).into()
    }
}

impl From<csv::Error> for InfraError {
    fn from(source: csv::Error) -> Self {
        InfraErrorKind::Csv(source).into()
    }
}

impl From<calamine::Error> for InfraError {
    fn from(source: calamine::Error) -> Self {
        InfraErrorKind::Workbook(source).into()
    }
}
