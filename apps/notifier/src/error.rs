//! # アプリケーションエラー定義
//!
//! 送信開始前に検出される設定エラーを表現する。
//! 送信中のエラーは [`DispatchOutcome`](crate::usecase::DispatchOutcome) で表す。

use thiserror::Error;

/// 設定エラー
///
/// 送信者 ID の不足やポート番号の不正など。検出された時点で送信は開始しない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定（空文字も未設定とみなす）
    #[error("環境変数が設定されていません: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    /// 環境変数の値が不正
    #[error("環境変数 {name} の値が不正です: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
