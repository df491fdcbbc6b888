//! # Report Notifier インフラ層
//!
//! 外部システムとの接続・入出力を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **レポート読み込み**: CSV / ワークブックのパースと必須列の検証
//! - **メール送信**: 認証済みメールセッションの確立と送信
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`report`] - レポートファイルの読み込み
//! - [`notification`] - メールセッションと送信実装

pub mod error;
pub mod notification;
pub mod report;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
pub use notification::{MailConnector, NotificationSender};
pub use report::{ReportTable, load_report};
