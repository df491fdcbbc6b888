//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` がメールセッション、`MailConnector` がその確立を表す
//! - **2 つの実装**: SMTP（実送信）、Noop（計画表示・ドライラン用）
//! - **1 実行 1 セッション**: `connect()` で認証済みセッションを 1 つ開き、全メッセージで使い回す
//!
//! セッションは所有権で寿命を管理する。`connect()` が返した値を drop すると接続も閉じる。

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::{NoopConnector, NoopNotificationSender};
use report_notifier_domain::{EmailMessage, NotificationError, SenderIdentity};
pub use smtp::{SmtpConnector, SmtpNotificationSender};

/// メール送信トレイト
///
/// 認証済みのメールセッションを表す。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}

/// メールセッション確立トレイト
///
/// 送信者 ID でメールリレーに認証し、セッションを返す。
/// 認証の拒否は [`NotificationError::AuthenticationFailed`] として区別して返す。
#[async_trait]
pub trait MailConnector: Send + Sync {
    async fn connect(
        &self,
        sender: &SenderIdentity,
    ) -> Result<Box<dyn NotificationSender>, NotificationError>;
}
