//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! 送信計画の確認（ドライラン）に使用する。

use async_trait::async_trait;
use report_notifier_domain::{EmailMessage, NotificationError, SenderIdentity};

use super::{MailConnector, NotificationSender};

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}

/// Noop セッション確立
///
/// 認証を行わず、常に [`NoopNotificationSender`] を返す。
#[derive(Debug, Clone, Default)]
pub struct NoopConnector;

#[async_trait]
impl MailConnector for NoopConnector {
    async fn connect(
        &self,
        sender: &SenderIdentity,
    ) -> Result<Box<dyn NotificationSender>, NotificationError> {
        tracing::debug!(from = %sender.address(), "Noop: セッション確立をスキップ");
        Ok(Box::new(NoopNotificationSender))
    }
}

#[cfg(test)]
mod tests {
    use report_notifier_domain::SenderSecret;

    use super::*;

    #[tokio::test]
    async fn send_emailがエラーを返さない() {
        let sender = NoopNotificationSender;
        let email = EmailMessage {
            from:    "bot@example.com".to_string(),
            to:      "test@example.com".to_string(),
            cc:      vec![],
            subject: "テスト件名".to_string(),
            body:    "テスト".to_string(),
        };

        let result = sender.send_email(&email).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn connectは認証情報に関係なく成功する() {
        let identity = SenderIdentity::new("bot@example.com", SenderSecret::new(""));

        let result = NoopConnector.connect(&identity).await;
        assert!(result.is_ok());
    }
}
