//! # テスト用モック
//!
//! ユースケース層のテストで使用する `NotificationSender` / `MailConnector` のモック実装。
//! 送信したメッセージを記録し、任意の宛先で失敗させられる。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use report_notifier_domain::{EmailMessage, NotificationError, SenderIdentity};

use crate::notification::{MailConnector, NotificationSender};

/// 失敗の注入方法
#[derive(Debug, Clone)]
enum Failure {
    Authentication,
    Send,
}

/// 送信メッセージを記録するモック
#[derive(Debug, Clone, Default)]
pub struct MockNotificationSender {
    sent:     Arc<Mutex<Vec<EmailMessage>>>,
    failures: Arc<Mutex<Vec<(String, Failure)>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信済みのメッセージを返す
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_sending_to(&self, to: impl Into<String>) {
        self.failures.lock().unwrap().push((to.into(), Failure::Send));
    }

    /// 指定した宛先への送信時にメールリレーが認証を拒否したことにする
    pub fn reject_authentication_at(&self, to: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .push((to.into(), Failure::Authentication));
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(to, _)| *to == email.to)
            .map(|(_, failure)| failure.clone());

        match failure {
            Some(Failure::Authentication) => Err(NotificationError::AuthenticationFailed(
                "535 5.7.8 Username and Password not accepted".to_string(),
            )),
            Some(Failure::Send) => Err(NotificationError::SendFailed(format!(
                "550 mailbox unavailable: {}",
                email.to
            ))),
            None => {
                self.sent.lock().unwrap().push(email.clone());
                Ok(())
            }
        }
    }
}

/// セッション確立のモック
///
/// 接続のたびに同じ [`MockNotificationSender`] を返す。
#[derive(Debug, Clone, Default)]
pub struct MockMailConnector {
    sender:        MockNotificationSender,
    reject_login:  bool,
    connect_count: Arc<Mutex<usize>>,
}

impl MockMailConnector {
    pub fn new(sender: MockNotificationSender) -> Self {
        Self {
            sender,
            ..Self::default()
        }
    }

    /// ログイン時に認証を拒否するコネクタを作成する
    pub fn rejecting_login(sender: MockNotificationSender) -> Self {
        Self {
            sender,
            reject_login: true,
            ..Self::default()
        }
    }

    /// `connect()` が呼ばれた回数
    pub fn connect_count(&self) -> usize {
        *self.connect_count.lock().unwrap()
    }
}

#[async_trait]
impl MailConnector for MockMailConnector {
    async fn connect(
        &self,
        _sender: &SenderIdentity,
    ) -> Result<Box<dyn NotificationSender>, NotificationError> {
        *self.connect_count.lock().unwrap() += 1;

        if self.reject_login {
            return Err(NotificationError::AuthenticationFailed(
                "535 5.7.8 Username and Password not accepted".to_string(),
            ));
        }
        Ok(Box::new(self.sender.clone()))
    }
}
