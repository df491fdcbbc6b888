//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! メールリレーには暗黙的 TLS（SMTPS、既定ポート 465）で接続し、
//! 送信者 ID で認証する。接続プールは 1 本に制限し、全メッセージで同じ接続を使う。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::{
        self,
        PoolConfig,
        authentication::Credentials,
        response::{Category, Code, Detail, Severity},
    },
};
use report_notifier_domain::{EmailMessage, NotificationError, SenderIdentity};
use report_notifier_shared::{event_log::event, log_business_event};

use super::{MailConnector, NotificationSender};

/// SMTP セッション確立
///
/// 固定のメールリレー（ホスト・ポート）に接続する。
#[derive(Debug, Clone)]
pub struct SmtpConnector {
    host: String,
    port: u16,
}

impl SmtpConnector {
    /// 新しい SMTP セッション確立インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: メールリレーのホスト名（例: "smtp.gmail.com"）
    /// - `port`: 暗黙的 TLS のポート番号（例: 465）
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl MailConnector for SmtpConnector {
    #[tracing::instrument(skip_all, level = "debug", fields(host = %self.host, port = self.port))]
    async fn connect(
        &self,
        sender: &SenderIdentity,
    ) -> Result<Box<dyn NotificationSender>, NotificationError> {
        let credentials = Credentials::new(
            sender.address().to_string(),
            sender.secret().as_str().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(|e| NotificationError::ConnectionFailed(e.to_string()))?
            .port(self.port)
            .credentials(credentials)
            .pool_config(PoolConfig::new().max_size(1))
            .build();

        // 接続と認証をここで済ませ、認証失敗を最初のグループ処理前に検出する
        let connected = transport.test_connection().await.map_err(classify_smtp_error)?;
        if !connected {
            return Err(NotificationError::ConnectionFailed(format!(
                "{}:{} did not respond",
                self.host, self.port
            )));
        }

        log_business_event!(
            event.category = event::category::SESSION,
            event.action = event::action::SESSION_OPENED,
            event.result = event::result::SUCCESS,
            session.host = %self.host,
            session.port = self.port,
            "メールセッションを確立"
        );

        Ok(Box::new(SmtpNotificationSender { transport }))
    }
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// drop 時にプール内の接続も閉じられる。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(classify_smtp_error)?;

        Ok(())
    }
}

/// ドメインのメールメッセージから lettre のメッセージを組み立てる
fn build_message(email: &EmailMessage) -> Result<Message, NotificationError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(&email.subject)
        .header(ContentType::TEXT_PLAIN);

    for cc in &email.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }

    builder
        .body(email.body.clone())
        .map_err(|e| NotificationError::SendFailed(e.to_string()))
}

/// 不正なアドレスはアドレス自体と lettre のエラー文をそのまま保持する
fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e| NotificationError::InvalidAddress(format!("{address:?}: {e}")))
}

/// lettre の SMTP エラーを通知エラーに分類する
///
/// 認証拒否の応答コードは接続時・送信時のどちらで返っても認証エラーとして扱う。
fn classify_smtp_error(error: smtp::Error) -> NotificationError {
    if error.status().is_some_and(is_auth_rejection) {
        log_business_event!(
            event.category = event::category::SESSION,
            event.action = event::action::SESSION_REJECTED,
            event.result = event::result::FAILURE,
            error = %error,
            "メールリレーが認証を拒否"
        );
        NotificationError::AuthenticationFailed(error.to_string())
    } else if error.is_permanent() || error.is_transient() {
        NotificationError::SendFailed(error.to_string())
    } else {
        NotificationError::ConnectionFailed(error.to_string())
    }
}

/// 認証の拒否を示す応答コードかどうか
///
/// - 530: 認証が必要
/// - 534: 認証方式が弱すぎる（アプリパスワードが必要）
/// - 535: 認証情報が不正
fn is_auth_rejection(code: Code) -> bool {
    matches!(
        (code.severity, code.category, code.detail),
        (
            Severity::PermanentNegativeCompletion,
            Category::Unspecified3,
            Detail::Zero | Detail::Four | Detail::Five
        )
    )
}
