//! # 通知ディスパッチ
//!
//! レポートの行をサイトごとにグループ化し、通知カテゴリを判定して
//! 宛先ごとのメールを 1 つのメールセッションで順に送信する。
//!
//! ## 設計方針
//!
//! - **呼び出し元に例外を出さない**: 結果は [`DispatchOutcome`] で返し、進捗にも表示する
//! - **逐次処理**: グループも宛先も呼び出しスレッド上で 1 件ずつ送信する
//! - **終了メッセージの保証**: 成功・中断のいずれでも最後に終了メッセージを出す
//! - **ロールバックなし**: 中断前に送信済みのメールはそのまま

use std::sync::Arc;

use report_notifier_domain::{
    CcList,
    EmailMessage,
    NotificationCategory,
    NotificationError,
    Row,
    SenderIdentity,
    site_group::partition,
};
use report_notifier_infra::notification::MailConnector;
use report_notifier_shared::{
    event_log::{error as error_context, event},
    log_business_event,
};

use crate::progress::ProgressSink;

/// 進捗メッセージの文言
pub mod messages {
    pub const CONNECTING: &str = "Establishing secure connection with SMTP server...";
    pub const LOGIN_SUCCESSFUL: &str = "Login successful.";
    pub const AUTHENTICATION_ERROR: &str = "[AUTHENTICATION ERROR] Login failed. Please verify your credentials and ensure you are using a valid App Password.";
    pub const FINISHED: &str = "--- Email sending process finished ---";

    pub fn processing_site(site: &str) -> String {
        format!("Processing Site: {site}")
    }

    pub fn site_skipped(site: &str) -> String {
        format!("Site {site}: At least one user has downloaded. No emails will be sent.")
    }

    pub fn email_sent(to: &str, subject: &str) -> String {
        format!("Email sent to: {to} | Subject: '{subject}'")
    }

    pub fn unexpected_error(detail: &str) -> String {
        format!("[UNEXPECTED ERROR] An error occurred: {detail}")
    }
}

/// 送信結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// 処理を開始したサイト数（スキップを含む）
    pub sites:         usize,
    /// スキップしたサイト数
    pub skipped_sites: usize,
    /// 送信したメール数
    pub sent:          usize,
}

/// ディスパッチの結果
///
/// 認証エラーと予期しないエラーはどちらも実行全体を打ち切る。
/// 打ち切りまでに送信した分は `summary` に残る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 全グループを処理した
    Completed(DispatchSummary),
    /// メールリレーが認証を拒否した
    AuthError {
        detail:  String,
        summary: DispatchSummary,
    },
    /// その他のエラーで中断した
    UnexpectedError {
        detail:  String,
        summary: DispatchSummary,
    },
}

impl DispatchOutcome {
    pub fn summary(&self) -> DispatchSummary {
        match self {
            Self::Completed(summary)
            | Self::AuthError { summary, .. }
            | Self::UnexpectedError { summary, .. } => *summary,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// `detail` には送信層の原文を入れる（進捗にそのまま表示される）
    fn from_error(error: &NotificationError, summary: DispatchSummary) -> Self {
        let detail = error.detail().to_string();
        if error.is_authentication() {
            Self::AuthError { detail, summary }
        } else {
            Self::UnexpectedError { detail, summary }
        }
    }

    /// 結果を進捗として表示する
    fn render(&self, progress: &dyn ProgressSink) {
        match self {
            Self::Completed(summary) => {
                tracing::info!(
                    sites = summary.sites,
                    skipped_sites = summary.skipped_sites,
                    sent = summary.sent,
                    "通知ディスパッチが完了"
                );
            }
            Self::AuthError { detail, .. } => {
                tracing::error!(
                    error.category = error_context::category::MAIL_RELAY,
                    error.kind = error_context::kind::AUTHENTICATION,
                    "メールリレーの認証に失敗: {}",
                    detail
                );
                progress.error(messages::AUTHENTICATION_ERROR);
            }
            Self::UnexpectedError { detail, .. } => {
                tracing::error!(
                    error.category = error_context::category::MAIL_RELAY,
                    error.kind = error_context::kind::DISPATCH_ABORTED,
                    "通知ディスパッチを中断: {}",
                    detail
                );
                progress.error(messages::unexpected_error(detail));
            }
        }
    }
}

/// スコープ終了時に終了メッセージを出すガード
///
/// drop で出力するため、早期 return や panic による巻き戻しでも必ず表示される。
struct FinishedNotice<'a> {
    progress: &'a dyn ProgressSink,
}

impl Drop for FinishedNotice<'_> {
    fn drop(&mut self) {
        self.progress.info(messages::FINISHED);
    }
}

/// 通知ディスパッチサービス
pub struct DispatchService {
    connector: Arc<dyn MailConnector>,
    progress:  Arc<dyn ProgressSink>,
}

impl DispatchService {
    pub fn new(connector: Arc<dyn MailConnector>, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            connector,
            progress,
        }
    }

    /// メールセッションを開き、全サイトの通知を送信する
    ///
    /// エラーは返さず、[`DispatchOutcome`] として返すとともに進捗に表示する。
    /// 最後の進捗メッセージは常に終了メッセージになる。
    #[tracing::instrument(skip_all, fields(rows = rows.len(), from = %sender.address()))]
    pub async fn run(&self, rows: &[Row], sender: &SenderIdentity, cc: &CcList) -> DispatchOutcome {
        let _finished = FinishedNotice {
            progress: self.progress.as_ref(),
        };

        let mut summary = DispatchSummary::default();
        let outcome = match self.send_all(rows, sender, cc, &mut summary).await {
            Ok(()) => DispatchOutcome::Completed(summary),
            Err(e) => {
                tracing::debug!(error = %e, "送信を打ち切り");
                DispatchOutcome::from_error(&e, summary)
            }
        };

        outcome.render(self.progress.as_ref());
        outcome
    }

    async fn send_all(
        &self,
        rows: &[Row],
        sender: &SenderIdentity,
        cc: &CcList,
        summary: &mut DispatchSummary,
    ) -> Result<(), NotificationError> {
        let progress = self.progress.as_ref();

        progress.info(messages::CONNECTING);
        let session = self.connector.connect(sender).await?;
        progress.success(messages::LOGIN_SUCCESSFUL);

        for group in partition(rows) {
            let site = group.site_id().as_str();
            summary.sites += 1;
            progress.info(messages::processing_site(site));

            let category = NotificationCategory::classify(&group);
            tracing::debug!(site, %category, rows = group.len(), "サイトを分類");

            if category == NotificationCategory::Skip {
                summary.skipped_sites += 1;
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::SITE_SKIPPED,
                    event.result = event::result::SKIPPED,
                    notification.site = site,
                    "ダウンロード済みのためサイトをスキップ"
                );
                progress.warning(messages::site_skipped(site));
                continue;
            }

            for row in group.rows() {
                let Some(template) = category.template_for(row) else {
                    continue;
                };
                let message = EmailMessage::compose(sender, cc, row, template);
                let template_name: &str = template.into();

                if let Err(e) = session.send_email(&message).await {
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_FAILED,
                        event.result = event::result::FAILURE,
                        notification.site = site,
                        notification.template = template_name,
                        notification.recipient = %message.to,
                        error = %e,
                        "通知メール送信失敗"
                    );
                    return Err(e);
                }

                summary.sent += 1;
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    notification.site = site,
                    notification.template = template_name,
                    notification.recipient = %message.to,
                    "通知メール送信成功"
                );
                progress.success(messages::email_sent(&message.to, &message.subject));
            }
        }

        drop(session);
        tracing::debug!("メールセッションを閉じました");
        Ok(())
    }
}
