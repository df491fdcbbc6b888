//! # 通知
//!
//! サイトグループごとの通知カテゴリ判定と、送信するメールメッセージを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`NotificationCategory`] | 通知カテゴリ | スキップ / 登録混在 / 全員未登録 |
//! | [`MessageTemplate`] | メール文面 | 件名と本文の固定文字列 |
//! | [`EmailMessage`] | 送信メッセージ | 宛先ごとに組み立てる一時的な値 |
//!
//! ## 判定ルール
//!
//! 3 つのカテゴリは次の優先順位で評価され、互いに排他的である:
//!
//! 1. グループ内に `DOWNLOAD` が `YES` の行が 1 つでもあれば **スキップ**
//! 2. `SDA Status` が `CREATION SUCCESSFUL` の行が 1 つでもあれば **登録混在**
//!    （行ごとに「ダウンロード催促」か「登録完了のお願い」を出し分ける）
//! 3. それ以外は **全員未登録**（全員に「登録のお願い」を送る）

use strum::IntoStaticStr;
use thiserror::Error;

use crate::{
    report::Row,
    sender::{CcList, SenderIdentity},
    site_group::SiteGroup,
};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メールリレーが認証情報を拒否した
    #[error("認証に失敗: {0}")]
    AuthenticationFailed(String),

    /// メールリレーへの接続に失敗
    #[error("接続に失敗: {0}")]
    ConnectionFailed(String),

    /// メールアドレスを解釈できない
    #[error("メールアドレス不正: {0}")]
    InvalidAddress(String),

    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// 認証エラーかどうか
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    /// 送信層から返された原文（利用者向けの表示に使う）
    pub fn detail(&self) -> &str {
        match self {
            Self::AuthenticationFailed(detail)
            | Self::ConnectionFailed(detail)
            | Self::InvalidAddress(detail)
            | Self::SendFailed(detail) => detail,
        }
    }
}

/// 通知カテゴリ
///
/// サイトグループごとに一度だけ計算する。入力テーブルのみで決まる純粋関数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationCategory {
    /// 誰かがダウンロード済み: グループ全体に送信しない
    Skip,
    /// 登録済みの行が存在する: 行ごとに文面を出し分ける
    RegistrationMixed,
    /// 誰も登録していない: 全員に登録依頼を送る
    AllUnregistered,
}

impl NotificationCategory {
    /// サイトグループを分類する
    pub fn classify(group: &SiteGroup<'_>) -> Self {
        if group.anyone_downloaded() {
            Self::Skip
        } else if group.anyone_registered() {
            Self::RegistrationMixed
        } else {
            Self::AllUnregistered
        }
    }

    /// このカテゴリのグループに属する行へ送る文面を返す
    ///
    /// スキップの場合は `None`。
    pub fn template_for(self, row: &Row) -> Option<MessageTemplate> {
        match self {
            Self::Skip => None,
            Self::RegistrationMixed if row.is_registered() => {
                Some(MessageTemplate::DownloadReminder)
            }
            Self::RegistrationMixed => Some(MessageTemplate::CompleteRegistration),
            Self::AllUnregistered => Some(MessageTemplate::RegisterInvitation),
        }
    }
}

/// メール文面
///
/// 件名・本文は既存の受信者向け文面と互換を保つため、一字一句固定する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MessageTemplate {
    /// 登録済みの利用者へのダウンロード催促
    DownloadReminder,
    /// 登録が未完了の利用者への登録完了のお願い
    CompleteRegistration,
    /// 誰も登録していないサイトの利用者への登録依頼
    RegisterInvitation,
}

impl MessageTemplate {
    pub fn subject(self) -> &'static str {
        match self {
            Self::DownloadReminder => "Reminder: Please Download Your File",
            Self::CompleteRegistration => "Action Required: Please Complete Your Registration",
            Self::RegisterInvitation => "Action Required: Please Register",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            Self::DownloadReminder => {
                "Dear User,\n\nThis is a friendly reminder to please download the file associated with your account.\n\nThank you,\nAutomation Team"
            }
            Self::CompleteRegistration => {
                "Dear User,\n\nOur records show you have not yet completed registration. Please register to gain access.\n\nThank you,\nAutomation Team"
            }
            Self::RegisterInvitation => {
                "Dear User,\n\nThis email is to invite you to register for our platform. Please complete your registration at your earliest convenience.\n\nThank you,\nAutomation Team"
            }
        }
    }
}

/// メールメッセージ
///
/// 宛先ごとに組み立て、`NotificationSender` に渡したら破棄する。永続化しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元メールアドレス
    pub from:    String,
    /// 送信先メールアドレス
    pub to:      String,
    /// CC 宛先（空なら CC ヘッダを付けない）
    pub cc:      Vec<String>,
    /// 件名
    pub subject: String,
    /// プレーンテキスト本文
    pub body:    String,
}

impl EmailMessage {
    /// 行と文面からメッセージを組み立てる
    pub fn compose(
        sender: &SenderIdentity,
        cc: &CcList,
        row: &Row,
        template: MessageTemplate,
    ) -> Self {
        Self {
            from:    sender.address().to_string(),
            to:      row.email().to_string(),
            cc:      cc.addresses().to_vec(),
            subject: template.subject().to_string(),
            body:    template.body().to_string(),
        }
    }
}
