//! # Report Notifier 設定
//!
//! 環境変数（`.env` を含む）から送信者 ID とメールリレーの設定を読み込む。
//! 起動時に一度だけ構築し、参照で各処理に渡す。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `SENDER_EMAIL` | **Yes** | 送信元アドレス（認証ユーザー名） |
//! | `SENDER_PASSWORD` | **Yes** | アプリパスワード |
//! | `SMTP_HOST` | No | メールリレー（デフォルト: `smtp.gmail.com`） |
//! | `SMTP_PORT` | No | 暗黙的 TLS ポート（デフォルト: `465`） |

use std::env;

use report_notifier_domain::{SenderIdentity, SenderSecret};

use crate::error::ConfigError;

pub const SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const DRY_RUN_SENDER: &str = "dry-run@localhost";

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// 送信者 ID
    pub sender: SenderIdentity,
    /// メールリレー設定
    pub smtp:   SmtpConfig,
}

/// メールリレーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 送信者 ID の不足はまとめて報告する。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let address = non_blank(lookup(SENDER_EMAIL));
        let secret = non_blank(lookup(SENDER_PASSWORD));

        let (address, secret) = match (address, secret) {
            (Some(address), Some(secret)) => (address, secret),
            (address, secret) => {
                let missing = [(SENDER_EMAIL, address.is_none()), (SENDER_PASSWORD, secret.is_none())]
                    .into_iter()
                    .filter_map(|(name, missing)| missing.then_some(name))
                    .collect();
                return Err(ConfigError::MissingVariables(missing));
            }
        };

        Ok(Self {
            sender: SenderIdentity::new(address, SenderSecret::new(secret)),
            smtp:   SmtpConfig::from_lookup(&lookup)?,
        })
    }

    /// ドライラン用の設定を読み込む
    ///
    /// 送信者 ID は必須としない。`SENDER_EMAIL` がなければ仮のアドレスを使う。
    pub fn for_dry_run(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let address = non_blank(lookup(SENDER_EMAIL)).unwrap_or_else(|| DRY_RUN_SENDER.to_string());
        let secret = non_blank(lookup(SENDER_PASSWORD)).unwrap_or_default();

        Ok(Self {
            sender: SenderIdentity::new(address, SenderSecret::new(secret)),
            smtp:   SmtpConfig::from_lookup(&lookup)?,
        })
    }
}

impl SmtpConfig {
    /// メールリレー設定のみを読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = non_blank(lookup(SMTP_HOST)).unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let port = match non_blank(lookup(SMTP_PORT)) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: SMTP_PORT,
                value,
            })?,
            None => DEFAULT_SMTP_PORT,
        };
        Ok(Self { host, port })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
