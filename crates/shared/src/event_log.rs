//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! 通知の送信・スキップやメールセッションの確立など、運用上追跡したい出来事を
//! JSON ログから `jq` で抽出できるよう、フィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! 通知に関するイベントには次のフィールドを付ける:
//!
//! | フィールド | 内容 |
//! |-----------|------|
//! | `notification.site` | サイト番号 |
//! | `notification.template` | 文面（`download_reminder` 等） |
//! | `notification.recipient` | 宛先アドレス |
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ```ignore
//! tracing::error!(
//!     error.category = error::category::INPUT,
//!     error.kind = error::kind::MISSING_COLUMNS,
//!     "必須列が不足"
//! );
//! ```

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const NOTIFICATION: &str = "notification";
        pub const SESSION: &str = "session";
    }

    /// イベントアクション
    pub mod action {
        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const SITE_SKIPPED: &str = "notification.site_skipped";

        // メールセッション
        pub const SESSION_OPENED: &str = "session.opened";
        pub const SESSION_REJECTED: &str = "session.rejected";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const SKIPPED: &str = "skipped";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 送信開始前に検出される問題（設定、レポート）
        pub const INPUT: &str = "input";
        /// メールリレーとのやり取り
        pub const MAIL_RELAY: &str = "mail_relay";
    }

    /// エラー種別
    pub mod kind {
        pub const CONFIGURATION: &str = "configuration";
        pub const UNREADABLE_REPORT: &str = "unreadable_report";
        pub const MISSING_COLUMNS: &str = "missing_columns";
        pub const AUTHENTICATION: &str = "authentication";
        pub const DISPATCH_ABORTED: &str = "dispatch_aborted";
    }
}
