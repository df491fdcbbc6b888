//! # Report Notifier ドメイン層
//!
//! サイト単位の通知判定を担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋関数**: グルーピングと分類は入力テーブルだけで決まり、I/O を持たない
//! - **値オブジェクト**: サイト番号・送信者認証情報などを newtype で表現する
//! - **固定文面**: 通知メールの件名と本文はコンパイル時定数として保持する
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier → infra → domain
//!     ↘         ↘
//!       shared ← ┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`report`] - レポートの行（[`Row`](report::Row)）と列名定義
//! - [`site_group`] - サイト番号によるパーティション
//! - [`notification`] - 通知カテゴリ判定とメールメッセージ
//! - [`sender`] - 送信者 ID と CC 宛先

pub mod notification;
pub mod report;
pub mod sender;
pub mod site_group;

pub use notification::{EmailMessage, MessageTemplate, NotificationCategory, NotificationError};
pub use report::{Row, SiteId};
pub use sender::{CcList, SenderIdentity, SenderSecret};
pub use site_group::SiteGroup;
