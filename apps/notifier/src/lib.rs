//! # Report Notifier ライブラリ
//!
//! レポートを読み込み、サイトごとに通知メールを送信するユースケースを公開する。
//! テスト用に内部モジュールへのアクセスを提供する。

pub mod config;
pub mod error;
pub mod input;
pub mod progress;
pub mod render;
pub mod usecase;

// テストユーティリティ（内部実装、ドキュメントからは隠す）
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
