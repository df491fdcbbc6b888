//! # ユースケース層
//!
//! ## 設計方針
//!
//! - **依存性注入**: メールセッションの確立と進捗の出力先を `Arc<dyn Trait>` で外部から注入
//! - **薄いエントリポイント**: CLI は入力の収集と結果の表示のみを行い、判定と送信はここに集約
//!
//! ## モジュール構成
//!
//! - `dispatch`: サイトごとの通知判定とメール送信
//! - `plan`: 送信せずに判定結果だけを求める

pub mod dispatch;
pub mod plan;

pub use dispatch::{DispatchOutcome, DispatchService, DispatchSummary};
pub use plan::{PlannedSite, build_plan};
