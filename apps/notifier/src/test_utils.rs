//! # テストユーティリティ
//!
//! 進捗メッセージの記録と、テスト用の行・送信者の組み立てを提供する。

use std::sync::{Arc, Mutex};

use report_notifier_domain::{Row, SenderIdentity, SenderSecret, SiteId};

use crate::progress::{ProgressEvent, ProgressLevel, ProgressSink};

/// 進捗メッセージを記録する出力先
#[derive(Debug, Clone, Default)]
pub struct RecordingProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    /// 記録されたメッセージ本文のみを返す
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    /// 指定レベルのメッセージ本文を返す
    pub fn messages_at(&self, level: ProgressLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// テスト用の行を作成する
///
/// `download` / `status` の空文字は空セル（`None`）として扱う。
pub fn row(site: &str, download: &str, status: &str, email: &str) -> Row {
    let cell = |value: &str| (!value.is_empty()).then(|| value.to_string());
    Row::new(SiteId::new(site), cell(download), cell(status), email)
}

/// テスト用の送信者 ID
pub fn sender() -> SenderIdentity {
    SenderIdentity::new("automation@example.com", SenderSecret::new("app-password"))
}
