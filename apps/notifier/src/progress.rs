//! # 進捗表示
//!
//! 利用者向けの進捗メッセージ（レベル + テキスト）の出力先を抽象化する。
//!
//! 診断用の `tracing` ログとは別系統で、発生順に並んだメッセージ列として
//! ホスト（CLI）に渡される。機械可読な構造はレベルとテキストのみ。

use std::io::Write as _;

/// 進捗メッセージのレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ProgressLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 進捗メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub level:   ProgressLevel,
    pub message: String,
}

/// 進捗メッセージの出力先
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl dyn ProgressSink + '_ {
    pub fn info(&self, message: impl Into<String>) {
        self.emit_at(ProgressLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit_at(ProgressLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.emit_at(ProgressLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit_at(ProgressLevel::Error, message);
    }

    fn emit_at(&self, level: ProgressLevel, message: impl Into<String>) {
        self.emit(ProgressEvent {
            level,
            message: message.into(),
        });
    }
}

/// 標準出力に進捗を表示する
///
/// 各行の先頭にレベルを付ける（例: `[SUCCESS] Login successful.`）。
#[derive(Debug, Clone, Default)]
pub struct ConsoleProgressSink;

impl ProgressSink for ConsoleProgressSink {
    fn emit(&self, event: ProgressEvent) {
        tracing::debug!(level = %event.level, message = %event.message, "progress");

        let mut stdout = std::io::stdout().lock();
        // 表示に失敗しても送信処理は継続する
        let _ = writeln!(stdout, "[{}] {}", event.level, event.message);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::RecordingProgressSink;

    #[test]
    fn test_ヘルパーは対応するレベルで出力する() {
        let recorder = RecordingProgressSink::new();
        let sink: &dyn ProgressSink = &recorder;

        sink.info("a");
        sink.success("b");
        sink.warning("c");
        sink.error("d");

        let levels: Vec<ProgressLevel> = recorder.events().iter().map(|e| e.level).collect();
        assert_eq!(
            levels,
            vec![
                ProgressLevel::Info,
                ProgressLevel::Success,
                ProgressLevel::Warning,
                ProgressLevel::Error,
            ]
        );
    }

    #[test]
    fn test_レベルは大文字で表示される() {
        assert_eq!(ProgressLevel::Success.to_string(), "SUCCESS");
        assert_eq!(ProgressLevel::Warning.to_string(), "WARNING");
    }
}
