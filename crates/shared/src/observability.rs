//! # Observability 基盤
//!
//! 診断ログ（`tracing`）の初期化と出力形式の設定を提供する。
//!
//! 診断ログは stderr に出力する。stdout は利用者向けの進捗表示に使われるため、
//! 両者が混ざらないようにしている。
//!
//! | 環境変数 | 説明 |
//! |---------|------|
//! | `LOG_FORMAT` | `json` / `pretty`（大文字小文字は区別しない） |
//! | `RUST_LOG` | フィルタ。設定時は冗長度の指定より優先する |

/// ログ出力形式
///
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON（ログ収集向け）
    Json,
    /// 端末向け
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
    /// stderr に警告を出力する。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "" => Self::Pretty,
            _ => {
                eprintln!("WARNING: unknown LOG_FORMAT={s:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// 診断ログの冗長度
///
/// `RUST_LOG` が未設定のときのデフォルトフィルタを決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// 警告以上のみ（対話利用の既定）
    #[default]
    Quiet,
    /// アプリケーションの info 以上
    Normal,
    /// アプリケーションの debug 以上
    Verbose,
}

impl Verbosity {
    /// `-v` の指定回数から冗長度を求める
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Quiet,
            1 => Self::Normal,
            _ => Self::Verbose,
        }
    }

    /// デフォルトのフィルタディレクティブ
    pub fn default_directives(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "warn,report_notifier=info",
            Self::Verbose => "info,report_notifier=debug",
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// アプリケーション名（ルートスパンの `app` フィールドに出力）
    pub app_name:   String,
    pub log_format: LogFormat,
    pub verbosity:  Verbosity,
}

impl TracingConfig {
    pub fn new(app_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            app_name: app_name.into(),
            log_format,
            verbosity: Verbosity::default(),
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(app_name: impl Into<String>) -> Self {
        Self::new(app_name, LogFormat::from_env())
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` が設定されていればそれを使い、なければ冗長度から
/// デフォルトのフィルタを決める。
///
/// `tracing_error::ErrorLayer` を登録するため、インフラ層のエラーが
/// 生成時点の `SpanTrace` を保持できる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.verbosity.default_directives().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}
