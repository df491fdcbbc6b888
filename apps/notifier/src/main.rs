//! # Report Notifier
//!
//! レポート（CSV / ワークブック）を読み込み、サイトごとの状況に応じた
//! 通知メールを送信する対話型ツール。
//!
//! ## 処理の流れ
//!
//! ```text
//! 設定読み込み → レポート読み込み → プレビュー → 必須列検証 → 確認 → 送信
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `SENDER_EMAIL` | **Yes**（send のみ） | 送信元アドレス |
//! | `SENDER_PASSWORD` | **Yes**（send のみ） | アプリパスワード |
//! | `SMTP_HOST` / `SMTP_PORT` | No | メールリレー |
//! | `NOTIFIER_CC` | No | CC 宛先（カンマ区切り） |
//! | `LOG_FORMAT` / `RUST_LOG` | No | 診断ログの形式とレベル |
//!
//! ## 起動方法
//!
//! ```bash
//! report-notifier preview report.xlsx
//! report-notifier plan report.csv
//! report-notifier send report.csv --cc lead@example.com
//! ```

use std::{
    io::{BufRead as _, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use itertools::Itertools;
use report_notifier::{
    config::{NotifierConfig, SmtpConfig},
    error::ConfigError,
    input,
    progress::{ConsoleProgressSink, ProgressSink},
    render::{plan_table, preview_table},
    usecase::{DispatchService, build_plan},
};
use report_notifier_domain::CcList;
use report_notifier_infra::{
    MailConnector,
    notification::{NoopConnector, SmtpConnector},
};
use report_notifier_shared::{
    event_log::error as error_context,
    observability::{TracingConfig, Verbosity, init_tracing},
};

/// Send site-level notification emails from a report.
#[derive(Parser)]
#[command(name = "report-notifier")]
#[command(version)]
struct Cli {
    /// Show diagnostic logs on stderr (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the first rows of a report and check its columns
    Preview {
        /// Report file (.csv or .xlsx)
        file: PathBuf,

        /// Number of rows to show
        #[arg(long, default_value = "5")]
        rows: usize,
    },

    /// Show which email every recipient would receive, without sending
    Plan {
        /// Report file (.csv or .xlsx)
        file: PathBuf,
    },

    /// Process the report and send emails
    Send {
        /// Report file (.csv or .xlsx)
        file: PathBuf,

        /// CC addresses (comma-separated)
        #[arg(long, env = "NOTIFIER_CC", default_value = "")]
        cc: String,

        /// Send without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,

        /// Run the whole process without connecting to the mail relay
        #[arg(long)]
        dry_run: bool,
    },
}

const PREVIEW_ROWS: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let tracing_config = TracingConfig::from_env("report-notifier")
        .with_verbosity(Verbosity::from_occurrences(cli.verbose));
    init_tracing(&tracing_config);
    let _app_span = tracing::info_span!("app", app = %tracing_config.app_name).entered();

    let progress: Arc<dyn ProgressSink> = Arc::new(ConsoleProgressSink);

    match cli.command {
        Command::Preview { file, rows } => {
            if let Some(report) = input::load(&file, progress.as_ref()) {
                println!("{}", preview_table(&report, rows));
                input::check_columns(&report, progress.as_ref());
            }
        }
        Command::Plan { file } => {
            let rows = input::load(&file, progress.as_ref())
                .and_then(|report| input::extract_rows(&report, progress.as_ref()));
            if let Some(rows) = rows {
                println!("{}", plan_table(&build_plan(&rows)));
            }
        }
        Command::Send {
            file,
            cc,
            yes,
            dry_run,
        } => send(&file, &CcList::parse(&cc), yes, dry_run, progress).await?,
    }

    Ok(())
}

/// 送信コマンド
///
/// 設定と入力の問題は送信開始前に報告し、送信は行わない。
async fn send(
    file: &Path,
    cc: &CcList,
    yes: bool,
    dry_run: bool,
    progress: Arc<dyn ProgressSink>,
) -> anyhow::Result<()> {
    let Some(config) = load_config(dry_run, progress.as_ref()) else {
        return Ok(());
    };

    let Some(report) = input::load(file, progress.as_ref()) else {
        return Ok(());
    };
    println!("{}", preview_table(&report, PREVIEW_ROWS));

    let Some(rows) = input::extract_rows(&report, progress.as_ref()) else {
        return Ok(());
    };

    if !cc.is_empty() {
        progress.info(format!("CC: {}", cc.addresses().iter().join(", ")));
    }
    if !yes && !confirm(rows.len())? {
        progress.warning("Cancelled. No emails were sent.");
        return Ok(());
    }

    let connector = build_connector(&config.smtp, dry_run, progress.as_ref());
    let service = DispatchService::new(connector, progress);
    service.run(&rows, &config.sender, cc).await;

    Ok(())
}

fn load_config(dry_run: bool, progress: &dyn ProgressSink) -> Option<NotifierConfig> {
    let loaded = if dry_run {
        NotifierConfig::for_dry_run(|name| std::env::var(name).ok())
    } else {
        NotifierConfig::from_env()
    };

    match loaded {
        Ok(config) => {
            if !dry_run {
                progress.info("Email credentials loaded successfully from `.env` file.");
            }
            Some(config)
        }
        Err(e) => {
            tracing::error!(
                error.category = error_context::category::INPUT,
                error.kind = error_context::kind::CONFIGURATION,
                "設定の読み込みに失敗: {}",
                e
            );
            match e {
                ConfigError::MissingVariables(_) => progress.error(
                    "Email credentials not found. Please create a `.env` file with `SENDER_EMAIL` and `SENDER_PASSWORD`.",
                ),
                ConfigError::InvalidValue { name, value } => {
                    progress.error(format!("Invalid value for `{name}`: {value:?}"));
                }
            }
            None
        }
    }
}

fn build_connector(
    smtp: &SmtpConfig,
    dry_run: bool,
    progress: &dyn ProgressSink,
) -> Arc<dyn MailConnector> {
    if dry_run {
        progress.warning("Dry run: no emails will actually be sent.");
        Arc::new(NoopConnector)
    } else {
        Arc::new(SmtpConnector::new(smtp.host.clone(), smtp.port))
    }
}

/// 送信前に利用者の確認を取る
fn confirm(rows: usize) -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "Process {rows} rows and send emails? [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes"))
}
