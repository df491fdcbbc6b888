//! # 表形式の表示
//!
//! レポートのプレビューと送信計画を comfy-table で整形する。

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use report_notifier_infra::ReportTable;

use crate::usecase::PlannedSite;

/// レポートの先頭 `rows` 行を表にする
pub fn preview_table(report: &ReportTable, rows: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(report.headers());

    for record in report.head(rows) {
        table.add_row(record);
    }
    table
}

/// 送信計画を宛先ごとの表にする
///
/// スキップするサイトは宛先の代わりに 1 行で示す。
pub fn plan_table(plan: &[PlannedSite]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Site", "Category", "Recipient", "Subject"]);

    for site in plan {
        let category: &str = site.category.into();
        if site.recipients.is_empty() {
            table.add_row(vec![site.site_id.as_str(), category, "-", "(skipped)"]);
            continue;
        }
        for (recipient, template) in &site.recipients {
            table.add_row(vec![
                site.site_id.as_str(),
                category,
                recipient.as_str(),
                template.subject(),
            ]);
        }
    }
    table
}
