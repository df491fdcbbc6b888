//! # 送信計画
//!
//! メールを送信せずに、サイトごとの通知カテゴリと宛先ごとの文面を求める。
//! 判定は入力テーブルだけで決まるため、何度実行しても同じ計画になる。

use report_notifier_domain::{
    MessageTemplate,
    NotificationCategory,
    Row,
    SiteId,
    site_group::partition,
};

/// サイトごとの送信計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSite {
    pub site_id:    SiteId,
    pub category:   NotificationCategory,
    /// 宛先と送信する文面（スキップ時は空）
    pub recipients: Vec<(String, MessageTemplate)>,
}

/// 送信計画を求める
pub fn build_plan(rows: &[Row]) -> Vec<PlannedSite> {
    partition(rows)
        .iter()
        .map(|group| {
            let category = NotificationCategory::classify(group);
            let recipients = group
                .rows()
                .iter()
                .filter_map(|row| {
                    category
                        .template_for(row)
                        .map(|template| (row.email().to_string(), template))
                })
                .collect();
            PlannedSite {
                site_id: group.site_id().clone(),
                category,
                recipients,
            }
        })
        .collect()
}
