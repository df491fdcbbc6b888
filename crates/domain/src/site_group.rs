//! # サイトグループ
//!
//! 同じサイト番号を持つ行の集合を表す。通知判定はグループ単位で行う。
//!
//! グループは保存せず、実行ごとに [`partition`] で入力テーブルから導出する。
//! 各行はサイト番号の完全一致によってちょうど 1 つのグループに属する。

use std::collections::HashMap;

use crate::report::{Row, SiteId};

/// サイトグループ
///
/// 行は入力テーブル内の出現順を保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteGroup<'a> {
    site_id: &'a SiteId,
    rows:    Vec<&'a Row>,
}

impl<'a> SiteGroup<'a> {
    pub fn site_id(&self) -> &'a SiteId {
        self.site_id
    }

    pub fn rows(&self) -> &[&'a Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// グループ内に 1 人でもダウンロード済みの行があるか
    pub fn anyone_downloaded(&self) -> bool {
        self.rows.iter().any(|row| row.has_downloaded())
    }

    /// グループ内に 1 人でも登録完了済みの行があるか
    pub fn anyone_registered(&self) -> bool {
        self.rows.iter().any(|row| row.is_registered())
    }
}

/// 行をサイト番号でパーティションする
///
/// グループの並びはサイト番号の初出順。空の入力に対しては空の Vec を返す。
pub fn partition(rows: &[Row]) -> Vec<SiteGroup<'_>> {
    let mut index: HashMap<&SiteId, usize> = HashMap::new();
    let mut groups: Vec<SiteGroup<'_>> = Vec::new();

    for row in rows {
        let site_id = row.site_id();
        match index.get(site_id) {
            Some(&position) => groups[position].rows.push(row),
            None => {
                index.insert(site_id, groups.len());
                groups.push(SiteGroup {
                    site_id,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}
