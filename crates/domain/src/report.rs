//! # レポート行
//!
//! 入力テーブル（CSV / ワークブック）の 1 行を表すドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 列名 |
//! |---|------------|------|
//! | [`SiteId`] | サイト番号 | `Site Number` |
//! | [`Row`] | レポート行 | `Site Number`, `DOWNLOAD`, `SDA Status`, `Email` |
//!
//! 行は読み取り専用で、テーブル内の位置以外に識別子を持たない。

use derive_more::Display;

/// 入力テーブルの列名
///
/// 列名は大文字小文字を区別して照合する。
pub mod column {
    pub const SITE_NUMBER: &str = "Site Number";
    pub const DOWNLOAD: &str = "DOWNLOAD";
    pub const SDA_STATUS: &str = "SDA Status";
    pub const EMAIL: &str = "Email";

    /// 必須列（エラー報告時の並び順もこの順序に従う）
    pub const REQUIRED: [&str; 4] = [SITE_NUMBER, DOWNLOAD, SDA_STATUS, EMAIL];
}

/// 登録完了を示す `SDA Status` の値（完全一致で比較する）
pub const REGISTERED_STATUS: &str = "CREATION SUCCESSFUL";

/// ダウンロード済みを示す `DOWNLOAD` の値（前後空白除去・大文字化後に比較する）
pub const DOWNLOADED_FLAG: &str = "YES";

/// サイト番号
///
/// グルーピングのキー。大文字小文字の正規化は行わず、文字列の完全一致で比較する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{_0}")]
pub struct SiteId(String);

impl SiteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// レポート行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    site_id:             SiteId,
    download_flag:       Option<String>,
    registration_status: Option<String>,
    email:               String,
}

impl Row {
    /// 行を作成する
    ///
    /// `download_flag` / `registration_status` の `None` は空セルを表す。
    pub fn new(
        site_id: SiteId,
        download_flag: Option<String>,
        registration_status: Option<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            site_id,
            download_flag,
            registration_status,
            email: email.into(),
        }
    }

    pub fn site_id(&self) -> &SiteId {
        &self.site_id
    }

    pub fn download_flag(&self) -> Option<&str> {
        self.download_flag.as_deref()
    }

    pub fn registration_status(&self) -> Option<&str> {
        self.registration_status.as_deref()
    }

    /// 宛先メールアドレス
    ///
    /// 形式の検証はしない。不正なアドレスの扱いは送信層に委ねる。
    pub fn email(&self) -> &str {
        &self.email
    }

    /// ダウンロード済みかどうか
    ///
    /// 空セルはダウンロード済みとはみなさない。
    pub fn has_downloaded(&self) -> bool {
        self.download_flag
            .as_deref()
            .is_some_and(|flag| flag.trim().to_uppercase() == DOWNLOADED_FLAG)
    }

    /// 登録完了済みかどうか（`SDA Status` の完全一致）
    pub fn is_registered(&self) -> bool {
        self.registration_status.as_deref() == Some(REGISTERED_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn row(download: Option<&str>, status: Option<&str>) -> Row {
        Row::new(
            SiteId::new("1"),
            download.map(str::to_string),
            status.map(str::to_string),
            "a@example.com",
        )
    }

    #[rstest]
    #[case(Some("YES"), true)]
    #[case(Some("yes"), true)]
    #[case(Some("Yes"), true)]
    #[case(Some(" yes "), true)]
    #[case(Some("NO"), false)]
    #[case(Some("Y"), false)]
    #[case(Some("YESTERDAY"), false)]
    #[case(Some(""), false)]
    #[case(None, false)]
    fn test_ダウンロード済み判定は大文字小文字を区別しない(
        #[case] flag: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(row(flag, None).has_downloaded(), expected);
    }

    #[rstest]
    #[case(Some("CREATION SUCCESSFUL"), true)]
    #[case(Some("creation successful"), false)]
    #[case(Some("CREATION SUCCESSFUL "), false)]
    #[case(Some("PENDING"), false)]
    #[case(None, false)]
    fn test_登録済み判定は完全一致で行う(#[case] status: Option<&str>, #[case] expected: bool) {
        assert_eq!(row(None, status).is_registered(), expected);
    }

    #[test]
    fn test_サイト番号は大文字小文字を区別して比較する() {
        assert_ne!(SiteId::new("abc"), SiteId::new("ABC"));
        assert_eq!(SiteId::new("42").to_string(), "42");
    }

    #[test]
    fn test_必須列は定義順に並ぶ() {
        assert_eq!(
            column::REQUIRED,
            ["Site Number", "DOWNLOAD", "SDA Status", "Email"]
        );
    }
}
