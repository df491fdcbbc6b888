//! # 送信者
//!
//! 送信者 ID（アドレスと秘密情報）と、全メッセージに共通する CC 宛先を定義する。
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`SenderIdentity`] | 送信者 ID | メールリレーへの認証と From ヘッダ |
//! | [`SenderSecret`] | 送信者シークレット | アプリパスワード等 |
//! | [`CcList`] | CC 宛先 | カンマ区切りで入力された CC アドレス |

/// 送信者シークレット
///
/// # セキュリティ
///
/// Debug 出力では値をマスクする。
#[derive(Clone)]
pub struct SenderSecret(String);

impl std::fmt::Debug for SenderSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SenderSecret").field(&"[REDACTED]").finish()
    }
}

impl SenderSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 送信者 ID
#[derive(Debug, Clone)]
pub struct SenderIdentity {
    address: String,
    secret:  SenderSecret,
}

impl SenderIdentity {
    pub fn new(address: impl Into<String>, secret: SenderSecret) -> Self {
        Self {
            address: address.into(),
            secret,
        }
    }

    /// 送信元アドレス（認証ユーザー名を兼ねる）
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn secret(&self) -> &SenderSecret {
        &self.secret
    }
}

/// CC 宛先
///
/// 1 回の実行内の全メッセージに同じ宛先を付与する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CcList(Vec<String>);

impl CcList {
    /// カンマ区切りの文字列をパースする
    ///
    /// 各要素は前後の空白を除去し、空の要素は無視する。
    pub fn parse(input: &str) -> Self {
        Self(
            input
                .split(',')
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn addresses(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_シークレットのdebug出力はマスクされる() {
        let identity = SenderIdentity::new("bot@x.com", SenderSecret::new("app-password"));
        let debug = format!("{identity:?}");

        assert!(!debug.contains("app-password"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[rstest]
    #[case("", vec![])]
    #[case("   ", vec![])]
    #[case("a@x.com", vec!["a@x.com"])]
    #[case(" a@x.com , b@x.com ", vec!["a@x.com", "b@x.com"])]
    #[case("a@x.com,,b@x.com,", vec!["a@x.com", "b@x.com"])]
    fn test_cc宛先をカンマ区切りでパースする(#[case] input: &str, #[case] expected: Vec<&str>) {
        let cc = CcList::parse(input);
        assert_eq!(cc.addresses(), expected.as_slice());
        assert_eq!(cc.is_empty(), expected.is_empty());
    }
}
