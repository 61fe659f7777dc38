/// ドキュメントストアのパスセグメントを表す ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `new()`: trim + 空チェック + `/` 禁止チェック
/// - `as_str()`: 文字列参照
///
/// ドキュメント ID は `negocios/{id}/citas/{id}` のようにパスへ埋め込まれるため、
/// `/` を含む値はパスの階層を壊すので受け付けない。
///
/// # 使用例
///
/// ```rust
/// use agenda_domain::tenant::TenantId;
///
/// let id = TenantId::new("salon-x").unwrap();
/// assert_eq!(id.as_str(), "salon-x");
/// assert!(TenantId::new("a/b").is_err());
/// ```
macro_rules! define_document_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(String);

        impl $Name {
            /// 文字列から ID を作成する
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();

                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }

                if value.contains('/') {
                    return Err($crate::DomainError::Validation(format!(
                        "{}に `/` は使用できません: {}",
                        $label, value
                    )));
                }

                Ok(Self(value))
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
