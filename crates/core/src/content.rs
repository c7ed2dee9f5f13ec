// crates/core/src/content.rs
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// 学习资料类型 (Content-Type Tag)
///
/// 封闭集合，不支持运行时注册。每个取值对应且仅对应一个指令模板。
/// 序列化为小写: "notes", "quiz", "flashcards"
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    Notes,
    Quiz,
    Flashcards,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_only_lowercase_wire_names() {
        assert_eq!(ContentType::from_str("notes").ok(), Some(ContentType::Notes));
        assert_eq!(ContentType::from_str("quiz").ok(), Some(ContentType::Quiz));
        assert_eq!(
            ContentType::from_str("flashcards").ok(),
            Some(ContentType::Flashcards)
        );
        assert!(ContentType::from_str("Notes").is_err());
        assert!(ContentType::from_str("essay").is_err());
        assert!(ContentType::from_str("").is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        for kind in ContentType::iter() {
            assert_eq!(kind.to_string(), kind.as_str());
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
