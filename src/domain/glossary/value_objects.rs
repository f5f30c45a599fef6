//! Glossary Context - Value Objects

use serde::{Deserialize, Serialize};

use super::GlossaryError;

/// 小说 ID 最大长度
pub const MAX_NOVEL_ID_LEN: usize = 128;

/// 小说唯一标识
///
/// 不透明字符串，只允许 ASCII 字母、数字、`-`、`_`，
/// 可直接用作文件名或存储键。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NovelId(String);

impl NovelId {
    /// 解析并校验小说 ID（先去除首尾空白）
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, GlossaryError> {
        let id = raw.as_ref().trim();
        if id.is_empty() {
            return Err(GlossaryError::EmptyNovelId);
        }
        let len = id.chars().count();
        if len > MAX_NOVEL_ID_LEN {
            return Err(GlossaryError::NovelIdTooLong {
                len,
                max: MAX_NOVEL_ID_LEN,
            });
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(GlossaryError::InvalidNovelId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NovelId {
    type Error = GlossaryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<NovelId> for String {
    fn from(id: NovelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NovelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
