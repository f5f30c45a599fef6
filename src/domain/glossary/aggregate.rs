//! Glossary Aggregate - 术语表聚合根

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GlossaryError;

/// 术语表：原文专有名词 -> 选定译名
///
/// 键唯一；已有术语只会被同键的显式更新覆盖，不会被删除。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glossary {
    terms: BTreeMap<String, String>,
}

/// 一次合并的结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// 合并前不存在的键
    pub added: Vec<String>,
    /// 合并前已存在且译名发生变化的键
    pub overwritten: Vec<String>,
}

impl MergeOutcome {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn overwritten_count(&self) -> usize {
        self.overwritten.len()
    }

    /// 合并是否改变了术语表
    pub fn is_changed(&self) -> bool {
        !self.added.is_empty() || !self.overwritten.is_empty()
    }
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.terms.get(source).map(String::as_str)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.terms.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.terms
    }

    /// 合并新术语（后写覆盖），返回新增/覆盖统计
    ///
    /// 不在 `new_terms` 中的术语保持不变；同键同值不计入任何统计，
    /// 因此重复合并相同输入是幂等的。
    pub fn merge(&mut self, new_terms: &BTreeMap<String, String>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for (source, target) in new_terms {
            match self.terms.insert(source.clone(), target.clone()) {
                None => outcome.added.push(source.clone()),
                Some(previous) if previous != *target => outcome.overwritten.push(source.clone()),
                Some(_) => {}
            }
        }

        outcome
    }

    /// 清洗外部提交的术语：去除首尾空白，拒绝任一侧为空的条目
    pub fn sanitize_terms(
        raw: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, GlossaryError> {
        let mut terms = BTreeMap::new();
        for (source, target) in raw {
            let source = source.trim();
            let target = target.trim();
            if source.is_empty() || target.is_empty() {
                return Err(GlossaryError::InvalidTerm(format!(
                    "{:?} -> {:?}",
                    source, target
                )));
            }
            terms.insert(source.to_string(), target.to_string());
        }
        Ok(terms)
    }
}

impl From<BTreeMap<String, String>> for Glossary {
    fn from(terms: BTreeMap<String, String>) -> Self {
        Self { terms }
    }
}

impl From<Glossary> for BTreeMap<String, String> {
    fn from(glossary: Glossary) -> Self {
        glossary.terms
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Glossary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            terms: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
