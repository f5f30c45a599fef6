//! 翻译提示词构建
//!
//! 系统提示词约定输出格式（与 [`ResponseParser`](super::ResponseParser) 的默认标记一致），
//! 用户提示词携带术语表、章节名和正文。

use crate::domain::glossary::Glossary;

/// 系统提示词
pub const SYSTEM_PROMPT: &str = "You are a professional translator of Chinese web novels into English.
Follow these rules:
1. Translate both the chapter title and the chapter content naturally, preserving the original meaning and tone.
2. For proper nouns (names, places, sects, items, techniques, cultivation realms), use the provided glossary whenever it has an entry.
3. When you meet a proper noun that is not in the glossary, choose a rendering and list it under the new terms section.
4. Format your response EXACTLY as follows:
CHAPTER_TITLE: <translated chapter title>
TRANSLATION: <translated chapter content>
NEW_TERMS:
<chinese>:<english>

Put one term per line in the NEW_TERMS section using the format \"chinese:english\". Leave the section empty if there are no new terms.";

/// 一次翻译请求的提示词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPrompt {
    pub system: String,
    pub user: String,
}

/// 构建翻译提示词
pub fn build_prompt(glossary: &Glossary, chapter_name: &str, text: &str) -> TranslationPrompt {
    let mut user = String::new();

    if !glossary.is_empty() {
        user.push_str("Use the following glossary for proper nouns:\n");
        for (source, target) in glossary.iter() {
            user.push_str(source);
            user.push_str(" -> ");
            user.push_str(target);
            user.push('\n');
        }
        user.push('\n');
    }

    user.push_str("Chapter Title: ");
    user.push_str(chapter_name);
    user.push_str("\n\nChapter Content:\n");
    user.push_str(text);
    user.push_str("\n\nPlease translate both the chapter title and content.");

    TranslationPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::translation::{BODY_MARKER, NEW_TERMS_MARKER, TITLE_MARKER};

    #[test]
    fn test_prompt_without_glossary() {
        let prompt = build_prompt(&Glossary::new(), "第一章", "正文内容");

        assert!(!prompt.user.contains("glossary"));
        assert!(prompt.user.starts_with("Chapter Title: 第一章\n"));
        assert!(prompt.user.contains("Chapter Content:\n正文内容"));
    }

    #[test]
    fn test_prompt_embeds_glossary_lines() {
        let glossary: Glossary = [("師父", "Master"), ("阁主", "Hall Master")]
            .into_iter()
            .collect();
        let prompt = build_prompt(&glossary, "第三章", "……");

        assert!(prompt.user.starts_with("Use the following glossary for proper nouns:\n"));
        assert!(prompt.user.contains("師父 -> Master\n"));
        assert!(prompt.user.contains("阁主 -> Hall Master\n"));
    }

    #[test]
    fn test_system_prompt_names_all_markers() {
        let prompt = build_prompt(&Glossary::new(), "t", "x");
        for marker in [TITLE_MARKER, BODY_MARKER, NEW_TERMS_MARKER] {
            assert!(prompt.system.contains(marker), "missing {marker}");
        }
    }
}
