use crate::model::{BlockPayload, ItemMetadata, LessonData, ModeContentItem};
use crate::transform::{TransformOptions, difficulty};

/// One listening passage per sentences block: all pairs aggregate into a
/// transcript/translation, with the block's audio URL (supplied by the
/// audio collaborator through [`TransformOptions::audio`]) and a possibly
/// empty set of generated comprehension questions.
pub fn items(lesson: &LessonData, options: &TransformOptions) -> Vec<ModeContentItem> {
    let mut out = Vec::new();
    for block in &lesson.content_blocks {
        let BlockPayload::Sentences(content) = &block.payload else {
            continue;
        };
        if content.pairs.is_empty() {
            continue;
        }

        let transcript = content
            .pairs
            .iter()
            .map(|p| p.english.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let translation: String = content.pairs.iter().map(|p| p.chinese.as_str()).collect();

        out.push(ModeContentItem::Listening {
            audio_url: options.audio.get(&block.id).cloned(),
            questions: comprehension_questions(&transcript),
            transcript,
            translation,
            metadata: ItemMetadata {
                source_block_id: block.id.clone(),
                difficulty: None,
            },
        });
    }
    out
}

/// Keyword-anchored recall questions. Empty when the transcript has no
/// usable content words.
fn comprehension_questions(transcript: &str) -> Vec<String> {
    difficulty::keywords(transcript)
        .into_iter()
        .take(2)
        .map(|kw| format!("Which sentence mentions \"{kw}\"?"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testkit::{sample_course, single_pair_lesson};

    #[test]
    fn aggregates_all_pairs_of_a_block_into_one_item() {
        let course = sample_course("c1");
        let lesson = &course.lessons[0];
        let items = items(lesson, &TransformOptions::default());
        assert_eq!(items.len(), 1);
        let ModeContentItem::Listening { transcript, translation, .. } = &items[0] else {
            panic!("expected listening item");
        };
        assert_eq!(
            transcript,
            "I hated English in middle school. Now I practice every day."
        );
        assert_eq!(translation, "我在中学时讨厌英语。现在我每天练习。");
    }

    #[test]
    fn audio_url_comes_from_options() {
        let lesson = single_pair_lesson();
        let mut options = TransformOptions::default();
        options
            .audio
            .insert("b-solo".into(), "https://cdn.example/audio/b-solo.mp3".into());
        let items = items(&lesson, &options);
        let ModeContentItem::Listening { audio_url, .. } = &items[0] else {
            panic!("expected listening item");
        };
        assert_eq!(
            audio_url.as_deref(),
            Some("https://cdn.example/audio/b-solo.mp3")
        );
    }

    #[test]
    fn questions_reference_transcript_keywords() {
        let lesson = single_pair_lesson();
        let items = items(&lesson, &TransformOptions::default());
        let ModeContentItem::Listening { questions, .. } = &items[0] else {
            panic!("expected listening item");
        };
        assert_eq!(questions.len(), 2);
        assert!(questions[0].contains("hated"));
    }
}
