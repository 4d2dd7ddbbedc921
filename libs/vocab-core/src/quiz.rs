//! Multiple-choice quiz generation.
//!
//! Randomness is always injected so callers decide how the generator is
//! seeded; the backend seeds a fresh generator per request and tests use a
//! fixed seed.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{CoreError, Result};
use crate::types::{QuizQuestion, WordCandidate};

/// Question count used when the caller does not ask for a specific size.
pub const DEFAULT_MAX_QUESTIONS: usize = 5;

/// Every question offers exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Build up to `max_questions` questions, one per distinct word.
///
/// Words carrying a translation are preferred; when none of them has one,
/// every word is used and answers fall back to the word text.
pub fn generate_questions<R: Rng + ?Sized>(
    words: &[WordCandidate],
    max_questions: usize,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>> {
    if words.is_empty() {
        return Err(CoreError::NoWords);
    }
    if max_questions == 0 {
        return Err(CoreError::NoQuestionsRequested);
    }

    let eligible = eligible_words(words);

    let mut subjects = eligible.clone();
    subjects.shuffle(rng);
    subjects.truncate(max_questions);

    Ok(subjects
        .into_iter()
        .map(|word| build_question(word, &eligible, rng))
        .collect())
}

fn eligible_words(words: &[WordCandidate]) -> Vec<&WordCandidate> {
    let mut seen = HashSet::new();
    let unique: Vec<&WordCandidate> = words.iter().filter(|w| seen.insert(w.id)).collect();

    let translated: Vec<&WordCandidate> = unique
        .iter()
        .copied()
        .filter(|w| w.has_translation())
        .collect();

    if translated.is_empty() {
        unique
    } else {
        translated
    }
}

fn build_question<R: Rng + ?Sized>(
    word: &WordCandidate,
    eligible: &[&WordCandidate],
    rng: &mut R,
) -> QuizQuestion {
    let correct = word.answer();

    let mut distractors: Vec<&str> = Vec::new();
    for other in eligible.iter().filter(|w| w.id != word.id) {
        let answer = other.answer();
        if answer != correct && !distractors.contains(&answer) {
            distractors.push(answer);
        }
    }
    distractors.shuffle(rng);
    distractors.truncate(OPTIONS_PER_QUESTION - 1);

    let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
    options.push(correct.to_string());
    options.extend(distractors.into_iter().map(str::to_string));

    // Small pools are padded with numbered placeholders.
    let mut label = options.len();
    while options.len() < OPTIONS_PER_QUESTION {
        let placeholder = format!("Option {label}");
        label += 1;
        if !options.contains(&placeholder) {
            options.push(placeholder);
        }
    }
    options.shuffle(rng);

    QuizQuestion {
        question_text: format!("What is the meaning of '{}'?", word.text),
        options,
        correct_answer: correct.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Translation;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn word(id: i64, text: &str, meaning: Option<&str>) -> WordCandidate {
        WordCandidate {
            id,
            text: text.to_string(),
            translations: meaning
                .map(|m| {
                    vec![Translation {
                        language: "vi".to_string(),
                        meaning: m.to_string(),
                    }]
                })
                .unwrap_or_default(),
        }
    }

    fn translated_words(count: i64) -> Vec<WordCandidate> {
        (1..=count)
            .map(|i| word(i, &format!("word{i}"), Some(&format!("meaning{i}"))))
            .collect()
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn assert_well_formed(question: &QuizQuestion) {
        assert_eq!(question.options.len(), OPTIONS_PER_QUESTION);
        let distinct: HashSet<&String> = question.options.iter().collect();
        assert_eq!(distinct.len(), OPTIONS_PER_QUESTION, "{:?}", question.options);
        assert!(question.options.contains(&question.correct_answer));
    }

    #[test]
    fn ten_words_give_five_questions() {
        let words = translated_words(10);
        let questions = generate_questions(&words, DEFAULT_MAX_QUESTIONS, &mut rng(1)).unwrap();

        assert_eq!(questions.len(), 5);
        let subjects: HashSet<&str> = questions.iter().map(|q| q.question_text.as_str()).collect();
        assert_eq!(subjects.len(), 5);
        for question in &questions {
            assert_well_formed(question);
        }
    }

    #[test]
    fn correct_answer_matches_subject() {
        let words = translated_words(6);
        for question in generate_questions(&words, 6, &mut rng(3)).unwrap() {
            let subject = words
                .iter()
                .find(|w| question.question_text == format!("What is the meaning of '{}'?", w.text))
                .expect("question refers to an input word");
            assert_eq!(question.correct_answer, subject.answer());
        }
    }

    #[test]
    fn two_words_are_padded() {
        let words = translated_words(2);
        let questions = generate_questions(&words, DEFAULT_MAX_QUESTIONS, &mut rng(2)).unwrap();

        assert_eq!(questions.len(), 2);
        for question in &questions {
            assert_well_formed(question);
            assert!(question.options.contains(&"Option 2".to_string()));
            assert!(question.options.contains(&"Option 3".to_string()));
        }
    }

    #[test]
    fn single_word_gets_three_placeholders() {
        let words = vec![word(1, "cat", Some("con mèo"))];
        let questions = generate_questions(&words, 5, &mut rng(4)).unwrap();

        assert_eq!(questions.len(), 1);
        let mut options = questions[0].options.clone();
        options.sort();
        assert_eq!(options, vec!["Option 1", "Option 2", "Option 3", "con mèo"]);
        assert_eq!(questions[0].question_text, "What is the meaning of 'cat'?");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(generate_questions(&[], 5, &mut rng(0)), Err(CoreError::NoWords));
    }

    #[test]
    fn zero_questions_is_rejected() {
        let words = translated_words(3);
        assert_eq!(
            generate_questions(&words, 0, &mut rng(0)),
            Err(CoreError::NoQuestionsRequested)
        );
    }

    #[test]
    fn untranslated_words_fall_back_to_text() {
        let words = vec![word(1, "dog", None), word(2, "cat", None), word(3, "cow", None)];
        let questions = generate_questions(&words, 5, &mut rng(5)).unwrap();

        assert_eq!(questions.len(), 3);
        for question in &questions {
            assert_well_formed(question);
            assert!(["dog", "cat", "cow"].contains(&question.correct_answer.as_str()));
        }
    }

    #[test]
    fn translated_words_are_preferred() {
        let words = vec![
            word(1, "dog", Some("con chó")),
            word(2, "cat", None),
            word(3, "cow", Some("con bò")),
        ];
        let questions = generate_questions(&words, 5, &mut rng(6)).unwrap();

        assert_eq!(questions.len(), 2);
        for question in &questions {
            assert!(!question.question_text.contains("'cat'"));
            assert!(!question.options.contains(&"cat".to_string()));
        }
    }

    #[test]
    fn duplicate_meanings_do_not_repeat_options() {
        let words = vec![
            word(1, "big", Some("lớn")),
            word(2, "large", Some("lớn")),
            word(3, "huge", Some("lớn")),
            word(4, "small", Some("nhỏ")),
        ];
        for question in generate_questions(&words, 4, &mut rng(7)).unwrap() {
            assert_well_formed(&question);
        }
    }

    #[test]
    fn duplicate_words_are_one_subject() {
        let words = vec![word(1, "sun", Some("mặt trời")), word(1, "sun", Some("mặt trời"))];
        let questions = generate_questions(&words, 5, &mut rng(8)).unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn placeholder_labels_skip_real_answers() {
        let words = vec![word(1, "one", Some("Option 2")), word(2, "two", Some("hai"))];
        for question in generate_questions(&words, 5, &mut rng(9)).unwrap() {
            assert_well_formed(&question);
        }
    }

    #[test]
    fn same_seed_same_quiz() {
        let words = translated_words(8);
        let first = generate_questions(&words, 5, &mut rng(42)).unwrap();
        let second = generate_questions(&words, 5, &mut rng(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn correct_answer_position_varies() {
        let words = translated_words(6);
        let mut positions = [0usize; OPTIONS_PER_QUESTION];

        for seed in 0..200 {
            for question in generate_questions(&words, 5, &mut rng(seed)).unwrap() {
                let index = question
                    .options
                    .iter()
                    .position(|o| *o == question.correct_answer)
                    .unwrap();
                positions[index] += 1;
            }
        }

        // 1000 questions; each slot should be hit roughly 250 times.
        for count in positions {
            assert!(count > 150, "positions skewed: {positions:?}");
        }
    }
}
