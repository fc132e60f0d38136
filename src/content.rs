//! Content collaborator boundary
//!
//! Word lists seed the bricks of each level; quizzes run between levels.
//! Both come from an external generator that answers a topic prompt with JSON
//! matching [`word_list_schema`] / [`quiz_schema`]. This module decodes those
//! payloads and ships a built-in offline source.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::consts::{QUIZ_QUESTIONS, WORDS_PER_LEVEL};

/// A vocabulary term and its definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub primary: String,
    pub definition: String,
}

impl WordPair {
    pub fn new(primary: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            definition: definition.into(),
        }
    }

    fn is_usable(&self) -> bool {
        !self.primary.trim().is_empty() && !self.definition.trim().is_empty()
    }
}

/// A multiple-choice question with four options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
}

impl QuizQuestion {
    fn is_usable(&self) -> bool {
        !self.question.trim().is_empty() && self.options.len() == 4 && self.correct_index < 4
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }
}

/// Errors that can occur while fetching or decoding content
#[derive(Debug)]
pub enum ContentError {
    /// Transport or service failure
    Unavailable(String),
    /// Payload did not decode
    Malformed(String),
    /// Payload decoded but held no usable items
    Empty,
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::Malformed(e.to_string())
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::Unavailable(e) => write!(f, "content unavailable: {}", e),
            ContentError::Malformed(e) => write!(f, "malformed content: {}", e),
            ContentError::Empty => write!(f, "content contained no usable items"),
        }
    }
}

impl std::error::Error for ContentError {}

/// Something that can produce level words and quizzes for a topic
pub trait ContentSource {
    fn fetch_words(&mut self, topic: &str) -> Result<Vec<WordPair>, ContentError>;
    fn fetch_quiz(&mut self, topic: &str) -> Result<Vec<QuizQuestion>, ContentError>;
}

/// Schema sent alongside the word-list prompt
pub fn word_list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "words": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "primary": { "type": "string" },
                        "definition": { "type": "string" }
                    },
                    "required": ["primary", "definition"]
                }
            }
        },
        "required": ["words"]
    })
}

/// Schema sent alongside the quiz prompt
pub fn quiz_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "options": {
                            "type": "array",
                            "items": { "type": "string" },
                            "minItems": 4,
                            "maxItems": 4
                        },
                        "correctIndex": { "type": "integer", "minimum": 0, "maximum": 3 }
                    },
                    "required": ["question", "options", "correctIndex"]
                }
            }
        },
        "required": ["questions"]
    })
}

/// Prompt text for a level's word list
pub fn word_list_prompt(topic: &str) -> String {
    format!(
        "List {} distinct terms about \"{}\" with a one-sentence definition each.",
        WORDS_PER_LEVEL, topic
    )
}

/// Prompt text for a between-levels quiz
pub fn quiz_prompt(topic: &str) -> String {
    format!(
        "Write {} multiple-choice questions about \"{}\", each with exactly four options.",
        QUIZ_QUESTIONS, topic
    )
}

/// Pull the item array out of either `{"<key>": [...]}` or a bare array
fn items(value: Value, key: &str) -> Result<Vec<Value>, ContentError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ContentError::Malformed(format!("missing \"{}\" array", key))),
        },
        _ => Err(ContentError::Malformed("expected object or array".into())),
    }
}

/// Decode a word-list response. Malformed items are skipped; fewer words
/// than requested is fine, none is an error.
pub fn parse_word_list(json: &str) -> Result<Vec<WordPair>, ContentError> {
    let value: Value = serde_json::from_str(json)?;
    let words: Vec<WordPair> = items(value, "words")?
        .into_iter()
        .filter_map(|item| serde_json::from_value::<WordPair>(item).ok())
        .filter(WordPair::is_usable)
        .collect();

    if words.is_empty() {
        return Err(ContentError::Empty);
    }
    if words.len() < WORDS_PER_LEVEL {
        log::warn!("Word list short: {}/{} usable", words.len(), WORDS_PER_LEVEL);
    }
    Ok(words)
}

/// Decode a quiz response, keeping only questions with four options and an
/// in-range answer
pub fn parse_quiz(json: &str) -> Result<Vec<QuizQuestion>, ContentError> {
    let value: Value = serde_json::from_str(json)?;
    let questions: Vec<QuizQuestion> = items(value, "questions")?
        .into_iter()
        .filter_map(|item| serde_json::from_value::<QuizQuestion>(item).ok())
        .filter(QuizQuestion::is_usable)
        .collect();

    if questions.is_empty() {
        return Err(ContentError::Empty);
    }
    Ok(questions)
}

const OFFLINE_WORDS: &[(&str, &str)] = &[
    ("Ephemeral", "Lasting for a very short time"),
    ("Ubiquitous", "Present, appearing, or found everywhere"),
    ("Serendipity", "Finding something good without looking for it"),
    ("Quixotic", "Exceedingly idealistic and unrealistic"),
    ("Laconic", "Using very few words"),
    ("Pernicious", "Having a harmful effect, especially gradually"),
    ("Sycophant", "A person who flatters to gain advantage"),
    ("Mellifluous", "Sweet or musical; pleasant to hear"),
    ("Obfuscate", "Make obscure or unclear"),
    ("Gregarious", "Fond of company; sociable"),
    ("Ineffable", "Too great to be expressed in words"),
    ("Perfidious", "Deceitful and untrustworthy"),
    ("Vicarious", "Experienced through another person"),
    ("Recalcitrant", "Stubbornly uncooperative"),
    ("Magnanimous", "Generous or forgiving toward a rival"),
    ("Petrichor", "The smell of earth after rain"),
    ("Halcyon", "Idyllically happy and peaceful"),
    ("Sanguine", "Optimistic, especially in a bad situation"),
];

/// Built-in deterministic content, used offline and in tests
#[derive(Debug, Clone)]
pub struct OfflineContent {
    words: Vec<WordPair>,
    /// Rotates which slice of the word bank each fetch returns
    cursor: usize,
}

impl Default for OfflineContent {
    fn default() -> Self {
        Self {
            words: OFFLINE_WORDS
                .iter()
                .map(|(term, def)| WordPair::new(*term, *def))
                .collect(),
            cursor: 0,
        }
    }
}

impl OfflineContent {
    /// Up to one level's worth of words, starting at the cursor
    pub fn words(&self) -> Vec<WordPair> {
        let n = self.words.len();
        (0..WORDS_PER_LEVEL.min(n))
            .map(|i| self.words[(self.cursor + i) % n].clone())
            .collect()
    }

    /// "Which word means ..." questions built from the word bank
    pub fn quiz(&self) -> Vec<QuizQuestion> {
        let n = self.words.len();
        (0..QUIZ_QUESTIONS.min(n))
            .map(|i| {
                let answer = (self.cursor + i * 3) % n;
                let correct_index = (answer + i) % 4;
                let mut options = Vec::with_capacity(4);
                let mut distractor = answer;
                for slot in 0..4 {
                    if slot == correct_index {
                        options.push(self.words[answer].primary.clone());
                    } else {
                        distractor = (distractor + 5) % n;
                        if distractor == answer {
                            distractor = (distractor + 1) % n;
                        }
                        options.push(self.words[distractor].primary.clone());
                    }
                }
                QuizQuestion {
                    question: format!("Which word means \"{}\"?", self.words[answer].definition),
                    options,
                    correct_index,
                }
            })
            .collect()
    }
}

impl ContentSource for OfflineContent {
    fn fetch_words(&mut self, topic: &str) -> Result<Vec<WordPair>, ContentError> {
        log::debug!("Offline words for topic '{}'", topic);
        let words = self.words();
        self.cursor = (self.cursor + 7) % self.words.len().max(1);
        Ok(words)
    }

    fn fetch_quiz(&mut self, topic: &str) -> Result<Vec<QuizQuestion>, ContentError> {
        log::debug!("Offline quiz for topic '{}'", topic);
        Ok(self.quiz())
    }
}
