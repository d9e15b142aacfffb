use crate::generate::{GenerationError, GenerationResult};

/// Answer recorded when the user skips a question.
pub const SKIP_ANSWER: &str = "Not sure";

#[derive(Debug, Clone)]
pub struct Question {
    pub key: &'static str,
    pub prompt: &'static str,
    pub choices: Vec<String>,
}

impl Question {
    pub fn new(key: &'static str, prompt: &'static str, choices: &[&str]) -> Self {
        Self {
            key,
            prompt,
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Collected answers, keyed by question and kept in question order so
/// positional payloads can be built by plain iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerRecord {
    entries: Vec<(String, String)>,
}

impl AnswerRecord {
    /// Inserts an answer, overwriting any stale value for the same key.
    pub fn insert(&mut self, key: &str, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }
}

/// Lifecycle of the single outbound generation call per questionnaire pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPhase {
    NotStarted,
    Pending,
    Succeeded(GenerationResult),
    Failed(String),
}

/// What the driver should present for the current wizard state. Owned data,
/// so rendering the same state twice yields identical descriptions.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Question {
        index: usize,
        total: usize,
        prompt: String,
        choices: Vec<String>,
        draft: String,
        draft_ready: bool,
    },
    Generating,
    Failure {
        message: String,
    },
    Result {
        text: String,
        voice_url: Option<String>,
        music_url: Option<String>,
        restartable: bool,
    },
}

/// Linear questionnaire wizard: one question at a time in fixed order,
/// ending in a single generation request.
///
/// The wizard itself never performs I/O. The driver watches `screen()`,
/// feeds user events in through `choose`/`skip`/`commit_draft`, performs the
/// outbound call when it sees `Screen::Generating`, and reports the outcome
/// via `resolve`.
pub struct Wizard {
    questions: Vec<Question>,
    position: usize,
    answers: AnswerRecord,
    draft: String,
    phase: RequestPhase,
    restart_on_success: bool,
}

impl Wizard {
    pub fn new(questions: Vec<Question>, restart_on_success: bool) -> Self {
        Self {
            questions,
            position: 0,
            answers: AnswerRecord::default(),
            draft: String::new(),
            phase: RequestPhase::NotStarted,
            restart_on_success,
        }
    }

    /// Records an answer for the current question and advances. Returns false
    /// without any effect when the value trims to empty or when no question
    /// is being asked (a call is pending or already settled).
    pub fn choose(&mut self, value: &str) -> bool {
        if !matches!(self.phase, RequestPhase::NotStarted) {
            return false;
        }
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let key = self.questions[self.position].key;
        self.answers.insert(key, value.to_string());
        self.draft.clear();
        self.position += 1;

        if self.position == self.questions.len() {
            self.phase = RequestPhase::Pending;
        }
        true
    }

    pub fn skip(&mut self) -> bool {
        self.choose(SKIP_ANSWER)
    }

    /// Updates the uncommitted free-text input for the current question.
    pub fn set_draft(&mut self, text: &str) {
        if matches!(self.phase, RequestPhase::NotStarted) {
            self.draft = text.to_string();
        }
    }

    /// Submits the draft as the answer to the current question. A draft that
    /// trims to empty is not submittable.
    pub fn commit_draft(&mut self) -> bool {
        let draft = self.draft.clone();
        self.choose(&draft)
    }

    /// Settles the in-flight generation call. A no-op unless a call is
    /// actually pending, so a late completion after a restart (or after the
    /// wizard's owner has moved on) cannot clobber state.
    pub fn resolve(&mut self, outcome: Result<GenerationResult, GenerationError>) {
        if !matches!(self.phase, RequestPhase::Pending) {
            return;
        }
        self.phase = match outcome {
            Ok(result) => RequestPhase::Succeeded(result),
            Err(err) => RequestPhase::Failed(err.to_string()),
        };
    }

    /// Discards all answers and returns to the first question. The only way
    /// back to `Asking` from a settled call; nothing is retried implicitly.
    pub fn restart(&mut self) {
        self.position = 0;
        self.answers.clear();
        self.draft.clear();
        self.phase = RequestPhase::NotStarted;
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn phase(&self) -> &RequestPhase {
        &self.phase
    }

    /// Pure mapping from wizard state to a screen description.
    pub fn screen(&self) -> Screen {
        match &self.phase {
            RequestPhase::NotStarted => {
                let question = &self.questions[self.position];
                Screen::Question {
                    index: self.position,
                    total: self.questions.len(),
                    prompt: question.prompt.to_string(),
                    choices: question.choices.clone(),
                    draft: self.draft.clone(),
                    draft_ready: !self.draft.trim().is_empty(),
                }
            }
            RequestPhase::Pending => Screen::Generating,
            RequestPhase::Failed(message) => Screen::Failure {
                message: message.clone(),
            },
            RequestPhase::Succeeded(result) => Screen::Result {
                text: result.text.clone(),
                voice_url: result.voice_url.clone(),
                music_url: result.music_url.clone(),
                restartable: self.restart_on_success,
            },
        }
    }
}
