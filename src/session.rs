//! Screen flow around the simulation
//!
//! Title → Loading → Playing → Quiz → Loading → Playing … → GameOver → Title.
//!
//! Content arrives asynchronously on the web, so a fetch is modelled as a
//! [`ContentRequest`] the host picks up with [`Session::pending_request`] and
//! answers with [`Session::resolve_words`] / [`Session::resolve_quiz`]. Every
//! request carries a ticket; answers for anything but the current ticket are
//! dropped, which is how leaving the screen cancels an in-flight fetch.

use crate::consts::SCORE_QUIZ_ANSWER;
use crate::content::{ContentError, ContentSource, QuizQuestion, WordPair};
use crate::highscores::{HighScore, ScoreStore, load_or_default};
use crate::input::InputNormalizer;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Snapshot, tick};

/// What is being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Words,
    Quiz,
}

/// An outstanding content fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub ticket: u64,
    pub kind: ContentKind,
    pub topic: String,
}

/// Progress through a between-levels quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    pub questions: Vec<QuizQuestion>,
    /// Index of the question being shown
    pub index: usize,
    pub correct: usize,
}

impl QuizState {
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }
}

/// Which screen the host should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Title,
    /// Simulation suspended until the request resolves
    Loading { kind: ContentKind },
    Playing,
    Quiz(QuizState),
    GameOver { final_score: u64, new_record: bool },
}

/// One player's run plus the screens around it
pub struct Session {
    settings: Settings,
    screen: Screen,
    state: Option<GameState>,
    input: InputNormalizer,
    snapshot: Option<Snapshot>,
    high_score: HighScore,
    store: Box<dyn ScoreStore>,
    pending: Option<ContentRequest>,
    next_ticket: u64,
    seed: u64,
    runs: u64,
    /// Best score when the current run began
    best_at_run_start: u64,
}

impl Session {
    /// `seed` is used when the settings do not pin one
    pub fn new(settings: Settings, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let high_score = load_or_default(store.as_ref());
        let seed = settings.seed.unwrap_or(seed);
        Self {
            settings,
            screen: Screen::Title,
            state: None,
            input: InputNormalizer::new(),
            snapshot: None,
            high_score,
            store,
            pending: None,
            next_ticket: 1,
            seed,
            runs: 0,
            best_at_run_start: high_score.best,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Direct access for debug tools and tests; the tick is still the only
    /// mutator during play
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Last committed per-tick view
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Forward raw key/touch events here
    pub fn input_mut(&mut self) -> &mut InputNormalizer {
        &mut self.input
    }

    pub fn pending_request(&self) -> Option<&ContentRequest> {
        self.pending.as_ref()
    }

    fn request(&mut self, kind: ContentKind) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        log::info!("Requesting {:?} for '{}' (ticket {})", kind, self.settings.topic, ticket);
        self.pending = Some(ContentRequest {
            ticket,
            kind,
            topic: self.settings.topic.clone(),
        });
        self.screen = Screen::Loading { kind };
    }

    /// Take the pending request if `ticket` and `kind` match it
    fn accept(&mut self, ticket: u64, kind: ContentKind) -> bool {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|req| req.ticket == ticket && req.kind == kind);
        if current {
            self.pending = None;
        } else {
            log::debug!("Ignoring stale {:?} response (ticket {})", kind, ticket);
        }
        current
    }

    /// Begin a new run from the title or game-over screen
    pub fn start(&mut self) {
        if !matches!(self.screen, Screen::Title | Screen::GameOver { .. }) {
            return;
        }
        self.state = None;
        self.snapshot = None;
        self.input.reset();
        self.request(ContentKind::Words);
    }

    /// Deliver a word list. Level 1 builds a fresh run; later levels
    /// advance the existing one. A failure ends the run at the title.
    pub fn resolve_words(&mut self, ticket: u64, result: Result<Vec<WordPair>, ContentError>) {
        if !self.accept(ticket, ContentKind::Words) {
            return;
        }
        let words = match result {
            Ok(words) => words,
            Err(e) => {
                log::warn!("Word list unavailable, returning to title: {}", e);
                if self.state.is_some() {
                    self.record_high_score();
                }
                self.state = None;
                self.snapshot = None;
                self.screen = Screen::Title;
                return;
            }
        };

        match &mut self.state {
            Some(state) => state.advance_level(&words),
            None => {
                let seed = self.seed.wrapping_add(self.runs);
                self.runs += 1;
                self.best_at_run_start = self.high_score.best;
                log::info!("New run, seed {}", seed);
                self.state = Some(GameState::with_tuning(
                    self.settings.arena,
                    &words,
                    seed,
                    self.settings.enemy_budget,
                    self.settings.max_particles(),
                ));
            }
        }
        self.snapshot = self.state.as_ref().map(GameState::snapshot);
        self.input.reset();
        self.screen = Screen::Playing;
    }

    /// Deliver quiz questions. Failure or an empty quiz skips straight to
    /// the next level.
    pub fn resolve_quiz(&mut self, ticket: u64, result: Result<Vec<QuizQuestion>, ContentError>) {
        if !self.accept(ticket, ContentKind::Quiz) {
            return;
        }
        match result {
            Ok(questions) if !questions.is_empty() => {
                log::info!("Quiz ready: {} questions", questions.len());
                self.screen = Screen::Quiz(QuizState {
                    questions,
                    index: 0,
                    correct: 0,
                });
            }
            Ok(_) => {
                log::warn!("Quiz empty, skipping to next level");
                self.request(ContentKind::Words);
            }
            Err(e) => {
                log::warn!("Quiz unavailable, skipping to next level: {}", e);
                self.request(ContentKind::Words);
            }
        }
    }

    /// Answer the current question; returns whether it was correct.
    /// After the last question the next level's words are requested.
    pub fn answer(&mut self, choice: usize) -> Option<bool> {
        let Screen::Quiz(quiz) = &mut self.screen else {
            return None;
        };
        let correct = quiz.current()?.is_correct(choice);
        if correct {
            quiz.correct += 1;
        }
        quiz.index += 1;
        let finished = quiz.index >= quiz.questions.len();
        let (right, total) = (quiz.correct, quiz.questions.len());

        if let Some(state) = &mut self.state {
            if correct {
                state.award(SCORE_QUIZ_ANSWER);
            }
            self.snapshot = Some(state.snapshot());
        }
        if finished {
            log::info!("Quiz finished: {}/{} correct", right, total);
            self.request(ContentKind::Words);
        }
        Some(correct)
    }

    /// Run one display frame: read input, tick, route terminal phases.
    /// Escape leaves any in-game screen, including loading and the quiz.
    pub fn frame(&mut self) {
        if matches!(self.screen, Screen::Title | Screen::GameOver { .. }) {
            return;
        }
        let intent = self.input.next_frame();
        if intent.exit {
            self.exit();
            return;
        }
        if self.screen != Screen::Playing {
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };
        tick(state, &intent.tick);
        let phase = state.phase;
        let score = state.score;
        self.snapshot = Some(state.snapshot());

        match phase {
            GamePhase::Active => {}
            GamePhase::LevelComplete => {
                self.input.reset();
                self.record_high_score();
                self.request(ContentKind::Quiz);
            }
            GamePhase::GameOver => {
                self.input.reset();
                self.record_high_score();
                // An earlier level of this run may already have saved it
                let new_record = score > self.best_at_run_start;
                log::info!("Game over: score {} (record: {})", score, new_record);
                self.screen = Screen::GameOver {
                    final_score: score,
                    new_record,
                };
            }
        }
    }

    /// Persist the current score if it beats the stored best
    fn record_high_score(&mut self) -> bool {
        let Some(score) = self.state.as_ref().map(|s| s.score) else {
            return false;
        };
        if !self.high_score.record(score) {
            return false;
        }
        if let Err(e) = self.store.save(&self.high_score) {
            log::warn!("Failed to save high score: {}", e);
        }
        true
    }

    /// Leave the game-over screen
    pub fn return_to_title(&mut self) {
        if matches!(self.screen, Screen::GameOver { .. }) {
            self.state = None;
            self.snapshot = None;
            self.screen = Screen::Title;
        }
    }

    /// Leave the game screen: drop the run, cancel fetches and input
    pub fn exit(&mut self) {
        log::info!("Exit to title from {:?}", self.screen_name());
        self.input.reset();
        self.state = None;
        self.snapshot = None;
        self.pending = None;
        self.screen = Screen::Title;
    }

    fn screen_name(&self) -> &'static str {
        match self.screen {
            Screen::Title => "title",
            Screen::Loading { .. } => "loading",
            Screen::Playing => "playing",
            Screen::Quiz(_) => "quiz",
            Screen::GameOver { .. } => "game over",
        }
    }

    /// Resolve the pending request synchronously from `source`.
    /// Returns false when nothing was pending.
    pub fn pump(&mut self, source: &mut impl ContentSource) -> bool {
        let Some(req) = self.pending.clone() else {
            return false;
        };
        match req.kind {
            ContentKind::Words => {
                let result = source.fetch_words(&req.topic);
                self.resolve_words(req.ticket, result);
            }
            ContentKind::Quiz => {
                let result = source.fetch_quiz(&req.topic);
                self.resolve_quiz(req.ticket, result);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::OfflineContent;
    use crate::highscores::MemoryStore;
    use crate::input::Key;

    fn session() -> Session {
        Session::new(Settings::default(), Box::new(MemoryStore::default()), 9)
    }

    fn playing() -> Session {
        let mut s = session();
        s.start();
        assert!(s.pump(&mut OfflineContent::default()));
        assert_eq!(*s.screen(), Screen::Playing);
        s
    }

    #[test]
    fn test_start_requests_words() {
        let mut s = session();
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.pending_request().is_none());
        s.start();
        assert_eq!(*s.screen(), Screen::Loading { kind: ContentKind::Words });
        let req = s.pending_request().unwrap();
        assert_eq!(req.kind, ContentKind::Words);
        assert_eq!(req.topic, Settings::default().topic);
    }

    #[test]
    fn test_loading_does_not_tick() {
        let mut s = session();
        s.start();
        s.frame();
        assert!(s.state().is_none());
        assert!(matches!(s.screen(), Screen::Loading { .. }));
    }

    #[test]
    fn test_word_failure_returns_to_title() {
        let mut s = session();
        s.start();
        let ticket = s.pending_request().unwrap().ticket;
        s.resolve_words(ticket, Err(ContentError::Unavailable("offline".into())));
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.state().is_none());
        assert!(s.pending_request().is_none());
    }

    #[test]
    fn test_stale_response_ignored() {
        let mut s = session();
        s.start();
        let ticket = s.pending_request().unwrap().ticket;
        s.exit();
        s.resolve_words(ticket, Ok(OfflineContent::default().words()));
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.state().is_none());

        // A quiz answer cannot resolve a word request
        s.start();
        let ticket = s.pending_request().unwrap().ticket;
        s.resolve_quiz(ticket, Ok(Vec::new()));
        assert_eq!(s.pending_request().unwrap().ticket, ticket);
        assert!(matches!(s.screen(), Screen::Loading { kind: ContentKind::Words }));
    }

    #[test]
    fn test_frame_ticks_and_publishes_snapshot() {
        let mut s = playing();
        s.input_mut().key_down(Key::Fire);
        s.frame();
        let state = s.state().unwrap();
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(s.snapshot().unwrap(), &state.snapshot());
    }

    #[test]
    fn test_escape_cancels_everything() {
        let mut s = playing();
        s.input_mut().touch_start(10.0, 10.0);
        s.input_mut().key_down(Key::Exit);
        s.frame();
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.state().is_none());
        assert!(s.snapshot().is_none());
        assert!(!s.input_mut().auto_fire_active());
    }

    fn complete_level(s: &mut Session) {
        if let Some(state) = s.state.as_mut() {
            state.words_destroyed = state.total_words;
            state.enemies_total = 0;
            state.enemies.clear();
        }
        s.frame();
    }

    #[test]
    fn test_level_complete_quiz_then_next_level() {
        let mut s = playing();
        complete_level(&mut s);
        assert!(matches!(s.screen(), Screen::Loading { kind: ContentKind::Quiz }));

        s.pump(&mut OfflineContent::default());
        let Screen::Quiz(quiz) = s.screen().clone() else {
            panic!("expected quiz, got {:?}", s.screen());
        };
        let before = s.state().unwrap().score;

        // First answer right, the rest wrong
        let mut results = Vec::new();
        for (i, q) in quiz.questions.iter().enumerate() {
            let choice = if i == 0 { q.correct_index } else { (q.correct_index + 1) % 4 };
            results.push(s.answer(choice).unwrap());
        }
        assert!(results[0]);
        assert!(results[1..].iter().all(|r| !r));
        assert_eq!(s.state().unwrap().score, before + SCORE_QUIZ_ANSWER);
        assert!(matches!(s.screen(), Screen::Loading { kind: ContentKind::Words }));

        s.pump(&mut OfflineContent::default());
        let state = s.state().unwrap();
        assert_eq!(*s.screen(), Screen::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.score, before + SCORE_QUIZ_ANSWER);
    }

    #[test]
    fn test_level_complete_saves_high_score() {
        let mut s = playing();
        if let Some(state) = s.state.as_mut() {
            state.award(900);
        }
        complete_level(&mut s);
        assert!(matches!(s.screen(), Screen::Loading { kind: ContentKind::Quiz }));
        assert_eq!(s.high_score().best, 900);
        assert_eq!(s.store.load().unwrap().best, 900);

        // Leaving from the quiz keeps it
        s.exit();
        assert_eq!(s.store.load().unwrap().best, 900);
    }

    #[test]
    fn test_game_over_after_saved_level_is_still_a_record() {
        let mut s = playing();
        if let Some(state) = s.state.as_mut() {
            state.award(300);
        }
        complete_level(&mut s);
        assert_eq!(s.high_score().best, 300);
        if let Some(state) = s.state.as_mut() {
            state.phase = GamePhase::GameOver;
        }
        s.screen = Screen::Playing;
        s.frame();
        assert_eq!(
            *s.screen(),
            Screen::GameOver {
                final_score: 300,
                new_record: true
            }
        );
    }

    #[test]
    fn test_escape_on_quiz_and_loading() {
        let mut s = playing();
        complete_level(&mut s);
        s.pump(&mut OfflineContent::default());
        assert!(matches!(s.screen(), Screen::Quiz(_)));
        s.input_mut().key_down(Key::Exit);
        s.frame();
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.state().is_none());

        // Escape while loading cancels the fetch
        s.start();
        let ticket = s.pending_request().unwrap().ticket;
        s.input_mut().key_down(Key::Exit);
        s.frame();
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.pending_request().is_none());
        s.resolve_words(ticket, Ok(OfflineContent::default().words()));
        assert_eq!(*s.screen(), Screen::Title);
    }

    #[test]
    fn test_quiz_failure_skips_to_next_level() {
        let mut s = playing();
        complete_level(&mut s);
        let ticket = s.pending_request().unwrap().ticket;
        s.resolve_quiz(ticket, Err(ContentError::Malformed("bad".into())));
        assert!(matches!(s.screen(), Screen::Loading { kind: ContentKind::Words }));
        s.pump(&mut OfflineContent::default());
        assert_eq!(s.state().unwrap().level, 2);
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut s = playing();
        if let Some(state) = s.state.as_mut() {
            state.award(700);
            state.base.destroyed = true;
            state.phase = GamePhase::GameOver;
        }
        // Terminal phase is routed on the next frame
        s.frame();
        assert_eq!(
            *s.screen(),
            Screen::GameOver {
                final_score: 700,
                new_record: true
            }
        );
        assert_eq!(s.high_score().best, 700);
        assert_eq!(s.store.load().unwrap().best, 700);

        s.return_to_title();
        assert_eq!(*s.screen(), Screen::Title);
        assert!(s.state().is_none());
    }

    #[test]
    fn test_answer_outside_quiz_is_ignored() {
        let mut s = playing();
        assert_eq!(s.answer(0), None);
    }
}
