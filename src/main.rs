//! Word Tanks entry point
//!
//! The browser build drives `Session` from the page's frame callback. The
//! native binary is a headless runner: it plays a scripted session against
//! the offline word bank and keeps the high score on disk.
//!
//! Usage: `word-tanks [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use word_tanks::content::OfflineContent;
    use word_tanks::highscores::FileStore;
    use word_tanks::input::Key;
    use word_tanks::{Screen, Session, Settings, platform};

    const DEFAULT_FRAMES: u64 = 20_000;
    /// Frames a scripted direction is held
    const HOLD_FRAMES: u64 = 45;

    platform::init_logging();
    log::info!("Word Tanks (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(std::path::Path::new(&path)),
        None => Settings::default(),
    };
    let frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let seed = settings.seed.unwrap_or_else(platform::now_seed);
    let store = FileStore::new(&settings.high_score_path);
    let mut session = Session::new(settings, Box::new(store), seed);
    let mut content = OfflineContent::default();
    let mut script = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let mut held: Option<Key> = None;

    log::info!(
        "Seed {}, {} frames, best so far {}",
        seed,
        frames,
        session.high_score().best
    );
    session.start();

    for frame in 0..frames {
        session.pump(&mut content);

        match session.screen().clone() {
            Screen::Playing => {
                if frame % HOLD_FRAMES == 0 {
                    if let Some(key) = held.take() {
                        session.input_mut().key_up(key);
                    }
                    let key = [Key::Up, Key::Left, Key::Right, Key::Down][script.random_range(0..4)];
                    session.input_mut().key_down(key);
                    held = Some(key);
                }
                session.input_mut().key_down(Key::Fire);
                session.frame();
                if let Some(snapshot) = session.snapshot() {
                    if frame % 600 == 0 {
                        log::info!(
                            "Level {} score {} lives {} words {}/{} enemies {}",
                            snapshot.level,
                            snapshot.score,
                            snapshot.lives,
                            snapshot.words_destroyed,
                            snapshot.total_words,
                            snapshot.enemies_left
                        );
                    }
                }
            }
            Screen::Quiz(quiz) => {
                // Scripted player knows about two thirds of the answers
                if let Some(q) = quiz.current() {
                    let choice = if script.random_bool(0.66) {
                        q.correct_index
                    } else {
                        (q.correct_index + 1) % q.options.len()
                    };
                    session.answer(choice);
                }
            }
            Screen::GameOver {
                final_score,
                new_record,
            } => {
                log::info!(
                    "Game over after {} frames: score {}{}",
                    frame,
                    final_score,
                    if new_record { " (new record)" } else { "" }
                );
                break;
            }
            Screen::Title => {
                log::warn!("Returned to title, stopping");
                break;
            }
            Screen::Loading { .. } => {}
        }
    }

    log::info!("Best score: {}", session.high_score().best);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page owns the frame loop; this just sets up logging
    word_tanks::platform::init_logging();
}
