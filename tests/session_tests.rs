//! Session engine integration tests.
//!
//! These tests drive `SessionEngine` on virtual time through the public
//! API only: selection rules, move counting, scoring, and the three ways a
//! session can end.

use std::cell::RefCell;
use std::rc::Rc;

use memory_match::{
    CardId, Difficulty, DifficultyProfile, EngineConfig, GameError, GameSession, IgnoreReason, MatchOutcome,
    Phase, Scheduler, Selection, SessionEngine, SessionReport, SymbolCatalog,
};

// =============================================================================
// Helpers
// =============================================================================

fn engine() -> SessionEngine {
    SessionEngine::new(EngineConfig::new().with_seed(42)).unwrap()
}

/// Record every completion report.
fn record_reports(engine: &mut SessionEngine) -> Rc<RefCell<Vec<SessionReport>>> {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reports);
    engine.on_session_complete(move |report| sink.borrow_mut().push(report.clone()));
    reports
}

/// Start a session and run out its preview.
fn start_playing(engine: &mut SessionEngine, profile: DifficultyProfile) {
    let preview_ms = profile.preview_duration_ms;
    engine.start_with_profile(profile).unwrap();
    engine.advance(preview_ms);
    assert_eq!(engine.phase(), Some(Phase::Playing));
}

fn session(engine: &SessionEngine) -> &GameSession {
    engine.session().unwrap()
}

/// Both cards carrying `symbol`.
fn pair_for(session: &GameSession, symbol: &str) -> (CardId, CardId) {
    let ids: Vec<CardId> = session
        .cards()
        .iter()
        .filter(|c| c.symbol.as_str() == symbol)
        .map(|c| c.id)
        .collect();
    assert_eq!(ids.len(), 2, "symbol {} should appear twice", symbol);
    (ids[0], ids[1])
}

/// Two unmatched cards with different symbols.
fn mismatched_pair(session: &GameSession) -> (CardId, CardId) {
    let open: Vec<_> = session.cards().iter().filter(|c| !c.matched).collect();
    let first = open[0];
    let second = open
        .iter()
        .find(|c| c.symbol != first.symbol)
        .expect("at least two unmatched pairs");
    (first.id, second.id)
}

/// Select two cards and wait out the resolution delay.
fn play_pair(engine: &mut SessionEngine, (a, b): (CardId, CardId)) -> MatchOutcome {
    assert_eq!(engine.select_card(a).unwrap(), Selection::Flipped);
    let outcome = match engine.select_card(b).unwrap() {
        Selection::Submitted { outcome, .. } => outcome,
        other => panic!("expected submission, got {:?}", other),
    };
    let timing = engine.config().timing;
    engine.advance(timing.match_delay_ms.max(timing.mismatch_delay_ms));
    outcome
}

/// Play every remaining pair, one move each.
fn solve_remaining(engine: &mut SessionEngine) {
    loop {
        let next = session(engine)
            .cards()
            .iter()
            .find(|c| !c.matched)
            .map(|c| c.symbol.as_str().to_string());
        let Some(symbol) = next else { break };
        let pair = pair_for(session(engine), &symbol);
        play_pair(engine, pair);
    }
}

// =============================================================================
// Start & Preview
// =============================================================================

/// Test that a new session opens in preview with everything face-up.
#[test]
fn test_start_enters_preview() {
    let mut engine = engine();
    let session = engine.start(Difficulty::Easy).unwrap();

    assert_eq!(session.phase(), Phase::Preview);
    assert_eq!(session.cards().len(), 12);
    assert!(session.cards().iter().all(|c| c.face_up && !c.matched));
    assert_eq!(session.moves_used(), 0);
    assert_eq!(session.score(), 0);
    assert_eq!(session.time_remaining_sec(), 60);
}

/// Test that preview ends exactly at its duration and hides all cards.
#[test]
fn test_preview_expires_into_play() {
    let mut engine = engine();
    engine.start(Difficulty::Medium).unwrap();
    let preview_ms = Difficulty::Medium.profile().preview_duration_ms;

    engine.advance(preview_ms - 1);
    assert_eq!(engine.phase(), Some(Phase::Preview));
    assert!(!engine.clock_running());

    engine.advance(1);
    assert_eq!(engine.phase(), Some(Phase::Playing));
    assert!(engine.clock_running());
    assert!(session(&engine).cards().iter().all(|c| !c.face_up));
}

/// Test that selections during preview are ignored.
#[test]
fn test_selection_ignored_during_preview() {
    let mut engine = engine();
    let first = engine.start(Difficulty::Easy).unwrap().cards()[0].id;

    assert_eq!(
        engine.select_card(first).unwrap(),
        Selection::Ignored(IgnoreReason::NotPlaying)
    );
}

/// Test that the clock does not run during preview.
#[test]
fn test_no_ticks_during_preview() {
    let mut engine = engine();
    engine.start(Difficulty::Hard).unwrap();

    engine.advance(4_000);
    assert_eq!(session(&engine).time_remaining_sec(), 120);

    // A manual tick outside play is a no-op too
    engine.tick().unwrap();
    assert_eq!(session(&engine).time_remaining_sec(), 120);
}

// =============================================================================
// Selection Rules
// =============================================================================

/// Test that clicking the same card twice flips it once.
#[test]
fn test_double_click_is_ignored() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());
    let card = session(&engine).cards()[0].id;

    assert_eq!(engine.select_card(card).unwrap(), Selection::Flipped);
    assert_eq!(
        engine.select_card(card).unwrap(),
        Selection::Ignored(IgnoreReason::AlreadyFaceUp)
    );
    assert_eq!(session(&engine).moves_used(), 0);
    assert_eq!(session(&engine).selection().len(), 1);
}

/// Test that a third card is refused while a pair is resolving.
#[test]
fn test_third_card_refused_while_resolving() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());
    let (a, b) = mismatched_pair(session(&engine));
    let third = session(&engine)
        .cards()
        .iter()
        .find(|c| c.id != a && c.id != b)
        .unwrap()
        .id;

    engine.select_card(a).unwrap();
    engine.select_card(b).unwrap();
    assert_eq!(engine.phase(), Some(Phase::Resolving));

    assert_eq!(
        engine.select_card(third).unwrap(),
        Selection::Ignored(IgnoreReason::AwaitingResolution)
    );
    assert!(!session(&engine).card(third).unwrap().face_up);
    assert_eq!(session(&engine).selection().len(), 2);
}

/// Test that unknown card ids are a no-op, not an error.
#[test]
fn test_unknown_card_is_ignored() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());

    assert_eq!(
        engine.select_card(CardId::new(999)).unwrap(),
        Selection::Ignored(IgnoreReason::UnknownCard)
    );
}

/// Test that matched cards cannot be selected again.
#[test]
fn test_matched_card_is_ignored() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());
    let (a, b) = pair_for(session(&engine), "🍎");

    assert_eq!(play_pair(&mut engine, (a, b)), MatchOutcome::Match);
    assert_eq!(
        engine.select_card(a).unwrap(),
        Selection::Ignored(IgnoreReason::AlreadyMatched)
    );
}

// =============================================================================
// Moves & Score
// =============================================================================

/// Test the mismatch-then-match walk-through on easy.
#[test]
fn test_easy_mismatch_then_match() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());

    // Mismatch
    let (a, b) = mismatched_pair(session(&engine));
    engine.select_card(a).unwrap();
    assert_eq!(
        engine.select_card(b).unwrap(),
        Selection::Submitted {
            outcome: MatchOutcome::Mismatch,
            moves_used: 1,
        }
    );

    engine.advance(799);
    assert!(session(&engine).card(a).unwrap().face_up);
    assert_eq!(engine.phase(), Some(Phase::Resolving));

    engine.advance(1);
    let s = session(&engine);
    assert!(!s.card(a).unwrap().face_up);
    assert!(!s.card(b).unwrap().face_up);
    assert_eq!(s.moves_used(), 1);
    assert_eq!(s.score(), 0);
    assert_eq!(s.phase(), Phase::Playing);

    // The apple pair
    let (x, y) = pair_for(session(&engine), "🍎");
    engine.select_card(x).unwrap();
    assert_eq!(
        engine.select_card(y).unwrap(),
        Selection::Submitted {
            outcome: MatchOutcome::Match,
            moves_used: 2,
        }
    );

    engine.advance(499);
    assert!(!session(&engine).card(x).unwrap().matched);

    engine.advance(1);
    let s = session(&engine);
    assert!(s.card(x).unwrap().matched);
    assert!(s.card(y).unwrap().matched);
    assert_eq!(s.score(), 10);
    assert_eq!(s.moves_used(), 2);
    assert!(s.selection().is_empty());
}

/// Test that a move is counted on submission, not per flip.
#[test]
fn test_move_counted_per_pair() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());
    let (a, b) = mismatched_pair(session(&engine));

    engine.select_card(a).unwrap();
    assert_eq!(session(&engine).moves_used(), 0);
    engine.select_card(b).unwrap();
    assert_eq!(session(&engine).moves_used(), 1);

    // Retrying the same pair costs another move
    engine.advance(800);
    play_pair(&mut engine, (a, b));
    assert_eq!(session(&engine).moves_used(), 2);
}

/// Test that custom points per match are applied.
#[test]
fn test_custom_points_per_match() {
    let mut engine = SessionEngine::new(EngineConfig::new().with_seed(1).with_points_per_match(25)).unwrap();
    start_playing(&mut engine, Difficulty::Easy.profile());

    let pair = pair_for(session(&engine), "🍌");
    play_pair(&mut engine, pair);
    assert_eq!(session(&engine).score(), 25);
}

// =============================================================================
// Termination
// =============================================================================

/// Test clearing the board.
#[test]
fn test_completion() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    start_playing(&mut engine, Difficulty::Easy.profile());

    solve_remaining(&mut engine);

    assert_eq!(engine.phase(), Some(Phase::Completed));
    assert_eq!(engine.final_score(), Ok(60));
    assert!(!engine.clock_running());
    assert_eq!(engine.scheduler().pending(), 0);

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_win());
    assert_eq!(reports[0].score, 60);
    assert_eq!(reports[0].moves_used, 6);
}

/// Test running out of moves on easy after one match.
#[test]
fn test_moves_exhausted() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    start_playing(&mut engine, Difficulty::Easy.profile());

    let apple = pair_for(session(&engine), "🍎");
    play_pair(&mut engine, apple);

    for played in 2..=15 {
        assert_eq!(engine.phase(), Some(Phase::Playing), "ended early before move {}", played);
        let pair = mismatched_pair(session(&engine));
        play_pair(&mut engine, pair);
    }

    assert_eq!(engine.phase(), Some(Phase::MovesExhausted));
    assert_eq!(session(&engine).moves_used(), 15);
    assert_eq!(engine.final_score(), Ok(10));

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, Phase::MovesExhausted);
    assert_eq!(reports[0].score, 10);
}

/// Test the clock running out with nobody playing.
#[test]
fn test_timed_out() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    start_playing(&mut engine, Difficulty::Easy.profile());

    engine.advance(59_000);
    assert_eq!(engine.phase(), Some(Phase::Playing));
    assert_eq!(session(&engine).time_remaining_sec(), 1);

    engine.advance(1_000);
    assert_eq!(engine.phase(), Some(Phase::TimedOut));
    assert_eq!(session(&engine).time_remaining_sec(), 0);
    assert!(!engine.clock_running());
    assert_eq!(reports.borrow().len(), 1);
    assert_eq!(reports.borrow()[0].outcome, Phase::TimedOut);
}

/// Test that finishing the board with the last allowed move completes.
#[test]
fn test_completion_beats_move_exhaustion() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    start_playing(&mut engine, Difficulty::Easy.profile().with_max_moves(6));

    solve_remaining(&mut engine);

    assert_eq!(session(&engine).moves_used(), 6);
    assert_eq!(engine.phase(), Some(Phase::Completed));
    assert_eq!(reports.borrow()[0].outcome, Phase::Completed);
}

/// Test that a match in flight when the clock expires still completes the board.
#[test]
fn test_completion_beats_time_out() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    let profile = Difficulty::Easy
        .profile()
        .with_pair_count(1)
        .with_preview_ms(1_000)
        .with_game_duration_sec(1);
    start_playing(&mut engine, profile);

    // Submit at t=1600; the clock expires at 2000, the match resolves at 2100
    engine.advance(600);
    let cards: Vec<CardId> = session(&engine).cards().iter().map(|c| c.id).collect();
    engine.select_card(cards[0]).unwrap();
    engine.select_card(cards[1]).unwrap();

    engine.advance(400);
    assert_eq!(session(&engine).time_remaining_sec(), 0);
    assert_eq!(engine.phase(), Some(Phase::Resolving));
    assert!(reports.borrow().is_empty());

    engine.advance(100);
    assert_eq!(engine.phase(), Some(Phase::Completed));
    assert_eq!(engine.final_score(), Ok(10));
    assert_eq!(reports.borrow().len(), 1);
}

/// Test that a mismatch in flight when the clock expires ends in a time-out.
#[test]
fn test_time_out_waits_for_resolution() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    let profile = Difficulty::Easy
        .profile()
        .with_pair_count(2)
        .with_preview_ms(1_000)
        .with_game_duration_sec(1);
    start_playing(&mut engine, profile);

    engine.advance(600);
    let pair = mismatched_pair(session(&engine));
    engine.select_card(pair.0).unwrap();
    engine.select_card(pair.1).unwrap();

    engine.advance(400);
    assert_eq!(engine.phase(), Some(Phase::Resolving));

    engine.advance(400);
    let s = session(&engine);
    assert_eq!(s.phase(), Phase::TimedOut);
    assert_eq!(s.moves_used(), 1);
    assert!(!s.card(pair.0).unwrap().face_up);
    assert_eq!(reports.borrow().len(), 1);
    assert_eq!(reports.borrow()[0].outcome, Phase::TimedOut);
}

/// Test that nothing changes once a session is over.
#[test]
fn test_terminal_is_final() {
    let mut engine = engine();
    let reports = record_reports(&mut engine);
    start_playing(&mut engine, Difficulty::Easy.profile());
    engine.advance(60_000);
    assert_eq!(engine.phase(), Some(Phase::TimedOut));

    let before = session(&engine).clone();
    let card = before.cards()[0].id;

    assert_eq!(
        engine.select_card(card).unwrap(),
        Selection::Ignored(IgnoreReason::NotPlaying)
    );
    engine.tick().unwrap();
    engine.advance(120_000);

    let after = session(&engine);
    assert_eq!(after.cards(), before.cards());
    assert_eq!(after.score(), before.score());
    assert_eq!(after.moves_used(), before.moves_used());
    assert_eq!(after.time_remaining_sec(), before.time_remaining_sec());
    assert_eq!(after.history().len(), before.history().len());
    assert_eq!(reports.borrow().len(), 1);
}

// =============================================================================
// Errors
// =============================================================================

/// Test that operations before start are protocol errors.
#[test]
fn test_operations_before_start() {
    let mut engine = engine();

    assert!(matches!(
        engine.select_card(CardId::new(0)),
        Err(GameError::IllegalState { operation: "select_card", .. })
    ));
    assert!(matches!(engine.tick(), Err(GameError::IllegalState { operation: "tick", .. })));
    assert!(engine.final_score().unwrap_err().is_protocol_error());
}

/// Test that the final score is unavailable mid-session.
#[test]
fn test_final_score_requires_terminal_phase() {
    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());

    assert!(matches!(engine.final_score(), Err(GameError::IllegalState { .. })));
}

/// Test that a catalog too small for the difficulty fails at start.
#[test]
fn test_insufficient_symbols_at_start() {
    let catalog = SymbolCatalog::from_symbols(["a", "b", "c", "d", "e", "f", "g"]).unwrap();
    let mut engine = SessionEngine::new(EngineConfig::new().with_seed(3).with_catalog(catalog)).unwrap();

    // Easy needs 6 symbols and works
    engine.start(Difficulty::Easy).unwrap();
    let live = session(&engine).id();

    // Medium needs 8
    assert_eq!(
        engine.start(Difficulty::Medium).unwrap_err(),
        GameError::InsufficientSymbols {
            requested: 8,
            available: 7,
        }
    );

    // The running session is untouched
    assert_eq!(session(&engine).id(), live);
    assert_eq!(engine.phase(), Some(Phase::Preview));
}

/// Test that a failed start leaves the seeded deck sequence unchanged.
#[test]
fn test_failed_start_keeps_deck_sequence() {
    let catalog = SymbolCatalog::from_symbols(["a", "b", "c", "d", "e", "f", "g"]).unwrap();
    let config = EngineConfig::new().with_seed(3).with_catalog(catalog);
    let mut with_failure = SessionEngine::new(config.clone()).unwrap();
    let mut clean = SessionEngine::new(config).unwrap();

    assert!(with_failure.start(Difficulty::Medium).is_err());
    assert!(with_failure
        .start_with_profile(Difficulty::Easy.profile().with_max_moves(0))
        .is_err());

    let a = with_failure.start(Difficulty::Easy).unwrap();
    let b = clean.start(Difficulty::Easy).unwrap();
    assert_eq!(a.deck_seed(), b.deck_seed());
    assert_eq!(a.cards(), b.cards());
}

/// Test that a bad profile is rejected at start.
#[test]
fn test_invalid_profile_at_start() {
    let mut engine = engine();
    let result = engine.start_with_profile(Difficulty::Easy.profile().with_game_duration_sec(0));

    assert!(matches!(result, Err(GameError::InvalidProfile(_))));
    assert!(engine.session().is_none());
}

/// Test that invalid engine configuration is rejected up front.
#[test]
fn test_invalid_engine_config() {
    let config = EngineConfig::new().with_timing(memory_match::MatchTiming::new(800, 500));
    assert!(matches!(SessionEngine::new(config), Err(GameError::InvalidConfig(_))));
}

// =============================================================================
// History & Snapshots
// =============================================================================

/// Test that the history records a played pair in order.
#[test]
fn test_history_records_play() {
    use memory_match::SessionEvent;

    let mut engine = engine();
    start_playing(&mut engine, Difficulty::Easy.profile());
    let (a, b) = pair_for(session(&engine), "🍎");
    play_pair(&mut engine, (a, b));

    let history: Vec<_> = session(&engine).history().iter().cloned().collect();
    assert!(matches!(history[0], SessionEvent::Started { difficulty: Difficulty::Easy, cards: 12, .. }));
    assert_eq!(history[1], SessionEvent::PlayBegan);
    assert_eq!(history[2], SessionEvent::CardFlipped { card: a });
    assert_eq!(history[3], SessionEvent::CardFlipped { card: b });
    assert!(history.contains(&SessionEvent::PairResolved {
        outcome: MatchOutcome::Match,
        score: 10,
    }));
}

/// Test that the same seed deals the same decks.
#[test]
fn test_seeded_engines_deal_identical_decks() {
    let mut first = engine();
    let mut second = engine();

    for _ in 0..3 {
        let a = first.start(Difficulty::Hard).unwrap().cards().to_vec();
        let b = second.start(Difficulty::Hard).unwrap().cards().to_vec();
        assert_eq!(a, b);
    }
}

/// Test that a session snapshot serializes for a view layer.
#[test]
fn test_session_snapshot_json() {
    let mut engine = engine();
    engine.start(Difficulty::Easy).unwrap();

    let json = serde_json::to_value(session(&engine)).unwrap();
    assert_eq!(json["phase"], "Preview");
    assert_eq!(json["profile"]["level"], "easy");
    assert_eq!(json["cards"].as_array().unwrap().len(), 12);
    assert_eq!(json["time_remaining_sec"], 60);
}
