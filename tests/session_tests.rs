//! Session lifecycle through the public manager API.

use std::sync::Arc;
use std::thread;

use bagh::core::{Action, MatchConfig, ParticipantId, Seat, SessionConfig};
use bagh::game::MatchEnd;
use bagh::session::{
    ChallengeIssued, CommitOutcome, DrawVote, InMemorySessionRegistry, SessionError, SessionKind, SessionManager,
    SessionRegistry, SessionView,
};

const ALICE: ParticipantId = ParticipantId::new(11);
const BOB: ParticipantId = ParticipantId::new(22);
const CAROL: ParticipantId = ParticipantId::new(33);
const BOT: ParticipantId = ParticipantId::new(99);

fn manager(win_threshold: u32) -> SessionManager {
    SessionManager::new(
        SessionConfig::new(5)
            .with_match_config(MatchConfig::default().with_win_threshold(win_threshold))
            .with_ai_participant(BOT),
    )
}

fn start_match(manager: &SessionManager) {
    manager.issue_challenge(ALICE, BOB).unwrap();
    manager.accept(BOB).unwrap();
}

fn round(manager: &SessionManager, alice: Action, bob: Action) -> CommitOutcome {
    assert_eq!(manager.commit_action(ALICE, alice), Ok(CommitOutcome::Waiting));
    manager.commit_action(BOB, bob).unwrap()
}

// =============================================================================
// Challenges
// =============================================================================

/// Both members of a pairing are busy; a third party cannot join either.
#[test]
fn test_one_session_per_participant() {
    let manager = manager(3);
    manager.issue_challenge(ALICE, BOB).unwrap();

    assert_eq!(manager.issue_challenge(CAROL, BOB), Err(SessionError::Busy(BOB)));
    assert_eq!(manager.issue_challenge(ALICE, CAROL), Err(SessionError::Busy(ALICE)));
    assert!(!manager.is_busy(CAROL).unwrap());
    assert_eq!(manager.registry().session_count().unwrap(), 1);
}

/// Refusing removes the session for both participants.
#[test]
fn test_refuse_frees_both() {
    let manager = manager(3);
    manager.issue_challenge(ALICE, BOB).unwrap();
    manager.refuse(BOB).unwrap();

    assert_eq!(manager.view(ALICE), Err(SessionError::NoSession(ALICE)));
    assert_eq!(manager.view(BOB), Err(SessionError::NoSession(BOB)));
    assert!(manager.issue_challenge(BOB, ALICE).is_ok());
}

/// Operations on a session nobody is in fail cleanly.
#[test]
fn test_no_session() {
    let manager = manager(3);
    assert_eq!(manager.accept(BOB), Err(SessionError::NoSession(BOB)));
    assert_eq!(manager.rescind(ALICE), Err(SessionError::NoSession(ALICE)));
    assert_eq!(
        manager.commit_action(ALICE, Action::Boost),
        Err(SessionError::NoSession(ALICE))
    );
}

/// A pending challenge rejects match operations with the expected stage.
#[test]
fn test_match_operations_need_a_match() {
    let manager = manager(3);
    manager.issue_challenge(ALICE, BOB).unwrap();

    let expected = Err(SessionError::InvalidTransition {
        expected: SessionKind::MatchOngoing,
        found: SessionKind::AwaitingChallengeResponse,
    });
    assert_eq!(manager.forfeit(ALICE).map(|_| ()), expected);
    assert_eq!(manager.vote_draw(BOB).map(|_| ()), expected);
    assert_eq!(manager.undo_action(ALICE), expected);
}

// =============================================================================
// Matches
// =============================================================================

/// A full match to one win removes the session on the final round.
#[test]
fn test_match_completion_removes_session() {
    let manager = manager(1);
    start_match(&manager);

    round(&manager, Action::Attack, Action::Boost);
    round(&manager, Action::Attack, Action::Boost);
    let CommitOutcome::Resolved(report) = round(&manager, Action::Attack, Action::Boost) else {
        panic!("round should resolve");
    };

    assert!(report.match_ended());
    assert!(report.match_result.unwrap().is_winner(Seat::Challenger));
    assert!(!manager.is_busy(ALICE).unwrap());
    assert!(!manager.is_busy(BOB).unwrap());
    assert_eq!(
        manager.commit_action(ALICE, Action::Attack),
        Err(SessionError::NoSession(ALICE))
    );
}

/// The view shows who has committed without revealing what.
#[test]
fn test_view_shows_commitment() {
    let manager = manager(3);
    start_match(&manager);
    manager.commit_action(BOB, Action::Heal).unwrap();

    let SessionView::MatchOngoing(view) = manager.view(ALICE).unwrap() else {
        panic!("match ongoing");
    };
    assert!(!view.players[Seat::Challenger].committed);
    assert!(view.players[Seat::Challengee].committed);
    let json = serde_json::to_string(&view).unwrap();
    assert!(!json.contains("Heal"));
}

/// Forfeiting hands the match to the opponent.
#[test]
fn test_forfeit() {
    let manager = manager(3);
    start_match(&manager);
    let conclusion = manager.forfeit(ALICE).unwrap();

    assert_eq!(conclusion.end, MatchEnd::Forfeited { by: Seat::Challenger });
    assert!(conclusion.end.result().is_winner(Seat::Challengee));
    assert_eq!(manager.registry().session_count().unwrap(), 0);
}

/// Draw votes must both land in the same round.
#[test]
fn test_draw_vote_same_round() {
    let manager = manager(3);
    start_match(&manager);

    assert_eq!(manager.vote_draw(ALICE), Ok(DrawVote::Pending));
    assert_eq!(manager.vote_draw(ALICE), Ok(DrawVote::Pending));
    round(&manager, Action::Guard, Action::Guard);
    assert_eq!(manager.vote_draw(BOB), Ok(DrawVote::Pending));

    let DrawVote::Agreed(conclusion) = manager.vote_draw(ALICE).unwrap() else {
        panic!("both voted this round");
    };
    assert_eq!(conclusion.end, MatchEnd::AgreedDraw);
    assert!(!manager.is_busy(ALICE).unwrap());
}

// =============================================================================
// Solo play
// =============================================================================

/// Against the AI only the human is registered, and the AI always has a move in.
#[test]
fn test_solo_match() {
    let manager = manager(1);
    let ChallengeIssued::SoloMatchStarted(view) = manager.issue_challenge(ALICE, BOT).unwrap() else {
        panic!("solo match expected");
    };
    assert_eq!(view.players[Seat::Challengee].participant, BOT);
    assert!(!manager.is_busy(BOT).unwrap());

    for _ in 0..50 {
        match manager.commit_action(ALICE, Action::Attack) {
            Ok(CommitOutcome::Resolved(report)) if report.match_ended() => {
                assert!(!manager.is_busy(ALICE).unwrap());
                return;
            }
            Ok(CommitOutcome::Resolved(_)) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    panic!("solo match did not finish");
}

/// The AI never votes, so a solo draw vote stays pending.
#[test]
fn test_solo_draw_vote_pending() {
    let manager = manager(3);
    manager.issue_challenge(ALICE, BOT).unwrap();
    assert_eq!(manager.vote_draw(ALICE), Ok(DrawVote::Pending));
}

// =============================================================================
// Concurrency
// =============================================================================

/// Simultaneous commits from both sides resolve exactly one round.
#[test]
fn test_concurrent_commits_resolve_once() {
    let manager = Arc::new(manager(3));
    start_match(&manager);

    let handles: Vec<_> = [(ALICE, Action::Guard), (BOB, Action::Boost)]
        .into_iter()
        .map(|(participant, action)| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || manager.commit_action(participant, action).unwrap())
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let resolved = outcomes
        .iter()
        .filter(|o| matches!(o, CommitOutcome::Resolved(_)))
        .count();
    assert_eq!(resolved, 1);

    let SessionView::MatchOngoing(view) = manager.view(BOB).unwrap() else {
        panic!("match ongoing");
    };
    assert_eq!(view.round, 2);
    assert_eq!(view.players[Seat::Challengee].boost, 1);
}

/// Separate pairings run side by side in one registry.
#[test]
fn test_independent_pairings() {
    let registry = InMemorySessionRegistry::new();
    let manager = SessionManager::with_registry(SessionConfig::new(1), registry);
    manager.issue_challenge(ALICE, BOB).unwrap();
    manager.issue_challenge(CAROL, ParticipantId::new(44)).unwrap();
    manager.rescind(ALICE).unwrap();

    assert!(manager.is_busy(CAROL).unwrap());
    assert_eq!(manager.registry().session_count().unwrap(), 1);
}
