//! Tests for match coordination: undo bounds, rejection rules and live
//! updates.

use std::time::Duration;

use strictly_scoreboard::{MatchError, MatchService, NewMatch, UpdateKind};
use strictly_tennis::{ScoringError, Side};

fn service() -> MatchService {
    MatchService::new(None, 50, 64)
}

async fn new_match(service: &MatchService) -> String {
    service
        .create_match(NewMatch::default())
        .await
        .expect("Create failed")
        .id()
        .clone()
}

/// Plays alternate games until six all, which starts a tiebreak.
async fn reach_tiebreak(service: &MatchService, id: &str) {
    for i in 0..12 {
        let side = if i % 2 == 0 { Side::A } else { Side::B };
        service.score_game(id, side).await.expect("Game failed");
    }
}

#[tokio::test]
async fn test_undo_history_is_bounded() {
    let service = service();
    let id = new_match(&service).await;

    // Alternating points keep the match far from finished.
    for i in 0..60 {
        let side = if i % 2 == 0 { Side::A } else { Side::B };
        service.score_point(&id, side).await.expect("Point failed");
    }
    let record = service.get_match(&id).await.expect("Match missing");
    assert_eq!(record.history().len(), 50);

    for _ in 0..50 {
        service.undo(&id).await.expect("Undo failed");
    }
    let err = service.undo(&id).await.unwrap_err();
    assert!(matches!(err, MatchError::NothingToUndo));
}

#[tokio::test]
async fn test_finished_match_rejects_scoring_but_allows_undo() {
    let service = service();
    let id = new_match(&service).await;
    for _ in 0..12 {
        service.score_game(&id, Side::A).await.expect("Game failed");
    }

    let record = service.get_match(&id).await.expect("Match missing");
    assert_eq!(record.state().winner(), Some(Side::A));
    assert!(record.finished_at().is_some());

    let err = service.score_point(&id, Side::B).await.unwrap_err();
    assert!(matches!(err, MatchError::AlreadyFinished));
    let err = service.score_game(&id, Side::B).await.unwrap_err();
    assert!(matches!(err, MatchError::AlreadyFinished));

    let undone = service.undo(&id).await.expect("Undo failed");
    assert_eq!(undone.state().winner(), None);
    assert!(undone.finished_at().is_none());
}

#[tokio::test]
async fn test_game_shortcut_in_tiebreak_leaves_history_untouched() {
    let service = service();
    let id = new_match(&service).await;
    reach_tiebreak(&service, &id).await;

    let before = service.get_match(&id).await.expect("Match missing");
    assert!(before.state().is_tiebreak());

    let err = service.score_game(&id, Side::A).await.unwrap_err();
    assert!(matches!(
        err,
        MatchError::Scoring(ScoringError::TiebreakInProgress)
    ));

    let after = service.get_match(&id).await.expect("Match missing");
    assert_eq!(after.history().len(), before.history().len());
    assert_eq!(after.state(), before.state());
}

#[tokio::test]
async fn test_reset_clears_score_and_history() {
    let service = service();
    let id = new_match(&service).await;
    service.score_game(&id, Side::A).await.expect("Game failed");

    let record = service.reset(&id).await.expect("Reset failed");
    assert_eq!(record.state().current_games(), [0, 0]);
    assert!(record.history().is_empty());
    assert!(service.undo(&id).await.is_err());
}

#[tokio::test]
async fn test_subscribers_receive_initial_then_each_change() {
    let service = service();
    let id = new_match(&service).await;

    let (initial, mut rx) = service.subscribe(&id).await.expect("Subscribe failed");
    assert_eq!(initial.kind, UpdateKind::Initial);
    assert_eq!(initial.summary.points.a, "0");

    service.score_point(&id, Side::A).await.expect("Point failed");
    service.undo(&id).await.expect("Undo failed");

    let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timeout")
        .expect("closed");
    assert_eq!(first.kind, UpdateKind::ScoreUpdate);
    assert_eq!(first.summary.points.a, "15");
    assert_eq!(first.match_view.undo_available, 1);

    let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timeout")
        .expect("closed");
    assert_eq!(second.summary.points.a, "0");
}

#[tokio::test]
async fn test_rejected_change_is_not_broadcast() {
    let service = service();
    let id = new_match(&service).await;
    let (_, mut rx) = service.subscribe(&id).await.expect("Subscribe failed");

    assert!(service.undo(&id).await.is_err());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_concurrent_points_are_all_counted() {
    let service = service();
    let id = new_match(&service).await;

    let mut tasks = Vec::new();
    for _ in 0..3 {
        let service = service.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            service.score_point(&id, Side::B).await
        }));
    }
    for task in tasks {
        task.await.expect("Task panicked").expect("Point failed");
    }

    let record = service.get_match(&id).await.expect("Match missing");
    assert_eq!(record.state().points(), [0, 3]);
    assert_eq!(record.history().len(), 3);
}

#[tokio::test]
async fn test_list_matches_oldest_first() {
    let service = service();
    let first = new_match(&service).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = new_match(&service).await;

    let ids: Vec<String> = service
        .list_matches()
        .await
        .iter()
        .map(|record| record.id().clone())
        .collect();
    assert_eq!(ids, vec![first, second]);
}
