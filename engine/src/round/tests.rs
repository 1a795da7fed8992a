use super::*;
use crate::{mocks::Fixed, source::Simulated, Event};
use commonware_runtime::{deterministic, Clock, Metrics, Runner as _};
use futures::StreamExt;
use ringshot_types::{Difficulty, RoundPhase, STARTING_BALANCE};
use std::time::Duration;

fn config<S: crate::source::OutcomeSource>(source: S) -> Config<S> {
    Config {
        source,
        mailbox_size: 64,
        event_buffer: 64,
    }
}

/// Ack throws until the round finalizes, returning the finalize payload.
async fn drive_round(events: &mut futures::channel::mpsc::Receiver<Event>) -> (f64, f64, bool, f64) {
    loop {
        match events.next().await.expect("event stream ended") {
            Event::Throw { placed, .. } => {
                placed.send(()).expect("actor dropped placement ack");
            }
            Event::Finalized {
                bet,
                payout,
                is_win,
                balance,
                ..
            } => return (bet, payout, is_win, balance),
            _ => {}
        }
    }
}

#[test]
fn test_single_bullseye_round() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![0]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.set_darts_per_round(1).await;
        mailbox.play().await;

        loop {
            match events.next().await.expect("event stream ended") {
                Event::Throw { result, total, index, placed, .. } => {
                    assert_eq!(index, 0);
                    assert_eq!(total, 1);
                    assert_eq!(result.multiplier, 7.7);
                    assert!(result.is_bullseye);
                    placed.send(()).expect("ack");
                }
                Event::Finalized { bet, payout, is_win, balance, stats } => {
                    assert_eq!(bet, 10.0);
                    assert_eq!(payout, 77.0);
                    assert!(is_win);
                    assert_eq!(balance, STARTING_BALANCE - 10.0 + 77.0);
                    assert_eq!(stats.total_rounds, 1);
                    assert_eq!(stats.wins, 1);
                    assert_eq!(stats.biggest_multiplier, 7.7);
                    break;
                }
                _ => {}
            }
        }

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.phase, RoundPhase::Result);
        assert_eq!(snapshot.balance, 1_067.0);
        assert_eq!(snapshot.markers.len(), 1);
        let last = snapshot.last_result.expect("last result");
        assert!(last.is_bullseye);
        assert_eq!(last.payout, 77.0);
    });
}

#[test]
fn test_multi_dart_round_accounting() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        // medium, bet 20 over two darts: purple pays 4, blue pays 6.
        let source = Fixed::new(vec![vec![1, 2]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_difficulty(Difficulty::Medium).await;
        mailbox.set_bet(20.0).await;
        mailbox.set_darts_per_round(2).await;
        mailbox.play().await;

        let mut placed_payouts = Vec::new();
        loop {
            match events.next().await.expect("event stream ended") {
                Event::Throw { placed, .. } => {
                    placed.send(()).expect("ack");
                }
                Event::Placed { result, round_payout, dart_index, .. } => {
                    placed_payouts.push((result.payout, round_payout, dart_index));
                }
                Event::Finalized { bet, payout, is_win, balance, stats } => {
                    assert_eq!(bet, 20.0);
                    assert_eq!(payout, 10.0);
                    assert!(!is_win, "10 < 20 is a losing round");
                    assert_eq!(balance, STARTING_BALANCE - 20.0 + 10.0);
                    assert_eq!(stats.losses, 1);
                    assert_eq!(stats.net_pnl, -10.0);
                    break;
                }
                _ => {}
            }
        }

        // Darts arrive strictly in outcome order and accumulate.
        assert_eq!(placed_payouts, vec![(4.0, 4.0, 1), (6.0, 10.0, 2)]);
    });
}

#[test]
fn test_reset_before_outcomes_forfeits_bet() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        // The simulated source takes 500ms; reset lands first.
        let source = Simulated::new(context.with_label("source"));
        let (actor, mut mailbox, _events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.play().await;
        mailbox.reset().await;

        // Let the stale outcome response and every pending timer fire.
        context.sleep(Duration::from_secs(5)).await;

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.phase, RoundPhase::Idle);
        // The debit stands; no credit is ever applied.
        assert_eq!(snapshot.balance, STARTING_BALANCE - 10.0);
        assert_eq!(snapshot.stats.total_rounds, 0);
        assert!(snapshot.markers.is_empty());
    });
}

#[test]
fn test_reset_during_presentation_discards_late_ack() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![1]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.play().await;

        // Hold the ack, reset mid-presentation, then ack late.
        let placed = loop {
            if let Event::Throw { placed, .. } = events.next().await.expect("event") {
                break placed;
            }
        };
        mailbox.reset().await;
        let _ = placed.send(());

        context.sleep(Duration::from_secs(5)).await;

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.phase, RoundPhase::Idle);
        assert_eq!(snapshot.balance, STARTING_BALANCE - 10.0);
        assert_eq!(snapshot.stats.total_rounds, 0);
        assert!(snapshot.markers.is_empty());
        assert!(snapshot.history.is_empty());
    });
}

#[test]
fn test_play_while_throwing_is_noop() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![1]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.play().await;
        // Redundant plays while the round runs must not double-debit.
        mailbox.play().await;
        mailbox.play().await;

        let (bet, ..) = drive_round(&mut events).await;
        assert_eq!(bet, 10.0);

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.stats.total_rounds, 1);
        // easy purple: 10 - 10 + 5.
        assert_eq!(snapshot.balance, STARTING_BALANCE - 10.0 + 5.0);
    });
}

#[test]
fn test_invalid_bets_and_dart_clamp() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![]);
        let (actor, mut mailbox, _events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        // Invalid amounts leave the bet untouched.
        mailbox.set_bet(0.0).await;
        mailbox.set_bet(-5.0).await;
        mailbox.set_bet(f64::NAN).await;
        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.bet, ringshot_types::DEFAULT_BET);

        // A bet above the balance rejects play entirely.
        mailbox.set_bet(STARTING_BALANCE + 1.0).await;
        mailbox.play().await;
        context.sleep(Duration::from_secs(1)).await;
        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.phase, RoundPhase::Idle);
        assert_eq!(snapshot.balance, STARTING_BALANCE);
        assert_eq!(snapshot.stats.total_rounds, 0);

        // Darts per round clamps into 1..=10.
        mailbox.set_darts_per_round(50).await;
        assert_eq!(mailbox.snapshot().await.darts_per_round, 10);
        mailbox.set_darts_per_round(0).await;
        assert_eq!(mailbox.snapshot().await.darts_per_round, 1);
    });
}

#[test]
fn test_marker_and_history_buffers_bounded() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        // The resolver places no bound on the response length; 12 darts
        // overflow both display buffers.
        let source = Fixed::new(vec![vec![1; 12]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(12.0).await;
        mailbox.play().await;
        drive_round(&mut events).await;

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.markers.len(), ringshot_types::MAX_VISIBLE_MARKERS);
        assert_eq!(snapshot.history.len(), ringshot_types::RESULT_HISTORY_LEN);
        // Only the newest marker carries the flag.
        let latest: Vec<_> = snapshot.markers.iter().filter(|m| m.latest).collect();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, 12);
    });
}

#[test]
fn test_empty_outcome_response_finalizes_as_loss() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.play().await;

        loop {
            if let Event::Finalized { payout, is_win, balance, .. } =
                events.next().await.expect("event")
            {
                assert_eq!(payout, 0.0);
                assert!(!is_win);
                assert_eq!(balance, STARTING_BALANCE - 10.0);
                break;
            }
        }
    });
}

#[test]
fn test_auto_play_completes_and_stops_itself() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![1], vec![1], vec![1]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.start_auto(3).await;

        let mut finalized = 0;
        loop {
            match events.next().await.expect("event stream ended") {
                Event::Throw { placed, .. } => {
                    placed.send(()).expect("ack");
                }
                Event::Finalized { .. } => finalized += 1,
                Event::AutoStopped => break,
                _ => {}
            }
        }
        assert_eq!(finalized, 3);

        // No fourth round sneaks in afterwards.
        context.sleep(Duration::from_secs(10)).await;
        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.stats.total_rounds, 3);
        assert!(!snapshot.auto_active);
        assert_eq!(snapshot.auto_remaining, 0);
        // Three easy-purple rounds at bet 10: each returns 5.
        assert_eq!(snapshot.balance, STARTING_BALANCE - 3.0 * 10.0 + 3.0 * 5.0);
    });
}

#[test]
fn test_auto_play_stops_when_balance_short() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![1], vec![1], vec![1], vec![1]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        // easy purple halves each bet: 1000 -> 700 -> 400, then 400 < 600.
        mailbox.set_bet(600.0).await;
        mailbox.start_auto(10).await;

        let mut finalized = 0;
        loop {
            match events.next().await.expect("event stream ended") {
                Event::Throw { placed, .. } => {
                    placed.send(()).expect("ack");
                }
                Event::Finalized { .. } => finalized += 1,
                Event::AutoStopped => break,
                _ => {}
            }
        }
        assert_eq!(finalized, 2);

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.balance, 400.0);
        assert!(!snapshot.auto_active);
    });
}

#[test]
fn test_stop_auto_cancels_pending_trigger() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![1], vec![1], vec![1]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.start_auto(3).await;

        // Stop right after the first finalize, before the pacing timer.
        loop {
            match events.next().await.expect("event stream ended") {
                Event::Throw { placed, .. } => {
                    placed.send(()).expect("ack");
                }
                Event::Finalized { .. } => break,
                _ => {}
            }
        }
        mailbox.stop_auto().await;

        context.sleep(Duration::from_secs(10)).await;
        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.stats.total_rounds, 1);
        assert!(!snapshot.auto_active);
    });
}

#[test]
fn test_reset_stops_auto_play() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![1], vec![1]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.start_auto(5).await;

        loop {
            match events.next().await.expect("event stream ended") {
                Event::Throw { placed, .. } => {
                    placed.send(()).expect("ack");
                }
                Event::Finalized { .. } => break,
                _ => {}
            }
        }
        mailbox.reset().await;

        context.sleep(Duration::from_secs(10)).await;
        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.stats.total_rounds, 1);
        assert!(!snapshot.auto_active);
        assert!(snapshot.markers.is_empty());
    });
}

#[test]
fn test_headless_round_self_drives() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![2, 2, 2]]);
        let (actor, mut mailbox, events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        // No shell at all: the actor must still complete the round.
        drop(events);

        mailbox.set_bet(30.0).await;
        mailbox.play().await;
        context.sleep(Duration::from_secs(10)).await;

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.phase, RoundPhase::Result);
        assert_eq!(snapshot.stats.total_rounds, 1);
        // easy blue at 10 per dart: three darts pay 8 each.
        assert_eq!(snapshot.balance, STARTING_BALANCE - 30.0 + 24.0);
    });
}

#[test]
fn test_difficulty_change_clears_board() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![3]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.play().await;
        drive_round(&mut events).await;
        mailbox.play_again().await;

        assert_eq!(mailbox.snapshot().await.markers.len(), 1);

        mailbox.set_difficulty(Difficulty::Expert).await;
        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.difficulty, Difficulty::Expert);
        assert!(snapshot.markers.is_empty());
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.phase, RoundPhase::Idle);
    });
}

#[test]
fn test_play_again_keeps_board() {
    let runner = deterministic::Runner::timed(Duration::from_secs(60));
    runner.start(|context| async move {
        let source = Fixed::new(vec![vec![5]]);
        let (actor, mut mailbox, mut events) =
            Actor::new(context.with_label("round"), config(source));
        actor.start();

        mailbox.set_bet(10.0).await;
        mailbox.play().await;
        drive_round(&mut events).await;
        mailbox.play_again().await;

        let snapshot = mailbox.snapshot().await;
        assert_eq!(snapshot.phase, RoundPhase::Idle);
        assert!(snapshot.last_result.is_none());
        // Markers and history survive play-again; only reset clears them.
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.history.len(), 1);
    });
}
