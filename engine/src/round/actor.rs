use super::{
    autoplay::AutoThrow,
    ingress::{Mailbox, Message},
    AUTO_PLAY_DELAY, FAST_GAP, FINALIZE_DELAY, FIRST_THROW_DELAY, SLOW_GAP,
};
use crate::{
    position,
    resolver::{Resolver, Throw},
    source::OutcomeSource,
    Event,
};
use commonware_runtime::{Clock, Handle, Metrics, Spawner};
use futures::{
    channel::{mpsc, oneshot},
    StreamExt,
};
use prometheus_client::metrics::counter::Counter;
use rand::{CryptoRng, Rng};
use ringshot_types::{
    BoardPosition, DartMarker, DartResult, Difficulty, HistoryEntry, RoundPhase, SessionStats,
    Zone, DEFAULT_BET, DEFAULT_DIFFICULTY, MAX_DARTS_PER_ROUND, MAX_VISIBLE_MARKERS,
    RESULT_HISTORY_LEN, STARTING_BALANCE,
};
use std::collections::VecDeque;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tracing::{debug, warn};

/// Round actor configuration.
pub struct Config<S: OutcomeSource> {
    pub source: S,
    pub mailbox_size: usize,
    /// Buffer of the outbound event channel. A shell that stops consuming
    /// loses events rather than wedging the actor.
    pub event_buffer: usize,
}

/// A dart resolved and queued for presentation.
struct QueuedThrow {
    index: u32,
    position: BoardPosition,
    throw: Throw,
}

/// In-flight round state, alive from `play` acceptance until the next
/// `play_again`/`reset` (it outlives finalization so the result phase can
/// still be inspected).
struct Round {
    bet: f64,
    total_darts: u32,
    queue: VecDeque<QueuedThrow>,
    /// Dart currently shown to the shell, awaiting its placement ack.
    current: Option<QueuedThrow>,
    payout: f64,
    dart_index: u32,
    best_multiplier: f64,
}

/// Point-in-time view of the actor state, for the shell and tests.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub difficulty: Difficulty,
    pub bet: f64,
    pub darts_per_round: u32,
    pub balance: f64,
    pub stats: SessionStats,
    pub markers: Vec<DartMarker>,
    pub history: Vec<HistoryEntry>,
    pub last_result: Option<DartResult>,
    pub current_dart: u32,
    pub total_darts: u32,
    pub round_payout: f64,
    pub auto_active: bool,
    pub auto_remaining: u32,
}

/// The round state machine actor.
pub struct Actor<E: Clock + Spawner + Rng + CryptoRng + Metrics, S: OutcomeSource> {
    context: E,
    source: S,
    inbound: Mailbox,
    mailbox: mpsc::Receiver<Message>,
    events: mpsc::Sender<Event>,

    phase: RoundPhase,
    difficulty: Difficulty,
    bet: f64,
    darts_per_round: u32,
    balance: f64,
    stats: SessionStats,
    markers: VecDeque<DartMarker>,
    history: VecDeque<HistoryEntry>,
    last_result: Option<DartResult>,
    resolver: Resolver,
    round: Option<Round>,
    auto: AutoThrow,

    /// Liveness guard. Bumped on play acceptance, `play_again`, and `reset`;
    /// deferred continuations carrying an older value are discarded.
    sequence: u64,

    rounds_finalized: Counter<u64, AtomicU64>,
    darts_placed: Counter<u64, AtomicU64>,
}

impl<E: Clock + Spawner + Rng + CryptoRng + Metrics, S: OutcomeSource> Actor<E, S> {
    /// Create a new round actor. Returns the actor, its mailbox, and the
    /// outbound event stream for the rendering shell.
    pub fn new(context: E, config: Config<S>) -> (Self, Mailbox, mpsc::Receiver<Event>) {
        let (sender, mailbox) = mpsc::channel(config.mailbox_size);
        let inbound = Mailbox::new(sender);
        let (events, event_receiver) = mpsc::channel(config.event_buffer);

        let rounds_finalized: Counter<u64, AtomicU64> = Counter::default();
        let darts_placed: Counter<u64, AtomicU64> = Counter::default();
        context.register(
            "rounds_finalized",
            "Number of rounds finalized",
            rounds_finalized.clone(),
        );
        context.register(
            "darts_placed",
            "Number of darts placed on the board",
            darts_placed.clone(),
        );

        (
            Self {
                context,
                source: config.source,
                inbound: inbound.clone(),
                mailbox,
                events,
                phase: RoundPhase::Idle,
                difficulty: DEFAULT_DIFFICULTY,
                bet: DEFAULT_BET,
                darts_per_round: 1,
                balance: STARTING_BALANCE,
                stats: SessionStats::default(),
                markers: VecDeque::new(),
                history: VecDeque::new(),
                last_result: None,
                resolver: Resolver::new(),
                round: None,
                auto: AutoThrow::default(),
                sequence: 0,
                rounds_finalized,
                darts_placed,
            },
            inbound,
            event_receiver,
        )
    }

    pub fn start(mut self) -> Handle<()> {
        self.context.spawn_ref()(self.run())
    }

    async fn run(mut self) {
        while let Some(message) = self.mailbox.next().await {
            match message {
                Message::SetDifficulty { difficulty } => self.set_difficulty(difficulty),
                Message::SetBet { amount } => self.set_bet(amount),
                Message::SetDartsPerRound { count } => self.set_darts_per_round(count),
                Message::Play => self.play(),
                Message::PlayAgain => self.play_again(),
                Message::Reset => self.reset(),
                Message::StartAuto { rounds } => self.start_auto(rounds),
                Message::StopAuto => self.stop_auto(),
                Message::Snapshot { response } => {
                    let _ = response.send(self.snapshot());
                }
                Message::Outcomes { sequence, codes } => self.outcomes(sequence, codes),
                Message::ShowNext { sequence } => self.show_next(sequence),
                Message::Placed { sequence } => self.placed(sequence),
                Message::Finalize { sequence } => self.finalize(sequence),
                Message::AutoNext { sequence } => self.auto_next(sequence),
            }
        }
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty == difficulty {
            return;
        }
        debug!(%difficulty, "difficulty changed");
        self.difficulty = difficulty;
        // The board is redrawn from scratch: stale markers and history would
        // reference the old geometry.
        self.markers.clear();
        self.history.clear();
    }

    fn set_bet(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            debug!(amount, "ignoring invalid bet amount");
            return;
        }
        self.bet = amount;
    }

    fn set_darts_per_round(&mut self, count: u32) {
        self.darts_per_round = count.clamp(1, MAX_DARTS_PER_ROUND);
    }

    /// Accept a play request: debit the bet and ask the outcome source for
    /// one code per dart. Redundant calls while a round is running are
    /// no-ops so the shell and auto-play can both issue them safely.
    fn play(&mut self) {
        if self.phase != RoundPhase::Idle {
            debug!(phase = ?self.phase, "play ignored: not idle");
            return;
        }
        let bet = self.bet;
        if bet <= 0.0 || bet > self.balance {
            debug!(bet, balance = self.balance, "play rejected: invalid bet");
            return;
        }

        // Upfront risk: the full bet leaves the balance now and comes back
        // only through finalization. A reset mid-round forfeits it.
        self.balance -= bet;
        self.sequence += 1;
        let sequence = self.sequence;
        let darts = self.darts_per_round;
        self.round = Some(Round {
            bet,
            total_darts: darts,
            queue: VecDeque::new(),
            current: None,
            payout: 0.0,
            dart_index: 0,
            best_multiplier: 0.0,
        });
        self.last_result = None;
        self.phase = RoundPhase::Throwing;
        debug!(bet, darts, sequence, "round started");

        let source = self.source.clone();
        let difficulty = self.difficulty;
        let mut inbound = self.inbound.clone();
        self.context
            .with_label("outcome_request")
            .spawn(move |_| async move {
                match source.request(difficulty, darts).await {
                    Ok(codes) => inbound.deliver(Message::Outcomes { sequence, codes }).await,
                    // No retry in the core: the integration layer owns
                    // timeouts, and reset recovers the session.
                    Err(e) => warn!(?e, sequence, "outcome request failed"),
                }
            });
    }

    /// Outcome codes arrived: resolve every dart up front into a FIFO
    /// presentation queue.
    fn outcomes(&mut self, sequence: u64, codes: Vec<u8>) {
        if sequence != self.sequence {
            debug!(sequence, current = self.sequence, "stale outcomes discarded");
            return;
        }
        if self.round.is_none() {
            return;
        }

        if codes.is_empty() {
            warn!(sequence, "empty outcome response");
            self.schedule(FINALIZE_DELAY, Message::Finalize { sequence });
            return;
        }

        // Trust boundary: the source must only emit known zone codes. An
        // unknown code is a contract violation, never coerced to a default.
        let zones: Vec<Zone> = codes
            .iter()
            .map(|&code| {
                Zone::try_from(code).expect("outcome source emitted an invalid zone code")
            })
            .collect();

        let bet = self.round.as_ref().map(|r| r.bet).unwrap_or(0.0);
        let bet_per_dart = bet / zones.len() as f64;
        let throws =
            self.resolver
                .resolve_outcomes(&mut self.context, &zones, bet_per_dart, self.difficulty);
        let queue: VecDeque<QueuedThrow> = throws
            .into_iter()
            .enumerate()
            .map(|(i, throw)| QueuedThrow {
                index: i as u32,
                position: position::marker_position(&mut self.context, &throw.marker),
                throw,
            })
            .collect();

        let total = queue.len() as u32;
        let round = self.round.as_mut().expect("round checked above");
        round.total_darts = total;
        round.queue = queue;
        debug!(sequence, darts = total, "outcomes resolved");

        self.schedule(FIRST_THROW_DELAY, Message::ShowNext { sequence });
    }

    /// Present the next queued dart to the shell and wait for its ack.
    fn show_next(&mut self, sequence: u64) {
        if sequence != self.sequence {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(queued) = round.queue.pop_front() else {
            return;
        };

        let (placed_sender, placed_receiver) = oneshot::channel();
        let event = Event::Throw {
            index: queued.index,
            total: round.total_darts,
            position: queued.position,
            color: queued.throw.result.color,
            marker: queued.throw.marker.clone(),
            result: queued.throw.result.clone(),
            placed: placed_sender,
        };
        round.current = Some(queued);

        // Turn the shell's ack into a mailbox message. A dropped ack still
        // advances: stale sequences are filtered on arrival, and a shell
        // that dies must not wedge the session.
        let mut inbound = self.inbound.clone();
        self.context
            .with_label("placement")
            .spawn(move |_| async move {
                let _ = placed_receiver.await;
                inbound.deliver(Message::Placed { sequence }).await;
            });

        if let Err(error) = self.events.try_send(event) {
            // No shell consuming: fire the ack ourselves so headless runs
            // (and auto-play without a renderer) still complete.
            debug!("event channel unavailable; self-driving placement");
            if let Event::Throw { placed, .. } = error.into_inner() {
                let _ = placed.send(());
            }
        }
    }

    /// The shell confirmed a dart: record it and pace the next step.
    fn placed(&mut self, sequence: u64) {
        if sequence != self.sequence {
            debug!(sequence, current = self.sequence, "stale placement discarded");
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(current) = round.current.take() else {
            return;
        };
        let Throw { result, mut marker } = current.throw;

        for existing in self.markers.iter_mut() {
            existing.latest = false;
        }
        marker.latest = true;
        self.markers.push_back(marker);
        while self.markers.len() > MAX_VISIBLE_MARKERS {
            self.markers.pop_front();
        }

        self.history.push_front(HistoryEntry {
            multiplier: result.multiplier,
            color: result.color,
        });
        self.history.truncate(RESULT_HISTORY_LEN);

        round.payout += result.payout;
        if result.multiplier > round.best_multiplier {
            round.best_multiplier = result.multiplier;
        }
        round.dart_index += 1;
        let remaining = round.queue.len();
        let round_payout = round.payout;
        let dart_index = round.dart_index;
        self.last_result = Some(result.clone());
        self.darts_placed.inc();

        self.emit(Event::Placed {
            result,
            markers: self.markers.iter().cloned().collect(),
            history: self.history.iter().copied().collect(),
            round_payout,
            dart_index,
        });

        if remaining > 0 {
            let gap = if remaining > 5 { FAST_GAP } else { SLOW_GAP };
            self.schedule(gap, Message::ShowNext { sequence });
        } else {
            self.schedule(FINALIZE_DELAY, Message::Finalize { sequence });
        }
    }

    /// Credit the round payout, fold it into the session stats, and hand
    /// control to auto-play if it is driving.
    fn finalize(&mut self, sequence: u64) {
        if sequence != self.sequence || self.phase != RoundPhase::Throwing {
            return;
        }
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let (bet, payout, best_multiplier) = (round.bet, round.payout, round.best_multiplier);

        self.phase = RoundPhase::Result;
        self.balance += payout;
        self.stats.record_round(bet, payout, best_multiplier);
        self.rounds_finalized.inc();

        let is_win = payout >= bet;
        // The last result carries the round totals for the result screen.
        if let Some(last) = self.last_result.as_mut() {
            last.payout = payout;
            last.bet = bet;
            last.is_win = is_win;
        }
        debug!(bet, payout, is_win, balance = self.balance, "round finalized");

        self.emit(Event::Finalized {
            bet,
            payout,
            is_win,
            balance: self.balance,
            stats: self.stats.clone(),
        });

        if self.auto.active() {
            if self.auto.should_continue(self.balance, self.bet) {
                self.auto.advance();
                self.schedule(AUTO_PLAY_DELAY, Message::AutoNext { sequence });
            } else {
                debug!("auto-play exhausted");
                self.auto.stop();
                self.emit(Event::AutoStopped);
            }
        }
    }

    /// Return to idle, keeping the board contents. Cancels anything still
    /// scheduled for the current round; a bet already debited stays debited.
    fn play_again(&mut self) {
        self.sequence += 1;
        self.round = None;
        self.last_result = None;
        self.phase = RoundPhase::Idle;
    }

    /// Return to idle and clear the visible board. Also stops auto-play.
    fn reset(&mut self) {
        debug!("reset");
        self.play_again();
        self.markers.clear();
        self.history.clear();
        if self.auto.active() {
            self.auto.stop();
            self.emit(Event::AutoStopped);
        }
    }

    fn start_auto(&mut self, rounds: u32) {
        if rounds == 0 {
            debug!("start_auto ignored: zero rounds");
            return;
        }
        self.auto.start(rounds);
        debug!(rounds, "auto-play started");
        // Trigger the first round unless one is already in flight; in that
        // case the loop picks up at that round's finalize.
        if self.phase == RoundPhase::Result {
            self.play_again();
        }
        if self.phase == RoundPhase::Idle {
            self.play();
        }
    }

    fn stop_auto(&mut self) {
        if self.auto.active() {
            debug!(remaining = self.auto.remaining(), "auto-play stopped");
            self.auto.stop();
        }
    }

    /// Auto-play pacing timer fired: start the next round.
    fn auto_next(&mut self, sequence: u64) {
        if sequence != self.sequence || !self.auto.active() {
            return;
        }
        if self.phase != RoundPhase::Result {
            return;
        }
        self.play_again();
        self.play();
    }

    /// Sleep `delay`, then re-inject `message` through the mailbox.
    fn schedule(&mut self, delay: Duration, message: Message) {
        let mut inbound = self.inbound.clone();
        self.context.with_label("timer").spawn(move |context| async move {
            context.sleep(delay).await;
            inbound.deliver(message).await;
        });
    }

    fn emit(&mut self, event: Event) {
        if self.events.try_send(event).is_err() {
            debug!("event dropped: shell not consuming");
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            bet: self.bet,
            darts_per_round: self.darts_per_round,
            balance: self.balance,
            stats: self.stats.clone(),
            markers: self.markers.iter().cloned().collect(),
            history: self.history.iter().copied().collect(),
            last_result: self.last_result.clone(),
            current_dart: self.round.as_ref().map(|r| r.dart_index).unwrap_or(0),
            total_darts: self.round.as_ref().map(|r| r.total_darts).unwrap_or(0),
            round_payout: self.round.as_ref().map(|r| r.payout).unwrap_or(0.0),
            auto_active: self.auto.active(),
            auto_remaining: self.auto.remaining(),
        }
    }
}
