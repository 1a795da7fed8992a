use super::Snapshot;
use futures::{
    channel::{mpsc, oneshot},
    SinkExt,
};
use ringshot_types::Difficulty;

/// Messages processed by the round actor.
///
/// The first group comes from the configuration/UI shell; the second group
/// is injected by the actor's own spawned tasks (outcome arrival, placement
/// acks, pacing timers) and carries the sequence number captured when the
/// continuation was scheduled.
pub enum Message {
    SetDifficulty {
        difficulty: Difficulty,
    },
    SetBet {
        amount: f64,
    },
    SetDartsPerRound {
        count: u32,
    },
    Play,
    PlayAgain,
    Reset,
    StartAuto {
        rounds: u32,
    },
    StopAuto,
    Snapshot {
        response: oneshot::Sender<Snapshot>,
    },

    Outcomes {
        sequence: u64,
        codes: Vec<u8>,
    },
    Placed {
        sequence: u64,
    },
    ShowNext {
        sequence: u64,
    },
    Finalize {
        sequence: u64,
    },
    AutoNext {
        sequence: u64,
    },
}

/// Mailbox for the round actor.
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Message>,
}

impl Mailbox {
    pub(super) fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    pub async fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.sender
            .send(Message::SetDifficulty { difficulty })
            .await
            .expect("failed to send set_difficulty");
    }

    pub async fn set_bet(&mut self, amount: f64) {
        self.sender
            .send(Message::SetBet { amount })
            .await
            .expect("failed to send set_bet");
    }

    pub async fn set_darts_per_round(&mut self, count: u32) {
        self.sender
            .send(Message::SetDartsPerRound { count })
            .await
            .expect("failed to send set_darts_per_round");
    }

    pub async fn play(&mut self) {
        self.sender
            .send(Message::Play)
            .await
            .expect("failed to send play");
    }

    pub async fn play_again(&mut self) {
        self.sender
            .send(Message::PlayAgain)
            .await
            .expect("failed to send play_again");
    }

    pub async fn reset(&mut self) {
        self.sender
            .send(Message::Reset)
            .await
            .expect("failed to send reset");
    }

    pub async fn start_auto(&mut self, rounds: u32) {
        self.sender
            .send(Message::StartAuto { rounds })
            .await
            .expect("failed to send start_auto");
    }

    pub async fn stop_auto(&mut self) {
        self.sender
            .send(Message::StopAuto)
            .await
            .expect("failed to send stop_auto");
    }

    /// Point-in-time view of the actor state.
    pub async fn snapshot(&mut self) -> Snapshot {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Message::Snapshot { response })
            .await
            .expect("failed to send snapshot");
        receiver.await.expect("failed to receive snapshot")
    }

    /// Deliver an internally scheduled continuation. Send failures are
    /// ignored: a timer outliving the actor is a no-op, not an error.
    pub(super) async fn deliver(&mut self, message: Message) {
        let _ = self.sender.send(message).await;
    }
}
