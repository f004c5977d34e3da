use crate::game_manager::{
    GameManager, GameManagerError, Transition,
    command::Command,
    event::{EventKind, GameEvent},
};
use log::*;
use scoreboard_common::game_snapshot::GameSnapshot;
use thiserror::Error;
use tokio::{
    select,
    sync::{
        broadcast::{self, error::RecvError},
        mpsc, oneshot, watch,
    },
    task::{self, JoinHandle},
    time::{Duration, Instant, MissedTickBehavior, interval},
};

const COMMAND_CHANNEL_LEN: usize = 16;
const EVENT_CHANNEL_LEN: usize = 64;

/// What a successfully applied command left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub snapshot: GameSnapshot,
    pub events: Vec<GameEvent>,
}

impl From<Transition> for CommandOutcome {
    fn from(transition: Transition) -> Self {
        Self {
            snapshot: transition.snapshot,
            events: transition.events,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Rejected(#[from] GameManagerError),
    #[error("The game controller is no longer running")]
    ChannelClosed,
}

/// Handle to the task that owns the [`GameManager`]. Commands and clock ticks are serialized
/// through that task, so every observer sees the same ordering of state changes.
#[derive(Debug)]
pub struct GameController {
    tx: mpsc::Sender<ControllerMessage>,
    state_rx: watch::Receiver<GameSnapshot>,
    event_tx: broadcast::Sender<GameEvent>,
    server_join: JoinHandle<()>,
}

impl GameController {
    pub fn new(manager: GameManager, tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_LEN);
        let (state_tx, state_rx) = watch::channel(manager.generate_snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_LEN);

        let server = Server::new(rx, manager, state_tx, event_tx.clone(), tick_interval);
        let server_join = task::spawn(server.run_loop());

        Self {
            tx,
            state_rx,
            event_tx,
            server_join,
        }
    }

    pub async fn submit_command(
        &self,
        command: Command,
    ) -> Result<CommandOutcome, ControllerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ControllerMessage::Command(command, reply_tx))
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        let transition = reply_rx
            .await
            .map_err(|_| ControllerError::ChannelClosed)??;
        Ok(transition.into())
    }

    /// The most recently published snapshot
    pub fn get_state(&self) -> GameSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<GameSnapshot> {
        self.state_rx.clone()
    }

    pub fn subscribe(&self, kind: EventKind) -> EventSubscription {
        EventSubscription {
            rx: self.event_tx.subscribe(),
            kind: Some(kind),
        }
    }

    pub fn subscribe_all(&self) -> EventSubscription {
        EventSubscription {
            rx: self.event_tx.subscribe(),
            kind: None,
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        if self.tx.try_send(ControllerMessage::Stop).is_err() {
            self.server_join.abort();
        }
    }
}

/// Receives the events published after a subscription was made, in the order they happened
#[derive(Debug)]
pub struct EventSubscription {
    rx: broadcast::Receiver<GameEvent>,
    kind: Option<EventKind>,
}

impl EventSubscription {
    /// Returns `None` once the controller has shut down
    pub async fn recv(&mut self) -> Option<GameEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber fell behind, {skipped} events were dropped")
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next already published event, if there is one
    pub fn try_recv(&mut self) -> Option<GameEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Event subscriber fell behind, {skipped} events were dropped")
                }
                Err(_) => return None,
            }
        }
    }

    fn matches(&self, event: &GameEvent) -> bool {
        self.kind.is_none_or(|kind| event.kind() == kind)
    }
}

#[derive(Debug)]
enum ControllerMessage {
    Command(Command, oneshot::Sender<Result<Transition, GameManagerError>>),
    Stop,
}

#[derive(Debug)]
struct Server {
    rx: mpsc::Receiver<ControllerMessage>,
    manager: GameManager,
    state_tx: watch::Sender<GameSnapshot>,
    event_tx: broadcast::Sender<GameEvent>,
    tick_interval: Duration,
    last_tick: Instant,
}

impl Server {
    fn new(
        rx: mpsc::Receiver<ControllerMessage>,
        manager: GameManager,
        state_tx: watch::Sender<GameSnapshot>,
        event_tx: broadcast::Sender<GameEvent>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            rx,
            manager,
            state_tx,
            event_tx,
            tick_interval,
            last_tick: Instant::now(),
        }
    }

    async fn run_loop(mut self) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // Queued commands are handled before a pending tick
            select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(ControllerMessage::Command(command, reply)) => {
                        self.catch_up();
                        debug!("Applying {command:?}");
                        let result = self.manager.apply(command);
                        match result {
                            Ok(ref transition) => self.publish(transition),
                            Err(ref e) => warn!("Command rejected: {e}"),
                        }
                        if reply.send(result).is_err() {
                            warn!("Command submitter went away before the reply was sent");
                        }
                    }
                    Some(ControllerMessage::Stop) | None => break,
                },
                _ = ticker.tick() => self.catch_up(),
            }
        }

        info!("Game controller stopped");
    }

    /// Credits the clocks with the time since they were last ticked
    fn catch_up(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        if elapsed.is_zero() {
            return;
        }
        let transition = self.manager.tick(elapsed);
        self.publish(&transition);
    }

    fn publish(&self, transition: &Transition) {
        self.state_tx.send_if_modified(|state| {
            if *state != transition.snapshot {
                *state = transition.snapshot.clone();
                true
            } else {
                false
            }
        });

        for event in &transition.events {
            debug!("Publishing {event:?}");
            // Only fails when nobody is subscribed
            let _ = self.event_tx.send(*event);
        }
    }
}
