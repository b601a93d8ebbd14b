use super::controller::ChatInteractionController;
use super::event::{ControllerEvent, UserCommand};
use super::snapshot::ControllerSnapshot;
use crate::dispatch::UseCase;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Answer to a user command
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply {
    /// False when the command was a policy no-op (e.g. submit while awaiting a reply)
    pub accepted: bool,
    pub state: ControllerSnapshot,
}

enum Request {
    Command {
        command: UserCommand,
        reply: oneshot::Sender<CommandReply>,
    },
    Shutdown,
}

/// Handle to a controller running on its own task
///
/// The task is the only owner of the controller: commands and engine events
/// are applied one at a time, in arrival order.
#[derive(Clone)]
pub struct ControllerHandle {
    requests: mpsc::UnboundedSender<Request>,
    snapshots: watch::Receiver<ControllerSnapshot>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

/// Move the controller onto a task that drains `events` and serves commands
pub fn spawn_controller(
    mut controller: ChatInteractionController,
    mut events: mpsc::UnboundedReceiver<ControllerEvent>,
) -> ControllerHandle {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Request>();
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

    let task = tokio::spawn(async move {
        info!("Chat controller task started");

        loop {
            tokio::select! {
                Some(event) = events.recv() => {
                    controller.handle_event(event);
                    snapshot_tx.send_replace(controller.snapshot());
                }
                request = request_rx.recv() => match request {
                    Some(Request::Command { command, reply }) => {
                        let accepted = controller.apply(command);
                        let state = controller.snapshot();
                        snapshot_tx.send_replace(state.clone());
                        let _ = reply.send(CommandReply { accepted, state });
                    }
                    Some(Request::Shutdown) | None => {
                        controller.dispose();
                        snapshot_tx.send_replace(controller.snapshot());
                        break;
                    }
                },
            }
        }

        info!("Chat controller task stopped");
    });

    ControllerHandle {
        requests: request_tx,
        snapshots: snapshot_rx,
        task: Arc::new(Mutex::new(Some(task))),
    }
}

impl ControllerHandle {
    pub async fn command(&self, command: UserCommand) -> Result<CommandReply> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.requests
            .send(Request::Command {
                command,
                reply: reply_tx,
            })
            .map_err(|_| anyhow!("Chat controller has stopped"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("Chat controller stopped before replying"))
    }

    pub async fn set_input(&self, text: impl Into<String>) -> Result<CommandReply> {
        self.command(UserCommand::SetInput(text.into())).await
    }

    pub async fn submit(&self, text: Option<String>) -> Result<CommandReply> {
        self.command(UserCommand::Submit(text)).await
    }

    pub async fn toggle_listening(&self) -> Result<CommandReply> {
        self.command(UserCommand::ToggleListening).await
    }

    pub async fn toggle_speech_output(&self) -> Result<CommandReply> {
        self.command(UserCommand::ToggleSpeechOutput).await
    }

    pub async fn set_use_case(&self, use_case: UseCase) -> Result<CommandReply> {
        self.command(UserCommand::SetUseCase(use_case)).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published state
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshots.clone()
    }

    /// Dispose the controller and wait for its task to finish
    pub async fn shutdown(&self) {
        let _ = self.requests.send(Request::Shutdown);

        let mut handle = self.task.lock().await;
        if let Some(task) = handle.take() {
            if let Err(e) = task.await {
                error!("Chat controller task panicked: {}", e);
            }
        }
    }
}
