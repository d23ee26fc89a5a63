//! Single-owner registry task for async hosts.
//!
//! A background tokio task owns the [`TaskRegistry`] and applies
//! [`RegistryCommand`]s one at a time. Callers talk to it through a
//! cloneable [`RegistryHandle`].
//!
//! ```text
//! callers ── RegistryCommand ──→ registry task
//!         ←── oneshot reply ────
//! ```

use tasktrack_core::{Priority, Task, TaskId};
use tokio::sync::{mpsc, oneshot};

use super::{RegistryError, SortMode, Stats, TaskRegistry};

/// Requests applied by the registry task, each carrying its reply channel.
#[derive(Debug)]
pub enum RegistryCommand {
    /// Add a task.
    Add {
        /// Task name.
        name: String,
        /// Task description.
        description: String,
        /// Due date text (`YYYY-MM-DD`).
        due_date: String,
        /// Priority tier.
        priority: Priority,
        /// Reply channel.
        reply: oneshot::Sender<Result<Task, RegistryError>>,
    },
    /// Complete a task.
    Complete {
        /// Target task.
        id: TaskId,
        /// Reply channel.
        reply: oneshot::Sender<Result<Task, RegistryError>>,
    },
    /// Remove a task.
    Remove {
        /// Target task.
        id: TaskId,
        /// Reply channel.
        reply: oneshot::Sender<Option<Task>>,
    },
    /// Pending tasks in the given order.
    Reorder {
        /// Ordering to apply.
        mode: SortMode,
        /// Reply channel.
        reply: oneshot::Sender<Vec<Task>>,
    },
    /// Pop the next arrival.
    DequeueNextArrival {
        /// Reply channel.
        reply: oneshot::Sender<Option<Task>>,
    },
    /// Pop the most urgent task.
    DequeueMostUrgent {
        /// Reply channel.
        reply: oneshot::Sender<Option<Task>>,
    },
    /// Undo the last added task.
    UndoLastAdded {
        /// Reply channel.
        reply: oneshot::Sender<Option<Task>>,
    },
    /// Dequeue and complete the next arrival.
    ProcessNextArrival {
        /// Reply channel.
        reply: oneshot::Sender<Option<Task>>,
    },
    /// Dequeue and complete the most urgent task.
    ProcessMostUrgent {
        /// Reply channel.
        reply: oneshot::Sender<Option<Task>>,
    },
    /// Completed tasks, most recent first.
    Completed {
        /// Reply channel.
        reply: oneshot::Sender<Vec<Task>>,
    },
    /// Current counts.
    Stats {
        /// Reply channel.
        reply: oneshot::Sender<Stats>,
    },
    /// Stop the registry task.
    Shutdown,
}

/// Cloneable client for a registry task started by [`spawn_registry`].
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<RegistryCommand>,
}

/// Spawns a tokio task that owns `registry` and returns a handle to it.
///
/// `capacity` bounds the number of queued commands. The task stops when
/// it receives [`RegistryCommand::Shutdown`] or every handle is dropped.
#[must_use]
pub fn spawn_registry(mut registry: TaskRegistry, capacity: usize) -> RegistryHandle {
    let (tx, mut rx) = mpsc::channel(capacity.max(1));
    tokio::spawn(async move {
        tracing::debug!("registry task started");
        while let Some(cmd) = rx.recv().await {
            if !apply(&mut registry, cmd) {
                break;
            }
        }
        tracing::debug!(tasks = registry.len(), "registry task stopped");
    });
    RegistryHandle { tx }
}

/// Applies one command. Returns `false` on shutdown.
///
/// A dropped reply receiver only means the caller stopped waiting, so send
/// failures are ignored.
fn apply(registry: &mut TaskRegistry, cmd: RegistryCommand) -> bool {
    match cmd {
        RegistryCommand::Add {
            name,
            description,
            due_date,
            priority,
            reply,
        } => {
            let result = registry
                .add_task(&name, &description, &due_date, priority)
                .map_err(RegistryError::from);
            let _ = reply.send(result);
        }
        RegistryCommand::Complete { id, reply } => {
            let _ = reply.send(registry.complete_task(id));
        }
        RegistryCommand::Remove { id, reply } => {
            let _ = reply.send(registry.remove_task(id));
        }
        RegistryCommand::Reorder { mode, reply } => {
            let _ = reply.send(registry.reorder_by(mode));
        }
        RegistryCommand::DequeueNextArrival { reply } => {
            let _ = reply.send(registry.dequeue_next_arrival());
        }
        RegistryCommand::DequeueMostUrgent { reply } => {
            let _ = reply.send(registry.dequeue_most_urgent());
        }
        RegistryCommand::UndoLastAdded { reply } => {
            let _ = reply.send(registry.undo_last_added());
        }
        RegistryCommand::ProcessNextArrival { reply } => {
            let _ = reply.send(registry.process_next_arrival());
        }
        RegistryCommand::ProcessMostUrgent { reply } => {
            let _ = reply.send(registry.process_most_urgent());
        }
        RegistryCommand::Completed { reply } => {
            let _ = reply.send(registry.completed_tasks());
        }
        RegistryCommand::Stats { reply } => {
            let _ = reply.send(registry.stats());
        }
        RegistryCommand::Shutdown => return false,
    }
    true
}

impl RegistryHandle {
    /// Sends a command built around a fresh reply channel and awaits the reply.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RegistryCommand,
    ) -> Result<T, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| RegistryError::Closed)?;
        rx.await.map_err(|_| RegistryError::Closed)
    }

    /// See [`TaskRegistry::add_task`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] for a rejected draft, or
    /// [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn add_task(
        &self,
        name: &str,
        description: &str,
        due_date: &str,
        priority: Priority,
    ) -> Result<Task, RegistryError> {
        let (name, description, due_date) =
            (name.to_string(), description.to_string(), due_date.to_string());
        self.request(|reply| RegistryCommand::Add {
            name,
            description,
            due_date,
            priority,
            reply,
        })
        .await?
    }

    /// See [`TaskRegistry::complete_task`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] or [`RegistryError::Closed`].
    pub async fn complete_task(&self, id: TaskId) -> Result<Task, RegistryError> {
        self.request(|reply| RegistryCommand::Complete { id, reply })
            .await?
    }

    /// See [`TaskRegistry::remove_task`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn remove_task(&self, id: TaskId) -> Result<Option<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::Remove { id, reply })
            .await
    }

    /// See [`TaskRegistry::reorder_by`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn reorder_by(&self, mode: SortMode) -> Result<Vec<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::Reorder { mode, reply })
            .await
    }

    /// See [`TaskRegistry::dequeue_next_arrival`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn dequeue_next_arrival(&self) -> Result<Option<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::DequeueNextArrival { reply })
            .await
    }

    /// See [`TaskRegistry::dequeue_most_urgent`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn dequeue_most_urgent(&self) -> Result<Option<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::DequeueMostUrgent { reply })
            .await
    }

    /// See [`TaskRegistry::undo_last_added`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn undo_last_added(&self) -> Result<Option<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::UndoLastAdded { reply })
            .await
    }

    /// See [`TaskRegistry::process_next_arrival`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn process_next_arrival(&self) -> Result<Option<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::ProcessNextArrival { reply })
            .await
    }

    /// See [`TaskRegistry::process_most_urgent`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn process_most_urgent(&self) -> Result<Option<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::ProcessMostUrgent { reply })
            .await
    }

    /// Pending tasks, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn pending_tasks(&self) -> Result<Vec<Task>, RegistryError> {
        self.reorder_by(SortMode::Stack).await
    }

    /// Completed tasks, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn completed_tasks(&self) -> Result<Vec<Task>, RegistryError> {
        self.request(|reply| RegistryCommand::Completed { reply })
            .await
    }

    /// Current counts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] if the registry task has stopped.
    pub async fn stats(&self) -> Result<Stats, RegistryError> {
        self.request(|reply| RegistryCommand::Stats { reply }).await
    }

    /// Asks the registry task to stop. Later requests fail with
    /// [`RegistryError::Closed`].
    pub async fn shutdown(&self) {
        let _ = self.tx.send(RegistryCommand::Shutdown).await;
    }
}
