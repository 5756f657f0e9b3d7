//! Single-writer actor for serialized database mutations.
//!
//! SQLite permits one writer at a time. Every mutating repository call is
//! funneled through this actor, which owns a dedicated connection and runs
//! each job inside an immediate transaction — a multi-statement write such
//! as the item-set replacement commits or rolls back as one unit.

use std::any::Any;
use std::sync::Arc;

use diesel::{Connection, SqliteConnection};
use tokio::sync::{mpsc, oneshot};

use carhub_core::errors::Result;

use super::DbPool;
use crate::errors::StorageError;

type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for submitting write jobs to the actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

impl WriteHandle {
    /// Runs `job` on the writer connection, inside an immediate transaction,
    /// and returns its result. The return value is type-erased over the
    /// channel and downcast back here.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|value| Box::new(value) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("writer actor mailbox closed, the actor has stopped");

        ret_rx
            .await
            .expect("writer actor dropped the reply sender without answering")
            .map(|boxed| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("writer actor replied with an unexpected type"))
            })
    }
}

/// Spawns a background task acting as the single writer. It holds one pooled
/// connection for its whole lifetime and processes jobs serially, stopping
/// once every `WriteHandle` has been dropped.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("failed to acquire the dedicated writer connection");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|conn| {
                    job(conn).map_err(StorageError::from)
                })
                .map_err(Into::into);
            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
