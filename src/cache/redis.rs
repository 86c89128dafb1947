use std::future::Future;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppResult;

/// Opens a Redis client; no connection is made until first use
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// A pending `SETEX`
struct PendingWrite {
    key: String,
    json: String,
    ttl_secs: u64,
}

/// Redis-backed search cache
///
/// Reads go straight to Redis. Writes are queued to a single writer task so a
/// slow or unreachable Redis never delays a response.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the writer task once queued writes have been flushed
pub struct CacheWriterHandle {
    stop: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Returns after every write queued before the call has been attempted
    pub async fn shutdown(self) {
        if self.stop.send(()).await.is_err() {
            tracing::warn!("Cache writer already stopped");
        }
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task failed during shutdown");
        }
    }
}

impl RedisCache {
    /// Connects and spawns the writer task
    pub async fn connect(client: Client) -> AppResult<(Self, CacheWriterHandle)> {
        let conn = ConnectionManager::new(client).await?;
        let (writes, pending) = mpsc::unbounded_channel();
        let (stop, stop_rx) = mpsc::channel(1);

        let writer_conn = conn.clone();
        let writer = tokio::spawn(run_writer(pending, stop_rx, move |write| {
            let mut conn = writer_conn.clone();
            async move { store(&mut conn, write).await }
        }));

        Ok((Self { conn, writes }, CacheWriterHandle { stop, writer }))
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.get(key).await?;
        Ok(json)
    }

    /// Queues a write; Redis expires the key after `ttl_secs`
    pub fn set_in_background(&self, key: String, json: String, ttl_secs: u64) {
        let write = PendingWrite { key, json, ttl_secs };
        if self.writes.send(write).is_err() {
            tracing::error!("Cache writer is gone, dropping write");
        }
    }
}

/// Applies queued writes one at a time until asked to stop, then drains the queue
async fn run_writer<F, Fut>(
    mut pending: mpsc::UnboundedReceiver<PendingWrite>,
    mut stop: mpsc::Receiver<()>,
    mut apply: F,
) where
    F: FnMut(PendingWrite) -> Fut,
    Fut: Future<Output = ()>,
{
    tracing::debug!("Cache writer started");

    loop {
        tokio::select! {
            Some(write) = pending.recv() => apply(write).await,
            _ = stop.recv() => break,
        }
    }

    // No new writes after this point; drain what is already queued
    pending.close();
    let mut flushed = 0usize;
    while let Some(write) = pending.recv().await {
        apply(write).await;
        flushed += 1;
    }
    tracing::info!(flushed, "Cache writer stopped");
}

async fn store(conn: &mut ConnectionManager, write: PendingWrite) {
    let result: redis::RedisResult<()> = conn.set_ex(&write.key, write.json, write.ttl_secs).await;
    if let Err(e) = result {
        tracing::error!(key = %write.key, error = %e, "Failed to write to Redis cache");
    }
}
