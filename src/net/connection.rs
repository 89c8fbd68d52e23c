//! Connection registry and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Keep the set of live client connections
//! - Deliver close / destroy notifications to every live connection on shutdown
//! - Let shutdown wait until the set is empty

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Global atomic counter for connection IDs. Only uniqueness is required.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Take the next unused ID.
    pub fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Control side of one live connection.
///
/// The task serving the connection waits on `closed()` and `destroyed()`;
/// shutdown calls `close()` and `destroy()`. Notifications sent before the
/// task starts waiting are kept, so none is lost.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    peer: SocketAddr,
    close: Arc<Notify>,
    destroy: Arc<Notify>,
}

impl ConnectionHandle {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            id: ConnectionId::next(),
            peer,
            close: Arc::new(Notify::new()),
            destroy: Arc::new(Notify::new()),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Ask the connection to finish its in-flight response and close.
    pub fn close(&self) {
        self.close.notify_one();
    }

    /// Tell the connection to drop immediately.
    pub fn destroy(&self) {
        self.destroy.notify_one();
    }

    /// Resolves once `close()` has been called.
    pub async fn closed(&self) {
        self.close.notified().await;
    }

    /// Resolves once `destroy()` has been called.
    pub async fn destroyed(&self) {
        self.destroy.notified().await;
    }
}

/// Set of live connections, shared by the accept loop, connection tasks and shutdown.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    connections: DashMap<ConnectionId, ConnectionHandle>,
    /// Live count, updated together with the map; shutdown waits on it.
    live: watch::Sender<usize>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        let (live, _) = watch::channel(0);
        Self {
            inner: Arc::new(RegistryInner {
                connections: DashMap::new(),
                live,
            }),
        }
    }

    /// Record a newly opened connection. The returned guard unregisters it on drop.
    pub fn register(&self, handle: ConnectionHandle) -> ConnectionGuard {
        let id = handle.id();
        let peer = handle.peer();
        if self.inner.connections.insert(id, handle).is_none() {
            self.inner.live.send_modify(|count| *count += 1);
        }

        tracing::info!(
            connection_id = %id,
            peer_addr = %peer,
            active_connections = self.len(),
            "A new connection was started"
        );

        ConnectionGuard {
            registry: self.clone(),
            id,
        }
    }

    /// Forget a connection. Returns false if it was already gone.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        if self.inner.connections.remove(&id).is_none() {
            return false;
        }
        self.inner.live.send_modify(|count| *count -= 1);

        tracing::info!(
            connection_id = %id,
            active_connections = self.len(),
            "A connection was closed"
        );
        true
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        *self.inner.live.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.inner.connections.contains_key(&id)
    }

    /// Send a close notification to every live connection. Returns how many were notified.
    pub fn broadcast_close(&self) -> usize {
        self.notify_all(ConnectionHandle::close)
    }

    /// Destroy every connection still open. Returns how many were destroyed.
    pub fn force_destroy_all(&self) -> usize {
        self.notify_all(ConnectionHandle::destroy)
    }

    fn notify_all(&self, notify: fn(&ConnectionHandle)) -> usize {
        // Snapshot first so no shard lock is held while waking tasks.
        let handles: Vec<ConnectionHandle> = self
            .inner
            .connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for handle in &handles {
            notify(handle);
        }
        handles.len()
    }

    /// Wait until no connection is registered.
    pub async fn wait_drained(&self) {
        let mut live = self.inner.live.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = live.wait_for(|count| *count == 0).await;
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that tracks a connection's lifetime.
/// Unregisters the connection when dropped.
#[derive(Debug)]
pub struct ConnectionGuard {
    registry: ConnectionRegistry,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}
