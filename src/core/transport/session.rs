//! Session management for the persistent stream transport.
//!
//! Each open stream connection is a session: an opaque id, an outbound frame
//! channel, and a heartbeat task pushing a keepalive comment at a fixed
//! interval so intermediaries do not drop the idle connection. Sessions move
//! Opening -> Active -> Closing -> Closed; on close the heartbeat is always
//! cancelled before the map entry is removed, so a stale timer can never fire
//! against a torn-down transport.
//!
//! The map is shared across connection handlers on a parallel runtime, so it
//! lives behind an async `RwLock`.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Routing errors for session-correlated messages.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No Active session matches the identifier.
    #[error("Transport not found for sessionId")]
    NotFound(String),

    /// The session's stream closed while a frame was in flight.
    #[error("session {0} closed")]
    Closed(String),
}

/// One frame pushed over a session's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// The MCP endpoint event telling the client where to POST messages.
    Endpoint(String),

    /// A serialized JSON-RPC message.
    Message(String),

    /// Inert keepalive data; never interpreted as a protocol call.
    Comment(String),
}

struct SessionHandle {
    tx: mpsc::Sender<SseFrame>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    heartbeat: JoinHandle<()>,
}

/// Owns all Active sessions, keyed by session identifier.
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    keepalive: Duration,
}

impl SessionManager {
    /// Create a manager with the given keepalive interval.
    pub fn new(keepalive: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            keepalive,
        }
    }

    /// Open a new session: allocate an id unique among Active sessions,
    /// start its heartbeat, and hand back the frame receiver.
    pub async fn open(&self) -> (String, mpsc::Receiver<SseFrame>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(32);

        let heartbeat_tx = tx.clone();
        let interval = self.keepalive;
        let heartbeat = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the keepalive starts one
            // interval after connect.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let ping = SseFrame::Comment(format!("ping - {}", Utc::now().to_rfc3339()));
                if heartbeat_tx.send(ping).await.is_err() {
                    break;
                }
            }
        });

        let handle = SessionHandle {
            tx,
            created_at: Utc::now(),
            heartbeat,
        };

        self.sessions.write().await.insert(id.clone(), handle);
        debug!("Session {} opened", id);
        (id, rx)
    }

    /// Push a frame to an Active session.
    pub async fn send(&self, id: &str, frame: SseFrame) -> Result<(), SessionError> {
        let tx = {
            let sessions = self.sessions.read().await;
            sessions
                .get(id)
                .map(|handle| handle.tx.clone())
                .ok_or_else(|| SessionError::NotFound(id.to_string()))?
        };

        tx.send(frame)
            .await
            .map_err(|_| SessionError::Closed(id.to_string()))
    }

    /// Close a session: cancel the heartbeat first, then drop the entry.
    pub async fn close(&self, id: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get(id) {
            handle.heartbeat.abort();
        }
        if sessions.remove(id).is_some() {
            debug!("Session {} closed", id);
        }
    }

    /// Whether a session with this id is Active.
    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Number of Active sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Duration::from_secs(25))
    }

    #[tokio::test]
    async fn test_open_allocates_unique_ids() {
        let manager = manager();
        let (a, _rx_a) = manager.open().await;
        let (b, _rx_b) = manager.open().await;
        assert_ne!(a, b);
        assert_eq!(manager.count().await, 2);
    }

    #[tokio::test]
    async fn test_send_to_unknown_session() {
        let manager = manager();
        let err = manager.send("missing-id", SseFrame::Comment("x".into())).await;
        assert!(matches!(err, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_send_and_receive_frame() {
        let manager = manager();
        let (id, mut rx) = manager.open().await;

        manager.send(&id, SseFrame::Message("{}".into())).await.unwrap();
        assert_eq!(rx.recv().await, Some(SseFrame::Message("{}".into())));
    }

    #[tokio::test]
    async fn test_close_removes_only_target_session() {
        let manager = manager();
        let (a, _rx_a) = manager.open().await;
        let (b, mut rx_b) = manager.open().await;
        let (c, _rx_c) = manager.open().await;

        manager.close(&b).await;

        assert_eq!(manager.count().await, 2);
        assert!(manager.contains(&a).await);
        assert!(!manager.contains(&b).await);
        assert!(manager.contains(&c).await);

        // All senders for b are gone, so its receiver drains to None.
        assert_eq!(rx_b.recv().await, None);

        // Remaining sessions still accept frames.
        manager.send(&a, SseFrame::Comment("still here".into())).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let manager = manager();
        let (id, _rx) = manager.open().await;
        manager.close(&id).await;
        manager.close(&id).await;
        assert_eq!(manager.count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_emits_comment_frames() {
        let manager = SessionManager::new(Duration::from_secs(25));
        let (_id, mut rx) = manager.open().await;

        tokio::time::advance(Duration::from_secs(26)).await;

        match rx.recv().await {
            Some(SseFrame::Comment(text)) => assert!(text.starts_with("ping - ")),
            other => panic!("expected keepalive comment, got {:?}", other),
        }
    }
}
