//! Mock implementations for testing
//!
//! Provides a mock Transport that records every broker operation, so the publish
//! procedure can be exercised without a running broker.

use crate::error::PublisherError;
use crate::transport::{ConnectionState, Transport};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One operation issued against the mock broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Connect,
    DeclareQueue(String),
    Publish {
        exchange: String,
        routing_key: String,
        payload: Vec<u8>,
    },
    Disconnect,
}

/// Operation at which the mock should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    Connect,
    DeclareQueue,
    Publish,
    Disconnect,
}

/// Mock transport for testing
///
/// Calls are recorded even when they fail. Queue declares are idempotent, like a real
/// broker: declaring a known queue succeeds and leaves the queue set unchanged. Clones
/// share the recorded history and the queue set.
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub calls: Arc<Mutex<Vec<TransportCall>>>,
    pub queues: Arc<Mutex<HashSet<String>>>,
    pub fail_at: Option<FailurePoint>,
    state: ConnectionState,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            queues: Arc::default(),
            fail_at: None,
            state: ConnectionState::Idle,
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(point: FailurePoint) -> Self {
        Self {
            fail_at: Some(point),
            ..Default::default()
        }
    }

    /// Pre-populate the mock broker with an existing queue
    pub async fn with_existing_queue(self, queue: &str) -> Self {
        self.queues.lock().await.insert(queue.to_string());
        self
    }

    pub async fn get_calls(&self) -> Vec<TransportCall> {
        self.calls.lock().await.clone()
    }

    pub async fn get_published(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, TransportCall::Publish { .. }))
            .cloned()
            .collect()
    }

    pub async fn get_queues(&self) -> HashSet<String> {
        self.queues.lock().await.clone()
    }

    pub async fn count(&self, wanted: impl Fn(&TransportCall) -> bool) -> usize {
        self.calls.lock().await.iter().filter(|c| wanted(c)).count()
    }

    pub async fn clear_history(&self) {
        self.calls.lock().await.clear();
    }

    async fn record(&self, call: TransportCall) {
        self.calls.lock().await.push(call);
    }

    fn check(&self, point: FailurePoint) -> Result<(), PublisherError> {
        if self.fail_at == Some(point) {
            Err(PublisherError::internal_error(format!(
                "Mock {point:?} failure"
            )))
        } else {
            Ok(())
        }
    }

    fn require_connected(&self) -> Result<(), PublisherError> {
        if self.state == ConnectionState::Connected {
            Ok(())
        } else {
            Err(PublisherError::internal_error(format!(
                "Mock not connected - current state: {:?}",
                self.state
            )))
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Error = PublisherError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.record(TransportCall::Connect).await;
        self.check(FailurePoint::Connect)?;
        self.state = ConnectionState::Connected;
        Ok(())
    }

    async fn declare_queue(&self, queue: &str) -> Result<(), Self::Error> {
        self.record(TransportCall::DeclareQueue(queue.to_string()))
            .await;
        self.require_connected()?;
        self.check(FailurePoint::DeclareQueue)?;
        self.queues.lock().await.insert(queue.to_string());
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        self.record(TransportCall::Publish {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            payload: payload.to_vec(),
        })
        .await;
        self.require_connected()?;
        self.check(FailurePoint::Publish)
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        self.record(TransportCall::Disconnect).await;
        self.state = ConnectionState::Closed;
        self.check(FailurePoint::Disconnect)
    }

    fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    fn connection_state(&self) -> ConnectionState {
        self.state.clone()
    }
}
