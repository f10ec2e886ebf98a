//! Event data source used by the demo coordinators.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
}

impl Event {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceError {
    #[error("Event service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("No event with id '{id}'")]
    NotFound { id: String },
}

/// The events every session starts with.
pub fn sample_events() -> Vec<Event> {
    [
        ("7", "Harbour Lights Festival"),
        ("12", "Night Market"),
        ("23", "Open Air Cinema"),
        ("42", "The Answer Conference"),
        ("64", "Chess in the Park"),
    ]
    .into_iter()
    .map(|(id, name)| Event::new(id, name))
    .collect()
}

/// Asynchronous event lookups.
pub trait EventService: Send + Sync + 'static {
    fn events(&self) -> impl Future<Output = Result<Vec<Event>, ServiceError>> + Send;

    fn search_events(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Event>, ServiceError>> + Send;

    fn event(&self, id: &str) -> impl Future<Output = Result<Event, ServiceError>> + Send;
}

/// In-memory [`EventService`] with simulated latency.
#[derive(Debug, Clone)]
pub struct MockEventService {
    catalog: Vec<Event>,
    latency: Duration,
    query_latency: HashMap<String, Duration>,
    failing_queries: HashSet<String>,
}

impl Default for MockEventService {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl MockEventService {
    pub fn new(latency: Duration) -> Self {
        Self {
            catalog: sample_events(),
            latency,
            query_latency: HashMap::new(),
            failing_queries: HashSet::new(),
        }
    }

    /// Override the latency for one search query.
    pub fn with_query_latency(mut self, query: impl Into<String>, latency: Duration) -> Self {
        self.query_latency.insert(query.into(), latency);
        self
    }

    /// Make searches for `query` fail with [`ServiceError::Unavailable`].
    pub fn with_failing_query(mut self, query: impl Into<String>) -> Self {
        self.failing_queries.insert(query.into());
        self
    }

    pub fn catalog(&self) -> &[Event] {
        &self.catalog
    }

    fn latency_for(&self, query: &str) -> Duration {
        self.query_latency
            .get(query)
            .copied()
            .unwrap_or(self.latency)
    }
}

impl EventService for MockEventService {
    fn events(&self) -> impl Future<Output = Result<Vec<Event>, ServiceError>> + Send {
        let latency = self.latency;
        let events = self.catalog.clone();
        async move {
            tokio::time::sleep(latency).await;
            Ok(events)
        }
    }

    fn search_events(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Event>, ServiceError>> + Send {
        let latency = self.latency_for(query);
        let failing = self.failing_queries.contains(query);
        let query = query.to_string();
        async move {
            tokio::time::sleep(latency).await;
            if failing {
                return Err(ServiceError::Unavailable {
                    reason: format!("search for '{query}' timed out"),
                });
            }
            Ok(vec![Event::new(
                format!("search-{query}"),
                format!("Mock Event: {query}"),
            )])
        }
    }

    fn event(&self, id: &str) -> impl Future<Output = Result<Event, ServiceError>> + Send {
        let latency = self.latency;
        let found = self.catalog.iter().find(|event| event.id == id).cloned();
        let id = id.to_string();
        async move {
            tokio::time::sleep(latency).await;
            found.ok_or(ServiceError::NotFound { id })
        }
    }
}
