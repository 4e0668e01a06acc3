//! Runs the fetches the store asks for.
//!
//! Each [`FetchTicket`] becomes a tokio task that queries the current
//! [`DataSource`] and sends the outcome back as an [`Action`]. Nothing is
//! cancelled; the store drops results whose ticket it no longer waits for.

use crate::source::{DataSource, DataSourceKind};
use crate::state::{Action, Fetch, FetchTicket, Loaded};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawns fetches against a data source.
pub struct Loader {
    source: Arc<dyn DataSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Loader {
    pub fn new(source: Arc<dyn DataSource>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { source, action_tx }
    }

    pub fn source_kind(&self) -> DataSourceKind {
        self.source.kind()
    }

    /// Replace the data source. Tasks already running keep the old one.
    pub fn set_source(&mut self, source: Arc<dyn DataSource>) {
        self.source = source;
    }

    /// Run one fetch in the background.
    pub fn spawn(&self, ticket: FetchTicket) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let action_tx = self.action_tx.clone();

        tokio::spawn(async move {
            let action = run(source.as_ref(), ticket).await;
            if action_tx.send(action).is_err() {
                debug!("action channel closed, dropping fetch result");
            }
        })
    }

    /// Run every fetch in `tickets`.
    pub fn spawn_all(&self, tickets: Vec<FetchTicket>) {
        for ticket in tickets {
            self.spawn(ticket);
        }
    }
}

/// Perform a fetch and turn its outcome into the action that reports it.
pub async fn run(source: &dyn DataSource, ticket: FetchTicket) -> Action {
    let FetchTicket { seq, fetch } = ticket;
    let target = fetch.target();

    let result = match fetch {
        Fetch::Dashboard { symbol, interval } => source
            .dashboard(&symbol, &interval)
            .await
            .map(Loaded::Dashboard),
        Fetch::Signals { symbol } => source.signals(&symbol).await.map(Loaded::Signals),
        Fetch::Strategies => source.strategies().await.map(Loaded::Strategies),
        Fetch::Analysis => source.analysis().await.map(Loaded::Analysis),
        Fetch::SystemStatus => source.system_status().await.map(Loaded::SystemStatus),
        Fetch::Health => Ok(Loaded::Health(source.health().await)),
    };

    match result {
        Ok(data) => Action::Loaded { seq, data },
        Err(e) => {
            warn!(?target, seq, source = %source.kind(), error = %e, "fetch failed");
            Action::LoadFailed {
                seq,
                target,
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DashboardSnapshot, StrategySummary};
    use crate::source::MockDataSource;
    use crate::state::FetchTarget;
    use crate::Error;

    fn mock() -> MockDataSource {
        let mut source = MockDataSource::new();
        source.expect_kind().return_const(DataSourceKind::Live);
        source
    }

    #[tokio::test]
    async fn test_dashboard_fetch_reports_loaded() {
        let mut source = mock();
        source
            .expect_dashboard()
            .withf(|symbol, interval| symbol == "ETHUSDT" && interval == "5")
            .times(1)
            .returning(|_, _| Ok(DashboardSnapshot::default()));

        let ticket = FetchTicket {
            seq: 7,
            fetch: Fetch::Dashboard {
                symbol: "ETHUSDT".into(),
                interval: "5".into(),
            },
        };
        let action = run(&source, ticket).await;
        assert!(matches!(
            action,
            Action::Loaded {
                seq: 7,
                data: Loaded::Dashboard(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_failure_reports_target() {
        let mut source = mock();
        source
            .expect_strategies()
            .returning(|| Err(Error::http(500)));

        let ticket = FetchTicket {
            seq: 3,
            fetch: Fetch::Strategies,
        };
        match run(&source, ticket).await {
            Action::LoadFailed { seq, target, error } => {
                assert_eq!(seq, 3);
                assert_eq!(target, FetchTarget::Strategies);
                assert_eq!(error, "HTTP error! status: 500");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_never_fails() {
        let mut source = mock();
        source.expect_health().returning(|| false);

        let ticket = FetchTicket {
            seq: 1,
            fetch: Fetch::Health,
        };
        assert!(matches!(
            run(&source, ticket).await,
            Action::Loaded {
                seq: 1,
                data: Loaded::Health(false)
            }
        ));
    }

    #[tokio::test]
    async fn test_spawn_sends_result_to_channel() {
        let mut source = mock();
        source.expect_strategies().returning(|| {
            Ok(vec![StrategySummary {
                name: "RSI Resonance".into(),
                ..Default::default()
            }])
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = Loader::new(Arc::new(source), tx);
        assert_eq!(loader.source_kind(), DataSourceKind::Live);

        loader
            .spawn(FetchTicket {
                seq: 9,
                fetch: Fetch::Strategies,
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Action::Loaded {
                seq: 9,
                data: Loaded::Strategies(strategies),
            }) => assert_eq!(strategies[0].name, "RSI Resonance"),
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
