//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use wiremock::MockServer;

use immutable_connector::config::WebhookConfig;
use immutable_connector::events::NormalizedEvent;
use immutable_connector::webhook::{EventSink, RegistrationStore, ServerError, WebhookServer};
use immutable_connector::{Dispatcher, ImmutableClient, NetworkId, Shutdown};

pub const API_KEY: &str = "sk_test_key";

/// Path of the mocked JSON-RPC endpoint.
pub const RPC_PATH: &str = "/rpc";

/// Dispatcher whose REST and RPC endpoints point at `server`.
pub fn dispatcher_for(
    server: &MockServer,
    network: NetworkId,
    api_key: Option<&str>,
) -> Dispatcher {
    let rpc_url = format!("{}{}", server.uri(), RPC_PATH);
    let profile = network
        .profile()
        .with_overrides(Some(&server.uri()), Some(&rpc_url));
    let client = ImmutableClient::new(
        profile,
        api_key.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap();
    Dispatcher::new(client)
}

/// A webhook server bound to an ephemeral local port.
pub struct RunningWebhook {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub registration: RegistrationStore,
    pub events: Receiver<NormalizedEvent>,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

impl RunningWebhook {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task.
    pub async fn stop(self) -> (RegistrationStore, Result<(), ServerError>) {
        self.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked");
        (self.registration, result)
    }
}

pub async fn start_webhook(config: WebhookConfig) -> RunningWebhook {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let registration = RegistrationStore::in_memory();
    let (sink, events) = EventSink::channel(16);
    let shutdown = Shutdown::new();

    let server = WebhookServer::new(config, sink, registration.clone());
    let task_shutdown = shutdown.clone();
    let handle = tokio::spawn(async move { server.run(listener, &task_shutdown).await });

    wait_until_registered(&registration).await;

    RunningWebhook {
        addr,
        shutdown,
        registration,
        events,
        handle,
    }
}

async fn wait_until_registered(registration: &RegistrationStore) {
    for _ in 0..100 {
        if registration.check_exists().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("webhook was never registered");
}
