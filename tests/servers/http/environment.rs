use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// The bencoded bodies the fake tracker answers with.
#[derive(Debug, Clone, Default)]
pub struct Replies {
    pub announce: Vec<u8>,
    pub scrape: Vec<u8>,
}

#[derive(Clone)]
struct FakeTracker {
    replies: Arc<Replies>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeTracker {
    fn record(&self, query: Option<String>) {
        self.queries.lock().unwrap().push(query.unwrap_or_default());
    }
}

/// A fake HTTP tracker on an ephemeral loopback port. It answers every
/// request to `/announce` and `/scrape` with a fixed body and records the raw
/// query strings it receives.
pub struct Environment {
    pub bind_address: SocketAddr,
    announce_uri: String,
    queries: Arc<Mutex<Vec<String>>>,
    server: JoinHandle<()>,
}

impl Environment {
    pub async fn start(replies: Replies) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let bind_address = listener.local_addr().unwrap();

        let queries = Arc::new(Mutex::new(vec![]));

        let tracker = FakeTracker {
            replies: Arc::new(replies),
            queries: queries.clone(),
        };

        let app = Router::new()
            .route("/announce", get(announce))
            .route("/scrape", get(scrape))
            .with_state(tracker);

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            bind_address,
            announce_uri: format!("http://{bind_address}/announce"),
            queries,
            server,
        }
    }

    pub fn uri(&self, path: &str) -> String {
        format!("http://{}{path}", self.bind_address)
    }

    pub fn announce_uri(&self) -> &str {
        &self.announce_uri
    }

    /// The raw query strings received so far, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn announce(State(tracker): State<FakeTracker>, RawQuery(query): RawQuery) -> Vec<u8> {
    tracker.record(query);
    tracker.replies.announce.clone()
}

async fn scrape(State(tracker): State<FakeTracker>, RawQuery(query): RawQuery) -> Vec<u8> {
    tracker.record(query);
    tracker.replies.scrape.clone()
}

/// A TCP server that accepts connections and never answers.
pub struct SilentServer {
    pub bind_address: SocketAddr,
    announce_uri: String,
    server: JoinHandle<()>,
}

impl SilentServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let bind_address = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut connections = vec![];

            while let Ok((stream, _)) = listener.accept().await {
                connections.push(stream);
            }
        });

        Self {
            bind_address,
            announce_uri: format!("http://{bind_address}/announce"),
            server,
        }
    }

    pub fn announce_uri(&self) -> &str {
        &self.announce_uri
    }
}

impl Drop for SilentServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}
