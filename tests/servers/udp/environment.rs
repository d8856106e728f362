use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use torrust_tracker_client::codec::udp::{decode_announce_query, decode_scrape_query, encode_announce_info, encode_scrape};
use torrust_tracker_client::rpc::udp::frame::{
    decode_request, encode_connect_response, encode_response, Action, Request, RECEIVE_BUFFER_SIZE,
};
use torrust_tracker_client_primitives::{AnnounceInfo, AnnounceQuery, Scrape, ScrapeQuery};

pub const CONNECTION_ID: i64 = 0x1234_5678;

/// What the fake tracker answers to announce and scrape requests.
#[derive(Debug, Clone)]
pub enum Replies {
    Answer { announce: AnnounceInfo, scrape: Scrape },
    /// An error response with the message, after a successful connect.
    Fail(String),
}

#[derive(Debug, Default)]
struct Received {
    connects: usize,
    announces: Vec<AnnounceQuery>,
    scrapes: Vec<ScrapeQuery>,
}

/// A fake UDP tracker on an ephemeral loopback port.
pub struct Environment {
    pub bind_address: SocketAddr,
    uri: String,
    received: Arc<Mutex<Received>>,
    silent: Arc<AtomicBool>,
    server: JoinHandle<()>,
}

impl Environment {
    pub async fn start(replies: Replies) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let bind_address = socket.local_addr().unwrap();

        let received = Arc::new(Mutex::new(Received::default()));
        let silent = Arc::new(AtomicBool::new(false));

        let server = tokio::spawn(serve(socket, replies, received.clone(), silent.clone()));

        Self {
            bind_address,
            uri: format!("udp://{bind_address}/announce"),
            received,
            silent,
            server,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// From now on the tracker drops every packet.
    pub fn go_silent(&self) {
        self.silent.store(true, Ordering::SeqCst);
    }

    pub fn connects(&self) -> usize {
        self.received.lock().unwrap().connects
    }

    pub fn announces(&self) -> Vec<AnnounceQuery> {
        self.received.lock().unwrap().announces.clone()
    }

    pub fn scrapes(&self) -> Vec<ScrapeQuery> {
        self.received.lock().unwrap().scrapes.clone()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn serve(socket: UdpSocket, replies: Replies, received: Arc<Mutex<Received>>, silent: Arc<AtomicBool>) {
    let mut buffer = vec![0u8; RECEIVE_BUFFER_SIZE];

    while let Ok((size, from)) = socket.recv_from(&mut buffer).await {
        if silent.load(Ordering::SeqCst) {
            continue;
        }

        let Some(response) = respond(&buffer[..size], &replies, &received) else {
            continue;
        };

        socket.send_to(&response, from).await.unwrap();
    }
}

fn respond(packet: &[u8], replies: &Replies, received: &Mutex<Received>) -> Option<Vec<u8>> {
    let (action, transaction_id, body) = match decode_request(packet).ok()? {
        Request::Connect { transaction_id } => {
            received.lock().unwrap().connects += 1;

            return Some(encode_connect_response(transaction_id, CONNECTION_ID));
        }
        Request::Other {
            connection_id,
            transaction_id,
            ..
        } if connection_id != CONNECTION_ID => {
            return Some(encode_response(Action::Error, transaction_id, b"invalid connection id"));
        }
        Request::Other {
            action,
            transaction_id,
            body,
            ..
        } => (action, transaction_id, body),
    };

    match action {
        Action::Announce => {
            let query = decode_announce_query(body).unwrap();
            received.lock().unwrap().announces.push(query);
        }
        Action::Scrape => {
            let query = decode_scrape_query(body).unwrap();
            received.lock().unwrap().scrapes.push(query);
        }
        Action::Connect | Action::Error => return None,
    }

    let reply = match replies {
        Replies::Fail(reason) => return Some(encode_response(Action::Error, transaction_id, reason.as_bytes())),
        Replies::Answer { announce, .. } if action == Action::Announce => encode_announce_info(announce).unwrap(),
        Replies::Answer { scrape, .. } => encode_scrape(&decode_scrape_query(body).unwrap(), scrape),
    };

    Some(encode_response(action, transaction_id, &reply))
}
