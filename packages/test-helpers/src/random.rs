use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use torrust_tracker_client_primitives::{InfoHash, PeerId};

/// Returns a random alphanumeric string of a certain size.
pub fn string(size: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(size).map(char::from).collect()
}

/// Returns a random info-hash.
#[must_use]
pub fn info_hash() -> InfoHash {
    InfoHash(thread_rng().gen())
}

/// Returns a random peer ID with the `-qB00000` client prefix.
///
/// # Panics
///
/// Will panic if the random suffix is not 12 bytes long.
#[must_use]
pub fn peer_id() -> PeerId {
    let id = format!("-qB00000{}", string(12));
    PeerId(id.as_bytes().try_into().expect("a 20 bytes peer id"))
}
