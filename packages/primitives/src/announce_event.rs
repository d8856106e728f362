/// Announce events. Described on  the
/// [BEP 3. The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html)
///
/// There is no variant for the regular announces done at intervals. Those
/// are represented by the absence of an event (`Option::None`) in the
/// [`AnnounceQuery`](crate::AnnounceQuery).
///
/// The wire representation of each event (a lowercase token for HTTP and a
/// numeric code for UDP) is fixed by the protocol and defined by the codecs,
/// never by the declaration order of this enum.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnnounceEvent {
    /// The peer has started downloading the torrent.
    Started,
    /// The peer has ceased downloading the torrent.
    Stopped,
    /// The peer has completed downloading the torrent.
    Completed,
}
