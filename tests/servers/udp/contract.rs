use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU16;

use torrust_tracker_client::rpc::udp::UdpTracker;
use torrust_tracker_client::rpc::{AnyTracker, Error, TrackerRpc};
use torrust_tracker_client_primitives::{
    AnnounceEvent, AnnounceInfo, AnnounceQuery, AnnounceQueryBuilder, AnnounceResponse, Peer, PeerList, Progress, Scrape,
    ScrapeInfo,
};
use torrust_tracker_client_test_helpers::{configuration, random};
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::udp::environment::{Environment, Replies};

fn started_query() -> AnnounceQuery {
    AnnounceQueryBuilder::new(random::info_hash(), random::peer_id(), NonZeroU16::new(17548).unwrap())
        .with_progress(Progress::new(0, 0, 1024))
        .with_event(AnnounceEvent::Started)
        .build()
}

fn two_peers_response() -> AnnounceResponse {
    AnnounceResponse {
        complete: Some(7),
        incomplete: Some(3),
        interval: 1800,
        peers: PeerList::new(vec![
            Peer::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 2)), 6881)),
            Peer::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 6882)),
        ]),
        ..Default::default()
    }
}

fn answering(scrape: Scrape) -> Replies {
    Replies::Answer {
        announce: AnnounceInfo::Success(two_peers_response()),
        scrape,
    }
}

mod for_connect_requests {
    use super::*;

    #[tokio::test]
    async fn it_should_do_one_handshake_to_check_the_tracker_answers() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        assert_eq!(tracker.remote_addr(), env.bind_address);
        assert_eq!(env.connects(), 1);
    }

    #[tokio::test]
    async fn a_tracker_not_answering_the_handshake_should_not_be_responding() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        env.go_silent();

        assert!(matches!(
            UdpTracker::connect(env.uri(), &configuration::ephemeral()).await,
            Err(Error::NotResponding { .. })
        ));
    }

    #[tokio::test]
    async fn the_any_tracker_handle_should_use_the_udp_transport() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = AnyTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        assert!(matches!(tracker, AnyTracker::Udp(_)));
    }
}

mod for_announce_requests {
    use super::*;

    #[tokio::test]
    async fn it_should_send_the_announce_query_and_decode_the_peers_in_order() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        let query = started_query();

        let info = tracker.announce(&query).await.unwrap();

        assert_eq!(info, AnnounceInfo::Success(two_peers_response()));
        assert_eq!(env.announces(), vec![query]);
    }

    #[tokio::test]
    async fn every_request_should_do_its_own_handshake() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        tracker.announce(&started_query()).await.unwrap();
        tracker.announce(&started_query()).await.unwrap();

        assert_eq!(env.connects(), 3);
        assert_eq!(env.announces().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_announces_through_one_handle_should_all_complete() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        let first_query = started_query();
        let second_query = started_query();

        let (first, second) = tokio::join!(tracker.announce(&first_query), tracker.announce(&second_query));

        assert!(first.unwrap().into_response().is_ok());
        assert!(second.unwrap().into_response().is_ok());
    }

    #[tokio::test]
    async fn concurrent_announces_should_not_share_the_local_port_when_the_bind_ip_is_fixed() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let mut config = configuration::ephemeral();
        config.udp.bind_ip = IpAddr::V4(Ipv4Addr::LOCALHOST);

        let tracker = UdpTracker::connect(env.uri(), &config).await.unwrap();

        let queries: Vec<AnnounceQuery> = (0..4).map(|_| started_query()).collect();

        let (first, second, third, fourth) = tokio::join!(
            tracker.announce(&queries[0]),
            tracker.announce(&queries[1]),
            tracker.announce(&queries[2]),
            tracker.announce(&queries[3])
        );

        for info in [first, second, third, fourth] {
            assert!(info.unwrap().into_response().is_ok());
        }

        assert_eq!(env.announces().len(), 4);
    }

    #[tokio::test]
    async fn an_error_response_should_be_a_tracker_failure_result() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies::Fail("torrent not registered".to_string())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        assert_eq!(
            tracker.announce(&started_query()).await.unwrap(),
            AnnounceInfo::Failure {
                reason: "torrent not registered".to_string()
            }
        );
    }

    #[tokio::test]
    async fn a_tracker_that_stops_answering_should_not_be_responding() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        env.go_silent();

        assert!(matches!(
            tracker.announce(&started_query()).await,
            Err(Error::NotResponding { .. })
        ));
    }
}

mod for_scrape_requests {
    use torrust_tracker_client::rpc::udp::frame::MAX_SCRAPE_TORRENTS;
    use torrust_tracker_client_primitives::{InfoHash, ScrapeQuery};

    use super::*;

    fn sample_scrape_info() -> ScrapeInfo {
        ScrapeInfo {
            complete: 11,
            downloaded: 13772,
            incomplete: 19,
            name: None,
        }
    }

    #[tokio::test]
    async fn it_should_scrape_one_torrent() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let info_hash = random::info_hash();

        let env = Environment::start(answering(Scrape::with_one_file(info_hash, sample_scrape_info()))).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        assert_eq!(tracker.scrape_one(&info_hash).await.unwrap(), sample_scrape_info());
    }

    #[tokio::test]
    async fn it_should_split_large_queries_in_batches() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let info_hashes: Vec<InfoHash> = (0..100).map(|_| random::info_hash()).collect();

        let env = Environment::start(answering(Scrape::with_one_file(info_hashes[80], sample_scrape_info()))).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        let scrape = tracker.scrape(&ScrapeQuery::new(info_hashes.clone())).await.unwrap();

        assert_eq!(scrape.len(), 100);
        assert_eq!(scrape.get(&info_hashes[80]), Some(&sample_scrape_info()));
        assert_eq!(scrape.get(&info_hashes[0]), Some(&ScrapeInfo::zeroed()));

        let batches: Vec<usize> = env.scrapes().iter().map(ScrapeQuery::len).collect();

        assert_eq!(batches, vec![MAX_SCRAPE_TORRENTS, 100 - MAX_SCRAPE_TORRENTS]);
        assert_eq!(env.scrapes()[1].info_hashes(), &info_hashes[MAX_SCRAPE_TORRENTS..]);
    }

    #[tokio::test]
    async fn an_empty_query_should_be_rejected_without_sending_any_request() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(answering(Scrape::default())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        assert!(matches!(
            tracker.scrape(&ScrapeQuery::default()).await,
            Err(Error::EmptyScrapeQuery { .. })
        ));
        assert!(env.scrapes().is_empty());
    }

    #[tokio::test]
    async fn an_error_response_should_be_a_tracker_failure_error() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies::Fail("scrape disabled".to_string())).await;

        let tracker = UdpTracker::connect(env.uri(), &configuration::ephemeral()).await.unwrap();

        assert!(matches!(
            tracker.scrape_one(&random::info_hash()).await,
            Err(Error::TrackerFailure { reason }) if reason == "scrape disabled"
        ));
    }
}
