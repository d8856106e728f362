use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU16;

use torrust_tracker_client::codec::http::percent_encode_byte_array;
use torrust_tracker_client::rpc::http::HttpTracker;
use torrust_tracker_client::rpc::{AnyTracker, Error, TrackerRpc};
use torrust_tracker_client_primitives::{AnnounceEvent, AnnounceInfo, AnnounceQuery, AnnounceQueryBuilder, Progress, ScrapeInfo};
use torrust_tracker_client_test_helpers::{configuration, random};
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::http::environment::{Environment, Replies, SilentServer};
use crate::servers::http::responses;

fn started_query() -> AnnounceQuery {
    AnnounceQueryBuilder::new(random::info_hash(), random::peer_id(), NonZeroU16::new(17548).unwrap())
        .with_progress(Progress::new(0, 0, 1024))
        .with_event(AnnounceEvent::Started)
        .build()
}

fn sample_scrape_info() -> ScrapeInfo {
    ScrapeInfo {
        complete: 11,
        downloaded: 13772,
        incomplete: 19,
        name: None,
    }
}

mod for_announce_requests {
    use super::*;

    #[tokio::test]
    async fn it_should_send_the_announce_query_and_decode_the_compact_peer_list() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies {
            announce: responses::Announce {
                complete: 7,
                incomplete: 3,
                interval: 120,
                min_interval: 60,
                peers: vec![126, 0, 0, 2, 0x1A, 0xE1, 126, 0, 0, 1, 0x1A, 0xE2],
            }
            .bencoded(),
            ..Default::default()
        })
        .await;

        let query = started_query();

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        let AnnounceInfo::Success(announce) = tracker.announce(&query).await.unwrap() else {
            panic!("expected a successful announce response")
        };

        assert_eq!(announce.interval, 120);
        assert_eq!(announce.min_interval, Some(60));
        assert_eq!(announce.complete, Some(7));
        assert_eq!(announce.incomplete, Some(3));
        assert_eq!(
            announce.peers.addresses(),
            vec![
                SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 2)), 6881),
                SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 6882),
            ]
        );

        let queries = env.queries();

        assert_eq!(queries.len(), 1);

        let params: Vec<&str> = queries[0].split('&').collect();

        assert!(params.contains(&format!("info_hash={}", percent_encode_byte_array(&query.info_hash.bytes())).as_str()));
        assert!(params.contains(&"port=17548"));
        assert!(params.contains(&"left=1024"));
        assert!(params.contains(&"event=started"));
        assert!(params.contains(&"compact=1"));
    }

    #[tokio::test]
    async fn a_tracker_failure_should_be_a_successful_result() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies {
            announce: responses::Error::bencoded("torrent not registered"),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        let info = tracker.announce(&started_query()).await.unwrap();

        assert_eq!(
            info,
            AnnounceInfo::Failure {
                reason: "torrent not registered".to_string()
            }
        );

        let error: Error = info.into_response().unwrap_err().into();

        assert!(matches!(error, Error::TrackerFailure { reason } if reason == "torrent not registered"));
    }

    #[tokio::test]
    async fn a_malformed_response_should_be_a_decode_error() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies {
            announce: b"not bencoded".to_vec(),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        assert!(matches!(tracker.announce(&started_query()).await, Err(Error::Decode { .. })));
    }

    #[tokio::test]
    async fn an_error_status_should_be_a_failed_request() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies::default()).await;

        let uri = env.uri("/not-found/announce");

        let tracker = HttpTracker::connect(&uri, &configuration::ephemeral())
            .await
            .unwrap();

        assert!(matches!(
            tracker.announce(&started_query()).await,
            Err(Error::RequestFailed { .. })
        ));
    }

    #[tokio::test]
    async fn a_tracker_not_answering_in_time_should_not_be_responding() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let server = SilentServer::start().await;

        let tracker = HttpTracker::connect(server.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        assert!(matches!(
            tracker.announce(&started_query()).await,
            Err(Error::NotResponding { .. })
        ));
    }

    #[tokio::test]
    async fn the_any_tracker_handle_should_use_the_http_transport() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies {
            announce: responses::Announce {
                complete: 1,
                incomplete: 0,
                interval: 1800,
                min_interval: 900,
                peers: vec![],
            }
            .bencoded(),
            ..Default::default()
        })
        .await;

        let tracker = AnyTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        let announce = tracker.announce(&started_query()).await.unwrap().into_response().unwrap();

        assert_eq!(announce.interval, 1800);
        assert!(announce.peers.is_empty());
    }
}

mod for_scrape_requests {
    use torrust_tracker_client_primitives::ScrapeQuery;

    use super::*;

    #[tokio::test]
    async fn it_should_send_every_info_hash_and_decode_the_files() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let info_hash = random::info_hash();
        let other_info_hash = random::info_hash();

        let env = Environment::start(Replies {
            scrape: responses::scrape(&[(info_hash, sample_scrape_info()), (other_info_hash, ScrapeInfo::zeroed())]),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        let scrape = tracker
            .scrape(&ScrapeQuery::new(vec![info_hash, other_info_hash]))
            .await
            .unwrap();

        assert_eq!(scrape.len(), 2);
        assert_eq!(scrape.get(&info_hash), Some(&sample_scrape_info()));
        assert_eq!(scrape.get(&other_info_hash), Some(&ScrapeInfo::zeroed()));

        assert_eq!(
            env.queries(),
            vec![format!(
                "info_hash={}&info_hash={}",
                percent_encode_byte_array(&info_hash.bytes()),
                percent_encode_byte_array(&other_info_hash.bytes())
            )]
        );
    }

    #[tokio::test]
    async fn it_should_scrape_one_torrent() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let info_hash = random::info_hash();

        let env = Environment::start(Replies {
            scrape: responses::scrape(&[(info_hash, sample_scrape_info())]),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        assert_eq!(tracker.scrape_one(&info_hash).await.unwrap(), sample_scrape_info());
    }

    #[tokio::test]
    async fn a_torrent_left_out_of_the_response_should_not_be_found() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies {
            scrape: responses::scrape(&[(random::info_hash(), sample_scrape_info())]),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        let info_hash = random::info_hash();

        assert!(matches!(
            tracker.scrape_one(&info_hash).await,
            Err(Error::HashNotFound { info_hash: not_found }) if not_found == info_hash
        ));
    }

    #[tokio::test]
    async fn a_tracker_failure_should_be_an_error() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies {
            scrape: responses::Error::bencoded("scrape disabled"),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        assert!(matches!(
            tracker.scrape_one(&random::info_hash()).await,
            Err(Error::TrackerFailure { reason }) if reason == "scrape disabled"
        ));
    }

    #[tokio::test]
    async fn an_empty_scrape_should_be_sent_without_query_by_default() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let info_hash = random::info_hash();

        let env = Environment::start(Replies {
            scrape: responses::scrape(&[(info_hash, sample_scrape_info())]),
            ..Default::default()
        })
        .await;

        let tracker = HttpTracker::connect(env.announce_uri(), &configuration::ephemeral())
            .await
            .unwrap();

        let scrape = tracker.scrape(&ScrapeQuery::default()).await.unwrap();

        assert_eq!(scrape.get(&info_hash), Some(&sample_scrape_info()));
        assert_eq!(env.queries(), vec![String::new()]);
    }

    #[tokio::test]
    async fn a_tracker_without_scrape_url_should_not_be_scraped() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Environment::start(Replies::default()).await;

        let uri = env.uri("/tracker");

        let tracker = HttpTracker::connect(&uri, &configuration::ephemeral())
            .await
            .unwrap();

        assert!(matches!(
            tracker.scrape_one(&random::info_hash()).await,
            Err(Error::ScrapeUnsupported { .. })
        ));
        assert!(env.queries().is_empty());
    }
}
