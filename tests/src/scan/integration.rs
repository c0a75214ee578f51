#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use arpsweep_common::config::Config;
use arpsweep_common::report::Discovery;
use arpsweep_core::discovery::ChannelReporter;
use arpsweep_core::scanner::{ScanCoordinator, TaskExit, TaskReport, TaskRole};
use arpsweep_protocols::arp;
use pnet::datalink::{MacAddr, NetworkInterface};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::support::{
    interface, wait_until, within, FakeCapture, IFF_BROADCAST, IFF_LOOPBACK, IFF_UP,
};

const ETH0_MAC: MacAddr = MacAddr(0x02, 0x00, 0x00, 0x00, 0x00, 0x01);
const ETH1_MAC: MacAddr = MacAddr(0x02, 0x00, 0x00, 0x00, 0x00, 0x02);
const PEER_MAC: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22);
const LIMIT: Duration = Duration::from_secs(5);

fn eth0() -> NetworkInterface {
    interface("eth0", Some("192.168.1.10/30"), ETH0_MAC, IFF_UP | IFF_BROADCAST)
}

fn eth1() -> NetworkInterface {
    interface("eth1", Some("10.0.0.5/30"), ETH1_MAC, IFF_UP | IFF_BROADCAST)
}

fn fast_config() -> Config {
    Config {
        probe_interval: Duration::from_millis(20),
        ..Default::default()
    }
}

fn coordinator(
    cfg: Config,
    capture: Arc<FakeCapture>,
    physical: fn(&str) -> bool,
) -> (ScanCoordinator, UnboundedReceiver<Discovery>) {
    let (reporter, discoveries) = ChannelReporter::new();
    let scanner = ScanCoordinator::new(cfg, capture, Arc::new(physical), Arc::new(reporter));
    (scanner, discoveries)
}

fn roles_of(reports: &[TaskReport], name: &str) -> Vec<TaskRole> {
    reports
        .iter()
        .filter(|r| r.interface == name)
        .map(|r| r.role)
        .collect()
}

/// Two eligible interfaces yield four tasks, all ending on the shared token.
#[tokio::test]
async fn two_interfaces_run_four_tasks_until_cancelled() {
    let capture = Arc::new(FakeCapture::new());
    let (scanner, _discoveries) = coordinator(fast_config(), capture.clone(), |_| true);
    let token = CancellationToken::new();

    let run = tokio::spawn({
        let token = token.clone();
        async move { scanner.run(vec![eth0(), eth1()], token).await }
    });

    let probing = wait_until(
        || {
            ["eth0", "eth1"]
                .iter()
                .all(|name| capture.link(name).is_some_and(|l| l.writes() >= 6))
        },
        LIMIT,
    )
    .await;
    assert!(probing, "both interfaces should complete two sweeps");

    token.cancel();
    let reports: Vec<TaskReport> = within(LIMIT, run)
        .await
        .expect("coordinator did not stop after cancellation")
        .unwrap();

    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|r| r.exit.is_cancelled()));
    for name in ["eth0", "eth1"] {
        let roles = roles_of(&reports, name);
        assert_eq!(roles.len(), 2, "{name}");
        assert!(roles.contains(&TaskRole::Listener));
        assert!(roles.contains(&TaskRole::Driver));
    }
}

/// Loopback, virtual, address-less and unopenable interfaces are all skipped.
#[tokio::test]
async fn ineligible_and_failing_interfaces_are_skipped() {
    let capture = Arc::new(FakeCapture::new().refusing("eth3"));
    let (scanner, _discoveries) =
        coordinator(fast_config(), capture.clone(), |name| !name.starts_with("veth"));
    let token = CancellationToken::new();

    let candidates = vec![
        interface("lo", Some("127.0.0.1/8"), MacAddr::zero(), IFF_UP | IFF_LOOPBACK),
        interface("veth0", Some("172.17.0.1/16"), ETH1_MAC, IFF_UP | IFF_BROADCAST),
        interface("eth2", None, ETH1_MAC, IFF_UP | IFF_BROADCAST),
        interface("eth3", Some("10.9.9.9/24"), ETH1_MAC, IFF_UP | IFF_BROADCAST),
        eth0(),
    ];

    let run = tokio::spawn({
        let token = token.clone();
        async move { scanner.run(candidates, token).await }
    });

    assert!(
        wait_until(|| capture.link("eth0").is_some_and(|l| l.writes() > 0), LIMIT).await
    );
    token.cancel();
    let reports = within(LIMIT, run).await.unwrap().unwrap();

    assert_eq!(capture.opened(), vec!["eth0".to_string()]);
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.interface == "eth0"));
}

#[tokio::test]
async fn allow_list_limits_the_scan() {
    let capture = Arc::new(FakeCapture::new());
    let cfg = Config {
        interfaces: vec!["eth1".into()],
        ..fast_config()
    };
    let (scanner, _discoveries) = coordinator(cfg, capture.clone(), |_| true);
    let token = CancellationToken::new();
    token.cancel();

    let reports = within(LIMIT, scanner.run(vec![eth0(), eth1()], token))
        .await
        .unwrap();

    assert_eq!(capture.opened(), vec!["eth1".to_string()]);
    assert_eq!(reports.len(), 2);
}

#[tokio::test]
async fn nothing_eligible_returns_without_cancellation() {
    let capture = Arc::new(FakeCapture::new());
    let (scanner, _discoveries) = coordinator(fast_config(), capture.clone(), |_| false);

    let reports = within(LIMIT, scanner.run(vec![eth0(), eth1()], CancellationToken::new()))
        .await
        .expect("run should not wait for cancellation");

    assert!(reports.is_empty());
    assert!(capture.opened().is_empty());
}

/// A reply injected on the wire surfaces as a discovery for that interface.
#[tokio::test]
async fn injected_reply_is_reported() {
    let capture = Arc::new(FakeCapture::new());
    let (scanner, mut discoveries) = coordinator(fast_config(), capture.clone(), |_| true);
    let token = CancellationToken::new();

    let run = tokio::spawn({
        let token = token.clone();
        async move { scanner.run(vec![eth0(), eth1()], token).await }
    });
    assert!(wait_until(|| capture.opened().len() == 2, LIMIT).await);

    let link = capture.link("eth1").unwrap();
    link.inject(arp::create_reply(ETH1_MAC, Ipv4Addr::new(10, 0, 0, 5), PEER_MAC, Ipv4Addr::new(10, 0, 0, 4)).unwrap());
    link.inject(arp::create_request(PEER_MAC, Ipv4Addr::new(10, 0, 0, 4), Ipv4Addr::new(10, 0, 0, 5)).unwrap());
    link.inject(arp::create_reply(PEER_MAC, Ipv4Addr::new(10, 0, 0, 4), ETH1_MAC, Ipv4Addr::new(10, 0, 0, 5)).unwrap());

    let found: Discovery = within(LIMIT, discoveries.recv()).await.unwrap().unwrap();
    assert_eq!(
        found,
        Discovery {
            interface: "eth1".into(),
            ip: Ipv4Addr::new(10, 0, 0, 4),
            mac: PEER_MAC,
        }
    );

    token.cancel();
    let reports = within(LIMIT, run).await.unwrap().unwrap();
    assert_eq!(reports.len(), 4);
    assert!(discoveries.try_recv().is_err());
}

/// A failing write stops only that interface's driver. Everything else keeps
/// running until cancellation.
#[tokio::test]
async fn write_failure_stays_local_to_its_driver() {
    let capture = Arc::new(FakeCapture::new().with_broken_writes("eth0"));
    let (scanner, mut discoveries) = coordinator(fast_config(), capture.clone(), |_| true);
    let token = CancellationToken::new();

    let run = tokio::spawn({
        let token = token.clone();
        async move { scanner.run(vec![eth0(), eth1()], token).await }
    });

    assert!(wait_until(|| capture.link("eth1").is_some_and(|l| l.writes() >= 6), LIMIT).await);
    assert!(!token.is_cancelled());

    capture.link("eth0").unwrap().inject(
        arp::create_reply(PEER_MAC, Ipv4Addr::new(192, 168, 1, 9), ETH0_MAC, Ipv4Addr::new(192, 168, 1, 10)).unwrap(),
    );
    let found = within(LIMIT, discoveries.recv()).await.unwrap().unwrap();
    assert_eq!(found.interface, "eth0");

    token.cancel();
    let reports = within(LIMIT, run).await.unwrap().unwrap();
    assert_eq!(reports.len(), 4);

    let failed: Vec<&TaskReport> = reports
        .iter()
        .filter(|r| matches!(r.exit, TaskExit::WriteFailed(_)))
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].interface, "eth0");
    assert_eq!(failed[0].role, TaskRole::Driver);
    assert_eq!(capture.link("eth0").unwrap().writes(), 0);
}
