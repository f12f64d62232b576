use crate::plan::{ExperimentOption, NodeKind, SHAPED_QUEUE_PKTS, build_lab_topology};

#[test]
fn lab_topology_has_seven_hosts_and_four_switches() {
    let topo = build_lab_topology(ExperimentOption::A, 0.0);
    assert_eq!(topo.hosts().count(), 7);
    assert_eq!(topo.switches().count(), 4);
    assert_eq!(topo.links.len(), 10);
    assert_eq!(topo.node("s3").map(|n| n.kind), Some(NodeKind::Switch));
    assert_eq!(topo.host_ip("h1"), Some("10.0.0.1"));
    assert_eq!(topo.host_ip("s1"), None);
    assert!(topo.links.iter().all(|l| l.shaping.is_none()));
}

#[test]
fn path_walks_the_switch_chain() {
    let topo = build_lab_topology(ExperimentOption::A, 0.0);
    assert_eq!(
        topo.path("h1", "h7").expect("path"),
        vec!["h1", "s1", "s2", "s3", "s4", "h7"]
    );
    assert_eq!(
        topo.path("h4", "h5").expect("path"),
        vec!["h4", "s3", "h5"]
    );
    assert_eq!(topo.path("h1", "h1").expect("path"), vec!["h1"]);
    assert!(topo.path("h1", "h9").is_none());
}

#[test]
fn option_c_shapes_switch_links_with_bottleneck_loss() {
    let topo = build_lab_topology(ExperimentOption::C, 5.0);
    let s12 = topo.link("s2", "s1").and_then(|l| l.shaping.clone()).expect("s1-s2");
    let s23 = topo.link("s2", "s3").and_then(|l| l.shaping.clone()).expect("s2-s3");
    assert_eq!(s12.bandwidth_mbps, 100);
    assert_eq!(s12.loss_percent, 0.0);
    assert_eq!(s23.bandwidth_mbps, 50);
    assert_eq!(s23.loss_percent, 5.0);
    assert_eq!(s23.max_queue_pkts, SHAPED_QUEUE_PKTS);
    assert!(s23.use_htb);
    assert!(topo.link("h1", "s1").expect("h1-s1").shaping.is_none());

    let path = topo.path("h1", "h7").expect("path");
    let profile = topo.path_profile(&path);
    assert_eq!(profile.hops, 5);
    assert_eq!(profile.bottleneck_mbps, Some(50));
    assert!((profile.loss_percent - 5.0).abs() < 1e-9);

    // h1 -> h3 never crosses the lossy link.
    let short = topo.path("h1", "h3").expect("path");
    let profile = topo.path_profile(&short);
    assert_eq!(profile.bottleneck_mbps, Some(100));
    assert_eq!(profile.loss_percent, 0.0);
}
