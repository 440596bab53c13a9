use crate::models::{Cluster, EntityGauges, Namespace, StateGauges};

pub const CLUSTER_TOTAL: &str = "cluster.total";

/// Number of gauges emitted for every namespace: 4 entity, 7 keepalive, 7 event.
pub const NAMESPACE_GAUGE_COUNT: usize = 18;

/// Cluster-level gauge, emitted once per cluster before its namespaces.
/// `None` when the backend returned no metrics for the cluster.
pub fn cluster_gauges(cluster: &Cluster) -> Option<(&'static str, i64)> {
    cluster.total.map(|total| (CLUSTER_TOTAL, total))
}

/// Every namespace gauge in emission order: entity, keepalive, then event.
/// Zero values are kept.
pub fn namespace_gauges(ns: &Namespace) -> Vec<(&'static str, i64)> {
    let mut out = Vec::with_capacity(NAMESPACE_GAUGE_COUNT);
    out.extend(entity_gauges(&ns.entity));
    out.extend(state_gauges(&ns.keepalive, KEEPALIVE_NAMES));
    out.extend(state_gauges(&ns.event, EVENT_NAMES));
    out
}

fn entity_gauges(g: &EntityGauges) -> [(&'static str, i64); 4] {
    [
        ("namespace.entity.total", g.total),
        ("namespace.entity.agent", g.agent),
        ("namespace.entity.other", g.other),
        ("namespace.entity.proxy", g.proxy),
    ]
}

type StateNames = [&'static str; 7];

const KEEPALIVE_NAMES: StateNames = [
    "namespace.keepalive.total",
    "namespace.keepalive.state.passing",
    "namespace.keepalive.state.failing",
    "namespace.keepalive.status.okay",
    "namespace.keepalive.status.warning",
    "namespace.keepalive.status.critical",
    "namespace.keepalive.status.other",
];

const EVENT_NAMES: StateNames = [
    "namespace.event.total",
    "namespace.event.state.passing",
    "namespace.event.state.failing",
    "namespace.event.status.okay",
    "namespace.event.status.warning",
    "namespace.event.status.critical",
    "namespace.event.status.other",
];

fn state_gauges(g: &StateGauges, names: StateNames) -> [(&'static str, i64); 7] {
    [
        (names[0], g.total),
        (names[1], g.state_passing),
        (names[2], g.state_failing),
        (names[3], g.status_ok),
        (names[4], g.status_warning),
        (names[5], g.status_critical),
        (names[6], g.status_other),
    ]
}
