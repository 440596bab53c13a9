use crate::format::MetricBuffer;
use crate::gauges;
use crate::models::{Cluster, ClusterError, MetricSample};
use crate::tags::{TagSet, scope_name};

pub const CLUSTER_TAG: &str = "cluster";
pub const NAMESPACE_TAG: &str = "namespace";

/// Walk clusters and their namespaces in arrival order, formatting every
/// gauge into `buffer` with the accumulator state current at that point.
///
/// Tags are never removed: a cluster's `cluster.total` still carries the
/// `namespace` tag left over from the previous cluster, if any.
///
/// Clusters that reported an error are returned. A cluster with an error and
/// no metrics payload contributes no lines.
pub fn walk(
    clusters: &[Cluster],
    tags: &mut TagSet,
    buffer: &mut MetricBuffer,
    timestamp: i64,
) -> Vec<ClusterError> {
    let mut errors = Vec::new();

    for cluster in clusters {
        if let Some(err) = &cluster.error {
            tracing::warn!("walker: cluster '{}' reported {err}", cluster.name);
            errors.push(err.clone());
        }

        let Some((name, total)) = gauges::cluster_gauges(cluster) else {
            tracing::debug!("walker: no metrics for cluster '{}', skipping", cluster.name);
            continue;
        };

        tags.set(CLUSTER_TAG, scope_name(&cluster.name));
        emit(buffer, tags, name, total, timestamp);

        for ns in &cluster.namespaces {
            tags.set(NAMESPACE_TAG, scope_name(&ns.name));
            for (name, value) in gauges::namespace_gauges(ns) {
                emit(buffer, tags, name, value, timestamp);
            }
        }

        tracing::debug!(
            "walker: cluster '{}' done ({} namespaces)",
            cluster.name,
            cluster.namespaces.len()
        );
    }

    errors
}

fn emit(buffer: &mut MetricBuffer, tags: &TagSet, name: &str, value: i64, timestamp: i64) {
    let sample = MetricSample::new(name, tags.snapshot(), value, timestamp);
    buffer.push(&sample);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use crate::models::{ClusterErrorKind, EntityGauges, Namespace};

    const TS: i64 = 1_700_000_000;

    fn cluster(name: &str, total: i64, namespaces: &[&str]) -> Cluster {
        Cluster {
            name: name.to_string(),
            total: Some(total),
            namespaces: namespaces
                .iter()
                .map(|n| Namespace {
                    name: n.to_string(),
                    ..Namespace::default()
                })
                .collect(),
            error: None,
        }
    }

    fn run(clusters: &[Cluster], format: OutputFormat) -> (Vec<String>, Vec<ClusterError>) {
        let mut tags = TagSet::new();
        let mut buffer = MetricBuffer::new(format);
        let errors = walk(clusters, &mut tags, &mut buffer, TS);
        (buffer.into_lines(), errors)
    }

    #[test]
    fn single_zero_namespace_emits_cluster_total_then_all_gauges() {
        let (lines, errors) = run(&[cluster("~", 0, &["~"])], OutputFormat::OpenTsdbLine);

        assert!(errors.is_empty());
        assert_eq!(lines.len(), 1 + gauges::NAMESPACE_GAUGE_COUNT);
        assert_eq!(lines[0], "cluster.total 1700000000 0 cluster=local");
        assert_eq!(
            lines[1],
            "namespace.entity.total 1700000000 0 cluster=local namespace=local"
        );
        assert_eq!(
            lines.last().unwrap(),
            "namespace.event.status.other 1700000000 0 cluster=local namespace=local"
        );
    }

    #[test]
    fn names_other_than_placeholder_are_kept() {
        let (lines, _) = run(&[cluster("east", 2, &["ops"])], OutputFormat::PrometheusText);
        assert_eq!(lines[0], "cluster_total{cluster=\"east\"} 2 1700000000");
        assert_eq!(
            lines[1],
            "namespace_entity_total{cluster=\"east\",namespace=\"ops\"} 0 1700000000"
        );
    }

    #[test]
    fn tags_reflect_state_when_each_line_is_formatted() {
        let mut a = cluster("a", 1, &["one", "two"]);
        a.namespaces[1].entity = EntityGauges {
            total: 9,
            ..EntityGauges::default()
        };
        let b = cluster("b", 5, &[]);
        let (lines, _) = run(&[a, b], OutputFormat::OpenTsdbLine);

        let per_ns = gauges::NAMESPACE_GAUGE_COUNT;
        assert_eq!(lines.len(), 1 + 2 * per_ns + 1);
        assert!(lines[1].ends_with("cluster=a namespace=one"));
        assert_eq!(
            lines[1 + per_ns],
            "namespace.entity.total 1700000000 9 cluster=a namespace=two"
        );
        // namespace tag from cluster "a" is still present
        assert_eq!(
            lines.last().unwrap(),
            "cluster.total 1700000000 5 cluster=b namespace=two"
        );
    }

    #[test]
    fn preexisting_tags_come_first() {
        let mut tags = TagSet::new();
        tags.set("sensu_backend_version", "6.9.1");
        tags.set("sensu_backend_url", "http://localhost:8080/graphql");
        let mut buffer = MetricBuffer::new(OutputFormat::OpenTsdbLine);
        walk(&[cluster("~", 3, &[])], &mut tags, &mut buffer, TS);

        assert_eq!(
            buffer.lines(),
            [
                "cluster.total 1700000000 3 sensu_backend_version=6.9.1 \
                 sensu_backend_url=http://localhost:8080/graphql cluster=local"
            ]
        );
    }

    #[test]
    fn error_only_cluster_is_skipped_and_reported() {
        let failed = Cluster {
            name: "remote".to_string(),
            total: None,
            namespaces: Vec::new(),
            error: Some(ClusterError {
                kind: ClusterErrorKind::Fetch,
                name: "remote".to_string(),
                message: "etcd timeout".to_string(),
            }),
        };
        let (lines, errors) = run(
            &[failed, cluster("~", 1, &[])],
            OutputFormat::OpenTsdbLine,
        );

        assert_eq!(lines, vec!["cluster.total 1700000000 1 cluster=local"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "etcd timeout");
    }

    #[test]
    fn walking_twice_is_byte_identical() {
        let clusters = [cluster("~", 4, &["default", "~"]), cluster("west", 0, &["ops"])];
        let first = run(&clusters, OutputFormat::PrometheusText).0;
        let second = run(&clusters, OutputFormat::PrometheusText).0;
        assert_eq!(first, second);
    }
}
