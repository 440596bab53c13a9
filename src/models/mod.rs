pub mod cluster;
pub mod sample;

pub use cluster::{
    Cluster, ClusterError, ClusterErrorKind, ClusterMetricsResponse, EntityGauges, EventGauges,
    KeepaliveGauges, Namespace, QueryResult, StateGauges, VersionResponse,
};
pub use sample::MetricSample;
