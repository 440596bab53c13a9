//! GraphQL documents sent to the Sensu backend.

pub const VERSION_QUERY: &str = "{ versions { backend { version } } }";

/// Forwarded to every cluster the backend federates with. Each entry
/// resolves to metrics, a `FetchErr`, or a `ForwardErr`.
pub const CLUSTER_METRICS_QUERY: &str = r#"{
  clusters: forward {
    ... on Query {
      name: clusterName
      metrics: clusterMetrics {
        ... on ClusterMetrics {
          namespaces {
            name
            eventGauges {
              total
              statusCritical
              statusWarning
              statusOther
              statusOK
              statePassing
              stateFailing
            }
            keepaliveGauges {
              total
              statusCritical
              statusWarning
              statusOther
              statusOK
              statePassing
              stateFailing
            }
            entityGauges {
              total
              agent
              proxy
              other
            }
          }
          clusterGauges {
            total
          }
        }
        ... on FetchErr {
          code
          message
        }
      }
    }
    ... on ForwardErr {
      errName: name
      errMsg: err
    }
  }
}"#;
