/// One gauge reading ready for formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    /// Dotted hierarchical name, e.g. `namespace.event.total`.
    pub name: String,
    pub tags: Vec<(String, String)>,
    pub value: i64,
    /// Unix seconds.
    pub timestamp: i64,
}

impl MetricSample {
    pub fn new(
        name: impl Into<String>,
        tags: Vec<(String, String)>,
        value: i64,
        timestamp: i64,
    ) -> Self {
        Self {
            name: name.into(),
            tags,
            value,
            timestamp,
        }
    }
}
