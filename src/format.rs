use crate::models::MetricSample;

pub const OPENTSDB_LINE: &str = "opentsdb_line";
pub const PROMETHEUS_TEXT: &str = "prometheus_text";

/// Output line format, fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<name> <ts> <value> k=v k=v`
    #[default]
    OpenTsdbLine,
    /// `<name_with_underscores>{k="v",k="v"} <value> <ts>`
    PrometheusText,
}

impl OutputFormat {
    /// Unrecognized selectors fall back to OpenTSDB lines rather than failing.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            OPENTSDB_LINE => OutputFormat::OpenTsdbLine,
            PROMETHEUS_TEXT => OutputFormat::PrometheusText,
            other => {
                tracing::debug!("format: unknown output format '{other}', using {OPENTSDB_LINE}");
                OutputFormat::OpenTsdbLine
            }
        }
    }

    pub fn selector(self) -> &'static str {
        match self {
            OutputFormat::OpenTsdbLine => OPENTSDB_LINE,
            OutputFormat::PrometheusText => PROMETHEUS_TEXT,
        }
    }

    pub fn format(self, sample: &MetricSample) -> String {
        match self {
            OutputFormat::OpenTsdbLine => format_opentsdb(sample),
            OutputFormat::PrometheusText => format_prometheus(sample),
        }
    }
}

fn format_opentsdb(sample: &MetricSample) -> String {
    let mut line = format!("{} {} {}", sample.name, sample.timestamp, sample.value);
    for (k, v) in &sample.tags {
        line.push(' ');
        line.push_str(k);
        line.push('=');
        line.push_str(v);
    }
    line
}

fn format_prometheus(sample: &MetricSample) -> String {
    let name = sample.name.replace('.', "_");
    if sample.tags.is_empty() {
        return format!("{name} {} {}", sample.value, sample.timestamp);
    }
    let labels: Vec<String> = sample
        .tags
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect();
    format!(
        "{name}{{{}}} {} {}",
        labels.join(","),
        sample.value,
        sample.timestamp
    )
}

/// Text exposition escaping for label values: backslash, double quote, newline.
fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Formatted lines in generation order.
#[derive(Debug, Clone)]
pub struct MetricBuffer {
    format: OutputFormat,
    lines: Vec<String>,
}

impl MetricBuffer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: &MetricSample) {
        self.lines.push(self.format.format(sample));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_sample() -> MetricSample {
        MetricSample::new(
            "namespace.event.total",
            vec![
                ("cluster".to_string(), "local".to_string()),
                ("namespace".to_string(), "local".to_string()),
            ],
            5,
            1_700_000_000,
        )
    }

    #[test]
    fn opentsdb_line() {
        assert_eq!(
            OutputFormat::OpenTsdbLine.format(&local_sample()),
            "namespace.event.total 1700000000 5 cluster=local namespace=local"
        );
    }

    #[test]
    fn prometheus_text() {
        assert_eq!(
            OutputFormat::PrometheusText.format(&local_sample()),
            "namespace_event_total{cluster=\"local\",namespace=\"local\"} 5 1700000000"
        );
    }

    #[test]
    fn prometheus_without_tags_omits_label_block() {
        let sample = MetricSample::new("cluster.total", vec![], 3, 1_700_000_000);
        assert_eq!(
            OutputFormat::PrometheusText.format(&sample),
            "cluster_total 3 1700000000"
        );
    }

    #[test]
    fn opentsdb_without_tags_has_no_trailing_space() {
        let sample = MetricSample::new("cluster.total", vec![], 3, 1_700_000_000);
        assert_eq!(
            OutputFormat::OpenTsdbLine.format(&sample),
            "cluster.total 1700000000 3"
        );
    }

    #[test]
    fn tag_order_is_insertion_order() {
        let sample = MetricSample::new(
            "cluster.total",
            vec![
                ("zeta".to_string(), "1".to_string()),
                ("alpha".to_string(), "2".to_string()),
            ],
            0,
            1,
        );
        assert_eq!(
            OutputFormat::OpenTsdbLine.format(&sample),
            "cluster.total 1 0 zeta=1 alpha=2"
        );
    }

    #[test]
    fn prometheus_escapes_label_values() {
        let sample = MetricSample::new(
            "cluster.total",
            vec![("cluster".to_string(), "a\"b\\c\nd".to_string())],
            1,
            2,
        );
        assert_eq!(
            OutputFormat::PrometheusText.format(&sample),
            r#"cluster_total{cluster="a\"b\\c\nd"} 1 2"#
        );
    }

    #[test]
    fn negative_values_pass_through() {
        let sample = MetricSample::new("cluster.total", vec![], -4, 10);
        assert_eq!(OutputFormat::OpenTsdbLine.format(&sample), "cluster.total 10 -4");
    }

    #[test]
    fn selector_fallback() {
        assert_eq!(
            OutputFormat::from_selector("prometheus_text"),
            OutputFormat::PrometheusText
        );
        assert_eq!(
            OutputFormat::from_selector("opentsdb_line"),
            OutputFormat::OpenTsdbLine
        );
        assert_eq!(OutputFormat::from_selector("graphite"), OutputFormat::OpenTsdbLine);
        assert_eq!(OutputFormat::from_selector(""), OutputFormat::OpenTsdbLine);
        assert_eq!(
            OutputFormat::from_selector("Prometheus_Text"),
            OutputFormat::OpenTsdbLine
        );
    }

    #[test]
    fn buffer_keeps_generation_order() {
        let mut buf = MetricBuffer::new(OutputFormat::OpenTsdbLine);
        buf.push(&MetricSample::new("b", vec![], 2, 10));
        buf.push(&MetricSample::new("a", vec![], 1, 10));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.into_lines(), vec!["b 10 2", "a 10 1"]);
    }
}
