use std::fmt::{self, Write};

use super::memory::{InMemorySink, SeriesValue, DEFAULT_BUCKETS};
use super::names::MetricName;

/// Content type of the Prometheus text exposition format.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every series in the Prometheus text exposition format.
///
/// Metrics come out in [`MetricName::ALL`] order, each with its `# HELP`
/// and `# TYPE` lines; metrics without any series are left out.
pub fn render_text(sink: &InMemorySink) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_text(&mut out, sink);
    out
}

fn write_text(out: &mut String, sink: &InMemorySink) -> fmt::Result {
    let series = sink.sorted_series();

    for name in MetricName::ALL {
        let mut family = series.iter().filter(|(n, _, _)| *n == name).peekable();
        if family.peek().is_none() {
            continue;
        }

        let full = name.full_name();
        writeln!(out, "# HELP {} {}", full, name.help())?;
        writeln!(out, "# TYPE {} {}", full, name.kind().as_str())?;

        for (_, values, value) in family {
            let labels = label_pairs(name.label_names(), values);
            match value {
                SeriesValue::Counter { value } => {
                    writeln!(out, "{}{} {}", full, braced(&labels), value)?;
                }
                SeriesValue::Gauge { value } => {
                    writeln!(out, "{}{} {}", full, braced(&labels), float(*value))?;
                }
                SeriesValue::Histogram { count, sum, buckets } => {
                    for (bound, cumulative) in DEFAULT_BUCKETS.iter().zip(buckets) {
                        let le = with_le(&labels, &float(*bound));
                        writeln!(out, "{}_bucket{} {}", full, braced(&le), cumulative)?;
                    }
                    writeln!(out, "{}_bucket{} {}", full, braced(&with_le(&labels, "+Inf")), count)?;
                    writeln!(out, "{}_sum{} {}", full, braced(&labels), float(*sum))?;
                    writeln!(out, "{}_count{} {}", full, braced(&labels), count)?;
                }
            }
        }
    }

    Ok(())
}

/// `name="value"` pairs joined by commas, values escaped.
fn label_pairs(names: &[&str], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}=\"{}\"", name, escape(value)))
        .collect::<Vec<_>>()
        .join(",")
}

fn with_le(labels: &str, le: &str) -> String {
    if labels.is_empty() {
        format!("le=\"{}\"", le)
    } else {
        format!("{},le=\"{}\"", labels, le)
    }
}

fn braced(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", labels)
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
