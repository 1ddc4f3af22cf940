//! Parallel evaluation of request files.

use crate::config::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::report::Report;
use crate::request::{Context, Request};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok { report: Report },
    Error { kind: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Position of the request in the input file.
    pub index: usize,
    pub request: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl BatchEntry {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error { .. })
    }
}

/// Parse a list of requests. `.json` files are read as JSON, anything else as
/// YAML.
pub fn parse_requests(path: &Path, content: &str) -> CliResult<Vec<Request>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}

pub fn load_requests(path: &Path) -> CliResult<Vec<Request>> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_requests(path, &content)
}

/// Evaluate every request on the rayon pool. Output order matches input order.
pub fn run_batch(ctx: &Context, requests: &[Request]) -> Vec<BatchEntry> {
    tracing::info!(
        requests = requests.len(),
        provider = ctx.provider_name(),
        "evaluating batch"
    );
    requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| {
            let outcome = match ctx.evaluate(request) {
                Ok(report) => Outcome::Ok { report },
                Err(err) => {
                    tracing::debug!(index, error = %err, "batch entry failed");
                    Outcome::Error {
                        kind: err.kind(),
                        message: err.to_string(),
                    }
                }
            };
            BatchEntry {
                index,
                request: request.kind(),
                outcome,
            }
        })
        .collect()
}

pub fn render_batch(entries: &[BatchEntry], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(entries)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for entry in entries {
                let _ = writeln!(out, "[{}] {}", entry.index, entry.request);
                match &entry.outcome {
                    Outcome::Ok { report } => {
                        let _ = write!(out, "{report}");
                    }
                    Outcome::Error { kind, message } => {
                        let _ = writeln!(out, "  error ({kind}): {message}");
                    }
                }
            }
            let failed = entries.iter().filter(|e| e.is_error()).count();
            let _ = writeln!(out, "{} evaluated, {} failed", entries.len(), failed);
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    const BATCH_YAML: &str = r#"
- kind: pxy
  psat1: 80000
  psat2: 40000
- kind: rankine
  p_boiler: 10000
  t_boiler: 600
  p_condenser: 20000
- kind: brayton
  p1: 100000
  t1: 300
  p2: 1000000
  t3: 1200
- kind: refrigeration
  t_evap: 263.15
  t_cond: 313.15
"#;

    fn ctx() -> Context {
        Context::from_config(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn yaml_batch_keeps_input_order() {
        let requests = parse_requests(Path::new("jobs.yaml"), BATCH_YAML).unwrap();
        let entries = run_batch(&ctx(), &requests);
        let kinds: Vec<_> = entries.iter().map(|e| e.request).collect();
        assert_eq!(kinds, ["pxy", "rankine", "brayton", "refrigeration"]);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.index, i);
        }
    }

    #[test]
    fn failures_do_not_abort_the_batch() {
        let requests = parse_requests(Path::new("jobs.yaml"), BATCH_YAML).unwrap();
        let entries = run_batch(&ctx(), &requests);
        // Condenser pressure above boiler pressure.
        match &entries[1].outcome {
            Outcome::Error { kind, .. } => assert_eq!(*kind, "invalid_input"),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(!entries[0].is_error());
        assert!(!entries[2].is_error());
        assert!(!entries[3].is_error());

        let text = render_batch(&entries, OutputFormat::Text).unwrap();
        assert!(text.contains("4 evaluated, 1 failed"));
    }

    #[test]
    fn json_input_by_extension() {
        let json = r#"[{"kind": "vle", "temperature": 350, "psat1": 80000,
                        "psat2": 40000, "x1": 0.25, "wilson": [0.7, 1.1]}]"#;
        let requests = parse_requests(Path::new("jobs.JSON"), json).unwrap();
        assert_eq!(requests.len(), 1);

        let entries = run_batch(&ctx(), &requests);
        let rendered = render_batch(&entries, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value[0]["status"], "ok");
        assert_eq!(value[0]["report"]["report"], "vle");
    }
}
