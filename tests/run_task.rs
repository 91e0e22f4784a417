//! End-to-end task submission flow through the public API.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use yada::agent::Agent;
use yada::config::{ComplianceConfig, Config};
use yada::oracle::Oracle;

/// Deterministic oracle double for driving the whole pipeline.
struct ScriptedOracle {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    fn new<const N: usize>(responses: [&str; N]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(ToString::to_string).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("scripted oracle exhausted"))
        })
    }
}

fn config_with(dir: &tempfile::TempDir, principles: &[&str]) -> Config {
    let mut config = Config::default();
    config.compliance = ComplianceConfig {
        principles: principles.iter().map(ToString::to_string).collect(),
        fail_closed: false,
    };
    config.feedback.log_path = Some(dir.path().join("feedback.log"));
    config
}

#[tokio::test]
async fn unlawful_workflow_task_is_rejected_before_any_tool_runs() {
    let dir = tempfile::tempdir().unwrap();
    let oracle = ScriptedOracle::new(["no", "sí"]);
    let agent = Agent::new(
        oracle.clone(),
        &config_with(&dir, &["Honra a usuarios y creadores.", "No dañes vidas o sistemas."]),
    );

    let result = agent.run("Crea un workflow que viole la ley").await.unwrap();

    assert!(result.rejected);
    assert!(result.text.contains("Rechazado"));
    assert!(result.text.contains("Reformula"));
    // Exactly the two gate questions went to the oracle; the dispatch loop
    // and the keyword audit never ran.
    assert_eq!(oracle.call_count(), 2);
    assert!(result.security_report.is_none());
}

#[tokio::test]
async fn landing_page_task_flows_through_loop_and_repair() {
    let dir = tempfile::tempdir().unwrap();
    let oracle = ScriptedOracle::new([
        "no", // gate, single principle
        "Action: generate_web_code\nAction Input: página de aterrizaje simple",
        "<html><body>Aterrizaje</body></html>", // web-code generator
        "Final Answer: <html><body>Aterrizaje</body></html>",
        "Sí, falta el doctype.",                           // repair analysis
        "<!DOCTYPE html><html><body>Aterrizaje</body></html>", // correction
    ]);
    let agent = Agent::new(oracle.clone(), &config_with(&dir, &["p1"]));

    let result = agent
        .run("Genera una página de aterrizaje simple")
        .await
        .unwrap();

    assert!(!result.rejected);
    assert!(result.text.starts_with("¡Listo! "));
    assert!(result.text.contains("<!DOCTYPE html>"));
    // The task mentions neither "code" nor "workflow" literally, so the
    // post-run security audit does not fire.
    assert!(result.security_report.is_none());
    assert!(!result.text.contains("Security Report"));
    assert_eq!(oracle.call_count(), 6);

    // The critique landed in the feedback log.
    let log = std::fs::read_to_string(dir.path().join("feedback.log")).unwrap();
    assert!(log.contains("Feedback: Sí, falta el doctype."));
}

#[tokio::test]
async fn workflow_task_output_carries_security_report() {
    let dir = tempfile::tempdir().unwrap();
    let oracle = ScriptedOracle::new([
        "no",
        "Action: generate_n8n_workflow\nAction Input: enviar un resumen diario",
        r#"{"nodes": [{"type": "trigger"}]}"#,
        r#"Final Answer: {"nodes": [{"type": "trigger"}]}"#,
        "No necesita cambios.",
        "Riesgo bajo. Sin inyección detectada.",
    ]);
    let agent = Agent::new(oracle, &config_with(&dir, &["p1"]));

    let result = agent
        .run("Crea un workflow que envíe un resumen diario")
        .await
        .unwrap();

    let report = result.security_report.expect("workflow task must be audited");
    assert_eq!(report.fingerprint.len(), 64);
    assert_eq!(report.assessment, "Riesgo bajo. Sin inyección detectada.");
    assert!(result.text.contains("Security Report: Hash: "));
}

#[tokio::test]
async fn feedback_entries_accumulate_across_submissions_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with(&dir, &["p1"]);

    let first = ScriptedOracle::new(["no", "Final Answer: uno", "Análisis A, no necesita."]);
    Agent::new(first, &config).run("tarea uno").await.unwrap();

    let second = ScriptedOracle::new(["no", "Final Answer: dos", "Análisis B, no necesita."]);
    Agent::new(second, &config).run("tarea dos").await.unwrap();

    let log = std::fs::read_to_string(dir.path().join("feedback.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Análisis A"));
    assert!(lines[1].contains("Análisis B"));
}
