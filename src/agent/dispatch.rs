use crate::oracle::Oracle;
use crate::tools::{ToolRegistry, ToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Constants ────────────────────────────────────────────────────────────────

/// Absolute upper bound on dispatch-loop iterations, regardless of config.
pub(crate) const DISPATCH_HARD_CAP: u32 = 25;

/// Reasoning-protocol preamble. The oracle answers with either an action
/// (tool name + input) or a final answer; observations are fed back on the
/// next turn.
const PROTOCOL_PREAMBLE: &str = "\
Eres un agente que resuelve tareas usando herramientas.

Responde SIEMPRE en uno de estos dos formatos:

Action: <nombre de herramienta>
Action Input: <entrada para la herramienta>

o bien, cuando la tarea esté resuelta:

Final Answer: <respuesta final>

Herramientas disponibles:
";

// ── Public types ─────────────────────────────────────────────────────────────

/// Record of a single tool invocation within the loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub input: String,
    pub result: ToolResult,
    pub iteration: u32,
}

/// Why the dispatch loop terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The oracle produced a final answer rather than a further tool selection.
    Completed,
    /// The configured iteration limit was reached; the result is partial.
    MaxIterations,
}

/// Final output of a [`DispatchLoop::run`] invocation.
#[derive(Debug)]
pub struct DispatchResult {
    pub final_text: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub iterations: u32,
    pub stop_reason: StopReason,
}

// ── Internal types ───────────────────────────────────────────────────────────

/// One parsed oracle turn.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Final(String),
    Action { tool: String, input: String },
}

// ── Implementation ───────────────────────────────────────────────────────────

/// Goal-directed tool-selection loop.
///
/// The oracle, given the task and the tool descriptions, iteratively chooses
/// a tool, observes its result, and decides whether to continue or finish.
/// Tool failures come back as observations; only an oracle failure aborts
/// the run.
pub struct DispatchLoop {
    registry: Arc<ToolRegistry>,
    max_iterations: u32,
}

impl DispatchLoop {
    pub fn new(registry: Arc<ToolRegistry>, max_iterations: u32) -> Self {
        Self {
            registry,
            max_iterations: max_iterations.min(DISPATCH_HARD_CAP),
        }
    }

    pub async fn run(&self, oracle: &dyn Oracle, task: &str) -> anyhow::Result<DispatchResult> {
        let preamble = format!("{PROTOCOL_PREAMBLE}{}\n", self.registry.describe());
        let mut transcript = format!("Tarea: {task}\n");
        let mut tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut iteration = 0u32;

        loop {
            if iteration >= self.max_iterations {
                tracing::warn!(iterations = iteration, "dispatch loop hit iteration limit");
                return Ok(DispatchResult {
                    final_text: partial_text(&tool_calls, task),
                    tool_calls,
                    iterations: iteration,
                    stop_reason: StopReason::MaxIterations,
                });
            }

            let prompt = format!("{preamble}\n{transcript}");
            let completion = oracle.complete(&prompt).await?;
            iteration += 1;

            match parse_step(&completion) {
                Step::Final(answer) => {
                    tracing::debug!(iterations = iteration, "dispatch loop completed");
                    return Ok(DispatchResult {
                        final_text: answer,
                        tool_calls,
                        iterations: iteration,
                        stop_reason: StopReason::Completed,
                    });
                }
                Step::Action { tool, input } => {
                    let result = self.registry.execute(&tool, &input).await;
                    let observation = result.observation();

                    transcript.push_str(&format!(
                        "Action: {tool}\nAction Input: {input}\nObservation: {observation}\n"
                    ));
                    tool_calls.push(ToolCallRecord {
                        tool_name: tool,
                        input,
                        result,
                        iteration,
                    });
                }
            }
        }
    }
}

// ── Free functions ───────────────────────────────────────────────────────────

/// Parse one oracle completion into a [`Step`].
///
/// A completion with no recognizable action marker is taken as a final
/// answer: models frequently skip the protocol on the closing turn.
fn parse_step(completion: &str) -> Step {
    if let Some(answer) = marker_suffix(completion, "Final Answer:") {
        return Step::Final(answer);
    }

    let tool = completion
        .lines()
        .find_map(|line| line.trim().strip_prefix("Action:"))
        .map(|rest| rest.trim().to_string());

    if let Some(tool) = tool.filter(|t| !t.is_empty()) {
        let input = marker_suffix(completion, "Action Input:").unwrap_or_default();
        return Step::Action { tool, input };
    }

    Step::Final(completion.trim().to_string())
}

/// Everything after the first occurrence of `marker`, trimmed.
fn marker_suffix(text: &str, marker: &str) -> Option<String> {
    text.find(marker)
        .map(|pos| text[pos + marker.len()..].trim().to_string())
}

/// Partial-result policy for a hit iteration bound: the last observation if
/// any tool ran, otherwise an explicit notice.
fn partial_text(tool_calls: &[ToolCallRecord], task: &str) -> String {
    match tool_calls.last() {
        Some(record) => record.result.observation(),
        None => format!("Sin respuesta final para: {task}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::testing::ScriptedOracle;
    use crate::tools::traits::Tool;
    use std::future::Future;
    use std::pin::Pin;

    struct UpperTool;

    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Convierte texto a mayúsculas"
        }

        fn execute<'a>(
            &'a self,
            input: &'a str,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
            Box::pin(async move { Ok(ToolResult::ok(input.to_uppercase())) })
        }
    }

    fn registry_with_upper() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(UpperTool));
        Arc::new(registry)
    }

    #[test]
    fn dispatch_loop_caps_max_iterations() {
        let dl = DispatchLoop::new(Arc::new(ToolRegistry::new()), 100);
        assert_eq!(dl.max_iterations, DISPATCH_HARD_CAP);
    }

    #[test]
    fn dispatch_loop_respects_lower_limit() {
        let dl = DispatchLoop::new(Arc::new(ToolRegistry::new()), 5);
        assert_eq!(dl.max_iterations, 5);
    }

    #[test]
    fn parse_step_final_answer() {
        let step = parse_step("Final Answer: todo hecho");
        assert_eq!(step, Step::Final("todo hecho".to_string()));
    }

    #[test]
    fn parse_step_action_with_input() {
        let step = parse_step("Thought: necesito la herramienta\nAction: upper\nAction Input: hola");
        assert_eq!(
            step,
            Step::Action {
                tool: "upper".to_string(),
                input: "hola".to_string(),
            }
        );
    }

    #[test]
    fn parse_step_action_without_input() {
        let step = parse_step("Action: upper");
        assert_eq!(
            step,
            Step::Action {
                tool: "upper".to_string(),
                input: String::new(),
            }
        );
    }

    #[test]
    fn parse_step_multiline_action_input() {
        let step = parse_step("Action: upper\nAction Input: línea 1\nlínea 2");
        let Step::Action { input, .. } = step else {
            panic!("expected action");
        };
        assert_eq!(input, "línea 1\nlínea 2");
    }

    #[test]
    fn parse_step_unstructured_completion_is_final() {
        let step = parse_step("Aquí tienes el resultado que pediste.");
        assert_eq!(
            step,
            Step::Final("Aquí tienes el resultado que pediste.".to_string())
        );
    }

    #[test]
    fn parse_step_final_answer_wins_over_action() {
        // Some models echo the whole protocol; the final answer ends the run.
        let step = parse_step("Action: upper\nAction Input: x\nFinal Answer: listo");
        assert_eq!(step, Step::Final("listo".to_string()));
    }

    #[tokio::test]
    async fn loop_runs_tool_then_finishes() {
        let oracle = ScriptedOracle::new([
            "Action: upper\nAction Input: hola mundo",
            "Final Answer: HOLA MUNDO entregado",
        ]);
        let dl = DispatchLoop::new(registry_with_upper(), 8);

        let result = dl.run(&oracle, "sube el texto").await.unwrap();
        assert_eq!(result.stop_reason, StopReason::Completed);
        assert_eq!(result.final_text, "HOLA MUNDO entregado");
        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].tool_name, "upper");
        assert_eq!(result.tool_calls[0].result.output, "HOLA MUNDO");
        assert_eq!(result.iterations, 2);
    }

    #[tokio::test]
    async fn observation_is_fed_back_to_oracle() {
        let oracle = ScriptedOracle::new([
            "Action: upper\nAction Input: hola",
            "Final Answer: listo",
        ]);
        let dl = DispatchLoop::new(registry_with_upper(), 8);
        dl.run(&oracle, "tarea").await.unwrap();

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("Observation: HOLA"));
        // Tool descriptions are present on every turn.
        assert!(prompts[1].contains("- upper: Convierte texto a mayúsculas"));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_observation_and_loop_continues() {
        let oracle = ScriptedOracle::new([
            "Action: no_such_tool\nAction Input: x",
            "Final Answer: me recupero",
        ]);
        let dl = DispatchLoop::new(registry_with_upper(), 8);

        let result = dl.run(&oracle, "tarea").await.unwrap();
        assert_eq!(result.stop_reason, StopReason::Completed);
        assert!(!result.tool_calls[0].result.success);

        let prompts = oracle.prompts.lock().unwrap();
        assert!(prompts[1].contains("[ERROR] Tool not found: no_such_tool"));
    }

    #[tokio::test]
    async fn iteration_bound_returns_partial_result() {
        // The oracle never finishes; the loop must stop at the bound and
        // surface the last observation.
        let oracle = ScriptedOracle::new([
            "Action: upper\nAction Input: uno",
            "Action: upper\nAction Input: dos",
            "Action: upper\nAction Input: tres",
        ]);
        let dl = DispatchLoop::new(registry_with_upper(), 3);

        let result = dl.run(&oracle, "tarea sin fin").await.unwrap();
        assert_eq!(result.stop_reason, StopReason::MaxIterations);
        assert_eq!(result.iterations, 3);
        assert_eq!(result.tool_calls.len(), 3);
        assert_eq!(result.final_text, "TRES");
    }

    #[tokio::test]
    async fn iteration_bound_with_no_tool_calls() {
        let oracle = ScriptedOracle::new(Vec::<String>::new());
        let dl = DispatchLoop::new(registry_with_upper(), 0);
        // max_iterations 0 is rejected by config validation; constructing the
        // loop directly with 0 still terminates immediately with a notice.
        let result = dl.run(&oracle, "tarea").await.unwrap();
        assert_eq!(result.stop_reason, StopReason::MaxIterations);
        assert!(result.final_text.contains("Sin respuesta final"));
    }

    #[tokio::test]
    async fn oracle_failure_is_fatal() {
        let oracle = ScriptedOracle::new(Vec::<String>::new());
        let dl = DispatchLoop::new(registry_with_upper(), 8);
        assert!(dl.run(&oracle, "tarea").await.is_err());
    }
}
