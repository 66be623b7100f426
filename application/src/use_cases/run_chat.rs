//! Run Chat use case.
//!
//! Executes one conversational turn: first completion, optional tool
//! dispatch, then a second completion narrating the tool result.
//!
//! Invariants: the user turn is committed to history before anything can
//! fail, and exactly one assistant turn is appended per user turn. Every
//! error in the pipeline is caught here and rendered as a visible
//! malfunction reply. Strictly sequential, no retries.

use crate::config::ChatParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use dogtalk_domain::{
    Conversation, Message, ToolCall, compose_direct_reply, compose_error_reply,
    compose_tool_reply, extract_tool_call, format_call_echo, format_tool_result,
    parse_arguments, prompt::build_system_prompt, util::truncate_str,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur inside a chat turn.
///
/// These never escape [`RunChatUseCase::execute`]; they are rendered into
/// the assistant's malfunction reply.
#[derive(Error, Debug)]
pub enum RunChatError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Use case for running one chat turn.
///
/// 1. Build message list: system prompt, trimmed history, user message
/// 2. First completion
/// 3. Extract tool call (none means the completion is the direct answer)
/// 4. Parse arguments (parse failure degrades to an empty mapping)
/// 5. Dispatch through the registry
/// 6. Append a synthetic TOOL_RESULT turn carrying the raw serialized
///    result and request the narration
/// 7. Assemble command echo, scan block, and narration into the reply
pub struct RunChatUseCase {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    params: ChatParams,
}

impl RunChatUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, tools: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            gateway,
            tools,
            params: ChatParams::default(),
        }
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    /// Execute one turn. The returned reply is exactly what gets appended
    /// to the conversation as the assistant turn.
    pub async fn execute(&self, user_text: &str, conversation: &mut Conversation) -> String {
        info!("Chat turn: {}", truncate_str(user_text, 100));
        conversation.push_user(user_text);

        let reply = match self.run_turn(conversation).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                compose_error_reply(&e.to_string())
            }
        };

        conversation.push_assistant(reply.clone());
        reply
    }

    async fn run_turn(&self, conversation: &Conversation) -> Result<String, RunChatError> {
        let system = Message::system(build_system_prompt(&self.tools.catalog()));

        let mut messages = vec![system];
        messages.extend_from_slice(conversation.recent(self.params.max_history_turns));

        let first = self.gateway.complete(&messages).await?;

        let Some(call) = extract_tool_call(&first) else {
            debug!("No tool call in response; answering directly");
            return Ok(compose_direct_reply(first.trim()));
        };

        debug!(
            "Extracted tool call '{}' ({:?} confidence)",
            call.tool_name, call.confidence
        );

        let args = match parse_arguments(&call.raw_arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(
                    "Argument parse failed for '{}': {}; dispatching with no arguments",
                    call.tool_name, e
                );
                BTreeMap::new()
            }
        };

        let echo = format_call_echo(&call.tool_name, &args);
        let tool_call = ToolCall::from_args(&call.tool_name, &args);
        let result = self.tools.execute(&tool_call).await;
        if !result.is_success() {
            warn!(
                "Tool '{}' reported failure: {}",
                call.tool_name,
                result.error().unwrap_or("unknown")
            );
        }

        let scan = format_tool_result(&result);
        // The narration turn gets the raw result, diagnostic fields included;
        // the formatted scan is only for the operator-visible block.
        let raw = serde_json::to_string(&result).unwrap_or_else(|_| scan.clone());

        messages.push(Message::assistant(first));
        messages.push(Message::user(format!(
            "TOOL_RESULT: {}\n\nSummarize this result for the operator.",
            raw
        )));

        let narration = self.gateway.complete(&messages).await?;

        Ok(compose_tool_reply(&echo, &scan, narration.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dogtalk_domain::{Role, ToolResult};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        seen_message_counts: Mutex<Vec<usize>>,
        seen_last_contents: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                seen_message_counts: Mutex::new(Vec::new()),
                seen_last_contents: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
            self.seen_message_counts.lock().unwrap().push(messages.len());
            if let Some(last) = messages.last() {
                self.seen_last_contents.lock().unwrap().push(last.content.clone());
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GatewayError::RequestFailed("no more responses".to_string())))
        }
    }

    struct MockExecutor {
        result: ToolResult,
        calls: Mutex<Vec<ToolCall>>,
    }

    impl MockExecutor {
        fn new(result: ToolResult) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockExecutor {
        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.calls.lock().unwrap().push(call.clone());
            self.result.clone()
        }

        fn catalog(&self) -> String {
            "# Available tools\n\n### get_monitors\nFetch monitors.\n".to_string()
        }

        fn tool_names(&self) -> Vec<String> {
            vec!["get_monitors".to_string()]
        }
    }

    fn use_case(gateway: MockGateway, executor: MockExecutor) -> (RunChatUseCase, Arc<MockExecutor>) {
        let executor = Arc::new(executor);
        let uc = RunChatUseCase::new(Arc::new(gateway), executor.clone());
        (uc, executor)
    }

    fn monitor_result() -> ToolResult {
        ToolResult::success(
            "get_monitors",
            serde_json::json!([{"name": "High CPU", "status": "Alert", "priority": "P1"}]),
        )
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn direct_answer_when_no_tool_call() {
        let gateway = MockGateway::new(vec![Ok("All readings nominal.".to_string())]);
        let (uc, executor) = use_case(gateway, MockExecutor::new(monitor_result()));
        let mut conv = Conversation::new();

        let reply = uc.execute("how are things?", &mut conv).await;

        assert_eq!(reply, "[transmission] All readings nominal.");
        assert!(executor.calls.lock().unwrap().is_empty());
        // user turn first, exactly one assistant turn
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].role, Role::User);
        assert_eq!(conv.messages()[1].role, Role::Assistant);
        assert_eq!(conv.messages()[1].content, reply);
    }

    #[tokio::test]
    async fn tool_path_dispatches_parsed_arguments() {
        let gateway = MockGateway::new(vec![
            Ok("TOOL_CALL: get_monitors(group_states=\"alert\", limit=5)".to_string()),
            Ok("One monitor is screaming.".to_string()),
        ]);
        let (uc, executor) = use_case(gateway, MockExecutor::new(monitor_result()));
        let mut conv = Conversation::new();

        let reply = uc.execute("anything alerting?", &mut conv).await;

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "get_monitors");
        assert_eq!(calls[0].get_string("group_states"), Some("alert"));
        assert_eq!(calls[0].get_i64("limit"), Some(5));

        assert!(reply.starts_with("[engaged] get_monitors(group_states=\"alert\", limit=5)"));
        assert!(reply.contains("1. High CPU [Alert] (P1)"));
        assert!(reply.contains("One monitor is screaming."));
        assert_eq!(conv.len(), 2);
    }

    #[tokio::test]
    async fn second_turn_carries_the_tool_result() {
        let gateway = MockGateway::new(vec![
            Ok("TOOL_CALL: get_monitors()".to_string()),
            Ok("narration".to_string()),
        ]);
        let executor = Arc::new(MockExecutor::new(monitor_result()));
        let gateway = Arc::new(gateway);
        let uc = RunChatUseCase::new(gateway.clone(), executor);
        let mut conv = Conversation::new();

        uc.execute("check monitors", &mut conv).await;

        let last_contents = gateway.seen_last_contents.lock().unwrap();
        assert_eq!(last_contents.len(), 2);
        assert!(last_contents[1].starts_with("TOOL_RESULT: "));
        assert!(last_contents[1].contains("High CPU"));
    }

    #[tokio::test]
    async fn narration_turn_carries_diagnostic_extras() {
        let gateway = MockGateway::new(vec![
            Ok("TOOL_CALL: get_monitors()".to_string()),
            Ok("narration".to_string()),
        ]);
        let result = monitor_result().with_extra("total_monitors", serde_json::json!(250));
        let executor = Arc::new(MockExecutor::new(result));
        let gateway = Arc::new(gateway);
        let uc = RunChatUseCase::new(gateway.clone(), executor);
        let mut conv = Conversation::new();

        let reply = uc.execute("check monitors", &mut conv).await;

        let last_contents = gateway.seen_last_contents.lock().unwrap();
        assert!(last_contents[1].contains("\"total_monitors\":250"));
        assert!(last_contents[1].contains("\"success\":true"));
        // extras stay out of the operator-visible scan block
        assert!(!reply.contains("total_monitors"));
    }

    #[tokio::test]
    async fn unparseable_arguments_degrade_to_empty_mapping() {
        let gateway = MockGateway::new(vec![
            Ok("TOOL_CALL: get_monitors(limit=\"unclosed)".to_string()),
            Ok("done".to_string()),
        ]);
        let (uc, executor) = use_case(gateway, MockExecutor::new(monitor_result()));
        let mut conv = Conversation::new();

        let reply = uc.execute("check", &mut conv).await;

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "tool still dispatched after parse failure");
        assert!(calls[0].arguments.is_empty());
        assert!(reply.starts_with("[engaged] get_monitors()"));
    }

    #[tokio::test]
    async fn tool_failure_is_narrated_not_fatal() {
        let gateway = MockGateway::new(vec![
            Ok("TOOL_CALL: get_monitors()".to_string()),
            Ok("Scan failed, operator.".to_string()),
        ]);
        let failure = ToolResult::failure("get_monitors", "Unknown tool 'get_monitors'");
        let (uc, _) = use_case(gateway, MockExecutor::new(failure));
        let mut conv = Conversation::new();

        let reply = uc.execute("check", &mut conv).await;

        assert!(reply.starts_with("[engaged]"));
        assert!(reply.contains("Error: Unknown tool 'get_monitors'"));
        assert_eq!(conv.len(), 2);
    }

    #[tokio::test]
    async fn gateway_error_on_first_turn_becomes_malfunction_reply() {
        let gateway = MockGateway::new(vec![Err(GatewayError::ConnectionError(
            "connrefused".to_string(),
        ))]);
        let (uc, executor) = use_case(gateway, MockExecutor::new(monitor_result()));
        let mut conv = Conversation::new();

        let reply = uc.execute("hello?", &mut conv).await;

        assert!(reply.starts_with("[malfunction]"));
        assert!(reply.contains("connrefused"));
        assert!(executor.calls.lock().unwrap().is_empty());
        // user committed first, exactly one assistant turn appended
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].role, Role::User);
        assert_eq!(conv.messages()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn gateway_error_on_narration_turn_becomes_malfunction_reply() {
        let gateway = MockGateway::new(vec![
            Ok("TOOL_CALL: get_monitors()".to_string()),
            Err(GatewayError::RequestFailed("500".to_string())),
        ]);
        let (uc, executor) = use_case(gateway, MockExecutor::new(monitor_result()));
        let mut conv = Conversation::new();

        let reply = uc.execute("check", &mut conv).await;

        assert!(reply.starts_with("[malfunction]"));
        assert_eq!(executor.calls.lock().unwrap().len(), 1);
        assert_eq!(conv.len(), 2);
    }

    #[tokio::test]
    async fn history_is_front_truncated_to_max_turns() {
        let mut responses = Vec::new();
        for i in 0..6 {
            responses.push(Ok(format!("answer {}", i)));
        }
        let gateway = Arc::new(MockGateway::new(responses));
        let executor = Arc::new(MockExecutor::new(monitor_result()));
        let uc = RunChatUseCase::new(gateway.clone(), executor)
            .with_params(ChatParams::default().with_max_history_turns(4));
        let mut conv = Conversation::new();

        for i in 0..6 {
            uc.execute(&format!("question {}", i), &mut conv).await;
        }

        let counts = gateway.seen_message_counts.lock().unwrap();
        // system + min(history including current user turn, 4)
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 4);
        assert_eq!(*counts.last().unwrap(), 5);
        assert!(counts.iter().all(|&c| c <= 5));
    }
}
