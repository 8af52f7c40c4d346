//! Prompt templates for each stage of a request

use crate::agent::Agent;
use crate::context::ProjectContext;
use crate::response::AgentResponse;
use crate::thought::Thought;
use crate::util::truncate_str;

/// Maximum context items rendered into a prompt.
const CONTEXT_ITEMS: usize = 8;

/// Upper bound on echoed content inside prompts, in bytes.
const MAX_ECHO_BYTES: usize = 4_000;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for an agent generating thoughts
    pub fn thought_system(agent: &Agent) -> String {
        let mut prompt = format!(
            r#"You are {}, a {} agent on a team of collaborating reasoning agents.
Focus on {}.
Propose distinct, self-contained lines of reasoning and rate your own confidence
in each from 0.0 to 1.0. Be concise."#,
            agent.name,
            agent.role,
            agent.role.focus()
        );
        if !agent.capabilities.is_empty() {
            prompt.push_str(&format!(
                "\nYour capabilities: {}.",
                agent.capabilities.join(", ")
            ));
        }
        prompt
    }

    /// User prompt requesting `count` candidate thoughts
    ///
    /// With a `parent`, the candidates must refine that thought rather than
    /// restart from the request.
    pub fn thought_prompt(
        user_input: &str,
        parent: Option<&Thought>,
        context: &ProjectContext,
        count: usize,
    ) -> String {
        let mut prompt = format!("Request:\n{}\n", user_input);

        if !context.is_empty() {
            prompt.push_str(&format!(
                "\nRelevant project context:\n{}\n",
                context.to_prompt_context(CONTEXT_ITEMS)
            ));
        }

        match parent {
            Some(parent) => prompt.push_str(&format!(
                r#"
Current line of reasoning (confidence {:.2}):
{}

Propose {} refinements that make this reasoning more complete or more correct."#,
                parent.confidence,
                truncate_str(&parent.content, MAX_ECHO_BYTES),
                count
            )),
            None => prompt.push_str(&format!(
                "\nPropose {} different approaches to this request.",
                count
            )),
        }

        prompt.push_str(
            r#"

Reply with a JSON array only:
[{"content": "...", "confidence": 0.0}]"#,
        );
        prompt
    }

    /// System prompt for response improvement
    pub fn optimization_system() -> &'static str {
        r#"You are an editor improving an answer produced by a team of agents.
Address every weakness named in the feedback while keeping what is already correct.
Do not pad the answer; clarity beats length."#
    }

    /// Feedback summarising what keeps a response below target
    pub fn optimization_feedback(response: &AgentResponse, quality: f64, target: f64) -> String {
        let mut feedback = format!(
            "Measured quality {:.2} is below the target of {:.2}.",
            quality, target
        );
        if quality < 0.5 {
            feedback.push_str(" The answer is weak: restate the core approach and justify it.");
        } else if quality < 0.75 {
            feedback.push_str(" Fill in missing details and address edge cases.");
        } else {
            feedback.push_str(" Tighten wording and resolve remaining ambiguity.");
        }
        if response.metadata.consensus_reached == Some(false) {
            feedback.push_str(" The agents did not fully agree; reconcile the open positions.");
        }
        if !response.alternatives.is_empty() {
            feedback.push_str(&format!(
                " Consider the {} alternative position(s) that were set aside.",
                response.alternatives.len()
            ));
        }
        feedback
    }

    /// User prompt asking for an improved response
    pub fn optimization_prompt(response: &AgentResponse, feedback: &str) -> String {
        format!(
            r#"Current answer (confidence {:.2}):
{}

Feedback:
{}

Reply with JSON only: {{"content": "...", "confidence": 0.0}}"#,
            response.confidence,
            truncate_str(&response.content, MAX_ECHO_BYTES),
            feedback
        )
    }

    /// User prompt asking for a numeric quality rating
    pub fn quality_rating_prompt(response: &AgentResponse) -> String {
        format!(
            r#"Rate the quality of the following answer for accuracy, completeness and clarity.

Answer:
{}

Reply with JSON only: {{"score": <number between 0.0 and 1.0>}}"#,
            truncate_str(&response.content, MAX_ECHO_BYTES)
        )
    }

    /// Prompt for a single direct answer when the team could not reason
    pub fn degraded_prompt(user_input: &str, reason: &str) -> String {
        format!(
            r#"The agent team could not process this request ({}).
Give a short, cautious best-effort answer and say what is uncertain.

Request:
{}"#,
            reason, user_input
        )
    }

    /// Static answer used when no AI call succeeds at all
    pub fn degraded_response(user_input: &str, reason: &str) -> String {
        format!(
            "The agent team is currently running in degraded mode ({}) and could not \
             produce a reasoned answer to \"{}\". Please retry later or rephrase the request.",
            reason,
            truncate_str(user_input, 200)
        )
    }
}
