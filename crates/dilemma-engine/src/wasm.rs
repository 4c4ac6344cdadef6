//! WASM bindings for browser front ends

#![cfg(feature = "wasm")]

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    generate_feedback, run_match, Choice, MatchConfig, MatchState, Rejection, Round, StrategyKind,
};

fn parse_choice(choice: &str) -> Result<Choice, JsError> {
    match choice {
        "C" | "c" => Ok(Choice::Cooperate),
        "T" | "t" | "D" | "d" => Ok(Choice::Defect),
        _ => Err(JsError::new(&format!("Unknown choice: {}", choice))),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Result of a state machine request.
///
/// Rejections are data, not exceptions: `{applied: false, reason: "..."}`.
#[derive(Serialize)]
struct TransitionResult {
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    round: Option<Round>,
}

impl TransitionResult {
    fn from_result<T>(result: Result<T, Rejection>, round: impl FnOnce(T) -> Option<Round>) -> Self {
        match result {
            Ok(value) => Self { applied: true, reason: None, round: round(value) },
            Err(rejection) => Self {
                applied: false,
                reason: Some(rejection.to_string()),
                round: None,
            },
        }
    }
}

/// One live match, owned by the page
#[wasm_bindgen]
pub struct WasmMatch {
    state: MatchState,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Start a match from a JSON `MatchConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmMatch, JsError> {
        let config = MatchConfig::from_json(config_json)
            .map_err(|e| JsError::new(&format!("Invalid configuration: {}", e)))?;
        let state = MatchState::new(config)
            .map_err(|e| JsError::new(&format!("Invalid configuration: {}", e)))?;
        Ok(WasmMatch { state })
    }

    /// Submit a human choice ("C" or "T") for the participant with this id
    pub fn submit_choice(&mut self, participant_id: &str, choice: &str) -> Result<JsValue, JsError> {
        let choice = parse_choice(choice)?;
        let result = self.state.submit_choice_for(participant_id, choice);
        to_js(&TransitionResult::from_result(result, |_| None))
    }

    pub fn reveal(&mut self) -> Result<JsValue, JsError> {
        let result = self.state.reveal();
        to_js(&TransitionResult::from_result(result, Some))
    }

    pub fn advance(&mut self) -> Result<JsValue, JsError> {
        let result = self.state.advance();
        to_js(&TransitionResult::from_result(result, |_| None))
    }

    pub fn autoplay_tick(&mut self) -> Result<JsValue, JsError> {
        let result = self.state.autoplay_tick();
        to_js(&TransitionResult::from_result(result, Some))
    }

    pub fn set_autoplay(&mut self, enabled: bool) -> Result<JsValue, JsError> {
        let result = self.state.set_autoplay(enabled);
        to_js(&TransitionResult::from_result(result, |_| None))
    }

    pub fn set_autoplay_delay(&mut self, delay_ms: u32) -> Result<JsValue, JsError> {
        let result = self.state.set_autoplay_delay(delay_ms as u64);
        to_js(&TransitionResult::from_result(result, |_| None))
    }

    /// Read-only view of the whole match state
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.state)
    }

    /// Metrics, standings and commentary for the match so far
    pub fn feedback(&self) -> Result<JsValue, JsError> {
        to_js(&generate_feedback(&self.state))
    }
}

/// Replay a bot-vs-bot match with full round-by-round details
///
/// # Returns
/// `{state, feedback}` for the finished match
#[wasm_bindgen]
pub fn replay_match(config_json: &str) -> Result<JsValue, JsError> {
    #[derive(Serialize)]
    struct Replay<'a> {
        state: &'a MatchState,
        feedback: crate::Feedback,
    }

    let config = MatchConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid configuration: {}", e)))?;
    let state = run_match(config).map_err(|e| JsError::new(&e.to_string()))?;
    let feedback = generate_feedback(&state);

    to_js(&Replay { state: &state, feedback })
}

#[derive(Serialize)]
struct StrategyInfo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

/// Get all available strategies in catalogue order
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types: Vec<StrategyInfo> = StrategyKind::ALL
        .into_iter()
        .map(|kind| StrategyInfo {
            id: kind.as_str(),
            name: kind.display_name(),
            description: kind.description(),
        })
        .collect();

    to_js(&types)
}

/// Strategy tags only, as a plain JS array
#[wasm_bindgen]
pub fn get_strategy_tags() -> js_sys::Array {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| JsValue::from_str(kind.as_str()))
        .collect()
}

/// Default configuration as JSON, for pre-filling forms
#[wasm_bindgen]
pub fn default_config() -> Result<String, JsError> {
    serde_json::to_string(&MatchConfig::default())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
