use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;

/// "Move joint `joint` to `target`", the only input the solver side accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub joint: String,
    pub target: Vec3,
}

impl MoveRequest {
    pub fn new(joint: impl Into<String>, target: Vec3) -> Self {
        Self {
            joint: joint.into(),
            target,
        }
    }
}

/// Arguments of one `plot` tool call, in the model's coordinate frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotArgs {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub joint: Option<String>,
}

impl PlotArgs {
    /// Position in scene space; the model's +X is the scene's -X.
    pub fn scene_point(&self) -> Vec3 {
        Vec3::new(-self.x, self.y, self.z)
    }
}

/// A tool call as returned by either provider: Claude hands back the parsed
/// `input` object, OpenAI a JSON-encoded `arguments` string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ToolCall {
    Input { input: Value },
    Arguments { arguments: String },
}

impl ToolCall {
    pub fn plot_args(&self) -> Result<PlotArgs, RequestError> {
        let args = match self {
            ToolCall::Input { input } => PlotArgs::deserialize(input)?,
            ToolCall::Arguments { arguments } => serde_json::from_str(arguments)?,
        };
        Ok(args)
    }
}

/// Decodes a JSON array of tool calls into plot arguments, in order.
pub fn parse_tool_calls(json: &str) -> Result<Vec<PlotArgs>, RequestError> {
    let calls: Vec<ToolCall> = serde_json::from_str(json)?;
    calls.iter().map(ToolCall::plot_args).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_shape() {
        let json = r#"[{ "type": "tool_use", "name": "plot",
                         "input": { "x": 0.75, "y": 2, "z": -1.25, "joint": "head" } }]"#;
        let args = parse_tool_calls(json).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].joint.as_deref(), Some("head"));
        assert_eq!(args[0].scene_point(), Vec3::new(-0.75, 2.0, -1.25));
    }

    #[test]
    fn test_openai_shape() {
        let json = r#"[
            { "type": "function_call", "arguments": "{\"x\": -1.5, \"y\": 0, \"z\": 0}" },
            { "type": "function_call", "arguments": "{\"x\": 0, \"y\": 1, \"z\": 2.5}" }
        ]"#;
        let args = parse_tool_calls(json).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].scene_point(), Vec3::new(1.5, 0.0, 0.0));
        assert_eq!(args[1].joint, None);
    }

    #[test]
    fn test_malformed_calls() {
        assert!(matches!(
            parse_tool_calls(r#"[{ "arguments": "{\"x\": 1}" }]"#),
            Err(RequestError::ToolCall(_))
        ));
        assert!(matches!(
            parse_tool_calls(r#"[{ "name": "plot" }]"#),
            Err(RequestError::ToolCall(_))
        ));
        assert!(parse_tool_calls("not json").is_err());
    }
}
