//! JSON schema of the `plot` tool offered to language models.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{generate_positions, Axis, GridBox};

pub const PLOT_TOOL_NAME: &str = "plot";

pub const PLOT_TOOL_DESCRIPTION: &str = "Plot a point in a 3D grid.
+X = right; -X = left
+Y = up, top, high; -Y = down, bottom, low
+Z = front, forward, deep; -Z = back, backward, shallow
";

const POSE_JOINT_DESCRIPTION: &str = "Joint to move to the plotted point.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "claude")]
    Claude,
}

/// Per-axis property schemas. OpenAI strict mode only accepts enumerations,
/// so the grid values are listed; Claude gets a bounded numeric range.
pub fn tool_schema(provider: Provider, grid: &GridBox) -> Value {
    let mut properties = Map::new();
    for axis in Axis::ALL {
        let dimension = grid.size[axis.index()];
        let sections = grid.sections[axis.index()];
        let schema = match provider {
            Provider::OpenAi => {
                let values: Vec<f64> = generate_positions(dimension, sections)
                    .into_iter()
                    .map(f64::from)
                    .collect();
                json!({ "type": "number", "enum": values })
            }
            Provider::Claude => {
                let info = grid.axis_info(axis);
                json!({
                    "type": "number",
                    "minimum": f64::from(info.domain.0),
                    "maximum": f64::from(info.domain.1),
                    "multipleOf": f64::from(info.step),
                })
            }
        };
        properties.insert(axis.label().to_lowercase(), schema);
    }
    Value::Object(properties)
}

/// Complete tool definition in the shape each provider's API expects, for
/// plotting bare points.
pub fn tool_definition(provider: Provider, grid: &GridBox) -> Value {
    provider_definition(provider, parameters(provider, grid, None))
}

/// Tool definition for posing a skeleton: the point schema plus a required
/// `joint` property enumerating `joints`.
pub fn pose_tool_definition<S: AsRef<str>>(
    provider: Provider,
    grid: &GridBox,
    joints: &[S],
) -> Value {
    let names: Vec<&str> = joints.iter().map(|j| j.as_ref()).collect();
    provider_definition(provider, parameters(provider, grid, Some(names.as_slice())))
}

fn parameters(provider: Provider, grid: &GridBox, joints: Option<&[&str]>) -> Value {
    let mut properties = tool_schema(provider, grid);
    let mut required = vec!["x", "y", "z"];

    if let (Some(joints), Value::Object(map)) = (joints, &mut properties) {
        map.insert(
            "joint".to_owned(),
            json!({
                "type": "string",
                "description": POSE_JOINT_DESCRIPTION,
                "enum": joints,
            }),
        );
        required.push("joint");
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn provider_definition(provider: Provider, parameters: Value) -> Value {
    match provider {
        Provider::OpenAi => json!({
            "type": "function",
            "strict": true,
            "name": PLOT_TOOL_NAME,
            "description": PLOT_TOOL_DESCRIPTION,
            "parameters": parameters,
        }),
        Provider::Claude => json!({
            "name": PLOT_TOOL_NAME,
            "description": PLOT_TOOL_DESCRIPTION,
            "input_schema": parameters,
        }),
    }
}
