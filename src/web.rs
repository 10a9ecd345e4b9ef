//! WASM entry point - a draggable humanoid driven from JavaScript

use crate::grid::{GridBox, Provider};
use crate::ik::Skeleton;
use crate::interaction::{DragController, MoveRequest, PlotSession, PoseSession};
use crate::render::Camera;
use glam::Vec3;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn provider(name: &str) -> Result<Provider, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_owned())).map_err(js_error)
}

#[wasm_bindgen]
pub struct WebRagdoll {
    session: PoseSession,
    controller: DragController,
}

#[wasm_bindgen]
impl WebRagdoll {
    #[wasm_bindgen(constructor)]
    pub fn new(aspect: f32) -> Result<WebRagdoll, JsValue> {
        let skeleton = Skeleton::humanoid().map_err(js_error)?;
        let session = PoseSession::new(Arc::new(skeleton)).with_grid(GridBox::default());

        let mut camera = Camera::default();
        camera.set_aspect(aspect);

        log::info!("ragdoll ready: {} joints", session.skeleton().joint_count());

        Ok(Self {
            session,
            controller: DragController::new(camera),
        })
    }

    /// Loads a skeleton definition in place of the humanoid.
    pub fn from_definition(json: &str, aspect: f32) -> Result<WebRagdoll, JsValue> {
        let def = crate::ik::SkeletonDefinition::from_json_str(json).map_err(js_error)?;
        let skeleton = Skeleton::from_definition(&def).map_err(js_error)?;
        let mut camera = Camera::default();
        camera.set_aspect(aspect);
        Ok(Self {
            session: PoseSession::new(Arc::new(skeleton)),
            controller: DragController::new(camera),
        })
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.controller.camera.set_aspect(aspect);
    }

    pub fn move_joint(&mut self, name: &str, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        self.session
            .move_joint(&MoveRequest::new(name, Vec3::new(x, y, z)))
            .map_err(js_error)?;
        Ok(())
    }

    pub fn begin_drag(&mut self, name: &str) -> Result<(), JsValue> {
        self.session.begin_drag(name).map_err(js_error)?;
        Ok(())
    }

    /// Pointer position in normalized device coordinates.
    pub fn drag_to(&mut self, ndc_x: f32, ndc_y: f32) -> Result<bool, JsValue> {
        let moved = self
            .session
            .drag_to(&self.controller, ndc_x, ndc_y)
            .map_err(js_error)?;
        Ok(moved.is_some())
    }

    pub fn end_drag(&mut self) {
        self.session.end_drag();
    }

    pub fn is_dragging(&self) -> bool {
        self.session.drag().is_dragging()
    }

    /// Flat `[x, y, z, x, y, z, ...]` in joint order.
    pub fn positions(&self) -> Vec<f32> {
        self.session
            .pose()
            .positions()
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }

    pub fn joint_names(&self) -> Vec<String> {
        self.session.skeleton().topology().names().to_vec()
    }

    pub fn pose_json(&self) -> Result<String, JsValue> {
        let named = self.session.skeleton().named_pose(self.session.pose());
        serde_json::to_string(&named).map_err(js_error)
    }

    pub fn apply_tool_calls(&mut self, json: &str) -> Result<(), JsValue> {
        self.session.apply_tool_calls(json).map_err(js_error)?;
        Ok(())
    }

    /// JSON `plot` tool definition for `"openai"` or `"claude"`.
    pub fn tool_definition(&self, provider_name: &str) -> Result<String, JsValue> {
        Ok(self.session.tool_definition(provider(provider_name)?).to_string())
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}

/// Free point set redrawn by tool calls, starting from the stick figure.
#[wasm_bindgen]
pub struct WebPlot {
    session: PlotSession,
}

#[wasm_bindgen]
impl WebPlot {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebPlot {
        Self {
            session: PlotSession::default(),
        }
    }

    pub fn apply_tool_calls(&mut self, json: &str) -> Result<(), JsValue> {
        self.session.apply_tool_calls(json).map_err(js_error)?;
        Ok(())
    }

    /// Flat `[x, y, z, ...]` in plot order.
    pub fn positions(&self) -> Vec<f32> {
        self.session.points().iter().flat_map(|p| p.to_array()).collect()
    }

    /// Points in the model's frame, as JSON, to send with the next prompt.
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.model_state()).map_err(js_error)
    }

    pub fn tool_definition(&self, provider_name: &str) -> Result<String, JsValue> {
        Ok(self.session.tool_definition(provider(provider_name)?).to_string())
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}

impl Default for WebPlot {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Warn).is_err() {
        log::warn!("logger already initialized");
    }
}
