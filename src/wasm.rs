//! WebAssembly bindings for the Turing engine.
//!
//! Provides a thin wrapper around [`Engine`] for browser renderers. Field
//! buffers are handed out as typed arrays; everything else goes through
//! `serde-wasm-bindgen`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{compute::Engine, schema::EngineConfig};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// WebAssembly wrapper for the pattern engine.
#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Create a new engine from a JSON `EngineConfig`. An empty string
    /// uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmEngine, JsValue> {
        let config: EngineConfig = if config_json.trim().is_empty() {
            EngineConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
        };

        let engine = Engine::new(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {e}")))?;

        Ok(WasmEngine { engine })
    }

    /// Advance one tick and return its report.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let report = self.engine.tick();
        to_js(&report)
    }

    /// Advance several ticks.
    #[wasm_bindgen]
    pub fn run(&mut self, ticks: u64) {
        self.engine.run(ticks);
    }

    /// Copy of field A.
    #[wasm_bindgen(js_name = fieldA)]
    pub fn field_a(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.engine.pattern().grid.a.as_slice())
    }

    /// Copy of field B.
    #[wasm_bindgen(js_name = fieldB)]
    pub fn field_b(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.engine.pattern().grid.b.as_slice())
    }

    /// Feature vector from the latest tick.
    #[wasm_bindgen]
    pub fn features(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.features())
    }

    /// Current kinetic parameters.
    #[wasm_bindgen]
    pub fn params(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.params())
    }

    /// Archive entries, best first.
    #[wasm_bindgen]
    pub fn archive(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.archive().entries())
    }

    /// Full frame snapshot (fields, features, params).
    #[wasm_bindgen]
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.frame())
    }

    #[wasm_bindgen(js_name = getTime)]
    pub fn get_time(&self) -> f64 {
        self.engine.time()
    }

    #[wasm_bindgen(js_name = getRegenerations)]
    pub fn get_regenerations(&self) -> u64 {
        self.engine.regenerations()
    }

    /// Get grid width.
    #[wasm_bindgen]
    pub fn width(&self) -> usize {
        self.engine.config().width
    }

    /// Get grid height.
    #[wasm_bindgen]
    pub fn height(&self) -> usize {
        self.engine.config().height
    }

    #[wasm_bindgen(js_name = setAutoRegenerate)]
    pub fn set_auto_regenerate(&mut self, enabled: bool) {
        self.engine.set_auto_regenerate(enabled);
    }

    #[wasm_bindgen(js_name = setAutonomousDrift)]
    pub fn set_autonomous_drift(&mut self, enabled: bool) {
        self.engine.set_autonomous_drift(enabled);
    }

    /// Force a regeneration now.
    #[wasm_bindgen]
    pub fn regenerate(&mut self) -> Result<JsValue, JsValue> {
        let how = self.engine.regenerate();
        to_js(&how)
    }
}
