use std::collections::BTreeMap;

use console_error_panic_hook::set_once;
use formats::ColumnSet;
use foundation::GeoBounds;
use panel::{Bridge, PanelOptions, options_schema, render_frame, select_command};
use runtime::{VariableCommand, VariableSink};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Builds the layer plan for one render.
///
/// `data_json` is the host's column set, `variables_json` a flat
/// `{name: value}` object of current dashboard variables, and `options_json`
/// the panel options (may be `"{}"`).
#[wasm_bindgen]
pub fn render_frame_json(
    data_json: &str,
    variables_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    let data = ColumnSet::from_json_str(data_json).map_err(to_js)?;
    let variables = parse_variables(variables_json)?;
    let options = load_options(options_json)?;

    let frame = render_frame(&data, &variables, &options);
    for skipped in &frame.skipped {
        web_sys::console::debug_1(&JsValue::from_str(&format!(
            "map panel: skipped row {}: {:?}",
            skipped.row, skipped.reason
        )));
    }
    serde_json::to_string(&frame).map_err(to_js)
}

/// A feature was clicked; `id` is `undefined` for features without one.
/// `on_update` receives the host query update as a JSON string.
#[wasm_bindgen]
pub fn select_feature(id: Option<String>, on_update: &js_sys::Function) -> Result<(), JsValue> {
    let mut sink = JsSink::new(on_update);
    sink.send(select_command(id.as_deref()));
    sink.finish()
}

/// The map viewport settled, or the map mounted with its initial viewport.
#[wasm_bindgen]
pub fn viewport_changed(
    south: f64,
    west: f64,
    north: f64,
    east: f64,
    options_json: &str,
    on_update: &js_sys::Function,
) -> Result<(), JsValue> {
    let options = load_options(options_json)?;
    let mut sink = JsSink::new(on_update);
    Bridge::new(&options.map, &mut sink)
        .on_viewport_change(GeoBounds::from_edges(south, west, north, east));
    sink.finish()
}

#[wasm_bindgen]
pub fn options_schema_json() -> Result<String, JsValue> {
    serde_json::to_string(&options_schema()).map_err(to_js)
}

/// Decodes options; out-of-range values are logged and kept.
fn load_options(options_json: &str) -> Result<PanelOptions, JsValue> {
    let options = PanelOptions::from_json_str(options_json).map_err(to_js)?;
    if let Err(e) = options.validate() {
        web_sys::console::warn_1(&JsValue::from_str(&format!("map panel: {e}")));
    }
    Ok(options)
}

fn parse_variables(variables_json: &str) -> Result<BTreeMap<String, String>, JsValue> {
    let raw: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(variables_json).map_err(to_js)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::String(s) => Some((name, s)),
            serde_json::Value::Null => None,
            other => Some((name, other.to_string())),
        })
        .collect())
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Forwards commands to a JS callback; the first failure is kept and returned
/// by [`JsSink::finish`].
struct JsSink<'a> {
    callback: &'a js_sys::Function,
    error: Option<JsValue>,
}

impl<'a> JsSink<'a> {
    fn new(callback: &'a js_sys::Function) -> Self {
        Self {
            callback,
            error: None,
        }
    }

    fn finish(self) -> Result<(), JsValue> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl VariableSink for JsSink<'_> {
    fn send(&mut self, command: VariableCommand) {
        if self.error.is_some() {
            return;
        }
        let result = command
            .query_update()
            .to_json_string()
            .map_err(to_js)
            .and_then(|json| {
                self.callback
                    .call1(&JsValue::NULL, &JsValue::from_str(&json))
                    .map(|_| ())
            });
        if let Err(e) = result {
            web_sys::console::error_1(&e);
            self.error = Some(e);
        }
    }
}
