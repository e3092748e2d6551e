use wasm_bindgen::prelude::*;
use web_sys::console;

pub(crate) fn main_wasm() -> Result<(), JsValue> {
    let version = env!("CARGO_PKG_VERSION");
    console::log_1(&format!("Starting starfield {version}").into());
    starfield::run();
    Ok(())
}
