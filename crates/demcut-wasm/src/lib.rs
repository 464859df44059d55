//! WebAssembly bindings for demcut.
//!
//! # Usage (from JavaScript)
//!
//! ```js
//! import init, { cut } from 'demcut-wasm';
//!
//! await init();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const trimmed = cut(bytes, 1200, 3400);
//! ```
//!
//! Failures throw an `Error` whose message starts with the error code
//! (`invalid_range`, `truncated`, ...).

#![deny(missing_docs)]
#![forbid(unsafe_code)]

use demcut::CutError;
use wasm_bindgen::prelude::*;

/// Cut `input` to the inclusive tick range `[start, end]`.
///
/// Ticks arrive as JS numbers; anything that is not a finite integer is
/// rejected as an invalid range.
#[wasm_bindgen]
pub fn cut(input: &[u8], start: f64, end: f64) -> Result<Vec<u8>, JsError> {
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();
    run(input, start, end).map_err(|msg| JsError::new(&msg))
}

fn run(input: &[u8], start: f64, end: f64) -> Result<Vec<u8>, String> {
    let (Some(start_tick), Some(end_tick)) = (tick(start), tick(end)) else {
        return Err(format!(
            "invalid_range: ticks must be integers, got {start} and {end}"
        ));
    };
    demcut::cut(input, start_tick, end_tick).map_err(|e| describe(&e))
}

fn tick(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        // Saturates outside the i64 range; the engine clamps further.
        Some(value as i64)
    } else {
        None
    }
}

fn describe(err: &CutError) -> String {
    format!("{}: {err}", err.code())
}
