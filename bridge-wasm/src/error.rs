//! Conversion of JavaScript exceptions into bridge errors

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use wasm_bindgen::{JsCast, JsValue};

/// Legacy `DOMException.code` for quota errors.
const QUOTA_EXCEEDED_CODE: u16 = 22;

/// Convert a thrown JavaScript value into a [`BridgeError`].
///
/// Storage quota exceptions map to [`BridgeError::QuotaExceeded`]; anything
/// else becomes [`BridgeError::OperationFailed`] prefixed with `context`.
pub fn js_error(context: &str, err: JsValue) -> BridgeError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        let name = dom.name();
        if name == "QuotaExceededError"
            || name == "NS_ERROR_DOM_QUOTA_REACHED"
            || dom.code() == QUOTA_EXCEEDED_CODE
        {
            return BridgeError::QuotaExceeded(format!("{context}: {}", dom.message()));
        }
        return BridgeError::OperationFailed(format!("{context}: {name}: {}", dom.message()));
    }

    let message = if err.is_string() {
        err.as_string().unwrap_or_default()
    } else if let Some(js_err) = err.dyn_ref::<js_sys::Error>() {
        js_err.message().into()
    } else {
        format!("{err:?}")
    };
    BridgeError::OperationFailed(format!("{context}: {message}"))
}

pub(crate) fn window() -> BridgeResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".into()))
}
