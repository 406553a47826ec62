// Script helpers for the webview renderers (desktop and mobile builds).
use dioxus::prelude::*;
use serde::de::DeserializeOwned;

pub fn run_script(script: &str) {
    let _ = document::eval(script);
}

/// Evaluate `script` and decode what it returns. `None` if the webview is gone
/// or the value has another shape.
pub async fn eval_json<T: DeserializeOwned>(script: &str) -> Option<T> {
    document::eval(script).join::<T>().await.ok()
}

/// Wait `ms` on the page's clock. `false` once the page no longer answers.
pub async fn delay_ms(ms: u64) -> bool {
    let script = format!(
        r#"return (async function () {{
            await new Promise(resolve => setTimeout(resolve, {ms}));
            return true;
        }})();"#
    );
    document::eval(&script).await.is_ok()
}
