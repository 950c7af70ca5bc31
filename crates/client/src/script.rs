//! Script construction: correlation tokens, the promise wrapper, and the
//! element-wait polling loop.

use uuid::Uuid;

use akocef_engine::MESSAGE_PREFIX;

/// Generate a fresh correlation token tying one dispatch to its outcome
/// message.
pub(crate) fn correlation_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Wrap a caller-supplied fragment into a self-contained unit that posts
/// exactly one outcome message for `token`.
///
/// The fragment runs with `resolve` and `reject` in scope and is expected to
/// call one of them, possibly from a later callback. A synchronous throw
/// inside the fragment rejects. Settlement posts the prefixed
/// `{Key, Value, Data}` message on the one-way channel; calling a
/// continuation with no value leaves `Data` out of the serialized object.
pub(crate) fn wrap_promise(fragment: &str, token: &str) -> String {
    format!(
        r#"(function () {{
    return new Promise((resolve, reject) => {{
        try {{
            {fragment}
        }} catch (error) {{
            reject(error);
        }}
    }}).then((Data) => {{
        CefSharp.PostMessage(`{MESSAGE_PREFIX}${{JSON.stringify({{ Key: '{token}', Value: true, Data }})}}`);
    }}).catch((Data) => {{
        CefSharp.PostMessage(`{MESSAGE_PREFIX}${{JSON.stringify({{ Key: '{token}', Value: false, Data }})}}`);
    }});
}})();"#
    )
}

/// Build the element-wait fragment: re-evaluate `condition` every
/// `interval_ms` until it is truthy, then resolve with no payload.
///
/// The loop never rejects on its own; giving up is the dispatch deadline's
/// job.
pub(crate) fn poll_condition(condition: &str, interval_ms: u64) -> String {
    format!(
        r#"const probe = () => {{
    setTimeout(() => {{
        if ({condition}) {{
            resolve();
        }} else {{
            probe();
        }}
    }}, {interval_ms});
}};
probe();"#
    )
}

/// Render a "selector currently matches" condition. The selector is JSON
/// quoted so quote characters in caller input cannot break out of the
/// expression.
pub(crate) fn element_condition(selector: &str) -> String {
    let quoted = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".into());
    format!("document.querySelector({quoted}) !== null")
}
