use super::ExportError;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

fn js_err(context: &str, e: wasm_bindgen::JsValue) -> ExportError {
    ExportError::Download(format!("{}: {:?}", context, e))
}

fn create_blob(bytes: &[u8], mime: &str) -> Result<Blob, ExportError> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    Blob::new_with_u8_array_sequence_and_options(&parts, &properties)
        .map_err(|e| js_err("blob", e))
}

/// Hand `bytes` to the browser as a file download via a hidden anchor
pub fn download_bytes(bytes: &[u8], mime: &str, filename: &str) -> Result<(), ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::Download("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::Download("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| ExportError::Download("no body".into()))?;

    let blob = create_blob(bytes, mime)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_err("object url", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| js_err("anchor", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| ExportError::Download("anchor cast".into()))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| js_err("style", e))?;

    body.append_child(&anchor).map_err(|e| js_err("append", e))?;
    anchor.click();
    body.remove_child(&anchor).map_err(|e| js_err("remove", e))?;

    log::info!("downloaded {} ({} bytes)", filename, bytes.len());
    Url::revoke_object_url(&url).map_err(|e| js_err("revoke", e))
}
