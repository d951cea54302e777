//! Browser export: the save blob is offered as a text-file download.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::codec::SaveError;

fn js_error(what: &str, err: JsValue) -> SaveError {
    SaveError::Unavailable(format!("{}: {:?}", what, err))
}

pub fn offer(blob: &str, file_name: &str) -> Result<(), SaveError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| SaveError::Unavailable("document".to_string()))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(blob));
    let options = BlobPropertyBag::new();
    options.set_type("text/plain");
    let file = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| js_error("blob", e))?;
    let url = Url::create_object_url_with_blob(&file).map_err(|e| js_error("object url", e))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| js_error("anchor", e))?
        .dyn_into()
        .map_err(|_| SaveError::Unavailable("anchor element".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(|e| js_error("revoke", e))
}
