//! Utility functions for the roster import component.
//!
//! - **User feedback**: `show_toast` for short, non-blocking notifications.
//! - **Downloads**: `download_csv` hands a generated CSV to the browser through
//!   a Blob and an object URL.
//! - **Formatting**: counts with thousands separators and a status line per
//!   session phase.

use common::roster::{Failure, ImportPhase};
use gloo_file::{Blob, ObjectUrl};
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlAnchorElement, HtmlElement};

/// Displays a temporary notification at the bottom of the screen.
///
/// The toast is a styled `div` appended to `<body>` and removed again after
/// three seconds. The message is inserted as text, never as HTML, since it
/// may contain file names or server messages.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Offers `content` as a file download named `file_name`.
pub fn download_csv(file_name: &str, content: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "no document available".to_string())?;
    let url = ObjectUrl::from(Blob::new_with_options(content, Some("text/csv;charset=utf-8")));

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .unchecked_into();
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    // Dropping the ObjectUrl revokes it; give the browser time to start the download.
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(1000).await;
        drop(url);
    });
    Ok(())
}

pub fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

pub fn format_count(count: usize) -> String {
    count.to_formatted_string(&Locale::en)
}

/// One-line status for the current phase, or `None` when nothing is going on.
pub fn phase_status(phase: &ImportPhase) -> Option<String> {
    match phase {
        ImportPhase::Idle | ImportPhase::Previewed(_) => None,
        ImportPhase::Previewing { file_name, .. } => Some(format!("Reading {}...", file_name)),
        ImportPhase::Importing(file) => Some(format!("Importing {}...", file.file_name)),
        ImportPhase::Imported { result, .. } => Some(format!("Import finished: {}", result.summary())),
        ImportPhase::Failed { failure, .. } => Some(match failure {
            Failure::Unreadable { file_name, error } => format!("{}: {}", file_name, error),
            Failure::Import(error) => format!("Import failed: {}. You can retry.", error),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::ImportError;
    use common::roster::ImportSession;

    const CSV: &str = "email,name,student_number,programme\na@uni.edu,A,1,CS\n";

    #[test]
    fn counts_use_thousands_separators() {
        assert_eq!(format_count(12), "12");
        assert_eq!(format_count(12_345), "12,345");
    }

    #[test]
    fn status_follows_the_session() {
        let mut session = ImportSession::new();
        assert_eq!(phase_status(session.phase()), None);

        let token = session.select_file("roster.csv");
        assert_eq!(
            phase_status(session.phase()).as_deref(),
            Some("Reading roster.csv...")
        );

        session.file_loaded(token, CSV.as_bytes().to_vec());
        assert_eq!(phase_status(session.phase()), None);

        let ticket = session.begin_import("c1").unwrap();
        session.complete_import(ticket.token, Err(ImportError::Network("offline".into())));
        let status = phase_status(session.phase()).unwrap();
        assert!(status.starts_with("Import failed: network error: offline"));
    }
}
