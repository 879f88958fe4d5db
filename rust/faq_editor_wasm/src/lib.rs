use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use faq_editor_core::selection::char_to_utf16;
use faq_editor_core::{EditSession, EditorError, FormatCommand, SelectionRange, Snapshot, TagPair, ToggleResult};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!("panic at {}:{}:{}: {info}", loc.file(), loc.line(), loc.column()),
                None => format!("panic: {info}"),
            };
            console_error(&msg);
        }));
    });
}

fn js_err(e: EditorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// Offsets leave the wasm boundary as UTF-16 code units, like textarea selections.

fn snapshot_json(snapshot: Option<Snapshot>) -> String {
    snapshot
        .map(|mut s| {
            s.selection = s.selection.to_utf16(&s.content);
            s
        })
        .and_then(|s| serde_json::to_string(&s).ok())
        .unwrap_or_default()
}

fn toggle_json(mut result: ToggleResult) -> String {
    result.new_cursor_pos = char_to_utf16(&result.new_content, result.new_cursor_pos);
    serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string())
}

/// Host clocks hand us `Date.now()` as a float.
fn millis(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 { now_ms as u64 } else { 0 }
}

#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        install_panic_hook();
        Editor { session: EditSession::default() }
    }

    pub fn with_config(config_json: String) -> Result<Editor, JsValue> {
        install_panic_hook();
        let session = EditSession::from_json_config(&config_json).map_err(js_err)?;
        Ok(Editor { session })
    }

    pub fn load_document(&mut self, content: String) { self.session.load_document(content) }
    pub fn content(&self) -> String { self.session.content().to_string() }
    pub fn selection_start(&self) -> u32 { self.session.selection().to_utf16(self.session.content()).start as u32 }
    pub fn selection_end(&self) -> u32 { self.session.selection().to_utf16(self.session.content()).end as u32 }
    pub fn debounce_ms(&self) -> f64 { self.session.config().debounce_ms as f64 }
    pub fn history_capacity(&self) -> u32 { self.session.history().max_size() as u32 }

    // Typing
    pub fn type_text(&mut self, content: String, start: u32, end: u32, now_ms: f64) {
        let selection = SelectionRange::from_utf16(start as usize, end as usize, &content);
        self.session.type_text(content, selection, millis(now_ms))
    }
    pub fn flush_pending(&mut self, now_ms: f64) -> bool { self.session.flush_pending(millis(now_ms)) }
    pub fn commit_pending(&mut self) -> bool { self.session.commit_pending() }
    pub fn has_pending(&self) -> bool { self.session.has_pending() }
    pub fn set_selection(&mut self, start: u32, end: u32) -> Result<(), JsValue> {
        let selection = SelectionRange::from_utf16(start as usize, end as usize, self.session.content());
        self.session.set_selection(selection.start, selection.end).map_err(js_err)
    }

    // Formatting
    pub fn format(&mut self, name: String) -> Result<String, JsValue> {
        let command: FormatCommand = name.parse().map_err(js_err)?;
        let result = self.session.format(&command).map_err(js_err)?;
        Ok(toggle_json(result))
    }
    pub fn format_link(&mut self, href: String) -> Result<String, JsValue> {
        let result = self.session.format(&FormatCommand::Link { href }).map_err(js_err)?;
        Ok(toggle_json(result))
    }
    pub fn toggle_tags(&mut self, start_tag: String, end_tag: String) -> Result<String, JsValue> {
        let result = self.session.toggle_tags(&TagPair::new(start_tag, end_tag)).map_err(js_err)?;
        Ok(toggle_json(result))
    }

    // History
    /// Snapshot JSON, or an empty string when there is nothing to undo.
    pub fn undo(&mut self) -> String { snapshot_json(self.session.undo()) }
    /// Snapshot JSON, or an empty string when there is nothing to redo.
    pub fn redo(&mut self) -> String { snapshot_json(self.session.redo()) }
    pub fn can_undo(&self) -> bool { self.session.history().can_undo() }
    pub fn can_redo(&self) -> bool { self.session.history().can_redo() }
    pub fn undo_description(&self) -> String { self.session.history().undo_description().unwrap_or_default().to_string() }
    pub fn redo_description(&self) -> String { self.session.history().redo_description().unwrap_or_default().to_string() }
    pub fn history_info(&self) -> String {
        serde_json::to_string(&self.session.history_info()).unwrap_or_else(|_| "{}".to_string())
    }
    pub fn clear_history(&mut self) { self.session.clear_history() }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
