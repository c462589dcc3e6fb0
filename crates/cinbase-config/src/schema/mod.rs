//! Settings schema for a cinbase input method.
//!
//! The record is flat: every field maps to one top-level key of
//! `config.json`. `serde(default)` fills anything the document omits, so
//! partial files work out of the box.

mod keys;

pub use keys::SELECTION_KEYS;

use serde::{Deserialize, Serialize};

/// Default candidate window font size in points.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// User-tunable settings of one input method.
///
/// Field names serialize in camelCase (`candPerRow`, `fontSize`, ...) and
/// the declaration order here is the key order of the saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsRecord {
    pub ime_dir_name: String,
    /// Candidates shown per row of the candidate window.
    pub cand_per_row: u32,
    pub default_english: bool,
    pub default_full_space: bool,
    pub switch_lang_with_shift: bool,
    pub switch_page_with_space: bool,
    pub output_simp_chinese: bool,
    pub hide_prompt_messages: bool,
    pub auto_clear_composition_char: bool,
    pub play_sound_when_non_cand: bool,
    pub direct_show_cand: bool,
    pub direct_commit_string: bool,
    pub direct_commit_symbol: bool,
    pub color_cand_wnd: bool,
    pub advance_after_selection: bool,
    /// Candidate window font size in points (valid range: 6-72).
    pub font_size: u32,
    pub sel_cin_type: u32,
    pub sel_cin_file: String,
    /// Names of the loaded `.cin` dictionary files.
    pub cin_file_list: Vec<String>,
    pub cindir: String,
    /// Index into [`SELECTION_KEYS`].
    pub sel_key_type: usize,
    pub cand_per_page: u32,
    pub cursor_cand_list: bool,
    pub enable_caps_lock: bool,
    pub full_shape_symbols: bool,
    pub esc_clean_all_buf: bool,
    pub easy_symbols_with_shift: bool,
    pub upper_case_with_shift: bool,
    pub support_symbol_coding: bool,
    pub show_phrase: bool,
    pub sort_by_phrase: bool,
    pub support_wildcard: bool,
    pub sel_wildcard_type: u32,
    pub cand_max_items: u32,
    pub keyboard_type: u32,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            ime_dir_name: String::new(),
            cand_per_row: 3,
            default_english: false,
            default_full_space: false,
            switch_lang_with_shift: true,
            switch_page_with_space: false,
            output_simp_chinese: false,
            hide_prompt_messages: true,
            auto_clear_composition_char: false,
            play_sound_when_non_cand: false,
            direct_show_cand: false,
            direct_commit_string: false,
            direct_commit_symbol: false,
            color_cand_wnd: true,
            advance_after_selection: true,
            font_size: DEFAULT_FONT_SIZE,
            sel_cin_type: 0,
            sel_cin_file: String::new(),
            cin_file_list: Vec::new(),
            cindir: String::new(),
            sel_key_type: 0,
            cand_per_page: 9,
            cursor_cand_list: true,
            enable_caps_lock: true,
            full_shape_symbols: false,
            esc_clean_all_buf: true,
            easy_symbols_with_shift: false,
            upper_case_with_shift: true,
            support_symbol_coding: false,
            show_phrase: false,
            sort_by_phrase: true,
            support_wildcard: true,
            sel_wildcard_type: 0,
            cand_max_items: 100,
            keyboard_type: 0,
        }
    }
}

impl SettingsRecord {
    /// Defaults for the input method stored under `ime_dir_name`.
    pub fn for_ime(ime_dir_name: impl Into<String>) -> Self {
        Self {
            ime_dir_name: ime_dir_name.into(),
            ..Self::default()
        }
    }

    /// Candidate selection keys for the configured `sel_key_type`.
    ///
    /// Falls back to the first key set when the index is out of range.
    pub fn sel_keys(&self) -> &'static str {
        keys::selection_keys(self.sel_key_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let s = SettingsRecord::default();
        assert_eq!(s.cand_per_row, 3);
        assert_eq!(s.font_size, 16);
        assert_eq!(s.cand_per_page, 9);
        assert_eq!(s.cand_max_items, 100);
        assert!(s.switch_lang_with_shift);
        assert!(s.hide_prompt_messages);
        assert!(!s.default_english);
        assert!(s.cin_file_list.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(SettingsRecord::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["candPerRow"], 3);
        assert_eq!(obj["fontSize"], 16);
        assert_eq!(obj["imeDirName"], "");
        assert!(obj.contains_key("autoClearCompositionChar"));
        assert!(obj.contains_key("cinFileList"));
        assert!(obj.contains_key("cindir"));
        assert!(!obj.contains_key("cand_per_row"));
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let s: SettingsRecord = serde_json::from_str(r#"{"fontSize": 20}"#).unwrap();
        assert_eq!(s.font_size, 20);
        assert_eq!(s.cand_per_row, 3);
        assert_eq!(s, SettingsRecord { font_size: 20, ..Default::default() });
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let s: SettingsRecord =
            serde_json::from_str(r#"{"curdir": "C:\\PIME", "_version": [1.0], "candPerRow": 5}"#)
                .unwrap();
        assert_eq!(s.cand_per_row, 5);
    }

    #[test]
    fn for_ime_sets_dir_name() {
        let s = SettingsRecord::for_ime("chedayi");
        assert_eq!(s.ime_dir_name, "chedayi");
        assert_eq!(s.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn sel_keys_falls_back_on_bad_index() {
        let mut s = SettingsRecord::default();
        assert_eq!(s.sel_keys(), "1234567890");
        s.sel_key_type = 42;
        assert_eq!(s.sel_keys(), "1234567890");
    }
}
