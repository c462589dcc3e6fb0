//! Settings validation.
//!
//! Checks numeric ranges and the selection-key table, collecting every
//! problem into a single `ConfigError`.

mod helpers;


use cinbase_common::ConfigError;

use crate::schema::{SettingsRecord, SELECTION_KEYS};

use helpers::validate_range;

/// Run all validations on a settings record, collecting all errors.
pub fn validate(settings: &SettingsRecord) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "candPerRow", settings.cand_per_row, 1, 10);
    validate_range(&mut errors, "candPerPage", settings.cand_per_page, 1, 10);
    validate_range(&mut errors, "fontSize", settings.font_size, 6, 72);
    validate_range(&mut errors, "candMaxItems", settings.cand_max_items, 1, 1000);
    validate_sel_keys(&mut errors, settings);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_sel_keys(errors: &mut Vec<String>, settings: &SettingsRecord) {
    let Some(keys) = SELECTION_KEYS.get(settings.sel_key_type) else {
        errors.push(format!(
            "selKeyType = {} has no key set (expected < {})",
            settings.sel_key_type,
            SELECTION_KEYS.len()
        ));
        return;
    };

    let available = keys.chars().count();
    if settings.cand_per_page as usize > available {
        errors.push(format!(
            "candPerPage = {} exceeds the {available} selection keys",
            settings.cand_per_page
        ));
    }
}
