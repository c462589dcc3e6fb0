//! The six-slot modification-time vector and the files behind it.

use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::paths::{find_first, PathResolver};

/// Auxiliary data files tracked by the version vector, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Symbols,
    EasySymbols,
    FullShapeSymbols,
    LanguageList,
    UserPhrase,
}

impl DataFile {
    pub const ALL: [DataFile; 5] = [
        DataFile::Symbols,
        DataFile::EasySymbols,
        DataFile::FullShapeSymbols,
        DataFile::LanguageList,
        DataFile::UserPhrase,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DataFile::Symbols => "symbols.dat",
            DataFile::EasySymbols => "swkb.dat",
            DataFile::FullShapeSymbols => "fsymbols.dat",
            DataFile::LanguageList => "flangs.dat",
            DataFile::UserPhrase => "userphrase.dat",
        }
    }
}

/// Modification times of the settings file and the data files.
///
/// Each slot is seconds since the Unix epoch, or `0.0` when the file is
/// missing or unreadable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct VersionVector {
    pub config: f64,
    pub symbols: f64,
    pub easy_symbols: f64,
    pub full_shape_symbols: f64,
    pub language_list: f64,
    pub user_phrase: f64,
}

impl VersionVector {
    pub fn from_array(slots: [f64; 6]) -> Self {
        let [config, symbols, easy_symbols, full_shape_symbols, language_list, user_phrase] =
            slots;
        Self {
            config,
            symbols,
            easy_symbols,
            full_shape_symbols,
            language_list,
            user_phrase,
        }
    }

    pub fn to_array(self) -> [f64; 6] {
        [
            self.config,
            self.symbols,
            self.easy_symbols,
            self.full_shape_symbols,
            self.language_list,
            self.user_phrase,
        ]
    }

    /// The data-file slots, everything but the settings file.
    pub fn data_slots(self) -> [f64; 5] {
        [
            self.symbols,
            self.easy_symbols,
            self.full_shape_symbols,
            self.language_list,
            self.user_phrase,
        ]
    }

    pub fn data_file(self, file: DataFile) -> f64 {
        match file {
            DataFile::Symbols => self.symbols,
            DataFile::EasySymbols => self.easy_symbols,
            DataFile::FullShapeSymbols => self.full_shape_symbols,
            DataFile::LanguageList => self.language_list,
            DataFile::UserPhrase => self.user_phrase,
        }
    }

    fn set_data_file(&mut self, file: DataFile, mtime: f64) {
        let slot = match file {
            DataFile::Symbols => &mut self.symbols,
            DataFile::EasySymbols => &mut self.easy_symbols,
            DataFile::FullShapeSymbols => &mut self.full_shape_symbols,
            DataFile::LanguageList => &mut self.language_list,
            DataFile::UserPhrase => &mut self.user_phrase,
        };
        *slot = mtime;
    }

    /// True when the settings file slot differs.
    pub fn config_differs(&self, other: &VersionVector) -> bool {
        self.config != other.config
    }

    /// True when any data-file slot differs.
    pub fn data_differs(&self, other: &VersionVector) -> bool {
        self.data_slots() != other.data_slots()
    }

    /// Stat every tracked file and build a fresh vector.
    ///
    /// Data files are looked up in the user config directory first, then
    /// in the bundled data directory.
    pub fn observe(paths: &PathResolver) -> Self {
        let config = match paths.config_file_path() {
            Ok(path) => mtime_secs(&path),
            Err(e) => {
                tracing::warn!("cannot locate settings file: {e}");
                0.0
            }
        };

        let search = paths.data_search_dirs();
        let mut vector = VersionVector {
            config,
            ..Default::default()
        };
        for file in DataFile::ALL {
            let mtime = find_first(&search, file.file_name())
                .map(|path| mtime_secs(&path))
                .unwrap_or(0.0);
            vector.set_data_file(file, mtime);
        }
        vector
    }
}

/// Modification time of `path` in seconds since the epoch, `0.0` on any
/// failure.
pub fn mtime_secs(path: &Path) -> f64 {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
