use std::fs;
use std::path::{Path, PathBuf};

use cinbase_common::PathError;

/// Name of the settings document inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the bundled install root.
pub const INSTALL_DIR_ENV: &str = "CINBASE_INSTALL_DIR";

pub(super) const USER_ROOT_NAME: &str = "PIME";

/// Two-tier file lookup for one input method: the per-user config
/// directory first, then the bundled install tree.
#[derive(Debug, Clone)]
pub struct PathResolver {
    user_root: PathBuf,
    install_root: PathBuf,
    ime_dir_name: String,
}

impl PathResolver {
    pub fn new(
        user_root: impl Into<PathBuf>,
        install_root: impl Into<PathBuf>,
        ime_dir_name: impl Into<String>,
    ) -> Self {
        Self {
            user_root: user_root.into(),
            install_root: install_root.into(),
            ime_dir_name: ime_dir_name.into(),
        }
    }

    /// Resolver using the platform locations.
    ///
    /// - user root: `~/PIME`
    /// - install root: `$CINBASE_INSTALL_DIR`, else the directory of the
    ///   running executable
    pub fn for_ime(ime_dir_name: impl Into<String>) -> Result<Self, PathError> {
        Ok(Self::new(
            default_user_root()?,
            default_install_root()?,
            ime_dir_name,
        ))
    }

    pub fn ime_dir_name(&self) -> &str {
        &self.ime_dir_name
    }

    pub fn user_root(&self) -> &Path {
        &self.user_root
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Per-user config directory, `<user root>/<ime>`.
    ///
    /// Created on first access; a newly created directory is made
    /// owner-only (0o700) on unix.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        let dir = self.user_root.join(&self.ime_dir_name);
        if dir.is_dir() {
            return Ok(dir);
        }

        fs::create_dir_all(&dir).map_err(|source| PathError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)).map_err(|source| {
                PathError::CreateDir {
                    path: dir.clone(),
                    source,
                }
            })?;
        }

        tracing::debug!(path = %dir.display(), "created config directory");
        Ok(dir)
    }

    /// `config_dir()/name`.
    pub fn config_file(&self, name: &str) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(name))
    }

    /// The user's settings document, `config_dir()/config.json`.
    pub fn config_file_path(&self) -> Result<PathBuf, PathError> {
        self.config_file(CONFIG_FILE_NAME)
    }

    /// Bundled defaults, `<install root>/input_methods/<ime>/config`.
    pub fn default_config_dir(&self) -> PathBuf {
        self.install_root
            .join("input_methods")
            .join(&self.ime_dir_name)
            .join("config")
    }

    pub fn default_config_file(&self) -> PathBuf {
        self.default_config_dir().join(CONFIG_FILE_NAME)
    }

    /// Bundled data files, `<install root>/data`.
    pub fn data_dir(&self) -> PathBuf {
        self.install_root.join("data")
    }

    /// Directories searched for data files, user overrides first.
    ///
    /// If the user directory cannot be prepared only the bundled data
    /// directory is searched.
    pub fn data_search_dirs(&self) -> Vec<PathBuf> {
        match self.config_dir() {
            Ok(user) => vec![user, self.data_dir()],
            Err(e) => {
                tracing::warn!("skipping user data overrides: {e}");
                vec![self.data_dir()]
            }
        }
    }
}

/// Return the first `dir/name` that exists, searching `dirs` in order.
pub fn find_first<P: AsRef<Path>>(dirs: &[P], name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.as_ref().join(name))
        .find(|path| path.exists())
}

fn default_user_root() -> Result<PathBuf, PathError> {
    Ok(dirs::home_dir()
        .ok_or(PathError::NoBaseDir("home"))?
        .join(USER_ROOT_NAME))
}

fn default_install_root() -> Result<PathBuf, PathError> {
    if let Some(dir) = std::env::var_os(INSTALL_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .ok_or(PathError::NoBaseDir("install"))
}
