//! Shared names and defaults used across commands and the local server.

/// Phrase the operator must type to authorize `data clean`. Also sent to the
/// server as the authorization token of the clean request.
pub const CONFIRMATION_PHRASE: &str = "CLEAN DATA";

/// Settings file holding named environments.
pub const SETTINGS_FILE: &str = ".marketplace-kit";
/// Overrides the location of [`SETTINGS_FILE`].
pub const SETTINGS_PATH_ENV: &str = "MARKETPLACE_KIT_PATH";

pub const MARKETPLACE_URL_ENV: &str = "MARKETPLACE_URL";
pub const MARKETPLACE_TOKEN_ENV: &str = "MARKETPLACE_TOKEN";
pub const MARKETPLACE_EMAIL_ENV: &str = "MARKETPLACE_EMAIL";

pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_GUI_DIR: &str = "gui";

pub const SYNC_PATH_FIELD: &str = "path";
pub const SYNC_FILE_FIELD: &str = "marketplace_builder_file_body";

/// Largest request body accepted by the local server (sync uploads).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
