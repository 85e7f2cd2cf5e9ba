pub mod json_api;

/// Error code prefixes of the JSON boundary (`CODE: message`)
pub mod error_codes {
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const INVALID_PLAYER: &str = "INVALID_PLAYER";
    pub const INVALID_SELECTION: &str = "INVALID_SELECTION";
    pub const UNKNOWN_FORMATION: &str = "UNKNOWN_FORMATION";
}

pub use json_api::{
    check_formations_json, check_formations_json_with, check_formations_json_with_settings,
    check_request_schema, CheckRequest, CheckResponse, PlayerData, RolesData,
};
