use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error_codes;
use crate::catalog::FORMATION_SIZE;
use crate::check::{check_selection, FormationReport};
use crate::config::Settings;
use crate::diagnostics::DiagnosticRules;
use crate::player::Player;
use crate::roles::{parse_role_list, Role, RoleError, RoleSet};
use crate::roster::Roster;
use crate::{Catalog, SCHEMA_VERSION};

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

/// Formation check request
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    /// Selected players (1..=11, unique names)
    pub players: Vec<PlayerData>,
    /// Restrict the check to these formations (catalog order is kept)
    #[serde(default)]
    pub formations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlayerData {
    pub name: String,
    /// Role codes, either as a list (`["Dc", "B"]`) or a cell string (`"Dc;B"`)
    pub roles: RolesData,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RolesData {
    List(Vec<String>),
    Text(String),
}

impl RolesData {
    fn to_role_set(&self) -> Result<RoleSet, RoleError> {
        match self {
            RolesData::Text(text) => parse_role_list(text),
            RolesData::List(items) => {
                let roles = items
                    .iter()
                    .map(|item| item.parse::<Role>())
                    .collect::<Result<RoleSet, _>>()?;
                if roles.is_empty() {
                    return Err(RoleError::Empty);
                }
                Ok(roles)
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub report: FormationReport,
}

/// Check a JSON request against the builtin catalog and default thresholds
pub fn check_formations_json(request_json: &str) -> Result<String, String> {
    check_formations_json_with(
        request_json,
        Catalog::builtin(),
        &DiagnosticRules::default(),
    )
}

/// Check a JSON request using resolved settings (custom catalog / thresholds)
pub fn check_formations_json_with_settings(
    request_json: &str,
    settings: &Settings,
) -> Result<String, String> {
    check_formations_json_with(request_json, &settings.catalog, &settings.rules)
}

pub fn check_formations_json_with(
    request_json: &str,
    catalog: &Catalog,
    rules: &DiagnosticRules,
) -> Result<String, String> {
    let request: CheckRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, e))?;

    let players = players_from_request(&request)?;

    let report = match &request.formations {
        Some(names) => {
            let subset = catalog
                .subset(names)
                .map_err(|e| err_code(error_codes::UNKNOWN_FORMATION, e))?;
            check_selection(&players, &subset, rules)
        }
        None => check_selection(&players, catalog, rules),
    };

    let response = CheckResponse {
        schema_version: SCHEMA_VERSION,
        report,
    };
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::INVALID_JSON, e))
}

fn players_from_request(request: &CheckRequest) -> Result<Vec<Player>, String> {
    if request.players.is_empty() {
        return Err(err_code(error_codes::INVALID_SELECTION, "select at least one player"));
    }
    if request.players.len() > FORMATION_SIZE {
        return Err(err_code(
            error_codes::INVALID_SELECTION,
            format!(
                "cannot select {} players, the maximum is {FORMATION_SIZE}",
                request.players.len()
            ),
        ));
    }

    let players = request
        .players
        .iter()
        .map(|data| {
            let roles = data.roles.to_role_set().map_err(|e| {
                err_code(
                    error_codes::INVALID_PLAYER,
                    format!("player '{}': {e}", data.name.trim()),
                )
            })?;
            Player::new(&data.name, roles).map_err(|e| err_code(error_codes::INVALID_PLAYER, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // duplicate names are a selection error, not a matching one
    let roster =
        Roster::from_players(players).map_err(|e| err_code(error_codes::INVALID_SELECTION, e))?;
    Ok(roster.players().to_vec())
}

/// JSON schema of [`CheckRequest`]
pub fn check_request_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(CheckRequest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn request_343() -> Value {
        json!({
            "players": [
                {"name": "Sommer", "roles": ["Por"]},
                {"name": "Pavard", "roles": "Dc"},
                {"name": "Acerbi", "roles": "Dc"},
                {"name": "Bastoni", "roles": "Dc"},
                {"name": "Dumfries", "roles": "E"},
                {"name": "Calhanoglu", "roles": ["midfielder", "center-mid"]},
                {"name": "Barella", "roles": "C"},
                {"name": "Dimarco", "roles": "E"},
                {"name": "Leao", "roles": "W/A"},
                {"name": "Lautaro", "roles": "Pc;A"},
                {"name": "Kvara", "roles": "W,A"}
            ]
        })
    }

    #[test]
    fn test_check_343_request() {
        let out = check_formations_json(&request_343().to_string()).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["player_count"], 11);
        assert_eq!(parsed["compatible"][0]["formation"], "3-4-3");
        assert_eq!(parsed["compatible"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["compatible"][0]["lineup"].as_array().unwrap().len(), 11);
        assert!(parsed["diagnostics"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_formation_filter() {
        let mut request = request_343();
        request["formations"] = json!(["4-4-2"]);

        let parsed: Value =
            serde_json::from_str(&check_formations_json(&request.to_string()).unwrap()).unwrap();
        assert_eq!(parsed["formations_checked"], 1);
        assert!(parsed["compatible"].as_array().unwrap().is_empty());
        assert!(!parsed["diagnostics"].as_array().unwrap().is_empty());

        request["formations"] = json!(["9-9-9"]);
        let err = check_formations_json(&request.to_string()).unwrap_err();
        assert!(err.starts_with("UNKNOWN_FORMATION"), "{err}");
    }

    #[test]
    fn test_pure_striker_overflow_diagnostic() {
        let mut request = request_343();
        request["players"][8]["roles"] = json!("Pc");
        request["players"][9]["roles"] = json!("Pc");
        request["players"][10]["roles"] = json!("Pc");

        let parsed: Value =
            serde_json::from_str(&check_formations_json(&request.to_string()).unwrap()).unwrap();
        let diagnostics = parsed["diagnostics"].as_array().unwrap();
        assert_eq!(diagnostics[0]["kind"], "pure_striker_overflow");
        assert_eq!(diagnostics[0]["found"], 3);
        assert_eq!(diagnostics[0]["limit"], 2);
    }

    #[test]
    fn test_request_errors() {
        let err = check_formations_json("{not json").unwrap_err();
        assert!(err.starts_with("INVALID_JSON"), "{err}");

        let err = check_formations_json(r#"{"players": []}"#).unwrap_err();
        assert!(err.starts_with("INVALID_SELECTION"), "{err}");

        let err = check_formations_json(r#"{"players": [{"name": "X", "roles": "Qq"}]}"#)
            .unwrap_err();
        assert!(err.starts_with("INVALID_PLAYER"), "{err}");

        let err = check_formations_json(r#"{"players": [{"name": "X", "roles": []}]}"#)
            .unwrap_err();
        assert!(err.starts_with("INVALID_PLAYER"), "{err}");

        let dup = r#"{"players": [{"name": "X", "roles": "Por"}, {"name": "x", "roles": "Dc"}]}"#;
        let err = check_formations_json(dup).unwrap_err();
        assert!(err.starts_with("INVALID_SELECTION"), "{err}");

        let mut twelve = request_343();
        twelve["players"]
            .as_array_mut()
            .unwrap()
            .push(json!({"name": "Frattesi", "roles": "C"}));
        let err = check_formations_json(&twelve.to_string()).unwrap_err();
        assert!(err.starts_with("INVALID_SELECTION"), "{err}");
    }

    #[test]
    fn test_schema_mentions_request_fields() {
        let schema = check_request_schema().unwrap();
        assert!(schema.contains("CheckRequest"));
        assert!(schema.contains("players"));
        assert!(schema.contains("formations"));
    }
}
