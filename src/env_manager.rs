use log::warn;
use std::env;
use std::path::PathBuf;

pub const REQUIRED_ENV_VARS: &[&str] = &["GOOGLE_MAPS_API_KEY"];

// Names of optional environment variables
pub const OPTIONAL_ENV_VARS: &[&str] = &[
    "ALEXA_APPLICATION_ID",
    "SNOOZE_SKILL_BIND_ADDR",
    "SNOOZE_SKILL_CONFIG_PATH",
    "SNOOZE_SKILL_LOG_LEVEL",
    "SLACK_API_BASE",
];

/// Returns the names of required variables that are unset or blank.
pub fn check_env_vars() -> Vec<&'static str> {
    let missing: Vec<&'static str> =
        REQUIRED_ENV_VARS.iter().copied().filter(|var| get_env_var(var).is_none()).collect();

    for var in &missing {
        warn!("Missing environment variable: {}", var);
    }
    missing
}

/// Load `.env` into the process environment. Runs before the logger exists,
/// so the outcome is returned for the caller to log.
pub fn load_env_file() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

/// Value of an environment variable, treating blank values as unset.
pub fn get_env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_unset() {
        env::set_var("SNOOZE_SKILL_TEST_BLANK", "   ");
        assert_eq!(get_env_var("SNOOZE_SKILL_TEST_BLANK"), None);
        env::set_var("SNOOZE_SKILL_TEST_SET", "value");
        assert_eq!(get_env_var("SNOOZE_SKILL_TEST_SET").as_deref(), Some("value"));
    }

    #[test]
    fn optional_and_required_do_not_overlap() {
        for var in REQUIRED_ENV_VARS {
            assert!(!OPTIONAL_ENV_VARS.contains(var));
        }
    }

    #[test]
    fn application_id_is_optional() {
        assert!(OPTIONAL_ENV_VARS.contains(&"ALEXA_APPLICATION_ID"));
        assert!(!REQUIRED_ENV_VARS.contains(&"ALEXA_APPLICATION_ID"));
    }
}
