use crate::app_config::{AppConfig, CatalogSource, Environment, TieBreak};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"))?;

    let bind_addr = or_default("STOREFRONT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFRONT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    // A configured shop URL takes precedence over the local catalog file.
    let catalog_source = match lookup("STOREFRONT_SHOP_URL") {
        Ok(raw) if !raw.trim().is_empty() => {
            let shop_url = raw.trim();
            if !shop_url.starts_with("http://") && !shop_url.starts_with("https://") {
                return Err(invalid(
                    "STOREFRONT_SHOP_URL",
                    format!("\"{shop_url}\" must start with http:// or https://"),
                ));
            }
            CatalogSource::Remote {
                shop_url: shop_url.to_string(),
            }
        }
        _ => CatalogSource::File(PathBuf::from(or_default(
            "STOREFRONT_CATALOG_PATH",
            "./config/catalog.yaml",
        ))),
    };

    let combined_listing_tag = or_default("STOREFRONT_COMBINED_LISTING_TAG", "combined");
    if combined_listing_tag.trim().is_empty() {
        return Err(invalid(
            "STOREFRONT_COMBINED_LISTING_TAG",
            "must be non-empty".to_string(),
        ));
    }

    let combined_listing_redirect = parse_bool(
        "STOREFRONT_COMBINED_LISTING_REDIRECT",
        &or_default("STOREFRONT_COMBINED_LISTING_REDIRECT", "false"),
    )?;

    let public_base_url = match lookup("STOREFRONT_PUBLIC_BASE_URL") {
        Ok(raw) if !raw.trim().is_empty() => {
            let base = raw.trim().trim_end_matches('/');
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(invalid(
                    "STOREFRONT_PUBLIC_BASE_URL",
                    format!("\"{base}\" must start with http:// or https://"),
                ));
            }
            Some(base.to_string())
        }
        _ => None,
    };

    let tie_break = parse_tie_break(&or_default(
        "STOREFRONT_VARIANT_TIE_BREAK",
        "declaration-order",
    ))?;

    let fetch_timeout_secs = parse_u64("STOREFRONT_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1 (variant-resolver)");
    let fetch_max_retries = parse_u32("STOREFRONT_FETCH_MAX_RETRIES", "3")?;
    let fetch_backoff_base_secs = parse_u64("STOREFRONT_FETCH_BACKOFF_BASE_SECS", "2")?;
    let rate_limit_per_minute = parse_usize("STOREFRONT_RATE_LIMIT_PER_MINUTE", "120")?;
    let seo_default_title = or_default("STOREFRONT_SEO_TITLE", "Storefront");
    let seo_default_description = or_default("STOREFRONT_SEO_DESCRIPTION", "");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_source,
        combined_listing_tag,
        combined_listing_redirect,
        tie_break,
        public_base_url,
        fetch_timeout_secs,
        fetch_user_agent,
        fetch_max_retries,
        fetch_backoff_base_secs,
        rate_limit_per_minute,
        seo_default_title,
        seo_default_description,
    })
}

/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` in any case.
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("\"{other}\" is not a boolean"),
        }),
    }
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_tie_break(s: &str) -> Result<TieBreak, ConfigError> {
    match s {
        "declaration-order" => Ok(TieBreak::DeclarationOrder),
        "prefer-available" => Ok(TieBreak::PreferAvailable),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_VARIANT_TIE_BREAK".to_string(),
            reason: format!(
                "unknown tie-break \"{other}\"; expected declaration-order or prefer-available"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
