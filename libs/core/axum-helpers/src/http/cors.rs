use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

pub const CORS_ENV: &str = "CORS_ALLOWED_ORIGIN";

/// Parse a comma-separated origin list, skipping blanks
pub fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ENV} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{CORS_ENV} cannot be empty"),
        ));
    }

    Ok(origins)
}

/// CORS restricted to `origins` with the methods the API serves
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin. Used when no origin list is configured.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// Unset means permissive; set but empty or malformed is an error.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    match std::env::var(CORS_ENV) {
        Ok(raw) => {
            let origins = parse_origins(&raw)?;
            info!(origins = %raw, "CORS restricted to configured origins");
            Ok(create_cors_layer(origins))
        }
        Err(_) => {
            warn!("{CORS_ENV} not set, allowing any origin");
            Ok(create_permissive_cors_layer())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" http://localhost:3000 ,, https://events.example.com").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
        assert_eq!(origins[1], "https://events.example.com");
    }

    #[test]
    fn test_parse_origins_rejects_empty_list() {
        assert!(parse_origins(" , ").is_err());
    }

    #[test]
    fn test_cors_layer_from_env() {
        temp_env::with_var_unset(CORS_ENV, || {
            assert!(cors_layer_from_env().is_ok());
        });
        temp_env::with_var(CORS_ENV, Some("http://localhost:5173"), || {
            assert!(cors_layer_from_env().is_ok());
        });
        temp_env::with_var(CORS_ENV, Some(""), || {
            assert!(cors_layer_from_env().is_err());
        });
    }
}
