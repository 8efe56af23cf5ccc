use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Connect API",
        version = "0.1.0",
        description = "Community event listings: create, join, filter and search events"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = domain_events::entity::Model::URL, api = domain_events::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_paths_are_nested() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/events",
            "/events/{id}",
            "/events/{id}/join",
            "/events/search",
            "/events/filter",
        ] {
            assert!(paths.contains_key(path), "missing {path} in {:?}", paths.keys());
        }
    }
}
