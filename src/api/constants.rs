//! Endpoints and header values for the work-items service

/// Client-credentials token path on the identity server
pub const TOKEN_PATH: &str = "/connect/token";

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

pub const USER_AGENT: &str = "work-items-e2e/1.0";

pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const AUTHORIZATION: &str = "Authorization";

    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// The tags endpoint answers create calls with `text/plain` negotiation
    pub const ACCEPT_TEXT_PLAIN: &str = "text/plain";

    pub const ACCEPT_ANY: &str = "*/*";
}

/// Build the token endpoint URL
pub fn token_endpoint(identity_url: &str) -> String {
    format!("{}{}", identity_url.trim_end_matches('/'), TOKEN_PATH)
}

/// Build tenant tags collection endpoint URL
pub fn tags_endpoint(base_url: &str, tenant_id: &str) -> String {
    format!(
        "{}/tenants/{}/tags",
        base_url.trim_end_matches('/'),
        urlencoding::encode(tenant_id)
    )
}

/// Build event types reference data endpoint URL
pub fn event_types_endpoint(base_url: &str, tenant_id: &str) -> String {
    format!("{}/examples/event-types", tags_endpoint(base_url, tenant_id))
}

/// Build tag event endpoint URL
pub fn tag_event_endpoint(base_url: &str, tenant_id: &str, tag_id: &str) -> String {
    format!(
        "{}/{}/event",
        tags_endpoint(base_url, tenant_id),
        urlencoding::encode(tag_id)
    )
}
