//! Deterministic names for every artifact the orchestrator creates.
//! Centralized here so the lifecycle driver, the ledger, and `inspect`
//! agree on what belongs to what without re-deriving the scheme.

/// `forge-network-<appName>` — one per application.
pub fn network_name(app_name: &str) -> String {
    format!("forge-network-{app_name}")
}

/// `forge-<appName>-<serviceName>-<8 hex chars>` — the random suffix
/// avoids a name collision on restart before the ledger row for the old
/// container has been removed.
pub fn container_name(app_name: &str, service_name: &str) -> String {
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..8];
    format!("forge-{app_name}-{service_name}-{suffix}")
}

/// `forge-image-<appName>-<serviceName>:latest` — deterministic, so a
/// re-run of Apply without an explicit Build reuses the last built image.
pub fn image_tag(app_name: &str, service_name: &str) -> String {
    format!("forge-image-{app_name}-{service_name}:latest")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_tag_is_deterministic() {
        assert_eq!(image_tag("demo", "api"), image_tag("demo", "api"));
        assert_eq!(image_tag("demo", "api"), "forge-image-demo-api:latest");
    }

    #[test]
    fn container_name_has_fresh_suffix() {
        let a = container_name("demo", "api");
        let b = container_name("demo", "api");
        assert_ne!(a, b);
        assert!(a.starts_with("forge-demo-api-"));
    }

    #[test]
    fn network_name_is_scoped_to_app() {
        assert_eq!(network_name("demo"), "forge-network-demo");
    }
}
