fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pagesync_protocol::{
        ApiResponse, Deployment, EnvelopeError, Fingerprint, HashesRequest, ProjectInfo,
        UploadEntry, UploadToken,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    fn decode<T: serde::de::DeserializeOwned>(name: &str) -> T {
        serde_json::from_value(load_fixture(name))
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"))
    }

    /// Deserializes a request fixture, re-serializes it, and compares the
    /// JSON values. Request bodies must be reproduced exactly.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  ours: {reserialized}"
        );
    }

    // --- Responses ---

    #[test]
    fn fixture_project_response() {
        let project = decode::<ApiResponse<ProjectInfo>>("project_response.json")
            .into_result()
            .unwrap();
        assert_eq!(project.name, "site");
        assert_eq!(project.subdomain, "site.pages.dev");
        assert_eq!(project.production_branch, "main");
    }

    #[test]
    fn fixture_upload_token_response() {
        let token = decode::<ApiResponse<UploadToken>>("upload_token_response.json")
            .into_result()
            .unwrap();
        assert!(token.jwt.starts_with("eyJ"));
    }

    #[test]
    fn fixture_check_missing_response() {
        let missing = decode::<ApiResponse<Vec<Fingerprint>>>("check_missing_response.json")
            .into_result()
            .unwrap();
        assert_eq!(missing.len(), 2);
        for fp in &missing {
            assert!(Fingerprint::parse(fp.as_str()).is_ok(), "bad fingerprint {fp}");
        }
    }

    #[test]
    fn fixture_upsert_hashes_response() {
        let resp = decode::<ApiResponse<serde_json::Value>>("upsert_hashes_response.json");
        assert!(resp.success);
        resp.into_unit().unwrap();
    }

    #[test]
    fn fixture_preview_deployment_response() {
        let deployment = decode::<ApiResponse<Deployment>>("deployment_response.json")
            .into_result()
            .unwrap();
        assert_eq!(deployment.url, "https://f64788e9.site.pages.dev");
        assert!(!deployment.is_production());
        assert_eq!(
            deployment.aliases.as_deref(),
            Some(&["https://feature-login.site.pages.dev".to_string()][..])
        );
        assert_eq!(deployment.deployment_trigger.trigger_type, "ad_hoc");
        assert_eq!(deployment.deployment_trigger.metadata.branch, "feature/login");
        assert!(deployment.created_on.is_some());
    }

    #[test]
    fn fixture_production_deployment_response() {
        let deployment = decode::<ApiResponse<Deployment>>("production_deployment_response.json")
            .into_result()
            .unwrap();
        assert!(deployment.is_production());
        assert!(deployment.aliases.is_none());
    }

    #[test]
    fn fixture_error_response() {
        let resp = decode::<ApiResponse<ProjectInfo>>("error_response.json");
        assert!(!resp.success);
        assert!(resp.error_summary().starts_with("[8000007] Project not found"));
        match resp.into_result() {
            Err(EnvelopeError::Rejected(msg)) => assert!(msg.contains("8000007")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    // --- Requests ---

    #[test]
    fn fixture_hashes_request() {
        roundtrip_test::<HashesRequest>("hashes_request.json");
    }

    #[test]
    fn fixture_upload_request() {
        roundtrip_test::<Vec<UploadEntry>>("upload_request.json");

        let entries: Vec<UploadEntry> = decode("upload_request.json");
        assert_eq!(entries[0].value, b"<h1>home</h1>");
        assert_eq!(entries[1].metadata.content_type, "text/css");
    }
}
