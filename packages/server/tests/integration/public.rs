use serde_json::json;

use crate::common::{TestApp, release, routes};

mod versions {
    use super::*;

    #[tokio::test]
    async fn listing_is_empty_before_anything_is_published() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::VERSIONS, &json!({})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({}));
    }

    #[tokio::test]
    async fn listing_follows_publication_order() {
        let app = TestApp::spawn().await;
        app.publish(json!({
            "windows": release("Windows", "1.0", "app.msi"),
            "macos": release("macOS", "1.0", "app.dmg"),
            "linux": release("Linux", "1.0", "app.deb"),
        }))
        .await;

        let res = app.post_without_token(routes::VERSIONS, &json!({})).await;

        assert_eq!(res.status, 200);
        let windows = res.text.find("\"windows\"").unwrap();
        let macos = res.text.find("\"macos\"").unwrap();
        let linux = res.text.find("\"linux\"").unwrap();
        assert!(windows < macos && macos < linux, "unexpected order: {}", res.text);
        assert_eq!(res.body["macos"]["name"], "macOS");
        assert_eq!(
            res.body["linux"]["download_url"],
            "https://downloads.example.com/app.deb"
        );
    }

    #[tokio::test]
    async fn listing_returns_every_field() {
        let app = TestApp::spawn().await;
        app.publish(json!({ "linux": release("Linux", "2.1", "app.deb") }))
            .await;

        let res = app.post_without_token(routes::VERSIONS, &json!({})).await;

        let linux = res.body["linux"].as_object().unwrap();
        let mut keys: Vec<&str> = linux.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["download_url", "name", "payload_url", "shasum", "version"]
        );
    }
}

mod eula {
    use super::*;

    #[tokio::test]
    async fn eula_is_empty_until_published() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::EULA, &json!({})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"version": "", "text": ""}));
    }
}

mod assets {
    use super::*;

    #[tokio::test]
    async fn widget_script_is_served_as_javascript() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::WIDGET_SCRIPT).await;

        assert_eq!(res.status, 200);
        assert!(
            res.content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("text/javascript"))
        );
        assert!(res.text.contains("release-tracker-platform-select"));
    }

    #[tokio::test]
    async fn openapi_document_lists_admin_actions() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::OPENAPI).await;

        assert_eq!(res.status, 200);
        assert!(res.body["paths"][routes::UPDATE_VERSION_DATA].is_object());
        assert!(res.body["paths"][routes::UPDATE_EULA].is_object());
    }
}
