use serde_json::json;

use crate::common::{SHASUM, TestApp, release, routes};

const MAC_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko)";
const WINDOWS_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const BOT_AGENT: &str = "curl/8.5.0";

async fn app_with_releases() -> TestApp {
    let app = TestApp::spawn().await;
    app.publish(json!({
        "windows-x64": release("Windows", "1.4", "app.msi"),
        "macos-universal": release("macOS", "1.4", "app.dmg"),
        "linux": release("", "1.3", "app.deb"),
    }))
    .await;
    app
}

mod text_shortcodes {
    use super::*;

    #[tokio::test]
    async fn release_version_for_platform() {
        let app = app_with_releases().await;

        let res = app
            .get(&format!("{}?platform=linux", routes::shortcode("release-version")))
            .await;

        assert_eq!(res.status, 200);
        assert!(
            res.content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("text/html"))
        );
        assert_eq!(res.text, "1.3");
    }

    #[tokio::test]
    async fn download_url_and_shasum_for_platform() {
        let app = app_with_releases().await;

        let url = app
            .get(&format!("{}?platform=macos-universal", routes::shortcode("download-url")))
            .await;
        let shasum = app
            .get(&format!("{}?platform=macos-universal", routes::shortcode("shasum")))
            .await;

        assert_eq!(url.text, "https://downloads.example.com/app.dmg");
        assert_eq!(shasum.text, SHASUM);
    }

    #[tokio::test]
    async fn platform_attribute_is_required() {
        let app = app_with_releases().await;

        for name in ["release-version", "download-url", "shasum"] {
            let res = app.get(&routes::shortcode(name)).await;
            assert_eq!(res.status, 200);
            assert_eq!(res.text, "<strong>Missing platform</strong>", "{name}");
        }
    }

    #[tokio::test]
    async fn eula_version_is_escaped_and_text_is_not() {
        let app = TestApp::spawn().await;
        app.records.set_eula_version("1 & 2").await.unwrap();
        app.records.set_eula_text("<p>Terms</p>").await.unwrap();

        let version = app.get(&routes::shortcode("eula-version")).await;
        let text = app.get(&routes::shortcode("eula-text")).await;

        assert_eq!(version.text, "1 &amp; 2");
        assert_eq!(text.text, "<p>Terms</p>");
    }

    #[tokio::test]
    async fn unknown_shortcode_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::shortcode("release-notes")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod download_button {
    use super::*;

    #[tokio::test]
    async fn mac_agent_preselects_the_mac_build() {
        let app = app_with_releases().await;

        let res = app
            .get_with_agent(&routes::shortcode("download-button"), MAC_AGENT)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.text.contains("<option value=\"macos-universal\" selected>macOS</option>"));
        assert!(res.text.contains("<option value=\"-\">Select your platform</option>"));
        assert!(res.text.contains(&format!(
            "<code id=\"release-tracker-shasum\">{SHASUM}</code>"
        )));
    }

    #[tokio::test]
    async fn windows_agent_preselects_the_windows_build() {
        let app = app_with_releases().await;

        let res = app
            .get_with_agent(&routes::shortcode("download-button"), WINDOWS_AGENT)
            .await;

        assert!(res.text.contains("<option value=\"windows-x64\" selected>"));
    }

    #[tokio::test]
    async fn unknown_agent_keeps_the_placeholder() {
        let app = app_with_releases().await;

        let res = app
            .get_with_agent(&routes::shortcode("download-button"), BOT_AGENT)
            .await;

        assert!(res.text.contains("<option value=\"-\" selected>"));
        assert!(!res.text.contains("\" selected>Windows"));
        assert!(res.text.contains("<code id=\"release-tracker-shasum\"></code>"));
    }

    #[tokio::test]
    async fn unnamed_platform_is_labelled_by_id() {
        let app = app_with_releases().await;

        let res = app
            .get_with_agent(&routes::shortcode("download-button"), BOT_AGENT)
            .await;

        assert!(res.text.contains("<option value=\"linux\">linux</option>"));
    }

    #[tokio::test]
    async fn captions_can_be_overridden() {
        let app = app_with_releases().await;

        let res = app
            .get_with_agent(
                &format!(
                    "{}?button_text=Get%20it&shasum_caption=Checksum&select_prompt=Pick%20one",
                    routes::shortcode("download-button")
                ),
                BOT_AGENT,
            )
            .await;

        assert!(res.text.contains(">Get it</button>"));
        assert!(res.text.contains(">Checksum</span>"));
        assert!(res.text.contains("<option value=\"-\" selected>Pick one</option>"));
    }

    #[tokio::test]
    async fn embedded_table_covers_every_platform() {
        let app = app_with_releases().await;

        let res = app
            .get_with_agent(&routes::shortcode("download-button"), BOT_AGENT)
            .await;

        let marker = "id=\"release-tracker-platform-data\">";
        let start = res.text.find(marker).unwrap() + marker.len();
        let end = res.text[start..].find("</script>").unwrap() + start;
        let data: serde_json::Value = serde_json::from_str(&res.text[start..end]).unwrap();
        assert_eq!(
            data["windows-x64"]["download_url"],
            "https://downloads.example.com/app.msi"
        );
        assert_eq!(data["linux"]["shasum"], SHASUM);
        assert!(res.text.contains("<script src=\"/assets/download-button.js\" defer>"));
    }
}
