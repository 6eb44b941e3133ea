//! Dev-mode manifest emission through the gantry binary.

mod common;

use common::TestEnv;
use serde_json::json;

#[test]
fn dev_manifest_points_entries_at_the_dev_server() {
    let env = TestEnv::new();
    env.write_file(
        "gantry.toml",
        &format!(
            r#"
root = "{root}"

[entries]
app = "./assets/app.js"
theme = "./assets/theme.scss"
"#,
            root = env.root_str()
        ),
    );

    let result = env.run(&["dev", "--origin", "http://127.0.0.1:5173"]);
    assert!(result.success, "dev failed:\n{}", result.combined_output());

    let manifest = env.read_manifest();
    assert_eq!(manifest["base"], json!("/build/"));
    assert_eq!(manifest["legacy"], json!(false));
    assert_eq!(manifest["metadatas"], json!({}));
    assert_eq!(manifest["devServerOrigin"], json!("http://127.0.0.1:5173"));
    assert_eq!(
        manifest["entryPoints"]["app"],
        json!({
            "css": [],
            "dynamic": [],
            "js": ["http://127.0.0.1:5173/build/assets/app.js"],
            "legacy": false,
            "preload": []
        })
    );
    assert_eq!(
        manifest["entryPoints"]["theme"]["css"],
        json!(["http://127.0.0.1:5173/build/assets/theme.scss"])
    );
}

#[test]
fn dev_mode_never_hashes() {
    let env = TestEnv::new();
    env.write_file(
        "gantry.toml",
        &format!(
            r#"
root = "{root}"
sri_algorithm = "sha512"

[entries]
app = "./assets/app.js"
"#,
            root = env.root_str()
        ),
    );

    let result = env.run(&["dev", "--origin", "http://127.0.0.1:5173"]);
    assert!(result.success, "dev failed:\n{}", result.combined_output());

    let manifest = env.read_manifest();
    assert_eq!(manifest["metadatas"], json!({}));
}
