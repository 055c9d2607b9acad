// ABOUTME: Integration tests for loading install manifests from disk.
// ABOUTME: Covers supported and unsupported apiVersion/kind values and the image descriptors.

use atkmod::error::Error;
use atkmod::hooks::Hook;
use atkmod::lifecycle::Stage;
use atkmod::manifest::{ManifestFileLoader, ModuleInfo, ModuleLoader};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> ModuleInfo {
    ManifestFileLoader::new().load(&fixture(name)).unwrap()
}

mod support {
    use super::*;

    #[test]
    fn supported_manifest() {
        let module = load("module3.yml");
        assert_eq!(module.api_version, "itzcli/v1alpha1");
        assert_eq!(module.kind, "InstallManifest");
        assert!(module.is_supported());
    }

    #[test]
    fn unsupported_version() {
        let module = load("module5.yml");
        assert_eq!(module.api_version, "itzcli/v1beta1");
        assert_eq!(module.kind, "InstallManifest");
        assert!(!module.is_supported_version());
        assert!(!module.is_supported());
    }

    #[test]
    fn unsupported_namespace() {
        let module = load("module6.yml");
        assert_eq!(module.api_version, "itzinator/v1alpha1");
        assert_eq!(module.kind, "InstallManifest");
        assert!(!module.is_supported());
    }

    #[test]
    fn unsupported_kind() {
        let module = load("module7.yml");
        assert_eq!(module.api_version, "itzcli/v1alpha1");
        assert_eq!(module.kind, "NeatoFile");
        assert!(module.is_supported_version());
        assert!(!module.is_supported_kind());
        assert!(!module.is_supported());
    }

    #[test]
    fn load_supported_rejects_unsupported_version() {
        let err = ManifestFileLoader::new()
            .load_supported(&fixture("module5.yml"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(ref v) if v == "itzcli/v1beta1"));
        assert_eq!(err.to_string(), "module version itzcli/v1beta1 is not supported");
    }

    #[test]
    fn load_supported_rejects_unsupported_kind() {
        let err = ManifestFileLoader::new()
            .load_supported(&fixture("module7.yml"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(ref k) if k == "NeatoFile"));
    }
}

mod contents {
    use super::*;

    #[test]
    fn hooks_and_lifecycle_images() {
        let module = load("module1.yml");
        assert_eq!(module.api_version, "itzcli/v1alpha1");
        assert_eq!(module.kind, "InstallManifest");
        assert_eq!(module.metadata.name, "ocp-base-project");
        assert_eq!(module.metadata.labels.get("tier").map(String::as_str), Some("base"));

        let list = module.hook_image(Hook::List);
        assert_eq!(list.image, "something/parameter-lister:latest");
        assert_eq!(list.env[0].name, "MY_PROJECT_NAME");
        assert_eq!(list.env[0].value, "my-base-project");

        assert_eq!(
            module.hook_image(Hook::Validate).image,
            "something/parameter-validator:latest"
        );
        assert_eq!(
            module.hook_image(Hook::GetState).image,
            "something/get-stater:latest"
        );
        assert_eq!(
            module.stage_image(Stage::PreDeploy).image,
            "something/pre-deployer:latest"
        );
        assert_eq!(
            module.stage_image(Stage::PostDeploy).image,
            "something/post-deployer:latest"
        );

        let deploy = module.stage_image(Stage::Deploy);
        assert_eq!(deploy.image, "something/deployer:latest");
        assert_eq!(deploy.args, vec!["--apply".to_string()]);
        assert_eq!(deploy.volume_mounts[0].name, "/tmp/data");
        assert_eq!(deploy.volume_mounts[0].mount_path, "/var/app/db");
    }

    #[test]
    fn command_override_is_parsed() {
        let module = load("module4.yml");
        let pre_deploy = module.stage_image(Stage::PreDeploy);
        assert!(pre_deploy.has_command());
        assert_eq!(pre_deploy.command, vec!["echo", "pre deploying..."]);
    }

    #[test]
    fn survives_a_yaml_round_trip() {
        let module = load("module1.yml");
        let yaml = serde_yaml::to_string(&module).unwrap();
        assert_eq!(ModuleInfo::from_yaml(&yaml).unwrap(), module);
    }

    #[test]
    fn json_manifests_load_too() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("module.json");
        fs::write(
            &path,
            r#"{"apiVersion": "itzcli/v1alpha1", "kind": "InstallManifest",
                "spec": {"lifecycle": {"deploy": {"image": "localhost/deployer"}}}}"#,
        )
        .unwrap();

        let module = ManifestFileLoader::new().load(&path).unwrap();
        assert!(module.is_supported());
        assert_eq!(module.stage_image(Stage::Deploy).image, "localhost/deployer");
        assert!(module.hook_image(Hook::List).image.is_empty());
    }
}

mod errors {
    use super::*;

    #[test]
    fn missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nope.yml");

        let err = ManifestFileLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound(ref p) if *p == path));
    }

    #[test]
    fn malformed_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.yml");
        fs::write(&path, "apiVersion: [unterminated").unwrap();

        let err = ManifestFileLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
