// ABOUTME: Integration tests for runtime settings resolution.
// ABOUTME: Tests ITZ_PODMAN_PATH handling and explicit overrides.

use atkmod::config::{RUNTIME_PATH_ENV, RuntimeSettings};
use atkmod::manifest::ImageInfo;
use std::path::PathBuf;

mod environment {
    use super::*;

    #[test]
    fn unset_variable_uses_default_podman() {
        temp_env::with_var_unset(RUNTIME_PATH_ENV, || {
            let settings = RuntimeSettings::from_env();
            assert_eq!(settings.runtime_path, None);
            assert_eq!(
                settings.command_builder().build(),
                "/usr/local/bin/podman run"
            );
        });
    }

    #[test]
    fn variable_overrides_runtime_path() {
        temp_env::with_var(RUNTIME_PATH_ENV, Some("/usr/bin/podman"), || {
            let settings = RuntimeSettings::from_env();
            assert_eq!(settings.runtime_path.as_deref(), Some("/usr/bin/podman"));
            assert_eq!(settings.command_builder().build(), "/usr/bin/podman run");
        });
    }

    #[test]
    fn blank_variable_is_ignored() {
        temp_env::with_var(RUNTIME_PATH_ENV, Some("  "), || {
            assert_eq!(RuntimeSettings::from_env().runtime_path, None);
        });
    }

    #[test]
    fn explicit_path_beats_environment() {
        temp_env::with_var(RUNTIME_PATH_ENV, Some("/usr/bin/podman"), || {
            let settings = RuntimeSettings::from_env().runtime_path(Some("docker".to_string()));
            assert_eq!(settings.runtime_path.as_deref(), Some("docker"));
        });
    }

    #[test]
    fn missing_explicit_path_keeps_environment() {
        temp_env::with_var(RUNTIME_PATH_ENV, Some("/usr/bin/podman"), || {
            let settings = RuntimeSettings::from_env().runtime_path(None);
            assert_eq!(settings.runtime_path.as_deref(), Some("/usr/bin/podman"));
        });
    }
}

mod runner {
    use super::*;

    #[test]
    fn workspace_and_flags_reach_the_command_line() {
        let settings = RuntimeSettings::default()
            .runtime_path(Some("/usr/bin/podman".to_string()))
            .workspace(Some(PathBuf::from("/home/myuser/workdir")))
            .flags(vec!["--rm".to_string()]);

        let cmd = settings
            .runner()
            .builder()
            .build_from(&ImageInfo::new("localhost/myimage"))
            .unwrap();

        assert_eq!(
            cmd,
            "/usr/bin/podman run --rm -v /home/myuser/workdir:/workspace localhost/myimage"
        );
    }
}
