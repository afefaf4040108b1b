// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial(env)]
fn config_path_prefers_env_override() {
    std::env::set_var("WKS_CONFIG", "/tmp/custom-wks.toml");
    assert_eq!(config_path(), Some(PathBuf::from("/tmp/custom-wks.toml")));
    std::env::remove_var("WKS_CONFIG");
}

#[test]
#[serial(env)]
fn config_path_ignores_empty_override() {
    std::env::set_var("WKS_CONFIG", "");
    let path = config_path();
    std::env::remove_var("WKS_CONFIG");
    if let Some(path) = path {
        assert!(path.ends_with("wks/config.toml"), "{}", path.display());
    }
}

#[test]
#[serial(env)]
fn plot_dir_defaults_to_temp_dir() {
    std::env::remove_var("WKS_PLOT_DIR");
    assert_eq!(plot_dir(), std::env::temp_dir());

    std::env::set_var("WKS_PLOT_DIR", "/tmp/wks-plots");
    assert_eq!(plot_dir(), PathBuf::from("/tmp/wks-plots"));
    std::env::remove_var("WKS_PLOT_DIR");
}
