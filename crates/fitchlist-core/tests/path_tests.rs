use fitchlist_core::*;
use std::env;
use std::path::PathBuf;

#[test]
fn test_resolve_data_dir_priority() -> Result<()> {
    // Env-var mutation stays inside one test so parallel tests never race on it.
    unsafe {
        env::set_var("FITCHLIST_PATH", "/env/fitchlist");
    }

    let explicit = resolve_data_dir(Some("/explicit/fitchlist"))?;
    assert_eq!(explicit, PathBuf::from("/explicit/fitchlist"));

    let from_env = resolve_data_dir(None)?;
    assert_eq!(from_env, PathBuf::from("/env/fitchlist"));

    unsafe {
        env::remove_var("FITCHLIST_PATH");
    }

    let fallback = resolve_data_dir(None)?;
    assert!(fallback.ends_with("fitchlist") || fallback.ends_with(".fitchlist"));
    Ok(())
}

#[test]
fn test_expand_tilde_uses_home() {
    let Some(home) = env::var_os("HOME") else {
        return;
    };
    assert_eq!(
        expand_tilde("~/.fitchlist"),
        PathBuf::from(home).join(".fitchlist")
    );
    assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
}

#[test]
fn test_storage_key_differs_per_server() {
    let local = storage_key("modules", "http://localhost:3000/api/modules");
    let remote = storage_key("modules", "https://fitchfork.example.com/api/modules");
    assert_ne!(local, remote);
}
