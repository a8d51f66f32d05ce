use ambassadors::{normalize_account, RunConfig};
use std::collections::HashMap;
use std::path::PathBuf;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let m: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |k: &str| m.get(k).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = RunConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.account, "lacoste");
    assert_eq!(cfg.num_posts, 10);
    assert_eq!(cfg.top_n, 5);
    assert_eq!(cfg.snapshot_dir, Some(PathBuf::from("./posts_folder")));
}

#[test]
fn reads_all_keys() {
    let cfg = RunConfig::from_lookup(lookup(&[
        ("INSTAGRAM_USER", " @nike "),
        ("NUM_POSTS", "25"),
        ("NB_AMBASSADORS", "3"),
        ("SNAPSHOT_DIR", ""),
        ("RESULTS_DIR", "out"),
    ]))
    .unwrap();
    assert_eq!(cfg.account, "nike");
    assert_eq!(cfg.num_posts, 25);
    assert_eq!(cfg.top_n, 3);
    assert_eq!(cfg.snapshot_dir, None);
    assert_eq!(cfg.results_dir, PathBuf::from("out"));
}

#[test]
fn bad_counts_are_errors() {
    let err = RunConfig::from_lookup(lookup(&[("NUM_POSTS", "ten")])).unwrap_err();
    assert!(format!("{err:#}").contains("NUM_POSTS"));
    assert!(RunConfig::from_lookup(lookup(&[("NB_AMBASSADORS", "-1")])).is_err());
}

#[test]
fn account_normalization() {
    assert_eq!(normalize_account("  @brand"), "brand");
    assert_eq!(normalize_account("brand"), "brand");
}

/// Env files written for the older tool use `NB_AMBASSADEURS`; the newer key wins when both are set.
#[test]
fn legacy_top_n_key_is_accepted() {
    let cfg = RunConfig::from_lookup(lookup(&[("NB_AMBASSADEURS", "12")])).unwrap();
    assert_eq!(cfg.top_n, 12);

    let cfg = RunConfig::from_lookup(lookup(&[("NB_AMBASSADEURS", "12"), ("NB_AMBASSADORS", "4")])).unwrap();
    assert_eq!(cfg.top_n, 4);

    let err = RunConfig::from_lookup(lookup(&[("NB_AMBASSADEURS", "x")])).unwrap_err();
    assert!(format!("{err:#}").contains("NB_AMBASSADEURS"));
}
