//! Integration tests for route-subnets
//!
//! These tests drive the public API from fixture files to written outputs,
//! without touching the network.

use route_subnets::{
    config::RouterOsVersion,
    models::{Prefix, Selector},
    output::{GroupStatus, RouterOsScript},
    processing::{
        aggregate, aggregate_as_group, aggregate_source_texts, classify_by_as, parse_table,
        ParsePolicy,
    },
    Config, Pipeline,
};
use std::path::{Path, PathBuf};

const TABLE_FILE: &str = "src/tests/test_data/table_sample.txt";
const LIST_FILE: &str = "src/tests/test_data/list_sample.txt";
const CONFIG_FILE: &str = "src/tests/test_data/config_sample.yaml";

fn read_fixture(path: &str) -> String {
    std::fs::read_to_string(path).expect("Failed to read fixture")
}

fn shown(prefixes: &[Prefix]) -> Vec<String> {
    prefixes.iter().map(|p| p.to_string()).collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "route-subnets-it-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_table_fixture_skips_invalid_lines() {
    let records = parse_table(&read_fixture(TABLE_FILE), ParsePolicy::Skip)
        .expect("Skip policy never fails");
    assert_eq!(records.len(), 17, "Expected 17 valid records");

    let err = parse_table(&read_fixture(TABLE_FILE), ParsePolicy::Abort).unwrap_err();
    assert_eq!(err.token(), "999.0.0.0/8");
}

#[test]
fn test_classify_and_aggregate_meta() {
    let records = parse_table(&read_fixture(TABLE_FILE), ParsePolicy::Skip).unwrap();

    let (ipv4, ipv6) = classify_by_as(&records, "32934");
    assert_eq!(ipv4.len(), 7);
    assert_eq!(ipv6.len(), 3);

    assert_eq!(
        shown(&aggregate(&ipv4)),
        vec![
            "31.13.24.0/21",
            "31.13.64.0/18",
            "129.134.0.0/17",
            "157.240.0.0/16"
        ]
    );
    assert_eq!(shown(&aggregate(&ipv6)), vec!["2a03:2880::/31"]);
}

#[test]
fn test_as_group_with_prefix_notation() {
    let records = parse_table(&read_fixture(TABLE_FILE), ParsePolicy::Skip).unwrap();

    let twitter = aggregate_as_group(&records, "13414");
    assert_eq!(shown(&twitter.ipv4), vec!["104.244.42.0/23"]);
    assert_eq!(shown(&twitter.ipv6), vec!["2606:1f80::/32"]);

    assert!(aggregate_as_group(&records, "64512").is_empty());
}

#[test]
fn test_ready_made_list() {
    let result = aggregate_source_texts(&[read_fixture(LIST_FILE)]);
    assert_eq!(
        shown(&result.ipv4),
        vec!["91.108.4.0/22", "91.108.8.0/21", "149.154.160.0/20"]
    );
    assert_eq!(
        shown(&result.ipv6),
        vec!["2001:67c:4e8::/48", "2001:b28:f23c::/47"]
    );
}

#[test]
fn test_load_config_fixture() {
    let config = Config::load(Path::new(CONFIG_FILE)).expect("Failed to load config");

    assert_eq!(config.gateway.to_string(), "192.168.88.1");
    assert_eq!(config.ipv6_dir, Some(PathBuf::from("Subnets/IPv6")));
    assert_eq!(config.cache_dir, Some(PathBuf::from("cache")));
    assert_eq!(config.groups.len(), 3);

    let twitter = config.as_groups().find(|g| g.name == "twitter").unwrap();
    assert_eq!(twitter.names.comment, "X networks");
    assert_eq!(twitter.names.list_name, "TWITTER");

    let telegram = config.service_groups().next().unwrap();
    assert!(matches!(&telegram.selector, Selector::Source(urls) if urls.len() == 1));
    assert!(telegram.legacy_copy);
}

#[test]
fn test_missing_config_file() {
    assert!(Config::load(Path::new("src/tests/test_data/does_not_exist.yaml")).is_err());
}

#[test]
fn test_full_table_run_writes_files() {
    let dir = scratch_dir("full");
    let yaml = format!(
        r#"
gateway: 192.168.88.1
ipv4_dir: {dir}/Subnets/IPv4
ipv6_dir: {dir}/Subnets/IPv6
routeros_dir: {dir}/RouterOS
as_numbers:
  "32934": {{ name: meta, legacy_copy: true }}
  "13414": {{ name: twitter }}
  "15169": {{ name: google }}
"#,
        dir = dir.display()
    );
    let pipeline = Pipeline::new(Config::from_yaml_str(&yaml).unwrap()).unwrap();
    pipeline.create_output_dirs().unwrap();

    let rows = pipeline
        .process_table(&read_fixture(TABLE_FILE))
        .expect("Skip policy never fails");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.status == GroupStatus::Written));

    let meta_v4 = std::fs::read_to_string(dir.join("Subnets/IPv4/meta.lst")).unwrap();
    assert_eq!(
        meta_v4,
        "31.13.24.0/21\n31.13.64.0/18\n129.134.0.0/17\n157.240.0.0/16\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.join("Subnets/IPv4/Meta.lst")).unwrap(),
        meta_v4
    );
    assert_eq!(
        std::fs::read_to_string(dir.join("Subnets/IPv6/Meta.lst")).unwrap(),
        "2a03:2880::/31\n"
    );
    assert!(!dir.join("Subnets/IPv4/Twitter.lst").exists());

    // google has no IPv6 in the table
    assert!(dir.join("Subnets/IPv4/google.lst").exists());
    assert!(!dir.join("Subnets/IPv6/google.lst").exists());

    let v6 = std::fs::read_to_string(dir.join("RouterOS/v6/TWITTER.rsc")).unwrap();
    assert_eq!(
        v6.lines().next().unwrap(),
        r#":do { /ip firewall address-list add address=104.244.42.0/23 list=TWITTER comment="Twitter networks" } on-error={}"#
    );
    assert!(v6.contains("gateway=192.168.88.1 routing-mark=\"R_TWITTER\""));

    let v7 = std::fs::read_to_string(dir.join("RouterOS/v7/META.rsc")).unwrap();
    assert_eq!(
        v7.lines()
            .filter(|l| l.contains("/ip/firewall/address-list add"))
            .count(),
        4
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_script_matches_rendered_file() {
    let dir = scratch_dir("script");
    let prefixes: Vec<Prefix> = vec!["91.108.4.0/22".parse().unwrap()];
    let script = RouterOsScript {
        version: RouterOsVersion::V7,
        list_name: "TELEGRAM",
        comment: "Telegram networks",
        gateway: "192.168.88.1".parse().unwrap(),
        prefixes: &prefixes,
    };

    let path = script.write(&dir).unwrap();
    assert_eq!(path, dir.join("v7/TELEGRAM.rsc"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), script.to_string());

    std::fs::remove_dir_all(&dir).unwrap();
}
