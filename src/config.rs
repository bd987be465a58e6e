//! Configuration loading.
//!
//! The YAML file is read once into an immutable [`Config`] that the pipeline
//! owns. Naming templates only know a fixed set of placeholders and are
//! checked at load time, so a bad template never surfaces mid-run.

use crate::error::ConfigError;
use crate::models::{Group, GroupNames, Selector};
use crate::processing::{normalize_asn, ParsePolicy};
use clap::Parser;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Placeholders a naming template may use.
pub const TEMPLATE_FIELDS: [&str; 3] = ["name", "name_upper", "name_title"];

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("Invalid Regex"))
}

/// Route Subnets - Aggregate per-AS and per-service prefixes into lists and RouterOS scripts
#[derive(Parser, Debug, Clone)]
#[command(name = "route-subnets")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the YAML configuration file
    #[arg(default_value = "config.yaml", env = "SUBNETS_CONFIG")]
    pub config: PathBuf,

    /// Path to the log4rs configuration file
    #[arg(long, default_value = "log4rs.yml", env = "SUBNETS_LOG_CONFIG")]
    pub log_config: PathBuf,

    /// Always download the routing table, ignoring today's cache
    #[arg(long)]
    pub no_cache: bool,
}

/// RouterOS script dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterOsVersion {
    V6,
    V7,
}

impl RouterOsVersion {
    /// Sub-directory of `routeros_dir` the scripts are written to.
    pub fn dir_name(self) -> &'static str {
        match self {
            RouterOsVersion::V6 => "v6",
            RouterOsVersion::V7 => "v7",
        }
    }
}

/// Naming templates shared by all groups.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NameTemplates {
    #[serde(default = "default_file_template")]
    pub file: String,
    #[serde(default = "default_list_name_template")]
    pub list_name: String,
    #[serde(default = "default_comment_template")]
    pub comment: String,
}

/// Per-group replacements for the rendered templates.
#[derive(Debug, Clone, Default)]
pub struct NameOverrides {
    pub file: Option<String>,
    pub list_name: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AsEntry {
    pub name: String,
    #[serde(default)]
    pub legacy_copy: bool,
    pub file: Option<String>,
    pub list_name: Option<String>,
    pub comment: Option<String>,
}

impl AsEntry {
    pub fn overrides(&self) -> NameOverrides {
        NameOverrides {
            file: self.file.clone(),
            list_name: self.list_name.clone(),
            comment: self.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    pub name: String,
    pub urls: Vec<String>,
    #[serde(default)]
    pub legacy_copy: bool,
    pub file: Option<String>,
    pub list_name: Option<String>,
    pub comment: Option<String>,
}

impl ServiceEntry {
    pub fn overrides(&self) -> NameOverrides {
        NameOverrides {
            file: self.file.clone(),
            list_name: self.list_name.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// Configuration file structure (YAML format).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default = "default_bgp_tools_url")]
    pub bgp_tools_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Next hop for the policy routes in the RouterOS scripts.
    #[serde(default = "default_gateway")]
    pub gateway: Ipv4Addr,
    #[serde(default = "default_ipv4_dir")]
    pub ipv4_dir: PathBuf,
    /// IPv6 prefix lists are only written when this is set.
    #[serde(default)]
    pub ipv6_dir: Option<PathBuf>,
    #[serde(default = "default_routeros_dir")]
    pub routeros_dir: PathBuf,
    #[serde(default = "default_routeros_versions")]
    pub routeros_versions: Vec<RouterOsVersion>,
    #[serde(default)]
    pub table_parse_policy: ParsePolicy,
    /// Daily routing-table cache. No caching when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub name_templates: NameTemplates,
    #[serde(default)]
    pub as_numbers: BTreeMap<String, AsEntry>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceEntry>,
}

// Default value functions
fn default_bgp_tools_url() -> String {
    "https://bgp.tools/table.txt".to_string()
}
fn default_user_agent() -> String {
    format!("route-subnets/{}", env!("CARGO_PKG_VERSION"))
}
fn default_gateway() -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, 1)
}
fn default_ipv4_dir() -> PathBuf {
    PathBuf::from("Subnets/IPv4")
}
fn default_routeros_dir() -> PathBuf {
    PathBuf::from("RouterOS")
}
fn default_routeros_versions() -> Vec<RouterOsVersion> {
    vec![RouterOsVersion::V6, RouterOsVersion::V7]
}
fn default_file_template() -> String {
    "{name}.lst".to_string()
}
fn default_list_name_template() -> String {
    "{name_upper}".to_string()
}
fn default_comment_template() -> String {
    "{name_title} networks".to_string()
}

impl Default for NameTemplates {
    fn default() -> Self {
        NameTemplates {
            file: default_file_template(),
            list_name: default_list_name_template(),
            comment: default_comment_template(),
        }
    }
}

/// Upper-case the first character and lower-case the rest ("meta.LST" -> "Meta.lst").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Check that `template` only uses known placeholders.
pub fn validate_template(template: &str) -> Result<(), ConfigError> {
    for caps in get_placeholder_regex().captures_iter(template) {
        let field = &caps[1];
        if !TEMPLATE_FIELDS.contains(&field) {
            return Err(ConfigError::Invalid(format!(
                "unknown placeholder {{{field}}} in template '{template}', expected one of {TEMPLATE_FIELDS:?}"
            )));
        }
    }
    Ok(())
}

/// Fill a validated template for group `name`.
pub fn render_template(template: &str, name: &str) -> String {
    get_placeholder_regex()
        .replace_all(template, |caps: &regex::Captures| match &caps[1] {
            "name" => name.to_string(),
            "name_upper" => name.to_uppercase(),
            "name_title" => capitalize(name),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

impl NameTemplates {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_template(&self.file)?;
        validate_template(&self.list_name)?;
        validate_template(&self.comment)
    }

    /// Render the names of group `name`, applying its overrides.
    pub fn render(&self, name: &str, overrides: &NameOverrides) -> GroupNames {
        GroupNames {
            file: overrides
                .file
                .clone()
                .unwrap_or_else(|| render_template(&self.file, name)),
            list_name: overrides
                .list_name
                .clone()
                .unwrap_or_else(|| render_template(&self.list_name, name)),
            comment: overrides
                .comment
                .clone()
                .unwrap_or_else(|| render_template(&self.comment, name)),
        }
    }
}

/// Validated configuration passed to the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub bgp_tools_url: String,
    pub user_agent: String,
    pub gateway: Ipv4Addr,
    pub ipv4_dir: PathBuf,
    pub ipv6_dir: Option<PathBuf>,
    pub routeros_dir: PathBuf,
    pub routeros_versions: Vec<RouterOsVersion>,
    pub table_parse_policy: ParsePolicy,
    pub cache_dir: Option<PathBuf>,
    /// AS groups first (by AS number), then service groups (by key).
    pub groups: Vec<Group>,
}

impl Config {
    /// Read and validate the YAML configuration at `path`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        log::info!("Loading configuration from: {}", path.display());
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_yaml_str(&yaml)
    }

    /// Parse and validate a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Config, ConfigError> {
        let deserializer = serde_yaml_ng::Deserializer::from_str(yaml);
        let file: ConfigFile = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            ConfigError::Parse {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            }
        })?;
        Config::try_from(file)
    }

    /// Groups selecting by origin AS.
    pub fn as_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups
            .iter()
            .filter(|g| matches!(g.selector, Selector::Asn(_)))
    }

    /// Groups fed by ready-made lists.
    pub fn service_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups
            .iter()
            .filter(|g| matches!(g.selector, Selector::Source(_)))
    }
}

fn check_name(kind: &str, key: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{kind} '{key}' has an empty name")));
    }
    Ok(())
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Config, ConfigError> {
        if file.as_numbers.is_empty() && file.services.is_empty() {
            return Err(ConfigError::Invalid(
                "no as_numbers or services configured".to_string(),
            ));
        }
        file.name_templates.validate()?;

        let mut groups = Vec::with_capacity(file.as_numbers.len() + file.services.len());

        for (asn, entry) in &file.as_numbers {
            check_name("AS", asn, &entry.name)?;
            let asn = normalize_asn(asn);
            if asn.is_empty() {
                return Err(ConfigError::Invalid("empty AS number".to_string()));
            }
            groups.push(Group {
                key: asn.to_string(),
                name: entry.name.clone(),
                selector: Selector::Asn(asn.to_string()),
                names: file.name_templates.render(&entry.name, &entry.overrides()),
                legacy_copy: entry.legacy_copy,
            });
        }

        for (key, entry) in &file.services {
            check_name("service", key, &entry.name)?;
            if entry.urls.iter().all(|u| u.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("service '{key}' has no urls")));
            }
            groups.push(Group {
                key: key.clone(),
                name: entry.name.clone(),
                selector: Selector::Source(entry.urls.clone()),
                names: file.name_templates.render(&entry.name, &entry.overrides()),
                legacy_copy: entry.legacy_copy,
            });
        }

        let mut files = HashSet::new();
        let mut list_names = HashSet::new();
        for group in &groups {
            let names = &group.names;
            if names.file.is_empty() || names.file.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "group '{}' has invalid file name '{}'",
                    group.key, names.file
                )));
            }
            if names.list_name.is_empty() || names.list_name.contains(['/', '\\', ' ', '"']) {
                return Err(ConfigError::Invalid(format!(
                    "group '{}' has invalid list name '{}'",
                    group.key, names.list_name
                )));
            }
            if names.comment.contains('"') {
                return Err(ConfigError::Invalid(format!(
                    "group '{}' comment must not contain '\"'",
                    group.key
                )));
            }
            if !files.insert(names.file.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "file name '{}' used by more than one group",
                    names.file
                )));
            }
            if !list_names.insert(names.list_name.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "list name '{}' used by more than one group",
                    names.list_name
                )));
            }
        }

        let mut routeros_versions = file.routeros_versions;
        routeros_versions.sort();
        routeros_versions.dedup();

        Ok(Config {
            bgp_tools_url: file.bgp_tools_url,
            user_agent: file.user_agent,
            gateway: file.gateway,
            ipv4_dir: file.ipv4_dir,
            ipv6_dir: file.ipv6_dir,
            routeros_dir: file.routeros_dir,
            routeros_versions,
            table_parse_policy: file.table_parse_policy,
            cache_dir: file.cache_dir,
            groups,
        })
    }
}
