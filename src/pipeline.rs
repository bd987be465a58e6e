//! One run: fetch, classify, aggregate and write every configured group.

use crate::config::Config;
use crate::error::{FetchError, PrefixError};
use crate::fetch::{build_client, fetch_all, read_table};
use crate::models::{Group, GroupResult, Prefix, Selector};
use crate::output::{copy_legacy, write_prefix_list, GroupStatus, RouterOsScript, SummaryRow};
use crate::processing::{aggregate_as_group, aggregate_source_texts, parse_table};
use colored::Colorize;
use futures::future::join_all;
use reqwest::Client;
use std::error::Error;
use std::io;
use std::path::Path;

/// Owns the configuration and the HTTP client of a run.
pub struct Pipeline {
    config: Config,
    client: Client,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Pipeline, FetchError> {
        let client = build_client(&config.user_agent)?;
        Ok(Pipeline { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every group and return one summary row per group.
    ///
    /// Fails only when the routing table is needed but cannot be read, or holds
    /// a bad line under the `abort` policy. Everything else is per group.
    pub async fn run(&self, no_cache: bool) -> Result<Vec<SummaryRow>, Box<dyn Error>> {
        log::info!("#Start Pipeline::run()");
        self.create_output_dirs()?;

        let mut rows = Vec::with_capacity(self.config.groups.len());

        if self.config.as_groups().next().is_some() {
            let cache_dir = if no_cache {
                None
            } else {
                self.config.cache_dir.as_deref()
            };
            let table = read_table(&self.client, &self.config.bgp_tools_url, cache_dir).await?;
            rows.extend(self.process_table(&table)?);
        }

        rows.extend(self.process_services().await);

        log::info!(
            "#End Pipeline::run() {} groups, {} written",
            rows.len(),
            rows.iter()
                .filter(|r| r.status == GroupStatus::Written)
                .count()
        );
        Ok(rows)
    }

    /// Create the output directories up front.
    pub fn create_output_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.config.ipv4_dir)?;
        if let Some(dir) = &self.config.ipv6_dir {
            std::fs::create_dir_all(dir)?;
        }
        for version in &self.config.routeros_versions {
            std::fs::create_dir_all(self.config.routeros_dir.join(version.dir_name()))?;
        }
        Ok(())
    }

    /// Parse the routing table once and write every AS group from it.
    pub fn process_table(&self, table: &str) -> Result<Vec<SummaryRow>, PrefixError> {
        let records = parse_table(table, self.config.table_parse_policy)?;

        let rows = self
            .config
            .as_groups()
            .filter_map(|group| match &group.selector {
                Selector::Asn(asn) => {
                    let result = aggregate_as_group(&records, asn);
                    Some(self.finish_group(group, result))
                }
                Selector::Source(_) => None,
            })
            .collect();
        Ok(rows)
    }

    /// Fetch every service group concurrently, then write them in order.
    pub async fn process_services(&self) -> Vec<SummaryRow> {
        let services: Vec<(&Group, &[String])> = self
            .config
            .service_groups()
            .filter_map(|group| match &group.selector {
                Selector::Source(urls) => Some((group, urls.as_slice())),
                Selector::Asn(_) => None,
            })
            .collect();

        let fetched = join_all(
            services
                .iter()
                .map(|(_, urls)| fetch_all(&self.client, urls)),
        )
        .await;

        services
            .iter()
            .zip(fetched)
            .map(|((group, _), texts)| match texts {
                Ok(texts) => self.finish_group(group, aggregate_source_texts(&texts)),
                Err(e) => {
                    log::warn!("{} {group}: {e}", "Skipping".on_red());
                    let status = GroupStatus::Unavailable(e.to_string());
                    summary_row(group, &GroupResult::default(), status)
                }
            })
            .collect()
    }

    fn finish_group(&self, group: &Group, result: GroupResult) -> SummaryRow {
        let status = match self.write_group(group, &result) {
            Ok(status) => status,
            Err(e) => {
                log::error!("{} writing {group}: {e}", "Failed".on_red());
                GroupStatus::Failed(e.to_string())
            }
        };
        summary_row(group, &result, status)
    }

    /// Write the prefix lists and RouterOS scripts of one group.
    ///
    /// IPv4 lists and scripts need at least one IPv4 prefix. IPv6 lists need at
    /// least one IPv6 prefix and a configured `ipv6_dir`.
    pub fn write_group(&self, group: &Group, result: &GroupResult) -> io::Result<GroupStatus> {
        let ipv6_dir = self.config.ipv6_dir.as_deref();
        let writes_ipv6 = ipv6_dir.is_some() && !result.ipv6.is_empty();
        if result.ipv4.is_empty() && !writes_ipv6 {
            log::warn!("{} {group}: no prefixes", "Skipping".yellow());
            return Ok(GroupStatus::Empty);
        }

        log::info!(
            "Group {}: {} IPv4, {} IPv6 prefixes",
            group.name.on_blue(),
            result.ipv4.len(),
            result.ipv6.len()
        );

        if !result.ipv4.is_empty() {
            self.write_list(&self.config.ipv4_dir, group, &result.ipv4)?;
            for &version in &self.config.routeros_versions {
                RouterOsScript {
                    version,
                    list_name: &group.names.list_name,
                    comment: &group.names.comment,
                    gateway: self.config.gateway,
                    prefixes: &result.ipv4,
                }
                .write(&self.config.routeros_dir)?;
            }
        }

        if let Some(dir) = ipv6_dir.filter(|_| writes_ipv6) {
            self.write_list(dir, group, &result.ipv6)?;
        }
        Ok(GroupStatus::Written)
    }

    fn write_list(&self, dir: &Path, group: &Group, prefixes: &[Prefix]) -> io::Result<()> {
        let path = dir.join(&group.names.file);
        write_prefix_list(&path, prefixes)?;
        if group.legacy_copy {
            copy_legacy(&path)?;
        }
        Ok(())
    }
}

fn summary_row(group: &Group, result: &GroupResult, status: GroupStatus) -> SummaryRow {
    SummaryRow {
        group: group.name.clone(),
        list_name: group.names.list_name.clone(),
        ipv4: result.ipv4.len(),
        ipv6: result.ipv6.len(),
        status,
    }
}
