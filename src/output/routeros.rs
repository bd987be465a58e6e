//! RouterOS address-list and policy-routing scripts.
//!
//! One `.rsc` script per group and RouterOS version: an address-list entry per
//! IPv4 prefix, then a block that adds the mark-routing mangle rule and the
//! route through the gateway unless they already exist. Every command is
//! wrapped in `:do {} on-error={}` so a script can be imported repeatedly.

use crate::config::RouterOsVersion;
use crate::models::Prefix;
use std::fmt;
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Command paths of one RouterOS dialect.
struct Paths {
    address_list: &'static str,
    mangle: &'static str,
    route: &'static str,
}

fn paths(version: RouterOsVersion) -> Paths {
    match version {
        RouterOsVersion::V6 => Paths {
            address_list: "/ip firewall address-list",
            mangle: "/ip firewall mangle",
            route: "/ip route",
        },
        RouterOsVersion::V7 => Paths {
            address_list: "/ip/firewall/address-list",
            mangle: "/ip/firewall/mangle",
            route: "/ip/route",
        },
    }
}

/// Script for one group in one RouterOS dialect. Render with `to_string()`.
#[derive(Debug, Clone)]
pub struct RouterOsScript<'a> {
    pub version: RouterOsVersion,
    pub list_name: &'a str,
    pub comment: &'a str,
    pub gateway: Ipv4Addr,
    /// IPv4 prefixes only.
    pub prefixes: &'a [Prefix],
}

impl RouterOsScript<'_> {
    /// Routing mark / routing table name used for the list.
    pub fn routing_mark(&self) -> String {
        format!("R_{}", self.list_name)
    }

    /// Script path below `routeros_dir`: `<dir>/<v6|v7>/<list_name>.rsc`.
    pub fn path(&self, routeros_dir: &Path) -> PathBuf {
        routeros_dir
            .join(self.version.dir_name())
            .join(format!("{}.rsc", self.list_name))
    }

    /// Render and write the script, returning its path.
    pub fn write(&self, routeros_dir: &Path) -> io::Result<PathBuf> {
        let path = self.path(routeros_dir);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, self.to_string())?;
        log::debug!("Wrote RouterOS script {}", path.display());
        Ok(path)
    }
}

impl fmt::Display for RouterOsScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths = paths(self.version);
        let list = self.list_name;
        let mark = self.routing_mark();
        let gateway = self.gateway;

        for prefix in self.prefixes.iter().filter(|p| p.is_ipv4()) {
            writeln!(
                f,
                ":do {{ {} add address={prefix} list={list} comment=\"{}\" }} on-error={{}}",
                paths.address_list, self.comment
            )?;
        }

        writeln!(f, "{{")?;
        if self.version == RouterOsVersion::V7 {
            writeln!(f, ":local rtable [/routing/table find name=\"{mark}\"]")?;
            writeln!(f, ":if ([:len $rtable] = 0) do={{")?;
            writeln!(
                f,
                "    :do {{ /routing/table add name=\"{mark}\" fib }} on-error={{}}"
            )?;
            writeln!(f, "}}")?;
        }

        writeln!(
            f,
            ":local rrule [{} find dst-address-list=\"{list}\"]",
            paths.mangle
        )?;
        writeln!(f, ":if ([:len $rrule] = 0) do={{")?;
        writeln!(
            f,
            "    :do {{ {} add action=mark-routing chain=prerouting connection-mark=no-mark dst-address-list={list} new-routing-mark=\"{mark}\" passthrough=no }} on-error={{}}",
            paths.mangle
        )?;
        writeln!(f, "}}")?;

        let table_key = match self.version {
            RouterOsVersion::V6 => "routing-mark",
            RouterOsVersion::V7 => "routing-table",
        };
        writeln!(
            f,
            ":local rroute [{} find {table_key}=\"{mark}\" gateway={gateway}]",
            paths.route
        )?;
        writeln!(f, ":if ([:len $rroute] = 0) do={{")?;
        writeln!(
            f,
            "    :do {{ {} add comment=\"{list}\" distance=1 gateway={gateway} {table_key}=\"{mark}\" }} on-error={{}}",
            paths.route
        )?;
        writeln!(f, "}}")?;
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prefixes() -> Vec<Prefix> {
        ["91.108.4.0/22", "149.154.160.0/20", "2001:67c:4e8::/48"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    fn script(version: RouterOsVersion, prefixes: &[Prefix]) -> String {
        RouterOsScript {
            version,
            list_name: "TELEGRAM",
            comment: "Telegram networks",
            gateway: Ipv4Addr::new(192, 168, 1, 1),
            prefixes,
        }
        .to_string()
    }

    #[test]
    fn test_v6_script() {
        let prefixes = sample_prefixes();
        let text = script(RouterOsVersion::V6, &prefixes);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            r#":do { /ip firewall address-list add address=91.108.4.0/22 list=TELEGRAM comment="Telegram networks" } on-error={}"#
        );
        assert_eq!(
            lines[1],
            r#":do { /ip firewall address-list add address=149.154.160.0/20 list=TELEGRAM comment="Telegram networks" } on-error={}"#
        );
        // IPv6 prefixes are never put into the IPv4 address list
        assert!(!text.contains("2001:67c"));
        assert!(text.contains(r#":local rrule [/ip firewall mangle find dst-address-list="TELEGRAM"]"#));
        assert!(text.contains(r#"new-routing-mark="R_TELEGRAM""#));
        assert!(text.contains(
            r#":do { /ip route add comment="TELEGRAM" distance=1 gateway=192.168.1.1 routing-mark="R_TELEGRAM" } on-error={}"#
        ));
        assert!(!text.contains("/routing/table"));
    }

    #[test]
    fn test_v7_script() {
        let prefixes = sample_prefixes();
        let text = script(RouterOsVersion::V7, &prefixes);

        assert!(text.starts_with(
            r#":do { /ip/firewall/address-list add address=91.108.4.0/22 list=TELEGRAM"#
        ));
        assert!(text.contains(r#":do { /routing/table add name="R_TELEGRAM" fib } on-error={}"#));
        assert!(text.contains(r#"/ip/firewall/mangle add action=mark-routing"#));
        assert!(text.contains(r#"routing-table="R_TELEGRAM""#));
        // v7 routes are keyed by table; only the mangle rule sets a routing mark
        let route_lines: Vec<&str> = text.lines().filter(|l| l.contains("/ip/route ")).collect();
        assert_eq!(route_lines.len(), 2);
        for line in route_lines {
            assert!(line.contains(r#"routing-table="R_TELEGRAM""#), "{line}");
            assert!(!line.contains(" routing-mark="), "{line}");
        }
    }

    #[test]
    fn test_braces_balanced() {
        let prefixes = sample_prefixes();
        for version in [RouterOsVersion::V6, RouterOsVersion::V7] {
            let text = script(version, &prefixes);
            let open = text.matches('{').count();
            let close = text.matches('}').count();
            assert_eq!(open, close, "unbalanced braces for {version:?}");
        }
    }

    #[test]
    fn test_script_path() {
        let prefixes = sample_prefixes();
        let s = RouterOsScript {
            version: RouterOsVersion::V7,
            list_name: "META",
            comment: "Meta networks",
            gateway: Ipv4Addr::new(10, 0, 0, 1),
            prefixes: &prefixes,
        };
        assert_eq!(
            s.path(Path::new("RouterOS")),
            PathBuf::from("RouterOS/v7/META.rsc")
        );
    }
}
