//! Host description printed at the top of the report

use std::fs;

use serde::Serialize;
use sysinfo::System;

/// Placeholder for values the host does not expose
pub const NOT_AVAILABLE: &str = "NA";

/// CPU and load information for the report header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub model_name: String,
    pub cache_size: String,
    pub cpu_count: usize,
    pub load_average: String,
}

impl SystemInfo {
    /// Inspect the current host; `cpu_count` is the count the sweep uses
    pub fn collect(cpu_count: usize) -> Self {
        let cpuinfo = fs::read_to_string("/proc/cpuinfo").ok();
        let from_cpuinfo = |key: &str| {
            cpuinfo
                .as_deref()
                .and_then(|contents| parse_cpu_info(contents, key))
        };

        let model_name = from_cpuinfo("model name")
            .or_else(cpu_brand)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let cache_size = from_cpuinfo("cache size").unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            model_name,
            cache_size,
            cpu_count,
            load_average: load_average(),
        }
    }
}

/// Value of the first `key : value` line starting with `key`
pub fn parse_cpu_info(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cpu_brand() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
}

/// One-minute load average
fn load_average() -> String {
    if cfg!(target_os = "windows") {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}", System::load_average().one)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cache size\t: 35840 KB

processor\t: 1
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cache size\t: 35840 KB
";

    #[test]
    fn test_parse_cpu_info() {
        assert_eq!(
            parse_cpu_info(CPUINFO, "model name").as_deref(),
            Some("Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz")
        );
        assert_eq!(parse_cpu_info(CPUINFO, "cache size").as_deref(), Some("35840 KB"));
        assert_eq!(parse_cpu_info(CPUINFO, "microcode"), None);
    }

    #[test]
    fn test_parse_cpu_info_empty_value() {
        assert_eq!(parse_cpu_info("model name\t:\n", "model name"), None);
    }

    #[test]
    fn test_collect_never_empty() {
        let info = SystemInfo::collect(3);
        assert_eq!(info.cpu_count, 3);
        assert!(!info.model_name.is_empty());
        assert!(!info.cache_size.is_empty());
        assert!(!info.load_average.is_empty());
    }
}
