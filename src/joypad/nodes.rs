//! # Device Node Discovery
//!
//! Finds the `/dev/input` nodes the kernel created for one virtual
//! controller by walking the uhid sysfs tree:
//!
//! ```text
//! /sys/devices/virtual/misc/uhid/0003:054C:0CE6.0007/input/input42/uniq
//!                                                               /event17
//!                                                               /js3
//! ```
//!
//! A missing directory at any level is logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Default sysfs directory holding uhid-created HID devices
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/devices/virtual/misc/uhid";

/// Default device node directory
pub const DEFAULT_DEV_INPUT_ROOT: &str = "/dev/input";

const NODE_PREFIXES: [&str; 2] = ["event", "js"];

/// Maps a controller's identity to its sysfs and `/dev/input` paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeResolver {
    sysfs_root: PathBuf,
    dev_input_root: PathBuf,
}

impl Default for NodeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT, DEFAULT_DEV_INPUT_ROOT)
    }
}

impl NodeResolver {
    pub fn new(sysfs_root: impl Into<PathBuf>, dev_input_root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
            dev_input_root: dev_input_root.into(),
        }
    }

    /// Input device directories belonging to the controller
    ///
    /// An entry matches when its name contains the vendor id and its
    /// `uniq` attribute equals `hardware_address` (case-insensitive).
    pub fn sys_nodes(&self, vendor_id: u16, hardware_address: &str) -> Vec<PathBuf> {
        let vendor = format!("{:04X}", vendor_id);
        let mut nodes = Vec::new();

        for entry in sorted_entries(&self.sysfs_root) {
            let name = file_name(&entry);
            if !name.to_uppercase().contains(&vendor) {
                continue;
            }

            for input in sorted_entries(&entry.join("input")) {
                if uniq_matches(&input, hardware_address) {
                    debug!("Matched input device {}", input.display());
                    nodes.push(input);
                }
            }
        }

        nodes
    }

    /// `/dev/input/eventN` and `/dev/input/jsN` paths of the controller
    pub fn dev_nodes(&self, vendor_id: u16, hardware_address: &str) -> Vec<PathBuf> {
        let mut nodes = Vec::new();

        for input in self.sys_nodes(vendor_id, hardware_address) {
            for child in sorted_entries(&input) {
                let name = file_name(&child);
                if NODE_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
                    nodes.push(self.dev_input_root.join(name));
                }
            }
        }

        nodes.sort();
        nodes
    }
}

fn uniq_matches(input: &Path, hardware_address: &str) -> bool {
    let uniq_path = input.join("uniq");
    match fs::read_to_string(&uniq_path) {
        Ok(uniq) if uniq.trim().eq_ignore_ascii_case(hardware_address) => true,
        Ok(uniq) => {
            debug!(
                "Skipping {}: uniq '{}' does not match {}",
                input.display(),
                uniq.trim(),
                hardware_address
            );
            false
        }
        Err(e) => {
            warn!("Could not read {}: {}", uniq_path.display(), e);
            false
        }
    }
}

/// Directory children sorted by path; empty on error
fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    paths.sort();
    paths
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ADDRESS: &str = "f5:e4:d3:c2:b1:a0";

    /// Build `<root>/<hid>/input/<input>/{uniq, nodes...}`
    fn add_input(root: &Path, hid: &str, input: &str, uniq: Option<&str>, nodes: &[&str]) {
        let dir = root.join(hid).join("input").join(input);
        fs::create_dir_all(&dir).unwrap();
        if let Some(uniq) = uniq {
            fs::write(dir.join("uniq"), format!("{}\n", uniq)).unwrap();
        }
        for node in nodes {
            fs::create_dir_all(dir.join(node)).unwrap();
        }
    }

    fn resolver(root: &TempDir) -> NodeResolver {
        NodeResolver::new(root.path(), "/dev/input")
    }

    #[test]
    fn test_empty_registry() {
        let root = TempDir::new().unwrap();
        assert!(resolver(&root).dev_nodes(0x054C, ADDRESS).is_empty());
    }

    #[test]
    fn test_missing_registry() {
        let resolver = NodeResolver::new("/nonexistent/uhid", "/dev/input");
        assert!(resolver.sys_nodes(0x054C, ADDRESS).is_empty());
        assert!(resolver.dev_nodes(0x054C, ADDRESS).is_empty());
    }

    #[test]
    fn test_finds_event_and_js_nodes() {
        let root = TempDir::new().unwrap();
        add_input(
            root.path(),
            "0003:054C:0CE6.0007",
            "input42",
            Some(ADDRESS),
            &["event17", "js3", "mouse2", "capabilities"],
        );

        let nodes = resolver(&root).dev_nodes(0x054C, ADDRESS);
        assert_eq!(
            nodes,
            vec![
                PathBuf::from("/dev/input/event17"),
                PathBuf::from("/dev/input/js3")
            ]
        );
    }

    #[test]
    fn test_sys_nodes_returns_input_directories() {
        let root = TempDir::new().unwrap();
        add_input(root.path(), "0003:054C:0CE6.0001", "input5", Some(ADDRESS), &["event4"]);

        let nodes = resolver(&root).sys_nodes(0x054C, ADDRESS);
        assert_eq!(nodes, vec![root.path().join("0003:054C:0CE6.0001/input/input5")]);
    }

    #[test]
    fn test_uniq_mismatch_rejected() {
        let root = TempDir::new().unwrap();
        add_input(
            root.path(),
            "0003:054C:0CE6.0001",
            "input5",
            Some("11:22:33:44:55:66"),
            &["event4"],
        );
        add_input(root.path(), "0003:054C:0CE6.0002", "input6", Some(ADDRESS), &["event5"]);

        let nodes = resolver(&root).dev_nodes(0x054C, ADDRESS);
        assert_eq!(nodes, vec![PathBuf::from("/dev/input/event5")]);
    }

    #[test]
    fn test_uniq_comparison_ignores_case() {
        let root = TempDir::new().unwrap();
        add_input(
            root.path(),
            "0003:054C:0CE6.0001",
            "input5",
            Some(&ADDRESS.to_uppercase()),
            &["event4"],
        );

        assert_eq!(resolver(&root).dev_nodes(0x054C, ADDRESS).len(), 1);
    }

    #[test]
    fn test_missing_uniq_rejected() {
        let root = TempDir::new().unwrap();
        add_input(root.path(), "0003:054C:0CE6.0001", "input5", None, &["event4"]);

        assert!(resolver(&root).dev_nodes(0x054C, ADDRESS).is_empty());
    }

    #[test]
    fn test_other_vendor_ignored() {
        let root = TempDir::new().unwrap();
        add_input(root.path(), "0003:28DE:1205.0001", "input5", Some(ADDRESS), &["event4"]);

        assert!(resolver(&root).dev_nodes(0x054C, ADDRESS).is_empty());
    }

    #[test]
    fn test_lowercase_vendor_in_entry_name() {
        let root = TempDir::new().unwrap();
        add_input(root.path(), "0003:054c:0ce6.0001", "input5", Some(ADDRESS), &["js0"]);

        assert_eq!(
            resolver(&root).dev_nodes(0x054C, ADDRESS),
            vec![PathBuf::from("/dev/input/js0")]
        );
    }

    #[test]
    fn test_hid_without_input_directory() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("0003:054C:0CE6.0001")).unwrap();

        assert!(resolver(&root).dev_nodes(0x054C, ADDRESS).is_empty());
    }
}
