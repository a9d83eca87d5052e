//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//! Every section is optional, so an empty file yields the defaults.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codec::parse_hex_address;
use crate::dualsense::protocol::{DS_NAME, DS_PRODUCT_ID, DS_VENDOR_ID, DS_VERSION};
use crate::error::{DualSenseError, Result};
use crate::joypad::nodes::{NodeResolver, DEFAULT_DEV_INPUT_ROOT, DEFAULT_SYSFS_ROOT};
use crate::joypad::{DeviceDefinition, JoypadOptions};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Identity of the virtual controller
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub phys: String,

    /// Empty means the formatted hardware address
    #[serde(default)]
    pub uniq: String,

    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    #[serde(default = "default_product_id")]
    pub product_id: u16,

    #[serde(default = "default_version")]
    pub version: u16,

    /// Empty means a random address per run
    #[serde(default)]
    pub mac_address: String,
}

/// Host paths
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_uhid_node")]
    pub uhid_node: String,

    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,

    #[serde(default = "default_dev_input_root")]
    pub dev_input_root: String,
}

/// Kernel event worker
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_name() -> String { DS_NAME.to_string() }
fn default_vendor_id() -> u16 { DS_VENDOR_ID }
fn default_product_id() -> u16 { DS_PRODUCT_ID }
fn default_version() -> u16 { DS_VERSION }

fn default_uhid_node() -> String { "/dev/uhid".to_string() }
fn default_sysfs_root() -> String { DEFAULT_SYSFS_ROOT.to_string() }
fn default_dev_input_root() -> String { DEFAULT_DEV_INPUT_ROOT.to_string() }

fn default_poll_interval_ms() -> u64 { 5 }

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            phys: String::new(),
            uniq: String::new(),
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            version: default_version(),
            mac_address: String::new(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            uhid_node: default_uhid_node(),
            sysfs_root: default_sysfs_root(),
            dev_input_root: default_dev_input_root(),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dualsense_uhid::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `Config` if any value is out of range, or
    /// `InvalidMacAddress` if `mac_address` cannot be parsed.
    pub fn validate(&self) -> Result<()> {
        if self.device.name.is_empty() {
            return Err(DualSenseError::Config(toml::de::Error::custom(
                "device name cannot be empty",
            )));
        }

        if self.device.vendor_id == 0 {
            return Err(DualSenseError::Config(toml::de::Error::custom(
                "vendor_id cannot be zero",
            )));
        }

        self.mac_address()?;

        if self.paths.uhid_node.is_empty()
            || self.paths.sysfs_root.is_empty()
            || self.paths.dev_input_root.is_empty()
        {
            return Err(DualSenseError::Config(toml::de::Error::custom(
                "paths cannot be empty",
            )));
        }

        if self.worker.poll_interval_ms == 0 || self.worker.poll_interval_ms > 1000 {
            return Err(DualSenseError::Config(toml::de::Error::custom(
                "poll_interval_ms must be between 1 and 1000",
            )));
        }

        Ok(())
    }

    /// Configured hardware address, `None` when left empty
    pub fn mac_address(&self) -> Result<Option<[u8; 6]>> {
        let text = self.device.mac_address.trim();
        if text.is_empty() {
            return Ok(None);
        }

        parse_hex_address(text)
            .map(Some)
            .ok_or_else(|| DualSenseError::InvalidMacAddress(text.to_string()))
    }

    /// Identity to create the joypad with
    pub fn device_definition(&self) -> Result<DeviceDefinition> {
        Ok(DeviceDefinition {
            name: self.device.name.clone(),
            phys: self.device.phys.clone(),
            uniq: self.device.uniq.clone(),
            vendor_id: self.device.vendor_id,
            product_id: self.device.product_id,
            version: self.device.version,
            mac_address: self.mac_address()?,
        })
    }

    /// Host paths and worker timing for joypad creation
    pub fn joypad_options(&self) -> JoypadOptions {
        JoypadOptions {
            uhid_node: PathBuf::from(&self.paths.uhid_node),
            resolver: NodeResolver::new(&self.paths.sysfs_root, &self.paths.dev_input_root),
            poll_interval: Duration::from_millis(self.worker.poll_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            device: DeviceConfig {
                name: default_name(),
                phys: "usb-0000:00:14.0-1/input0".to_string(),
                uniq: String::new(),
                vendor_id: default_vendor_id(),
                product_id: default_product_id(),
                version: default_version(),
                mac_address: "aa:bb:cc:dd:ee:ff".to_string(),
            },
            paths: PathsConfig {
                uhid_node: default_uhid_node(),
                sysfs_root: default_sysfs_root(),
                dev_input_root: default_dev_input_root(),
            },
            worker: WorkerConfig {
                poll_interval_ms: default_poll_interval_ms(),
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.vendor_id, 0x054C);
        assert_eq!(config.device.product_id, 0x0CE6);
        assert_eq!(config.paths.uhid_node, "/dev/uhid");
        assert_eq!(config.worker.poll_interval_ms, 5);
    }

    #[test]
    fn test_valid_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.name, DS_NAME);
        assert_eq!(config.paths.sysfs_root, "/sys/devices/virtual/misc/uhid");
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[device]
name = "Test Controller"
vendor_id = 0x054C
mac_address = "01:02:03:04:05:06"

[paths]
sysfs_root = "/tmp/uhid"

[worker]
poll_interval_ms = 10
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.device.name, "Test Controller");
        assert_eq!(config.paths.sysfs_root, "/tmp/uhid");
        assert_eq!(config.paths.dev_input_root, "/dev/input");
        assert_eq!(config.worker.poll_interval_ms, 10);
        assert_eq!(config.mac_address().unwrap(), Some([1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_load_missing_file() {
        match Config::load("/nonexistent/config.toml") {
            Err(DualSenseError::Io(_)) => {}
            other => panic!("Expected Io error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_toml() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[device\nname = ").unwrap();
        temp_file.flush().unwrap();

        assert!(matches!(
            Config::load(temp_file.path()),
            Err(DualSenseError::Config(_))
        ));
    }

    #[test]
    fn test_empty_name() {
        let mut config = create_valid_config();
        config.device.name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_vendor_id() {
        let mut config = create_valid_config();
        config.device.vendor_id = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_mac_address() {
        let mut config = create_valid_config();
        config.device.mac_address = "aa:bb:cc".to_string();
        match config.validate() {
            Err(DualSenseError::InvalidMacAddress(text)) => assert_eq!(text, "aa:bb:cc"),
            other => panic!("Expected InvalidMacAddress, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_mac_address_is_random() {
        let mut config = create_valid_config();
        config.device.mac_address = String::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.device_definition().unwrap().mac_address, None);
    }

    #[test]
    fn test_empty_uhid_node() {
        let mut config = create_valid_config();
        config.paths.uhid_node = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_dev_input_root() {
        let mut config = create_valid_config();
        config.paths.dev_input_root = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = create_valid_config();
        config.worker.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = create_valid_config();
        config.worker.poll_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_boundaries() {
        let mut config = create_valid_config();
        config.worker.poll_interval_ms = 1;
        assert!(config.validate().is_ok());
        config.worker.poll_interval_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_device_definition() {
        let config = create_valid_config();
        let definition = config.device_definition().unwrap();

        assert_eq!(definition.name, DS_NAME);
        assert_eq!(definition.phys, "usb-0000:00:14.0-1/input0");
        assert_eq!(definition.vendor_id, DS_VENDOR_ID);
        assert_eq!(definition.version, DS_VERSION);
        assert_eq!(
            definition.mac_address,
            Some([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])
        );
    }

    #[test]
    fn test_joypad_options() {
        let mut config = create_valid_config();
        config.paths.sysfs_root = "/tmp/sys".to_string();
        config.worker.poll_interval_ms = 20;

        let options = config.joypad_options();
        assert_eq!(options.uhid_node, PathBuf::from("/dev/uhid"));
        assert_eq!(options.resolver, NodeResolver::new("/tmp/sys", "/dev/input"));
        assert_eq!(options.poll_interval, Duration::from_millis(20));
    }
}
