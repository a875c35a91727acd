//! nodecap.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Vendor domain GPUs are advertised under when nothing else is configured.
pub const DEFAULT_GPU_VENDOR_PREFIX: &str = "nvidia.com";

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodecapConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub accounting: AccountingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where cluster state comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Kubeconfig file. When unset the client infers its configuration
    /// from the environment (`KUBECONFIG`, `~/.kube/config`, in-cluster).
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of the current one.
    pub context: Option<String>,
    /// Read a JSON cluster snapshot instead of talking to a live cluster.
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingConfig {
    /// Resource-name prefixes that identify a vendor GPU resource.
    #[serde(default = "default_gpu_vendor_prefixes")]
    pub gpu_vendor_prefixes: Vec<String>,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            gpu_vendor_prefixes: default_gpu_vendor_prefixes(),
        }
    }
}

fn default_gpu_vendor_prefixes() -> Vec<String> {
    vec![DEFAULT_GPU_VENDOR_PREFIX.to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl NodecapConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NodecapConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NodecapConfig::default();
        assert_eq!(config.accounting.gpu_vendor_prefixes, vec!["nvidia.com"]);
        assert_eq!(config.server.port, 8080);
        assert!(config.cluster.kubeconfig.is_none());
    }

    #[test]
    fn test_parse_empty() {
        let config: NodecapConfig = toml::from_str("").unwrap();
        assert_eq!(config, NodecapConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[cluster]
kubeconfig = "/etc/kube/admin.conf"
context = "prod"

[accounting]
gpu_vendor_prefixes = ["nvidia.com", "amd.com"]

[server]
port = 9000
"#;
        let config: NodecapConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.cluster.kubeconfig.as_deref(),
            Some(Path::new("/etc/kube/admin.conf"))
        );
        assert_eq!(config.cluster.context.as_deref(), Some("prod"));
        assert_eq!(config.accounting.gpu_vendor_prefixes.len(), 2);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "0.0.0.0");
    }

    #[test]
    fn test_from_file_round_trip() {
        let mut config = NodecapConfig::default();
        config.cluster.snapshot = Some(PathBuf::from("cluster.json"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();

        let loaded = NodecapConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(NodecapConfig::from_file(Path::new("/nonexistent/nodecap.toml")).is_err());
    }
}
