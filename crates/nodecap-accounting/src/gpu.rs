//! GPU resource resolution.
//!
//! GPUs are not advertised under one well-known resource name. Device
//! plugins publish them under a vendor-qualified key (`nvidia.com/gpu`,
//! `nvidia.com/mig-1g.5gb`, ...), and a node may carry several such keys
//! with only one of them populated.
//!
//! Resolution starts from the canonical `<vendor>/gpu` entry (zero if
//! absent) and then scans every key with a vendor prefix. A strictly
//! positive value replaces the current one; a zero never overrides.

use nodecap_core::config::{AccountingConfig, DEFAULT_GPU_VENDOR_PREFIX};
use nodecap_core::{Quantity, ResourceList, quantity_of};

/// Resolves the GPU count from a resource list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuResolver {
    vendor_prefixes: Vec<String>,
}

impl Default for GpuResolver {
    fn default() -> Self {
        Self::new([DEFAULT_GPU_VENDOR_PREFIX])
    }
}

impl GpuResolver {
    pub fn new<I, S>(vendor_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vendor_prefixes: vendor_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &AccountingConfig) -> Self {
        Self::new(config.gpu_vendor_prefixes.iter().cloned())
    }

    pub fn vendor_prefixes(&self) -> &[String] {
        &self.vendor_prefixes
    }

    /// Whether `name` is a vendor GPU resource.
    pub fn is_vendor_resource(&self, name: &str) -> bool {
        self.vendor_prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Resolve the GPU quantity in `list`. Last positive match wins.
    pub fn resolve(&self, list: &ResourceList) -> Quantity {
        let mut gpu = self
            .vendor_prefixes
            .first()
            .map(|vendor| quantity_of(list, &format!("{vendor}/gpu")))
            .unwrap_or_default();

        for (name, value) in list {
            if self.is_vendor_resource(name) && value.is_positive() {
                gpu = *value;
            }
        }
        gpu
    }
}
