//! nodecap accounting engine: per-node capacity, allocatable, and free
//! resources.
//!
//! The engine is a two-stage pipeline over a cluster snapshot. The
//! extractor turns node status into owned [`NodeCapacity`] records; the
//! aggregator consumes them together with the non-terminated workloads and
//! returns [`NodeReport`] records with free capacity filled in.
//!
//! # Components
//!
//! - **`gpu`**: Vendor-qualified GPU resource resolution
//! - **`extractor`**: Node capacity/allocatable extraction
//! - **`requests`**: Effective per-workload requests and limits
//! - **`aggregator`**: Free capacity and per-node request totals
//! - **`accountant`**: One reporting cycle against a provider

pub mod accountant;
pub mod aggregator;
pub mod error;
pub mod extractor;
pub mod gpu;
pub mod requests;

pub use accountant::Accountant;
pub use aggregator::{NodeReport, NodeReportMap, NodeRequestTotals, compute_free, node_requests_and_limits, workload_requests};
pub use error::{AccountingError, AccountingResult};
pub use extractor::{NodeCapacity, NodeCapacityMap, extract_nodes, resources_from};
pub use gpu::GpuResolver;
pub use requests::{RequestsAndLimits, pod_requests_and_limits};
