//! Compute device selection

use serde::{Deserialize, Serialize};

/// Where model tensors live for the duration of a run.
///
/// Placement is an explicit value chosen at trainer construction and
/// forwarded to the model once before the first epoch. There is no
/// process-global flag and no migration mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Host CPU
    #[default]
    Cpu,
    /// CUDA-capable accelerator
    Cuda,
}

impl Device {
    /// Check if tensors stay on the host
    pub fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Check if tensors are placed on a CUDA device
    pub fn is_cuda(&self) -> bool {
        matches!(self, Self::Cuda)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda => write!(f, "cuda"),
        }
    }
}
