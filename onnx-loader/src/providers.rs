//! Execution provider selection
//!
//! Converts our small set of execution targets into ort execution provider
//! dispatch types. CPU is always appended as the last resort.

use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};

/// Hardware an ONNX session may run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionTarget {
    Cpu,
    Cuda { device_id: i32 },
}

impl ExecutionTarget {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionTarget::Cpu => "CPUExecutionProvider",
            ExecutionTarget::Cuda { .. } => "CUDAExecutionProvider",
        }
    }
}

/// Convert execution targets to ort execution providers
///
/// # Note
/// Targets whose ort feature is not compiled in are logged and skipped.
/// If nothing survives, the CPU provider is used.
pub fn to_ort_providers(targets: &[ExecutionTarget]) -> Vec<ExecutionProviderDispatch> {
    let mut ort_providers = Vec::new();

    for target in targets {
        match convert_target(target) {
            Some(provider) => {
                log::info!("Bridged {} to ort", target.name());
                ort_providers.push(provider);
            }
            None => {
                log::warn!("Provider {} not enabled in this build, skipping", target.name());
            }
        }
    }

    if !targets.contains(&ExecutionTarget::Cpu) || ort_providers.is_empty() {
        ort_providers.push(CPUExecutionProvider::default().build());
    }

    ort_providers
}

/// Pick providers for the current build: CUDA first when compiled in, then CPU.
pub fn auto_select_providers() -> Vec<ExecutionProviderDispatch> {
    let mut targets = Vec::new();
    if cfg!(feature = "cuda") {
        targets.push(ExecutionTarget::Cuda { device_id: 0 });
    }
    targets.push(ExecutionTarget::Cpu);

    log::info!("Auto-selected {} execution providers", targets.len());
    to_ort_providers(&targets)
}

fn convert_target(target: &ExecutionTarget) -> Option<ExecutionProviderDispatch> {
    match *target {
        ExecutionTarget::Cpu => Some(CPUExecutionProvider::default().build()),
        ExecutionTarget::Cuda { device_id } => {
            #[cfg(feature = "cuda")]
            {
                let cuda = ort::execution_providers::CUDAExecutionProvider::default()
                    .with_device_id(device_id);
                log::debug!("Configured CUDA provider on device {}", device_id);
                Some(cuda.build())
            }
            #[cfg(not(feature = "cuda"))]
            {
                log::warn!("CUDA provider requested (device {}) but cuda feature not enabled", device_id);
                None
            }
        }
    }
}
