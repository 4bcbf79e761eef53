// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversion pipeline: model in, source text out.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::CodegenConfig;
use crate::error::Result;
use crate::generator::CodeGenerator;
use crate::transform::Transformer;
use flowport_dsl::Root;

/// Result of converting one model.
///
/// Serializes as a summary; the source text is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Generated source text.
    #[serde(skip_serializing)]
    pub source: String,
    /// SHA-256 checksum of `source`, lowercase hex.
    pub checksum: String,
    /// Number of services in the output.
    pub service_count: usize,
    /// Number of resource functions across all services.
    pub resource_count: usize,
}

impl ConversionResult {
    /// Write the generated source to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.source)
    }
}

/// Convert `root` to source text.
///
/// Each call uses fresh name allocators, so converting the same model twice
/// yields byte-identical output.
pub fn convert(root: &Root, config: &CodegenConfig) -> Result<ConversionResult> {
    let start = Instant::now();

    let unit = Transformer::new(root, config).run()?;
    debug!(
        unit = %unit.name,
        top_level_nodes = unit.top_level_nodes.len(),
        "Transformation completed"
    );

    let source = CodeGenerator::new(config).generate(&unit)?;

    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let checksum = format!("{:x}", hasher.finalize());

    let service_count = unit.services().count();
    let resource_count = unit
        .services()
        .map(|s| s.type_definition.functions().len())
        .sum();

    info!(
        unit = %unit.name,
        flows = root.flows.len(),
        services = service_count,
        resources = resource_count,
        checksum = %checksum,
        duration_ms = start.elapsed().as_millis() as u64,
        "Model converted successfully"
    );

    Ok(ConversionResult {
        source,
        checksum,
        service_count,
        resource_count,
    })
}

/// Convert `root` with the default configuration and return only the text.
pub fn translate(root: &Root) -> Result<String> {
    convert(root, &CodegenConfig::default()).map(|result| result.source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model_renders_baseline_imports() {
        let source = translate(&Root::new("empty")).unwrap();
        assert_eq!(source, "import ei/Context;\nimport ei/Mule;\n");
    }

    #[test]
    fn test_checksum_is_sha256_of_source() {
        let result = convert(&Root::new("empty"), &CodegenConfig::default()).unwrap();
        assert_eq!(result.checksum.len(), 64);
        let mut hasher = Sha256::new();
        hasher.update(result.source.as_bytes());
        assert_eq!(result.checksum, format!("{:x}", hasher.finalize()));
        assert_eq!(result.service_count, 0);
        assert_eq!(result.resource_count, 0);
    }

    #[test]
    fn test_summary_omits_source() {
        let result = convert(&Root::new("empty"), &CodegenConfig::default()).unwrap();
        let summary = serde_json::to_value(&result).unwrap();
        assert!(summary.get("source").is_none());
        assert_eq!(summary["serviceCount"], 0);
        assert_eq!(summary["checksum"], result.checksum.as_str());
    }
}
