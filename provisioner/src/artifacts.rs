//! Reading compiled contracts from a hardhat style `artifacts/` tree.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use anyhow::{anyhow, bail, Result};
use common::{OptimizerInputs, SolidityInputs};
use log::debug;
use serde::Deserialize;

use crate::consts::BUILD_INFO_DIR;

const ARTIFACTS: &str = "ARTIFACTS";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    bytecode: String,
    #[serde(default)]
    link_references: BTreeMap<String, serde_json::Value>,
}

/// A compiled contract as found on disk.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    pub path: PathBuf,
    bytecode: String,
    link_references: BTreeMap<String, serde_json::Value>,
}

impl ContractArtifact {
    /// `contracts/Foo.sol:Foo`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Creation bytecode ready to be sent without constructor arguments.
    pub fn creation_code(&self) -> Result<Bytes> {
        if !self.link_references.is_empty() {
            bail!(
                "{} must be linked against libraries in {} before it can be deployed",
                self.contract_name,
                self.link_references
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if let Some(constructor) = &self.abi.constructor {
            if !constructor.inputs.is_empty() {
                bail!(
                    "constructor of {} expects {} argument(s), deploying with arguments is not supported",
                    self.contract_name,
                    constructor.inputs.len()
                );
            }
        }

        let code = hex::decode(self.bytecode.trim_start_matches("0x"))
            .map_err(|e| anyhow!("bytecode of {} is not valid hex: {e}", self.contract_name))?;

        if code.is_empty() {
            bail!(
                "{} has no creation bytecode. is it an interface or an abstract contract?",
                self.contract_name
            );
        }

        Ok(code.into())
    }

    fn dbg_path(&self) -> PathBuf {
        self.path.with_extension("dbg.json")
    }
}

/// Resolves `name` the way hardhat does: a fully qualified `source.sol:Name`
/// maps to a single file, a bare name must match exactly one artifact.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<PathBuf> {
    if !artifacts_dir.is_dir() {
        bail!(
            "artifacts directory {} does not exist. compile the contracts first",
            artifacts_dir.display()
        );
    }

    if let Some((source, contract)) = name.rsplit_once(':') {
        let path = artifacts_dir.join(source).join(format!("{contract}.json"));
        if !path.is_file() {
            bail!("artifact for {name} not found at {}", path.display());
        }
        return Ok(path);
    }

    let mut matches = vec![];
    collect_artifacts(artifacts_dir, &format!("{name}.json"), &mut matches)?;
    matches.sort();

    match matches.len() {
        0 => Err(anyhow!(
            "artifact for contract {name} not found under {}",
            artifacts_dir.display()
        )),
        1 => Ok(matches.remove(0)),
        _ => {
            let candidates = matches
                .iter()
                .filter_map(|p| fully_qualified_from_path(artifacts_dir, p))
                .collect::<Vec<_>>()
                .join(", ");
            Err(anyhow!(
                "contract name {name} is ambiguous, use one of the fully qualified names: {candidates}"
            ))
        }
    }
}

fn collect_artifacts(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            collect_artifacts(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            found.push(path);
        }
    }
    Ok(())
}

fn fully_qualified_from_path(artifacts_dir: &Path, path: &Path) -> Option<String> {
    let source = path.parent()?.strip_prefix(artifacts_dir).ok()?;
    let contract = path.file_stem()?.to_str()?;
    Some(format!("{}:{contract}", source.to_str()?))
}

pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractArtifact> {
    let path = find_artifact(artifacts_dir, name)?;
    debug!(target: ARTIFACTS, "loading {name} from {}", path.display());

    let content = fs::read_to_string(&path)?;
    let raw: RawArtifact = serde_json::from_str(&content)
        .map_err(|e| anyhow!("failed to parse artifact {}: {e}", path.display()))?;

    Ok(ContractArtifact {
        contract_name: raw.contract_name,
        source_name: raw.source_name,
        abi: raw.abi,
        path,
        bytecode: raw.bytecode,
        link_references: raw.link_references,
    })
}

/// Compiler settings recorded in the build-info an artifact was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub solc_version: String,
    pub optimizer: OptimizerInputs,
}

impl BuildSettings {
    /// Human readable differences against the configured compiler settings.
    pub fn mismatches(&self, expected: &SolidityInputs) -> Vec<String> {
        let mut out = vec![];
        if self.solc_version != expected.version {
            out.push(format!(
                "solc {} (configured {})",
                self.solc_version, expected.version
            ));
        }
        if self.optimizer.enabled != expected.optimizer.enabled {
            out.push(format!(
                "optimizer enabled={} (configured {})",
                self.optimizer.enabled, expected.optimizer.enabled
            ));
        }
        if self.optimizer.enabled && self.optimizer.runs != expected.optimizer.runs {
            out.push(format!(
                "optimizer runs={} (configured {})",
                self.optimizer.runs, expected.optimizer.runs
            ));
        }
        out
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_version: String,
    input: BuildInput,
}

#[derive(Deserialize)]
struct BuildInput {
    #[serde(default)]
    settings: BuildInputSettings,
}

#[derive(Default, Deserialize)]
struct BuildInputSettings {
    #[serde(default)]
    optimizer: BuildOptimizer,
}

// solc defaults when the optimizer section is omitted
#[derive(Deserialize)]
struct BuildOptimizer {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_runs")]
    runs: u32,
}

impl Default for BuildOptimizer {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: default_runs(),
        }
    }
}

fn default_runs() -> u32 {
    200
}

/// Follows `<Name>.dbg.json` to the build-info file. `Ok(None)` when the
/// artifact has no debug file next to it or the build-info it names is gone.
pub fn read_build_settings(artifact: &ContractArtifact) -> Result<Option<BuildSettings>> {
    let dbg_path = artifact.dbg_path();
    if !dbg_path.is_file() {
        return Ok(None);
    }

    let dbg: DebugFile = serde_json::from_str(&fs::read_to_string(&dbg_path)?)
        .map_err(|e| anyhow!("failed to parse {}: {e}", dbg_path.display()))?;

    let base = dbg_path.parent().unwrap_or_else(|| Path::new("."));
    let build_info_path = base.join(&dbg.build_info);
    if !build_info_path.is_file() {
        debug!(target: ARTIFACTS, "build info {} referenced by {} is missing", build_info_path.display(), dbg_path.display());
        return Ok(None);
    }
    let build_info: BuildInfo = serde_json::from_str(&fs::read_to_string(&build_info_path)?)
        .map_err(|e| anyhow!("failed to parse {}: {e}", build_info_path.display()))?;

    Ok(Some(BuildSettings {
        solc_version: build_info.solc_version,
        optimizer: OptimizerInputs {
            enabled: build_info.input.settings.optimizer.enabled,
            runs: build_info.input.settings.optimizer.runs,
        },
    }))
}
