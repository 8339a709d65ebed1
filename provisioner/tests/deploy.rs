use std::{
    fs,
    net::TcpListener,
    path::Path,
    process::Command,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    thread,
    time::Duration,
};

use alloy_primitives::{Address, Bytes, TxHash, B256};
use anyhow::anyhow;
use async_trait::async_trait;
use common::{OptimizerInputs, SolidityInputs, DEFAULT_CONTRACT};
use provisioner::{
    client::{CreationClient, EvmCreationClient},
    config::DeployConfig,
    steps::{parse_setup_inputs, Deployer},
};

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const CREATION_CODE: &str = "0x6080604052348015600f57600080fd5b50";

/// In-memory chain: every confirmed creation lands at a fresh address.
#[derive(Default)]
struct FakeChain {
    chain_id: u64,
    submit_error: Option<&'static str>,
    revert: bool,
    nonce: AtomicU64,
    submitted: Mutex<Vec<Bytes>>,
}

#[async_trait]
impl CreationClient for FakeChain {
    async fn chain_id(&self) -> anyhow::Result<u64> {
        Ok(self.chain_id)
    }

    async fn submit(&self, creation_code: Bytes) -> anyhow::Result<TxHash> {
        if let Some(err) = self.submit_error {
            return Err(anyhow!(err));
        }
        self.submitted.lock().unwrap().push(creation_code);
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(B256::left_padding_from(&nonce.to_be_bytes()))
    }

    async fn confirm(&self, tx_hash: TxHash) -> anyhow::Result<Address> {
        if self.revert {
            return Err(anyhow!("creation transaction {tx_hash} reverted in block 7"));
        }
        Ok(Address::from_word(tx_hash))
    }
}

fn solidity() -> SolidityInputs {
    SolidityInputs {
        version: "0.8.24".to_string(),
        optimizer: OptimizerInputs {
            enabled: true,
            runs: 1000,
        },
    }
}

fn write_requester_artifact(dir: &Path) {
    let path = dir.join("contracts/SlipageRequester.sol/SlipageRequester.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let artifact = serde_json::json!({
        "_format": "hh-sol-artifact-1",
        "contractName": "SlipageRequester",
        "sourceName": "contracts/SlipageRequester.sol",
        "abi": [],
        "bytecode": CREATION_CODE,
        "deployedBytecode": "0x",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(path, artifact.to_string()).unwrap();
}

fn deployer(chain: FakeChain, dir: &Path) -> Deployer<FakeChain> {
    Deployer::new(chain, dir.to_path_buf(), solidity())
}

#[tokio::test]
async fn test_deploy_reports_confirmed_address() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let deployer = deployer(FakeChain::default(), dir.path());
    let result = deployer.deploy(DEFAULT_CONTRACT).await.unwrap();

    assert_eq!(result.contract_name, "SlipageRequester");
    assert_ne!(result.address, Address::ZERO);
    assert!(result.address.to_string().starts_with("0x"));
    assert_eq!(result.address.to_string().len(), 42);

    let submitted = deployer.client().submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0], CREATION_CODE.parse::<Bytes>().unwrap());
}

#[tokio::test]
async fn test_deploy_twice_creates_two_instances() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let deployer = deployer(FakeChain::default(), dir.path());
    let first = deployer.deploy(DEFAULT_CONTRACT).await.unwrap();
    let second = deployer.deploy(DEFAULT_CONTRACT).await.unwrap();

    assert_ne!(first.address, second.address);
    assert_eq!(deployer.client().submitted.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_submission_errors_become_deployment_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    for cause in [
        "error sending request for url (http://127.0.0.1:1/): connection refused",
        "insufficient funds for gas * price + value",
    ] {
        let chain = FakeChain {
            submit_error: Some(cause),
            ..Default::default()
        };
        let failure = deployer(chain, dir.path())
            .deploy(DEFAULT_CONTRACT)
            .await
            .unwrap_err();

        assert_eq!(failure.contract, "SlipageRequester");
        assert_eq!(failure.to_string(), "deployment of SlipageRequester failed");
        assert!(format!("{:?}", anyhow::Error::from(failure)).contains(cause));
    }
}

#[tokio::test]
async fn test_reverted_creation_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let chain = FakeChain {
        revert: true,
        ..Default::default()
    };
    let failure = deployer(chain, dir.path())
        .deploy(DEFAULT_CONTRACT)
        .await
        .unwrap_err();

    assert!(failure.source.to_string().contains("reverted"));
}

#[tokio::test]
async fn test_chain_id_mismatch_submits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let chain = FakeChain {
        chain_id: 1,
        ..Default::default()
    };
    let deployer = deployer(chain, dir.path()).with_expected_chain_id(Some(137));
    let failure = deployer.deploy(DEFAULT_CONTRACT).await.unwrap_err();

    assert!(failure.source.to_string().contains("expected 137"));
    assert!(deployer.client().submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_artifact_submits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let deployer = deployer(FakeChain::default(), dir.path());
    let failure = deployer.deploy("SlippageRequester").await.unwrap_err();

    assert_eq!(failure.contract, "SlippageRequester");
    assert!(failure.source.to_string().contains("not found"));
    assert!(deployer.client().submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let inputs = parse_setup_inputs(
        r#"
        default_network = "local"

        [networks.local]
        url = "http://127.0.0.1:1"

        [solidity]
        version = "0.8.24"
        optimizer = { enabled = true, runs = 1000 }
        "#,
    )
    .unwrap();
    let cfg = DeployConfig::resolve(&inputs, None, |key| {
        (key == "SK").then(|| DEV_KEY.to_string())
    })
    .unwrap();

    let deployer = Deployer::new(
        EvmCreationClient::new(&cfg),
        dir.path().to_path_buf(),
        inputs.solidity,
    );
    let failure = deployer.deploy(DEFAULT_CONTRACT).await.unwrap_err();

    assert_eq!(failure.contract, "SlipageRequester");
}

/// Accepts connections and never answers them.
fn silent_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        let mut held = vec![];
        for stream in listener.incoming() {
            held.push(stream);
        }
    });
    url
}

#[tokio::test]
async fn test_silent_endpoint_times_out() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let url = silent_endpoint();
    let inputs = parse_setup_inputs(&format!(
        r#"
        default_network = "stalled"

        [networks.stalled]
        url = "{url}"

        [solidity]
        version = "0.8.24"
        optimizer = {{ enabled = true, runs = 1000 }}
        "#
    ))
    .unwrap();
    let cfg = DeployConfig::resolve(&inputs, None, |key| {
        (key == "SK").then(|| DEV_KEY.to_string())
    })
    .unwrap();

    let client = EvmCreationClient::new(&cfg).with_request_timeout(Duration::from_millis(500));
    let deployer = Deployer::new(client, dir.path().to_path_buf(), inputs.solidity);

    let failure = tokio::time::timeout(
        Duration::from_secs(30),
        deployer.deploy(DEFAULT_CONTRACT),
    )
    .await
    .expect("deploy must give up on a silent endpoint")
    .unwrap_err();

    assert_eq!(failure.contract, "SlipageRequester");
    assert!(failure.source.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_silent_endpoint_times_out_before_chain_id_check() {
    let url = silent_endpoint();
    let inputs = parse_setup_inputs(&format!(
        r#"
        default_network = "stalled"

        [networks.stalled]
        url = "{url}"
        chain_id = 137

        [solidity]
        version = "0.8.24"
        optimizer = {{ enabled = true, runs = 1000 }}
        "#
    ))
    .unwrap();
    let cfg = DeployConfig::resolve(&inputs, None, |key| {
        (key == "SK").then(|| DEV_KEY.to_string())
    })
    .unwrap();

    let client = EvmCreationClient::new(&cfg).with_request_timeout(Duration::from_millis(500));
    let err = tokio::time::timeout(Duration::from_secs(30), client.chain_id())
        .await
        .expect("chain id request must give up on a silent endpoint")
        .unwrap_err();

    assert!(err.to_string().contains("eth_chainId"));
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn test_cli_exits_with_failure_when_endpoint_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    write_requester_artifact(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_provisioner"))
        .current_dir(dir.path())
        .args(["--network", "tenderlyeth", "--artifacts"])
        .arg(dir.path())
        .env("SK", DEV_KEY)
        .env("TENDERLY_RPC_URL", "http://127.0.0.1:1")
        .env_remove("DEPLOY_NETWORK")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("deployment of SlipageRequester failed"));
}

#[test]
fn test_cli_exits_with_failure_without_secret_key() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_provisioner"))
        .current_dir(dir.path())
        .env_remove("SK")
        .env_remove("DEPLOY_NETWORK")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("`SK` is not set"));
}
