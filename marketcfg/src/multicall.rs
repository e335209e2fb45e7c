//! Batched data store reads through Multicall3.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use tracing::debug;

use crate::error::{MarketCfgError, Result};
use crate::rpc::RpcClient;

sol! {
    interface IDataStore {
        function getUint(bytes32 key) external view returns (uint256);
    }

    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Call3Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Call3Result[] memory returnData);
    }
}

/// One read in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRead {
    pub target: Address,
    pub call_data: Bytes,
    pub label: String,
}

/// Reads collected for a single `aggregate3` call.
///
/// Every read must succeed; the batch fails as a whole otherwise.
#[derive(Debug, Clone, Default)]
pub struct BatchReadRequest {
    reads: Vec<BatchRead>,
    labels: HashSet<String>,
}

impl BatchReadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: Address, call_data: Bytes, label: &str) -> Result<()> {
        if !self.labels.insert(label.to_string()) {
            return Err(MarketCfgError::DuplicateLabel(label.to_string()));
        }
        self.reads.push(BatchRead {
            target,
            call_data,
            label: label.to_string(),
        });
        Ok(())
    }

    /// Queue `DataStore.getUint(key)`.
    pub fn push_uint(&mut self, data_store: Address, key: B256, label: &str) -> Result<()> {
        let call_data = SolCall::abi_encode(&IDataStore::getUintCall { key });
        self.push(data_store, call_data.into(), label)
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Calldata of the `aggregate3` call covering every queued read.
    pub fn encode(&self) -> Vec<u8> {
        let calls = self
            .reads
            .iter()
            .map(|read| IMulticall3::Call3 {
                target: read.target,
                allowFailure: false,
                callData: read.call_data.clone(),
            })
            .collect();
        SolCall::abi_encode(&IMulticall3::aggregate3Call { calls })
    }

    /// Decode `aggregate3` return data into `label -> uint256`.
    pub fn decode(&self, data: &[u8]) -> Result<HashMap<String, U256>> {
        let results = Vec::<IMulticall3::Call3Result>::abi_decode(data)?;
        if results.len() != self.reads.len() {
            return Err(MarketCfgError::Rpc {
                code: 0,
                message: format!(
                    "multicall returned {} results for {} calls",
                    results.len(),
                    self.reads.len()
                ),
            });
        }

        let mut values = HashMap::with_capacity(results.len());
        for (read, result) in self.reads.iter().zip(results) {
            if !result.success {
                return Err(MarketCfgError::MulticallFailed {
                    label: read.label.clone(),
                });
            }
            let value = U256::abi_decode(&result.returnData)?;
            values.insert(read.label.clone(), value);
        }
        Ok(values)
    }

    /// Issue the batch as one `eth_call` to `multicall`.
    pub async fn execute(
        &self,
        rpc: &RpcClient,
        multicall: Address,
    ) -> Result<HashMap<String, U256>> {
        debug!(reads = self.reads.len(), multicall = %multicall, "executing batch read");
        let data = rpc.eth_call(multicall, &self.encode()).await?;
        self.decode(&data)
    }
}
