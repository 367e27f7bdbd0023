use solana_sdk::commitment_config::CommitmentConfig;
use typed_builder::TypedBuilder;

pub const MAINNET_BETA_CLUSTER: &str = "mainnet-beta";
pub const MAINNET_BETA_URL: &str = "https://api.mainnet-beta.solana.com";

/// Where and how the reporter reads transactions.
#[derive(Clone, Debug, TypedBuilder)]
pub struct ReporterConfig {
    /// Cluster name, only used in messages
    #[builder(default = MAINNET_BETA_CLUSTER.to_string(), setter(into))]
    pub cluster: String,
    /// JSON-RPC endpoint of the cluster
    #[builder(default = MAINNET_BETA_URL.to_string(), setter(into))]
    pub rpc_url: String,
    #[builder(default = CommitmentConfig::confirmed())]
    pub commitment: CommitmentConfig,
    /// Highest transaction version the node may return
    #[builder(default = 2)]
    pub max_supported_transaction_version: u8,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
