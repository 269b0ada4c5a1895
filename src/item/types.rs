//! Item type vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every item type the engine can emit or link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemType {
    // Compute
    #[serde(rename = "azure-compute-virtual-machine")]
    ComputeVirtualMachine,
    #[serde(rename = "azure-compute-virtual-machine-extension")]
    ComputeVirtualMachineExtension,
    #[serde(rename = "azure-compute-disk")]
    ComputeDisk,
    #[serde(rename = "azure-compute-availability-set")]
    ComputeAvailabilitySet,
    #[serde(rename = "azure-compute-disk-encryption-set")]
    ComputeDiskEncryptionSet,

    // Network
    #[serde(rename = "azure-network-virtual-network")]
    NetworkVirtualNetwork,
    #[serde(rename = "azure-network-subnet")]
    NetworkSubnet,
    #[serde(rename = "azure-network-virtual-network-peering")]
    NetworkVirtualNetworkPeering,
    #[serde(rename = "azure-network-network-interface")]
    NetworkNetworkInterface,
    #[serde(rename = "azure-network-public-ip-address")]
    NetworkPublicIpAddress,
    #[serde(rename = "azure-network-network-security-group")]
    NetworkNetworkSecurityGroup,
    #[serde(rename = "azure-network-route-table")]
    NetworkRouteTable,
    #[serde(rename = "azure-network-nat-gateway")]
    NetworkNatGateway,
    #[serde(rename = "azure-network-load-balancer")]
    NetworkLoadBalancer,
    #[serde(rename = "azure-network-load-balancer-frontend-ip-configuration")]
    NetworkLoadBalancerFrontendIpConfiguration,
    #[serde(rename = "azure-network-load-balancer-backend-address-pool")]
    NetworkLoadBalancerBackendAddressPool,
    #[serde(rename = "azure-network-load-balancer-probe")]
    NetworkLoadBalancerProbe,

    // Key Vault
    #[serde(rename = "azure-keyvault-vault")]
    KeyVaultVault,
    #[serde(rename = "azure-keyvault-key")]
    KeyVaultKey,
    #[serde(rename = "azure-keyvault-secret")]
    KeyVaultSecret,

    // Storage
    #[serde(rename = "azure-storage-account")]
    StorageAccount,
    #[serde(rename = "azure-storage-blob-container")]
    StorageBlobContainer,
    #[serde(rename = "azure-storage-file-share")]
    StorageFileShare,
    #[serde(rename = "azure-storage-queue")]
    StorageQueue,

    // Managed identity
    #[serde(rename = "azure-managed-identity-user-assigned-identity")]
    ManagedIdentityUserAssignedIdentity,

    // Standard types shared by every source
    #[serde(rename = "ip")]
    Ip,
    #[serde(rename = "dns")]
    Dns,
    #[serde(rename = "http")]
    Http,
}

impl ItemType {
    pub const ALL: [ItemType; 28] = [
        Self::ComputeVirtualMachine,
        Self::ComputeVirtualMachineExtension,
        Self::ComputeDisk,
        Self::ComputeAvailabilitySet,
        Self::ComputeDiskEncryptionSet,
        Self::NetworkVirtualNetwork,
        Self::NetworkSubnet,
        Self::NetworkVirtualNetworkPeering,
        Self::NetworkNetworkInterface,
        Self::NetworkPublicIpAddress,
        Self::NetworkNetworkSecurityGroup,
        Self::NetworkRouteTable,
        Self::NetworkNatGateway,
        Self::NetworkLoadBalancer,
        Self::NetworkLoadBalancerFrontendIpConfiguration,
        Self::NetworkLoadBalancerBackendAddressPool,
        Self::NetworkLoadBalancerProbe,
        Self::KeyVaultVault,
        Self::KeyVaultKey,
        Self::KeyVaultSecret,
        Self::StorageAccount,
        Self::StorageBlobContainer,
        Self::StorageFileShare,
        Self::StorageQueue,
        Self::ManagedIdentityUserAssignedIdentity,
        Self::Ip,
        Self::Dns,
        Self::Http,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComputeVirtualMachine => "azure-compute-virtual-machine",
            Self::ComputeVirtualMachineExtension => "azure-compute-virtual-machine-extension",
            Self::ComputeDisk => "azure-compute-disk",
            Self::ComputeAvailabilitySet => "azure-compute-availability-set",
            Self::ComputeDiskEncryptionSet => "azure-compute-disk-encryption-set",
            Self::NetworkVirtualNetwork => "azure-network-virtual-network",
            Self::NetworkSubnet => "azure-network-subnet",
            Self::NetworkVirtualNetworkPeering => "azure-network-virtual-network-peering",
            Self::NetworkNetworkInterface => "azure-network-network-interface",
            Self::NetworkPublicIpAddress => "azure-network-public-ip-address",
            Self::NetworkNetworkSecurityGroup => "azure-network-network-security-group",
            Self::NetworkRouteTable => "azure-network-route-table",
            Self::NetworkNatGateway => "azure-network-nat-gateway",
            Self::NetworkLoadBalancer => "azure-network-load-balancer",
            Self::NetworkLoadBalancerFrontendIpConfiguration => {
                "azure-network-load-balancer-frontend-ip-configuration"
            }
            Self::NetworkLoadBalancerBackendAddressPool => {
                "azure-network-load-balancer-backend-address-pool"
            }
            Self::NetworkLoadBalancerProbe => "azure-network-load-balancer-probe",
            Self::KeyVaultVault => "azure-keyvault-vault",
            Self::KeyVaultKey => "azure-keyvault-key",
            Self::KeyVaultSecret => "azure-keyvault-secret",
            Self::StorageAccount => "azure-storage-account",
            Self::StorageBlobContainer => "azure-storage-blob-container",
            Self::StorageFileShare => "azure-storage-file-share",
            Self::StorageQueue => "azure-storage-queue",
            Self::ManagedIdentityUserAssignedIdentity => {
                "azure-managed-identity-user-assigned-identity"
            }
            Self::Ip => "ip",
            Self::Dns => "dns",
            Self::Http => "http",
        }
    }

    /// Standard types live in the global scope and have no Azure adapter
    pub fn is_standard(&self) -> bool {
        matches!(self, Self::Ip | Self::Dns | Self::Http)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown item type: {}", s))
    }
}
