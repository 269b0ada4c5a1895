//! Type bindings
//!
//! A binding says which references a record of one item type carries. Static
//! metadata (segments, lookups, potential links) lives in the registry; the
//! binding only fills a [`ReferenceBag`] from a record.

mod compute;
mod identity;
mod keyvault;
mod network;
mod storage;

use super::mapper::RecordView;
use crate::item::ItemType;
use crate::link::{LinkKind, ReferenceBag};

/// Collects the references of one record
pub type ReferenceFn = fn(&RecordView<'_>, &mut ReferenceBag);

/// Reference extraction for one item type
pub struct TypeBinding {
    pub item_type: ItemType,
    pub references: ReferenceFn,
}

/// Every binding, grouped by service
pub fn all_bindings() -> impl Iterator<Item = &'static TypeBinding> {
    compute::BINDINGS
        .iter()
        .chain(network::BINDINGS)
        .chain(keyvault::BINDINGS)
        .chain(storage::BINDINGS)
        .chain(identity::BINDINGS)
}

/// Binding for an item type
pub fn get_binding(item_type: ItemType) -> Option<&'static TypeBinding> {
    all_bindings().find(|binding| binding.item_type == item_type)
}

/// Parent dependency shared by every child type
fn parent(view: &RecordView<'_>, bag: &mut ReferenceBag, parent_type: ItemType) {
    bag.parts(LinkKind::Dependency, parent_type, view.parent_parts(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::resource::mapper::map_record;
    use crate::resource::registry::{get_all_item_types, get_resource};
    use serde_json::{json, Value};
    use std::collections::HashSet;

    /// Map a record in scope `S1.RG1` under the given parent key
    pub(crate) fn map_for_test(item_type: ItemType, record: &Value, parent_parts: &[&str]) -> Item {
        let def = get_resource(item_type).unwrap();
        let binding = get_binding(item_type).unwrap();
        let parent_parts: Vec<String> = parent_parts.iter().map(|p| p.to_string()).collect();
        map_record(def, binding, record, "S1.RG1", &parent_parts, &[]).unwrap()
    }

    #[test]
    fn test_every_registered_type_has_one_binding() {
        for item_type in get_all_item_types() {
            let count = all_bindings().filter(|b| b.item_type == item_type).count();
            assert_eq!(count, 1, "{} should have exactly one binding", item_type);
        }
    }

    #[test]
    fn test_every_binding_is_registered() {
        let bound: HashSet<ItemType> = all_bindings().map(|b| b.item_type).collect();
        for item_type in bound {
            assert!(get_resource(item_type).is_some(), "{} is not registered", item_type);
        }
    }

    fn arm(path: &str) -> String {
        format!("/subscriptions/S1/resourceGroups/RG1/providers/{}", path)
    }

    /// A record per registered type with every referencing field filled in
    fn rich_records() -> Vec<(ItemType, Value, Vec<&'static str>)> {
        let nic_config = arm("Microsoft.Network/networkInterfaces/nic-1/ipConfigurations/ipconfig1");
        let frontend = arm("Microsoft.Network/loadBalancers/lb-1/frontendIPConfigurations/fe-a");
        let subnet = arm("Microsoft.Network/virtualNetworks/hub/subnets/apps");
        let pip = arm("Microsoft.Network/publicIPAddresses/pip-1");
        let nat = arm("Microsoft.Network/natGateways/nat-1");
        let nsg = arm("Microsoft.Network/networkSecurityGroups/nsg-1");
        let vault = arm("Microsoft.KeyVault/vaults/kv-1");
        let des = arm("Microsoft.Compute/diskEncryptionSets/des-1");
        let identity = arm("Microsoft.ManagedIdentity/userAssignedIdentities/id-1");
        let mut assigned = serde_json::Map::new();
        assigned.insert(identity, json!({}));
        let identities = json!({ "userAssignedIdentities": assigned });
        let key_url = "https://kv-1.vault.azure.net/keys/disk-key/v1";

        vec![
            (
                ItemType::ComputeVirtualMachine,
                json!({
                    "name": "vm-1",
                    "identity": identities,
                    "properties": {
                        "networkProfile": {"networkInterfaces": [{"id": arm("Microsoft.Network/networkInterfaces/nic-1")}]},
                        "storageProfile": {
                            "osDisk": {"managedDisk": {"id": arm("Microsoft.Compute/disks/os"), "diskEncryptionSet": {"id": des}}},
                            "dataDisks": [{"managedDisk": {"id": arm("Microsoft.Compute/disks/data")}}]
                        },
                        "availabilitySet": {"id": arm("Microsoft.Compute/availabilitySets/as-1")},
                        "diagnosticsProfile": {"bootDiagnostics": {"storageUri": "https://diag.blob.core.windows.net/"}}
                    }
                }),
                vec![],
            ),
            (ItemType::ComputeVirtualMachineExtension, json!({"name": "ext"}), vec!["vm-1"]),
            (
                ItemType::ComputeDisk,
                json!({
                    "name": "data",
                    "managedBy": arm("Microsoft.Compute/virtualMachines/vm-1"),
                    "properties": {
                        "encryption": {"diskEncryptionSetId": des},
                        "creationData": {"sourceResourceId": arm("Microsoft.Compute/disks/base")}
                    }
                }),
                vec![],
            ),
            (
                ItemType::ComputeAvailabilitySet,
                json!({"name": "as-1", "properties": {"virtualMachines": [{"id": arm("Microsoft.Compute/virtualMachines/vm-1")}]}}),
                vec![],
            ),
            (
                ItemType::ComputeDiskEncryptionSet,
                json!({
                    "name": "des-1",
                    "identity": identities,
                    "properties": {"activeKey": {"sourceVault": {"id": vault}, "keyUrl": key_url}}
                }),
                vec![],
            ),
            (ItemType::ManagedIdentityUserAssignedIdentity, json!({"name": "id-1"}), vec![]),
            (
                ItemType::KeyVaultVault,
                json!({"name": "kv-1", "properties": {"vaultUri": "https://kv-1.vault.azure.net/"}}),
                vec![],
            ),
            (
                ItemType::KeyVaultKey,
                json!({"name": "disk-key", "properties": {"keyUri": "https://kv-1.vault.azure.net/keys/disk-key"}}),
                vec!["kv-1"],
            ),
            (
                ItemType::KeyVaultSecret,
                json!({"name": "s", "properties": {"secretUri": "https://kv-1.vault.azure.net/secrets/s"}}),
                vec!["kv-1"],
            ),
            (
                ItemType::NetworkVirtualNetwork,
                json!({"name": "hub", "properties": {"dhcpOptions": {"dnsServers": ["10.0.0.10"]}}}),
                vec![],
            ),
            (
                ItemType::NetworkSubnet,
                json!({
                    "name": "apps",
                    "properties": {
                        "networkSecurityGroup": {"id": nsg},
                        "routeTable": {"id": arm("Microsoft.Network/routeTables/rt-1")},
                        "natGateway": {"id": nat},
                        "ipConfigurations": [
                            {"id": nic_config},
                            {"id": frontend},
                            {"id": arm("Microsoft.Network/virtualNetworkGateways/gw/ipConfigurations/default")}
                        ]
                    }
                }),
                vec!["hub"],
            ),
            (
                ItemType::NetworkVirtualNetworkPeering,
                json!({"name": "to-spoke", "properties": {"remoteVirtualNetwork": {"id": arm("Microsoft.Network/virtualNetworks/spoke")}}}),
                vec!["hub"],
            ),
            (
                ItemType::NetworkNetworkInterface,
                json!({
                    "name": "nic-1",
                    "properties": {
                        "virtualMachine": {"id": arm("Microsoft.Compute/virtualMachines/vm-1")},
                        "networkSecurityGroup": {"id": nsg},
                        "ipConfigurations": [{
                            "name": "ipconfig1",
                            "properties": {
                                "subnet": {"id": subnet},
                                "publicIPAddress": {"id": pip},
                                "privateIPAddress": "10.0.1.4",
                                "loadBalancerBackendAddressPools": [{"id": arm("Microsoft.Network/loadBalancers/lb-1/backendAddressPools/pool")}]
                            }
                        }],
                        "dnsSettings": {"dnsServers": ["10.0.0.11"]}
                    }
                }),
                vec![],
            ),
            (
                ItemType::NetworkPublicIpAddress,
                json!({
                    "name": "pip-1",
                    "properties": {
                        "ipAddress": "20.1.2.3",
                        "dnsSettings": {"fqdn": "app.westeurope.cloudapp.azure.com"},
                        "ipConfiguration": {"id": frontend},
                        "natGateway": {"id": nat}
                    }
                }),
                vec![],
            ),
            (
                ItemType::NetworkNetworkSecurityGroup,
                json!({
                    "name": "nsg-1",
                    "properties": {
                        "subnets": [{"id": subnet}],
                        "networkInterfaces": [{"id": arm("Microsoft.Network/networkInterfaces/nic-1")}]
                    }
                }),
                vec![],
            ),
            (
                ItemType::NetworkRouteTable,
                json!({
                    "name": "rt-1",
                    "properties": {
                        "subnets": [{"id": subnet}],
                        "routes": [{"properties": {"nextHopIpAddress": "10.0.0.4"}}]
                    }
                }),
                vec![],
            ),
            (
                ItemType::NetworkNatGateway,
                json!({"name": "nat-1", "properties": {"publicIpAddresses": [{"id": pip}], "subnets": [{"id": subnet}]}}),
                vec![],
            ),
            (
                ItemType::NetworkLoadBalancer,
                json!({
                    "name": "lb-1",
                    "properties": {
                        "frontendIPConfigurations": [{
                            "name": "fe-a",
                            "properties": {"publicIPAddress": {"id": pip}, "subnet": {"id": subnet}, "privateIPAddress": "10.0.1.9"}
                        }],
                        "backendAddressPools": [{"name": "pool"}],
                        "probes": [{"name": "http"}]
                    }
                }),
                vec![],
            ),
            (
                ItemType::NetworkLoadBalancerFrontendIpConfiguration,
                json!({"name": "fe-a", "properties": {"publicIPAddress": {"id": pip}, "subnet": {"id": subnet}, "privateIPAddress": "10.0.1.9"}}),
                vec!["lb-1"],
            ),
            (
                ItemType::NetworkLoadBalancerBackendAddressPool,
                json!({"name": "pool", "properties": {"backendIPConfigurations": [{"id": nic_config}, {"id": frontend}]}}),
                vec!["lb-1"],
            ),
            (ItemType::NetworkLoadBalancerProbe, json!({"name": "http"}), vec!["lb-1"]),
            (
                ItemType::StorageAccount,
                json!({
                    "name": "acct1",
                    "identity": identities,
                    "properties": {
                        "primaryEndpoints": {"blob": "https://acct1.blob.core.windows.net/"},
                        "encryption": {"keyvaultproperties": {"keyvaulturi": "https://kv-1.vault.azure.net/", "keyname": "acct-key"}}
                    }
                }),
                vec![],
            ),
            (ItemType::StorageBlobContainer, json!({"name": "logs"}), vec!["acct1"]),
            (ItemType::StorageFileShare, json!({"name": "share"}), vec!["acct1"]),
            (ItemType::StorageQueue, json!({"name": "jobs"}), vec!["acct1"]),
        ]
    }

    #[test]
    fn test_emitted_edges_stay_within_potential_links() {
        let records = rich_records();
        let covered: HashSet<ItemType> = records.iter().map(|(t, _, _)| *t).collect();
        for item_type in get_all_item_types() {
            assert!(covered.contains(&item_type), "no record for {}", item_type);
        }

        for (item_type, record, parents) in &records {
            let def = get_resource(*item_type).unwrap();
            let item = map_for_test(*item_type, record, parents);
            for link in &item.linked_item_queries {
                assert!(
                    def.potential_links.contains(&link.query.item_type),
                    "{} emits an edge to {} outside its potential links",
                    item_type,
                    link.query.item_type
                );
            }
        }
    }

    #[test]
    fn test_ip_configuration_owners_include_load_balancer_front_ends() {
        let records = rich_records();
        let (_, subnet, parents) = records
            .iter()
            .find(|(t, _, _)| *t == ItemType::NetworkSubnet)
            .unwrap();
        let item = map_for_test(ItemType::NetworkSubnet, subnet, parents);

        let frontends: Vec<_> = item
            .links_to(ItemType::NetworkLoadBalancerFrontendIpConfiguration)
            .collect();
        assert_eq!(frontends.len(), 1);
        assert_eq!(frontends[0].query.query, "lb-1|fe-a");
        assert_eq!(item.links_to(ItemType::NetworkNetworkInterface).count(), 1);
    }
}
