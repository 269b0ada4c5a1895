//! Compute references

use super::identity::user_assigned_identities;
use super::keyvault::{vault_name, vault_object_parts};
use super::{parent, TypeBinding};
use crate::item::ItemType;
use crate::link::{LinkKind, ReferenceBag};
use crate::resource::mapper::{id_at, id_of, str_at, RecordView};

pub(super) static BINDINGS: &[TypeBinding] = &[
    TypeBinding {
        item_type: ItemType::ComputeVirtualMachine,
        references: virtual_machine,
    },
    TypeBinding {
        item_type: ItemType::ComputeVirtualMachineExtension,
        references: virtual_machine_extension,
    },
    TypeBinding {
        item_type: ItemType::ComputeDisk,
        references: disk,
    },
    TypeBinding {
        item_type: ItemType::ComputeAvailabilitySet,
        references: availability_set,
    },
    TypeBinding {
        item_type: ItemType::ComputeDiskEncryptionSet,
        references: disk_encryption_set,
    },
];

fn virtual_machine(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.children(ItemType::ComputeVirtualMachineExtension, view.parts);

    for nic in view.array_at("properties.networkProfile.networkInterfaces") {
        bag.id(LinkKind::Dependency, ItemType::NetworkNetworkInterface, id_of(nic));
    }

    let os_disk = view.get("properties.storageProfile.osDisk.managedDisk");
    let data_disks = view
        .array_at("properties.storageProfile.dataDisks")
        .iter()
        .filter_map(|disk| disk.get("managedDisk"));
    for managed_disk in os_disk.into_iter().chain(data_disks) {
        bag.id(LinkKind::Dependency, ItemType::ComputeDisk, id_of(managed_disk))
            .id(
                LinkKind::Dependency,
                ItemType::ComputeDiskEncryptionSet,
                id_at(managed_disk, "diskEncryptionSet"),
            );
    }

    bag.id(
        LinkKind::Dependency,
        ItemType::ComputeAvailabilitySet,
        view.id_at("properties.availabilitySet"),
    )
    .url(view.str_at("properties.diagnosticsProfile.bootDiagnostics.storageUri"));

    user_assigned_identities(view, bag);
}

fn virtual_machine_extension(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::ComputeVirtualMachine);
}

fn disk(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.id(
        LinkKind::Dependent,
        ItemType::ComputeVirtualMachine,
        view.str_at("managedBy"),
    )
    .id(
        LinkKind::Dependency,
        ItemType::ComputeDiskEncryptionSet,
        view.str_at("properties.encryption.diskEncryptionSetId"),
    )
    .owner(
        LinkKind::Dependency,
        &[ItemType::ComputeDisk],
        view.str_at("properties.creationData.sourceResourceId"),
    );
}

fn availability_set(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    for vm in view.array_at("properties.virtualMachines") {
        bag.id(LinkKind::Dependent, ItemType::ComputeVirtualMachine, id_of(vm));
    }
}

/// Active and previous keys frequently point at the same vault key; the link
/// builder keeps one edge per key.
fn disk_encryption_set(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    let active = view.get("properties.activeKey");
    let previous = view.array_at("properties.previousKeys");

    for key in active.into_iter().chain(previous) {
        let source_vault = id_at(key, "sourceVault");
        let key_url = str_at(key, "keyUrl");

        bag.parts(
            LinkKind::Dependency,
            ItemType::KeyVaultKey,
            key_url.and_then(|url| vault_object_parts(url, "keys")),
            source_vault,
        )
        .id(LinkKind::Dependency, ItemType::KeyVaultVault, source_vault)
        .parts(
            LinkKind::Dependency,
            ItemType::KeyVaultVault,
            key_url.and_then(vault_name).map(|vault| vec![vault]),
            source_vault,
        )
        .url(key_url);
    }

    user_assigned_identities(view, bag);
}
