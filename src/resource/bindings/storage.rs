//! Storage references

use super::identity::user_assigned_identities;
use super::keyvault::vault_name;
use super::{parent, TypeBinding};
use crate::item::ItemType;
use crate::link::{LinkKind, ReferenceBag};
use crate::resource::mapper::RecordView;

pub(super) static BINDINGS: &[TypeBinding] = &[
    TypeBinding {
        item_type: ItemType::StorageAccount,
        references: account,
    },
    TypeBinding {
        item_type: ItemType::StorageBlobContainer,
        references: account_child,
    },
    TypeBinding {
        item_type: ItemType::StorageFileShare,
        references: account_child,
    },
    TypeBinding {
        item_type: ItemType::StorageQueue,
        references: account_child,
    },
];

fn account(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.children(ItemType::StorageBlobContainer, view.parts)
        .children(ItemType::StorageFileShare, view.parts)
        .children(ItemType::StorageQueue, view.parts);

    if let Some(endpoints) = view
        .get("properties.primaryEndpoints")
        .and_then(|v| v.as_object())
    {
        for endpoint in endpoints.values() {
            bag.url(endpoint.as_str());
        }
    }

    // Customer-managed keys are referenced by vault URI and key name
    let key_vault = view.str_at("properties.encryption.keyvaultproperties.keyvaulturi");
    let key_name = view.str_at("properties.encryption.keyvaultproperties.keyname");
    let key_parts = key_vault
        .and_then(vault_name)
        .zip(key_name)
        .map(|(vault, key)| vec![vault, key.to_string()]);
    bag.parts(LinkKind::Dependency, ItemType::KeyVaultKey, key_parts, None);

    user_assigned_identities(view, bag);
}

fn account_child(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::StorageAccount);
}
