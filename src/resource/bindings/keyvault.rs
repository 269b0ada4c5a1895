//! Key Vault references

use super::{parent, TypeBinding};
use crate::item::ItemType;
use crate::link::ReferenceBag;
use crate::resource::mapper::RecordView;
use url::Url;

pub(super) static BINDINGS: &[TypeBinding] = &[
    TypeBinding {
        item_type: ItemType::KeyVaultVault,
        references: vault,
    },
    TypeBinding {
        item_type: ItemType::KeyVaultKey,
        references: key,
    },
    TypeBinding {
        item_type: ItemType::KeyVaultSecret,
        references: secret,
    },
];

fn vault(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    bag.children(ItemType::KeyVaultKey, view.parts)
        .children(ItemType::KeyVaultSecret, view.parts)
        .url(view.str_at("properties.vaultUri"));
}

fn key(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::KeyVaultVault);
    bag.url(view.str_at("properties.keyUri"));
}

fn secret(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    parent(view, bag, ItemType::KeyVaultVault);
    bag.url(view.str_at("properties.secretUri"));
}

/// Vault name from a data-plane URI (`https://{vault}.vault.azure.net/...`)
pub(super) fn vault_name(uri: &str) -> Option<String> {
    let url = Url::parse(uri.trim()).ok()?;
    let host = url.host_str()?;
    let (name, _) = host.split_once('.')?;
    (!name.is_empty()).then(|| name.to_string())
}

/// `(vault, object)` parts from a key or secret URI
/// (`https://{vault}.vault.azure.net/{collection}/{name}[/{version}]`)
pub(super) fn vault_object_parts(uri: &str, collection: &str) -> Option<Vec<String>> {
    let vault = vault_name(uri)?;
    let url = Url::parse(uri.trim()).ok()?;
    let mut path = url.path_segments()?.filter(|s| !s.is_empty());
    if path.next()? != collection {
        return None;
    }
    let object = path.next()?;
    Some(vec![vault, object.to_string()])
}
