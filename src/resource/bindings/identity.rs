//! Managed identity references

use super::TypeBinding;
use crate::item::ItemType;
use crate::link::{LinkKind, ReferenceBag};
use crate::resource::mapper::RecordView;

pub(super) static BINDINGS: &[TypeBinding] = &[TypeBinding {
    item_type: ItemType::ManagedIdentityUserAssignedIdentity,
    references: user_assigned_identity,
}];

/// Identities are leaves: everything that uses one points at it
fn user_assigned_identity(_view: &RecordView<'_>, _bag: &mut ReferenceBag) {}

/// User-assigned identities attached to a resource. ARM keys the
/// `identity.userAssignedIdentities` map by identity id.
pub(super) fn user_assigned_identities(view: &RecordView<'_>, bag: &mut ReferenceBag) {
    if let Some(identities) = view
        .get("identity.userAssignedIdentities")
        .and_then(|v| v.as_object())
    {
        bag.ids(
            LinkKind::Dependency,
            ItemType::ManagedIdentityUserAssignedIdentity,
            identities.keys().map(String::as_str),
        );
    }
}
