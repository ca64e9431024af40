use crate::models::{MenuSection, Role};

/// Whether `role` may perform an action gated by `required`. No active
/// session means no role, which always denies.
pub fn is_allowed(role: Option<Role>, required: &[Role]) -> bool {
    match role {
        Some(role) => required.contains(&role),
        None => false,
    }
}

/// Restrict a menu table to what `role` may see. Items without an
/// `allowed_roles` list are visible to any authenticated role; sections left
/// with no visible items are dropped. No role sees nothing.
pub fn filter_menu(role: Option<Role>, table: &[MenuSection]) -> Vec<MenuSection> {
    let Some(role) = role else {
        return Vec::new();
    };

    table
        .iter()
        .map(|section| MenuSection {
            title: section.title.clone(),
            icon: section.icon.clone(),
            items: section
                .items
                .iter()
                .filter(|item| match &item.allowed_roles {
                    Some(allowed) => allowed.contains(&role),
                    None => true,
                })
                .cloned()
                .collect(),
        })
        .filter(|section| !section.items.is_empty())
        .collect()
}
