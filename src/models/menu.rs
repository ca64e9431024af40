use serde::{Deserialize, Serialize};

use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub icon: String,
    pub path: String,
    /// None means any authenticated role may see the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<Vec<Role>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSection {
    pub title: String,
    pub icon: String,
    pub items: Vec<MenuItem>,
}

fn item(label: &str, icon: &str, path: &str, allowed_roles: Option<Vec<Role>>) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        icon: icon.to_string(),
        path: path.to_string(),
        allowed_roles,
    }
}

/// The navigation table served to the admin front-end. Declarative; the
/// access resolver filters it per role on demand.
pub fn default_menu() -> Vec<MenuSection> {
    vec![
        MenuSection {
            title: "Quick Access".to_string(),
            icon: "bolt".to_string(),
            items: vec![
                item("Home", "home", "/home", None),
                item("Analytics", "equalizer", "/analytics", None),
            ],
        },
        MenuSection {
            title: "Records".to_string(),
            icon: "receipt_long".to_string(),
            items: vec![
                item(
                    "Vehicles",
                    "directions_car",
                    "/vehicles",
                    Some(vec![Role::Admin]),
                ),
                item("Users", "person", "/users", Some(vec![Role::Admin])),
                item("New Appointment", "event", "/new-appointments", None),
            ],
        },
        MenuSection {
            title: "Settings".to_string(),
            icon: "build".to_string(),
            items: vec![item("Preferences", "display_settings", "/configs", None)],
        },
    ]
}
