//! Role-conditional navigation menu
//!
//! The menu is computed fresh per call from the subject's role; there is no
//! shared mutable navigation list.

use serde::Serialize;

use crate::core::auth::Role;

/// A single navigation entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

impl MenuItem {
    const fn new(label: &'static str, path: &'static str) -> Self {
        Self { label, path }
    }
}

/// Build the ordered navigation menu for a role.
///
/// All roles see the dashboard base entries. Sellers and admins get
/// "Add Property" after "My Properties"; admins additionally get the
/// administration section.
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    let mut menu = vec![
        MenuItem::new("Dashboard", "/dashboard"),
        MenuItem::new("My Properties", "/dashboard/properties"),
        MenuItem::new("Favorites", "/dashboard/favorites"),
        MenuItem::new("Profile", "/dashboard/profile"),
    ];

    if matches!(role, Role::Seller | Role::Admin) {
        menu.insert(
            2,
            MenuItem::new("Add Property", "/dashboard/properties/add"),
        );
    }

    if role == Role::Admin {
        menu.extend([
            MenuItem::new("Admin Dashboard", "/admin"),
            MenuItem::new("Manage Users", "/admin/users"),
            MenuItem::new("Manage Properties", "/admin/properties"),
            MenuItem::new("Sales Management", "/admin/sales"),
            MenuItem::new("Manage Schedules", "/admin/schedules"),
            MenuItem::new("Settings", "/admin/settings"),
        ]);
    }

    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyer_menu_is_base_only() {
        let menu = menu_for(Role::Buyer);
        let labels: Vec<_> = menu.iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            vec!["Dashboard", "My Properties", "Favorites", "Profile"]
        );
    }

    #[test]
    fn test_seller_gets_add_property_at_third_position() {
        let menu = menu_for(Role::Seller);
        assert_eq!(menu[2].label, "Add Property");
        assert!(!menu.iter().any(|m| m.path.starts_with("/admin")));
    }

    #[test]
    fn test_agent_menu_has_no_add_property() {
        let menu = menu_for(Role::Agent);
        assert!(!menu.iter().any(|m| m.label == "Add Property"));
    }

    #[test]
    fn test_admin_menu_has_admin_section() {
        let menu = menu_for(Role::Admin);
        assert_eq!(menu[2].label, "Add Property");
        assert!(menu.iter().any(|m| m.path == "/admin/schedules"));
        assert_eq!(menu.last().unwrap().label, "Settings");
    }

    #[test]
    fn test_menu_is_pure() {
        assert_eq!(menu_for(Role::Admin), menu_for(Role::Admin));
    }
}
