use super::order::MenuItem;

/// Menu items picked for an order, plus the requested names the menu
/// does not carry.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSelection {
    pub items: Vec<MenuItem>,
    pub unknown: Vec<String>,
}

/// Keep the menu items whose name was requested, in menu order. A menu item
/// is selected once even when the request repeats its name. Names are
/// compared exactly (case-sensitive).
pub fn select_menu_items(menu: &[MenuItem], requested: &[String]) -> MenuSelection {
    let items: Vec<MenuItem> = menu
        .iter()
        .filter(|item| requested.iter().any(|name| *name == item.name))
        .cloned()
        .collect();

    let mut unknown: Vec<String> = Vec::new();
    for name in requested {
        if !menu.iter().any(|item| item.name == *name) && !unknown.contains(name) {
            unknown.push(name.clone());
        }
    }

    MenuSelection { items, unknown }
}
