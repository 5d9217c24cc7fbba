use super::*;
use crate::state::resources::ResourceKind;

#[test]
fn active_item_picks_longest_match() {
    let item = active_item(HORIZONTAL_MENU, "/dashboard/books").expect("item");
    assert_eq!(item.title, "Books");

    let item = active_item(HORIZONTAL_MENU, "/dashboard").expect("item");
    assert_eq!(item.title, "Home");
}

#[test]
fn root_entry_only_matches_root() {
    assert_eq!(active_item(VERTICAL_MENU, "/").map(|i| i.title), Some("Home"));
    assert_eq!(active_item(VERTICAL_MENU, "/dashboard/categories"), None);
}

#[test]
fn menu_routes_point_at_known_resources() {
    for item in VERTICAL_MENU.iter().chain(HORIZONTAL_MENU) {
        if let Some(slug) = item.to.strip_prefix("/dashboard/") {
            assert!(ResourceKind::from_slug(slug).is_some(), "{}", item.to);
        }
    }
}
