//! Sidebar and top-bar menu definitions.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

/// One menu entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub to: &'static str,
    /// Tabler icon name.
    pub icon: &'static str,
}

pub const VERTICAL_MENU: &[NavItem] = &[
    NavItem { title: "Home", to: "/", icon: "tabler-smart-home" },
    NavItem { title: "Books", to: "/dashboard/books", icon: "tabler-book" },
    NavItem { title: "Courses", to: "/dashboard/courses", icon: "tabler-school" },
    NavItem { title: "Departments", to: "/dashboard/departments", icon: "tabler-building" },
];

pub const HORIZONTAL_MENU: &[NavItem] = &[
    NavItem { title: "Home", to: "/dashboard", icon: "tabler-smart-home" },
    NavItem { title: "Books", to: "/dashboard/books", icon: "tabler-book" },
    NavItem { title: "Categories", to: "/dashboard/categories", icon: "tabler-category" },
    NavItem { title: "Departments", to: "/dashboard/departments", icon: "tabler-building" },
    NavItem { title: "Courses", to: "/dashboard/courses", icon: "tabler-school" },
];

/// The entry matching `path` most specifically (longest route prefix).
pub fn active_item<'a>(menu: &'a [NavItem], path: &str) -> Option<&'a NavItem> {
    menu.iter()
        .filter(|item| {
            path == item.to
                || (item.to != "/"
                    && path
                        .strip_prefix(item.to)
                        .is_some_and(|rest| rest.starts_with('/')))
        })
        .max_by_key(|item| item.to.len())
}
