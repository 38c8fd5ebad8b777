//! Menu descriptors, native menu construction, and action dispatch.
//!
//! Menus are declared as data (`MenuNode` trees): the tray context menu and
//! the application menu. A descriptor carries a stable id, label, optional
//! accelerator, and an enum-tagged `MenuAction`; one `dispatch` function
//! executes actions, so menu structure and behavior stay independently
//! testable. No dynamic menu state — items are never checked or disabled.

use tauri::menu::{Menu, MenuBuilder, MenuEvent, MenuItem, Submenu, SubmenuBuilder};
use tracing::debug;

use crate::popup;
use crate::surface;
use crate::zoom::{self, ZoomChange};

/// Side-effecting action bound to a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Run the in-page new-chat script.
    NewChat,
    /// Open a fresh chat in the system browser.
    NewChatInBrowser,
    /// Query the live page URL and open it in the system browser.
    OpenCurrentInBrowser,
    /// Open a fixed URL in the system browser.
    OpenExternal(&'static str),
    Reload,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Quit,
}

pub struct MenuItemSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub accelerator: Option<&'static str>,
    pub action: MenuAction,
}

pub enum MenuNode {
    Item(MenuItemSpec),
    Separator,
    Submenu {
        label: &'static str,
        items: &'static [MenuNode],
    },
}

const ZOOM_SUBMENU: &[MenuNode] = &[
    MenuNode::Item(MenuItemSpec {
        id: "zoom_in",
        label: "Zoom In",
        accelerator: Some("CmdOrCtrl+="),
        action: MenuAction::ZoomIn,
    }),
    MenuNode::Item(MenuItemSpec {
        id: "zoom_out",
        label: "Zoom Out",
        accelerator: Some("CmdOrCtrl+-"),
        action: MenuAction::ZoomOut,
    }),
    MenuNode::Item(MenuItemSpec {
        id: "zoom_reset",
        label: "Reset Zoom",
        accelerator: Some("CmdOrCtrl+0"),
        action: MenuAction::ZoomReset,
    }),
];

/// Tray context menu, shown on tray right-click.
pub const TRAY_MENU: &[MenuNode] = &[
    MenuNode::Item(MenuItemSpec {
        id: "new_chat",
        label: "New Chat",
        accelerator: Some("CmdOrCtrl+N"),
        action: MenuAction::NewChat,
    }),
    MenuNode::Item(MenuItemSpec {
        id: "reload",
        label: "Reload",
        accelerator: Some("CmdOrCtrl+R"),
        action: MenuAction::Reload,
    }),
    MenuNode::Item(MenuItemSpec {
        id: "open_in_browser",
        label: "Open in Browser",
        accelerator: Some("CmdOrCtrl+O"),
        action: MenuAction::OpenCurrentInBrowser,
    }),
    MenuNode::Separator,
    MenuNode::Item(MenuItemSpec {
        id: "view_github",
        label: "View on GitHub",
        accelerator: None,
        action: MenuAction::OpenExternal("https://github.com/chatbar/chatbar"),
    }),
    MenuNode::Item(MenuItemSpec {
        id: "author_twitter",
        label: "Author on Twitter",
        accelerator: None,
        action: MenuAction::OpenExternal("https://twitter.com/chatbar_app"),
    }),
    MenuNode::Separator,
    MenuNode::Submenu {
        label: "Zoom",
        items: ZOOM_SUBMENU,
    },
    MenuNode::Separator,
    MenuNode::Item(MenuItemSpec {
        id: "quit",
        label: "Quit",
        accelerator: Some("CmdOrCtrl+Q"),
        action: MenuAction::Quit,
    }),
];

/// Application menu File entries (the top-level menu is minimal).
pub const APP_FILE_MENU: &[MenuNode] = &[
    MenuNode::Item(MenuItemSpec {
        id: "new_chat",
        label: "New Chat",
        accelerator: Some("CmdOrCtrl+N"),
        action: MenuAction::NewChat,
    }),
    MenuNode::Item(MenuItemSpec {
        id: "new_chat_in_browser",
        label: "New Chat in Browser",
        accelerator: Some("CmdOrCtrl+Shift+N"),
        action: MenuAction::NewChatInBrowser,
    }),
    MenuNode::Item(MenuItemSpec {
        id: "open_in_browser",
        label: "Open Current Chat in Browser",
        accelerator: Some("CmdOrCtrl+O"),
        action: MenuAction::OpenCurrentInBrowser,
    }),
    MenuNode::Separator,
    MenuNode::Item(MenuItemSpec {
        id: "quit",
        label: "Quit ChatBar",
        accelerator: Some("CmdOrCtrl+Q"),
        action: MenuAction::Quit,
    }),
];

// --- Native menu construction ---

fn build_submenu<R: tauri::Runtime>(
    app: &impl tauri::Manager<R>,
    label: &str,
    nodes: &'static [MenuNode],
) -> Result<Submenu<R>, tauri::Error> {
    let mut builder = SubmenuBuilder::new(app, label);
    for node in nodes {
        builder = match node {
            MenuNode::Item(spec) => builder.item(&MenuItem::with_id(
                app,
                spec.id,
                spec.label,
                true,
                spec.accelerator,
            )?),
            MenuNode::Separator => builder.separator(),
            MenuNode::Submenu { label, items } => builder.item(&build_submenu(app, label, items)?),
        };
    }
    builder.build()
}

/// Builds a native menu from a descriptor list.
pub fn build_menu<R: tauri::Runtime>(
    app: &impl tauri::Manager<R>,
    nodes: &'static [MenuNode],
) -> Result<Menu<R>, tauri::Error> {
    let mut builder = MenuBuilder::new(app);
    for node in nodes {
        builder = match node {
            MenuNode::Item(spec) => builder.item(&MenuItem::with_id(
                app,
                spec.id,
                spec.label,
                true,
                spec.accelerator,
            )?),
            MenuNode::Separator => builder.separator(),
            MenuNode::Submenu { label, items } => builder.item(&build_submenu(app, label, items)?),
        };
    }
    builder.build()
}

/// The application's top-level menu: a File submenu over `APP_FILE_MENU`.
pub fn build_app_menu<R: tauri::Runtime>(
    app: &impl tauri::Manager<R>,
) -> Result<Menu<R>, tauri::Error> {
    let file = build_submenu(app, "File", APP_FILE_MENU)?;
    MenuBuilder::new(app).item(&file).build()
}

// --- Dispatch ---

fn find_in(nodes: &'static [MenuNode], id: &str) -> Option<MenuAction> {
    for node in nodes {
        match node {
            MenuNode::Item(spec) if spec.id == id => return Some(spec.action),
            MenuNode::Submenu { items, .. } => {
                if let Some(action) = find_in(items, id) {
                    return Some(action);
                }
            }
            _ => {}
        }
    }
    None
}

/// Resolves a menu item id to its action, across both menus.
pub fn find_action(id: &str) -> Option<MenuAction> {
    find_in(TRAY_MENU, id).or_else(|| find_in(APP_FILE_MENU, id))
}

/// Executes a menu action. The single behavior sink for every menu item.
pub fn dispatch<R: tauri::Runtime>(app: &tauri::AppHandle<R>, action: MenuAction) {
    match action {
        MenuAction::NewChat => surface::new_chat(app),
        MenuAction::NewChatInBrowser => surface::open_external(app, surface::CHAT_URL),
        MenuAction::OpenCurrentInBrowser => surface::open_current_page_in_browser(app),
        MenuAction::OpenExternal(url) => surface::open_external(app, url),
        MenuAction::Reload => popup::reload(app),
        MenuAction::ZoomIn => zoom::apply_change(app, ZoomChange::In),
        MenuAction::ZoomOut => zoom::apply_change(app, ZoomChange::Out),
        MenuAction::ZoomReset => zoom::apply_change(app, ZoomChange::Reset),
        MenuAction::Quit => app.exit(0),
    }
}

/// Handles a menu click from the tray or application menu.
pub fn handle_menu_event<R: tauri::Runtime>(app: &tauri::AppHandle<R>, event: MenuEvent) {
    let id = event.id().0.as_str();
    match find_action(id) {
        Some(action) => dispatch(app, action),
        None => debug!(id, "Menu event with no bound action"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_ids(nodes: &'static [MenuNode], out: &mut Vec<&'static str>) {
        for node in nodes {
            match node {
                MenuNode::Item(spec) => out.push(spec.id),
                MenuNode::Submenu { items, .. } => collect_ids(items, out),
                MenuNode::Separator => {}
            }
        }
    }

    #[test]
    fn tray_menu_ids_are_unique() {
        let mut ids = Vec::new();
        collect_ids(TRAY_MENU, &mut ids);
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn every_item_resolves_to_its_action() {
        let mut ids = Vec::new();
        collect_ids(TRAY_MENU, &mut ids);
        collect_ids(APP_FILE_MENU, &mut ids);
        for id in ids {
            assert!(find_action(id).is_some(), "{id} has no action");
        }
    }

    #[test]
    fn unknown_id_resolves_to_nothing() {
        assert_eq!(find_action("does_not_exist"), None);
    }

    #[test]
    fn shared_ids_agree_across_menus() {
        // "new_chat" and "open_in_browser" appear in both menus and must
        // trigger the same action regardless of which menu fired.
        assert_eq!(find_in(TRAY_MENU, "new_chat"), find_in(APP_FILE_MENU, "new_chat"));
        assert_eq!(
            find_in(TRAY_MENU, "open_in_browser"),
            find_in(APP_FILE_MENU, "open_in_browser"),
        );
    }

    #[test]
    fn advertised_accelerators_are_declared() {
        let cases = [
            ("new_chat", "CmdOrCtrl+N"),
            ("reload", "CmdOrCtrl+R"),
            ("open_in_browser", "CmdOrCtrl+O"),
            ("zoom_in", "CmdOrCtrl+="),
            ("zoom_out", "CmdOrCtrl+-"),
            ("zoom_reset", "CmdOrCtrl+0"),
            ("quit", "CmdOrCtrl+Q"),
        ];
        for (id, accel) in cases {
            let found = TRAY_MENU.iter().chain(ZOOM_SUBMENU).find_map(|node| match node {
                MenuNode::Item(spec) if spec.id == id => spec.accelerator,
                _ => None,
            });
            assert_eq!(found, Some(accel), "accelerator mismatch for {id}");
        }
    }

    #[test]
    fn zoom_actions_live_in_a_submenu() {
        let zoom = TRAY_MENU.iter().find_map(|node| match node {
            MenuNode::Submenu { label, items } if *label == "Zoom" => Some(items),
            _ => None,
        });
        let items = zoom.expect("tray menu has a Zoom submenu");
        let actions: Vec<_> = items
            .iter()
            .filter_map(|node| match node {
                MenuNode::Item(spec) => Some(spec.action),
                _ => None,
            })
            .collect();
        assert_eq!(
            actions,
            vec![MenuAction::ZoomIn, MenuAction::ZoomOut, MenuAction::ZoomReset]
        );
    }
}
