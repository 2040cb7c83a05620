//! Collapsible navigation menu

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    /// Tab key when the group has no children
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    /// (tab key, icon)
    items: Vec<(&'static str, &'static str)>,
    admin_only: bool,
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "d401_overview",
            label: "Painel",
            icon: "dashboard",
            items: vec![],
            admin_only: false,
        },
        MenuGroup {
            id: "cadastros",
            label: "Cadastros",
            icon: "producers",
            items: vec![("a001_producer", "producers"), ("a001_producer_new", "plus")],
            admin_only: false,
        },
        MenuGroup {
            id: "producao",
            label: "Produção",
            icon: "entries",
            items: vec![("a002_entry", "entries"), ("a002_entry_new", "plus")],
            admin_only: false,
        },
        MenuGroup {
            id: "d400_production_report",
            label: "Relatórios",
            icon: "report",
            items: vec![],
            admin_only: false,
        },
        MenuGroup {
            id: "administracao",
            label: "Administração",
            icon: "shield",
            items: vec![("sys_users", "users")],
            admin_only: true,
        },
    ]
}

#[component]
fn MenuGroupView(group: MenuGroup, expanded_groups: RwSignal<Vec<&'static str>>) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let gid = group.id;
    let has_children = !group.items.is_empty();
    let is_expanded = move || expanded_groups.with(|g| g.contains(&gid));

    let on_click = move |_| {
        if has_children {
            expanded_groups.update(|groups| {
                if let Some(pos) = groups.iter().position(|g| *g == gid) {
                    groups.remove(pos);
                } else {
                    groups.push(gid);
                }
            });
        } else {
            ctx.open_tab(gid, &tab_label_for_key(gid));
        }
    };

    let children = group.items.into_iter().map(|(key, icon_name)| {
        let label = tab_label_for_key(key);
        let title = label.clone();
        view! {
            <div
                class="app-sidebar__item app-sidebar__item--child"
                class:app-sidebar__item--active=move || ctx.active.with(|a| a.as_deref() == Some(key))
                on:click=move |_| ctx.open_tab(key, &title)
            >
                <div class="app-sidebar__item-content">
                    {icon(icon_name)}
                    <span>{label}</span>
                </div>
            </div>
        }
    }).collect_view();

    view! {
        <div>
            <div
                class="app-sidebar__item"
                class:app-sidebar__item--active=move || {
                    !has_children && ctx.active.with(|a| a.as_deref() == Some(gid))
                }
                on:click=on_click
            >
                <div class="app-sidebar__item-content">
                    {icon(group.icon)}
                    <span>{group.label}</span>
                </div>
                {has_children.then(|| view! {
                    <div class="app-sidebar__chevron" class:app-sidebar__chevron--expanded=is_expanded>
                        {icon("chevron-right")}
                    </div>
                })}
            </div>
            <div class="app-sidebar__children" class:hidden=move || !is_expanded()>
                {children}
            </div>
        </div>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let expanded_groups = RwSignal::new(vec!["cadastros", "producao"]);

    let groups = get_menu_groups()
        .into_iter()
        .map(|group| {
            let admin_only = group.admin_only;
            view! {
                <Show when=move || !admin_only || auth_state.with(|s| s.is_admin())>
                    <MenuGroupView group=group.clone() expanded_groups=expanded_groups />
                </Show>
            }
        })
        .collect_view();

    view! { <div class="app-sidebar__content">{groups}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_keys_have_labels() {
        for group in get_menu_groups() {
            if group.items.is_empty() {
                assert_ne!(tab_label_for_key(group.id), group.id);
            }
            for (key, _) in group.items {
                assert_ne!(tab_label_for_key(key), key);
            }
        }
    }

    #[test]
    fn test_only_administration_is_restricted() {
        let restricted: Vec<_> = get_menu_groups()
            .into_iter()
            .filter(|g| g.admin_only)
            .map(|g| g.id)
            .collect();
        assert_eq!(restricted, vec!["administracao"]);
    }
}
