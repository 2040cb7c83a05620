mod state;

use contracts::system::users::{UserAccount, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::browser::alert;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::data::services::save_user_changes;
use crate::shared::data::use_repository;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    any_field_contains, get_sort_class, get_sort_indicator, visible_page, SearchInput, Searchable,
    Sortable,
};
use crate::shared::modal::Modal;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::state::{LoadState, LoadStateSignal};
use crate::system::auth::guard::RequireAdmin;
use state::create_state;

impl Searchable for UserAccount {
    fn matches_filter(&self, filter: &str) -> bool {
        any_field_contains(&[self.full_name.as_str(), self.email.as_str(), self.role.label()], filter)
    }
}

impl Sortable for UserAccount {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "email" => self.email.to_lowercase().cmp(&other.email.to_lowercase()),
            "role" => self.role.label().cmp(other.role.label()),
            "active" => self.active.cmp(&other.active),
            _ => self
                .full_name
                .to_lowercase()
                .cmp(&other.full_name.to_lowercase()),
        }
    }
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireAdmin>
            <UsersList />
        </RequireAdmin>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let repo = use_repository();
    let query = create_state();
    let all_users: RwSignal<Vec<UserAccount>> = RwSignal::new(Vec::new());
    let load_state = RwSignal::new(LoadState::Idle);
    let editing: RwSignal<Option<UserAccount>> = RwSignal::new(None);

    let load_data = {
        let repo = repo.clone();
        move || {
            if !load_state.try_begin() {
                return;
            }
            let repo = repo.clone();
            spawn_local(async move {
                match repo.fetch_users().await {
                    Ok(users) => {
                        all_users.set(users);
                        load_state.succeed();
                    }
                    Err(e) => load_state.fail(format!("Não foi possível carregar os usuários: {}", e)),
                }
            });
        }
    };
    load_data();

    let page = Memo::new(move |_| all_users.with(|users| query.with(|q| visible_page(users, q))));

    let sort_header = move |field: &'static str, label: &'static str| {
        view! {
            <TableHeaderCell>
                <div
                    class=move || query.with(|q| get_sort_class(&q.sort_field, field))
                    on:click=move |_| query.update(|q| q.toggle_sort(field))
                >
                    {label}
                    <span>{move || query.with(|q| get_sort_indicator(&q.sort_field, field, q.sort_ascending))}</span>
                </div>
            </TableHeaderCell>
        }
    };

    let reload = load_data.clone();

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Usuários"</h1>
                    <Badge>{move || page.with(|p| p.total_count.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| reload()
                        disabled=Signal::derive(move || load_state.with(LoadState::is_loading))
                    >
                        {icon("refresh")}
                        {move || if load_state.with(LoadState::is_loading) { " Carregando..." } else { " Atualizar" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || load_state.with(|s| s.error().map(|e| view! { <div class="alert alert--error">{e.to_string()}</div> }))}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            <SearchInput
                                value=Signal::derive(move || query.with(|q| q.search.clone()))
                                on_change=Callback::new(move |text: String| query.update(|q| {
                                    q.search = text;
                                    q.page = 0;
                                }))
                                placeholder="Nome, e-mail ou perfil..."
                            />
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || page.with(|p| p.page))
                                total_pages=Signal::derive(move || page.with(|p| p.total_pages))
                                total_count=Signal::derive(move || page.with(|p| p.total_count))
                                page_size=Signal::derive(move || query.with(|q| q.page_size))
                                on_page_change=Callback::new(move |p| query.update(|q| q.page = p))
                                on_page_size_change=Callback::new(move |size| query.update(|q| {
                                    q.page_size = size;
                                    q.page = 0;
                                }))
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {sort_header("full_name", "Nome")}
                                {sort_header("email", "E-mail")}
                                {sort_header("role", "Perfil")}
                                {sort_header("active", "Situação")}
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || page.get().items
                                key=|u| (u.id, u.role, u.active)
                                children=move |user| {
                                    let for_edit = user.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span class="table__cell--strong">{user.full_name.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{user.email.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=role_badge(user.role)>{user.role.label()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if user.active {
                                                        view! { <span class="badge badge--success">"Ativo"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--error">"Inativo"</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| editing.set(Some(for_edit.clone()))
                                                    attr:title="Editar"
                                                >
                                                    {icon("edit")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || editing.get().map(|user| view! {
                    <EditUserModal
                        user=user
                        on_close=Callback::new(move |_| editing.set(None))
                        on_saved=Callback::new(move |users: Vec<UserAccount>| {
                            all_users.set(users);
                            editing.set(None);
                        })
                    />
                })}
            </div>
        </PageFrame>
    }
}

fn role_badge(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "badge badge--warning",
        UserRole::Gestor => "badge badge--info",
        UserRole::Usuario => "badge badge--neutral",
    }
}

/// Role and status editor; accounts themselves are created through the auth provider
#[component]
fn EditUserModal(
    user: UserAccount,
    on_close: Callback<()>,
    on_saved: Callback<Vec<UserAccount>>,
) -> impl IntoView {
    let repo = use_repository();
    let role = RwSignal::new(user.role.as_str().to_string());
    let active = RwSignal::new(user.active);
    let saving = RwSignal::new(LoadState::Idle);
    let title = format!("Editar acesso: {}", user.full_name);

    let on_save = move |_| {
        if !saving.try_begin() {
            return;
        }
        let repo = repo.clone();
        let original = user.clone();
        let new_role = UserRole::from_str_or_default(&role.get_untracked());
        let new_active = active.get_untracked();
        spawn_local(async move {
            match save_user_changes(repo.as_ref(), &original, new_role, new_active).await {
                Ok(users) => {
                    saving.succeed();
                    on_saved.run(users);
                }
                Err(e) => {
                    saving.fail(e.to_string());
                    alert(&format!("Erro ao salvar usuário: {}", e));
                }
            }
        });
    };

    let busy = Signal::derive(move || saving.with(LoadState::is_loading));

    view! {
        <Modal title=title on_close=on_close>
            <div class="form-group">
                <label>"Perfil"</label>
                <select
                    prop:value=move || role.get()
                    on:change=move |ev| role.set(event_target_value(&ev))
                    disabled=move || busy.get()
                >
                    {UserRole::ALL
                        .iter()
                        .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                        .collect_view()}
                </select>
            </div>
            <div class="form-group">
                <Checkbox checked=active label="Conta ativa" />
            </div>
            <div class="details-actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(()) disabled=busy>
                    "Cancelar"
                </Button>
                <Button appearance=ButtonAppearance::Primary on_click=on_save disabled=busy>
                    {move || if busy.get() { "Salvando..." } else { "Salvar" }}
                </Button>
            </div>
        </Modal>
    }
}
