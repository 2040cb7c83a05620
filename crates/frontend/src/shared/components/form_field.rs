use leptos::prelude::*;

/// Label, input and the field's validation message underneath
#[component]
pub fn FormField(
    #[prop(into)]
    label: String,
    /// Validation message for this field, if any
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
    #[prop(optional)]
    required: bool,
    children: Children,
) -> impl IntoView {
    let message = move || error.and_then(|e| e.get());

    view! {
        <div class="form-group" class:form-group--invalid=move || message().is_some()>
            <label>
                {label}
                {required.then(|| view! { <span class="form-group__required">" *"</span> })}
            </label>
            {children()}
            {move || message().map(|message| view! { <div class="form-group__error">{message}</div> })}
        </div>
    }
}
