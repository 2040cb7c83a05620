use leptos::prelude::*;

/// `<tr>` styled as a totals row; children are the `<td>` cells
#[component]
pub fn TableTotalsRow(
    children: Children,
    #[prop(optional)]
    class: &'static str,
) -> impl IntoView {
    let row_class = if class.is_empty() {
        "table__totals-row".to_string()
    } else {
        format!("table__totals-row {}", class)
    };

    view! { <tr class=row_class>{children()}</tr> }
}
