//! Admin landing page.

use leptos::prelude::*;

use crate::session::use_session;

/// Landing page for super-admins.
#[component]
pub fn AdminPage() -> impl IntoView {
    let session = use_session();

    let operator = move || {
        session.snapshot().with(|snapshot| {
            snapshot
                .session
                .as_ref()
                .map(|s| format!("Signed in as {} ({})", s.display_name(), s.email()))
        })
    };

    view! {
        <div class="admin-page">
            <h1>"Platform administration"</h1>
            <p>{operator}</p>
            <p>"Manage companies and their administrators."</p>
        </div>
    }
}
