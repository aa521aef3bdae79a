//! Role guard component.

use compliance_console_session::{GuardDecision, guard};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use super::provider::use_session;

/// Renders `children` only when the current role may see the current path.
///
/// While the session is loading a placeholder is shown. A wrong-role user
/// is moved to their landing page, replacing the history entry.
#[component]
pub fn RoleRouterGuard(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let pathname = use_location().pathname;
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        session
            .snapshot()
            .with(|snapshot| pathname.with(|path| guard::evaluate(snapshot, path)))
    });

    Effect::new(move || {
        if let GuardDecision::Redirect { to } = decision.get() {
            navigate(
                to,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Allow
            fallback=move || {
                let message = match decision.get() {
                    GuardDecision::Pending => "Loading...",
                    _ => "Redirecting...",
                };
                view! { <p class="session-pending">{message}</p> }
            }
        >
            {children()}
        </Show>
    }
}
