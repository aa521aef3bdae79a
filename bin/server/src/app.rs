//! Main Leptos application component and routing.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::pages::{AdminPage, HomePage, LoginPage};
use crate::session::{RoleRouterGuard, SessionProvider, use_session};

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Compliance Console"/>
        <Router>
            <SessionProvider>
                <Header/>
                <main class="container">
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route
                            path=path!("/")
                            view=|| view! { <RoleRouterGuard><HomePage/></RoleRouterGuard> }
                        />
                        <Route
                            path=path!("/login")
                            view=|| view! { <RoleRouterGuard><LoginPage/></RoleRouterGuard> }
                        />
                        <Route
                            path=path!("/admin")
                            view=|| view! { <RoleRouterGuard><AdminPage/></RoleRouterGuard> }
                        />
                    </Routes>
                </main>
            </SessionProvider>
        </Router>
    }
}

/// Header with the signed-in user and a logout button.
#[component]
fn Header() -> impl IntoView {
    let session = use_session();

    let user = move || {
        session
            .snapshot()
            .with(|snapshot| snapshot.session.as_ref().map(|s| s.display_name().to_string()))
    };

    view! {
        <header class="header">
            <div class="header-left">
                <a href="/" class="logo">"Compliance Console"</a>
            </div>
            <div class="header-right">
                {move || {
                    user().map(|name| {
                        view! {
                            <div class="user-menu">
                                <span class="user-name">{name}</span>
                                <button class="logout-button" on:click=move |_| session.logout()>
                                    "Log out"
                                </button>
                            </div>
                        }
                    })
                }}
            </div>
        </header>
    }
}
