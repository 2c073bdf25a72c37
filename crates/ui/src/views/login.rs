use api::login_next;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{AuthError, AuthService};
use tracing::debug;

use super::ViewError;
use crate::context::AppContext;
use crate::routes::route_for_path;

#[component]
pub fn LoginView(query: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let next = login_next(&query);

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut pending = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if pending() {
            return;
        }
        let auth = ctx.auth();
        let next = next.clone();
        let (email_value, password_value, remember_value) = (email(), password(), remember());
        pending.set(true);
        error.set(None);
        spawn(async move {
            let result = auth.login(&email_value, &password_value, remember_value).await;
            pending.set(false);
            match result {
                Ok(()) => {
                    let landing = AuthService::landing_path(next.as_deref());
                    debug!(landing, "signed in");
                    navigator.push(route_for_path(landing));
                }
                Err(err) => error.set(Some(login_error_message(&err))),
            }
        });
    };

    rsx! {
        div { class: "page login-page",
            h2 { "Sign in" }
            form { class: "login-form", id: "login-form", onsubmit: on_submit,
                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    autocomplete: "username",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                label { class: "login-form__remember",
                    input {
                        r#type: "checkbox",
                        checked: remember(),
                        onchange: move |evt| remember.set(evt.checked()),
                    }
                    "Remember me"
                }
                if let Some(message) = error() {
                    p { class: "notice", role: "alert", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: pending(),
                    if pending() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}

fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::MissingFields => "Email and password are required.".to_string(),
        AuthError::InvalidCredentials => "Invalid email or password.".to_string(),
        AuthError::Api(err) => ViewError::from(err).message().to_string(),
        _ => ViewError::Unknown.message().to_string(),
    }
}
