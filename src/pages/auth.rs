//! Login / register page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The form validates locally before touching the session store. Session
//! errors and the registration-success flag come back through the session
//! signal; once the session is authenticated the page leaves for the
//! dashboard.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::use_services;
use crate::components::forgot_password::ForgotPasswordDialog;
use crate::components::theme_toggle::FloatingThemeToggle;
use crate::config::AppConfig;
use crate::state::session::SessionState;
use crate::util::validation::{AuthForm, AuthMode, Field, FieldErrors, validate};

pub const REGISTERED_MESSAGE: &str = "Registration successful! Please sign in with your credentials.";
pub const REGISTRATION_DISABLED_MESSAGE: &str = "Registration is currently disabled";

/// Headline, subtitle, and submit label for a mode.
pub fn mode_copy(mode: AuthMode) -> (&'static str, &'static str, &'static str) {
    match mode {
        AuthMode::Login => ("Welcome Back", "Sign in to your account", "Sign In"),
        AuthMode::Register => ("Create Account", "Sign up to get started", "Create Account"),
    }
}

/// Prompt and link text for switching modes.
pub fn toggle_copy(mode: AuthMode) -> (&'static str, &'static str) {
    match mode {
        AuthMode::Login => ("Don't have an account?", "Sign up"),
        AuthMode::Register => ("Already have an account?", "Sign in"),
    }
}

/// What sits under the form for switching modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeSwitch {
    Link { prompt: &'static str, label: &'static str },
    Disabled { prompt: &'static str, note: &'static str },
}

/// With registration off, the login form explains why there is no sign-up
/// link. The register form always keeps its way back to login.
pub fn mode_switch(mode: AuthMode, registration_enabled: bool) -> ModeSwitch {
    let (prompt, label) = toggle_copy(mode);
    if !registration_enabled && mode == AuthMode::Login {
        ModeSwitch::Disabled { prompt, note: REGISTRATION_DISABLED_MESSAGE }
    } else {
        ModeSwitch::Link { prompt, label }
    }
}

pub fn offers_password_reset(mode: AuthMode, password_reset_enabled: bool) -> bool {
    password_reset_enabled && mode == AuthMode::Login
}

pub fn input_type_for(base: &'static str, revealed: bool) -> &'static str {
    if revealed { "text" } else { base }
}

/// Accessible name of the show/hide button beside a password input.
pub fn reveal_label(field: Field) -> &'static str {
    match field {
        Field::ConfirmPassword => "toggle confirm password visibility",
        _ => "toggle password visibility",
    }
}

/// An authenticated, settled session has no business on this page.
pub fn should_leave(state: &SessionState) -> bool {
    state.is_authenticated() && !state.is_loading
}

#[component]
fn FormField(
    label: &'static str,
    input_type: &'static str,
    field: Field,
    form: RwSignal<AuthForm>,
    errors: RwSignal<FieldErrors>,
    #[prop(optional)] revealable: bool,
) -> impl IntoView {
    let message = move || errors.with(|e| e.get(field).map(str::to_owned));
    let revealed = RwSignal::new(false);
    view! {
        <label class="auth-field">
            <span class="auth-field__label">{label}</span>
            <span class="auth-field__control">
                <input
                    class="auth-input"
                    class:auth-input--invalid=move || message().is_some()
                    type=move || input_type_for(input_type, revealed.get())
                    prop:value=move || form.with(|f| f.value(field).to_owned())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.set(field, value));
                        errors.update(|e| e.clear(field));
                    }
                />
                <Show when=move || revealable>
                    <button
                        class="btn auth-field__reveal"
                        type="button"
                        aria-label=reveal_label(field)
                        on:click=move |_| revealed.update(|r| *r = !*r)
                    >
                        {move || if revealed.get() { "Hide" } else { "Show" }}
                    </button>
                </Show>
            </span>
            <Show when=move || message().is_some()>
                <span class="auth-field__error">{move || message().unwrap_or_default()}</span>
            </Show>
        </label>
    }
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let session = expect_context::<RwSignal<SessionState>>();
    let services = use_services();
    let navigate = use_navigate();

    let mode = RwSignal::new(AuthMode::Login);
    let form = RwSignal::new(AuthForm::default());
    let errors = RwSignal::new(FieldErrors::default());

    Effect::new(move || {
        if should_leave(&session.get()) {
            navigate("/dashboard", NavigateOptions::default());
        }
    });

    // A completed registration drops back to a clean login form.
    Effect::new(move || {
        if session.with(|s| s.registration_success) {
            mode.set(AuthMode::Login);
            form.set(AuthForm::default());
            errors.set(FieldErrors::default());
        }
    });

    let registration_enabled = config.enable_registration;
    let password_reset_enabled = config.enable_password_reset;
    let reset_open = RwSignal::new(false);
    let on_toggle_mode = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        if !registration_enabled && mode.get_untracked() == AuthMode::Login {
            return;
        }
        mode.update(|m| *m = m.toggled());
        errors.set(FieldErrors::default());
        log::debug!("auth mode changed to {:?}", mode.get_untracked());
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.with_untracked(|s| s.is_loading) {
            return;
        }
        let current_mode = mode.get_untracked();
        let input = form.get_untracked();
        if let Err(field_errors) = validate(&input, current_mode) {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::default());

        let store = services.get_value().session;
        leptos::task::spawn_local(async move {
            let result = match current_mode {
                AuthMode::Login => store.login(&input.email, &input.password).await,
                AuthMode::Register => store.register(&input.username, &input.email, &input.password).await,
            };
            if let Err(e) = result {
                log::warn!("auth submission failed: {e}");
            }
        });
    };

    let on_dismiss = move |_| services.with_value(|s| s.session.clear_error());

    let is_register = move || mode.get() == AuthMode::Register;
    let busy = move || session.with(|s| s.is_loading);

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-card__title">{move || mode_copy(mode.get()).0}</h1>
                <p class="auth-card__subtitle">{move || mode_copy(mode.get()).1}</p>

                <Show when=move || session.with(|s| s.error.is_some())>
                    <div class="banner banner--error" role="alert">
                        <span>{move || session.with(|s| s.error.clone().unwrap_or_default())}</span>
                        <button class="banner__dismiss" type="button" on:click=on_dismiss title="Dismiss">
                            "×"
                        </button>
                    </div>
                </Show>
                <Show when=move || session.with(|s| s.registration_success)>
                    <div class="banner banner--success" role="status">{REGISTERED_MESSAGE}</div>
                </Show>

                <form class="auth-form" on:submit=on_submit novalidate=true>
                    <Show when=is_register>
                        <FormField label="User Name" input_type="text" field=Field::Username form=form errors=errors/>
                    </Show>
                    <FormField label="Email Address" input_type="email" field=Field::Email form=form errors=errors/>
                    <FormField
                        label="Password"
                        input_type="password"
                        field=Field::Password
                        form=form
                        errors=errors
                        revealable=true
                    />
                    <Show when=is_register>
                        <FormField
                            label="Confirm Password"
                            input_type="password"
                            field=Field::ConfirmPassword
                            form=form
                            errors=errors
                            revealable=true
                        />
                    </Show>
                    <Show when=move || offers_password_reset(mode.get(), password_reset_enabled)>
                        <p class="auth-form__forgot">
                            <a
                                href="#"
                                on:click=move |ev: leptos::ev::MouseEvent| {
                                    ev.prevent_default();
                                    reset_open.set(true);
                                }
                            >
                                "Forgot your password?"
                            </a>
                        </p>
                    </Show>
                    <button class="btn btn--primary auth-form__submit" type="submit" disabled=busy>
                        {move || if busy() { "Please wait..." } else { mode_copy(mode.get()).2 }}
                    </button>
                </form>

                <p class="auth-card__toggle">
                    {move || match mode_switch(mode.get(), registration_enabled) {
                        ModeSwitch::Link { prompt, label } => view! {
                            {prompt}
                            " "
                            <a href="#" on:click=on_toggle_mode>{label}</a>
                        }
                        .into_any(),
                        ModeSwitch::Disabled { prompt, note } => view! {
                            {prompt}
                            <span class="auth-card__note">{note}</span>
                        }
                        .into_any(),
                    }}
                </p>

                <p class="auth-card__footer">{format!("{} v{}", config.app_name, config.app_version)}</p>
            </div>
            <Show when=move || password_reset_enabled && reset_open.get()>
                <ForgotPasswordDialog on_close=Callback::new(move |()| reset_open.set(false))/>
            </Show>
            <FloatingThemeToggle/>
        </div>
    }
}
