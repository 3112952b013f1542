//! Password reset dialog opened from the login form.
//!
//! The backend exposes no reset endpoint yet, so an accepted request is
//! logged and acknowledged locally. The dialog is only mounted when
//! `ENABLE_PASSWORD_RESET` is on; closing it unmounts it, which also discards
//! whatever was typed.

#[cfg(test)]
#[path = "forgot_password_test.rs"]
mod forgot_password_test;

use leptos::prelude::*;

use crate::util::validation::check_email;

pub const SENT_MESSAGE: &str = "Password reset instructions have been sent to your email address.";

/// Form state behind the dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResetRequest {
    pub email: String,
    pub submitted: bool,
    pub error: Option<String>,
}

impl ResetRequest {
    /// The send button is live once something has been typed.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitted && !self.email.is_empty()
    }

    /// Validate the address and mark the request as sent. Returns whether it
    /// was accepted.
    pub fn submit(&mut self) -> bool {
        if self.submitted {
            return false;
        }
        match check_email(&self.email) {
            Ok(()) => {
                log::info!("password reset requested for {}", self.email);
                self.submitted = true;
                self.error = None;
                true
            }
            Err(message) => {
                self.error = Some(message.to_owned());
                false
            }
        }
    }
}

#[component]
pub fn ForgotPasswordDialog(on_close: Callback<()>) -> impl IntoView {
    let request = RwSignal::new(ResetRequest::default());
    let submitted = move || request.with(|r| r.submitted);

    let close = move |_| on_close.run(());
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            on_close.run(());
        }
    };
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        request.update(|r| {
            r.submit();
        });
    };

    view! {
        <div class="dialog__backdrop" on:click=close>
            <div
                class="dialog"
                role="dialog"
                aria-modal="true"
                tabindex="0"
                on:click=|ev| ev.stop_propagation()
                on:keydown=on_keydown
            >
                <h2 class="dialog__title">"Reset Password"</h2>
                <Show when=submitted>
                    <div class="dialog__body dialog__body--centered">
                        <div class="banner banner--success" role="status">{SENT_MESSAGE}</div>
                        <p class="dialog__hint">
                            "Please check your inbox and follow the instructions to reset your password."
                        </p>
                    </div>
                    <div class="dialog__actions">
                        <button class="btn btn--primary" type="button" on:click=close>
                            "Close"
                        </button>
                    </div>
                </Show>
                <Show when=move || !submitted()>
                    <form class="dialog__body" on:submit=on_submit novalidate=true>
                        <p class="dialog__hint">
                            "Enter your email address and we'll send you instructions to reset your password."
                        </p>
                        <Show when=move || request.with(|r| r.error.is_some())>
                            <div class="banner banner--error" role="alert">
                                {move || request.with(|r| r.error.clone().unwrap_or_default())}
                            </div>
                        </Show>
                        <label class="auth-field">
                            <span class="auth-field__label">"Email Address"</span>
                            <input
                                class="auth-input"
                                class:auth-input--invalid=move || request.with(|r| r.error.is_some())
                                type="email"
                                autofocus=true
                                prop:value=move || request.with(|r| r.email.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    request.update(|r| r.email = value);
                                }
                            />
                        </label>
                        <div class="dialog__actions">
                            <button class="btn" type="button" on:click=close>
                                "Cancel"
                            </button>
                            <button
                                class="btn btn--primary"
                                type="submit"
                                disabled=move || !request.with(ResetRequest::can_submit)
                            >
                                "Send Reset Instructions"
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </div>
    }
}
