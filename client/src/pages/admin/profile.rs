//! `/admin/profile`: the signed-in user's details, contact edit form and
//! avatar upload.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both writes go to the API first; the session user is only replaced by a
//! fresh `current_user` fetch afterwards, so the persisted snapshot always
//! mirrors the server.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use hotelsocial_session::AuthUser;
use hotelsocial_session::types::UpdateProfilePayload;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::components::loading_button::LoadingButton;
use crate::state::auth::SessionSignal;
use crate::util::validation::is_valid_phone;

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Largest avatar the form will upload.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Build the update body; blank fields are sent as absent.
///
/// # Errors
///
/// Returns a message when the phone number is present but malformed.
pub fn profile_payload(
    user_id: &str,
    gender: &str,
    address: &str,
    phone_number: &str,
) -> Result<UpdateProfilePayload, &'static str> {
    let phone_number = non_blank(phone_number);
    if phone_number.as_deref().is_some_and(|p| !is_valid_phone(p)) {
        return Err("Invalid phone number. Please enter a 10-digit number");
    }
    Ok(UpdateProfilePayload {
        user_id: user_id.to_owned(),
        gender: non_blank(gender),
        address: non_blank(address),
        phone_number,
    })
}

/// # Errors
///
/// Returns a message for empty, oversized or non-image files.
pub fn check_avatar(content_type: &str, size: usize) -> Result<(), &'static str> {
    if size == 0 {
        return Err("The selected file is empty");
    }
    if size > MAX_AVATAR_BYTES {
        return Err("Avatar must be 5 MB or smaller");
    }
    if !content_type.starts_with("image/") {
        return Err("Avatar must be an image");
    }
    Ok(())
}

/// Re-fetch the profile and replace the session user.
#[cfg(feature = "csr")]
async fn reload_user(session: SessionSignal) -> Result<(), hotelsocial_session::ApiError> {
    use crate::state::auth::hydrated_user;

    let api = crate::net::api::client_api();
    let profile = api.current_user().await?;
    let Some(access) = api.tokens().access_token() else {
        return Err(hotelsocial_session::ApiError::InvalidToken);
    };
    match hydrated_user(&access, profile) {
        Some(user) => {
            session.update(|s| s.set_user(Some(user)));
            Ok(())
        }
        None => Err(hotelsocial_session::ApiError::InvalidToken),
    }
}

#[cfg(feature = "csr")]
async fn read_avatar(
    file: web_sys::File,
) -> Result<hotelsocial_session::types::AvatarUpload, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    Ok(hotelsocial_session::types::AvatarUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        delete_old: true,
    })
}

fn detail(label: &'static str, value: Option<String>) -> impl IntoView {
    view! {
        <div class="profile__row">
            <dt>{label}</dt>
            <dd>{value.unwrap_or_else(|| "-".to_owned())}</dd>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = expect_context::<SessionSignal>();
    let user = Memo::new(move |_| session.with(|s| s.state().user().cloned()));

    let gender = RwSignal::new(String::new());
    let address = RwSignal::new(String::new());
    let phone_number = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);
    let uploading = RwSignal::new(false);

    Effect::new(move || {
        user.with(|u| {
            if let Some(u) = u {
                gender.set(u.gender.clone().unwrap_or_default());
                address.set(u.address.clone().unwrap_or_default());
                phone_number.set(u.phone_number.clone().unwrap_or_default());
            }
        });
    });

    let on_save = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = user.with_untracked(|u| u.as_ref().map(|u| u.subject_id.clone()))
        else {
            return;
        };
        let payload = match profile_payload(
            &user_id,
            &gender.get_untracked(),
            &address.get_untracked(),
            &phone_number.get_untracked(),
        ) {
            Ok(payload) => payload,
            Err(message) => {
                notice.set(Some(message.to_owned()));
                return;
            }
        };
        saving.set(true);
        notice.set(None);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use hotelsocial_session::error::user_message;

            let result = match crate::net::api::client_api().update_profile(&payload).await {
                Ok(_) => reload_user(session).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => notice.set(Some("Profile updated.".to_owned())),
                Err(e) => {
                    leptos::logging::warn!("profile update failed: {e}");
                    notice.set(Some(user_message(&e)));
                }
            }
            saving.set(false);
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = payload;
        }
    };

    let on_avatar = move |ev: leptos::ev::Event| {
        #[cfg(feature = "csr")]
        {
            use hotelsocial_session::error::user_message;

            let input = event_target::<web_sys::HtmlInputElement>(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let size = file.size() as usize;
            if let Err(message) = check_avatar(&file.type_(), size) {
                notice.set(Some(message.to_owned()));
                return;
            }
            uploading.set(true);
            notice.set(None);
            leptos::task::spawn_local(async move {
                let upload = match read_avatar(file).await {
                    Ok(upload) => upload,
                    Err(e) => {
                        leptos::logging::warn!("reading avatar failed: {e}");
                        notice.set(Some("Could not read the selected file".to_owned()));
                        uploading.set(false);
                        return;
                    }
                };
                let api = crate::net::api::client_api();
                let result = match api.upload_avatar(&upload).await {
                    Ok(_) => reload_user(session).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(()) => notice.set(Some("Avatar updated.".to_owned())),
                    Err(e) => {
                        leptos::logging::warn!("avatar upload failed: {e}");
                        notice.set(Some(user_message(&e)));
                    }
                }
                uploading.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = ev;
        }
    };

    let text_input = move |label: &'static str, value: RwSignal<String>| {
        view! {
            <label class="profile__field">
                <span>{label}</span>
                <input
                    class="profile__input"
                    type="text"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <section class="admin-page profile">
            <h1 class="admin-page__title">"Profile"</h1>
            {move || {
                user.get()
                    .map(|u: AuthUser| {
                        let name = u.display_name().to_owned();
                        view! {
                            <div class="profile__summary">
                                {u
                                    .avatar
                                    .clone()
                                    .map(|src| view! { <img class="profile__avatar" src=src alt="Avatar"/> })}
                                <h2>{name}</h2>
                                <dl class="profile__details">
                                    {detail("Email", Some(u.email.clone()))}
                                    {detail("Role", Some(u.role.clone()))}
                                    {detail(
                                        "Email confirmed",
                                        Some(if u.email_confirmed { "Yes" } else { "No" }.to_owned()),
                                    )}
                                    {detail("Phone", u.phone_number.clone())}
                                    {detail("Address", u.address.clone())}
                                    {detail("Gender", u.gender.clone())}
                                </dl>
                            </div>
                        }
                    })
            }}
            <label class="profile__field">
                <span>"Avatar"</span>
                <input
                    type="file"
                    accept="image/*"
                    disabled=move || uploading.get()
                    on:change=on_avatar
                />
            </label>
            <form class="profile__form" on:submit=on_save>
                <label class="profile__field">
                    <span>"Gender"</span>
                    <select
                        class="profile__input"
                        prop:value=move || gender.get()
                        on:change=move |ev| gender.set(event_target_value(&ev))
                    >
                        <option value="">"Not specified"</option>
                        {GENDERS
                            .iter()
                            .map(|g| view! { <option value=*g>{*g}</option> })
                            .collect_view()}
                    </select>
                </label>
                {text_input("Address", address)}
                {text_input("Phone number", phone_number)}
                <LoadingButton loading=saving loading_text="Saving...">
                    "Save changes"
                </LoadingButton>
            </form>
            <Show when=move || notice.get().is_some()>
                <p class="admin-page__notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>
        </section>
    }
}
