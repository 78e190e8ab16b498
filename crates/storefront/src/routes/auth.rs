//! Authentication route handlers.
//!
//! Password login and registration. Rejected forms are re-rendered with the
//! entered email kept and the passwords cleared.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::routes::layout::{Layout, Notice};
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub email: String,
    pub full_name: String,
}

/// Notice for a rejected auth form, or `None` if the error isn't the
/// user's to fix.
fn rejection_notice(err: &AuthError) -> Option<Notice> {
    let notice = match err {
        AuthError::MissingFields => Notice::error("Email and password are required."),
        AuthError::InvalidEmail(_) => Notice::error("Please enter a valid email address."),
        AuthError::PasswordMismatch => Notice::error("Passwords do not match."),
        AuthError::InvalidCredentials => Notice::error("Invalid email or password."),
        AuthError::UserAlreadyExists => Notice::warning("A user with this email already exists."),
        AuthError::Repository(_) | AuthError::PasswordHash => return None,
    };
    Some(notice)
}

/// Put the user in the session and tag Sentry events with them.
async fn log_in(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(layout: Layout) -> LoginTemplate {
    LoginTemplate {
        layout,
        email: String::new(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, layout, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    mut layout: Layout,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            log_in(&session, &user).await?;
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Redirect::to("/?success=logged_in").into_response())
        }
        Err(err) => {
            let notice = rejection_notice(&err).ok_or(err)?;
            tracing::info!("Login rejected");
            layout.push(notice);
            Ok(LoginTemplate {
                layout,
                email: form.email,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(layout: Layout) -> RegisterTemplate {
    RegisterTemplate {
        layout,
        email: String::new(),
        full_name: String::new(),
    }
}

/// Handle registration form submission. A new account is logged in
/// straight away.
#[instrument(skip(state, session, layout, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    mut layout: Layout,
    Form(form): Form<Registration>,
) -> Result<Response> {
    match AuthService::new(state.pool()).register(&form).await {
        Ok(user) => {
            log_in(&session, &user).await?;
            Ok(Redirect::to("/?success=registered").into_response())
        }
        Err(err) => {
            let notice = rejection_notice(&err).ok_or(err)?;
            layout.push(notice);
            Ok(RegisterTemplate {
                layout,
                email: form.email,
                full_name: form.full_name,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout. The cart survives.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/?info=logged_out"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::layout::NoticeLevel;

    #[test]
    fn test_rejection_notices() {
        let level = |err: AuthError| rejection_notice(&err).map(|n| n.level);
        assert_eq!(level(AuthError::MissingFields), Some(NoticeLevel::Error));
        assert_eq!(level(AuthError::InvalidCredentials), Some(NoticeLevel::Error));
        assert_eq!(level(AuthError::UserAlreadyExists), Some(NoticeLevel::Warning));
        assert_eq!(level(AuthError::PasswordHash), None);
    }
}
