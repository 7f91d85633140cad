/// Authentication and authorization utilities
///
/// This module resolves the calling user from a session token and gates every
/// task operation behind a capability check.
///
/// # Modules
///
/// - [`jwt`]: Session token (JWT) validation
/// - [`guard`]: Per-request caller context and capability predicates
///
/// # Flow
///
/// 1. The API's auth middleware extracts the Bearer token and calls
///    [`jwt::validate_session_token`].
/// 2. The validated claims are turned into a [`guard::AuthContext`] holding
///    the caller's user id, organization id, and capability set.
/// 3. Each handler calls exactly one of the `require_*` predicates before
///    touching the repository.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::jwt::validate_session_token;
/// use taskboard_shared::auth::guard::AuthContext;
///
/// # fn example(token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let claims = validate_session_token(token, "session-signing-secret")?;
/// let auth = AuthContext::from_claims(claims)?;
/// let caller = auth.require_view()?;
/// println!("caller {} in org {}", caller.user_id, caller.org_id);
/// # Ok(())
/// # }
/// ```

pub mod guard;
pub mod jwt;
