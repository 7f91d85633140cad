/// Subscription entitlements
///
/// When an organization's subscription changes, the provider delivers a
/// webhook; this module turns that event into a member-limit update and
/// pushes it back to the provider.
///
/// # Modules
///
/// - [`event`]: the wire envelope and the typed [`event::SubscriptionEvent`]
/// - [`policy`]: pure mapping from an event to a target member limit
/// - [`sync`]: the stateless synchronizer that writes the limit to the
///   provider
///
/// # Pipeline
///
/// ```text
/// verified delivery → SubscriptionEvent → EntitlementPolicy → LimitSynchronizer
/// ```
///
/// The policy is a pure function, so redelivered duplicates compute the same
/// target limit; the synchronizer is a stateless overwrite, so applying that
/// limit twice is harmless.

pub mod event;
pub mod policy;
pub mod sync;
