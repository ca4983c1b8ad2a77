use crate::auth::AuthStatus;

pub const LOGIN_PATH: &str = "/auth";
pub const HOME_PATH: &str = "/timespending";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    AnonymousOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(&'static str),
    /// Session still being checked.
    Pending,
}

pub fn guard(access: Access, status: AuthStatus) -> GuardOutcome {
    match (access, status) {
        (Access::Public, _) => GuardOutcome::Allow,
        (_, AuthStatus::Loading) => GuardOutcome::Pending,
        (Access::Protected, AuthStatus::Anonymous) => GuardOutcome::Redirect(LOGIN_PATH),
        (Access::AnonymousOnly, AuthStatus::Authenticated) => GuardOutcome::Redirect(HOME_PATH),
        _ => GuardOutcome::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_pages_send_anonymous_users_to_login() {
        assert_eq!(
            guard(Access::Protected, AuthStatus::Anonymous),
            GuardOutcome::Redirect(LOGIN_PATH)
        );
        assert_eq!(guard(Access::Protected, AuthStatus::Authenticated), GuardOutcome::Allow);
    }

    #[test]
    fn login_pages_send_signed_in_users_home() {
        assert_eq!(
            guard(Access::AnonymousOnly, AuthStatus::Authenticated),
            GuardOutcome::Redirect(HOME_PATH)
        );
        assert_eq!(guard(Access::AnonymousOnly, AuthStatus::Anonymous), GuardOutcome::Allow);
    }

    #[test]
    fn loading_holds_guarded_pages_only() {
        assert_eq!(guard(Access::Protected, AuthStatus::Loading), GuardOutcome::Pending);
        assert_eq!(guard(Access::AnonymousOnly, AuthStatus::Loading), GuardOutcome::Pending);
        assert_eq!(guard(Access::Public, AuthStatus::Loading), GuardOutcome::Allow);
    }
}
