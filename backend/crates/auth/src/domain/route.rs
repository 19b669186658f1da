//! Route classes and guard decisions
//!
//! The guard reacts to one signal only: whether a session cookie is present.

/// How the guard treats a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a session cookie; anonymous visitors go to the login page
    Protected,
    /// For anonymous visitors only; signed-in visitors go home
    Public,
    /// API routes, static assets, and everything not listed
    Unguarded,
}

/// What the guard does with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    /// Temporary redirect (307) to the given path
    Redirect(String),
}

/// Apply the guard table
///
/// | class     | cookie  | decision          |
/// |-----------|---------|-------------------|
/// | Protected | absent  | redirect to login |
/// | Public    | present | redirect to home  |
/// | *         | *       | pass              |
pub fn decide(
    class: RouteClass,
    session_present: bool,
    login_path: &str,
    home_path: &str,
) -> GuardDecision {
    match (class, session_present) {
        (RouteClass::Protected, false) => GuardDecision::Redirect(login_path.to_string()),
        (RouteClass::Public, true) => GuardDecision::Redirect(home_path.to_string()),
        _ => GuardDecision::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        let d = |class, present| decide(class, present, "/login", "/");

        assert_eq!(
            d(RouteClass::Protected, false),
            GuardDecision::Redirect("/login".into())
        );
        assert_eq!(d(RouteClass::Protected, true), GuardDecision::Pass);
        assert_eq!(d(RouteClass::Public, true), GuardDecision::Redirect("/".into()));
        assert_eq!(d(RouteClass::Public, false), GuardDecision::Pass);
        assert_eq!(d(RouteClass::Unguarded, false), GuardDecision::Pass);
        assert_eq!(d(RouteClass::Unguarded, true), GuardDecision::Pass);
    }
}
