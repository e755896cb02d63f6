//! Property-based tests for access decisions.

use proptest::prelude::*;

use super::tests::Document;
use super::*;
use crate::model::UserId;

fn user_id_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::ReadPublicList),
        Just(Action::Read),
        Just(Action::Create),
        Just(Action::ListOwn),
        Just(Action::Write),
        Just(Action::Delete),
    ]
}

fn identity_strategy() -> impl Strategy<Value = Identity> {
    prop_oneof![
        Just(Identity::Anonymous),
        user_id_strategy().prop_map(|id| Identity::Authenticated(UserId::new(id).unwrap())),
    ]
}

fn document(id: &str, owner: &str) -> Document {
    Document {
        id: id.to_string(),
        owner: UserId::new(owner).unwrap(),
    }
}

proptest! {
    #[test]
    fn test_non_owner_mutations_are_concealed(
        owner in user_id_strategy(),
        other in user_id_strategy(),
        id in "[a-z0-9]{1,8}",
    ) {
        prop_assume!(owner != other);
        let doc = document(&id, &owner);
        let requester = Identity::user(other).unwrap();

        prop_assert_eq!(authorize(&requester, Some(&doc), Action::Write), AccessDecision::NotFound);
        prop_assert_eq!(authorize(&requester, Some(&doc), Action::Delete), AccessDecision::NotFound);
    }

    #[test]
    fn test_owner_mutations_are_allowed(owner in user_id_strategy(), id in "[a-z0-9]{1,8}") {
        let doc = document(&id, &owner);
        let requester = Identity::user(owner).unwrap();

        prop_assert_eq!(authorize(&requester, Some(&doc), Action::Write), AccessDecision::Allow);
        prop_assert_eq!(authorize(&requester, Some(&doc), Action::Delete), AccessDecision::Allow);
    }

    #[test]
    fn test_anonymous_mutations_redirect(
        owner in user_id_strategy(),
        present in any::<bool>(),
    ) {
        let doc = document("r", &owner);
        let target = present.then_some(&doc);

        for action in [Action::Create, Action::Write, Action::Delete] {
            prop_assert_eq!(
                authorize(&Identity::Anonymous, target, action),
                AccessDecision::RedirectToLogin
            );
        }
        prop_assert_eq!(
            authorize::<Comment>(&Identity::Anonymous, None, Action::Read),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_absent_resource_is_not_found_for_authenticated(user in user_id_strategy()) {
        let requester = Identity::user(user).unwrap();
        prop_assert_eq!(
            authorize::<Document>(&requester, None, Action::Write),
            AccessDecision::NotFound
        );
    }

    #[test]
    fn test_decisions_are_idempotent(
        identity in identity_strategy(),
        owner in user_id_strategy(),
        action in action_strategy(),
        present in any::<bool>(),
    ) {
        let doc = document("r", &owner);
        let target = present.then_some(&doc);

        let first = authorize(&identity, target, action);
        for _ in 0..3 {
            prop_assert_eq!(authorize(&identity, target, action), first);
        }
    }
}
