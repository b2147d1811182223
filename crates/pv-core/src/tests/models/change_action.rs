use crate::ChangeAction;

use std::str::FromStr;

const ALL_ACTIONS: [ChangeAction; 12] = [
    ChangeAction::Create,
    ChangeAction::Update,
    ChangeAction::Delete,
    ChangeAction::Restore,
    ChangeAction::TaskAdded,
    ChangeAction::TaskUpdated,
    ChangeAction::TaskDeleted,
    ChangeAction::MemberAdded,
    ChangeAction::MemberRemoved,
    ChangeAction::DocumentAdded,
    ChangeAction::DocumentUpdated,
    ChangeAction::DocumentRemoved,
];

#[test]
fn test_as_str_round_trip() {
    for action in ALL_ACTIONS {
        assert_eq!(ChangeAction::from_str(action.as_str()).unwrap(), action);
    }
}

#[test]
fn test_from_str_rejects_unknown_value() {
    assert!(ChangeAction::from_str("renamed").is_err());
}
