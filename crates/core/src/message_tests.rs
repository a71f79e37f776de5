// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wire_names_match_serde() {
    for kind in [
        MessageType::GetTestStateRsp,
        MessageType::PermRsp,
        MessageType::TitleBeingEdited,
        MessageType::EndData,
        MessageType::TryAgain,
    ] {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, kind.as_str());
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn granted_response_omits_info() {
    let json = serde_json::to_value(PermissionResponse::granted(Operation::StartTest)).unwrap();
    assert_eq!(json, serde_json::json!({"decision": "granted", "operation": "start_test"}));
}

#[test]
fn declined_response_carries_info() {
    let rsp = PermissionResponse::declined(Operation::EditTitle, "Alice");
    assert_eq!(rsp.decision, Decision::Declined);
    assert_eq!(rsp.info.as_deref(), Some("Alice"));
}
