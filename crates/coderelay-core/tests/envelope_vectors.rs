//! Inbound envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use coderelay_core::protocol::payload::{JoinReq, SyncCodeReq};
use coderelay_core::protocol::{Envelope, EventKind};
use coderelay_core::Result;

use vector_loader::load;

fn parse_and_resolve(frame: &str) -> Result<(Envelope, EventKind)> {
    let env = Envelope::parse(frame)?;
    let kind = env.kind()?;
    Ok((env, kind))
}

#[test]
fn envelope_vectors() {
    let files = [
        "envelope_min.json",
        "envelope_join.json",
        "envelope_sync.json",
        "envelope_bad_version.json",
        "envelope_unknown_field.json",
        "envelope_not_json.json",
        "envelope_server_only.json",
    ];

    for f in files {
        let v = load(f);
        let res = parse_and_resolve(&v.frame);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let (env, kind) = res.unwrap_or_else(|e| panic!("vector={} failed: {e}", v.description));
        let exp = v.expect.expect("vector must have expect or expect_error");

        assert_eq!(env.svc, exp["svc"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(env.msg_type, exp["type"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(kind.label(), exp["kind"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(env.room.as_deref(), exp["room"].as_str(), "vector={}", v.description);
        assert_eq!(env.seq, exp["seq"].as_u64(), "vector={}", v.description);
    }
}

#[test]
fn join_data_is_parsed_lazily() {
    let env = Envelope::parse(&load("envelope_join.json").frame).unwrap();
    let req: JoinReq = env.data_or_default().unwrap();
    assert_eq!(req.display_name.as_deref(), Some("Ann"));
}

#[test]
fn join_without_data_has_unknown_name() {
    let env = Envelope::parse(r#"{"v":1,"svc":"room","type":"join","room":"r"}"#).unwrap();
    let req: JoinReq = env.data_or_default().unwrap();
    assert!(req.display_name.is_unknown());
}

#[test]
fn sync_requires_data() {
    let env = Envelope::parse(r#"{"v":1,"svc":"code","type":"sync"}"#).unwrap();
    let err = env.data_as::<SyncCodeReq>().expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn sync_data_uses_camel_case() {
    let env = Envelope::parse(&load("envelope_sync.json").frame).unwrap();
    let req: SyncCodeReq = env.data_as().unwrap();
    assert_eq!(req.target_connection_id, "c-2");
    assert_eq!(req.text, "let x=1;");
}

#[test]
fn change_requires_room() {
    let env = Envelope::parse(r#"{"v":1,"svc":"code","type":"change","data":{"text":"x"}}"#).unwrap();
    let err = env.require_room().expect_err("must fail");
    assert!(err.to_string().contains("code.change requires room"));
}
