use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;
use sha1::{Digest, Sha1};

mod common;

use common::command::{get_master_tip, kit_commit, repository_dir, run_kit_command};
use common::file::{FileSpec, write_file};
use common::http_stub::ReceivePackStub;

// base64 of "user:secret"
const EXPECTED_AUTHORIZATION: &str = "Basic dXNlcjpzZWNyZXQ=";
const UNPACK_OK_REPORT: &str = "000eunpack ok\n0000";

#[rstest]
fn pushing_to_an_empty_remote_sends_every_reachable_object(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init", "."])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    run_kit_command(repository_dir.path(), &["add", "1.txt", "a/2.txt"])
        .assert()
        .success();
    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();
    let local_tip = get_master_tip(repository_dir.path())?;

    let stub = ReceivePackStub::serve(None, UNPACK_OK_REPORT);
    run_kit_command(
        repository_dir.path(),
        &[
            "push",
            stub.url(),
            "--username",
            "user",
            "--password",
            "secret",
        ],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Push successful"));

    let recorded = stub.finish();
    assert_eq!(
        recorded.info_refs_authorization.as_deref(),
        Some(EXPECTED_AUTHORIZATION)
    );
    assert_eq!(
        recorded.receive_pack_authorization.as_deref(),
        Some(EXPECTED_AUTHORIZATION)
    );

    let body = recorded.receive_pack_body;
    let prefix = negotiation_prefix(&"0".repeat(40), &local_tip);
    assert!(body.starts_with(prefix.as_bytes()));

    let start = pack_start(&body);
    assert_eq!(start, prefix.len());
    assert_eq!(
        u32::from_be_bytes(body[start + 4..start + 8].try_into().unwrap()),
        2
    );
    // two blobs, one tree, one commit
    assert_eq!(pack_object_count(&body, start), 4);

    let trailer_start = body.len() - 20;
    let digest = Sha1::digest(&body[start..trailer_start]);
    assert_eq!(digest.as_slice(), &body[trailer_start..]);

    Ok(())
}

#[rstest]
fn pushing_on_top_of_an_advertised_tip_sends_only_missing_objects(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init", "."])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    run_kit_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();
    let first_tip = get_master_tip(repository_dir.path())?;

    write_file(FileSpec::new(
        repository_dir.path().join("2.txt"),
        "two".to_string(),
    ));
    run_kit_command(repository_dir.path(), &["add", "2.txt"])
        .assert()
        .success();
    kit_commit(repository_dir.path(), "Second commit")
        .assert()
        .success();
    let second_tip = get_master_tip(repository_dir.path())?;

    let stub = ReceivePackStub::serve(Some(&first_tip), UNPACK_OK_REPORT);
    run_kit_command(
        repository_dir.path(),
        &[
            "push",
            stub.url(),
            "--username",
            "user",
            "--password",
            "secret",
        ],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Push successful"));

    let body = stub.finish().receive_pack_body;
    let prefix = negotiation_prefix(&first_tip, &second_tip);
    assert!(body.starts_with(prefix.as_bytes()));

    // only the second commit, its tree, and the new blob are missing remotely
    let start = pack_start(&body);
    assert_eq!(pack_object_count(&body, start), 3);

    Ok(())
}

#[rstest]
fn a_rejected_push_reports_failure_and_exits_nonzero(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init", "."])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    run_kit_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    let stub = ReceivePackStub::serve(None, "001cunpack index-pack error\n0000");
    run_kit_command(
        repository_dir.path(),
        &[
            "push",
            stub.url(),
            "--username",
            "user",
            "--password",
            "secret",
        ],
    )
    .assert()
    .failure()
    .stdout(predicate::str::contains("Push failed"));

    // the pack was transmitted; only the remote's verdict made this a failure
    let body = stub.finish().receive_pack_body;
    assert!(!body.is_empty());

    Ok(())
}

#[rstest]
fn pushing_with_no_commits_fails_before_any_network_io(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init", "."])
        .assert()
        .success();

    // nothing listens on this address; the command must fail before dialing
    run_kit_command(
        repository_dir.path(),
        &[
            "push",
            "http://127.0.0.1:9",
            "--username",
            "user",
            "--password",
            "secret",
        ],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains(
        "Nothing to push: the repository has no commits yet",
    ));

    Ok(())
}

#[rstest]
fn an_unreachable_remote_surfaces_an_auth_or_network_error(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init", "."])
        .assert()
        .success();
    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    run_kit_command(
        repository_dir.path(),
        &[
            "push",
            "http://127.0.0.1:1",
            "--username",
            "user",
            "--password",
            "secret",
        ],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains(
        "authentication or network failure for http://127.0.0.1:1",
    ));

    Ok(())
}

fn negotiation_prefix(old_tip: &str, new_tip: &str) -> String {
    let line = format!("{} {} refs/heads/master\0report-status", old_tip, new_tip);
    format!("{:04x}{}0000", line.len() + 4, line)
}

fn pack_start(body: &[u8]) -> usize {
    body.windows(4)
        .position(|window| window == b"PACK")
        .expect("No pack signature in the push body")
}

fn pack_object_count(body: &[u8], pack_start: usize) -> u32 {
    u32::from_be_bytes(
        body[pack_start + 8..pack_start + 12]
            .try_into()
            .expect("Truncated pack header"),
    )
}
