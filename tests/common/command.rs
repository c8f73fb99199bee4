use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::io::Read;
use std::path::Path;

/// Author identity pinned so commit hashes are reproducible across runs
pub const AUTHOR_NAME: &str = "A U Thor";
pub const AUTHOR_EMAIL: &str = "author@example.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000"; // %Y-%m-%d %H:%M:%S %z

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init", "."])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    run_kit_command(
        repository_dir.path(),
        &["add", "1.txt", "a/2.txt", "a/b/3.txt"],
    )
    .assert()
    .success();

    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_kit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("kit").expect("Failed to find kit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn kit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_kit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("KIT_AUTHOR_NAME", AUTHOR_NAME),
        ("KIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("KIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

/// Read the current master tip hash from the ref file
pub fn get_master_tip(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let master_path = dir.join(".git").join("refs").join("heads").join("master");
    Ok(std::fs::read_to_string(master_path)?.trim().to_string())
}

/// Decompress a loose object and return its raw `<kind> <len>\0<content>` bytes
pub fn read_loose_object(dir: &Path, oid: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let object_path = dir
        .join(".git")
        .join("objects")
        .join(&oid[..2])
        .join(&oid[2..]);
    let compressed = std::fs::read(object_path)?;

    let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;

    Ok(decompressed)
}
