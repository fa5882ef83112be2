#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use btopcall::AlignmentRecord;

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("BTOPCALL_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set BTOPCALL_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

pub fn record(variant: &str, start: u64, stop: u64, btop: &str) -> AlignmentRecord {
    AlignmentRecord::new(variant, start, stop, btop).expect("non-empty BTOP")
}

/// Magic-BLAST tabular line with the given subject, coordinates and BTOP.
pub fn magicblast_line(read: &str, variant: &str, start: u64, stop: u64, btop: &str) -> String {
    format!(
        "{read}\t{variant}\t100.00\t50\t0\t0\t1\t50\t{start}\t{stop}\t0\t0\t50\t+\t+\t50\t{btop}\t1\t50"
    )
}
