mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::{TestEntry, archive, sample};
use scanzip::zip::{ExtractOptions, Extracted, Extractor, Overwrite, SkipReason};
use scanzip::{Archive, Error, LocalFileReader};

fn write_archive(dir: &Path, entries: &[TestEntry]) -> Archive<LocalFileReader> {
    let path = dir.join("input.zip");
    fs::write(&path, archive(entries)).unwrap();
    Archive::new(Arc::new(LocalFileReader::new(&path).unwrap()))
}

fn extractor(dest: &Path, junk_paths: bool, overwrite: Overwrite) -> Extractor {
    Extractor::new(ExtractOptions {
        dest: dest.to_path_buf(),
        junk_paths,
        overwrite,
    })
}

#[test]
fn extracts_tree_from_local_file() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("out");
    let big = sample(50_000);
    let mut archive = write_archive(
        tmp.path(),
        &[
            TestEntry::directory("docs/"),
            TestEntry::stored("docs/a.txt", b"hello"),
            TestEntry::deflated("docs/nested/b.bin", &big),
        ],
    );
    let extractor = extractor(&dest, false, Overwrite::Ask);

    let mut results = Vec::new();
    while let Some(entry) = archive.next_entry().unwrap() {
        results.push(extractor.extract(&entry).unwrap());
    }

    assert_eq!(results[0], Extracted::Directory(dest.join("docs")));
    assert_eq!(
        results[1],
        Extracted::File {
            path: dest.join("docs").join("a.txt"),
            bytes: 5
        }
    );
    assert!(dest.join("docs").is_dir());
    assert_eq!(fs::read(dest.join("docs/a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(dest.join("docs/nested/b.bin")).unwrap(), big);
}

#[test]
fn overwrite_policies() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("out");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("f.txt"), b"old").unwrap();

    let entries = [TestEntry::stored("f.txt", b"new")];
    let target = dest.join("f.txt");

    for (policy, expected) in [
        (Overwrite::Ask, Some(SkipReason::ExistsAsk)),
        (Overwrite::Never, Some(SkipReason::Exists)),
        (Overwrite::Always, None),
    ] {
        let mut archive = write_archive(tmp.path(), &entries);
        let entry = archive.next_entry().unwrap().unwrap();
        let result = extractor(&dest, false, policy).extract(&entry).unwrap();
        match expected {
            Some(reason) => {
                assert_eq!(
                    result,
                    Extracted::Skipped {
                        path: target.clone(),
                        reason
                    }
                );
                assert_eq!(fs::read(&target).unwrap(), b"old");
            }
            None => {
                assert!(matches!(result, Extracted::File { bytes: 3, .. }));
                assert_eq!(fs::read(&target).unwrap(), b"new");
            }
        }
    }
}

#[test]
fn junk_paths_flatten_output() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("flat");
    let mut archive = write_archive(
        tmp.path(),
        &[
            TestEntry::directory("deep/"),
            TestEntry::stored("deep/er/file.txt", b"content"),
        ],
    );
    let extractor = extractor(&dest, true, Overwrite::Ask);

    let dir = archive.next_entry().unwrap().unwrap();
    assert!(matches!(
        extractor.extract(&dir).unwrap(),
        Extracted::Skipped {
            reason: SkipReason::JunkedDirectory,
            ..
        }
    ));
    let file = archive.next_entry().unwrap().unwrap();
    extractor.extract(&file).unwrap();
    assert_eq!(fs::read(dest.join("file.txt")).unwrap(), b"content");
    assert!(!dest.join("deep").exists());
}

#[test]
fn escaping_entries_are_refused_and_scan_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("out");
    let mut archive = write_archive(
        tmp.path(),
        &[
            TestEntry::stored("../evil.txt", b"x"),
            TestEntry::stored("good.txt", b"y"),
        ],
    );
    let extractor = extractor(&dest, false, Overwrite::Ask);

    let evil = archive.next_entry().unwrap().unwrap();
    assert!(matches!(extractor.extract(&evil), Err(Error::UnsafePath(_))));
    assert!(!tmp.path().join("evil.txt").exists());

    let good = archive.next_entry().unwrap().unwrap();
    extractor.extract(&good).unwrap();
    assert_eq!(fs::read(dest.join("good.txt")).unwrap(), b"y");
}

#[test]
fn unsupported_entry_leaves_other_entries_extractable() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("out");
    let mut archive = write_archive(
        tmp.path(),
        &[
            TestEntry::stored("bzip2.bin", b"BZh").with_method(12),
            TestEntry::deflated("after.txt", b"after"),
        ],
    );
    let extractor = extractor(&dest, false, Overwrite::Ask);

    let unsupported = archive.next_entry().unwrap().unwrap();
    assert!(matches!(
        extractor.extract(&unsupported),
        Err(Error::UnsupportedMethod(12))
    ));
    let after = archive.next_entry().unwrap().unwrap();
    extractor.extract(&after).unwrap();
    assert_eq!(fs::read(dest.join("after.txt")).unwrap(), b"after");
}

#[test]
fn entries_naming_the_destination_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("out");
    let mut archive = write_archive(
        tmp.path(),
        &[TestEntry::directory("./"), TestEntry::stored("kept.txt", b"k")],
    );
    let extractor = extractor(&dest, false, Overwrite::Ask);

    let dot = archive.next_entry().unwrap().unwrap();
    assert_eq!(
        extractor.extract(&dot).unwrap(),
        Extracted::Skipped {
            path: "./".into(),
            reason: SkipReason::EmptyName,
        }
    );
    let kept = archive.next_entry().unwrap().unwrap();
    extractor.extract(&kept).unwrap();
    assert_eq!(fs::read(dest.join("kept.txt")).unwrap(), b"k");
}
