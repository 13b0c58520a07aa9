//! In-process concurrency: racing callers must not break username uniqueness
//! or the index/content pairing.

use std::sync::Arc;
use std::thread;

use tempfile::tempdir;

use rolegate::{Cms, CmsConfig, CmsError, Principal, Role};

fn shared_store() -> (tempfile::TempDir, Arc<Cms>) {
    let tmp = tempdir().unwrap();
    let cfg = CmsConfig { audit_log_enabled: false, ..CmsConfig::rooted_at(tmp.path()) };
    let cms = Arc::new(Cms::open(&cfg).unwrap());
    (tmp, cms)
}

#[test]
fn racing_registrations_admit_exactly_one() {
    let (_tmp, cms) = shared_store();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cms = cms.clone();
            thread::spawn(move || cms.register("same", &format!("pw{}", i), "viewer"))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, CmsError::DuplicateUsername(_))));
    assert_eq!(cms.ledger.records().unwrap().len(), 1);
}

#[test]
fn racing_creates_of_one_name_index_it_once() {
    let (_tmp, cms) = shared_store();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cms = cms.clone();
            thread::spawn(move || {
                let admin = Principal::new(format!("admin{}", i), Role::Admin);
                cms.create_file(&admin, "contended.txt", format!("body {}", i).as_bytes())
            })
        })
        .collect();
    let ok = handles.into_iter().map(|h| h.join().unwrap()).filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    let admin = Principal::new("root", Role::Admin);
    assert_eq!(cms.list_files(&admin).unwrap(), vec!["contended.txt"]);
}

#[test]
fn parallel_creates_of_distinct_names_all_land() {
    let (_tmp, cms) = shared_store();
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let cms = cms.clone();
            thread::spawn(move || {
                let admin = Principal::new("ada", Role::Admin);
                cms.create_file(&admin, &format!("f{:02}.txt", i), b"x")
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }
    let admin = Principal::new("ada", Role::Admin);
    let mut files = cms.list_files(&admin).unwrap();
    files.sort();
    let expected: Vec<String> = (0..16).map(|i| format!("f{:02}.txt", i)).collect();
    assert_eq!(files, expected);
}
