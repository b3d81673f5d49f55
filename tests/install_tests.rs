// Orchestrator fallback-chain tests using mock tiers.
// The real tiers touch npm and the network; these verify the fold itself:
// tier order, escalation on failure, first-success short-circuit, and the
// terminal error shapes.

use binstrap::error::BinstrapError;
use binstrap::install::{Tiers, acquire};
use binstrap::platform::PlatformDescriptor;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;

fn descriptor(bin: &str, abi: Option<&'static str>) -> PlatformDescriptor {
    PlatformDescriptor {
        os: "linux",
        arch: "x64",
        abi,
        bin: bin.to_string(),
        exe: "bin/tool".to_string(),
    }
}

/// Mock tiers scripted by which platform packages each tier can produce.
/// A successful install or download makes the package resolvable.
#[derive(Default)]
struct MockTiers {
    resolvable: RefCell<HashSet<String>>,
    installable: HashSet<String>,
    downloadable: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl MockTiers {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Tiers for MockTiers {
    fn resolve(&self, platform: &PlatformDescriptor) -> binstrap::Result<PathBuf> {
        self.calls.borrow_mut().push(format!("resolve {}", platform.bin));
        if self.resolvable.borrow().contains(&platform.bin) {
            Ok(PathBuf::from(format!("/fake/{}/bin/tool", platform.bin)))
        } else {
            Err(BinstrapError::BinaryNotFound {
                package: platform.bin.clone(),
            })
        }
    }

    fn install(&self, platform: &PlatformDescriptor) -> binstrap::Result<()> {
        self.calls.borrow_mut().push(format!("install {}", platform.bin));
        if self.installable.contains(&platform.bin) {
            self.resolvable.borrow_mut().insert(platform.bin.clone());
            Ok(())
        } else {
            Err(BinstrapError::InstallFailed {
                package: platform.bin.clone(),
                detail: "exit code 1: npm ERR!".to_string(),
            })
        }
    }

    async fn download(&self, platform: &PlatformDescriptor) -> binstrap::Result<()> {
        self.calls.borrow_mut().push(format!("download {}", platform.bin));
        if self.downloadable.contains(&platform.bin) {
            self.resolvable.borrow_mut().insert(platform.bin.clone());
            Ok(())
        } else {
            Err(BinstrapError::InvalidArchive(std::io::Error::other(
                "registry returned garbage",
            )))
        }
    }
}

#[tokio::test]
async fn empty_candidate_list_is_unsupported_and_touches_nothing() {
    let tiers = MockTiers::default();
    let err = acquire(&tiers, &[], "@acme").await.unwrap_err();
    assert!(matches!(err, BinstrapError::UnsupportedPlatform { .. }));
    assert!(tiers.calls().is_empty());
}

#[tokio::test]
async fn already_resolved_binary_short_circuits() {
    let tiers = MockTiers {
        resolvable: RefCell::new(HashSet::from(["tool-linux-x64".to_string()])),
        ..Default::default()
    };
    let candidates = [descriptor("tool-linux-x64", None)];

    let exe = acquire(&tiers, &candidates, "@acme").await.unwrap();
    assert_eq!(exe, PathBuf::from("/fake/tool-linux-x64/bin/tool"));
    assert_eq!(tiers.calls(), vec!["resolve tool-linux-x64"]);
}

#[tokio::test]
async fn install_success_skips_download() {
    let tiers = MockTiers {
        installable: HashSet::from(["tool-linux-x64".to_string()]),
        ..Default::default()
    };
    let candidates = [descriptor("tool-linux-x64", None)];

    acquire(&tiers, &candidates, "@acme").await.unwrap();
    assert_eq!(
        tiers.calls(),
        vec![
            "resolve tool-linux-x64",
            "install tool-linux-x64",
            "resolve tool-linux-x64",
        ]
    );
}

#[tokio::test]
async fn second_candidate_succeeds_without_downloading_it() {
    // musl candidate fails every tier; the plain glibc one resolves directly.
    let tiers = MockTiers {
        resolvable: RefCell::new(HashSet::from(["tool-linux-x64".to_string()])),
        ..Default::default()
    };
    let candidates = [
        descriptor("tool-linux-x64-musl", Some("musl")),
        descriptor("tool-linux-x64", None),
    ];

    let exe = acquire(&tiers, &candidates, "@acme").await.unwrap();
    assert_eq!(exe, PathBuf::from("/fake/tool-linux-x64/bin/tool"));

    let calls = tiers.calls();
    // every tier ran for the musl candidate
    assert!(calls.contains(&"install tool-linux-x64-musl".to_string()));
    assert!(calls.contains(&"download tool-linux-x64-musl".to_string()));
    // the second candidate never needed materialization
    assert!(!calls.contains(&"install tool-linux-x64".to_string()));
    assert!(!calls.contains(&"download tool-linux-x64".to_string()));
}

#[tokio::test]
async fn download_tier_recovers_from_failed_install() {
    let tiers = MockTiers {
        downloadable: HashSet::from(["tool-linux-x64".to_string()]),
        ..Default::default()
    };
    let candidates = [descriptor("tool-linux-x64", None)];

    acquire(&tiers, &candidates, "@acme").await.unwrap();
    assert_eq!(
        tiers.calls(),
        vec![
            "resolve tool-linux-x64",
            "install tool-linux-x64",
            "download tool-linux-x64",
            "resolve tool-linux-x64",
        ]
    );
}

#[tokio::test]
async fn exhausted_tiers_name_the_package() {
    let tiers = MockTiers::default();
    let candidates = [descriptor("tool-linux-x64", None)];

    match acquire(&tiers, &candidates, "@acme").await.unwrap_err() {
        BinstrapError::AggregateInstallFailed { package } => {
            assert_eq!(package, "@acme/tool-linux-x64");
        }
        other => panic!("unexpected error: {other}"),
    }
}
